//! The hosted backend as this layer consumes it: a relational query/command
//! interface plus a session sub-interface. Rows cross this boundary as raw
//! JSON values; shape translation into the canonical entities happens in the
//! cloud adapter, never here.

pub mod in_memory;

pub use in_memory::InMemoryRemote;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AuthError, StoreError};
use crate::models::User;

/// Column equality filter, the only row predicate this layer needs.
#[derive(Clone, Copy, Debug)]
pub struct Filter<'a> {
    pub column: &'a str,
    pub value: &'a str,
}

impl<'a> Filter<'a> {
    pub fn eq(column: &'a str, value: &'a str) -> Self {
        Self { column, value }
    }
}

/// Sort order for `select`.
#[derive(Clone, Copy, Debug)]
pub struct OrderBy<'a> {
    pub column: &'a str,
    pub descending: bool,
}

impl OrderBy<'static> {
    /// `created_at` descending, the listing order of every collection read.
    pub fn newest_first() -> Self {
        Self {
            column: "created_at",
            descending: true,
        }
    }
}

#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn select(
        &self,
        table: &str,
        filter: Option<Filter<'_>>,
        order: Option<OrderBy<'_>>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Inserts one row and returns it as stored, with server-side defaults
    /// (id, timestamps) applied.
    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError>;

    async fn update(
        &self,
        table: &str,
        filter: Filter<'_>,
        changes: Value,
    ) -> Result<(), StoreError>;

    async fn delete(&self, table: &str, filter: Filter<'_>) -> Result<(), StoreError>;

    // Session sub-interface. Token handling and credential storage are the
    // service's concern; this layer only sees the resulting user.

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
    ) -> Result<User, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn current_user(&self) -> Result<Option<User>, AuthError>;
}
