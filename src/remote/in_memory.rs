use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

use super::{Filter, OrderBy, RemoteService};
use crate::error::{AuthError, StoreError};
use crate::models::User;
use crate::util::generate_id;

/// Self-contained stand-in for the hosted service: tables of JSON rows with
/// the same server-side defaulting (generated ids, creation timestamps) and a
/// minimal session registry. Backs tests and offline demos.
pub struct InMemoryRemote {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    accounts: Mutex<Vec<RemoteAccount>>,
    session: Mutex<Option<User>>,
    failing_inserts: Mutex<HashSet<String>>,
}

struct RemoteAccount {
    email: String,
    password: String,
    user: User,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            accounts: Mutex::new(Vec::new()),
            session: Mutex::new(None),
            failing_inserts: Mutex::new(HashSet::new()),
        }
    }

    /// Makes every insert into `table` fail, for exercising partial-failure
    /// paths such as group creation losing its membership step.
    pub async fn fail_inserts_into(&self, table: &str) {
        self.failing_inserts.lock().await.insert(table.to_string());
    }

    pub async fn clear_insert_failures(&self) {
        self.failing_inserts.lock().await.clear();
    }

    /// Number of rows currently stored in `table`.
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .lock()
            .await
            .get(table)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(row: &Value, filter: Filter<'_>) -> bool {
    row.get(filter.column).and_then(Value::as_str) == Some(filter.value)
}

#[async_trait]
impl RemoteService for InMemoryRemote {
    async fn select(
        &self,
        table: &str,
        filter: Option<Filter<'_>>,
        order: Option<OrderBy<'_>>,
    ) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filter.map_or(true, |f| matches(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order {
            // RFC 3339 timestamps sort lexicographically.
            rows.sort_by(|a, b| {
                let a = a.get(order.column).and_then(Value::as_str).unwrap_or("");
                let b = b.get(order.column).and_then(Value::as_str).unwrap_or("");
                if order.descending { b.cmp(a) } else { a.cmp(b) }
            });
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        if self.failing_inserts.lock().await.contains(table) {
            return Err(StoreError::Remote(format!("insert into {table} rejected")));
        }

        let mut stored = row;
        let fields = stored
            .as_object_mut()
            .ok_or_else(|| StoreError::Remote("row must be a JSON object".to_string()))?;
        let now = Utc::now().to_rfc3339();
        fields
            .entry("id")
            .or_insert_with(|| Value::String(generate_id()));
        fields
            .entry("created_at")
            .or_insert_with(|| Value::String(now.clone()));
        fields
            .entry("updated_at")
            .or_insert_with(|| Value::String(now));

        let mut tables = self.tables.lock().await;
        tables
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        table: &str,
        filter: Filter<'_>,
        changes: Value,
    ) -> Result<(), StoreError> {
        let changes = changes
            .as_object()
            .ok_or_else(|| StoreError::Remote("changes must be a JSON object".to_string()))?
            .clone();

        let mut tables = self.tables.lock().await;
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| matches(row, filter)) {
                if let Some(fields) = row.as_object_mut() {
                    for (key, value) in &changes {
                        fields.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filter: Filter<'_>) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !matches(row, filter));
        }
        Ok(())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
    ) -> Result<User, AuthError> {
        let mut accounts = self.accounts.lock().await;
        if accounts.iter().any(|a| a.email == email) {
            return Err(AuthError::Service(format!(
                "email {email} already registered"
            )));
        }

        let username = metadata
            .get("username")
            .and_then(Value::as_str)
            .map(str::to_string);
        let user = User {
            id: Some(generate_id()),
            email: email.to_string(),
            username,
            created_at: Some(Utc::now()),
        };
        accounts.push(RemoteAccount {
            email: email.to_string(),
            password: password.to_string(),
            user: user.clone(),
        });
        drop(accounts);

        *self.session.lock().await = Some(user.clone());
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let accounts = self.accounts.lock().await;
        let user = accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .map(|a| a.user.clone())
            .ok_or(AuthError::InvalidCredentials)?;
        drop(accounts);

        *self.session.lock().await = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.lock().await = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.session.lock().await.clone())
    }
}
