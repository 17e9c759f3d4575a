use serde::Serialize;
use thiserror::Error;

/// Failures raised by the storage backends.
///
/// CRUD reads and writes absorb these at the adapter boundary (logged, then
/// converted to an empty or absent result); they reach callers only through
/// composite results such as [`crate::models::GroupCreated`].
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
pub enum StoreError {
    /// The remote service rejected or failed an operation
    #[error("remote service error: {0}")]
    Remote(String),
}

/// Authentication failures. Always returned as values, never panicked;
/// callers must check the result explicitly.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
pub enum AuthError {
    /// Supplied credentials matched no account
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Auth was requested on the remote path without a configured client
    #[error("remote backend not configured")]
    Unconfigured,

    /// The auth service failed
    #[error("auth service error: {0}")]
    Service(String),
}
