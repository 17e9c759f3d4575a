pub mod availability;
pub mod config;
pub mod constants;
pub mod error;
pub mod kv;
pub mod models;
pub mod remote;
pub mod store;
pub mod util;

pub use availability::{RemoteFactory, RemoteHandle};
pub use config::RemoteConfig;
pub use error::{AuthError, StoreError};
pub use kv::{FileKv, InMemoryKv, KeyValueStore};
pub use models::{
    Folder, Group, GroupCreated, LocalAccount, NewFolder, NewGroup, NewStudySet, StudySet,
    StudySetPatch, Term, User,
};
pub use remote::{Filter, InMemoryRemote, OrderBy, RemoteService};
pub use store::{CloudStore, LocalStore, Store};
pub use util::{generate_id, shuffled};

#[cfg(test)]
mod tests;
