mod auth_tests;
mod group_tests;
mod set_tests;

use std::sync::Arc;

use crate::availability::RemoteHandle;
use crate::kv::InMemoryKv;
use crate::models::User;
use crate::remote::InMemoryRemote;
use crate::store::Store;

pub fn local_store() -> Store<InMemoryKv> {
    let _ = tracing_subscriber::fmt::try_init();
    Store::local_only(InMemoryKv::new())
}

pub fn cloud_store() -> (Store<InMemoryKv>, Arc<InMemoryRemote>) {
    let _ = tracing_subscriber::fmt::try_init();
    let service = Arc::new(InMemoryRemote::new());
    let handle = RemoteHandle::with_client(service.clone());
    (Store::new(InMemoryKv::new(), handle), service)
}

pub async fn signed_in_cloud_store() -> (Store<InMemoryKv>, Arc<InMemoryRemote>, User) {
    let (store, service) = cloud_store();
    let user = store
        .sign_up("ada@example.com", "correct horse", "ada")
        .await
        .unwrap();
    (store, service, user)
}
