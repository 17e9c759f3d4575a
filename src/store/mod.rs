//! The unified store: one call-site contract, two backends.

pub mod cloud;
pub mod local;

pub use cloud::CloudStore;
pub use local::LocalStore;

use std::sync::Arc;

use crate::availability::RemoteHandle;
use crate::error::AuthError;
use crate::kv::KeyValueStore;
use crate::models::{
    Folder, Group, GroupCreated, NewFolder, NewGroup, NewStudySet, StudySet, StudySetPatch, User,
};

/// The single entry point page controllers call.
///
/// Every operation re-probes remote availability and routes to the local or
/// cloud adapter, so backend selection can change mid-session once the remote
/// service becomes reachable. Results come back in one canonical shape either
/// way, and every operation is async even when the local adapter completes it
/// synchronously, so callers treat all of them as potentially suspending.
///
/// `sign_up` and `sign_in` are the two operations with materially different
/// logic per backend and are written as full branches; everything else is
/// plain dispatch.
pub struct Store<K: KeyValueStore> {
    local: LocalStore<K>,
    cloud: CloudStore,
    remote: Arc<RemoteHandle>,
}

impl<K: KeyValueStore> Store<K> {
    pub fn new(kv: K, remote: RemoteHandle) -> Self {
        let remote = Arc::new(remote);
        Self {
            local: LocalStore::new(kv),
            cloud: CloudStore::new(Arc::clone(&remote)),
            remote,
        }
    }

    /// A store whose probe always reports the remote backend unavailable.
    pub fn local_only(kv: K) -> Self {
        Self::new(kv, RemoteHandle::disabled())
    }

    pub fn is_cloud(&self) -> bool {
        self.remote.available()
    }

    /// Direct adapter access, for collaborators that know which mode they
    /// need (account seeding, diagnostics).
    pub fn local(&self) -> &LocalStore<K> {
        &self.local
    }

    pub fn cloud(&self) -> &CloudStore {
        &self.cloud
    }

    // Auth

    pub async fn get_current_user(&self) -> Option<User> {
        if self.is_cloud() {
            self.cloud.get_current_user().await
        } else {
            self.local.get_current_user()
        }
    }

    pub async fn logout(&self) {
        if self.is_cloud() {
            self.cloud.sign_out().await
        } else {
            self.local.logout()
        }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<User, AuthError> {
        if self.is_cloud() {
            self.cloud.sign_up(email, password, username).await
        } else {
            self.local.sign_up(email, password, username)
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if self.is_cloud() {
            self.cloud.sign_in(email, password).await
        } else {
            self.local.sign_in(email, password)
        }
    }

    // Sets

    pub async fn get_sets(&self) -> Vec<StudySet> {
        if self.is_cloud() {
            self.cloud.get_sets().await
        } else {
            self.local.get_sets()
        }
    }

    pub async fn get_set_by_id(&self, id: &str) -> Option<StudySet> {
        if self.is_cloud() {
            self.cloud.get_set_by_id(id).await
        } else {
            self.local.get_set_by_id(id)
        }
    }

    pub async fn add_set(&self, draft: NewStudySet) -> Option<StudySet> {
        if self.is_cloud() {
            self.cloud.add_set(draft).await
        } else {
            Some(self.local.add_set(draft))
        }
    }

    pub async fn update_set(&self, id: &str, patch: StudySetPatch) {
        if self.is_cloud() {
            self.cloud.update_set(id, patch).await
        } else {
            self.local.update_set(id, patch)
        }
    }

    pub async fn delete_set(&self, id: &str) {
        if self.is_cloud() {
            self.cloud.delete_set(id).await
        } else {
            self.local.delete_set(id)
        }
    }

    // Folders

    pub async fn get_folders(&self) -> Vec<Folder> {
        if self.is_cloud() {
            self.cloud.get_folders().await
        } else {
            self.local.get_folders()
        }
    }

    pub async fn get_folder_by_id(&self, id: &str) -> Option<Folder> {
        if self.is_cloud() {
            self.cloud.get_folder_by_id(id).await
        } else {
            self.local.get_folder_by_id(id)
        }
    }

    pub async fn add_folder(&self, draft: NewFolder) -> Option<Folder> {
        if self.is_cloud() {
            self.cloud.add_folder(draft).await
        } else {
            Some(self.local.add_folder(draft))
        }
    }

    pub async fn delete_folder(&self, id: &str) {
        if self.is_cloud() {
            self.cloud.delete_folder(id).await
        } else {
            self.local.delete_folder(id)
        }
    }

    pub async fn add_set_to_folder(&self, folder_id: &str, set_id: &str) {
        if self.is_cloud() {
            self.cloud.add_set_to_folder(folder_id, set_id).await
        } else {
            self.local.add_set_to_folder(folder_id, set_id)
        }
    }

    pub async fn remove_set_from_folder(&self, folder_id: &str, set_id: &str) {
        if self.is_cloud() {
            self.cloud.remove_set_from_folder(folder_id, set_id).await
        } else {
            self.local.remove_set_from_folder(folder_id, set_id)
        }
    }

    // Groups

    pub async fn get_groups(&self) -> Vec<Group> {
        if self.is_cloud() {
            self.cloud.get_groups().await
        } else {
            self.local.get_groups()
        }
    }

    pub async fn get_group_by_id(&self, id: &str) -> Option<Group> {
        if self.is_cloud() {
            self.cloud.get_group_by_id(id).await
        } else {
            self.local.get_group_by_id(id)
        }
    }

    pub async fn add_group(&self, draft: NewGroup) -> Option<GroupCreated> {
        if self.is_cloud() {
            self.cloud.add_group(draft).await
        } else {
            Some(self.local.add_group(draft))
        }
    }

    pub async fn delete_group(&self, id: &str) {
        if self.is_cloud() {
            self.cloud.delete_group(id).await
        } else {
            self.local.delete_group(id)
        }
    }

    pub async fn add_set_to_group(&self, group_id: &str, set_id: &str) {
        if self.is_cloud() {
            self.cloud.add_set_to_group(group_id, set_id).await
        } else {
            self.local.add_set_to_group(group_id, set_id)
        }
    }

    pub async fn add_member_to_group(&self, group_id: &str, username: &str) {
        if self.is_cloud() {
            self.cloud.add_member_to_group(group_id, username).await
        } else {
            self.local.add_member_to_group(group_id, username)
        }
    }
}
