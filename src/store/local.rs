use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::constants::{ACCOUNTS_KEY, CURRENT_USER_KEY, FOLDERS_KEY, GROUPS_KEY, SETS_KEY};
use crate::error::AuthError;
use crate::kv::KeyValueStore;
use crate::models::{
    Folder, Group, GroupCreated, LocalAccount, NewFolder, NewGroup, NewStudySet, StudySet,
    StudySetPatch, User,
};
use crate::util::generate_id;

/// Single-user adapter over browser-style key/value storage.
///
/// Every collection lives whole under one key; every mutation deserializes
/// it, edits the in-memory copy, and writes the whole thing back. Two
/// near-simultaneous writers would race and the last one wins. Local mode
/// has no concurrent writers in practice, so that is the documented contract,
/// not a gap to close.
///
/// Ownership is not enforced: `owner_id` is stamped from the cached current
/// user when one exists and is otherwise left empty.
pub struct LocalStore<K: KeyValueStore> {
    kv: K,
}

impl<K: KeyValueStore> LocalStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.kv.get(key) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("discarding unreadable collection under {key}: {err}");
            Vec::new()
        })
    }

    fn write<T: Serialize>(&self, key: &str, items: &[T]) {
        match serde_json::to_string(items) {
            Ok(raw) => self.kv.set(key, &raw),
            Err(err) => warn!("failed to serialize collection under {key}: {err}"),
        }
    }

    // Sets

    pub fn get_sets(&self) -> Vec<StudySet> {
        self.read(SETS_KEY)
    }

    pub fn get_set_by_id(&self, id: &str) -> Option<StudySet> {
        self.get_sets().into_iter().find(|s| s.id == id)
    }

    pub fn add_set(&self, draft: NewStudySet) -> StudySet {
        let now = Utc::now();
        let set = StudySet {
            id: generate_id(),
            owner_id: self.get_current_user().and_then(|u| u.id),
            title: draft.title,
            description: draft.description.unwrap_or_default(),
            terms: draft.terms.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        info!("adding set {} ({})", set.id, set.title);

        let mut sets = self.get_sets();
        sets.push(set.clone());
        self.write(SETS_KEY, &sets);
        set
    }

    pub fn update_set(&self, id: &str, patch: StudySetPatch) {
        debug!("updating set {id}");
        let mut sets = self.get_sets();
        if let Some(set) = sets.iter_mut().find(|s| s.id == id) {
            if let Some(title) = patch.title {
                set.title = title;
            }
            if let Some(description) = patch.description {
                set.description = description;
            }
            if let Some(terms) = patch.terms {
                set.terms = terms;
            }
            set.updated_at = Utc::now();
        }
        self.write(SETS_KEY, &sets);
    }

    pub fn delete_set(&self, id: &str) {
        info!("deleting set {id}");
        let mut sets = self.get_sets();
        sets.retain(|s| s.id != id);
        self.write(SETS_KEY, &sets);
    }

    // Folders

    pub fn get_folders(&self) -> Vec<Folder> {
        self.read(FOLDERS_KEY)
    }

    pub fn get_folder_by_id(&self, id: &str) -> Option<Folder> {
        self.get_folders().into_iter().find(|f| f.id == id)
    }

    pub fn add_folder(&self, draft: NewFolder) -> Folder {
        let folder = Folder {
            id: generate_id(),
            owner_id: self.get_current_user().and_then(|u| u.id),
            name: draft.name,
            description: draft.description.unwrap_or_default(),
            set_ids: Vec::new(),
            created_at: Utc::now(),
        };
        info!("adding folder {} ({})", folder.id, folder.name);

        let mut folders = self.get_folders();
        folders.push(folder.clone());
        self.write(FOLDERS_KEY, &folders);
        folder
    }

    pub fn delete_folder(&self, id: &str) {
        info!("deleting folder {id}");
        let mut folders = self.get_folders();
        folders.retain(|f| f.id != id);
        self.write(FOLDERS_KEY, &folders);
    }

    /// Appends `set_id` unless already present, then rewrites the whole
    /// collection either way: an idempotent full rewrite, not a
    /// short-circuit. Local writes are cheap enough for that.
    pub fn add_set_to_folder(&self, folder_id: &str, set_id: &str) {
        debug!("attaching set {set_id} to folder {folder_id}");
        let mut folders = self.get_folders();
        if let Some(folder) = folders.iter_mut().find(|f| f.id == folder_id) {
            if !folder.set_ids.iter().any(|id| id == set_id) {
                folder.set_ids.push(set_id.to_string());
            }
        }
        self.write(FOLDERS_KEY, &folders);
    }

    pub fn remove_set_from_folder(&self, folder_id: &str, set_id: &str) {
        debug!("detaching set {set_id} from folder {folder_id}");
        let mut folders = self.get_folders();
        if let Some(folder) = folders.iter_mut().find(|f| f.id == folder_id) {
            folder.set_ids.retain(|id| id != set_id);
        }
        self.write(FOLDERS_KEY, &folders);
    }

    // Groups

    pub fn get_groups(&self) -> Vec<Group> {
        self.read(GROUPS_KEY)
    }

    pub fn get_group_by_id(&self, id: &str) -> Option<Group> {
        self.get_groups().into_iter().find(|g| g.id == id)
    }

    /// Creates a group with the creator stored inline as its first member.
    /// Membership cannot partially fail here, unlike the remote two-step
    /// write, so the outcome is always complete.
    pub fn add_group(&self, draft: NewGroup) -> GroupCreated {
        let creator = self.get_current_user();
        let group = Group {
            id: generate_id(),
            name: draft.name,
            description: draft.description.unwrap_or_default(),
            school: draft.school.unwrap_or_default(),
            created_by: creator.as_ref().and_then(|u| u.id.clone()),
            set_ids: Vec::new(),
            members: creator
                .as_ref()
                .map(|u| vec![u.display_name().to_string()])
                .unwrap_or_default(),
            created_at: Utc::now(),
        };
        info!("adding group {} ({})", group.id, group.name);

        let mut groups = self.get_groups();
        groups.push(group.clone());
        self.write(GROUPS_KEY, &groups);
        GroupCreated::complete(group)
    }

    pub fn delete_group(&self, id: &str) {
        info!("deleting group {id}");
        let mut groups = self.get_groups();
        groups.retain(|g| g.id != id);
        self.write(GROUPS_KEY, &groups);
    }

    pub fn add_set_to_group(&self, group_id: &str, set_id: &str) {
        debug!("attaching set {set_id} to group {group_id}");
        let mut groups = self.get_groups();
        if let Some(group) = groups.iter_mut().find(|g| g.id == group_id) {
            if !group.set_ids.iter().any(|id| id == set_id) {
                group.set_ids.push(set_id.to_string());
            }
        }
        self.write(GROUPS_KEY, &groups);
    }

    pub fn add_member_to_group(&self, group_id: &str, username: &str) {
        debug!("adding member {username} to group {group_id}");
        let mut groups = self.get_groups();
        if let Some(group) = groups.iter_mut().find(|g| g.id == group_id) {
            if !group.members.iter().any(|m| m == username) {
                group.members.push(username.to_string());
            }
        }
        self.write(GROUPS_KEY, &groups);
    }

    // Auth stub. There is no real authentication locally: sign-in is a
    // credential lookup, the "current user" is a cached object.

    /// Checks the stored account list for an exact username/password match
    /// and caches the match as the current user.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let accounts: Vec<LocalAccount> = self.read(ACCOUNTS_KEY);
        match accounts
            .into_iter()
            .find(|a| a.username == email && a.password == password)
        {
            Some(account) => {
                let user = User::from(account);
                info!("local sign-in for {}", user.display_name());
                self.set_current_user(&user);
                Ok(user)
            }
            None => {
                debug!("local sign-in rejected for {email}");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Fabricates an unverified user and caches it as the current user.
    ///
    /// Intentional asymmetry: no credential is appended to the account list
    /// `sign_in` reads, so a user created here cannot later be authenticated
    /// through `sign_in`.
    pub fn sign_up(&self, email: &str, _password: &str, username: &str) -> Result<User, AuthError> {
        let user = User {
            id: None,
            email: email.to_string(),
            username: Some(username.to_string()),
            created_at: Some(Utc::now()),
        };
        info!("fabricated local user {username}");
        self.set_current_user(&user);
        Ok(user)
    }

    /// Seeds the account list `sign_in` reads. Account management pages write
    /// through this.
    pub fn register_account(&self, account: LocalAccount) {
        let mut accounts: Vec<LocalAccount> = self.read(ACCOUNTS_KEY);
        accounts.push(account);
        self.write(ACCOUNTS_KEY, &accounts);
    }

    pub fn get_current_user(&self) -> Option<User> {
        let raw = self.kv.get(CURRENT_USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn set_current_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => self.kv.set(CURRENT_USER_KEY, &raw),
            Err(err) => warn!("failed to serialize current user: {err}"),
        }
    }

    pub fn logout(&self) {
        info!("clearing local session");
        self.kv.remove(CURRENT_USER_KEY);
    }
}
