use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::availability::RemoteHandle;
use crate::constants::{FOLDERS_TABLE, GROUP_MEMBERS_TABLE, GROUPS_TABLE, SETS_TABLE};
use crate::error::AuthError;
use crate::models::{
    Folder, Group, GroupCreated, NewFolder, NewGroup, NewStudySet, StudySet, StudySetPatch, Term,
    User,
};
use crate::remote::{Filter, OrderBy, RemoteService};

/// Multi-user adapter over the hosted relational/auth service.
///
/// Rows come back in the service's column shape and are translated here into
/// the canonical entities. The `group_members` relation in particular never
/// leaves this module: callers only see the derived flat `members` list.
///
/// Membership-list updates are read-modify-write: the latest parent row is
/// re-fetched, the id list is unioned in memory, and the whole list written
/// back. That gives one caller a read-your-writes view of its own session but
/// no protection between concurrent writers; the consumed interface offers no
/// atomic array append, so last-writer-wins stands.
///
/// Service failures on CRUD paths are logged and absorbed into empty or
/// absent results. Only auth paths hand a structured error back to the
/// caller. An unavailable client degrades every operation to its default
/// immediately.
pub struct CloudStore {
    remote: Arc<RemoteHandle>,
}

// Row shapes as the service stores them. Translation into the canonical
// entities is the whole job of these types; nothing else sees column names.

#[derive(Deserialize)]
struct SetRow {
    id: String,
    #[serde(default)]
    user_id: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    terms: Option<Vec<Term>>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl From<SetRow> for StudySet {
    fn from(row: SetRow) -> Self {
        StudySet {
            id: row.id,
            owner_id: row.user_id,
            title: row.title,
            description: row.description,
            terms: row.terms.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Deserialize)]
struct FolderRow {
    id: String,
    #[serde(default)]
    user_id: Option<String>,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    set_ids: Option<Vec<String>>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl From<FolderRow> for Folder {
    fn from(row: FolderRow) -> Self {
        Folder {
            id: row.id,
            owner_id: row.user_id,
            name: row.name,
            description: row.description,
            set_ids: row.set_ids.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
struct GroupRow {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    school: String,
    #[serde(default)]
    created_by: Option<String>,
    #[serde(default)]
    set_ids: Option<Vec<String>>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl GroupRow {
    fn into_group(self, members: Vec<String>) -> Group {
        Group {
            id: self.id,
            name: self.name,
            description: self.description,
            school: self.school,
            created_by: self.created_by,
            set_ids: self.set_ids.unwrap_or_default(),
            members,
            created_at: self.created_at,
        }
    }
}

#[derive(Deserialize)]
struct MemberRow {
    group_id: String,
    #[serde(default)]
    username: String,
}

fn decode<T: DeserializeOwned>(row: Value) -> Option<T> {
    match serde_json::from_value(row) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!("dropping malformed row: {err}");
            None
        }
    }
}

impl CloudStore {
    pub fn new(remote: Arc<RemoteHandle>) -> Self {
        Self { remote }
    }

    fn client(&self) -> Option<Arc<dyn RemoteService>> {
        self.remote.client()
    }

    async fn session_user(&self, client: &Arc<dyn RemoteService>) -> Option<User> {
        match client.current_user().await {
            Ok(user) => user,
            Err(err) => {
                warn!("session lookup failed: {err}");
                None
            }
        }
    }

    // Sets

    pub async fn get_sets(&self) -> Vec<StudySet> {
        let Some(client) = self.client() else {
            return Vec::new();
        };
        match client
            .select(SETS_TABLE, None, Some(OrderBy::newest_first()))
            .await
        {
            Ok(rows) => rows
                .into_iter()
                .filter_map(decode::<SetRow>)
                .map(StudySet::from)
                .collect(),
            Err(err) => {
                warn!("listing sets failed: {err}");
                Vec::new()
            }
        }
    }

    pub async fn get_set_by_id(&self, id: &str) -> Option<StudySet> {
        let client = self.client()?;
        match client.select(SETS_TABLE, Some(Filter::eq("id", id)), None).await {
            Ok(rows) => rows
                .into_iter()
                .next()
                .and_then(decode::<SetRow>)
                .map(StudySet::from),
            Err(err) => {
                warn!("fetching set {id} failed: {err}");
                None
            }
        }
    }

    pub async fn add_set(&self, draft: NewStudySet) -> Option<StudySet> {
        let client = self.client()?;
        let Some(owner_id) = self.session_user(&client).await.and_then(|u| u.id) else {
            warn!("cannot add set without an active session");
            return None;
        };

        let row = json!({
            "user_id": owner_id,
            "title": draft.title,
            "description": draft.description.unwrap_or_default(),
            "terms": draft.terms.unwrap_or_default(),
        });
        debug!("inserting set for owner {owner_id}");
        match client.insert(SETS_TABLE, row).await {
            Ok(stored) => decode::<SetRow>(stored).map(StudySet::from),
            Err(err) => {
                warn!("inserting set failed: {err}");
                None
            }
        }
    }

    pub async fn update_set(&self, id: &str, patch: StudySetPatch) {
        let Some(client) = self.client() else {
            return;
        };
        let mut changes = serde_json::Map::new();
        if let Some(title) = patch.title {
            changes.insert("title".to_string(), Value::String(title));
        }
        if let Some(description) = patch.description {
            changes.insert("description".to_string(), Value::String(description));
        }
        if let Some(terms) = patch.terms {
            changes.insert("terms".to_string(), json!(terms));
        }
        changes.insert("updated_at".to_string(), json!(Utc::now()));

        if let Err(err) = client
            .update(SETS_TABLE, Filter::eq("id", id), Value::Object(changes))
            .await
        {
            warn!("updating set {id} failed: {err}");
        }
    }

    pub async fn delete_set(&self, id: &str) {
        let Some(client) = self.client() else {
            return;
        };
        if let Err(err) = client.delete(SETS_TABLE, Filter::eq("id", id)).await {
            warn!("deleting set {id} failed: {err}");
        }
    }

    // Folders

    pub async fn get_folders(&self) -> Vec<Folder> {
        let Some(client) = self.client() else {
            return Vec::new();
        };
        match client
            .select(FOLDERS_TABLE, None, Some(OrderBy::newest_first()))
            .await
        {
            Ok(rows) => rows
                .into_iter()
                .filter_map(decode::<FolderRow>)
                .map(Folder::from)
                .collect(),
            Err(err) => {
                warn!("listing folders failed: {err}");
                Vec::new()
            }
        }
    }

    pub async fn get_folder_by_id(&self, id: &str) -> Option<Folder> {
        let client = self.client()?;
        match client
            .select(FOLDERS_TABLE, Some(Filter::eq("id", id)), None)
            .await
        {
            Ok(rows) => rows
                .into_iter()
                .next()
                .and_then(decode::<FolderRow>)
                .map(Folder::from),
            Err(err) => {
                warn!("fetching folder {id} failed: {err}");
                None
            }
        }
    }

    pub async fn add_folder(&self, draft: NewFolder) -> Option<Folder> {
        let client = self.client()?;
        let Some(owner_id) = self.session_user(&client).await.and_then(|u| u.id) else {
            warn!("cannot add folder without an active session");
            return None;
        };

        let row = json!({
            "user_id": owner_id,
            "name": draft.name,
            "description": draft.description.unwrap_or_default(),
            "set_ids": [],
        });
        match client.insert(FOLDERS_TABLE, row).await {
            Ok(stored) => decode::<FolderRow>(stored).map(Folder::from),
            Err(err) => {
                warn!("inserting folder failed: {err}");
                None
            }
        }
    }

    pub async fn delete_folder(&self, id: &str) {
        let Some(client) = self.client() else {
            return;
        };
        if let Err(err) = client.delete(FOLDERS_TABLE, Filter::eq("id", id)).await {
            warn!("deleting folder {id} failed: {err}");
        }
    }

    /// Re-reads the folder, unions the id in memory, and writes the whole
    /// list back. Skips the write when the id is already present.
    pub async fn add_set_to_folder(&self, folder_id: &str, set_id: &str) {
        let Some(client) = self.client() else {
            return;
        };
        let Some(folder) = self.get_folder_by_id(folder_id).await else {
            return;
        };
        if folder.set_ids.iter().any(|id| id == set_id) {
            return;
        }

        let mut set_ids = folder.set_ids;
        set_ids.push(set_id.to_string());
        if let Err(err) = client
            .update(
                FOLDERS_TABLE,
                Filter::eq("id", folder_id),
                json!({ "set_ids": set_ids }),
            )
            .await
        {
            warn!("attaching set {set_id} to folder {folder_id} failed: {err}");
        }
    }

    pub async fn remove_set_from_folder(&self, folder_id: &str, set_id: &str) {
        let Some(client) = self.client() else {
            return;
        };
        let Some(folder) = self.get_folder_by_id(folder_id).await else {
            return;
        };

        let set_ids: Vec<String> = folder
            .set_ids
            .into_iter()
            .filter(|id| id != set_id)
            .collect();
        if let Err(err) = client
            .update(
                FOLDERS_TABLE,
                Filter::eq("id", folder_id),
                json!({ "set_ids": set_ids }),
            )
            .await
        {
            warn!("detaching set {set_id} from folder {folder_id} failed: {err}");
        }
    }

    // Groups

    pub async fn get_groups(&self) -> Vec<Group> {
        let Some(client) = self.client() else {
            return Vec::new();
        };
        let rows = match client
            .select(GROUPS_TABLE, None, Some(OrderBy::newest_first()))
            .await
        {
            Ok(rows) => rows,
            Err(err) => {
                warn!("listing groups failed: {err}");
                return Vec::new();
            }
        };
        let memberships = match client.select(GROUP_MEMBERS_TABLE, None, None).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!("listing group members failed: {err}");
                Vec::new()
            }
        };

        let mut members_by_group: HashMap<String, Vec<String>> = HashMap::new();
        for member in memberships.into_iter().filter_map(decode::<MemberRow>) {
            members_by_group
                .entry(member.group_id)
                .or_default()
                .push(member.username);
        }

        rows.into_iter()
            .filter_map(decode::<GroupRow>)
            .map(|row| {
                let members = members_by_group.remove(&row.id).unwrap_or_default();
                row.into_group(members)
            })
            .collect()
    }

    pub async fn get_group_by_id(&self, id: &str) -> Option<Group> {
        let client = self.client()?;
        let row = match client
            .select(GROUPS_TABLE, Some(Filter::eq("id", id)), None)
            .await
        {
            Ok(rows) => rows.into_iter().next()?,
            Err(err) => {
                warn!("fetching group {id} failed: {err}");
                return None;
            }
        };
        let members = self.group_members(&client, id).await;
        decode::<GroupRow>(row).map(|r| r.into_group(members))
    }

    async fn group_members(&self, client: &Arc<dyn RemoteService>, group_id: &str) -> Vec<String> {
        match client
            .select(
                GROUP_MEMBERS_TABLE,
                Some(Filter::eq("group_id", group_id)),
                None,
            )
            .await
        {
            Ok(rows) => rows
                .into_iter()
                .filter_map(decode::<MemberRow>)
                .map(|m| m.username)
                .collect(),
            Err(err) => {
                warn!("listing members of group {group_id} failed: {err}");
                Vec::new()
            }
        }
    }

    /// Two-step create: the group row, then the creator's membership row.
    /// The service offers no transaction across the inserts, so a failed
    /// second step leaves a member-less group behind; that outcome is
    /// reported through `membership_error` instead of being swallowed.
    pub async fn add_group(&self, draft: NewGroup) -> Option<GroupCreated> {
        let client = self.client()?;
        let Some(user) = self.session_user(&client).await else {
            warn!("cannot add group without an active session");
            return None;
        };
        let Some(creator_id) = user.id.clone() else {
            warn!("session user has no id, cannot stamp group ownership");
            return None;
        };

        let row = json!({
            "name": draft.name,
            "description": draft.description.unwrap_or_default(),
            "school": draft.school.unwrap_or_default(),
            "created_by": creator_id,
            "set_ids": [],
        });
        let stored = match client.insert(GROUPS_TABLE, row).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!("inserting group failed: {err}");
                return None;
            }
        };
        let group_row = decode::<GroupRow>(stored)?;

        let username = user.display_name().to_string();
        let membership = json!({
            "group_id": group_row.id,
            "user_id": creator_id,
            "username": username,
        });
        match client.insert(GROUP_MEMBERS_TABLE, membership).await {
            Ok(_) => {
                info!("group {} created with creator membership", group_row.id);
                Some(GroupCreated::complete(group_row.into_group(vec![username])))
            }
            Err(err) => {
                warn!(
                    "group {} created but creator membership failed: {err}",
                    group_row.id
                );
                Some(GroupCreated {
                    group: group_row.into_group(Vec::new()),
                    membership_error: Some(err),
                })
            }
        }
    }

    pub async fn delete_group(&self, id: &str) {
        let Some(client) = self.client() else {
            return;
        };
        if let Err(err) = client.delete(GROUPS_TABLE, Filter::eq("id", id)).await {
            warn!("deleting group {id} failed: {err}");
        }
    }

    pub async fn add_set_to_group(&self, group_id: &str, set_id: &str) {
        let Some(client) = self.client() else {
            return;
        };
        let Some(group) = self.get_group_by_id(group_id).await else {
            return;
        };
        if group.set_ids.iter().any(|id| id == set_id) {
            return;
        }

        let mut set_ids = group.set_ids;
        set_ids.push(set_id.to_string());
        if let Err(err) = client
            .update(
                GROUPS_TABLE,
                Filter::eq("id", group_id),
                json!({ "set_ids": set_ids }),
            )
            .await
        {
            warn!("attaching set {set_id} to group {group_id} failed: {err}");
        }
    }

    /// Inserts a membership row for `username`, stamped with the current
    /// session's user id when one exists.
    pub async fn add_member_to_group(&self, group_id: &str, username: &str) {
        let Some(client) = self.client() else {
            return;
        };
        let user_id = self.session_user(&client).await.and_then(|u| u.id);
        let row = json!({
            "group_id": group_id,
            "user_id": user_id,
            "username": username,
        });
        if let Err(err) = client.insert(GROUP_MEMBERS_TABLE, row).await {
            warn!("adding member {username} to group {group_id} failed: {err}");
        }
    }

    // Auth. Fully delegated to the service's session mechanism; this adapter
    // holds no credentials and no tokens.

    pub async fn get_current_user(&self) -> Option<User> {
        let client = self.client()?;
        self.session_user(&client).await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<User, AuthError> {
        let Some(client) = self.client() else {
            return Err(AuthError::Unconfigured);
        };
        client
            .sign_up(email, password, json!({ "username": username }))
            .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some(client) = self.client() else {
            return Err(AuthError::Unconfigured);
        };
        client.sign_in(email, password).await
    }

    pub async fn sign_out(&self) {
        let Some(client) = self.client() else {
            return;
        };
        if let Err(err) = client.sign_out().await {
            warn!("sign-out failed: {err}");
        }
    }
}
