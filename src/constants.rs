//! Fixed storage keys and table names shared by both backends.

// Local storage keys. Each holds one JSON-serialized collection, except the
// current-user slot which holds a single object.
pub const SETS_KEY: &str = "fuizlet_sets";
pub const FOLDERS_KEY: &str = "fuizlet_folders";
pub const GROUPS_KEY: &str = "fuizlet_groups";
pub const ACCOUNTS_KEY: &str = "fuizlet_users";
pub const CURRENT_USER_KEY: &str = "fuizlet_current_user";

// Remote table names.
pub const SETS_TABLE: &str = "study_sets";
pub const FOLDERS_TABLE: &str = "folders";
pub const GROUPS_TABLE: &str = "groups";
pub const GROUP_MEMBERS_TABLE: &str = "group_members";
