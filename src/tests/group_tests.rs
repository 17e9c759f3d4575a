use serde_json::json;

use crate::constants::{GROUP_MEMBERS_TABLE, GROUPS_TABLE};
use crate::models::NewGroup;
use crate::remote::RemoteService;
use crate::tests::{local_store, signed_in_cloud_store};

#[tokio::test]
async fn creator_is_a_member_after_creation_local() {
    let store = local_store();
    store.sign_up("ada@example.com", "pw", "ada").await.unwrap();

    let created = store.add_group(NewGroup::named("Study Club")).await.unwrap();
    assert!(created.is_complete());

    let group = store.get_group_by_id(&created.group.id).await.unwrap();
    assert!(group.members.contains(&"ada".to_string()));
}

#[tokio::test]
async fn creator_is_a_member_after_creation_cloud() {
    let (store, service, user) = signed_in_cloud_store().await;

    let created = store.add_group(NewGroup::named("Study Club")).await.unwrap();
    assert!(created.is_complete());
    assert_eq!(created.group.created_by, user.id);

    let group = store.get_group_by_id(&created.group.id).await.unwrap();
    assert!(group.members.contains(&"ada".to_string()));
    assert_eq!(service.row_count(GROUP_MEMBERS_TABLE).await, 1);
}

#[tokio::test]
async fn failed_membership_step_is_surfaced_not_swallowed() {
    let (store, service, _user) = signed_in_cloud_store().await;
    service.fail_inserts_into(GROUP_MEMBERS_TABLE).await;

    let created = store.add_group(NewGroup::named("Half Made")).await.unwrap();
    assert!(!created.is_complete());
    assert!(created.membership_error.is_some());

    // The group row exists even though the membership step failed.
    let group = store.get_group_by_id(&created.group.id).await.unwrap();
    assert_eq!(group.name, "Half Made");
    assert!(group.members.is_empty());
}

#[tokio::test]
async fn add_member_appears_in_derived_members_cloud() {
    let (store, _service, _user) = signed_in_cloud_store().await;

    let created = store.add_group(NewGroup::named("Peers")).await.unwrap();
    store.add_member_to_group(&created.group.id, "grace").await;

    let group = store.get_group_by_id(&created.group.id).await.unwrap();
    assert!(group.members.contains(&"ada".to_string()));
    assert!(group.members.contains(&"grace".to_string()));
}

#[tokio::test]
async fn add_member_twice_keeps_one_entry_local() {
    let store = local_store();
    store.sign_up("ada@example.com", "pw", "ada").await.unwrap();

    let created = store.add_group(NewGroup::named("Peers")).await.unwrap();
    store.add_member_to_group(&created.group.id, "grace").await;
    store.add_member_to_group(&created.group.id, "grace").await;

    let group = store.get_group_by_id(&created.group.id).await.unwrap();
    let count = group.members.iter().filter(|m| *m == "grace").count();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn attaching_same_set_twice_keeps_one_entry_in_group() {
    let (store, _service, _user) = signed_in_cloud_store().await;
    let created = store.add_group(NewGroup::named("Shared")).await.unwrap();

    store.add_set_to_group(&created.group.id, "set-3").await;
    store.add_set_to_group(&created.group.id, "set-3").await;

    let group = store.get_group_by_id(&created.group.id).await.unwrap();
    assert_eq!(group.set_ids, vec!["set-3".to_string()]);
}

#[tokio::test]
async fn group_listing_derives_members_per_group() {
    let (store, _service, _user) = signed_in_cloud_store().await;

    let first = store.add_group(NewGroup::named("First")).await.unwrap();
    let second = store.add_group(NewGroup::named("Second")).await.unwrap();
    store.add_member_to_group(&second.group.id, "grace").await;

    let groups = store.get_groups().await;
    assert_eq!(groups.len(), 2);

    let first = groups.iter().find(|g| g.id == first.group.id).unwrap();
    let second = groups.iter().find(|g| g.id == second.group.id).unwrap();
    assert_eq!(first.members, vec!["ada".to_string()]);
    assert!(second.members.contains(&"grace".to_string()));
}

#[tokio::test]
async fn null_columns_normalize_to_defaults() {
    let (store, service, _user) = signed_in_cloud_store().await;

    // A row written by another client, with optional columns missing.
    service
        .insert(
            GROUPS_TABLE,
            json!({ "name": "Sparse", "created_by": "someone-else" }),
        )
        .await
        .unwrap();

    let group = store
        .get_groups()
        .await
        .into_iter()
        .find(|g| g.name == "Sparse")
        .unwrap();
    assert_eq!(group.set_ids, Vec::<String>::new());
    assert_eq!(group.members, Vec::<String>::new());
    assert_eq!(group.school, "");
    assert_eq!(group.description, "");
}

#[tokio::test]
async fn delete_group_removes_it() {
    let (store, _service, _user) = signed_in_cloud_store().await;
    let created = store.add_group(NewGroup::named("Doomed")).await.unwrap();

    store.delete_group(&created.group.id).await;
    assert!(store.get_group_by_id(&created.group.id).await.is_none());
}
