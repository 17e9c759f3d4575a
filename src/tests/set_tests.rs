use crate::kv::{InMemoryKv, KeyValueStore};
use crate::models::{NewStudySet, StudySetPatch, Term};
use crate::store::LocalStore;
use crate::tests::{local_store, signed_in_cloud_store};

#[tokio::test]
async fn add_set_defaults_terms_to_empty_local() {
    let store = local_store();

    let set = store
        .add_set(NewStudySet::titled("Biology"))
        .await
        .unwrap();
    assert!(set.terms.is_empty());

    let fetched = store.get_set_by_id(&set.id).await.unwrap();
    assert!(fetched.terms.is_empty());
}

#[tokio::test]
async fn add_set_defaults_terms_to_empty_cloud() {
    let (store, _service, _user) = signed_in_cloud_store().await;

    let set = store
        .add_set(NewStudySet::titled("Biology"))
        .await
        .unwrap();
    let fetched = store.get_set_by_id(&set.id).await.unwrap();
    assert!(fetched.terms.is_empty());
}

#[tokio::test]
async fn partial_update_preserves_other_fields_local() {
    let store = local_store();

    let set = store
        .add_set(NewStudySet {
            title: "A".to_string(),
            description: Some("B".to_string()),
            terms: None,
        })
        .await
        .unwrap();

    store
        .update_set(
            &set.id,
            StudySetPatch {
                title: Some("C".to_string()),
                ..StudySetPatch::default()
            },
        )
        .await;

    let updated = store.get_set_by_id(&set.id).await.unwrap();
    assert_eq!(updated.title, "C");
    assert_eq!(updated.description, "B");
    assert_eq!(updated.id, set.id);
}

#[tokio::test]
async fn partial_update_preserves_other_fields_cloud() {
    let (store, _service, _user) = signed_in_cloud_store().await;

    let set = store
        .add_set(NewStudySet {
            title: "A".to_string(),
            description: Some("B".to_string()),
            terms: Some(vec![Term::new("mitosis", "cell division")]),
        })
        .await
        .unwrap();

    store
        .update_set(
            &set.id,
            StudySetPatch {
                title: Some("C".to_string()),
                ..StudySetPatch::default()
            },
        )
        .await;

    let updated = store.get_set_by_id(&set.id).await.unwrap();
    assert_eq!(updated.title, "C");
    assert_eq!(updated.description, "B");
    assert_eq!(updated.terms.len(), 1);
}

#[tokio::test]
async fn unknown_set_id_returns_none() {
    let store = local_store();
    assert!(store.get_set_by_id("nonexistent").await.is_none());

    let (cloud, _service, _user) = signed_in_cloud_store().await;
    assert!(cloud.get_set_by_id("nonexistent").await.is_none());
}

#[tokio::test]
async fn delete_set_removes_it() {
    let store = local_store();

    let set = store.add_set(NewStudySet::titled("Chemistry")).await.unwrap();
    assert_eq!(store.get_sets().await.len(), 1);

    store.delete_set(&set.id).await;
    assert!(store.get_sets().await.is_empty());
    assert!(store.get_set_by_id(&set.id).await.is_none());
}

#[tokio::test]
async fn cloud_add_set_stamps_owner() {
    let (store, _service, user) = signed_in_cloud_store().await;

    let set = store.add_set(NewStudySet::titled("Physics")).await.unwrap();
    assert_eq!(set.owner_id, user.id);
}

#[tokio::test]
async fn update_unknown_set_is_a_no_op() {
    let store = local_store();
    let set = store.add_set(NewStudySet::titled("Kept")).await.unwrap();

    store
        .update_set(
            "nonexistent",
            StudySetPatch {
                title: Some("Changed".to_string()),
                ..StudySetPatch::default()
            },
        )
        .await;

    assert_eq!(store.get_set_by_id(&set.id).await.unwrap().title, "Kept");
}

#[test]
fn corrupt_collection_reads_as_empty() {
    let kv = InMemoryKv::new();
    kv.set("fuizlet_sets", "{ not json at all");
    let local = LocalStore::new(kv);
    assert!(local.get_sets().is_empty());
}
