use crate::error::AuthError;
use crate::models::LocalAccount;
use crate::tests::{cloud_store, local_store};

#[tokio::test]
async fn local_sign_in_matches_seeded_account() {
    let store = local_store();
    store.local().register_account(LocalAccount {
        username: "ada".to_string(),
        password: "correct horse".to_string(),
        email: "ada@example.com".to_string(),
    });

    let user = store.sign_in("ada", "correct horse").await.unwrap();
    assert_eq!(user.display_name(), "ada");
    assert_eq!(
        store.get_current_user().await.unwrap().display_name(),
        "ada"
    );
}

#[tokio::test]
async fn local_sign_in_rejects_wrong_password() {
    let store = local_store();
    store.local().register_account(LocalAccount {
        username: "ada".to_string(),
        password: "correct horse".to_string(),
        email: "ada@example.com".to_string(),
    });

    let result = store.sign_in("ada", "wrong").await;
    assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    assert!(store.get_current_user().await.is_none());
}

#[tokio::test]
async fn local_sign_up_caches_an_unverified_user() {
    let store = local_store();

    let user = store
        .sign_up("grace@example.com", "pw", "grace")
        .await
        .unwrap();
    assert!(user.id.is_none());

    let current = store.get_current_user().await.unwrap();
    assert_eq!(current.display_name(), "grace");
}

// Intentional asymmetry: local sign-up never persists a credential the local
// sign-in lookup can find.
#[tokio::test]
async fn local_sign_up_is_not_visible_to_sign_in() {
    let store = local_store();

    store
        .sign_up("grace@example.com", "pw", "grace")
        .await
        .unwrap();
    store.logout().await;

    let result = store.sign_in("grace", "pw").await;
    assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
}

#[tokio::test]
async fn local_logout_clears_the_session() {
    let store = local_store();
    store.sign_up("ada@example.com", "pw", "ada").await.unwrap();

    store.logout().await;
    assert!(store.get_current_user().await.is_none());
}

#[tokio::test]
async fn cloud_sign_up_creates_a_session_with_id() {
    let (store, _service) = cloud_store();

    let user = store
        .sign_up("ada@example.com", "correct horse", "ada")
        .await
        .unwrap();
    assert!(user.id.is_some());
    assert_eq!(user.username.as_deref(), Some("ada"));

    let current = store.get_current_user().await.unwrap();
    assert_eq!(current.id, user.id);
}

#[tokio::test]
async fn cloud_sign_in_rejects_invalid_credentials() {
    let (store, _service) = cloud_store();
    store
        .sign_up("ada@example.com", "correct horse", "ada")
        .await
        .unwrap();
    store.logout().await;

    let result = store.sign_in("ada@example.com", "wrong").await;
    assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);

    let user = store.sign_in("ada@example.com", "correct horse").await.unwrap();
    assert_eq!(user.email, "ada@example.com");
}

#[tokio::test]
async fn cloud_sign_up_rejects_duplicate_email() {
    let (store, _service) = cloud_store();
    store
        .sign_up("ada@example.com", "pw", "ada")
        .await
        .unwrap();

    let result = store.sign_up("ada@example.com", "other", "ada2").await;
    assert!(matches!(result, Err(AuthError::Service(_))));
}

#[tokio::test]
async fn cloud_logout_clears_the_session() {
    let (store, _service) = cloud_store();
    store.sign_up("ada@example.com", "pw", "ada").await.unwrap();

    store.logout().await;
    assert!(store.get_current_user().await.is_none());
}
