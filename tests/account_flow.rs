//! Registration, login and logout tests.

mod common;

use common::{setup_app, PASSWORD};
use corkboard::{AuthorizationError, CorkboardError, RegistrationRequest};

#[tokio::test]
async fn test_register_login_logout() {
    let t = setup_app().await;
    let accounts = t.app.accounts();

    let user = accounts
        .register(RegistrationRequest::new("carol_1", PASSWORD).with_email("carol@example.com"))
        .await
        .unwrap();

    let session = t.app.sessions().open().await;
    assert!(!t.app.sessions().get(&session).await.is_authenticated());

    accounts.login(&session, "CAROL_1", PASSWORD).await.unwrap();
    assert_eq!(t.app.sessions().get(&session).await.user_id(), Some(user.id));
    assert_eq!(accounts.get_account(&session).await.unwrap(), user);

    assert!(accounts.logout(&session).await);
    assert!(!t.app.sessions().get(&session).await.is_authenticated());
    assert!(matches!(
        accounts.get_account(&session).await,
        Err(CorkboardError::Authorization(AuthorizationError::NotAuthenticated))
    ));
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let t = setup_app().await;
    t.login_new_user("carol").await;

    let result = t
        .app
        .accounts()
        .register(RegistrationRequest::new("Carol", "another-password"))
        .await;
    assert!(matches!(result, Err(CorkboardError::Validation(_))));
}

#[tokio::test]
async fn test_wrong_password_keeps_session_anonymous() {
    let t = setup_app().await;
    t.login_new_user("carol").await;

    let session = t.app.sessions().open().await;
    let result = t.app.accounts().login(&session, "carol", "wrong-password").await;
    assert!(matches!(
        result,
        Err(CorkboardError::Authorization(AuthorizationError::InvalidCredentials))
    ));
    assert!(!t.app.sessions().get(&session).await.is_authenticated());
}
