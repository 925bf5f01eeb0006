//! Bearer authentication and the one-shot refresh policy.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use tillpoint_client::ApiError;
use tillpoint_client::session::{AuthPhase, PersistedSession};
use tillpoint_client::types::ProductFilters;
use tillpoint_integration_tests::{
    INITIAL_ACCESS, MockApi, REFRESH_TOKEN, RefreshMode, password, product_record,
};

async fn mock_with_products() -> MockApi {
    MockApi::start(vec![
        product_record(uuid::Uuid::new_v4(), "Shea butter", "15.00", 5),
        product_record(uuid::Uuid::new_v4(), "Black soap", "4.50", 40),
    ])
    .await
}

#[tokio::test]
async fn test_valid_token_needs_no_refresh() {
    let mock = mock_with_products().await;
    let (client, _) = mock.client(Some(INITIAL_ACCESS), Some(REFRESH_TOKEN));

    let page = client.list_products(&ProductFilters::default()).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(mock.refresh_calls(), 0);
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once_and_replayed() {
    let mock = mock_with_products().await;
    let (client, store) = mock.client(Some("stale"), Some(REFRESH_TOKEN));

    let page = client.list_products(&ProductFilters::default()).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(mock.refresh_calls(), 1);
    assert_eq!(
        mock.state
            .product_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        2
    );
    assert_eq!(store.snapshot().access_token.as_deref(), Some("access-1"));
    assert_eq!(store.snapshot().refresh_token.as_deref(), Some(REFRESH_TOKEN));
    assert_eq!(client.session().phase().await, AuthPhase::Authenticated);
}

#[tokio::test]
async fn test_rejected_replay_is_not_refreshed_again() {
    let mock = mock_with_products().await;
    mock.set_refresh_mode(RefreshMode::IssueRejected);
    let (client, store) = mock.client(Some("stale"), Some(REFRESH_TOKEN));

    let err = client
        .list_products(&ProductFilters::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ReauthenticationRequired));
    assert_eq!(mock.refresh_calls(), 1);
    assert_eq!(client.session().phase().await, AuthPhase::LoggedOut);
    assert_eq!(store.snapshot(), PersistedSession::default());
}

#[tokio::test]
async fn test_missing_refresh_token_forces_logout() {
    let mock = mock_with_products().await;
    let (client, store) = mock.client(Some("stale"), None);

    let err = client
        .list_products(&ProductFilters::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ReauthenticationRequired));
    assert_eq!(mock.refresh_calls(), 0);
    assert!(!client.session().is_authenticated().await);
    assert_eq!(store.snapshot(), PersistedSession::default());
}

#[tokio::test]
async fn test_failed_refresh_forces_logout() {
    let mock = mock_with_products().await;
    mock.set_refresh_mode(RefreshMode::Fail);
    let (client, store) = mock.client(Some("stale"), Some(REFRESH_TOKEN));

    let err = client
        .list_products(&ProductFilters::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ReauthenticationRequired));
    assert_eq!(mock.refresh_calls(), 1);
    assert_eq!(store.snapshot(), PersistedSession::default());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_unauthorized_requests_share_one_refresh() {
    let mock = mock_with_products().await;
    mock.set_refresh_delay(Duration::from_millis(100));
    let (client, _) = mock.client(Some("stale"), Some(REFRESH_TOKEN));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.list_products(&ProductFilters::default()).await })
        })
        .collect();

    for task in tasks {
        let page = task.await.unwrap().unwrap();
        assert_eq!(page.items.len(), 2);
    }
    assert_eq!(mock.refresh_calls(), 1);
}

#[tokio::test]
async fn test_cancelled_refresh_leaves_session_usable() {
    let mock = mock_with_products().await;
    mock.set_refresh_delay(Duration::from_secs(5));
    let (client, _) = mock.client(Some("stale"), Some(REFRESH_TOKEN));

    let pending = tokio::spawn({
        let client = client.clone();
        async move { client.list_products(&ProductFilters::default()).await }
    });
    while mock.refresh_calls() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(client.session().phase().await, AuthPhase::Refreshing);

    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());
    assert_eq!(client.session().phase().await, AuthPhase::Authenticated);

    mock.set_refresh_delay(Duration::ZERO);
    let page = client.list_products(&ProductFilters::default()).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(mock.refresh_calls(), 2);
    assert_eq!(client.session().phase().await, AuthPhase::Authenticated);
}

#[tokio::test]
async fn test_other_errors_pass_through_without_refresh() {
    let mock = mock_with_products().await;
    let (client, _) = mock.client(Some(INITIAL_ACCESS), Some(REFRESH_TOKEN));

    let err = client
        .get_product(tillpoint_core::ProductId::random())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("Not found."));
    assert_eq!(mock.refresh_calls(), 0);
    assert!(client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_login_persists_credentials_and_profile() {
    let mock = mock_with_products().await;
    let (client, store) = mock.client(None, None);
    assert_eq!(client.session().phase().await, AuthPhase::LoggedOut);

    let user = client.login("cashier1", &password()).await.unwrap();

    assert_eq!(user.username, "cashier1");
    assert_eq!(user.display_name(), "Ama Mensah");
    let persisted = store.snapshot();
    assert_eq!(persisted.access_token.as_deref(), Some(INITIAL_ACCESS));
    assert_eq!(persisted.refresh_token.as_deref(), Some(REFRESH_TOKEN));
    assert_eq!(persisted.user.map(|u| u.username).as_deref(), Some("cashier1"));

    mock.expire_access_token();
    let again = client.profile().await.unwrap();
    assert_eq!(again.id, user.id);
    assert_eq!(mock.refresh_calls(), 1);
    assert_eq!(store.snapshot().access_token.as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_bad_login_is_not_treated_as_expiry() {
    let mock = mock_with_products().await;
    let (client, _) = mock.client(None, None);

    let err = client
        .login("cashier1", &secrecy::SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
    assert!(err.to_string().contains("No active account"));
    assert_eq!(mock.refresh_calls(), 0);
}

#[tokio::test]
async fn test_logout_clears_local_state() {
    let mock = mock_with_products().await;
    let (client, store) = mock.client(Some(INITIAL_ACCESS), Some(REFRESH_TOKEN));

    client.logout().await;

    assert!(!client.session().is_authenticated().await);
    assert_eq!(store.snapshot(), PersistedSession::default());
}
