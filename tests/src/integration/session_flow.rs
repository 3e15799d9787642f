//! Session lifecycle seen from the outside: landing routes, bearer
//! attachment on gateway calls, logout and the token file.

use std::sync::Arc;

use reqwest::Method;
use shared_types::routes::{ROUTE_DASHBOARD, ROUTE_HELLO_ADMIN, ROUTE_LOGIN};
use tc_01_session::testing::ScriptedIdentityProvider;
use tc_01_session::{FileTokenStore, MemoryTokenStore, SessionApi, TokenStore};

use super::fixtures::{spawn_foreign_origin, tokens, Harness, MY_CLAIMS};

#[tokio::test]
async fn test_login_lands_by_role() {
    let user = Harness::start(ScriptedIdentityProvider::new().with_password(tokens("bob", &["user"]))).await;
    user.runtime.login("bob", "pw").await.unwrap();
    assert_eq!(user.runtime.current_route(), ROUTE_DASHBOARD);
    user.runtime.shutdown().await;

    let admin = Harness::start(ScriptedIdentityProvider::new().with_password(tokens("ada", &["admin"]))).await;
    admin.runtime.login("ada", "pw").await.unwrap();
    assert_eq!(admin.runtime.current_route(), ROUTE_HELLO_ADMIN);
    admin.runtime.shutdown().await;
}

#[tokio::test]
async fn test_gateway_calls_carry_bearer() {
    let harness = Harness::start(ScriptedIdentityProvider::new().with_password(tokens("bob", &["user"]))).await;
    let container = harness.container();

    container.claims.my_claims().await.unwrap();
    assert_eq!(harness.gateway.authorizations(MY_CLAIMS), vec![None]);

    harness.runtime.login("bob", "pw").await.unwrap();
    let token = container.session.get_token();
    container.claims.my_claims().await.unwrap();

    let last = harness.gateway.authorizations(MY_CLAIMS).last().cloned().flatten();
    assert_eq!(last, Some(format!("Bearer {token}")));
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_foreign_origin_gets_no_bearer() {
    let harness = Harness::start(ScriptedIdentityProvider::new().with_password(tokens("bob", &["user"]))).await;
    harness.runtime.login("bob", "pw").await.unwrap();
    let container = harness.container();

    let foreign = spawn_foreign_origin().await;
    let request = reqwest::Request::new(Method::GET, foreign.join("echo").unwrap());
    let response = container.http.send(request).await.unwrap();

    assert_eq!(response.text().await.unwrap(), "none");
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_logout_stops_attaching_bearer() {
    let store = Arc::new(MemoryTokenStore::new());
    let harness = Harness::with_store(
        ScriptedIdentityProvider::new().with_password(tokens("bob", &["user"])),
        store.clone(),
    )
    .await;
    let container = harness.container();

    harness.runtime.login("bob", "pw").await.unwrap();
    assert!(store.snapshot().is_some());

    container.session.logout().await;

    assert!(store.snapshot().is_none());
    assert_eq!(harness.runtime.current_route(), ROUTE_LOGIN);
    container.claims.my_claims().await.unwrap();
    assert_eq!(harness.gateway.authorizations(MY_CLAIMS).last().cloned().flatten(), None);
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_failed_login_leaves_no_trace() {
    let store = Arc::new(MemoryTokenStore::new());
    let harness = Harness::with_store(ScriptedIdentityProvider::new().rejecting_password(401), store.clone()).await;

    assert!(harness.runtime.login("bob", "wrong").await.is_err());

    assert_eq!(store.writes(), 0);
    assert!(!harness.container().session.is_authenticated());
    assert_eq!(harness.broker.connections(), 0);
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_token_file_written_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");
    let store = Arc::new(FileTokenStore::new(&path));
    let harness = Harness::with_store(
        ScriptedIdentityProvider::new().with_password(tokens("bob", &["user"])),
        store.clone(),
    )
    .await;

    harness.runtime.login("bob", "pw").await.unwrap();

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["refreshToken"], "bob-refresh");
    assert_eq!(
        store.load().unwrap().map(|t| t.access_token),
        Some(harness.container().session.get_token())
    );

    harness.container().session.logout().await;
    assert!(!path.exists());
    harness.runtime.shutdown().await;
}
