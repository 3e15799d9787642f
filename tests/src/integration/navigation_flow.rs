//! Guarded navigation against a live session and the gateway's profile.

use shared_types::routes::{ROUTE_ACCESS_DENIED, ROUTE_COMPLETE_PROFILE, ROUTE_DASHBOARD, ROUTE_LOGIN};
use tc_01_session::testing::ScriptedIdentityProvider;

use super::fixtures::{tokens, Harness, PROFILE_ME};

async fn signed_in(username: &str, roles: &[&str]) -> Harness {
    let harness =
        Harness::start(ScriptedIdentityProvider::new().with_password(tokens(username, roles))).await;
    harness.runtime.login(username, "pw").await.unwrap();
    harness
}

#[tokio::test]
async fn test_signed_out_user_sent_to_login() {
    let harness = Harness::start(ScriptedIdentityProvider::new()).await;
    harness.runtime.boot().await;

    let landed = harness.container().router.navigate("/claims/submit").await.unwrap();

    assert_eq!(landed, ROUTE_LOGIN);
    assert!(harness.gateway.authorizations(PROFILE_ME).is_empty());
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_missing_profile_sends_user_to_completion() {
    let harness = signed_in("bob", &["user"]).await;
    harness.gateway.set_profile(None);

    let landed = harness.container().router.navigate("/claims/submit").await.unwrap();

    assert_eq!(landed, ROUTE_COMPLETE_PROFILE);
    assert_eq!(harness.runtime.current_route(), ROUTE_COMPLETE_PROFILE);
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_profile_completion_unlocks_claims() {
    let harness = signed_in("bob", &["user"]).await;
    let router = harness.container().router.clone();

    harness.gateway.set_profile_completed(false);
    assert_eq!(router.navigate("/claims/submit").await.unwrap(), ROUTE_COMPLETE_PROFILE);

    harness.gateway.set_profile_completed(true);
    assert_eq!(router.navigate("/claims/submit").await.unwrap(), "/claims/submit");
    assert_eq!(harness.runtime.current_route(), "/claims/submit");
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_admin_area_and_user_area_are_separate() {
    let user = signed_in("bob", &["user"]).await;
    assert_eq!(user.container().router.navigate("/admin/claims").await.unwrap(), ROUTE_DASHBOARD);
    user.runtime.shutdown().await;

    let admin = signed_in("ada", &["admin"]).await;
    let router = admin.container().router.clone();
    assert_eq!(router.navigate("/admin/claims").await.unwrap(), "/admin/claims");
    assert_eq!(router.navigate("/claims").await.unwrap(), ROUTE_ACCESS_DENIED);
    assert_eq!(router.navigate("/policies/car").await.unwrap(), ROUTE_ACCESS_DENIED);
    admin.runtime.shutdown().await;
}

#[tokio::test]
async fn test_role_guard_runs_before_profile_lookup() {
    let admin = signed_in("ada", &["admin"]).await;

    admin.container().router.navigate("/claims").await.unwrap();

    assert!(admin.gateway.authorizations(PROFILE_ME).is_empty());
    admin.runtime.shutdown().await;
}
