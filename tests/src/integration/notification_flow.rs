//! The live channel follows the session: open while signed in, closed and
//! emptied after logout.

use std::sync::Arc;
use std::time::Duration;

use client_runtime::{ClientContainer, ClientRuntime};
use shared_types::notification::NotificationStatus::{Read, Unread};
use tc_01_session::testing::ScriptedIdentityProvider;
use tc_01_session::{MemoryTokenStore, SessionApi};
use tc_04_notifications::{Command, NotificationChannelApi};

use super::fixtures::{eventually, notification, tokens, Harness, MY_NOTIFICATIONS, READ_ALL};

async fn signed_in_bob() -> Harness {
    let harness =
        Harness::start(ScriptedIdentityProvider::new().with_password(tokens("bob", &["user"]))).await;
    harness
        .gateway
        .set_notifications(vec![notification(2, "bob-id", Unread), notification(1, "bob-id", Read)]);
    harness.runtime.login("bob", "pw").await.unwrap();
    harness
}

#[tokio::test]
async fn test_login_opens_channel_for_subject() {
    let harness = signed_in_bob().await;
    let container = harness.container();

    let subscribe = harness.broker.wait_for_subscription().await;
    assert_eq!(subscribe.get("destination"), Some("/user/bob-id/notifications"));

    let connect = harness.broker.received_of(Command::Connect);
    let bearer = format!("Bearer {}", container.session.get_token());
    assert_eq!(connect[0].get("Authorization"), Some(bearer.as_str()));

    let notifications = container.notifications.clone();
    eventually("seeded from gateway", || notifications.notifications().len() == 2).await;
    assert_eq!(notifications.unread_count(), 1);
    assert!(notifications.is_connected());
    assert_eq!(harness.gateway.authorizations(MY_NOTIFICATIONS)[0], Some(bearer));
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_pushed_notification_reaches_front() {
    let harness = signed_in_bob().await;
    harness.broker.wait_for_subscription().await;
    let notifications = harness.container().notifications.clone();
    eventually("seeded", || notifications.notifications().len() == 2).await;

    harness.broker.push(&notification(3, "bob-id", Unread));

    eventually("push applied", || notifications.unread_count() == 2).await;
    assert_eq!(notifications.notifications()[0].id, 3);
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_mark_all_as_read_goes_through_gateway() {
    let harness = signed_in_bob().await;
    harness.broker.wait_for_subscription().await;
    let notifications = harness.container().notifications.clone();
    eventually("seeded", || notifications.notifications().len() == 2).await;

    notifications.mark_all_as_read().await.unwrap();

    assert_eq!(notifications.unread_count(), 0);
    assert!(notifications.notifications().iter().all(|n| !n.is_unread()));
    assert!(harness.gateway.notifications().iter().all(|n| !n.is_unread()));
    assert_eq!(harness.gateway.authorizations(READ_ALL).len(), 1);
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_logout_closes_channel_and_forgets_notifications() {
    let harness = signed_in_bob().await;
    harness.broker.wait_for_subscription().await;
    let container = harness.container();
    let notifications = container.notifications.clone();
    eventually("seeded", || notifications.notifications().len() == 2).await;

    container.session.logout().await;

    eventually("channel closed", || !notifications.is_connected()).await;
    eventually("notifications cleared", || notifications.notifications().is_empty()).await;
    assert_eq!(notifications.unread_count(), 0);
    let broker = &harness.broker;
    eventually("DISCONNECT sent", || !broker.received_of(Command::Disconnect).is_empty()).await;
    harness.runtime.shutdown().await;
}

#[tokio::test]
async fn test_disabled_channel_never_connects() {
    let harness = Harness::start(ScriptedIdentityProvider::new()).await;
    let mut config = harness.container().config.clone();
    config.notifications.enabled = false;

    let container = ClientContainer::with_adapters(
        config,
        Arc::new(ScriptedIdentityProvider::new().with_password(tokens("bob", &["user"]))),
        Arc::new(MemoryTokenStore::new()),
    )
    .unwrap();
    let runtime = ClientRuntime::new(container);

    runtime.login("bob", "pw").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(harness.broker.connections(), 0);
    assert!(!runtime.container().notifications.is_connected());
    runtime.shutdown().await;
}
