//! Shared fixtures: a fake gateway that records what it is sent, and a
//! client harness wired with scripted identity and a fake broker.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use client_runtime::{ClientConfig, ClientContainer, ClientRuntime};
use parking_lot::Mutex;
use shared_types::entities::TokenSet;
use shared_types::notification::{NotificationEvent, NotificationStatus, NotificationType};
use shared_types::profile::UserProfileResponse;
use tc_01_session::testing::{access_token, ScriptedIdentityProvider};
use tc_01_session::{MemoryTokenStore, TokenStore};
use tc_03_gateway_client::testing::spawn_gateway;
use tc_04_notifications::testing::FakeBroker;
use tc_04_notifications::HeartBeat;
use url::Url;

/// Expiry far enough out that no refresh is scheduled during a test.
pub const FAR_FUTURE: i64 = 4_102_444_800;

/// Tokens for `username` carrying `roles`; the subject is `{username}-id`.
pub fn tokens(username: &str, roles: &[&str]) -> TokenSet {
    TokenSet {
        access_token: access_token(username, roles, FAR_FUTURE),
        refresh_token: format!("{username}-refresh"),
        id_token: None,
    }
}

pub fn notification(id: i64, user_id: &str, status: NotificationStatus) -> NotificationEvent {
    NotificationEvent {
        id,
        user_id: user_id.to_string(),
        claim_number: Some(format!("CLM-{id:04}")),
        message: format!("Claim update {id}"),
        kind: NotificationType::ClaimUnderReview,
        status,
        created_at: format!("2025-03-0{}T09:00:00", id.clamp(1, 9)),
        read_at: None,
    }
}

/// What the fake gateway serves and what it has been sent.
#[derive(Default)]
pub struct GatewayState {
    profile: Mutex<Option<UserProfileResponse>>,
    notifications: Mutex<Vec<NotificationEvent>>,
    requests: Mutex<Vec<(&'static str, Option<String>)>>,
}

impl GatewayState {
    /// `None` makes `/profiles/me` answer 404.
    pub fn set_profile(&self, profile: Option<UserProfileResponse>) {
        *self.profile.lock() = profile;
    }

    pub fn set_profile_completed(&self, completed: bool) {
        self.set_profile(Some(UserProfileResponse {
            id: 7,
            keycloak_id: "bob-id".into(),
            first_name: "Bob".into(),
            last_name: "Builder".into(),
            email: "bob@trustify.test".into(),
            profile_completed: completed,
            ..Default::default()
        }));
    }

    pub fn set_notifications(&self, items: Vec<NotificationEvent>) {
        *self.notifications.lock() = items;
    }

    pub fn notifications(&self) -> Vec<NotificationEvent> {
        self.notifications.lock().clone()
    }

    /// `Authorization` header of every request to `route`, in arrival order.
    pub fn authorizations(&self, route: &str) -> Vec<Option<String>> {
        self.requests
            .lock()
            .iter()
            .filter(|(r, _)| *r == route)
            .map(|(_, auth)| auth.clone())
            .collect()
    }

    fn record(&self, route: &'static str, headers: &HeaderMap) {
        let value = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().push((route, value));
    }
}

type Shared = State<Arc<GatewayState>>;

pub const PROFILE_ME: &str = "/profiles/me";
pub const MY_NOTIFICATIONS: &str = "/api/notifications/my";
pub const READ_ALL: &str = "/api/notifications/read-all";
pub const MY_CLAIMS: &str = "/claims/my-claims";

async fn profile_me(
    State(state): Shared,
    headers: HeaderMap,
) -> Result<Json<UserProfileResponse>, StatusCode> {
    state.record(PROFILE_ME, &headers);
    state.profile.lock().clone().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn my_notifications(State(state): Shared, headers: HeaderMap) -> Json<Vec<NotificationEvent>> {
    state.record(MY_NOTIFICATIONS, &headers);
    Json(state.notifications())
}

async fn read_all(State(state): Shared, headers: HeaderMap) -> StatusCode {
    state.record(READ_ALL, &headers);
    for n in state.notifications.lock().iter_mut() {
        n.status = NotificationStatus::Read;
        n.read_at = Some("2025-03-10T12:00:00".into());
    }
    StatusCode::OK
}

async fn my_claims(State(state): Shared, headers: HeaderMap) -> Json<Vec<serde_json::Value>> {
    state.record(MY_CLAIMS, &headers);
    Json(Vec::new())
}

pub fn gateway_app(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route(PROFILE_ME, get(profile_me))
        .route(MY_NOTIFICATIONS, get(my_notifications))
        .route(READ_ALL, put(read_all))
        .route(MY_CLAIMS, get(my_claims))
        .with_state(state)
}

/// Server outside the gateway; `/echo` answers with the `Authorization`
/// header it received, or `none`.
pub async fn spawn_foreign_origin() -> Url {
    async fn echo(headers: HeaderMap) -> String {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none")
            .to_string()
    }
    spawn_gateway(Router::new().route("/echo", get(echo))).await
}

/// A fully wired client against the fake gateway and broker.
pub struct Harness {
    pub runtime: ClientRuntime,
    pub gateway: Arc<GatewayState>,
    pub broker: FakeBroker,
}

impl Harness {
    pub async fn start(provider: ScriptedIdentityProvider) -> Self {
        Self::with_store(provider, Arc::new(MemoryTokenStore::new())).await
    }

    /// # Panics
    ///
    /// Panics if the container rejects the generated configuration.
    #[allow(clippy::unwrap_used)]
    pub async fn with_store(provider: ScriptedIdentityProvider, store: Arc<dyn TokenStore>) -> Self {
        let gateway = Arc::new(GatewayState::default());
        let base = spawn_gateway(gateway_app(gateway.clone())).await;
        let broker = FakeBroker::start(HeartBeat::new(0, 0)).await;

        let mut config = ClientConfig::default();
        config.gateway.api_url = base.to_string();
        config.notifications.ws_url = broker.url().to_string();
        config.notifications.reconnect_delay_ms = 100;
        config.boot.safety_timeout_ms = 1_000;

        let container = ClientContainer::with_adapters(config, Arc::new(provider), store).unwrap();
        Self {
            runtime: ClientRuntime::new(container),
            gateway,
            broker,
        }
    }

    pub fn container(&self) -> Arc<ClientContainer> {
        self.runtime.container()
    }
}

/// Poll `check` until it holds.
///
/// # Panics
///
/// Panics if `check` does not hold within five seconds.
pub async fn eventually(what: &str, mut check: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !check() {
        assert!(tokio::time::Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
