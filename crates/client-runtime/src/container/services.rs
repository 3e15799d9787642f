//! # Service Container
//!
//! Holds every component instance and wires their ports together.
//!
//! ## Wiring
//!
//! ```text
//! InMemoryEventBus ──→ RouteState (Navigator)
//!        │                   │
//!        ├──→ SessionManager ┘ (TokenSource, SessionView)
//!        │         │
//!        │         ├──→ GatewayHttp (AuthLayer) ──→ REST clients
//!        │         │                                  │
//!        │         │                       UserProfileClient (ProfileLookup)
//!        │         │                                  │
//!        │         └──────────────→ Router (guards) ←─┘
//!        │
//!        └──→ NotificationService ←── NotificationApi (backend), SessionManager (token)
//! ```
//!
//! The session manager commits its redirects straight to `RouteState`;
//! only user-initiated navigation goes through the guarded `Router`.

use std::sync::Arc;

use shared_bus::{InMemoryEventBus, RouteState};
use shared_types::ports::{Navigator, ProfileLookup, SessionView, TokenSource};
use tc_01_session::{
    FileTokenStore, IdentityProvider, KeycloakProvider, SessionDependencies, SessionError,
    SessionManager, TokenStore,
};
use tc_02_route_guards::{RouteTable, Router};
use tc_03_gateway_client::{
    AdminClaimClient, AdminPolicyClient, ClaimClient, GatewayError, GatewayHttp, NotificationApi,
    PolicyClient, UserProfileClient,
};
use tc_04_notifications::NotificationService;
use thiserror::Error;
use tracing::info;

use crate::container::config::{ClientConfig, ConfigError};

/// Wiring failures.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build gateway client: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Failed to build identity provider client: {0}")]
    Session(#[from] SessionError),
}

/// Central container holding all component instances.
pub struct ClientContainer {
    pub config: ClientConfig,

    // =========================================================================
    // SHARED INFRASTRUCTURE
    // =========================================================================
    pub bus: Arc<InMemoryEventBus>,
    pub routes: Arc<RouteState>,

    // =========================================================================
    // TC-01 / TC-02
    // =========================================================================
    pub session: Arc<SessionManager>,
    pub router: Arc<Router>,

    // =========================================================================
    // TC-03: REST clients over one authenticated pipeline
    // =========================================================================
    pub http: GatewayHttp,
    pub policies: PolicyClient,
    pub claims: ClaimClient,
    pub admin_claims: AdminClaimClient,
    pub admin_policies: AdminPolicyClient,
    pub profiles: Arc<UserProfileClient>,

    // =========================================================================
    // TC-04
    // =========================================================================
    pub notifications: Arc<NotificationService>,
}

impl ClientContainer {
    /// Validate `config` and wire the production adapters.
    pub fn new(config: ClientConfig) -> Result<Self, ContainerError> {
        config.validate()?;
        let provider = Arc::new(KeycloakProvider::new(config.keycloak())?);
        let store = Arc::new(FileTokenStore::new(config.storage.token_file.clone()));
        Self::with_adapters(config, provider, store)
    }

    /// Wire with caller-supplied identity provider and token store.
    pub fn with_adapters(
        config: ClientConfig,
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, ContainerError> {
        info!(
            realm = %config.identity.realm,
            gateway = %config.gateway.api_url,
            "Wiring client components"
        );

        let bus = Arc::new(InMemoryEventBus::new());
        let routes = Arc::new(RouteState::new("/", bus.clone()));

        let session = SessionManager::new(
            SessionDependencies::new(
                provider,
                store,
                routes.clone() as Arc<dyn Navigator>,
                bus.clone(),
            ),
            config.session(),
        );
        let tokens: Arc<dyn TokenSource> = session.clone();

        let http = GatewayHttp::new(&config.gateway()?, tokens.clone())?;
        let profiles = Arc::new(UserProfileClient::new(http.clone()));

        let router = Arc::new(Router::new(
            RouteTable::default(),
            session.clone() as Arc<dyn SessionView>,
            profiles.clone() as Arc<dyn ProfileLookup>,
            routes.clone(),
        ));

        let notifications = NotificationService::new(
            Arc::new(NotificationApi::new(http.clone())),
            tokens,
            bus.clone(),
            config.stomp(),
        );

        Ok(Self {
            bus,
            routes,
            session,
            router,
            policies: PolicyClient::new(http.clone()),
            claims: ClaimClient::new(http.clone()),
            admin_claims: AdminClaimClient::new(http.clone()),
            admin_policies: AdminPolicyClient::new(http.clone()),
            profiles,
            notifications,
            http,
            config,
        })
    }
}
