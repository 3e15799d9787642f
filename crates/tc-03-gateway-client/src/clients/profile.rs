//! Backend user profile (`/profiles`).

use crate::domain::GatewayError;
use crate::http::GatewayHttp;
use async_trait::async_trait;
use reqwest::Method;
use shared_types::errors::ProfileLookupError;
use shared_types::ports::ProfileLookup;
use shared_types::profile::{UserProfileRequest, UserProfileResponse};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct UserProfileClient {
    http: GatewayHttp,
}

impl UserProfileClient {
    pub fn new(http: GatewayHttp) -> Self {
        Self { http }
    }

    /// The signed-in user's profile. 404 means none has been created yet.
    pub async fn current(&self) -> Result<UserProfileResponse, GatewayError> {
        self.http.get_json("/profiles/me").await
    }

    pub async fn create(&self, request: &UserProfileRequest) -> Result<UserProfileResponse, GatewayError> {
        debug!(first_name = %request.first_name, "Creating user profile");
        self.http
            .send_json(Method::POST, "/profiles", request)
            .await
    }

    pub async fn update(
        &self,
        id: i64,
        request: &UserProfileRequest,
    ) -> Result<UserProfileResponse, GatewayError> {
        self.http
            .send_json(Method::PUT, &format!("/profiles/{id}"), request)
            .await
    }

    /// Whether onboarding is finished. A missing profile counts as unfinished.
    pub async fn has_completed_profile(&self) -> Result<bool, GatewayError> {
        match self.current().await {
            Ok(profile) => Ok(profile.profile_completed),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ProfileLookup for UserProfileClient {
    async fn current_profile(&self) -> Result<Option<UserProfileResponse>, ProfileLookupError> {
        match self.current().await {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_not_found() => Err(ProfileLookupError::NotFound),
            Err(e) => {
                warn!(error = %e, "Profile lookup failed");
                Err(ProfileLookupError::Unavailable(e.to_string()))
            }
        }
    }
}
