//! Claims service, policy-holder side.

use crate::domain::GatewayError;
use crate::http::GatewayHttp;
use reqwest::Method;
use shared_types::claim::{ClaimRequest, ClaimResponse, ClaimStatus, PolicyType};

#[derive(Clone)]
pub struct ClaimClient {
    http: GatewayHttp,
}

impl ClaimClient {
    pub fn new(http: GatewayHttp) -> Self {
        Self { http }
    }

    pub async fn submit(&self, request: &ClaimRequest) -> Result<ClaimResponse, GatewayError> {
        self.http.send_json(Method::POST, "/claims", request).await
    }

    pub async fn my_claims(&self) -> Result<Vec<ClaimResponse>, GatewayError> {
        self.http.get_json("/claims/my-claims").await
    }

    pub async fn by_number(&self, claim_number: &str) -> Result<ClaimResponse, GatewayError> {
        self.http.get_json(&format!("/claims/{claim_number}")).await
    }

    pub async fn my_claims_by_status(
        &self,
        status: ClaimStatus,
    ) -> Result<Vec<ClaimResponse>, GatewayError> {
        self.http
            .get_json(&format!("/claims/my-claims/status/{status}"))
            .await
    }

    pub async fn my_claims_by_policy_type(
        &self,
        policy_type: PolicyType,
    ) -> Result<Vec<ClaimResponse>, GatewayError> {
        self.http
            .get_json(&format!("/claims/my-claims/policy-type/{policy_type}"))
            .await
    }

    pub async fn my_claims_by_policy_number(
        &self,
        policy_number: &str,
    ) -> Result<Vec<ClaimResponse>, GatewayError> {
        self.http
            .get_json(&format!("/claims/my-claims/policy/{policy_number}"))
            .await
    }

    pub async fn cancel(&self, claim_number: &str) -> Result<ClaimResponse, GatewayError> {
        self.http
            .send_json(
                Method::PATCH,
                &format!("/claims/{claim_number}/cancel"),
                &serde_json::json!({}),
            )
            .await
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use shared_types::claim::{ClaimResponse, ClaimStatus, ClaimType, PolicyType};

    pub fn claim(number: &str, status: ClaimStatus) -> ClaimResponse {
        ClaimResponse {
            id: 1,
            claim_number: number.to_string(),
            policy_number: "POL-0001".into(),
            policy_type: PolicyType::Car,
            claim_type: ClaimType::AccidentClaim,
            status,
            incident_date: "2025-03-02".into(),
            submitted_date: "2025-03-03".into(),
            approved_date: None,
            rejected_date: None,
            settled_date: None,
            claimed_amount: 1800.0,
            approved_amount: None,
            description: "Rear-ended at a junction".into(),
            incident_location: None,
            rejection_reason: None,
            admin_notes: None,
            documents_path: None,
            reviewed_by: None,
            severity: None,
            created_at: "2025-03-03T10:00:00".into(),
            updated_at: "2025-03-03T10:00:00".into(),
        }
    }
}
