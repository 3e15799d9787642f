//! Administrator views over claims and policies.

use super::policy::{collection_path, PolicyRecord};
use crate::domain::GatewayError;
use crate::http::GatewayHttp;
use reqwest::Method;
use shared_types::admin::{
    AdminDashboardStats, ClaimApprovalRequest, ClaimRejectionRequest, ClaimStatistics,
};
use shared_types::claim::{ClaimResponse, ClaimStatus};
use shared_types::policy::{
    AnyInsurancePolicy, CarInsurancePolicy, HouseInsurancePolicy, LifeInsurancePolicy, PolicyKind,
    PolicyStatus,
};
use tracing::{debug, info};

const ADMIN_CLAIMS: &str = "/admin/claims";

#[derive(Clone)]
pub struct AdminClaimClient {
    http: GatewayHttp,
}

impl AdminClaimClient {
    pub fn new(http: GatewayHttp) -> Self {
        Self { http }
    }

    pub async fn all(&self) -> Result<Vec<ClaimResponse>, GatewayError> {
        self.http.get_json(ADMIN_CLAIMS).await
    }

    pub async fn by_status(&self, status: ClaimStatus) -> Result<Vec<ClaimResponse>, GatewayError> {
        self.http
            .get_json(&format!("{ADMIN_CLAIMS}/by-status/{status}"))
            .await
    }

    pub async fn move_to_review(&self, claim_number: &str) -> Result<ClaimResponse, GatewayError> {
        debug!(claim_number, "Moving claim to review");
        self.http
            .send_json(
                Method::PATCH,
                &format!("{ADMIN_CLAIMS}/{claim_number}/under-review"),
                &serde_json::json!({}),
            )
            .await
    }

    pub async fn approve(&self, request: &ClaimApprovalRequest) -> Result<ClaimResponse, GatewayError> {
        info!(claim_number = %request.claim_number, amount = request.approved_amount, "Approving claim");
        self.http
            .send_json(
                Method::PATCH,
                &format!("{ADMIN_CLAIMS}/{}/approve", request.claim_number),
                request,
            )
            .await
    }

    pub async fn reject(&self, request: &ClaimRejectionRequest) -> Result<ClaimResponse, GatewayError> {
        info!(claim_number = %request.claim_number, "Rejecting claim");
        self.http
            .send_json(
                Method::PATCH,
                &format!("{ADMIN_CLAIMS}/{}/reject", request.claim_number),
                request,
            )
            .await
    }

    /// Mark an approved claim as paid.
    pub async fn settle(&self, claim_number: &str) -> Result<ClaimResponse, GatewayError> {
        self.http
            .send_json(
                Method::PATCH,
                &format!("{ADMIN_CLAIMS}/{claim_number}/settle"),
                &serde_json::json!({}),
            )
            .await
    }

    pub async fn statistics(&self) -> Result<ClaimStatistics, GatewayError> {
        self.http
            .get_json(&format!("{ADMIN_CLAIMS}/statistics"))
            .await
    }
}

#[derive(Clone)]
pub struct AdminPolicyClient {
    http: GatewayHttp,
}

impl AdminPolicyClient {
    pub fn new(http: GatewayHttp) -> Self {
        Self { http }
    }

    /// Every policy of one kind, across all holders.
    pub async fn all_of<P: PolicyRecord>(&self) -> Result<Vec<P>, GatewayError> {
        self.http.get_json(&collection_path(P::KIND)).await
    }

    /// Every policy of every kind: car, then life, then house.
    ///
    /// The three listings are fetched concurrently; any failure fails the whole.
    pub async fn all(&self) -> Result<Vec<AnyInsurancePolicy>, GatewayError> {
        let (car, life, house) = futures::try_join!(
            self.all_of::<CarInsurancePolicy>(),
            self.all_of::<LifeInsurancePolicy>(),
            self.all_of::<HouseInsurancePolicy>(),
        )?;

        Ok(car
            .into_iter()
            .map(PolicyRecord::into_any)
            .chain(life.into_iter().map(PolicyRecord::into_any))
            .chain(house.into_iter().map(PolicyRecord::into_any))
            .collect())
    }

    pub async fn delete(&self, kind: PolicyKind, id: i64) -> Result<(), GatewayError> {
        info!(%kind, id, "Deleting policy");
        self.http
            .delete(&format!("{}/{id}", collection_path(kind)))
            .await
    }
}

/// Claim statistics plus policy counts for the admin landing page.
pub async fn dashboard_stats(
    claims: &AdminClaimClient,
    policies: &AdminPolicyClient,
) -> Result<AdminDashboardStats, GatewayError> {
    let (claims, policies) = futures::try_join!(claims.statistics(), policies.all())?;

    let count = |status| {
        policies
            .iter()
            .filter(|p| p.header().status == Some(status))
            .count() as u64
    };

    Ok(AdminDashboardStats {
        claims,
        total_policies: policies.len() as u64,
        active_policies: count(PolicyStatus::Active),
        pending_policies: count(PolicyStatus::Pending),
    })
}
