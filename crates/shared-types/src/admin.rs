//! Admin review payloads and dashboard aggregates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimApprovalRequest {
    pub claim_number: String,
    pub approved_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRejectionRequest {
    pub claim_number: String,
    pub rejection_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

/// Claim counters reported by `/admin/claims/statistics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimStatistics {
    pub total_claims: u64,
    pub submitted_count: u64,
    pub under_review_count: u64,
    pub approved_count: u64,
    pub rejected_count: u64,
    pub settled_count: u64,
    pub cancelled_count: u64,
    pub total_claimed_amount: f64,
    pub total_approved_amount: f64,
    pub total_settled_amount: f64,
    /// Mean processing time in days.
    pub average_processing_time: f64,
}

impl ClaimStatistics {
    /// Claims still awaiting a decision.
    #[must_use]
    pub fn open_count(&self) -> u64 {
        self.submitted_count + self.under_review_count
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardStats {
    pub claims: ClaimStatistics,
    pub total_policies: u64,
    pub active_policies: u64,
    pub pending_policies: u64,
}
