//! # Claim DTOs
//!
//! Claim submission and tracking types exchanged with the claims service,
//! plus the label helpers the client uses when listing claims.

use crate::errors::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Claim lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Settled,
    Cancelled,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 6] = [
        ClaimStatus::Submitted,
        ClaimStatus::UnderReview,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
        ClaimStatus::Settled,
        ClaimStatus::Cancelled,
    ];

    /// Wire name, also used as a path segment.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Settled => "SETTLED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("claim status", s))
    }
}

/// Claim categories, grouped by the policy family they apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimType {
    DeathClaim,
    CriticalIllnessClaim,
    DisabilityClaim,
    AccidentClaim,
    TheftClaim,
    NaturalDisasterCarClaim,
    VandalismClaim,
    FireDamageClaim,
    WaterDamageClaim,
    TheftHomeClaim,
    NaturalDisasterHomeClaim,
    LiabilityClaim,
    Other,
}

impl ClaimType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeathClaim => "DEATH_CLAIM",
            Self::CriticalIllnessClaim => "CRITICAL_ILLNESS_CLAIM",
            Self::DisabilityClaim => "DISABILITY_CLAIM",
            Self::AccidentClaim => "ACCIDENT_CLAIM",
            Self::TheftClaim => "THEFT_CLAIM",
            Self::NaturalDisasterCarClaim => "NATURAL_DISASTER_CAR_CLAIM",
            Self::VandalismClaim => "VANDALISM_CLAIM",
            Self::FireDamageClaim => "FIRE_DAMAGE_CLAIM",
            Self::WaterDamageClaim => "WATER_DAMAGE_CLAIM",
            Self::TheftHomeClaim => "THEFT_HOME_CLAIM",
            Self::NaturalDisasterHomeClaim => "NATURAL_DISASTER_HOME_CLAIM",
            Self::LiabilityClaim => "LIABILITY_CLAIM",
            Self::Other => "OTHER",
        }
    }
}

/// Policy family a claim is filed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyType {
    Life,
    Car,
    House,
}

impl PolicyType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Life => "LIFE",
            Self::Car => "CAR",
            Self::House => "HOUSE",
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LIFE" => Ok(Self::Life),
            "CAR" => Ok(Self::Car),
            "HOUSE" => Ok(Self::House),
            _ => Err(UnknownVariant::new("policy type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// New claim as submitted by a policy holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub policy_number: String,
    pub policy_type: PolicyType,
    pub claim_type: ClaimType,
    /// ISO date (`YYYY-MM-DD`).
    pub incident_date: String,
    pub claimed_amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// Claim as stored by the claims service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: i64,
    pub claim_number: String,
    pub policy_number: String,
    pub policy_type: PolicyType,
    pub claim_type: ClaimType,
    pub status: ClaimStatus,
    pub incident_date: String,
    pub submitted_date: String,
    #[serde(default)]
    pub approved_date: Option<String>,
    #[serde(default)]
    pub rejected_date: Option<String>,
    #[serde(default)]
    pub settled_date: Option<String>,
    pub claimed_amount: f64,
    #[serde(default)]
    pub approved_amount: Option<f64>,
    pub description: String,
    #[serde(default)]
    pub incident_location: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub documents_path: Option<String>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    pub created_at: String,
    pub updated_at: String,
}

/// Claim types that may be filed against a policy of the given family.
#[must_use]
pub fn claim_types_for_policy(policy_type: PolicyType) -> &'static [ClaimType] {
    match policy_type {
        PolicyType::Life => &[
            ClaimType::DeathClaim,
            ClaimType::CriticalIllnessClaim,
            ClaimType::DisabilityClaim,
            ClaimType::AccidentClaim,
        ],
        PolicyType::Car => &[
            ClaimType::AccidentClaim,
            ClaimType::TheftClaim,
            ClaimType::NaturalDisasterCarClaim,
            ClaimType::VandalismClaim,
        ],
        PolicyType::House => &[
            ClaimType::FireDamageClaim,
            ClaimType::WaterDamageClaim,
            ClaimType::TheftHomeClaim,
            ClaimType::NaturalDisasterHomeClaim,
            ClaimType::LiabilityClaim,
        ],
    }
}

/// Display label: underscores become spaces and the `CLAIM` suffix is dropped.
#[must_use]
pub fn claim_type_label(claim_type: ClaimType) -> String {
    claim_type
        .as_str()
        .replace('_', " ")
        .replace("CLAIM", "")
        .trim()
        .to_string()
}

#[must_use]
pub fn claim_status_label(status: ClaimStatus) -> String {
    status.as_str().replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_types_for_policy() {
        let car = claim_types_for_policy(PolicyType::Car);
        assert_eq!(car.len(), 4);
        assert!(car.contains(&ClaimType::AccidentClaim));
        assert!(!car.contains(&ClaimType::DeathClaim));

        let house = claim_types_for_policy(PolicyType::House);
        assert_eq!(house.len(), 5);
        assert!(house.contains(&ClaimType::LiabilityClaim));
    }

    #[test]
    fn test_labels() {
        assert_eq!(claim_type_label(ClaimType::DeathClaim), "DEATH");
        assert_eq!(
            claim_type_label(ClaimType::NaturalDisasterCarClaim),
            "NATURAL DISASTER CAR"
        );
        assert_eq!(claim_type_label(ClaimType::Other), "OTHER");
        assert_eq!(claim_status_label(ClaimStatus::UnderReview), "UNDER REVIEW");
    }

    #[test]
    fn test_status_parse_and_wire_name() {
        assert_eq!(
            "under_review".parse::<ClaimStatus>().unwrap(),
            ClaimStatus::UnderReview
        );
        assert!("pending".parse::<ClaimStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&ClaimStatus::UnderReview).unwrap(),
            "\"UNDER_REVIEW\""
        );
    }

    #[test]
    fn test_claim_request_wire_format() {
        let request = ClaimRequest {
            policy_number: "CAR-0003".into(),
            policy_type: PolicyType::Car,
            claim_type: ClaimType::TheftClaim,
            incident_date: "2024-04-30".into(),
            claimed_amount: 1200.0,
            description: "Stolen stereo".into(),
            incident_location: None,
            documents_path: None,
            severity: Some(Severity::Medium),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["policyType"], "CAR");
        assert_eq!(json["claimType"], "THEFT_CLAIM");
        assert_eq!(json["severity"], "MEDIUM");
        assert!(json.get("incidentLocation").is_none());
    }
}
