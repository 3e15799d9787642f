//! # Insurance Policy DTOs
//!
//! Life, car, and house policies share a common header; each kind adds its
//! own coverage fields. JSON is camelCase, matching the policy service.

use crate::errors::UnknownVariant;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Active,
    Pending,
    Cancelled,
    Expired,
}

/// How often the premium is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentFrequency {
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

/// Fields common to every policy kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PolicyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_amount: Option<f64>,
    pub payment_frequency: PaymentFrequency,
    pub coverage_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeInsurancePolicy {
    #[serde(flatten)]
    pub policy: InsurancePolicy,
    pub policy_type: String,
    pub includes_critical_illness: bool,
    pub includes_disability_benefit: bool,
    pub beneficiary_name: String,
    pub beneficiary_relationship: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInsurancePolicy {
    #[serde(flatten)]
    pub policy: InsurancePolicy,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: u16,
    #[serde(rename = "vehicleVIN")]
    pub vehicle_vin: String,
    pub license_plate: String,
    pub coverage_type: String,
    pub includes_road_side_assistance: bool,
    pub includes_rental_car_coverage: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseInsurancePolicy {
    #[serde(flatten)]
    pub policy: InsurancePolicy,
    pub property_address: String,
    pub property_type: String,
    pub year_built: u16,
    pub property_value: f64,
    pub contents_value: f64,
    pub coverage_type: String,
    pub includes_flood_coverage: bool,
    pub includes_earthquake_coverage: bool,
    pub includes_liability_coverage: bool,
}

/// The three policy families; also the REST path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Life,
    Car,
    House,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Life, PolicyKind::Car, PolicyKind::House];

    /// Lower-case path segment used by the policy service.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Life => "life",
            Self::Car => "car",
            Self::House => "house",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for PolicyKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "life" => Ok(Self::Life),
            "car" => Ok(Self::Car),
            "house" => Ok(Self::House),
            _ => Err(UnknownVariant::new("policy kind", s)),
        }
    }
}

/// A policy of any kind, as listed on the admin pages.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyInsurancePolicy {
    Life(LifeInsurancePolicy),
    Car(CarInsurancePolicy),
    House(HouseInsurancePolicy),
}

impl AnyInsurancePolicy {
    #[must_use]
    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::Life(_) => PolicyKind::Life,
            Self::Car(_) => PolicyKind::Car,
            Self::House(_) => PolicyKind::House,
        }
    }

    /// Common header shared by all kinds.
    #[must_use]
    pub fn header(&self) -> &InsurancePolicy {
        match self {
            Self::Life(p) => &p.policy,
            Self::Car(p) => &p.policy,
            Self::House(p) => &p.policy,
        }
    }
}
