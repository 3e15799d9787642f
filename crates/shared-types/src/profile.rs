//! # User Profile DTOs
//!
//! Backend user-profile record (distinct from the identity provider profile).

use serde::{Deserialize, Serialize};

/// Payload for creating or updating the current user's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileRequest {
    pub first_name: String,
    pub last_name: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date_of_birth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub employment_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<f64>,
}

/// Stored user profile as returned by `/profiles/me`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: i64,
    pub keycloak_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub employment_status: String,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub annual_income: Option<f64>,
    /// Whether onboarding is finished; gates the claim pages.
    #[serde(default)]
    pub profile_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_response_completion_flag() {
        let json = r#"{
            "id": 7,
            "keycloakId": "f2c1-77",
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "dateOfBirth": "1990-02-01",
            "age": 34,
            "address": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "zipCode": "62701",
            "country": "US",
            "employmentStatus": "EMPLOYED",
            "profileCompleted": true
        }"#;

        let profile: UserProfileResponse = serde_json::from_str(json).unwrap();
        assert!(profile.profile_completed);
        assert_eq!(profile.keycloak_id, "f2c1-77");
        assert!(profile.occupation.is_none());
    }

    #[test]
    fn test_request_omits_empty_optionals() {
        let request = UserProfileRequest {
            first_name: "Jane".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["firstName"], "Jane");
        assert!(json.get("annualIncome").is_none());
    }
}
