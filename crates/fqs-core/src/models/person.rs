//! Patient identity records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::search::contains_lower;

/// A patient identity record referenced by complaints, commendations and requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    /// Backend ID
    pub id: u64,
    /// Display name
    #[serde(rename = "nombre")]
    pub name: String,
    /// Unique hospital code
    #[serde(rename = "hcCode")]
    pub hc_code: String,
    /// Insurance provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<String>,
    /// Employer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business: Option<String>,
    /// Free-form status (e.g., "activo")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Hospital area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    /// Staff user who registered this person
    #[serde(rename = "id_usuario", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Person {
    /// Case-insensitive search over name, hospital code, insurance and employer.
    ///
    /// `query_lower` must already be lowercased.
    pub fn matches_query(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.hc_code.to_lowercase().contains(query_lower)
            || contains_lower(self.insurance.as_deref(), query_lower)
            || contains_lower(self.business.as_deref(), query_lower)
    }
}

/// Create/update payload for a person. Unset fields are omitted from the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonInput {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "hcCode", skip_serializing_if = "Option::is_none")]
    pub hc_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(rename = "id_usuario", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{
            "id": 7,
            "nombre": "Ana Torres",
            "hcCode": "HC-0042",
            "insurance": "Sanitas",
            "createdAt": "2024-05-01T10:00:00.000Z"
        }"#;
        let person: Person = serde_json::from_str(json).unwrap();
        assert_eq!(person.id, 7);
        assert_eq!(person.name, "Ana Torres");
        assert_eq!(person.hc_code, "HC-0042");
        assert_eq!(person.insurance.as_deref(), Some("Sanitas"));
        assert!(person.business.is_none());
    }

    #[test]
    fn test_input_omits_empty_fields() {
        let input = PersonInput {
            name: Some("Ana".into()),
            hc_code: Some("HC-1".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({ "nombre": "Ana", "hcCode": "HC-1" }));
    }

    #[test]
    fn test_matches_query() {
        let person: Person = serde_json::from_str(
            r#"{"id":1,"nombre":"Luis","hcCode":"HC-9","business":"Acme","createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(person.matches_query("hc-9"));
        assert!(person.matches_query("acme"));
        assert!(!person.matches_query("sanitas"));
    }
}
