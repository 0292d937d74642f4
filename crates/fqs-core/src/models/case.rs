//! Complaint, commendation and request records as the backend returns them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::person::Person;

/// Lifecycle status of a complaint or request.
///
/// Wire values are `PENDIENTE`, `EN_PROCESO` and `RESUELTO`. The intake
/// channel uses a different vocabulary, see [`super::WebhookStatus`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CaseStatus {
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "EN_PROCESO")]
    InProgress,
    #[serde(rename = "RESUELTO")]
    Resolved,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 3] = [Self::Pending, Self::InProgress, Self::Resolved];

    /// Exact wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDIENTE",
            Self::InProgress => "EN_PROCESO",
            Self::Resolved => "RESUELTO",
        }
    }

    /// Badge text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::InProgress => "En proceso",
            Self::Resolved => "Resuelto",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(&['-', ' '][..], "_").as_str() {
            "PENDIENTE" | "PENDING" => Ok(Self::Pending),
            "EN_PROCESO" | "IN_PROGRESS" => Ok(Self::InProgress),
            "RESUELTO" | "RESOLVED" => Ok(Self::Resolved),
            other => Err(format!("Unknown case status: {}", other)),
        }
    }
}

/// Discriminant of the three patient-submitted record categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CaseKind {
    Complaint,
    Commendation,
    Request,
}

impl CaseKind {
    pub const ALL: [CaseKind; 3] = [Self::Complaint, Self::Commendation, Self::Request];

    /// Spanish display name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Complaint => "Queja",
            Self::Commendation => "Felicitación",
            Self::Request => "Solicitud",
        }
    }

    /// Position in the aggregated ledger when timestamps tie.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Complaint => 0,
            Self::Commendation => 1,
            Self::Request => 2,
        }
    }

    /// Commendations have no lifecycle.
    pub fn has_status(&self) -> bool {
        !matches!(self, Self::Commendation)
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queja" | "quejas" | "complaint" | "complaints" => Ok(Self::Complaint),
            "felicitacion" | "felicitación" | "felicitaciones" | "commendation"
            | "commendations" => Ok(Self::Commendation),
            "solicitud" | "solicitudes" | "request" | "requests" => Ok(Self::Request),
            other => Err(format!("Unknown case kind: {}", other)),
        }
    }
}

/// A patient grievance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Complaint {
    pub id: u64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "estado")]
    pub status: CaseStatus,
    #[serde(rename = "area_medica")]
    pub area: String,
    /// Resolution narrative, null until closed
    #[serde(rename = "respuesta", default)]
    pub resolution: Option<String>,
    #[serde(rename = "id_persona")]
    pub person_id: u64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Joined person, when the backend populates it
    #[serde(rename = "persona", default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
}

/// Positive feedback. Has no status: always implicitly resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commendation {
    pub id: u64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "area_medica")]
    pub area: String,
    #[serde(rename = "Respuesta", default)]
    pub resolution: Option<String>,
    #[serde(rename = "id_persona")]
    pub person_id: u64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "persona", default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
}

/// A service request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    pub id: u64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "area_medica", alias = "area")]
    pub area: String,
    #[serde(rename = "estado")]
    pub status: CaseStatus,
    #[serde(rename = "Respuesta", default)]
    pub resolution: Option<String>,
    #[serde(rename = "id_persona")]
    pub person_id: u64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "persona", default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
}

// =========================================================================
// Mutation payloads
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComplaint {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "id_persona")]
    pub person_id: u64,
    #[serde(rename = "area_medica")]
    pub area: String,
}

/// Partial complaint update; unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComplaintUpdate {
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "area_medica", skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(rename = "respuesta", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCommendation {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "area_medica")]
    pub area: String,
    #[serde(rename = "id_persona")]
    pub person_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommendationUpdate {
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "area_medica", skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRequest {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "id_persona")]
    pub person_id: u64,
    pub area: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequestUpdate {
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(rename = "Respuesta", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// Body of the finalize helper: text appended to the record's resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalizeCase {
    #[serde(rename = "descripcion")]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        let json = serde_json::to_string(&CaseStatus::InProgress).unwrap();
        assert_eq!(json, "\"EN_PROCESO\"");
        let parsed: CaseStatus = serde_json::from_str("\"RESUELTO\"").unwrap();
        assert_eq!(parsed, CaseStatus::Resolved);
        assert!(serde_json::from_str::<CaseStatus>("\"EN_REVISION\"").is_err());
    }

    #[test]
    fn test_status_from_str_aliases() {
        assert_eq!("en proceso".parse::<CaseStatus>().unwrap(), CaseStatus::InProgress);
        assert_eq!("pending".parse::<CaseStatus>().unwrap(), CaseStatus::Pending);
        assert!("cerrado".parse::<CaseStatus>().is_err());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Quejas".parse::<CaseKind>().unwrap(), CaseKind::Complaint);
        assert_eq!("felicitacion".parse::<CaseKind>().unwrap(), CaseKind::Commendation);
        assert_eq!("request".parse::<CaseKind>().unwrap(), CaseKind::Request);
        assert!(!CaseKind::Commendation.has_status());
    }

    #[test]
    fn test_complaint_resolution_field_names() {
        let update = ComplaintUpdate {
            status: Some(CaseStatus::Resolved),
            resolution: Some("ok".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "estado": "RESUELTO", "respuesta": "ok" })
        );

        let update = RequestUpdate {
            status: Some(CaseStatus::Resolved),
            resolution: Some("ok".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "estado": "RESUELTO", "Respuesta": "ok" })
        );
    }

    #[test]
    fn test_request_accepts_either_area_field() {
        let with_medical = r#"{"id":1,"descripcion":"d","area_medica":"UCI","estado":"PENDIENTE","Respuesta":null,"id_persona":3,"createdAt":"2024-01-01T00:00:00Z"}"#;
        let with_plain = r#"{"id":1,"descripcion":"d","area":"UCI","estado":"PENDIENTE","id_persona":3,"createdAt":"2024-01-01T00:00:00Z"}"#;
        let a: Request = serde_json::from_str(with_medical).unwrap();
        let b: Request = serde_json::from_str(with_plain).unwrap();
        assert_eq!(a, b);
        assert!(a.resolution.is_none());
    }
}
