//! Unified case record: one shape for all three record categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::case::{CaseKind, CaseStatus, Commendation, Complaint, Request};
use super::person::Person;

/// Placeholder shown when the backend did not join the person's hospital code.
pub const MISSING_HC_CODE: &str = "Sin HC";

/// Badge text for commendations, which carry no status.
pub const COMPLETED_BADGE: &str = "Completado";

/// View-only projection of a complaint, commendation or request.
///
/// Rebuilt from the fetched collections on every aggregation, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseRecord {
    pub id: u64,
    /// Selects the backend update path
    pub kind: CaseKind,
    pub description: String,
    pub area: String,
    /// Commendations are always `Resolved`
    pub status: CaseStatus,
    pub resolution: Option<String>,
    pub person_id: u64,
    pub created_at: DateTime<Utc>,
    pub person: Option<Person>,
}

impl CaseRecord {
    /// Whether a status selector is offered for this record.
    pub fn status_editable(&self) -> bool {
        self.kind.has_status()
    }

    /// Badge text.
    pub fn badge_label(&self) -> &'static str {
        match self.kind {
            CaseKind::Commendation => COMPLETED_BADGE,
            _ => self.status.label(),
        }
    }

    pub fn person_name(&self) -> Option<&str> {
        self.person.as_ref().map(|p| p.name.as_str())
    }

    /// Person's name, or a fallback built from the foreign key.
    pub fn person_label(&self) -> String {
        match self.person_name() {
            Some(name) => name.to_string(),
            None => format!("Persona #{}", self.person_id),
        }
    }

    pub fn hc_code_label(&self) -> &str {
        self.person
            .as_ref()
            .map(|p| p.hc_code.as_str())
            .unwrap_or(MISSING_HC_CODE)
    }
}

impl From<&Complaint> for CaseRecord {
    fn from(c: &Complaint) -> Self {
        Self {
            id: c.id,
            kind: CaseKind::Complaint,
            description: c.description.clone(),
            area: c.area.clone(),
            status: c.status,
            resolution: c.resolution.clone(),
            person_id: c.person_id,
            created_at: c.created_at,
            person: c.person.clone(),
        }
    }
}

impl From<&Commendation> for CaseRecord {
    fn from(c: &Commendation) -> Self {
        Self {
            id: c.id,
            kind: CaseKind::Commendation,
            description: c.description.clone(),
            area: c.area.clone(),
            status: CaseStatus::Resolved,
            resolution: c.resolution.clone(),
            person_id: c.person_id,
            created_at: c.created_at,
            person: c.person.clone(),
        }
    }
}

impl From<&Request> for CaseRecord {
    fn from(r: &Request) -> Self {
        Self {
            id: r.id,
            kind: CaseKind::Request,
            description: r.description.clone(),
            area: r.area.clone(),
            status: r.status,
            resolution: r.resolution.clone(),
            person_id: r.person_id,
            created_at: r.created_at,
            person: r.person.clone(),
        }
    }
}
