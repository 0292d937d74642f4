//! Payloads of the unauthenticated intake (webhook) channel.
//!
//! This channel has its own status vocabulary and must not be mixed with
//! [`super::CaseStatus`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Status values accepted by the intake channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WebhookStatus {
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "EN_REVISION")]
    UnderReview,
    #[serde(rename = "RESUELTO")]
    Resolved,
    #[serde(rename = "CERRADO")]
    Closed,
}

impl WebhookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDIENTE",
            Self::UnderReview => "EN_REVISION",
            Self::Resolved => "RESUELTO",
            Self::Closed => "CERRADO",
        }
    }
}

impl fmt::Display for WebhookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record category addressed by a status change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WebhookRecordType {
    Queja,
    Felicitacion,
    Solicitud,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookComplaintInput {
    #[serde(rename = "hcCode")]
    pub hc_code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "area_medica")]
    pub area: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookCommendationInput {
    #[serde(rename = "hcCode")]
    pub hc_code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "area_medica")]
    pub area: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookRequestInput {
    #[serde(rename = "hcCode")]
    pub hc_code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    pub area: String,
}

/// Upsert keyed by hospital code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookPersonInput {
    #[serde(rename = "hcCode")]
    pub hc_code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookStatusInput {
    #[serde(rename = "tipo")]
    pub record_type: WebhookRecordType,
    pub id: u64,
    #[serde(rename = "estado")]
    pub status: WebhookStatus,
}

/// Aggregate counters served to the intake channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_quejas: u64,
    pub total_felicitaciones: u64,
    pub total_solicitudes: u64,
    pub total_personas: u64,
    /// Keyed by intake status wire value
    pub quejas_por_estado: BTreeMap<String, u64>,
    pub solicitudes_por_estado: BTreeMap<String, u64>,
}
