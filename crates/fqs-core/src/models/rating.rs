//! Patient satisfaction rating forms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::person::Person;

/// Highest score a patient can give.
pub const MAX_RATING: u8 = 5;

/// A submitted satisfaction form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingForm {
    pub id: u64,
    /// Score from 1 to 5; null when the patient skipped it
    #[serde(rename = "Calificacion", default)]
    pub rating: Option<u8>,
    #[serde(rename = "persona", default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl RatingForm {
    /// Score, treating a missing rating as zero.
    pub fn score(&self) -> u8 {
        self.rating.unwrap_or(0).min(MAX_RATING)
    }
}
