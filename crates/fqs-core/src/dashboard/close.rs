//! Resolution capture before a case may be marked resolved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::CaseRecord;

/// Patient satisfaction recorded alongside the resolution note.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Satisfaction {
    #[default]
    Satisfecho,
    Neutral,
    Insatisfecho,
}

impl Satisfaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Satisfecho => "Satisfecho",
            Self::Neutral => "Neutral",
            Self::Insatisfecho => "Insatisfecho",
        }
    }
}

impl fmt::Display for Satisfaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Satisfaction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "satisfecho" | "satisfied" => Ok(Self::Satisfecho),
            "neutral" => Ok(Self::Neutral),
            "insatisfecho" | "dissatisfied" => Ok(Self::Insatisfecho),
            other => Err(format!("Unknown satisfaction rating: {}", other)),
        }
    }
}

/// A case waiting for its resolution note.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingClose {
    pub record: CaseRecord,
    /// Narrative typed so far
    pub draft: String,
    pub rating: Satisfaction,
}

impl PendingClose {
    pub fn new(record: CaseRecord) -> Self {
        Self {
            record,
            draft: String::new(),
            rating: Satisfaction::default(),
        }
    }
}

/// Final resolution text stored on the case.
pub fn compose_resolution(narrative: &str, rating: Satisfaction) -> String {
    format!("{}\n\nSatisfacción: {}", narrative, rating)
}
