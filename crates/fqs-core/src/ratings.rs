//! Satisfaction ratings board.

use serde::Serialize;

use crate::backend::{BackendError, RatingBackend};
use crate::models::RatingForm;
use crate::search::normalize_query;

pub const EXCELLENT_THRESHOLD: u8 = 5;

/// Alert shown when the ratings fail to load.
pub const LOAD_FAILED_MESSAGE: &str = "Error al cargar calificaciones";

/// Headline numbers over all loaded forms.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RatingStats {
    pub total: usize,
    /// Mean score rounded to one decimal, unrated forms counted as zero
    pub average: f64,
    pub excellent: usize,
}

/// Badge text for a score.
pub fn rating_label(rating: u8) -> &'static str {
    match rating {
        5..=u8::MAX => "Excelente",
        4 => "Muy Bueno",
        3 => "Bueno",
        2 => "Regular",
        1 => "Malo",
        0 => "Sin calificar",
    }
}

pub struct RatingBoard<B: RatingBackend> {
    backend: B,
    forms: Vec<RatingForm>,
}

impl<B: RatingBackend> RatingBoard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            forms: Vec::new(),
        }
    }

    /// Fetch all forms. A failure is logged and leaves the board empty.
    pub fn load(&mut self) -> Result<(), BackendError> {
        match self.backend.list_ratings() {
            Ok(forms) => {
                self.forms = forms;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load ratings");
                self.forms.clear();
                Err(e)
            }
        }
    }

    pub fn forms(&self) -> &[RatingForm] {
        &self.forms
    }

    pub fn stats(&self) -> RatingStats {
        let total = self.forms.len();
        if total == 0 {
            return RatingStats::default();
        }
        let sum: u32 = self.forms.iter().map(|f| u32::from(f.score())).sum();
        let mean = f64::from(sum) / total as f64;
        RatingStats {
            total,
            average: (mean * 10.0).round() / 10.0,
            excellent: self
                .forms
                .iter()
                .filter(|f| f.score() >= EXCELLENT_THRESHOLD)
                .count(),
        }
    }

    /// Forms whose person name or score contains `query`.
    pub fn filter(&self, query: &str) -> Vec<&RatingForm> {
        let query = normalize_query(query);
        self.forms
            .iter()
            .filter(|form| {
                let by_name = form
                    .person
                    .as_ref()
                    .is_some_and(|p| p.name.to_lowercase().contains(&query));
                let by_score = form
                    .rating
                    .is_some_and(|r| r.to_string().contains(&query));
                by_name || by_score
            })
            .collect()
    }
}
