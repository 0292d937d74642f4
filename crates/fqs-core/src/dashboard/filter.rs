//! Search and facet filtering over the unified ledger.

use serde::{Deserialize, Serialize};

use crate::models::{CaseKind, CaseRecord, CaseStatus};
use crate::search::{contains_lower, normalize_query};

/// User-entered filter. `None` facets mean "all".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseFilter {
    /// Matched case-insensitively on description, area and person name
    pub query: String,
    pub kind: Option<CaseKind>,
    pub status: Option<CaseStatus>,
}

impl CaseFilter {
    /// Whether this filter lets every record through.
    pub fn is_noop(&self) -> bool {
        self.query.is_empty() && self.kind.is_none() && self.status.is_none()
    }

    pub fn matches(&self, record: &CaseRecord) -> bool {
        let query = normalize_query(&self.query);
        self.matches_normalized(record, &query)
    }

    fn matches_normalized(&self, record: &CaseRecord, query_lower: &str) -> bool {
        let matches_text = record.description.to_lowercase().contains(query_lower)
            || record.area.to_lowercase().contains(query_lower)
            || contains_lower(record.person_name(), query_lower);
        let matches_kind = self.kind.map_or(true, |kind| record.kind == kind);
        let matches_status = self.status.map_or(true, |status| record.status == status);

        matches_text && matches_kind && matches_status
    }
}

/// Records satisfying all three predicates, in their original order.
pub fn filter(records: &[CaseRecord], filter: &CaseFilter) -> Vec<CaseRecord> {
    let query = normalize_query(&filter.query);
    records
        .iter()
        .filter(|record| filter.matches_normalized(record, &query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;

    fn record(kind: CaseKind, status: CaseStatus, description: &str, person: Option<&str>) -> CaseRecord {
        CaseRecord {
            id: 1,
            kind,
            description: description.into(),
            area: "Cardiología".into(),
            status,
            resolution: None,
            person_id: 3,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            person: person.map(|name| Person {
                id: 3,
                name: name.into(),
                hc_code: "HC-3".into(),
                insurance: None,
                business: None,
                status: None,
                area: None,
                user_id: None,
                created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            }),
        }
    }

    #[test]
    fn test_query_matches_description_area_and_person() {
        let records = vec![
            record(CaseKind::Complaint, CaseStatus::Pending, "Demora en cita", None),
            record(CaseKind::Request, CaseStatus::Pending, "Copia de historia", Some("María Gómez")),
        ];

        let by_text = |q: &str| {
            filter(&records, &CaseFilter { query: q.into(), ..Default::default() }).len()
        };
        assert_eq!(by_text("DEMORA"), 1);
        assert_eq!(by_text("cardio"), 2);
        assert_eq!(by_text("maría"), 1);
        assert_eq!(by_text("hc-3"), 0);
    }

    #[test]
    fn test_commendations_only_pass_resolved_or_all() {
        let records = vec![record(CaseKind::Commendation, CaseStatus::Resolved, "Gracias", None)];

        let pending = CaseFilter { status: Some(CaseStatus::Pending), ..Default::default() };
        let resolved = CaseFilter { status: Some(CaseStatus::Resolved), ..Default::default() };
        assert!(filter(&records, &pending).is_empty());
        assert_eq!(filter(&records, &resolved).len(), 1);
        assert_eq!(filter(&records, &CaseFilter::default()).len(), 1);
    }

    #[test]
    fn test_predicates_are_anded() {
        let records = vec![
            record(CaseKind::Complaint, CaseStatus::Pending, "Ruido", None),
            record(CaseKind::Request, CaseStatus::Pending, "Ruido", None),
            record(CaseKind::Complaint, CaseStatus::Resolved, "Ruido", None),
        ];
        let f = CaseFilter {
            query: "ruido".into(),
            kind: Some(CaseKind::Complaint),
            status: Some(CaseStatus::Pending),
        };
        let result = filter(&records, &f);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kind, CaseKind::Complaint);
        assert_eq!(result[0].status, CaseStatus::Pending);
        assert!(!f.is_noop());
        assert!(CaseFilter::default().is_noop());
    }
}
