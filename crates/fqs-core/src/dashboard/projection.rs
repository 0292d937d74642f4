//! Merge of the three case collections into one newest-first ledger.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{CaseKind, CaseRecord, CaseStatus, Commendation, Complaint, Request};

/// Build the unified ledger.
///
/// Sorted by creation time, newest first. Equal timestamps order by kind
/// (complaints, commendations, requests) and then by descending id, so the
/// result does not depend on the order of the input collections.
pub fn project(
    complaints: &[Complaint],
    commendations: &[Commendation],
    requests: &[Request],
) -> Vec<CaseRecord> {
    let mut records: Vec<CaseRecord> = complaints
        .iter()
        .map(CaseRecord::from)
        .chain(commendations.iter().map(CaseRecord::from))
        .chain(requests.iter().map(CaseRecord::from))
        .collect();

    records.sort_by(ledger_order);
    records
}

fn ledger_order(a: &CaseRecord, b: &CaseRecord) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.kind.rank().cmp(&b.kind.rank()))
        .then_with(|| b.id.cmp(&a.id))
}

/// Status distribution over a ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusSummary {
    pub pending: usize,
    pub in_progress: usize,
    /// Includes every commendation
    pub resolved: usize,
    pub complaints: usize,
    pub commendations: usize,
    pub requests: usize,
}

impl StatusSummary {
    pub fn from_records(records: &[CaseRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            match record.status {
                CaseStatus::Pending => summary.pending += 1,
                CaseStatus::InProgress => summary.in_progress += 1,
                CaseStatus::Resolved => summary.resolved += 1,
            }
            match record.kind {
                CaseKind::Complaint => summary.complaints += 1,
                CaseKind::Commendation => summary.commendations += 1,
                CaseKind::Request => summary.requests += 1,
            }
            summary
        })
    }

    pub fn count(&self, status: CaseStatus) -> usize {
        match status {
            CaseStatus::Pending => self.pending,
            CaseStatus::InProgress => self.in_progress,
            CaseStatus::Resolved => self.resolved,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complaint(id: u64, at: &str) -> Complaint {
        Complaint {
            id,
            description: format!("queja {}", id),
            status: CaseStatus::Pending,
            area: "Urgencias".into(),
            resolution: None,
            person_id: 1,
            created_at: at.parse().unwrap(),
            person: None,
        }
    }

    fn commendation(id: u64, at: &str) -> Commendation {
        Commendation {
            id,
            description: format!("felicitación {}", id),
            area: "Pediatría".into(),
            resolution: None,
            person_id: 2,
            created_at: at.parse().unwrap(),
            person: None,
        }
    }

    #[test]
    fn test_newest_first() {
        let records = project(
            &[complaint(1, "2024-01-01T10:00:00Z"), complaint(2, "2024-01-03T10:00:00Z")],
            &[commendation(1, "2024-01-02T10:00:00Z")],
            &[],
        );
        let order: Vec<_> = records.iter().map(|r| (r.kind, r.id)).collect();
        assert_eq!(
            order,
            vec![
                (CaseKind::Complaint, 2),
                (CaseKind::Commendation, 1),
                (CaseKind::Complaint, 1),
            ]
        );
    }

    #[test]
    fn test_ties_break_by_kind_then_id() {
        let at = "2024-01-01T10:00:00Z";
        let records = project(
            &[complaint(1, at), complaint(5, at)],
            &[commendation(9, at)],
            &[],
        );
        let order: Vec<_> = records.iter().map(|r| (r.kind, r.id)).collect();
        assert_eq!(
            order,
            vec![
                (CaseKind::Complaint, 5),
                (CaseKind::Complaint, 1),
                (CaseKind::Commendation, 9),
            ]
        );
    }

    #[test]
    fn test_summary_counts_commendations_as_resolved() {
        let records = project(
            &[complaint(1, "2024-01-01T10:00:00Z")],
            &[commendation(1, "2024-01-02T10:00:00Z")],
            &[],
        );
        let summary = StatusSummary::from_records(&records);
        assert_eq!(summary.count(CaseStatus::Pending), 1);
        assert_eq!(summary.count(CaseStatus::Resolved), 1);
        assert_eq!(summary.commendations, 1);
        assert_eq!(summary.total(), 2);
    }
}
