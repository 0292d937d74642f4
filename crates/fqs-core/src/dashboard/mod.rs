//! Case dashboard: aggregated view over complaints, commendations and
//! requests, with the status-change and close workflow.
//!
//! Every mutation is followed by a full refetch; the dashboard never
//! patches its collections locally.

mod close;
mod filter;
mod projection;

pub use close::*;
pub use filter::*;
pub use projection::*;

use std::thread;

use thiserror::Error;

use crate::backend::{BackendError, BackendResult, CaseBackend};
use crate::models::{
    CaseKind, CaseRecord, CaseStatus, Commendation, Complaint, ComplaintUpdate, Request,
    RequestUpdate,
};

/// Alert shown when loading fails without a server message.
pub const LOAD_FAILED_MESSAGE: &str = "Error al cargar los datos";

/// Alert shown when a status update fails without a server message.
pub const UPDATE_FAILED_MESSAGE: &str = "Error al actualizar el estado";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("A load is in progress")]
    Busy,

    #[error("{0} records have no status")]
    StatusNotEditable(CaseKind),

    #[error("Resolution text is required to resolve a case")]
    EmptyResolution,

    #[error("No case is waiting to be closed")]
    NoPendingClose,

    #[error("Failed to load cases: {0}")]
    Load(BackendError),

    #[error("Failed to update case: {0}")]
    Update(BackendError),
}

impl DashboardError {
    /// Alert text for the operator.
    pub fn user_message(&self) -> String {
        match self {
            Self::Load(e) => e.user_message(LOAD_FAILED_MESSAGE),
            Self::Update(e) => e.user_message(UPDATE_FAILED_MESSAGE),
            other => other.to_string(),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        match self {
            Self::Load(e) | Self::Update(e) => e.is_session_expired(),
            _ => false,
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Outcome of selecting a new status in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Close prompt opened, nothing sent yet
    AwaitingResolution,
    /// Update sent and collections refetched
    Persisted,
}

pub struct CaseDashboard<B: CaseBackend> {
    backend: B,
    complaints: Vec<Complaint>,
    commendations: Vec<Commendation>,
    requests: Vec<Request>,
    records: Vec<CaseRecord>,
    state: LoadState,
    pending_close: Option<PendingClose>,
}

impl<B: CaseBackend> CaseDashboard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            complaints: Vec::new(),
            commendations: Vec::new(),
            requests: Vec::new(),
            records: Vec::new(),
            state: LoadState::Loading,
            pending_close: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn complaints(&self) -> &[Complaint] {
        &self.complaints
    }

    pub fn commendations(&self) -> &[Commendation] {
        &self.commendations
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Unified ledger, newest first.
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn filtered(&self, case_filter: &CaseFilter) -> Vec<CaseRecord> {
        filter(&self.records, case_filter)
    }

    pub fn status_summary(&self) -> StatusSummary {
        StatusSummary::from_records(&self.records)
    }

    pub fn pending_close(&self) -> Option<&PendingClose> {
        self.pending_close.as_ref()
    }

    /// Mutable access to the open close prompt, for editing the draft.
    pub fn pending_close_mut(&mut self) -> Option<&mut PendingClose> {
        self.pending_close.as_mut()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch all three collections concurrently.
    ///
    /// All-or-nothing: if any fetch fails the collections stay empty and the
    /// first error (complaints, then commendations, then requests) is returned.
    pub fn load_all(&mut self) -> DashboardResult<()> {
        self.state = LoadState::Loading;
        self.complaints.clear();
        self.commendations.clear();
        self.requests.clear();
        self.records.clear();

        let backend = &self.backend;
        let (complaints, commendations, requests) = thread::scope(|s| {
            let complaints = s.spawn(|| backend.list_complaints());
            let commendations = s.spawn(|| backend.list_commendations());
            let requests = s.spawn(|| backend.list_requests());
            (
                settle(complaints.join()),
                settle(commendations.join()),
                settle(requests.join()),
            )
        });

        match (complaints, commendations, requests) {
            (Ok(complaints), Ok(commendations), Ok(requests)) => {
                self.records = project(&complaints, &commendations, &requests);
                self.complaints = complaints;
                self.commendations = commendations;
                self.requests = requests;
                self.state = LoadState::Ready;
                tracing::info!(records = self.records.len(), "Dashboard loaded");
                Ok(())
            }
            (complaints, commendations, requests) => {
                let error = [complaints.err(), commendations.err(), requests.err()]
                    .into_iter()
                    .flatten()
                    .next()
                    .unwrap_or_else(|| BackendError::Transport("unknown load failure".into()));
                tracing::error!(error = %error, "Failed to load dashboard data");
                self.state = LoadState::Failed(error.user_message(LOAD_FAILED_MESSAGE));
                Err(DashboardError::Load(error))
            }
        }
    }

    fn ensure_ready(&self) -> DashboardResult<()> {
        match self.state {
            LoadState::Loading => Err(DashboardError::Busy),
            _ => Ok(()),
        }
    }

    // =========================================================================
    // Status workflow
    // =========================================================================

    /// Handle a status selection on a ledger row.
    ///
    /// Resolving opens the close prompt; other targets are persisted at once.
    pub fn request_status_change(
        &mut self,
        record: &CaseRecord,
        new_status: CaseStatus,
    ) -> DashboardResult<StatusChange> {
        self.ensure_ready()?;
        if !record.status_editable() {
            return Err(DashboardError::StatusNotEditable(record.kind));
        }

        if new_status == CaseStatus::Resolved {
            tracing::debug!(kind = ?record.kind, id = record.id, "Close prompt opened");
            self.pending_close = Some(PendingClose::new(record.clone()));
            return Ok(StatusChange::AwaitingResolution);
        }

        self.update_status(record, new_status, None)?;
        Ok(StatusChange::Persisted)
    }

    /// Persist a status change, then refetch everything.
    ///
    /// Resolving with a resolution text first calls the finalize endpoint,
    /// then sends the status update carrying the same text.
    pub fn update_status(
        &mut self,
        record: &CaseRecord,
        new_status: CaseStatus,
        resolution: Option<&str>,
    ) -> DashboardResult<()> {
        self.ensure_ready()?;

        let result = match record.kind {
            CaseKind::Complaint => self.persist_complaint(record.id, new_status, resolution),
            CaseKind::Request => self.persist_request(record.id, new_status, resolution),
            CaseKind::Commendation => return Err(DashboardError::StatusNotEditable(record.kind)),
        };

        if let Err(e) = result {
            tracing::warn!(kind = ?record.kind, id = record.id, error = %e, "Status update failed");
            return Err(DashboardError::Update(e));
        }

        tracing::info!(kind = ?record.kind, id = record.id, status = %new_status, "Status updated");
        self.load_all()
    }

    fn persist_complaint(
        &self,
        id: u64,
        status: CaseStatus,
        resolution: Option<&str>,
    ) -> BackendResult<()> {
        if let (CaseStatus::Resolved, Some(text)) = (status, resolution) {
            self.backend.finalize_complaint(id, text)?;
        }
        let update = ComplaintUpdate {
            status: Some(status),
            resolution: resolution.map(str::to_string),
            ..Default::default()
        };
        self.backend.update_complaint(id, &update)
    }

    fn persist_request(
        &self,
        id: u64,
        status: CaseStatus,
        resolution: Option<&str>,
    ) -> BackendResult<()> {
        if let (CaseStatus::Resolved, Some(text)) = (status, resolution) {
            self.backend.finalize_request(id, text)?;
        }
        let update = RequestUpdate {
            status: Some(status),
            resolution: resolution.map(str::to_string),
            ..Default::default()
        };
        self.backend.update_request(id, &update)
    }

    /// Submit the close prompt.
    ///
    /// An empty draft keeps the prompt open and sends nothing. Otherwise the
    /// prompt is cleared whether or not the update succeeds.
    pub fn confirm_close(&mut self, draft: &str, rating: Satisfaction) -> DashboardResult<()> {
        self.ensure_ready()?;
        if self.pending_close.is_none() {
            return Err(DashboardError::NoPendingClose);
        }
        if draft.trim().is_empty() {
            return Err(DashboardError::EmptyResolution);
        }

        let pending = self.pending_close.take().ok_or(DashboardError::NoPendingClose)?;
        let resolution = compose_resolution(draft, rating);
        self.update_status(&pending.record, CaseStatus::Resolved, Some(&resolution))
    }

    /// Submit the prompt using its own draft and rating.
    pub fn confirm_pending(&mut self) -> DashboardResult<()> {
        let (draft, rating) = match &self.pending_close {
            Some(pending) => (pending.draft.clone(), pending.rating),
            None => return Err(DashboardError::NoPendingClose),
        };
        self.confirm_close(&draft, rating)
    }

    pub fn cancel_close(&mut self) {
        if let Some(pending) = self.pending_close.take() {
            tracing::debug!(kind = ?pending.record.kind, id = pending.record.id, "Close prompt cancelled");
        }
    }
}

/// Collapse a scoped-thread join into the fetch result.
fn settle<T>(joined: thread::Result<BackendResult<T>>) -> BackendResult<T> {
    joined.unwrap_or_else(|_| Err(BackendError::Transport("fetch worker panicked".into())))
}
