//! Seams between the console logic and the remote backend.
//!
//! The dashboard and screens only talk to these traits; `fqs-http` provides
//! the HTTP implementation and tests provide in-memory ones.

mod payload;

pub use payload::*;

use thiserror::Error;

use crate::models::{
    Commendation, Complaint, ComplaintUpdate, RatingForm, Request, RequestUpdate, Resource,
};

/// Failure of a backend call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Transport(String),

    /// Token rejected; the session was cleared and the user sent to login.
    #[error("Session expired")]
    SessionExpired,

    #[error("Request rejected with status {status}: {}", .payload.display_message("no details"))]
    Rejected { status: u16, payload: ErrorPayload },

    #[error("Invalid response: {0}")]
    Decode(String),

    /// Client-side check failed; nothing was sent.
    #[error("{0}")]
    Validation(String),

    #[error("Session store error: {0}")]
    Session(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    /// Text for a blocking alert, with a per-action fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { payload, .. } => payload.display_message(fallback),
            Self::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

impl From<crate::session::SessionError> for BackendError {
    fn from(e: crate::session::SessionError) -> Self {
        BackendError::Session(e.to_string())
    }
}

/// Calls the unified case dashboard needs.
pub trait CaseBackend: Send + Sync {
    fn list_complaints(&self) -> BackendResult<Vec<Complaint>>;
    fn list_commendations(&self) -> BackendResult<Vec<Commendation>>;
    fn list_requests(&self) -> BackendResult<Vec<Request>>;

    /// Append resolution text to a complaint and implicitly resolve it.
    fn finalize_complaint(&self, id: u64, text: &str) -> BackendResult<()>;
    fn update_complaint(&self, id: u64, update: &ComplaintUpdate) -> BackendResult<()>;

    /// Append resolution text to a request and implicitly resolve it.
    fn finalize_request(&self, id: u64, text: &str) -> BackendResult<()>;
    fn update_request(&self, id: u64, update: &RequestUpdate) -> BackendResult<()>;
}

impl<T: CaseBackend + ?Sized> CaseBackend for &T {
    fn list_complaints(&self) -> BackendResult<Vec<Complaint>> {
        (**self).list_complaints()
    }

    fn list_commendations(&self) -> BackendResult<Vec<Commendation>> {
        (**self).list_commendations()
    }

    fn list_requests(&self) -> BackendResult<Vec<Request>> {
        (**self).list_requests()
    }

    fn finalize_complaint(&self, id: u64, text: &str) -> BackendResult<()> {
        (**self).finalize_complaint(id, text)
    }

    fn update_complaint(&self, id: u64, update: &ComplaintUpdate) -> BackendResult<()> {
        (**self).update_complaint(id, update)
    }

    fn finalize_request(&self, id: u64, text: &str) -> BackendResult<()> {
        (**self).finalize_request(id, text)
    }

    fn update_request(&self, id: u64, update: &RequestUpdate) -> BackendResult<()> {
        (**self).update_request(id, update)
    }
}

/// CRUD calls for one resource collection.
pub trait ResourceBackend<R: Resource> {
    fn list(&self) -> BackendResult<Vec<R::Record>>;
    fn get(&self, id: u64) -> BackendResult<R::Record>;
    fn create(&self, input: &R::Create) -> BackendResult<()>;
    fn update(&self, id: u64, input: &R::Update) -> BackendResult<()>;
    fn delete(&self, id: u64) -> BackendResult<()>;
}

impl<R: Resource, T: ResourceBackend<R> + ?Sized> ResourceBackend<R> for &T {
    fn list(&self) -> BackendResult<Vec<R::Record>> {
        (**self).list()
    }

    fn get(&self, id: u64) -> BackendResult<R::Record> {
        (**self).get(id)
    }

    fn create(&self, input: &R::Create) -> BackendResult<()> {
        (**self).create(input)
    }

    fn update(&self, id: u64, input: &R::Update) -> BackendResult<()> {
        (**self).update(id, input)
    }

    fn delete(&self, id: u64) -> BackendResult<()> {
        (**self).delete(id)
    }
}

/// Source of satisfaction rating forms.
pub trait RatingBackend {
    fn list_ratings(&self) -> BackendResult<Vec<RatingForm>>;
}

impl<T: RatingBackend + ?Sized> RatingBackend for &T {
    fn list_ratings(&self) -> BackendResult<Vec<RatingForm>> {
        (**self).list_ratings()
    }
}
