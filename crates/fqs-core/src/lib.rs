//! Portal FQS Core Library
//!
//! Operator console logic for a hospital's patient feedback service:
//! complaints (quejas), commendations (felicitaciones) and requests
//! (solicitudes), plus the patients they reference.
//!
//! # Architecture
//!
//! ```text
//!   GET /quejas   GET /felicitacion   GET /solicitud
//!        │               │                  │
//!        └───────────────┼──────────────────┘
//!                        ▼
//!              load_all (all-or-nothing)
//!                        │
//!                        ▼
//!          project → unified CaseRecord ledger
//!                        │
//!           ┌────────────┴────────────┐
//!           ▼                         ▼
//!      filter / summary        status change
//!                                     │
//!                      RESUELTO? ─────┤
//!                        │            │
//!                  close prompt    update
//!                  (narrative +       │
//!                   satisfaction)     │
//!                        └──────┬─────┘
//!                               ▼
//!                         full refetch
//! ```
//!
//! # Modules
//!
//! - [`backend`]: Traits the logic calls into, plus the error taxonomy
//! - [`dashboard`]: Aggregated case view and close workflow
//! - [`screens`]: Per-resource list/edit screens
//! - [`ratings`]: Satisfaction ratings board
//! - [`session`]: Bearer token persistence
//! - [`navigation`]: Routes and the authentication guard
//! - [`countdown`]: Five-minute response window badge
//! - [`models`]: Wire types

pub mod backend;
pub mod countdown;
pub mod dashboard;
pub mod models;
pub mod navigation;
pub mod ratings;
pub mod screens;
pub mod session;

mod search;

// Re-export commonly used types
pub use backend::{BackendError, BackendResult, CaseBackend, ErrorPayload, RatingBackend, ResourceBackend};
pub use countdown::{Clock, CountdownBadge, CountdownState, SystemClock};
pub use dashboard::{
    CaseDashboard, CaseFilter, DashboardError, LoadState, PendingClose, Satisfaction, StatusChange,
    StatusSummary,
};
pub use models::{CaseKind, CaseRecord, CaseStatus, Person};
pub use navigation::{guard, Navigator, Route};
pub use ratings::{RatingBoard, RatingStats};
pub use screens::{ResourceScreen, ScreenError, ScreenResource};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
