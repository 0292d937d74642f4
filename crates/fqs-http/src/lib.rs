//! HTTP facade for the Portal FQS backend.
//!
//! [`ApiClient`] implements the `fqs-core` backend traits over a blocking
//! `reqwest` client, so the dashboard and screens run unchanged against the
//! real service. The `fqs-console` binary wires it to a terminal.

pub mod auth;
pub mod client;
pub mod config;
pub mod resources;
pub mod webhook;

pub use auth::*;
pub use client::{is_auth_failure_message, Access, ApiClient};
pub use config::{ConfigError, ConsoleConfig};
pub use resources::*;
pub use webhook::*;
