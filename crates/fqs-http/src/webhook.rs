//! Public intake endpoints used by kiosks and external forms.
//!
//! These calls never carry the operator's token and never end the session.

use reqwest::{Method, Url};

use fqs_core::backend::{BackendError, BackendResult};
use fqs_core::models::{
    DashboardStats, Person, WebhookCommendationInput, WebhookComplaintInput, WebhookPersonInput,
    WebhookRequestInput, WebhookStatusInput,
};

use crate::client::{Access, ApiClient};

pub const WEBHOOK_PREFIX: &str = "/webhook";

pub struct WebhookClient<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn webhook(&self) -> WebhookClient<'_> {
        WebhookClient { client: self }
    }
}

impl<'a> WebhookClient<'a> {
    fn path(suffix: &str) -> String {
        format!("{}{}", WEBHOOK_PREFIX, suffix)
    }

    fn post<B: serde::Serialize>(&self, suffix: &str, body: &B) -> BackendResult<()> {
        let path = Self::path(suffix);
        self.client
            .send_json(Method::POST, &path, body, Access::Public)?;
        tracing::info!(%path, "Intake submitted");
        Ok(())
    }

    pub fn submit_complaint(&self, input: &WebhookComplaintInput) -> BackendResult<()> {
        self.post("/queja", input)
    }

    pub fn submit_commendation(&self, input: &WebhookCommendationInput) -> BackendResult<()> {
        self.post("/felicitacion", input)
    }

    pub fn submit_request(&self, input: &WebhookRequestInput) -> BackendResult<()> {
        self.post("/solicitud", input)
    }

    /// Create the person, or update the one with the same hospital code.
    pub fn upsert_person(&self, input: &WebhookPersonInput) -> BackendResult<()> {
        self.post("/persona", input)
    }

    /// Look a person up by hospital code. Unknown codes yield `None`.
    pub fn find_person(&self, hc_code: &str) -> BackendResult<Option<Person>> {
        let path = segment_path(&Self::path("/persona"), hc_code)?;
        self.client.find(&path, Access::Public)
    }

    pub fn update_status(&self, input: &WebhookStatusInput) -> BackendResult<()> {
        let path = Self::path("/estado");
        self.client
            .send_json(Method::PUT, &path, input, Access::Public)?;
        tracing::info!(record_type = ?input.record_type, id = input.id, "Intake status updated");
        Ok(())
    }

    pub fn stats(&self) -> BackendResult<DashboardStats> {
        self.client.get(&Self::path("/dashboard"), Access::Public)
    }
}

/// Append `value` to `prefix` as one percent-encoded path segment.
fn segment_path(prefix: &str, value: &str) -> BackendResult<String> {
    let invalid = || BackendError::Validation(format!("Invalid path segment: {}", value));
    let mut url = Url::parse("http://intake.local/").map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(prefix.split('/').filter(|s| !s.is_empty()))
        .push(value);
    Ok(url.path().to_string())
}
