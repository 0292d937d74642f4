//! Blocking HTTP client shared by every API wrapper.
//!
//! Owns the bearer-token attachment and the global auth-failure policy:
//! a rejected token clears the session and redirects to the login route
//! before the caller sees [`BackendError::SessionExpired`].

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use fqs_core::backend::{BackendError, BackendResult, ErrorPayload};
use fqs_core::navigation::{Navigator, Route};
use fqs_core::session::SessionStore;

use crate::config::ConsoleConfig;

/// Endpoints where a 401 means bad credentials, not an expired session.
pub const CREDENTIAL_ENDPOINTS: &[&str] = &["/usuario/login", "/usuario/create"];

/// Error messages the backend uses for a bad or expired token.
static AUTH_FAILURE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(jwt|token).*(expired|invalid|malformed)|invalid signature|unauthori[sz]ed").ok()
});

/// Whether a response message reads as a token rejection.
pub fn is_auth_failure_message(message: &str) -> bool {
    AUTH_FAILURE_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(message))
}

/// Whether the auth-failure policy applies to `path`.
fn is_credential_endpoint(path: &str) -> bool {
    CREDENTIAL_ENDPOINTS.iter().any(|endpoint| path.contains(endpoint))
}

/// How a request interacts with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Bearer token attached; token rejections end the session
    Authenticated,
    /// No token; failures never touch the session
    Public,
}

pub struct ApiClient {
    base_url: String,
    timeout_secs: u64,
    http: Client,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: &ConsoleConfig,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> BackendResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.request_timeout_secs,
            http,
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    pub(crate) fn get<T: DeserializeOwned>(&self, path: &str, access: Access) -> BackendResult<T> {
        let body = self.execute(Method::GET, path, None::<&()>, access)?;
        decode(path, &body)
    }

    /// GET that maps a 404 to `None`.
    pub(crate) fn find<T: DeserializeOwned>(
        &self,
        path: &str,
        access: Access,
    ) -> BackendResult<Option<T>> {
        match self.execute(Method::GET, path, None::<&()>, access) {
            Ok(body) => decode(path, &body).map(Some),
            Err(BackendError::Rejected { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        access: Access,
    ) -> BackendResult<String> {
        self.execute(method, path, Some(body), access)
    }

    pub(crate) fn send_json_for<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        access: Access,
    ) -> BackendResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.execute(method, path, Some(body), access)?;
        decode(path, &text)
    }

    pub(crate) fn delete(&self, path: &str) -> BackendResult<()> {
        self.execute(Method::DELETE, path, None::<&()>, Access::Authenticated)
            .map(|_| ())
    }

    /// Send one request and return the raw success body.
    fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        access: Access,
    ) -> BackendResult<String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "Sending request");

        let mut request: RequestBuilder = self.http.request(method.clone(), &url);
        if access == Access::Authenticated {
            if let Some(token) = self.session.token().filter(|t| !t.is_empty()) {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let text = response.text().map_err(|e| self.transport_error(e))?;

        if status.is_success() {
            return Ok(text);
        }

        let payload = ErrorPayload::from_body(&text);
        if access == Access::Authenticated && self.is_token_rejection(path, status, &payload) {
            self.end_session(path, status);
            return Err(BackendError::SessionExpired);
        }

        tracing::warn!(%method, %url, status = status.as_u16(), "Request rejected");
        Err(BackendError::Rejected {
            status: status.as_u16(),
            payload,
        })
    }

    fn is_token_rejection(&self, path: &str, status: StatusCode, payload: &ErrorPayload) -> bool {
        if is_credential_endpoint(path) {
            return false;
        }
        matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
            || payload.message().is_some_and(|m| is_auth_failure_message(&m))
    }

    fn end_session(&self, path: &str, status: StatusCode) {
        tracing::warn!(path, status = status.as_u16(), "Session expired, returning to login");
        if let Err(e) = self.session.clear_token() {
            tracing::error!(error = %e, "Failed to clear session token");
        }
        self.navigator.redirect(Route::Login);
    }

    fn transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_connect() {
            BackendError::Transport(format!("Cannot connect to {}", self.base_url))
        } else if e.is_timeout() {
            BackendError::Transport(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> BackendResult<T> {
    serde_json::from_str(body)
        .map_err(|e| BackendError::Decode(format!("{}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_messages() {
        assert!(is_auth_failure_message("jwt expired"));
        assert!(is_auth_failure_message("JWT malformed"));
        assert!(is_auth_failure_message("Token is invalid"));
        assert!(is_auth_failure_message("invalid signature"));
        assert!(is_auth_failure_message("Unauthorized"));
        assert!(is_auth_failure_message("unauthorised access"));
        assert!(!is_auth_failure_message("Estado inválido"));
        assert!(!is_auth_failure_message("token required"));
    }

    #[test]
    fn test_credential_endpoints() {
        assert!(is_credential_endpoint("/usuario/login"));
        assert!(is_credential_endpoint("/usuario/create"));
        assert!(!is_credential_endpoint("/quejas"));
        assert!(!is_credential_endpoint("/usuario/findAll/"));
    }

    proptest::proptest! {
        #[test]
        fn test_jwt_expiry_detected_anywhere(prefix in "[a-z ]{0,10}", suffix in "[a-z ]{0,10}") {
            let message = format!("{}jwt expired{}", prefix, suffix);
            proptest::prop_assert!(is_auth_failure_message(&message));
        }
    }

    #[test]
    fn test_decode_error_names_path() {
        let err = decode::<Vec<u64>>("/quejas", "<html>").unwrap_err();
        assert!(matches!(err, BackendError::Decode(ref m) if m.starts_with("/quejas")));
    }
}
