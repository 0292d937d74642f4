//! Login, registration, OAuth hand-off and logout.

use std::fmt;

use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};

use fqs_core::backend::{BackendError, BackendResult};
use fqs_core::navigation::Route;

use crate::client::{Access, ApiClient};

pub const LOGIN_PATH: &str = "/usuario/login";
pub const REGISTER_PATH: &str = "/usuario/create";
pub const OAUTH_PATH: &str = "/auth/google";

pub const LOGIN_FAILED_MESSAGE: &str = "Credenciales inválidas";
pub const REGISTER_FAILED_MESSAGE: &str = "Error al registrar usuario";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Las contraseñas no coinciden";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Registration<'a> {
    email: &'a str,
    password: &'a str,
    password_confirm: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Why an OAuth callback did not yield a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackFailure {
    /// The provider reported an error
    AuthFailed,
    /// Neither a token nor an error came back
    NoToken,
}

impl CallbackFailure {
    /// Code carried back to the login screen.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthFailed => "auth_failed",
            Self::NoToken => "no_token",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::AuthFailed => "Error en la autenticación con Google",
            Self::NoToken => "No se recibió el token de autenticación",
        }
    }
}

impl fmt::Display for CallbackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    SignedIn,
    Failed(CallbackFailure),
}

impl CallbackOutcome {
    /// Where the user lands after the callback.
    pub fn route(&self) -> Route {
        match self {
            Self::SignedIn => Route::Dashboard,
            Self::Failed(_) => Route::Login,
        }
    }
}

/// Authentication calls. Tokens land in the client's session store.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl<'a> AuthApi<'a> {
    /// Exchange credentials for a token and store it.
    pub fn login(&self, email: &str, password: &str) -> BackendResult<()> {
        let response: LoginResponse = self.client.send_json_for(
            Method::POST,
            LOGIN_PATH,
            &Credentials { email, password },
            Access::Authenticated,
        )?;

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BackendError::Decode("login response carried no token".into()))?;
        self.client.session().set_token(&token)?;
        tracing::info!("Logged in");
        Ok(())
    }

    /// Create an account. Mismatched passwords fail before any request.
    pub fn register(&self, email: &str, password: &str, password_confirm: &str) -> BackendResult<()> {
        if password != password_confirm {
            return Err(BackendError::Validation(PASSWORD_MISMATCH_MESSAGE.into()));
        }
        self.client.send_json(
            Method::POST,
            REGISTER_PATH,
            &Registration {
                email,
                password,
                password_confirm,
            },
            Access::Authenticated,
        )?;
        tracing::info!("Account registered");
        Ok(())
    }

    /// Browser URL that starts the Google sign-in flow.
    pub fn oauth_login_url(&self) -> String {
        format!("{}{}", self.client.base_url(), OAUTH_PATH)
    }

    /// Finish the OAuth flow from the callback's query string (or full URL).
    ///
    /// An `error` parameter wins over a `token`. The navigator is sent to the
    /// resulting route.
    pub fn complete_oauth_callback(&self, query: &str) -> BackendResult<CallbackOutcome> {
        let outcome = match parse_callback(query) {
            (Some(_), _) => CallbackOutcome::Failed(CallbackFailure::AuthFailed),
            (None, Some(token)) => {
                self.client.session().set_token(&token)?;
                CallbackOutcome::SignedIn
            }
            (None, None) => CallbackOutcome::Failed(CallbackFailure::NoToken),
        };

        match outcome {
            CallbackOutcome::SignedIn => tracing::info!("Signed in through OAuth"),
            CallbackOutcome::Failed(failure) => {
                tracing::warn!(code = failure.code(), "OAuth callback failed")
            }
        }
        self.client.navigator().redirect(outcome.route());
        Ok(outcome)
    }

    /// Discard the local token. The backend is not contacted.
    pub fn logout(&self) -> BackendResult<()> {
        self.client.session().clear_token()?;
        tracing::info!("Logged out");
        Ok(())
    }
}

/// Extract non-empty `error` and `token` parameters.
fn parse_callback(query: &str) -> (Option<String>, Option<String>) {
    let query = query.trim();
    let url = Url::parse(query).or_else(|_| {
        Url::parse(&format!(
            "http://callback.invalid/?{}",
            query.trim_start_matches('?')
        ))
    });
    let Ok(url) = url else {
        return (None, None);
    };

    let mut error = None;
    let mut token = None;
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "error" => error = Some(value.into_owned()),
            "token" => token = Some(value.into_owned()),
            _ => {}
        }
    }
    (error, token)
}
