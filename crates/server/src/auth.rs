//! HTTP Basic authentication for the API listener.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use clientes_core::config::SecurityConfig;
use clientes_core::security::{CredentialStore, Principal};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

const CHALLENGE: &str = "Basic realm=\"clientes\"";
const CUSTOMERS_PREFIX: &str = "/customers";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication required")]
    MissingCredentials,
    #[error("malformed Basic credentials")]
    MalformedCredentials,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("user `{username}` lacks role `{role}`")]
    MissingRole { username: String, role: String },
}

#[derive(Debug, Serialize)]
struct AuthErrorBody {
    error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody { error: self.to_string() });
        match self {
            Self::MissingRole { .. } => (StatusCode::FORBIDDEN, body).into_response(),
            _ => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE))],
                body,
            )
                .into_response(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthState {
    credentials: Arc<CredentialStore>,
    customers_role: Arc<str>,
}

impl AuthState {
    pub fn new(credentials: CredentialStore, customers_role: impl Into<String>) -> Self {
        Self {
            credentials: Arc::new(credentials),
            customers_role: Arc::from(customers_role.into()),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(CredentialStore::from_config(config), config.customers_role.clone())
    }

    /// Every path needs a valid account; customer routes also need the configured role.
    pub fn authorize(&self, headers: &HeaderMap, path: &str) -> Result<Principal, AuthError> {
        let (username, password) = basic_credentials(headers)?;
        let principal = self
            .credentials
            .authenticate(&username, &password)
            .ok_or(AuthError::InvalidCredentials)?;

        if is_customers_path(path) && !principal.has_role(&self.customers_role) {
            return Err(AuthError::MissingRole {
                username: principal.username,
                role: self.customers_role.to_string(),
            });
        }

        Ok(principal)
    }
}

pub async fn require_basic_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.authorize(request.headers(), request.uri().path()) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(error) => {
            warn!(
                event_name = "security.auth.rejected",
                path = %request.uri().path(),
                method = %request.method(),
                reason = %error,
                "request rejected by authentication"
            );
            error.into_response()
        }
    }
}

pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredentials)?;

    let (scheme, encoded) = value.trim().split_once(' ').ok_or(AuthError::MalformedCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MissingCredentials);
    }

    let decoded = STANDARD.decode(encoded.trim()).map_err(|_| AuthError::MalformedCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;
    let (username, password) = decoded.split_once(':').ok_or(AuthError::MalformedCredentials)?;

    Ok((username.to_string(), password.to_string()))
}

fn is_customers_path(path: &str) -> bool {
    path == CUSTOMERS_PREFIX
        || path.strip_prefix(CUSTOMERS_PREFIX).is_some_and(|rest| rest.starts_with('/'))
}
