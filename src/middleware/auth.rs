use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;

/// Authenticated caller extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { subject: claims.sub }
    }
}

/// Signing secret shared by the auth gate
#[derive(Clone)]
pub struct AuthGate {
    secret: Arc<str>,
}

impl AuthGate {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self { secret: secret.into() }
    }

    /// Check the request credentials, yielding the caller on success
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
        let token = extract_jwt_from_headers(headers).map_err(ApiError::unauthorized)?;

        let claims = validate_jwt(&token, &self.secret)
            .map_err(|e| ApiError::unauthorized(e.to_string()))?;

        Ok(AuthUser::from(claims))
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = gate.authenticate(request.headers()).map_err(|e| {
        tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        e
    })?;

    tracing::debug!("Authenticated request from '{}'", auth_user.subject);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
