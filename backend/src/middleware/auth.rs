//! Authentication middleware
//!
//! Verifies the session JWT issued by the pharmacy API and injects the
//! decoded [`Session`] into request extensions. The verification secret comes
//! from application state, never from ambient globals.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use shared::UserRole;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// The signed-in user making the request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication middleware that validates bearer tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing or invalid Authorization header".to_string(),
            message_es: "Falta el encabezado de autorización".to_string(),
        })?;

    let session = decode_session(token, &state.config.jwt.secret)?;
    tracing::debug!(user_id = %session.user_id, role = %session.role, "Session verified");

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Decode and validate a session token
pub fn decode_session(token: &str, secret: &str) -> AppResult<Session> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

    Ok(Session {
        user_id,
        role: claims.role,
    })
}

/// Only admin and warehouse dashboards see inventory alerts
pub fn require_alert_access(session: &Session) -> AppResult<()> {
    if session.role.can_view_alerts() {
        Ok(())
    } else {
        Err(AppError::InsufficientPermissions)
    }
}

/// Extractor for the current session
/// Use this in handlers behind `auth_middleware`
#[derive(Clone, Debug)]
pub struct CurrentSession(pub Session);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| AppError::Unauthorized {
                message: "Authentication required".to_string(),
                message_es: "Debe iniciar sesión".to_string(),
            })
    }
}
