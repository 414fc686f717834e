//! services/web/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::web::{
    cookies::{read_cookie, SESSION_COOKIE},
    state::{AppState, AuthenticatedUser},
};

/// Middleware that validates the session cookie.
///
/// On success an [`AuthenticatedUser`] is inserted into the request extensions.
/// A missing, unknown or expired session sends the browser to `/login`.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let session_id = read_cookie(req.headers(), SESSION_COOKIE)
        .map(str::to_string)
        .ok_or_else(|| Redirect::to("/login"))?;

    let account_id = state
        .db
        .validate_auth_session(&session_id)
        .await
        .map_err(|e| {
            debug!("Rejected session for {}: {}", req.uri(), e);
            Redirect::to("/login")
        })?;

    req.extensions_mut().insert(AuthenticatedUser {
        account_id,
        session_id,
    });

    Ok(next.run(req).await)
}
