//! services/web/src/web/auth.rs
//!
//! Account registration, login and logout pages.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use study_hub_core::ports::PortError;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::{
    cookies::{expired_cookie, session_cookie, SESSION_COOKIE},
    flash::{redirect_with_flash, Flash},
    internal_error, render_page,
    state::{AppState, AuthenticatedUser},
    HandlerError,
};

//=========================================================================================
// Request Types
//=========================================================================================

/// The login and registration form.
#[derive(Deserialize, ToSchema)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

#[derive(serde::Serialize)]
struct NoBody {}

//=========================================================================================
// Password Hashing
//=========================================================================================

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// True when `password` matches the stored hash. A malformed hash never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            error!("Stored password hash could not be parsed: {:?}", e);
            false
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /login - The login form
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login page"))
)]
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    render_page(&state, &headers, "login.html", None, NoBody {}).await
}

/// POST /login - Start a session for an exact email and password match
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, redirected to the index"),
        (status = 200, description = "Login page showing \"Invalid credentials\""),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, HandlerError> {
    // 1. Look up the account; an unknown email is just a failed login.
    let credentials = match state.db.get_account_by_email(&form.email).await {
        Ok(credentials) => Some(credentials),
        Err(PortError::NotFound(_)) => None,
        Err(e) => return Err(internal_error("Failed to look up account", e)),
    };

    // 2. Verify the password
    let Some(credentials) =
        credentials.filter(|c| verify_password(&form.password, &c.password_hash))
    else {
        info!("Rejected login attempt for {}", form.email);
        return render_page(
            &state,
            &headers,
            "login.html",
            Some("Invalid credentials"),
            NoBody {},
        )
        .await;
    };

    // 3. Create the session row and hand its id to the browser
    let session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::hours(state.config.session_ttl_hours);
    state
        .db
        .create_auth_session(&session_id, credentials.id, expires_at)
        .await
        .map_err(|e| internal_error("Failed to create session", e))?;

    info!("Account {} logged in", credentials.id);
    let cookie = session_cookie(&session_id, state.config.cookie_secure);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// GET /register - The registration form
#[utoipa::path(
    get,
    path = "/register",
    responses((status = 200, description = "Registration page"))
)]
pub async fn register_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    render_page(&state, &headers, "register.html", None, NoBody {}).await
}

/// POST /register - Create an account
#[utoipa::path(
    post,
    path = "/register",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Account created, redirected to the login page"),
        (status = 200, description = "Registration page showing \"Email already exists\""),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, HandlerError> {
    let password_hash =
        hash_password(&form.password).map_err(|e| internal_error("Failed to hash password", e))?;

    match state.db.create_account(&form.email, &password_hash).await {
        Ok(account) => {
            info!("Registered account {}", account.id);
            Ok(redirect_with_flash("/login", Flash::RegistrationSucceeded))
        }
        Err(PortError::Conflict(_)) => {
            render_page(
                &state,
                &headers,
                "register.html",
                Some("Email already exists"),
                NoBody {},
            )
            .await
        }
        Err(e) => Err(internal_error("Failed to create account", e)),
    }
}

/// GET /logout - End the current session
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Session ended, redirected to the index"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, HandlerError> {
    state
        .db
        .delete_auth_session(&user.session_id)
        .await
        .map_err(|e| internal_error("Failed to log out", e))?;

    info!("Account {} logged out", user.account_id);
    Ok((
        [(header::SET_COOKIE, expired_cookie(SESSION_COOKIE))],
        Redirect::to("/"),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_verifies_only_against_its_own_hash() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("correct horse ", &hash));
        assert!(!verify_password("correct horse", "not-a-phc-string"));
    }
}
