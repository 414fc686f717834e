//! services/web/src/web/mod.rs
//!
//! The HTML front end: routing, page rendering and the handlers behind them.

pub mod api_doc;
pub mod auth;
pub mod chat;
pub mod cookies;
pub mod documents;
pub mod flash;
pub mod middleware;
pub mod state;
pub mod templates;

pub use middleware::require_auth;

use crate::web::{
    cookies::{expired_cookie, read_cookie, FLASH_COOKIE, SESSION_COOKIE},
    flash::Flash,
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware as axum_middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use study_hub_core::Account;
use tower_http::trace::TraceLayer;
use tracing::error;

/// The error half of every handler result: a status and a short plain-text body.
pub type HandlerError = (StatusCode, String);

/// Logs `e` and hides it behind a 500 carrying only `context`.
pub(crate) fn internal_error<E: std::fmt::Debug>(context: &str, e: E) -> HandlerError {
    error!("{}: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
}

/// The account behind the request's session cookie, if the session is live.
pub(crate) async fn current_account(state: &AppState, headers: &HeaderMap) -> Option<Account> {
    let session_id = read_cookie(headers, SESSION_COOKIE)?;
    let account_id = state.db.validate_auth_session(session_id).await.ok()?;
    state.db.get_account_by_id(account_id).await.ok()
}

#[derive(Serialize)]
struct Page<'a, T> {
    user: Option<String>,
    message: Option<&'a str>,
    #[serde(flatten)]
    body: T,
}

/// Renders `template` inside the common layout.
///
/// `message` wins over a pending flash; either way the flash cookie is
/// cleared once a page has been shown.
pub(crate) async fn render_page<T: Serialize>(
    state: &AppState,
    headers: &HeaderMap,
    template: &str,
    message: Option<&str>,
    body: T,
) -> Result<Response, HandlerError> {
    let pending_flash = read_cookie(headers, FLASH_COOKIE).is_some();
    let message = message.or_else(|| Flash::from_headers(headers).map(Flash::message));
    let user = current_account(state, headers).await.map(|a| a.email);

    let html = state
        .templates
        .render(template, Page { user, message, body })
        .map_err(|e| internal_error("Failed to render page", e))?;

    let mut response = Html(html).into_response();
    if pending_flash {
        let clear = HeaderValue::from_str(&expired_cookie(FLASH_COOKIE))
            .map_err(|e| internal_error("Failed to build cookie", e))?;
        response.headers_mut().append(header::SET_COOKIE, clear);
    }
    Ok(response)
}

/// Assembles every route. Uploading and logging out sit behind `require_auth`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/", get(documents::index_handler))
        .route("/uploads/{filename}", get(documents::download_handler))
        .route("/chat", get(chat::chat_page).post(chat::chat_handler))
        .route("/login", get(auth::login_page).post(auth::login_handler))
        .route(
            "/register",
            get(auth::register_page).post(auth::register_handler),
        );

    let protected_routes = Router::new()
        .route("/upload", post(documents::upload_handler))
        .route("/logout", get(auth::logout_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
