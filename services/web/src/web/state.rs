//! services/web/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::web::templates::Templates;
use std::sync::Arc;
use study_hub_core::ports::{AnswerGenerator, DatabaseService, FileStore};
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub files: Arc<dyn FileStore>,
    pub answer_generator: Arc<dyn AnswerGenerator>,
    pub templates: Arc<Templates>,
    pub config: Arc<Config>,
}

//=========================================================================================
// AuthenticatedUser (Specific to One Request)
//=========================================================================================

/// Inserted into the request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub account_id: Uuid,
    pub session_id: String,
}
