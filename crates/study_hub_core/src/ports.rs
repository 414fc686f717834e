//! crates/study_hub_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use crate::domain::{Account, AccountCredentials, Document};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Account Management ---
    /// Fails with [`PortError::Conflict`] when the email is already registered.
    async fn create_account(&self, email: &str, password_hash: &str) -> PortResult<Account>;

    async fn get_account_by_email(&self, email: &str) -> PortResult<AccountCredentials>;

    async fn get_account_by_id(&self, account_id: Uuid) -> PortResult<Account>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        account_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the account owning an unexpired session.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Document Management ---
    async fn create_document(
        &self,
        filename: &str,
        uploader_name: &str,
        course: &str,
    ) -> PortResult<Document>;

    /// All documents in upload order.
    async fn list_documents(&self) -> PortResult<Vec<Document>>;
}

/// Storage for the raw bytes of uploaded files, addressed by sanitized filename.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Writes `bytes` under `filename`, replacing any previous content.
    async fn save(&self, filename: &str, bytes: &[u8]) -> PortResult<()>;

    async fn read(&self, filename: &str) -> PortResult<Vec<u8>>;
}

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Sends a single prompt to the generative-text model and returns its raw reply.
    async fn generate_answer(&self, prompt: &str) -> PortResult<String>;
}
