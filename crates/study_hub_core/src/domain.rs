//! crates/study_hub_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

// Represents an account - used throughout app
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
}

// Only used internally for login/registration - contains sensitive data
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// Metadata for an uploaded study document.
///
/// `uploader_name` is free text typed into the upload form; it is not linked
/// to the [`Account`] that performed the upload.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub uploader_name: String,
    pub course: String,
    pub uploaded_at: DateTime<Utc>,
}
