//! services/web/src/lib.rs
//!
//! The `study_hub` web service: adapters for the core ports, configuration,
//! and the axum front end. The binaries in `src/bin` wire these together.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
