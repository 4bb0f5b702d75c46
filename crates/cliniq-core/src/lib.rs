//! cliniq-core
//!
//! Pure domain types and API path conventions.
//! No transport dependency. This is the shared vocabulary of the CliniqAI client.

pub mod api_paths;
pub mod error;
pub mod models;
