//! Request handlers for the translation endpoints.
//!
//! Handlers delegate to the artifact store, history store and job runner
//! held in [`AppState`](crate::state::AppState) and map errors via
//! [`AppError`](crate::error::AppError).

pub mod download;
pub mod history;
pub mod upload;
