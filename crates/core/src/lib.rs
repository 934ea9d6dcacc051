//! Domain building blocks for the Polyglot translation service.
//!
//! Everything here is transport-agnostic: the API crate wires these types to
//! axum, the db crate backs [`history::HistoryStore`] with Postgres, and the
//! translator crate implements [`translation::Translator`] over HTTP.

pub mod artifacts;
pub mod error;
pub mod history;
pub mod job;
pub mod job_events;
pub mod naming;
pub mod translation;
pub mod types;
