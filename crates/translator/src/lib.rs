//! HTTP client for the remote translation API.
//!
//! Implements [`polyglot_core::translation::Translator`] with [`reqwest`].

pub mod client;
pub mod config;

pub use client::HttpTranslator;
pub use config::TranslatorConfig;
