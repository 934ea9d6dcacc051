//! Translation job execution.

pub mod runner;

pub use runner::{JobError, JobRunner};
