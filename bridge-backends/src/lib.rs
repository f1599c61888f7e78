//! Outbound side of the bridge gateway.
//!
//! Each backend (messaging providers, scraper, job queue, report generator)
//! is an opaque JSON-in/JSON-out HTTP endpoint reached by exactly one POST
//! per inbound request. This crate owns the environment-derived backend
//! configuration, the outbound error taxonomy, and the client itself.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod client;
pub mod config;
pub mod error;

pub use client::BackendClient;
pub use config::BackendConfig;
pub use error::BackendError;
