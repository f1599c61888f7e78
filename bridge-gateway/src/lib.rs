//! HTTP bridge gateway.
//!
//! Accepts authenticated JSON requests, validates their shape, and forwards
//! each to one externally configured backend service (messaging providers,
//! scraper, job queue, report generator). Every response is normalized into
//! the `{status, data|error}` envelope.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod auth;
pub mod config;
pub mod error;
pub mod limit;
pub mod routes;
pub mod state;
