//! Wire-shape types for the bridge gateway.
//!
//! Defines the uniform response envelope and the request discriminators
//! (`channel`, `task`) that select a backend.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod channel;
pub mod envelope;

pub use channel::{Channel, Task, UnknownChannel, UnknownTask};
pub use envelope::Envelope;
