//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for raw quotes and common market shapes.
//! - [`config`] - Canonical test configurations and engines.
//! - [`source`] - Scripted [`QuoteSource`](crate::collect::QuoteSource) for collector tests.

pub mod config;
pub mod domain;
pub mod source;
