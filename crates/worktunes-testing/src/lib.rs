//! Test utilities for WorkTunes services.
//!
//! Import in `#[cfg(test)]` blocks and integration tests only.

pub mod auth;
