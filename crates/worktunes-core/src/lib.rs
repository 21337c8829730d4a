//! HTTP plumbing shared by WorkTunes services.

pub mod envelope;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
