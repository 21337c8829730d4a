//! Auth types shared across WorkTunes crates.
//!
//! Provides JWT issuing and validation, the bearer-token extractors, and password hashing.

pub mod identity;
pub mod password;
pub mod token;
