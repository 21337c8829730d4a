//! Domain types shared across WorkTunes crates.
//!
//! This crate contains only pure types and lookup logic with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod activity;
pub mod environment;
pub mod music;
pub mod pagination;
