//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, networking, or heavy logic. Just data and simple helpers.
//!
//! * [`features`]: the feature record as delivered by the manifest loader.
//! * [`config`]: generator settings, threaded explicitly through every call.
//! * [`constants`]: well-known attribute names and defaults.

pub mod config;
pub mod constants;
pub mod features;
