//! Shared utilities for the Clasp dependency tool.
//!
//! This crate provides the cross-cutting concerns used by all other Clasp
//! crates: the unified error type and small filesystem helpers.

pub mod errors;
pub mod fs;
