//! Built-in provider implementations, one module per coordinate kind.

pub mod local;
pub mod maven;
