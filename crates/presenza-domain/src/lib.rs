//! Pure domain primitives shared across Presenza services.

pub mod geo;
pub mod id;
