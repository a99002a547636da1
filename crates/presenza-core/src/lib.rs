//! Shared service plumbing: health endpoints, request-id middleware,
//! tracing setup, time abstraction and serde helpers.

pub mod clock;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
