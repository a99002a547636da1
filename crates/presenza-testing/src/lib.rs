//! Test support shared across service test suites.

pub mod clock;
