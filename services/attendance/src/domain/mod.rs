pub mod geofence;
pub mod repository;
pub mod types;

pub use presenza_core::clock::{Clock, SystemClock};
