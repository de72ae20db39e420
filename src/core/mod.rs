//! Services that sit between raw records and the pure billing engine.

pub mod services;
pub mod time;
pub mod utils;

pub use time::{Clock, FixedClock, SystemClock};
