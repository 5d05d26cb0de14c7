//! Utility Module
//!
//! - [`Timer`]: frame delta and elapsed time
//! - [`FpsCounter`]: frame rate measurement over one-second windows

pub mod fps_counter;
pub mod time;

pub use fps_counter::FpsCounter;
pub use time::Timer;
