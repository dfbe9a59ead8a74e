pub mod config;
pub mod distance;
pub mod log;
pub mod map;
pub mod metrics;
