pub mod config;
pub mod error;
pub mod rating;
pub mod telemetry;
