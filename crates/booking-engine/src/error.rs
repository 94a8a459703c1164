//! Error types for booking-engine operations.
//!
//! Scheduling-rule rejections (closed day, outside hours, double booking) are
//! NOT errors: they are returned as data inside
//! [`ValidationResult`](crate::validator::ValidationResult). This enum covers
//! malformed input, bad configuration, and calendar infrastructure failures.

use thiserror::Error;

use crate::gateway::GatewayError;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Calendar unavailable: {0}")]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, SchedulingError>;
