//! Error types for slot-engine operations.

use thiserror::Error;

use crate::model::AvailabilityWindow;

/// A submitted availability window was rejected before persistence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `start_time >= end_time` (zero or negative length).
    #[error("Malformed window: {window} has zero or negative length")]
    Malformed { window: AvailabilityWindow },

    /// The candidate overlaps a window already declared on the same weekday.
    #[error("Window {candidate} overlaps existing window {conflicting}")]
    Overlap {
        candidate: AvailabilityWindow,
        conflicting: AvailabilityWindow,
    },
}

/// A single snapshot record could not be used and was skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("{entity} #{index}: missing field `{field}`")]
    MissingField {
        entity: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("{entity} #{index}: invalid `{field}` value '{value}'")]
    InvalidField {
        entity: &'static str,
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("{entity} #{index}: ends before it starts")]
    Inverted { entity: &'static str, index: usize },
}

/// A booking payload could not be assembled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Missing required contact field: {0}")]
    MissingContact(&'static str),

    #[error("Question #{index} is unanswered")]
    Unanswered { index: usize },

    #[error("Answer references unknown question #{index}")]
    UnknownQuestion { index: usize },

    #[error("Question #{index} answered more than once")]
    DuplicateAnswer { index: usize },

    #[error("Slot is {actual} minutes long, link requires {expected}")]
    DurationMismatch { expected: i64, actual: i64 },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("Snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
