use thiserror::Error;

use shared_models::error::AppError;

use crate::models::DayOfWeek;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Please enter both start and end times")]
    MissingTime,

    #[error("Start time must be before end time ({start} - {end})")]
    InvalidRange { start: String, end: String },

    #[error("Each slot must be at least 30 minutes long ({start} - {end})")]
    TooShort { start: String, end: String },

    #[error("Duplicate slot ({start} - {end}) already exists for {day}")]
    DuplicateSlot {
        day: DayOfWeek,
        start: String,
        end: String,
    },

    #[error("Time slot ({start} - {end}) overlaps with existing ({other_start} - {other_end}) for {day}")]
    OverlapConflict {
        day: DayOfWeek,
        start: String,
        end: String,
        other_start: String,
        other_end: String,
    },

    #[error("Availability slot not found")]
    SlotNotFound,

    #[error("Remote availability store error: {0}")]
    Remote(#[from] anyhow::Error),
}

impl AvailabilityError {
    /// Validation errors never reach the remote store; the user corrects the
    /// input and retries.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            AvailabilityError::Remote(_) | AvailabilityError::SlotNotFound
        )
    }
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            e @ (AvailabilityError::MissingTime
            | AvailabilityError::InvalidRange { .. }
            | AvailabilityError::TooShort { .. }) => AppError::ValidationError(e.to_string()),
            e @ (AvailabilityError::DuplicateSlot { .. }
            | AvailabilityError::OverlapConflict { .. }) => AppError::Conflict(e.to_string()),
            AvailabilityError::SlotNotFound => {
                AppError::NotFound("Availability slot not found".to_string())
            }
            AvailabilityError::Remote(e) => AppError::ExternalService(e.to_string()),
        }
    }
}
