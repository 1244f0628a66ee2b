use thiserror::Error;

use crate::core::booking::DraftField;
use crate::core::calendar::CalendarDate;
use crate::core::wizard::WizardStep;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid transition: cannot {action} while {step}")]
    InvalidStateTransition {
        step: WizardStep,
        action: &'static str,
    },

    #[error("Missing selection: {0}")]
    MissingSelection(DraftField),

    #[error("Date {0} is not available for booking")]
    DateUnavailable(CalendarDate),

    #[error("Time slot {0} is not offered")]
    SlotUnavailable(String),

    #[error("Booking {booking_id} was confirmed but could not be saved: {source}")]
    PersistenceFailure {
        booking_id: String,
        #[source]
        source: StorageError,
    },
}

#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    #[error("Milestone {milestone_id} not found on goal {goal_id}")]
    MilestoneNotFound { goal_id: String, milestone_id: u32 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    File(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
