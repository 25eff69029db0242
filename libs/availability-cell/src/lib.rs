pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

// Re-export the core types for external use
pub use error::AvailabilityError;
pub use models::{
    AvailabilityType, CreateSlotRequest, DaySummary, DayOfWeek, SaveScheduleRequest, Slot,
    SlotKey, SlotType, ToggleDayRequest, UpdateSlotRequest,
};
pub use services::{SlotManager, AvailabilityStore};
