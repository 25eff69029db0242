pub mod manager;
pub mod store;
pub mod validation;

pub use manager::SlotManager;
pub use store::AvailabilityStore;
pub use validation::validate_slot;
