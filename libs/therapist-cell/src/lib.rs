pub mod models;
pub mod services;

pub use models::*;

pub use services::directory::DirectoryService;
pub use services::schedule::{day_slots, next_occurrence, slots, Slots};
