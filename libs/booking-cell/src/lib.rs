pub mod models;
pub mod services;

pub use models::*;

pub use services::lifecycle::AppointmentLifecycle;
pub use services::store::AppointmentStore;
pub use services::workflow::BookingWorkflow;
