pub mod directory;
pub mod schedule;
