pub mod booking;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod slots;
pub mod summary;
pub mod wizard;
