// src/models/mod.rs

pub mod api;
pub mod app;
pub mod appointments;
pub mod database;
pub mod doctors;

pub use app::AppState;
pub use appointments::{Appointment, AppointmentStatus};
