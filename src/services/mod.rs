pub mod appointment_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod doctor_service;
pub mod queue_service;

