pub mod params;

pub use params::{CreateDoctorRequest, LoginRequest, RegisterRequest, StatusResponse, TokenParams};
