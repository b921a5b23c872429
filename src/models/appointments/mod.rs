pub mod appointment;

pub use appointment::{
    Appointment, AppointmentResponse, AppointmentStatus, BookAppointmentParams,
    CreateAppointmentRequest, StatusPatch,
};
