pub mod doctor;

pub use doctor::{Doctor, DoctorActivePatch, DoctorCard, NewDoctor, SPECIALIZATIONS};
