pub mod book;
pub mod list;
pub mod set;

pub use book::{book_appointment, booking_form, BookingConfirmation, BookingForm};
pub use list::my_appointments;
pub use set::set_status;
