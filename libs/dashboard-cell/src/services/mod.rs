pub mod appointment_board;
pub mod booking_modal;
pub mod doctor_search;
pub mod fencing;
pub mod list;

pub use appointment_board::AppointmentBoard;
pub use booking_modal::BookingModal;
pub use doctor_search::DoctorSearchView;
pub use fencing::{RequestFence, Ticket};
pub use list::{ListState, LoadOutcome};
