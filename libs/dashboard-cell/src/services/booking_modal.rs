use chrono::NaiveDate;
use tracing::{info, warn};

use appointment_cell::{Appointment, AppointmentService, CreateAppointmentRequest};
use doctor_cell::Doctor;
use shared_models::error::ClientError;

use crate::models::{Notice, BOOKED, BOOKING_FAILED};

#[derive(Debug, Clone, Default)]
pub struct BookingModal {
    doctor: Option<Doctor>,
    date_input: String,
    last_booked: Option<Appointment>,
}

impl BookingModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, doctor: Doctor) {
        self.date_input.clear();
        self.doctor = Some(doctor);
    }

    pub fn is_open(&self) -> bool {
        self.doctor.is_some()
    }

    pub fn doctor(&self) -> Option<&Doctor> {
        self.doctor.as_ref()
    }

    pub fn set_date(&mut self, input: impl Into<String>) {
        self.date_input = input.into();
    }

    pub fn date_input(&self) -> &str {
        &self.date_input
    }

    /// Appointment created by the most recent successful submit.
    pub fn last_booked(&self) -> Option<&Appointment> {
        self.last_booked.as_ref()
    }

    pub fn close(&mut self) {
        self.doctor = None;
        self.date_input.clear();
    }

    fn request(&self) -> Result<CreateAppointmentRequest, ClientError> {
        let doctor = self
            .doctor
            .as_ref()
            .ok_or_else(|| ClientError::Validation("Please select a doctor".to_string()))?;

        let raw = self.date_input.trim();
        if raw.is_empty() {
            return Err(ClientError::Validation("Please select a date".to_string()));
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ClientError::Validation("Invalid date".to_string()))?;

        Ok(CreateAppointmentRequest {
            doctor_id: doctor.id.clone(),
            date,
        })
    }

    /// Book the selected doctor on the entered date.
    ///
    /// Success closes the modal; a failure keeps it open with its input.
    pub async fn submit(&mut self, service: &AppointmentService, today: NaiveDate) -> Notice {
        let result = match self.request() {
            Ok(request) => service.create_appointment(&request, today).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(appointment) => {
                info!("Booked appointment {}", appointment.id);
                self.last_booked = Some(appointment);
                self.close();
                Notice::success(BOOKED)
            }
            Err(e) => {
                warn!("Booking failed: {}", e);
                Notice::from_error(&e, BOOKING_FAILED)
            }
        }
    }
}
