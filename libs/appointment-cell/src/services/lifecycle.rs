// libs/appointment-cell/src/services/lifecycle.rs
use chrono::NaiveDate;
use tracing::{debug, warn};

use shared_models::auth::Role;
use shared_models::error::ClientError;

use crate::models::{AppointmentAction, AppointmentStatus};

#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: &AppointmentStatus,
        new_status: &AppointmentStatus,
    ) -> Result<(), ClientError> {
        debug!("Validating status transition from {:?} to {:?}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(new_status) {
            warn!("Invalid status transition attempted: {:?} -> {:?}", current_status, new_status);
            return Err(ClientError::State(format!(
                "Appointment is already {} and cannot be marked {}",
                current_status, new_status
            )));
        }

        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Pending => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
        }
    }

    /// Actions offered to `role` for an appointment in `status`.
    ///
    /// Doctors may complete or cancel, patients may only cancel, and nothing
    /// is offered once the appointment is terminal.
    pub fn allowed_actions(&self, role: Role, status: &AppointmentStatus) -> Vec<AppointmentAction> {
        let candidates: &[AppointmentAction] = match role {
            Role::Doctor => &[AppointmentAction::Complete, AppointmentAction::Cancel],
            Role::Patient => &[AppointmentAction::Cancel],
        };

        let valid = self.get_valid_transitions(status);
        candidates
            .iter()
            .copied()
            .filter(|action| valid.contains(&action.target_status()))
            .collect()
    }

    /// Bookings are for today or later.
    pub fn validate_booking_date(&self, date: NaiveDate, today: NaiveDate) -> Result<(), ClientError> {
        if date < today {
            return Err(ClientError::Validation(
                "Appointment date cannot be in the past".to_string(),
            ));
        }
        Ok(())
    }
}
