use std::future::Future;
use std::sync::Arc;
use chrono::NaiveDate;
use tracing::{info, warn};

use appointment_cell::{
    Appointment, AppointmentAction, AppointmentFilter, AppointmentService, AppointmentStats,
    AppointmentStatus,
};
use shared_models::auth::Role;
use shared_models::error::ClientError;
use shared_models::pagination::Paginated;

use crate::models::{Notice, CANCELLED, CANCEL_FAILED, UPDATE_FAILED};
use crate::services::fencing::Ticket;
use crate::services::list::{ListState, LoadOutcome};

/// Appointment list of the signed-in doctor or patient.
pub struct AppointmentBoard {
    role: Role,
    service: Arc<AppointmentService>,
    status: Option<AppointmentStatus>,
    date: Option<NaiveDate>,
    page: u32,
    appointments: ListState<AppointmentFilter, Appointment>,
}

impl AppointmentBoard {
    pub fn new(role: Role, service: Arc<AppointmentService>) -> Self {
        Self {
            role,
            service,
            status: None,
            date: None,
            page: 1,
            appointments: ListState::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn filter(&self) -> AppointmentFilter {
        AppointmentFilter {
            status: self.status,
            date: self.date,
            page: self.page,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn set_status(&mut self, status: Option<AppointmentStatus>) {
        self.status = status;
    }

    /// Doctors only.
    pub fn set_date(&mut self, date: Option<NaiveDate>) -> Result<(), ClientError> {
        if self.role != Role::Doctor {
            return Err(ClientError::Validation(
                "Date filter is only available to doctors".to_string(),
            ));
        }
        self.date = date;
        Ok(())
    }

    pub fn show_today(&mut self, today: NaiveDate) -> Result<(), ClientError> {
        self.set_date(Some(today))
    }

    pub fn clear_filters(&mut self) {
        self.status = None;
        self.date = None;
        self.page = 1;
    }

    pub fn previous_page(&mut self) -> bool {
        let previous = self.page.saturating_sub(1).max(1);
        let changed = previous != self.page;
        self.page = previous;
        changed
    }

    pub fn next_page(&mut self) -> bool {
        let next = (self.page + 1).min(self.appointments.total_pages());
        let changed = next != self.page;
        self.page = next;
        changed
    }

    pub fn begin_load(&mut self) -> Ticket<AppointmentFilter> {
        let filter = self.filter();
        self.appointments.begin(filter)
    }

    pub fn fetch(
        &self,
        ticket: &Ticket<AppointmentFilter>,
    ) -> impl Future<Output = Result<Paginated<Appointment>, ClientError>> + Send + 'static {
        let service = self.service.clone();
        let role = self.role;
        let filter = ticket.params().clone();
        async move { service.list_appointments(role, &filter).await }
    }

    pub fn complete_load(
        &mut self,
        ticket: &Ticket<AppointmentFilter>,
        result: Result<Paginated<Appointment>, ClientError>,
    ) -> LoadOutcome {
        self.appointments.complete(ticket, result)
    }

    pub async fn refresh(&mut self) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = self.fetch(&ticket).await;
        self.complete_load(&ticket, result)
    }

    pub fn appointments(&self) -> &ListState<AppointmentFilter, Appointment> {
        &self.appointments
    }

    /// Counts by status over the currently displayed page.
    pub fn stats(&self) -> AppointmentStats {
        AppointmentStats::from_appointments(self.appointments.items())
    }

    pub fn actions_for(&self, appointment: &Appointment) -> Vec<AppointmentAction> {
        self.service
            .lifecycle()
            .allowed_actions(self.role, &appointment.status)
    }

    /// Apply `action` to a displayed appointment, then re-fetch the list.
    ///
    /// Actions not offered for the appointment are refused without a request.
    pub async fn apply(&mut self, appointment_id: &str, action: AppointmentAction) -> Notice {
        let fallback = match self.role {
            Role::Doctor => UPDATE_FAILED,
            Role::Patient => CANCEL_FAILED,
        };

        let Some(appointment) = self
            .appointments
            .items()
            .iter()
            .find(|a| a.id == appointment_id)
            .cloned()
        else {
            return Notice::error("Appointment not found");
        };

        if !self.actions_for(&appointment).contains(&action) {
            warn!(
                "{:?} not offered to {} for appointment {} ({})",
                action, self.role, appointment.id, appointment.status
            );
            return Notice::error(format!(
                "Appointment is already {}",
                appointment.status
            ));
        }

        let target = action.target_status();
        let notice = match self.service.update_status(&appointment, target).await {
            Ok(updated) => {
                info!("Appointment {} marked {}", updated.id, updated.status);
                match self.role {
                    Role::Doctor => Notice::success(format!("Appointment marked as {}", target)),
                    Role::Patient => Notice::success(CANCELLED),
                }
            }
            Err(e) => {
                warn!("Status update of {} failed: {}", appointment.id, e);
                Notice::from_error(&e, fallback)
            }
        };

        // The backend is authoritative either way.
        self.refresh().await;
        notice
    }
}
