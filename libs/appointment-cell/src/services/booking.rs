use std::sync::Arc;
use chrono::NaiveDate;
use reqwest::Method;
use tracing::{debug, info};

use shared_api::ApiClient;
use shared_models::auth::Role;
use shared_models::error::ClientError;
use shared_models::pagination::{ApiResponse, Paginated};

use crate::models::{
    Appointment, AppointmentFilter, AppointmentStatus, CreateAppointmentRequest, UpdateStatusRequest,
};
use crate::services::lifecycle::AppointmentLifecycleService;

pub struct AppointmentService {
    api: Arc<ApiClient>,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    pub fn lifecycle(&self) -> &AppointmentLifecycleService {
        &self.lifecycle
    }

    /// Book a day with a doctor. Backend rejections of the slot come back as
    /// [`ClientError::Conflict`].
    pub async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
        today: NaiveDate,
    ) -> Result<Appointment, ClientError> {
        debug!("Booking doctor {} on {}", request.doctor_id, request.date);

        if request.doctor_id.trim().is_empty() {
            return Err(ClientError::Validation("Please select a doctor".to_string()));
        }
        self.lifecycle.validate_booking_date(request.date, today)?;

        let response: ApiResponse<Appointment> = self
            .api
            .request(Method::POST, "/appointments", &[], Some(request.to_body()))
            .await
            .map_err(|e| match e {
                ClientError::Validation(message) => ClientError::Conflict(message),
                other => other,
            })?;

        info!("Appointment {} booked for {}", response.data.id, request.date);
        Ok(response.data)
    }

    pub async fn list_appointments(
        &self,
        role: Role,
        filter: &AppointmentFilter,
    ) -> Result<Paginated<Appointment>, ClientError> {
        debug!("Listing {} appointments with filter: {:?}", role, filter);

        let path = match role {
            Role::Doctor => "/appointments/doctor",
            Role::Patient => "/appointments/patient",
        };

        let mut query = vec![("page", filter.page.max(1).to_string())];
        if let Some(status) = filter.status {
            query.push(("status", status.as_wire().to_string()));
        }
        if role == Role::Doctor {
            if let Some(date) = filter.date {
                query.push(("date", date.format("%Y-%m-%d").to_string()));
            }
        }

        self.api.request(Method::GET, path, &query, None).await
    }

    /// Move a pending appointment to a terminal status.
    ///
    /// Terminal appointments are rejected locally without a request.
    pub async fn update_status(
        &self,
        appointment: &Appointment,
        status: AppointmentStatus,
    ) -> Result<Appointment, ClientError> {
        self.lifecycle
            .validate_status_transition(&appointment.status, &status)?;

        self.send_status_update(&UpdateStatusRequest {
            appointment_id: appointment.id.clone(),
            status,
        })
        .await
    }

    async fn send_status_update(&self, request: &UpdateStatusRequest) -> Result<Appointment, ClientError> {
        debug!("Marking appointment {} as {}", request.appointment_id, request.status);

        let response: ApiResponse<Appointment> = self
            .api
            .request(
                Method::PATCH,
                "/appointments/update-status",
                &[],
                Some(request.to_body()),
            )
            .await
            .map_err(|e| match e {
                ClientError::Validation(message) | ClientError::Conflict(message) => {
                    ClientError::State(message)
                }
                other => other,
            })?;

        info!("Appointment {} is now {}", response.data.id, response.data.status);
        Ok(response.data)
    }
}
