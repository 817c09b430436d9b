use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use doctor_cell::{Doctor, DoctorQuery, DoctorService};
use shared_models::error::ClientError;
use shared_models::pagination::Paginated;

use crate::services::booking_modal::BookingModal;
use crate::services::fencing::Ticket;
use crate::services::list::{ListState, LoadOutcome};

/// Patient-facing doctor directory: search, specialization filter, paging and
/// the booking modal.
pub struct DoctorSearchView {
    service: Arc<DoctorService>,
    page_size: u32,
    search_term: String,
    specialization: Option<String>,
    page: u32,
    specializations: Vec<String>,
    doctors: ListState<DoctorQuery, Doctor>,
    booking: BookingModal,
}

impl DoctorSearchView {
    pub fn new(service: Arc<DoctorService>, page_size: u32) -> Self {
        Self {
            service,
            page_size: page_size.max(1),
            search_term: String::new(),
            specialization: None,
            page: 1,
            specializations: Vec::new(),
            doctors: ListState::new(),
            booking: BookingModal::new(),
        }
    }

    pub fn query(&self) -> DoctorQuery {
        DoctorQuery::with_limit(self.page_size)
            .page(self.page)
            .search(Some(&self.search_term))
            .specialization(self.specialization.as_deref())
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn specialization(&self) -> Option<&str> {
        self.specialization.as_deref()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// `None` or a blank value selects all specializations.
    pub fn set_specialization(&mut self, specialization: Option<&str>) {
        self.specialization = specialization
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    pub fn submit_search(&mut self) {
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.search_term.clear();
        self.specialization = None;
        self.page = 1;
    }

    /// Step back one page. Returns whether the page changed.
    pub fn previous_page(&mut self) -> bool {
        let previous = self.page.saturating_sub(1).max(1);
        let changed = previous != self.page;
        self.page = previous;
        changed
    }

    /// Step forward one page, bounded by the last known page count.
    pub fn next_page(&mut self) -> bool {
        let next = (self.page + 1).min(self.doctors.total_pages());
        let changed = next != self.page;
        self.page = next;
        changed
    }

    pub fn begin_load(&mut self) -> Ticket<DoctorQuery> {
        let query = self.query();
        self.doctors.begin(query)
    }

    /// Request for `ticket`, detached from the view so several may be in flight.
    pub fn fetch(
        &self,
        ticket: &Ticket<DoctorQuery>,
    ) -> impl Future<Output = Result<Paginated<Doctor>, ClientError>> + Send + 'static {
        let service = self.service.clone();
        let query = ticket.params().clone();
        async move { service.list_doctors(&query).await }
    }

    pub fn complete_load(
        &mut self,
        ticket: &Ticket<DoctorQuery>,
        result: Result<Paginated<Doctor>, ClientError>,
    ) -> LoadOutcome {
        self.doctors.complete(ticket, result)
    }

    pub async fn refresh(&mut self) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = self.fetch(&ticket).await;
        self.complete_load(&ticket, result)
    }

    pub fn fetch_specializations(
        &self,
    ) -> impl Future<Output = Result<Vec<String>, ClientError>> + Send + 'static {
        let service = self.service.clone();
        async move { service.list_specializations().await }
    }

    pub async fn load_specializations(&mut self) {
        let result = self.fetch_specializations().await;
        self.set_specializations(result);
    }

    pub fn set_specializations(&mut self, result: Result<Vec<String>, ClientError>) {
        match result {
            Ok(specializations) => {
                debug!("Loaded {} specializations", specializations.len());
                self.specializations = specializations;
            }
            Err(e) => warn!("Failed to load specializations: {}", e),
        }
    }

    pub fn specializations(&self) -> &[String] {
        &self.specializations
    }

    pub fn doctors(&self) -> &ListState<DoctorQuery, Doctor> {
        &self.doctors
    }

    /// Open the booking modal for a doctor on the current page.
    pub fn open_booking(&mut self, doctor_id: &str) -> bool {
        match self.doctors.items().iter().find(|d| d.id == doctor_id) {
            Some(doctor) => {
                self.booking.open(doctor.clone());
                true
            }
            None => false,
        }
    }

    pub fn booking(&self) -> &BookingModal {
        &self.booking
    }

    pub fn booking_mut(&mut self) -> &mut BookingModal {
        &mut self.booking
    }
}
