use std::sync::Arc;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use appointment_cell::{AppointmentAction, AppointmentService};
use auth_cell::{AuthService, LoginRequest, RegisterDoctorRequest, RegisterPatientRequest};
use dashboard_cell::{
    AppointmentBoard, DoctorSearchView, Notice, LOGIN_FAILED, REGISTRATION_FAILED,
};
use doctor_cell::DoctorService;
use routing_cell::{Frame, Navigator, Route};
use session_cell::{FileStorage, SessionStore};
use shared_api::ApiClient;
use shared_config::ClientConfig;
use shared_models::auth::{Identity, Role};
use shared_models::error::ClientError;

use crate::commands::{Command, DateFilter, HELP};

/// The client: services wired to one session store, plus the view state.
pub struct App {
    session: Arc<SessionStore>,
    auth: AuthService,
    appointments: Arc<AppointmentService>,
    navigator: Navigator,
    search: DoctorSearchView,
    board: Option<AppointmentBoard>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl App {
    pub fn new(config: &ClientConfig) -> Self {
        let storage = Arc::new(FileStorage::new(config.session_file.clone()));
        let session = Arc::new(SessionStore::restored(storage));
        let api = Arc::new(ApiClient::new(config, session.clone()));

        let doctors = Arc::new(DoctorService::new(api.clone()));
        let appointments = Arc::new(AppointmentService::new(api.clone()));

        Self {
            navigator: Navigator::new(&session, Route::Home),
            auth: AuthService::new(api, session.clone()),
            search: DoctorSearchView::new(doctors, config.doctors_page_size),
            appointments,
            board: None,
            session,
        }
    }

    /// Settle the initial route and show it.
    pub async fn start(&mut self) {
        if let Some(identity) = self.session.identity() {
            info!("Restored session for {}", identity.email);
        }
        self.show().await;
    }

    pub async fn execute(&mut self, command: Command) {
        debug!("Executing {:?}", command);

        match command {
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
            Command::WhoAmI => match self.session.identity() {
                Some(identity) => println!("{}", describe(&identity)),
                None => println!("Not signed in"),
            },
            Command::Login { email, password, role } => {
                let result = self.auth.login(LoginRequest::new(email, password, role)).await;
                self.after_auth(result, LOGIN_FAILED);
            }
            Command::RegisterPatient { name, email, password, photo_url } => {
                let request = RegisterPatientRequest { name, email, password, photo_url };
                let result = self.auth.register_patient(request).await;
                self.after_auth(result, REGISTRATION_FAILED);
            }
            Command::RegisterDoctor { name, email, password, specialization, photo_url } => {
                let request = RegisterDoctorRequest { name, email, password, specialization, photo_url };
                let result = self.auth.register_doctor(request).await;
                self.after_auth(result, REGISTRATION_FAILED);
            }
            Command::Logout => {
                self.auth.logout();
                self.board = None;
                self.navigator.navigate(Route::Login);
            }
            Command::Goto(route) => {
                self.navigator.navigate(route);
            }
            Command::Doctors => {
                self.navigator.navigate(Route::PatientDashboard);
            }
            Command::Search(term) => {
                self.search.set_search_term(term);
                self.search.submit_search();
            }
            Command::Filter(specialization) => {
                self.search.set_specialization(specialization.as_deref());
            }
            Command::Clear => match self.navigator.current() {
                Route::PatientDashboard => self.search.clear_filters(),
                _ => {
                    if let Some(board) = self.board.as_mut() {
                        board.clear_filters();
                    }
                }
            },
            Command::Next => self.turn_page(true),
            Command::Prev => self.turn_page(false),
            Command::Book { doctor_id, date } => {
                if !self.search.open_booking(&doctor_id) {
                    println!("{}", Notice::error("Doctor is not on the current page"));
                } else {
                    let modal = self.search.booking_mut();
                    modal.set_date(date);
                    let notice = modal.submit(&self.appointments, today()).await;
                    println!("{}", notice);
                    modal.close();
                }
            }
            Command::Appointments => {
                let route = match self.session.identity().map(|identity| identity.role) {
                    Some(Role::Doctor) => Route::DoctorDashboard,
                    _ => Route::PatientAppointments,
                };
                self.navigator.navigate(route);
            }
            Command::Status(status) => {
                if let Some(board) = self.board.as_mut() {
                    board.set_status(status);
                }
            }
            Command::Date(filter) => {
                if let Some(board) = self.board.as_mut() {
                    let result = match filter {
                        DateFilter::Today => board.show_today(today()),
                        DateFilter::On(date) => board.set_date(Some(date)),
                        DateFilter::Any => board.set_date(None),
                    };
                    if let Err(e) = result {
                        println!("{}", Notice::from_error(&e, "Invalid filter"));
                    }
                }
            }
            Command::Complete(id) => self.apply(&id, AppointmentAction::Complete).await,
            Command::Cancel(id) => self.apply(&id, AppointmentAction::Cancel).await,
        }

        self.show().await;
    }

    fn after_auth(&mut self, result: Result<Identity, ClientError>, fallback: &str) {
        match result {
            Ok(identity) => {
                println!("{}", Notice::success(format!("Welcome, {}", identity.name)));
                self.board = None;
                self.navigator.navigate(Route::Home);
            }
            Err(e) => println!("{}", Notice::from_error(&e, fallback)),
        }
    }

    fn turn_page(&mut self, forward: bool) {
        let changed = match (self.navigator.current(), self.board.as_mut()) {
            (Route::PatientDashboard, _) if forward => self.search.next_page(),
            (Route::PatientDashboard, _) => self.search.previous_page(),
            (_, Some(board)) if forward => board.next_page(),
            (_, Some(board)) => board.previous_page(),
            (_, None) => false,
        };
        if !changed {
            println!("No more pages");
        }
    }

    async fn apply(&mut self, id: &str, action: AppointmentAction) {
        match self.board.as_mut() {
            Some(board) => println!("{}", board.apply(id, action).await),
            None => println!("{}", Notice::error("No appointment list is open")),
        }
    }

    /// Settle redirects, then load and print whatever the current route shows.
    async fn show(&mut self) {
        self.navigator.settle();

        let Frame::Content(route) = self.navigator.render(|route| route) else {
            println!("Loading...");
            return;
        };

        println!("== {} ==", route);
        match route {
            Route::Home => {}
            Route::Login => println!("Sign in with: login <email> <password> <doctor|patient>"),
            Route::Register => println!("Create an account with: register patient|doctor ..."),
            Route::PatientDashboard => self.show_doctors().await,
            Route::DoctorDashboard => self.show_board(Role::Doctor).await,
            Route::PatientAppointments => self.show_board(Role::Patient).await,
        }
    }

    async fn show_doctors(&mut self) {
        let specializations_request = self.search.fetch_specializations();
        let (outcome, specializations) =
            futures::join!(self.search.refresh(), specializations_request);
        debug!("Doctor list load: {:?}", outcome);
        self.search.set_specializations(specializations);

        let list = self.search.doctors();
        if let Some(error) = list.error() {
            println!("{}", Notice::error(error));
            return;
        }

        if !self.search.specializations().is_empty() {
            println!("Specializations: {}", self.search.specializations().join(", "));
        }
        for doctor in list.items() {
            println!("  [{}] {} - {}", doctor.id, doctor.display_name(), doctor.specialization);
        }
        if list.items().is_empty() {
            println!("  No doctors found");
        }
        println!("Page {} of {}", self.search.page(), list.total_pages());
    }

    async fn show_board(&mut self, role: Role) {
        let board = match self.board.take() {
            Some(board) if board.role() == role => board,
            _ => AppointmentBoard::new(role, self.appointments.clone()),
        };
        let board = self.board.insert(board);
        board.refresh().await;

        let list = board.appointments();
        if let Some(error) = list.error() {
            println!("{}", Notice::error(error));
            return;
        }

        let stats = board.stats();
        println!(
            "Pending: {}  Completed: {}  Cancelled: {}",
            stats.pending, stats.completed, stats.cancelled
        );
        for appointment in list.items() {
            let counterpart = match role {
                Role::Doctor => appointment.patient.as_ref().map(|p| p.name.clone()),
                Role::Patient => appointment.doctor.as_ref().map(|d| d.display_name()),
            }
            .unwrap_or_else(|| "unknown".to_string());
            let actions: Vec<String> = board
                .actions_for(appointment)
                .iter()
                .map(|action| format!("{:?}", action).to_lowercase())
                .collect();

            println!(
                "  [{}] {} with {} ({}) {}",
                appointment.id,
                appointment
                    .calendar_date()
                    .map(|d| d.format("%B %-d, %Y").to_string())
                    .unwrap_or_else(|| appointment.date.clone()),
                counterpart,
                appointment.status,
                actions.join("/")
            );
        }
        if list.items().is_empty() {
            println!("  No appointments found");
        }
        println!("Page {} of {}", board.page(), list.total_pages());
    }
}

fn describe(identity: &Identity) -> String {
    match (&identity.role, &identity.specialization) {
        (Role::Doctor, Some(specialization)) => format!(
            "{} <{}> doctor, {}",
            identity.name, identity.email, specialization
        ),
        _ => format!("{} <{}> {}", identity.name, identity.email, identity.role),
    }
}
