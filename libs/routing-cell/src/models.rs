use std::fmt;
use shared_models::auth::Role;

/// Named sections of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    DoctorDashboard,
    PatientDashboard,
    PatientAppointments,
}

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any authenticated identity.
    Authenticated,
    Role(Role),
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::DoctorDashboard,
        Route::PatientDashboard,
        Route::PatientAppointments,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::DoctorDashboard => "/doctor/dashboard",
            Route::PatientDashboard => "/patient/dashboard",
            Route::PatientAppointments => "/patient/appointments",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        Self::ALL.into_iter().find(|route| route.path() == normalized)
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Register => Access::Public,
            Route::Home => Access::Authenticated,
            Route::DoctorDashboard => Access::Role(Role::Doctor),
            Route::PatientDashboard | Route::PatientAppointments => Access::Role(Role::Patient),
        }
    }

    /// Landing section for an identity of `role`.
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Doctor => Route::DoctorDashboard,
            Role::Patient => Route::PatientDashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// No session has been evaluated yet.
    Unauthenticated,
    AuthorizedForRoute,
    Redirecting { to: Route },
}

impl GuardState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardState::AuthorizedForRoute)
    }
}

/// What a guarded section shows for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame<T> {
    /// Neutral loading indicator while a redirect is pending.
    Placeholder,
    Content(T),
}

impl<T> Frame<T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Frame::Placeholder)
    }

    pub fn content(self) -> Option<T> {
        match self {
            Frame::Placeholder => None,
            Frame::Content(content) => Some(content),
        }
    }
}
