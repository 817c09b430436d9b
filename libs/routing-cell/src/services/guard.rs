use tracing::{debug, info};

use session_cell::Session;
use shared_models::auth::Role;

use crate::models::{Access, Frame, GuardState, Route};

/// Per-section access check.
///
/// A guard is created when a protected section is entered and re-evaluated on
/// every render and on every session change. While the decision is a redirect
/// the section only ever produces [`Frame::Placeholder`]; the redirect itself
/// is handed out once through [`RouteGuard::take_redirect`].
#[derive(Debug, Clone)]
pub struct RouteGuard {
    required_role: Option<Role>,
    state: GuardState,
    scheduled: Option<Route>,
}

impl RouteGuard {
    pub fn new(required_role: Option<Role>) -> Self {
        Self {
            required_role,
            state: GuardState::Unauthenticated,
            scheduled: None,
        }
    }

    /// Guard for `route`, or `None` when the route is public.
    pub fn for_route(route: Route) -> Option<Self> {
        match route.access() {
            Access::Public => None,
            Access::Authenticated => Some(Self::new(None)),
            Access::Role(role) => Some(Self::new(Some(role))),
        }
    }

    pub fn required_role(&self) -> Option<Role> {
        self.required_role
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Pure access decision for a session snapshot.
    pub fn decide(required_role: Option<Role>, session: &Session) -> GuardState {
        let Some(identity) = session.identity() else {
            return GuardState::Redirecting { to: Route::Login };
        };

        match required_role {
            Some(role) if role != identity.role => GuardState::Redirecting {
                to: Route::home_for(identity.role),
            },
            _ => GuardState::AuthorizedForRoute,
        }
    }

    /// Re-run the decision and schedule a redirect if the target changed.
    pub fn evaluate(&mut self, session: &Session) -> GuardState {
        let next = Self::decide(self.required_role, session);

        if next != self.state {
            debug!("Guard transition {:?} -> {:?}", self.state, next);
            match next {
                GuardState::Redirecting { to } => {
                    info!("Access denied for {:?} section, redirecting to {}", self.required_role, to);
                    self.scheduled = Some(to);
                }
                _ => self.scheduled = None,
            }
            self.state = next;
        }

        self.state
    }

    /// Produce the section's frame for the current session.
    ///
    /// `content` is only invoked when the session is authorized.
    pub fn render<T>(&mut self, session: &Session, content: impl FnOnce() -> T) -> Frame<T> {
        match self.evaluate(session) {
            GuardState::AuthorizedForRoute => Frame::Content(content()),
            _ => Frame::Placeholder,
        }
    }

    /// The pending redirect, at most once per transition.
    pub fn take_redirect(&mut self) -> Option<Route> {
        self.scheduled.take()
    }

    pub fn pending_redirect(&self) -> Option<Route> {
        self.scheduled
    }
}
