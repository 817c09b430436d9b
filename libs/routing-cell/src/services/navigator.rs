use std::collections::VecDeque;
use tokio::sync::watch;
use tracing::{debug, warn};

use session_cell::{Session, SessionStore};

use crate::models::{Frame, GuardState, Route};
use crate::services::guard::RouteGuard;

/// Upper bound on redirects applied by a single [`Navigator::settle`].
pub const MAX_REDIRECT_HOPS: usize = 8;

/// Number of most recent route entries kept by [`Navigator::history`].
pub const HISTORY_LIMIT: usize = 32;

/// Tracks the current route and keeps its guard in step with the session.
pub struct Navigator {
    session: watch::Receiver<Session>,
    current: Route,
    guard: Option<RouteGuard>,
    dispatch: Option<Route>,
    history: VecDeque<Route>,
}

impl Navigator {
    pub fn new(store: &SessionStore, start: Route) -> Self {
        let mut navigator = Self {
            session: store.subscribe(),
            current: start,
            guard: None,
            dispatch: None,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        };
        navigator.enter(start);
        navigator
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// The last [`HISTORY_LIMIT`] routes entered, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.history.iter().copied().collect()
    }

    pub fn state(&self) -> GuardState {
        match &self.guard {
            Some(guard) => guard.state(),
            None => GuardState::AuthorizedForRoute,
        }
    }

    pub fn pending_redirect(&self) -> Option<Route> {
        self.guard
            .as_ref()
            .and_then(RouteGuard::pending_redirect)
            .or(self.dispatch)
    }

    /// Enter `route` and evaluate its guard. Redirects are applied by `settle`.
    pub fn navigate(&mut self, route: Route) -> GuardState {
        self.enter(route);
        self.state()
    }

    fn enter(&mut self, route: Route) {
        debug!("Entering {}", route);
        self.current = route;
        self.guard = RouteGuard::for_route(route);
        self.dispatch = None;
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(route);
        self.evaluate();
    }

    fn evaluate(&mut self) {
        let session = self.session.borrow_and_update().clone();

        let Some(guard) = self.guard.as_mut() else {
            return;
        };

        let state = guard.evaluate(&session);
        self.dispatch = match (self.current, state, session.role()) {
            (Route::Home, GuardState::AuthorizedForRoute, Some(role)) => Some(Route::home_for(role)),
            _ => None,
        };
    }

    /// Frame for the current route against the latest session.
    ///
    /// `content` is only invoked when the route may be shown.
    pub fn render<T>(&mut self, content: impl FnOnce(Route) -> T) -> Frame<T> {
        let session = self.session.borrow_and_update().clone();
        let route = self.current;

        match self.guard.as_mut() {
            None => Frame::Content(content(route)),
            // Home has no content of its own, it only dispatches.
            Some(guard) if route == Route::Home => {
                self.dispatch = match guard.evaluate(&session) {
                    GuardState::AuthorizedForRoute => session.role().map(Route::home_for),
                    _ => None,
                };
                Frame::Placeholder
            }
            Some(guard) => guard.render(&session, || content(route)),
        }
    }

    /// Re-evaluate if the session changed since the last look.
    pub fn sync(&mut self) -> bool {
        match self.session.has_changed() {
            Ok(true) => {
                self.evaluate();
                true
            }
            _ => false,
        }
    }

    /// Apply pending redirects until the current route is stable.
    pub fn settle(&mut self) -> Route {
        self.sync();
        self.follow(Self::next_hop)
    }

    fn next_hop(&mut self) -> Option<Route> {
        match self.guard.as_mut().and_then(RouteGuard::take_redirect) {
            Some(to) => Some(to),
            None => self.dispatch.take(),
        }
    }

    fn follow(&mut self, mut next_hop: impl FnMut(&mut Self) -> Option<Route>) -> Route {
        for _ in 0..MAX_REDIRECT_HOPS {
            match next_hop(self) {
                Some(to) => self.enter(to),
                None => return self.current,
            }
        }

        warn!(
            "Redirect chain exceeded {} hops, stopping at {}",
            MAX_REDIRECT_HOPS, self.current
        );
        self.current
    }

    /// Wait for the next session change, re-evaluate and settle.
    ///
    /// Returns `None` once the session store has been dropped.
    pub async fn session_changed(&mut self) -> Option<Route> {
        self.session.changed().await.ok()?;
        self.evaluate();
        Some(self.settle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_cycle_stops_at_hop_limit() {
        let store = SessionStore::in_memory();
        let mut navigator = Navigator::new(&store, Route::Login);
        let mut hops = 0;

        let stopped_at = navigator.follow(|nav| {
            hops += 1;
            Some(match nav.current() {
                Route::Login => Route::Register,
                _ => Route::Login,
            })
        });

        assert_eq!(hops, MAX_REDIRECT_HOPS);
        assert_eq!(stopped_at, Route::Login);
        assert_eq!(navigator.history().len(), MAX_REDIRECT_HOPS + 1);
    }

    #[test]
    fn test_history_keeps_most_recent_entries() {
        let store = SessionStore::in_memory();
        let mut navigator = Navigator::new(&store, Route::Login);

        for _ in 0..HISTORY_LIMIT {
            navigator.navigate(Route::Register);
        }
        navigator.navigate(Route::Login);

        let history = navigator.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.first(), Some(&Route::Register));
        assert_eq!(history.last(), Some(&Route::Login));
    }
}
