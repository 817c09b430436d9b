use tracing::{debug, warn};

use shared_models::error::ClientError;
use shared_models::pagination::{Paginated, Pagination};

use crate::services::fencing::{RequestFence, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Stale,
}

/// A fenced, paginated list backing one view.
#[derive(Debug)]
pub struct ListState<P, T> {
    fence: RequestFence<P>,
    items: Vec<T>,
    pagination: Option<Pagination>,
    error: Option<String>,
}

impl<P, T> Default for ListState<P, T> {
    fn default() -> Self {
        Self {
            fence: RequestFence::default(),
            items: Vec::new(),
            pagination: None,
            error: None,
        }
    }
}

impl<P: Clone + PartialEq + std::fmt::Debug, T> ListState<P, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, params: P) -> Ticket<P> {
        debug!("Loading list with {:?}", params);
        self.fence.issue(params)
    }

    pub fn complete(&mut self, ticket: &Ticket<P>, result: Result<Paginated<T>, ClientError>) -> LoadOutcome {
        if !self.fence.admit(ticket) {
            return LoadOutcome::Stale;
        }

        match result {
            Ok(page) => {
                self.items = page.data;
                self.pagination = Some(page.pagination);
                self.error = None;
            }
            Err(e) => {
                warn!("List load failed: {}", e);
                self.items.clear();
                self.pagination = None;
                self.error = Some(e.server_message().unwrap_or("Failed to load").to_string());
            }
        }
        LoadOutcome::Applied
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Total pages of the last applied response, never below one.
    pub fn total_pages(&self) -> u32 {
        self.pagination.map(|p| p.total_pages).unwrap_or(1).max(1)
    }

    pub fn is_loading(&self) -> bool {
        self.fence.is_pending()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn params(&self) -> Option<&P> {
        self.fence.current()
    }
}
