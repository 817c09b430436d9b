use tracing::debug;

/// Identity of one issued request: its sequence number and the parameters it
/// was issued with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<P> {
    seq: u64,
    params: P,
}

impl<P> Ticket<P> {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn params(&self) -> &P {
        &self.params
    }
}

/// Decides whether a response may still be applied.
///
/// A response is admitted only when the parameters it was requested with are
/// the current ones and nothing newer has been applied yet.
#[derive(Debug)]
pub struct RequestFence<P> {
    current: Option<P>,
    latest_seq: u64,
    applied_seq: u64,
}

impl<P> Default for RequestFence<P> {
    fn default() -> Self {
        Self {
            current: None,
            latest_seq: 0,
            applied_seq: 0,
        }
    }
}

impl<P: Clone + PartialEq> RequestFence<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, params: P) -> Ticket<P> {
        self.latest_seq += 1;
        self.current = Some(params.clone());
        Ticket {
            seq: self.latest_seq,
            params,
        }
    }

    pub fn is_current(&self, ticket: &Ticket<P>) -> bool {
        self.current.as_ref() == Some(&ticket.params) && ticket.seq > self.applied_seq
    }

    /// Admit `ticket`'s response, recording it as the latest applied.
    pub fn admit(&mut self, ticket: &Ticket<P>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale response #{} (latest #{}, applied #{})",
                ticket.seq, self.latest_seq, self.applied_seq
            );
            return false;
        }
        self.applied_seq = ticket.seq;
        true
    }

    /// Whether a request is still outstanding for the current parameters.
    pub fn is_pending(&self) -> bool {
        self.applied_seq < self.latest_seq
    }

    pub fn current(&self) -> Option<&P> {
        self.current.as_ref()
    }
}
