use tracing::debug;

/// Identifies one issued request. Tickets are strictly increasing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    InFlight(FetchTicket),
    Loaded(FetchTicket),
    Failed { ticket: FetchTicket, message: String },
}

/// Request-sequence guard for a single logical fetch.
///
/// At most one request is current. Issuing a new ticket supersedes the
/// previous one; completions carrying a superseded ticket are
/// reported as stale and must be discarded by the caller.
#[derive(Debug)]
pub struct FetchTracker {
    next_seq: u64,
    status: FetchStatus,
}

impl Default for FetchTracker {
    fn default() -> Self {
        Self {
            next_seq: 1,
            status: FetchStatus::Idle,
        }
    }
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> FetchTicket {
        let ticket = FetchTicket(self.next_seq);
        self.next_seq += 1;
        if let FetchStatus::InFlight(old) = self.status {
            debug!(superseded = old.0, current = ticket.0, "fetch superseded");
        }
        self.status = FetchStatus::InFlight(ticket);
        ticket
    }

    /// Marks `ticket` as successfully completed. Returns `false` if stale.
    pub fn complete(&mut self, ticket: FetchTicket) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "discarding stale fetch response");
            return false;
        }
        self.status = FetchStatus::Loaded(ticket);
        true
    }

    /// Marks `ticket` as failed. Returns `false` if stale.
    pub fn fail(&mut self, ticket: FetchTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "discarding stale fetch failure");
            return false;
        }
        self.status = FetchStatus::Failed {
            ticket,
            message: message.into(),
        };
        true
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.status, FetchStatus::InFlight(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            FetchStatus::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    fn is_current(&self, ticket: FetchTicket) -> bool {
        self.status == FetchStatus::InFlight(ticket)
    }
}
