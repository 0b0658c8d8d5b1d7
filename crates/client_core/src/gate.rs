/// Identifies one request issued by a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The completion belongs to the workflow's current state.
    Current,
    /// The workflow was reset after this request began.
    Stale,
}

/// The disabled-control discipline: at most one request in flight, re-opened
/// only when that request completes.
#[derive(Debug, Default, Clone)]
pub struct RequestGate {
    in_flight: Option<RequestTicket>,
    next: u64,
    accept_from: u64,
}

impl RequestGate {
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Issues a ticket, or `None` while a request is still outstanding.
    pub fn open(&mut self) -> Option<RequestTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        let ticket = RequestTicket(self.next);
        self.next += 1;
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    pub fn close(&mut self, ticket: RequestTicket) -> Completion {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
        if ticket.0 < self.accept_from {
            Completion::Stale
        } else {
            Completion::Current
        }
    }

    /// Marks every ticket issued so far as stale. An outstanding request keeps
    /// the gate closed until it completes.
    pub fn invalidate(&mut self) {
        self.accept_from = self.next;
    }
}
