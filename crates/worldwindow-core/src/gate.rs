use crate::{Error, Result};

/// Handle for one in-flight controller request
///
/// Completions are only applied when they present the ticket the
/// controller is still waiting on.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Allows at most one request in flight and numbers each one
#[derive(Debug, Default)]
pub struct RequestGate {
    last_seq: u64,
    in_flight: Option<u64>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new request. Fails with [`Error::Busy`] while another is open.
    pub fn begin(&mut self, what: &'static str) -> Result<Ticket> {
        if self.in_flight.is_some() {
            return Err(Error::Busy(what));
        }
        self.last_seq += 1;
        self.in_flight = Some(self.last_seq);
        Ok(Ticket { seq: self.last_seq })
    }

    /// Close the request `ticket` belongs to. Returns false for stale tickets,
    /// whose results must be dropped.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if self.in_flight == Some(ticket.seq) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Abandon the open request, if any. Its ticket becomes stale.
    pub fn cancel(&mut self) -> Option<Ticket> {
        self.in_flight.take().map(|seq| Ticket { seq })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}
