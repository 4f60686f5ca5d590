use std::collections::HashSet;

use tracing::{debug, info, warn};
use worldwindow_api::{Card, Result as ApiResult, DEFAULT_BATCH_SIZE, DEFAULT_DAILY_LIMIT};

use crate::gate::{RequestGate, Ticket};
use crate::source::CardApi;
use crate::Result;

/// A feed fetch waiting to be run against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRequest {
    Refresh { limit: u32 },
    LoadMore { offset: usize, batch: u32 },
}

impl FeedRequest {
    pub async fn run(&self, api: &dyn CardApi) -> ApiResult<Vec<Card>> {
        match self {
            FeedRequest::Refresh { limit } => api.daily(*limit).await,
            FeedRequest::LoadMore { offset, batch } => api.more(*offset, *batch).await,
        }
    }
}

/// What applying a completed feed request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The list was replaced with this many cards
    Refreshed(usize),
    /// This many cards were appended
    Extended(usize),
    /// Every card in the batch was already shown; only the cursor moved
    NothingNew,
    /// The backend had nothing more; state untouched
    EndOfFeed,
    /// The request had been cancelled; result dropped
    Discarded,
}

/// Displayed cards plus the offset of the next page
///
/// `refresh` replaces the list, `load_more` appends to it. One request at a
/// time: beginning another while one is open fails with `Error::Busy`.
#[derive(Debug)]
pub struct FeedController {
    items: Vec<Card>,
    cursor: usize,
    refreshing: bool,
    extending: bool,
    daily_limit: u32,
    batch_size: u32,
    gate: RequestGate,
    pending: Option<FeedRequest>,
}

impl FeedController {
    pub fn new(daily_limit: u32, batch_size: u32) -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            refreshing: false,
            extending: false,
            daily_limit,
            batch_size,
            gate: RequestGate::new(),
            pending: None,
        }
    }

    pub fn items(&self) -> &[Card] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_extending(&self) -> bool {
        self.extending
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// How many placeholders to draw while a refresh is out
    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    pub fn begin_refresh(&mut self) -> Result<(Ticket, FeedRequest)> {
        let ticket = self.gate.begin("feed")?;
        let request = FeedRequest::Refresh {
            limit: self.daily_limit,
        };
        self.refreshing = true;
        self.pending = Some(request.clone());
        debug!("Feed refresh #{} started", ticket.seq());
        Ok((ticket, request))
    }

    pub fn begin_load_more(&mut self) -> Result<(Ticket, FeedRequest)> {
        let ticket = self.gate.begin("feed")?;
        let request = FeedRequest::LoadMore {
            offset: self.cursor,
            batch: self.batch_size,
        };
        self.extending = true;
        self.pending = Some(request.clone());
        debug!("Feed load-more #{} started at offset {}", ticket.seq(), self.cursor);
        Ok((ticket, request))
    }

    /// Apply the result of the request `ticket` was issued for.
    ///
    /// Loading flags are cleared whatever the result. On error the list and
    /// cursor keep their previous values and the error is handed back.
    pub fn complete(&mut self, ticket: Ticket, result: ApiResult<Vec<Card>>) -> Result<FeedOutcome> {
        if !self.gate.finish(ticket) {
            debug!("Dropping stale feed response #{}", ticket.seq());
            return Ok(FeedOutcome::Discarded);
        }

        let request = self.pending.take();
        self.refreshing = false;
        self.extending = false;

        let cards = match result {
            Ok(cards) => cards,
            Err(e) => {
                warn!("Feed request #{} failed: {}", ticket.seq(), e);
                return Err(e.into());
            }
        };

        match request {
            Some(FeedRequest::Refresh { .. }) => {
                // the cursor is a server offset, so it counts repeats too
                self.cursor = cards.len();
                let mut seen = HashSet::new();
                self.items = unseen(cards, &mut seen);
                info!("Feed refreshed with {} cards", self.items.len());
                Ok(FeedOutcome::Refreshed(self.items.len()))
            }
            Some(FeedRequest::LoadMore { .. }) if cards.is_empty() => {
                info!("Feed exhausted at offset {}", self.cursor);
                Ok(FeedOutcome::EndOfFeed)
            }
            Some(FeedRequest::LoadMore { .. }) => {
                self.cursor += cards.len();
                let mut seen: HashSet<String> = self.items.iter().map(|c| c.id.clone()).collect();
                let fresh = unseen(cards, &mut seen);
                if fresh.is_empty() {
                    info!("Batch held only cards already shown, cursor {}", self.cursor);
                    return Ok(FeedOutcome::NothingNew);
                }
                let appended = fresh.len();
                self.items.extend(fresh);
                info!("Feed extended by {} cards, cursor {}", appended, self.cursor);
                Ok(FeedOutcome::Extended(appended))
            }
            None => Ok(FeedOutcome::Discarded),
        }
    }

    /// Abandon the open request. Its response will be dropped when it lands.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.gate.cancel().is_some();
        if cancelled {
            self.pending = None;
            self.refreshing = false;
            self.extending = false;
            debug!("Feed request cancelled");
        }
        cancelled
    }

    /// Replace the list with the first page of today's cards.
    /// Returns the number of cards now shown.
    pub async fn refresh(&mut self, api: &dyn CardApi) -> Result<usize> {
        let (ticket, request) = self.begin_refresh()?;
        let result = request.run(api).await;
        match self.complete(ticket, result)? {
            FeedOutcome::Refreshed(n) => Ok(n),
            _ => Ok(self.items.len()),
        }
    }

    /// Append the next page. `true` means the list grew. `false` means
    /// nothing was appended: either the feed is exhausted (nothing changed)
    /// or the batch only repeated shown cards (the cursor still moved on).
    pub async fn load_more(&mut self, api: &dyn CardApi) -> Result<bool> {
        let (ticket, request) = self.begin_load_more()?;
        let result = request.run(api).await;
        Ok(matches!(self.complete(ticket, result)?, FeedOutcome::Extended(_)))
    }
}

/// Keep the first card for each id not yet in `seen`, recording new ids
fn unseen(cards: Vec<Card>, seen: &mut HashSet<String>) -> Vec<Card> {
    cards
        .into_iter()
        .filter(|card| seen.insert(card.id.clone()))
        .collect()
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_LIMIT, DEFAULT_BATCH_SIZE)
    }
}
