use std::collections::HashSet;

use tracing::{debug, info, warn};
use worldwindow_api::{Card, Result as ApiResult};

use crate::gate::{RequestGate, Ticket};
use crate::source::CardApi;
use crate::Result;

/// A favorites call waiting to be run against the backend
///
/// Every variant ends with a full re-fetch of the list; the client never
/// guesses what the server holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesRequest {
    Reload,
    Add(Card),
    Remove(String),
}

/// Raw results of running a [`FavoritesRequest`]
#[derive(Debug)]
pub struct FavoritesReply {
    /// Result of the add/remove call; always `Ok` for a plain reload
    pub mutation: ApiResult<()>,
    /// The list fetched afterwards
    pub listing: ApiResult<Vec<Card>>,
}

impl FavoritesRequest {
    /// Run the mutation (if any), then re-fetch the list. The list is
    /// fetched even when the mutation was rejected so local state can
    /// resync with what the server actually kept.
    pub async fn run(&self, api: &dyn CardApi) -> FavoritesReply {
        let mutation = match self {
            FavoritesRequest::Reload => Ok(()),
            FavoritesRequest::Add(card) => api.add_favorite(card).await,
            FavoritesRequest::Remove(id) => api.remove_favorite(id).await,
        };
        let listing = api.favorites().await;
        FavoritesReply { mutation, listing }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesOutcome {
    Reloaded(usize),
    Added(String),
    Removed(String),
    Discarded,
}

/// Server-sourced favorites with an id index for O(1) membership checks
#[derive(Debug, Default)]
pub struct FavoritesController {
    items: Vec<Card>,
    ids: HashSet<String>,
    gate: RequestGate,
    pending: Option<FavoritesRequest>,
    resync: bool,
}

impl FavoritesController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Card] {
        &self.items
    }

    pub fn is_favorited(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn begin_reload(&mut self) -> Result<(Ticket, FavoritesRequest)> {
        self.begin(FavoritesRequest::Reload)
    }

    pub fn begin_add(&mut self, card: Card) -> Result<(Ticket, FavoritesRequest)> {
        self.begin(FavoritesRequest::Add(card))
    }

    pub fn begin_remove(&mut self, id: impl Into<String>) -> Result<(Ticket, FavoritesRequest)> {
        self.begin(FavoritesRequest::Remove(id.into()))
    }

    /// Remove if the card is favorited right now, add otherwise.
    /// Membership is read before anything is sent.
    pub fn begin_toggle(&mut self, card: &Card) -> Result<(Ticket, FavoritesRequest)> {
        if self.is_favorited(&card.id) {
            self.begin_remove(card.id.clone())
        } else {
            self.begin_add(card.clone())
        }
    }

    fn begin(&mut self, request: FavoritesRequest) -> Result<(Ticket, FavoritesRequest)> {
        let ticket = self.gate.begin("favorites")?;
        debug!("Favorites request #{} started: {:?}", ticket.seq(), kind(&request));
        self.pending = Some(request.clone());
        Ok((ticket, request))
    }

    /// Apply a finished request.
    ///
    /// A successfully fetched listing always replaces local state, even when
    /// the mutation before it failed. The mutation error wins over a listing
    /// error when both went wrong.
    pub fn complete(&mut self, ticket: Ticket, reply: FavoritesReply) -> Result<FavoritesOutcome> {
        if !self.gate.finish(ticket) {
            debug!("Dropping stale favorites response #{}", ticket.seq());
            return Ok(FavoritesOutcome::Discarded);
        }
        let request = self.pending.take();

        let listing_error = match reply.listing {
            Ok(cards) => {
                self.replace(cards);
                None
            }
            Err(e) => Some(e),
        };

        if let Err(e) = reply.mutation {
            warn!("Favorites request #{} rejected: {}", ticket.seq(), e);
            return Err(e.into());
        }
        if let Some(e) = listing_error {
            warn!("Favorites reload #{} failed: {}", ticket.seq(), e);
            return Err(e.into());
        }

        Ok(match request {
            Some(FavoritesRequest::Reload) => FavoritesOutcome::Reloaded(self.items.len()),
            Some(FavoritesRequest::Add(card)) => FavoritesOutcome::Added(card.id),
            Some(FavoritesRequest::Remove(id)) => FavoritesOutcome::Removed(id),
            None => FavoritesOutcome::Discarded,
        })
    }

    /// Abandon the open request. Cancelling an add or remove that may
    /// already have reached the server marks the list for a resync.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.gate.cancel().is_some();
        if cancelled {
            if matches!(
                self.pending.take(),
                Some(FavoritesRequest::Add(_) | FavoritesRequest::Remove(_))
            ) {
                self.resync = true;
            }
            debug!("Favorites request cancelled");
        }
        cancelled
    }

    /// True after a mutation was cancelled and until a listing lands
    pub fn needs_resync(&self) -> bool {
        self.resync
    }

    fn replace(&mut self, cards: Vec<Card>) {
        self.resync = false;
        self.ids = cards.iter().map(|c| c.id.clone()).collect();
        self.items = cards;
        info!("Favorites now hold {} cards", self.items.len());
    }

    pub async fn reload(&mut self, api: &dyn CardApi) -> Result<usize> {
        let (ticket, request) = self.begin_reload()?;
        let reply = request.run(api).await;
        self.complete(ticket, reply)?;
        Ok(self.items.len())
    }

    pub async fn add_favorite(&mut self, api: &dyn CardApi, card: Card) -> Result<()> {
        let (ticket, request) = self.begin_add(card)?;
        let reply = request.run(api).await;
        self.complete(ticket, reply)?;
        Ok(())
    }

    pub async fn remove_favorite(&mut self, api: &dyn CardApi, id: &str) -> Result<()> {
        let (ticket, request) = self.begin_remove(id)?;
        let reply = request.run(api).await;
        self.complete(ticket, reply)?;
        Ok(())
    }

    /// Flip the card's favorite status. Returns the outcome so callers can
    /// tell which way it went.
    pub async fn toggle_favorite(&mut self, api: &dyn CardApi, card: &Card) -> Result<FavoritesOutcome> {
        let (ticket, request) = self.begin_toggle(card)?;
        let reply = request.run(api).await;
        self.complete(ticket, reply)
    }
}

fn kind(request: &FavoritesRequest) -> &'static str {
    match request {
        FavoritesRequest::Reload => "reload",
        FavoritesRequest::Add(_) => "add",
        FavoritesRequest::Remove(_) => "remove",
    }
}
