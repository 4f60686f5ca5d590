// TUI session state and key handling
//
// `App` owns every controller plus the locale and toast for one session.
// Key presses turn into `Command`s for the runner to execute; finished
// network work comes back as `Completion`s.
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use tracing::{info, warn};
use worldwindow_api::Result as ApiResult;
use worldwindow_core::{
    Card, Config, Error, FavoritesController, FavoritesOutcome, FavoritesReply, FavoritesRequest,
    FeedController, FeedOutcome, FeedRequest, Locale, Messages, Ticket, Toast, ToastKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal, // Browsing cards and favorites
    Help,   // Keybindings popup is open
}

/// Which list the cursor keys move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Cards,
    Favorites,
}

/// Work the runner has to carry out on the app's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Feed(Ticket, FeedRequest),
    Favorites(Ticket, FavoritesRequest),
    OpenLink(String),
}

/// Finished network work, fed back into [`App::apply`]
#[derive(Debug)]
pub enum Completion {
    Feed(Ticket, ApiResult<Vec<Card>>),
    Favorites(Ticket, FavoritesReply),
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: Focus,
    pub locale: Locale,
    pub feed: FeedController,
    pub favorites: FavoritesController,
    pub toast: Toast,
    pub cards_state: ListState,
    pub favorites_state: ListState,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: Focus::Cards,
            locale: config.ui.locale,
            feed: FeedController::new(config.feed.daily_limit, config.feed.batch_size),
            favorites: FavoritesController::new(),
            toast: Toast::new(config.toast_duration()),
            cards_state: ListState::default(),
            favorites_state: ListState::default(),
        }
    }

    pub fn messages(&self) -> &'static Messages {
        self.locale.messages()
    }

    /// What to fetch when the session opens: today's cards and the favorites
    pub fn startup(&mut self) -> Vec<Command> {
        [self.request_refresh(), self.request_reload_favorites()]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return None;
        }

        match self.input_mode {
            InputMode::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.input_mode = InputMode::Normal;
                }
                None
            }
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => {
                    self.quit();
                    None
                }
                KeyCode::Char('?') => {
                    self.input_mode = InputMode::Help;
                    None
                }
                KeyCode::Esc => self.cancel_requests(),
                KeyCode::Tab => {
                    self.toggle_focus();
                    None
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.select_next();
                    None
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.select_previous();
                    None
                }
                KeyCode::Char('l') => {
                    self.switch_locale();
                    None
                }
                KeyCode::Char('r') => self.request_refresh(),
                KeyCode::Char('m') => self.request_load_more(),
                KeyCode::Char('v') => {
                    self.focus = Focus::Favorites;
                    self.request_reload_favorites()
                }
                KeyCode::Char('f') if self.focus == Focus::Cards => self.request_toggle_selected(),
                KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete
                    if self.focus == Focus::Favorites =>
                {
                    self.request_remove_selected()
                }
                KeyCode::Enter | KeyCode::Char('o') => self
                    .selected_card()
                    .filter(|card| !card.link.is_empty())
                    .map(|card| Command::OpenLink(card.link.clone())),
                _ => None,
            },
        }
    }

    pub fn request_refresh(&mut self) -> Option<Command> {
        match self.feed.begin_refresh() {
            Ok((ticket, request)) => Some(Command::Feed(ticket, request)),
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    pub fn request_load_more(&mut self) -> Option<Command> {
        match self.feed.begin_load_more() {
            Ok((ticket, request)) => {
                let t = self.messages();
                self.toast.show(t.toast.loading, ToastKind::Info);
                Some(Command::Feed(ticket, request))
            }
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    pub fn request_reload_favorites(&mut self) -> Option<Command> {
        match self.favorites.begin_reload() {
            Ok((ticket, request)) => Some(Command::Favorites(ticket, request)),
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    /// Favorite or unfavorite the highlighted card
    pub fn request_toggle_selected(&mut self) -> Option<Command> {
        let card = self.selected_card()?.clone();
        match self.favorites.begin_toggle(&card) {
            Ok((ticket, request)) => Some(Command::Favorites(ticket, request)),
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    /// Drop the highlighted entry from the favorites panel
    pub fn request_remove_selected(&mut self) -> Option<Command> {
        let id = self.selected_favorite()?.id.clone();
        match self.favorites.begin_remove(id) {
            Ok((ticket, request)) => Some(Command::Favorites(ticket, request)),
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    /// Apply finished network work and surface the result
    pub fn apply(&mut self, completion: Completion) {
        let t = self.messages();
        match completion {
            Completion::Feed(ticket, result) => match self.feed.complete(ticket, result) {
                Ok(FeedOutcome::EndOfFeed) => self.toast.show(t.toast.no_more, ToastKind::Info),
                Ok(FeedOutcome::NothingNew) => self.toast.show(t.toast.no_new, ToastKind::Info),
                Ok(FeedOutcome::Refreshed(_)) => {
                    self.cards_state.select(None);
                    self.clamp_selection();
                }
                Ok(FeedOutcome::Extended(_)) => {
                    // drop the "loading" toast
                    self.toast.hide();
                    self.clamp_selection();
                }
                Ok(FeedOutcome::Discarded) => {}
                Err(e) => self.report(e),
            },
            Completion::Favorites(ticket, reply) => {
                let outcome = self.favorites.complete(ticket, reply);
                self.clamp_selection();
                match outcome {
                    Ok(FavoritesOutcome::Added(_)) => {
                        self.toast.show(t.toast.favorited, ToastKind::Success)
                    }
                    Ok(FavoritesOutcome::Removed(_)) => {
                        self.toast.show(t.toast.unfavorited, ToastKind::Success)
                    }
                    Ok(FavoritesOutcome::Reloaded(_)) | Ok(FavoritesOutcome::Discarded) => {}
                    Err(e) => self.report(e),
                }
            }
        }
    }

    /// Route a controller failure to the toast line
    pub fn report(&mut self, error: Error) {
        let t = self.messages();
        if error.is_busy() {
            self.toast.show(t.toast.busy, ToastKind::Info);
            return;
        }
        warn!("{}", error);
        self.toast
            .show(format!("{}: {}", t.toast.error, error), ToastKind::Error);
    }

    pub fn report_open_failure(&mut self, error: impl std::fmt::Display) {
        warn!("Failed to open link: {}", error);
        let message = format!("{}: {}", self.messages().toast.open_failed, error);
        self.toast.show(message, ToastKind::Error);
    }

    pub fn tick(&mut self, now: Instant) {
        self.toast.tick(now);
    }

    pub fn switch_locale(&mut self) {
        self.locale = self.locale.toggled();
        info!("Locale switched to {}", self.locale);
    }

    /// Drop in-flight work. A cancelled add/remove may still have reached
    /// the server, so the favorites list is fetched again.
    pub fn cancel_requests(&mut self) -> Option<Command> {
        let feed = self.feed.cancel();
        let favorites = self.favorites.cancel();
        if feed || favorites {
            info!("Cancelled in-flight requests");
            self.toast.hide();
        }
        if self.favorites.needs_resync() {
            return self.request_reload_favorites();
        }
        None
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Cards => Focus::Favorites,
            Focus::Favorites => Focus::Cards,
        };
        self.clamp_selection();
    }

    pub fn select_next(&mut self) {
        let (state, len) = self.focused_list();
        if len == 0 {
            return;
        }
        let next = state.selected().map_or(0, |i| (i + 1).min(len - 1));
        state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        let (state, len) = self.focused_list();
        if len == 0 {
            return;
        }
        let prev = state.selected().map_or(0, |i| i.saturating_sub(1));
        state.select(Some(prev));
    }

    pub fn selected_card(&self) -> Option<&Card> {
        match self.focus {
            Focus::Cards => self.feed.items().get(self.cards_state.selected()?),
            Focus::Favorites => self.selected_favorite(),
        }
    }

    pub fn selected_favorite(&self) -> Option<&Card> {
        self.favorites.items().get(self.favorites_state.selected()?)
    }

    fn focused_list(&mut self) -> (&mut ListState, usize) {
        match self.focus {
            Focus::Cards => (&mut self.cards_state, self.feed.items().len()),
            Focus::Favorites => (&mut self.favorites_state, self.favorites.items().len()),
        }
    }

    /// Keep both selections inside their lists after the lists change
    fn clamp_selection(&mut self) {
        clamp(&mut self.cards_state, self.feed.items().len());
        clamp(&mut self.favorites_state, self.favorites.items().len());
    }
}

fn clamp(state: &mut ListState, len: usize) {
    match (state.selected(), len) {
        (_, 0) => state.select(None),
        (None, _) => state.select(Some(0)),
        (Some(i), len) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
