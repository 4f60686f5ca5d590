// Client-side state for World Window: feed paging, favorites, toasts, locales
pub mod config;
pub mod error;
pub mod favorites;
pub mod feed;
pub mod format;
pub mod gate;
pub mod i18n;
pub mod source;
pub mod toast;

pub use config::Config;
pub use error::Error;
pub use favorites::{FavoritesController, FavoritesOutcome, FavoritesReply, FavoritesRequest};
pub use feed::{FeedController, FeedOutcome, FeedRequest};
pub use gate::Ticket;
pub use i18n::{Locale, Messages};
pub use source::CardApi;
pub use toast::{Toast, ToastKind};

pub use worldwindow_api::Card;

pub type Result<T> = std::result::Result<T, Error>;
