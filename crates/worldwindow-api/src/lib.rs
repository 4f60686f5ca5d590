// HTTP client for the World Window card backend
pub mod card;
pub mod client;
pub mod error;

// Re-export common types
pub use card::Card;
pub use client::{CardsClient, DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_DAILY_LIMIT};
pub use error::{ApiError, Result};
