// Seam between the controllers and the HTTP client
use async_trait::async_trait;
use worldwindow_api::{Card, CardsClient, Result as ApiResult};

/// The five backend calls the controllers depend on
///
/// `CardsClient` is the real implementation; tests mock this trait so the
/// controllers can be driven without a server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardApi: Send + Sync {
    async fn daily(&self, limit: u32) -> ApiResult<Vec<Card>>;
    async fn more(&self, offset: usize, batch: u32) -> ApiResult<Vec<Card>>;
    async fn favorites(&self) -> ApiResult<Vec<Card>>;
    async fn add_favorite(&self, card: &Card) -> ApiResult<()>;
    async fn remove_favorite(&self, id: &str) -> ApiResult<()>;
}

#[async_trait]
impl CardApi for CardsClient {
    async fn daily(&self, limit: u32) -> ApiResult<Vec<Card>> {
        self.fetch_daily(limit).await
    }

    async fn more(&self, offset: usize, batch: u32) -> ApiResult<Vec<Card>> {
        self.fetch_more(offset, batch).await
    }

    async fn favorites(&self) -> ApiResult<Vec<Card>> {
        self.fetch_favorites().await
    }

    async fn add_favorite(&self, card: &Card) -> ApiResult<()> {
        self.save_favorite(card).await
    }

    async fn remove_favorite(&self, id: &str) -> ApiResult<()> {
        self.delete_favorite(id).await
    }
}

/// Build a card with just an id and a title. Test fixture shared by the
/// controller tests.
#[cfg(test)]
pub(crate) fn card(id: &str) -> Card {
    Card {
        id: id.to_string(),
        title: format!("Title {}", id),
        summary: String::new(),
        link: format!("https://example.com/{}", id),
        published: String::new(),
        image_prompt: String::new(),
        image_palette: String::new(),
        image_seed: 0,
        image_url: String::new(),
    }
}
