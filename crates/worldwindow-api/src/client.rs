use std::time::Duration;

use tracing::debug;

use crate::card::{Card, DeleteFavoriteBody, SaveFavoriteBody};
use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Cards the backend hands out for "today" when no limit is given
pub const DEFAULT_DAILY_LIMIT: u32 = 5;

/// Cards per "load more" page when no batch size is given
pub const DEFAULT_BATCH_SIZE: u32 = 3;

const USER_AGENT: &str = concat!("WorldWindow/", env!("CARGO_PKG_VERSION"));

/// Client for the card backend's JSON API
///
/// Five endpoints, all under `/api`. Any non-2xx answer becomes
/// [`ApiError::Http`] and nothing is retried.
#[derive(Debug, Clone)]
pub struct CardsClient {
    client: reqwest::Client,
    base_url: String,
}

impl CardsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Build a client with an optional per-request timeout.
    /// `None` leaves reqwest's default (no timeout) in place.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url = base_url.into();
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/daily?limit=N`
    pub async fn fetch_daily(&self, limit: u32) -> Result<Vec<Card>> {
        let request = self
            .client
            .get(self.endpoint("/api/daily"))
            .query(&[("limit", limit)]);

        let cards = read_cards(self.send(request).await?).await?;
        debug!("Fetched {} daily cards (limit {})", cards.len(), limit);
        Ok(cards)
    }

    /// `GET /api/more?offset=N&batch=M`. An empty array means the feed is exhausted.
    pub async fn fetch_more(&self, offset: usize, batch: u32) -> Result<Vec<Card>> {
        let request = self
            .client
            .get(self.endpoint("/api/more"))
            .query(&[("offset", offset as u64), ("batch", batch as u64)]);

        let cards = read_cards(self.send(request).await?).await?;
        debug!("Fetched {} more cards at offset {}", cards.len(), offset);
        Ok(cards)
    }

    /// `GET /api/favorites`
    pub async fn fetch_favorites(&self) -> Result<Vec<Card>> {
        let request = self.client.get(self.endpoint("/api/favorites"));

        let cards = read_cards(self.send(request).await?).await?;
        debug!("Fetched {} favorites", cards.len());
        Ok(cards)
    }

    /// `POST /api/favorites` with `{"card": ...}`
    pub async fn save_favorite(&self, card: &Card) -> Result<()> {
        let request = self
            .client
            .post(self.endpoint("/api/favorites"))
            .json(&SaveFavoriteBody { card });

        self.send(request).await?;
        debug!("Saved favorite {}", card.id);
        Ok(())
    }

    /// `DELETE /api/favorites` with `{"id": ...}`
    pub async fn delete_favorite(&self, id: &str) -> Result<()> {
        let request = self
            .client
            .delete(self.endpoint("/api/favorites"))
            .json(&DeleteFavoriteBody { id });

        self.send(request).await?;
        debug!("Deleted favorite {}", id);
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            debug!("{} answered {}", response.url(), status);
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

async fn read_cards(response: reqwest::Response) -> Result<Vec<Card>> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    /// What the fake backend was asked for
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Daily(HashMap<String, String>),
        More(HashMap<String, String>),
        Favorites,
        Save(Value),
        Delete(Value),
    }

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl Recorder {
        fn push(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    async fn daily(
        State(recorder): State<Recorder>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        recorder.push(Call::Daily(query));
        Json(json!([{ "id": "a", "title": "A" }]))
    }

    async fn more(
        State(recorder): State<Recorder>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        recorder.push(Call::More(query));
        Json(json!([]))
    }

    async fn list_favorites(State(recorder): State<Recorder>) -> Json<Value> {
        recorder.push(Call::Favorites);
        Json(json!([{ "id": "x", "title": "X", "image_seed": 7 }]))
    }

    async fn save_favorite(
        State(recorder): State<Recorder>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        recorder.push(Call::Save(body.clone()));
        if body.get("card").and_then(|card| card.get("id")).is_none() {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid payload" })));
        }
        (StatusCode::OK, Json(json!({ "status": "saved" })))
    }

    async fn delete_favorite(
        State(recorder): State<Recorder>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        recorder.push(Call::Delete(body));
        Json(json!({ "status": "deleted" }))
    }

    /// The card backend's routes, recording every call
    fn backend(recorder: Recorder) -> Router {
        Router::new()
            .route("/api/daily", get(daily))
            .route("/api/more", get(more))
            .route(
                "/api/favorites",
                get(list_favorites).post(save_favorite).delete(delete_favorite),
            )
            .with_state(recorder)
    }

    /// Serve `app` on a random local port and return its base URL
    async fn spawn(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    async fn start_backend() -> (CardsClient, Recorder) {
        let recorder = Recorder::default();
        let base = spawn(backend(recorder.clone())).await;
        (CardsClient::new(base).unwrap(), recorder)
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_daily_sends_limit() {
        let (client, recorder) = start_backend().await;

        let cards = client.fetch_daily(5).await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "a");
        assert_eq!(recorder.calls(), vec![Call::Daily(query(&[("limit", "5")]))]);
    }

    #[tokio::test]
    async fn test_fetch_more_sends_offset_and_batch() {
        let (client, recorder) = start_backend().await;

        let cards = client.fetch_more(8, 3).await.unwrap();

        assert!(cards.is_empty());
        assert_eq!(
            recorder.calls(),
            vec![Call::More(query(&[("offset", "8"), ("batch", "3")]))]
        );
    }

    #[tokio::test]
    async fn test_fetch_favorites() {
        let (client, recorder) = start_backend().await;

        let cards = client.fetch_favorites().await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].image_seed, 7);
        assert!(cards[0].image_url.is_empty());
        assert_eq!(recorder.calls(), vec![Call::Favorites]);
    }

    #[tokio::test]
    async fn test_save_favorite_posts_wrapped_card() {
        let (client, recorder) = start_backend().await;
        let card: Card = serde_json::from_str(r#"{"id":"x","title":"X"}"#).unwrap();

        client.save_favorite(&card).await.unwrap();

        let calls = recorder.calls();
        let [Call::Save(body)] = calls.as_slice() else {
            panic!("expected one save, got {:?}", calls);
        };
        assert_eq!(body["card"]["id"], "x");
        assert_eq!(body["card"]["title"], "X");
    }

    #[tokio::test]
    async fn test_delete_favorite_sends_id() {
        let recorder = Recorder::default();
        let base = spawn(backend(recorder.clone())).await;
        let client = CardsClient::new(format!("{}/", base)).unwrap();

        client.delete_favorite("x").await.unwrap();

        assert_eq!(recorder.calls(), vec![Call::Delete(json!({ "id": "x" }))]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let app = Router::new().route(
            "/api/favorites",
            axum::routing::post(|| async {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid payload" })))
            }),
        );
        let client = CardsClient::new(spawn(app).await).unwrap();
        let card: Card = serde_json::from_str(r#"{"id":"x","title":"X"}"#).unwrap();

        let err = client.save_favorite(&card).await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 400 }));
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_error() {
        let app = Router::new().route("/api/favorites", get(|| async { "<html>oops</html>" }));
        let client = CardsClient::new(spawn(app).await).unwrap();

        let err = client.fetch_favorites().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CardsClient::new(format!("http://{}", addr)).unwrap();
        let err = client.fetch_daily(5).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = CardsClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint("/api/daily"), "http://localhost:8000/api/daily");
    }
}
