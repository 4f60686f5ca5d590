use serde::{Deserialize, Serialize};

/// One news card as served by the backend
///
/// Cards are immutable once fetched and identified by `id`. The backend
/// does not always send every field (`image_url` in particular is often
/// missing), so everything except the identity and headline defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub link: String,
    /// ISO-8601 timestamp, empty when the source had none
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub image_prompt: String,
    /// Comma-separated list of hex colors
    #[serde(default)]
    pub image_palette: String,
    #[serde(default)]
    pub image_seed: i64,
    #[serde(default)]
    pub image_url: String,
}

/// Body of `POST /api/favorites`
#[derive(Debug, Serialize)]
pub(crate) struct SaveFavoriteBody<'a> {
    pub card: &'a Card,
}

/// Body of `DELETE /api/favorites`
#[derive(Debug, Serialize)]
pub(crate) struct DeleteFavoriteBody<'a> {
    pub id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_default() {
        let raw = r##"{"id":"abc","title":"Headline","summary":"s","link":"https://example.com",
            "published":"","image_prompt":"p","image_palette":"#111111, #222222","image_seed":-42}"##;
        let card: Card = serde_json::from_str(raw).unwrap();

        assert_eq!(card.id, "abc");
        assert_eq!(card.image_seed, -42);
        assert!(card.image_url.is_empty());
        assert!(card.published.is_empty());
    }

    #[test]
    fn test_save_body_wraps_card() {
        let card: Card = serde_json::from_str(r#"{"id":"x","title":"t"}"#).unwrap();
        let body = serde_json::to_value(SaveFavoriteBody { card: &card }).unwrap();

        assert_eq!(body["card"]["id"], "x");
        assert_eq!(body["card"]["image_seed"], 0);
    }

    #[test]
    fn test_delete_body_shape() {
        let body = serde_json::to_string(&DeleteFavoriteBody { id: "x" }).unwrap();
        assert_eq!(body, r#"{"id":"x"}"#);
    }
}
