use serde::{Deserialize, Serialize};

/// One generated news item.
///
/// Field names serialize in camelCase so the persisted saved set and the
/// gateway payload share one shape. Every field is required: a record missing
/// any of them fails to deserialize, which the gateway reports as a malformed
/// response. Unknown extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Opaque identity key. Unique within a batch and within the saved set.
    pub id: String,
    pub headline: String,
    pub subheadline: String,
    pub summary_points: Vec<String>,
    pub content: String,
    pub image_url: String,
    pub source_uri: String,
    pub source_title: String,
}

#[cfg(test)]
pub(crate) fn test_article(id: &str) -> Article {
    Article {
        id: id.to_string(),
        headline: format!("Headline {}", id),
        subheadline: format!("Subheadline {}", id),
        summary_points: vec![
            format!("{} point one", id),
            format!("{} point two", id),
            format!("{} point three", id),
        ],
        content: format!("Body of article {}.", id),
        image_url: format!("https://picsum.photos/seed/{}/1200/800", id),
        source_uri: format!("https://news.example.com/{}", id),
        source_title: "Example News".to_string(),
    }
}
