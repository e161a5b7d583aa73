use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::recommendation::Algorithm;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InteractionEventType {
    Viewed,
    Clicked,
    Inquired,
    Shortlisted,
    Purchased,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InteractionEventSource {
    #[default]
    Web,
    Email,
    Api,
}

/// A click on a recommended product, handed to an `InteractionSink`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClickEvent {
    pub user_id: String,
    #[serde(default)]
    pub org_id: Option<String>,
    pub product_id: String,
    #[serde(default)]
    pub algorithm: Option<Algorithm>,
    /// Zero-based rank the product was shown at.
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub source: InteractionEventSource,
    pub clicked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_event_defaults_optional_fields() {
        let event: ClickEvent = serde_json::from_value(serde_json::json!({
            "user_id": "u-1",
            "product_id": "p-1",
            "algorithm": "similar_buyers",
            "clicked_at": "2026-06-01T12:00:00Z"
        }))
        .expect("click event should parse");

        assert_eq!(event.algorithm, Some(Algorithm::SimilarBuyers));
        assert_eq!(event.source, InteractionEventSource::Web);
        assert!(event.position.is_none());
        assert_eq!(InteractionEventType::Shortlisted.as_ref(), "shortlisted");
    }
}
