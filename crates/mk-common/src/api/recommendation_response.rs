use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ENGINE_VERSION;
use crate::{
    recommendation::{Algorithm, RecommendationResult},
    run_id,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub run_id: String,
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
    pub user_id: String,
    pub org_id: String,
    pub algorithm: Algorithm,
    pub results: Vec<RecommendationResult>,
}

/// Row for the caller's recommendation log (feedback-loop analytics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationLogEntry {
    pub run_id: String,
    pub user_id: String,
    pub org_id: String,
    pub product_id: String,
    pub algorithm: Algorithm,
    pub score: f64,
    pub position: usize,
    pub created_at: DateTime<Utc>,
}

impl RecommendationResponse {
    pub fn new(
        user_id: impl Into<String>,
        org_id: impl Into<String>,
        algorithm: Algorithm,
        results: Vec<RecommendationResult>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: run_id::get().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            generated_at,
            user_id: user_id.into(),
            org_id: org_id.into(),
            algorithm,
            results,
        }
    }

    /// One log row per result, positions zero-based in ranking order.
    pub fn to_log_entries(&self) -> Vec<RecommendationLogEntry> {
        self.results
            .iter()
            .enumerate()
            .map(|(position, result)| RecommendationLogEntry {
                run_id: self.run_id.clone(),
                user_id: self.user_id.clone(),
                org_id: self.org_id.clone(),
                product_id: result.product_id.clone(),
                algorithm: result.algorithm,
                score: result.score,
                position,
                created_at: self.generated_at,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, score: f64) -> RecommendationResult {
        RecommendationResult {
            product_id: id.into(),
            score,
            reason: "Similar to products you recently viewed".into(),
            algorithm: Algorithm::Browsing,
            metadata: None,
        }
    }

    #[test]
    fn log_entries_follow_ranking_order() {
        let generated_at = Utc::now();
        let response = RecommendationResponse::new(
            "user-1",
            "buyer-1",
            Algorithm::Browsing,
            vec![result("a", 0.9), result("b", 0.4)],
            generated_at,
        );

        let entries = response.to_log_entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].product_id, "a");
        assert_eq!(entries[0].position, 0);
        assert_eq!(entries[1].position, 1);
        assert_eq!(entries[1].run_id, response.run_id);
        assert_eq!(entries[1].created_at, generated_at);
    }

    #[test]
    fn metadata_is_omitted_when_absent() {
        let json = serde_json::to_value(result("a", 0.5)).expect("serializes");
        assert!(json.get("metadata").is_none());
        assert_eq!(json["algorithm"], "browsing");
    }
}
