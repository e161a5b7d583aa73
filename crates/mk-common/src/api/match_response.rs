use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ENGINE_VERSION;
use crate::{matching::MatchResult, run_id};

/// Envelope returned to the application layer for one intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub run_id: String,
    pub engine_version: String,
    pub matched_at: DateTime<Utc>,
    /// Live candidates that were scored.
    pub evaluated: usize,
    pub results: Vec<MatchResult>,
}

impl MatchResponse {
    pub fn new(results: Vec<MatchResult>, evaluated: usize, matched_at: DateTime<Utc>) -> Self {
        Self {
            run_id: run_id::get().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            matched_at,
            evaluated,
            results,
        }
    }

    pub fn best(&self) -> Option<&MatchResult> {
        self.results.first()
    }
}
