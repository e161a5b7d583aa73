use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    explain::{assumptions, justifications},
    scoring::{FitScoringEngine, MatchingConfig, ScoreBreakdown},
    terms::{
        commercial_terms, delivery_estimate, service_level, CommercialTerms, DeliveryEstimate,
        ServiceLevel,
    },
};
use crate::{Candidate, Requirement};

/// One scored candidate. Derived on every call and never stored by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub org_id: String,
    /// 0..=100
    pub fit_score: u8,
    pub justifications: Vec<String>,
    pub assumptions: Vec<String>,
    pub terms: CommercialTerms,
    pub delivery: DeliveryEstimate,
    pub sla: ServiceLevel,
    pub breakdown: ScoreBreakdown,
}

pub struct MatchingEngine {
    config: MatchingConfig,
    scorer: FitScoringEngine,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(MatchingConfig::default())
    }
}

impl MatchingEngine {
    pub fn new(config: MatchingConfig) -> Self {
        let scorer = FitScoringEngine::new(config.weights);
        Self { config, scorer }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Drops non-live candidates, scores the rest independently and returns the
    /// best `max_results` by descending fit score. Equal scores keep input order.
    pub fn match_products(
        &self,
        requirement: &Requirement,
        candidates: &[Candidate],
        max_results: usize,
    ) -> Vec<MatchResult> {
        if max_results == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<_> = candidates
            .iter()
            .filter(|candidate| candidate.is_live())
            .map(|candidate| self.evaluate(requirement, candidate))
            .collect();
        let live = ranked.len();

        // sort_by is stable, which keeps ties in evaluation order.
        ranked.sort_by(|a, b| b.fit_score.cmp(&a.fit_score));
        ranked.truncate(max_results);

        debug!(
            candidates = candidates.len(),
            live,
            returned = ranked.len(),
            "matched products"
        );

        ranked
    }

    /// `match_products` capped at the configured `max_results`.
    pub fn match_with_default_limit(
        &self,
        requirement: &Requirement,
        candidates: &[Candidate],
    ) -> Vec<MatchResult> {
        self.match_products(requirement, candidates, self.config.max_results)
    }

    /// Full result for a single candidate, regardless of its status.
    pub fn evaluate(&self, requirement: &Requirement, candidate: &Candidate) -> MatchResult {
        let fit = self.scorer.calculate_fit(requirement, candidate);

        MatchResult {
            candidate_id: candidate.id.clone(),
            org_id: candidate.org_id.clone(),
            fit_score: fit.fit_score,
            justifications: justifications(requirement, candidate, &fit.breakdown),
            assumptions: assumptions(requirement, candidate),
            terms: commercial_terms(candidate, &self.config.terms),
            delivery: delivery_estimate(candidate, &self.config.delivery),
            sla: service_level(candidate, &self.config.service),
            breakdown: fit.breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IntegrationStyle, ProductStatus};

    fn requirement() -> Requirement {
        Requirement {
            use_case: "pick and place".into(),
            payload_kg: 5.0,
            throughput_per_hr: 50.0,
            integration: IntegrationStyle::Standalone,
            timeline_weeks: 10,
            budget_band: None,
            location: None,
            uptime_target_pct: None,
        }
    }

    fn live(id: &str, lead_time_weeks: u32) -> Candidate {
        Candidate {
            id: id.into(),
            org_id: format!("org-{id}"),
            category: "scara".into(),
            payload_kg: Some(5.0),
            price_min: 100.0,
            price_max: 110.0,
            lead_time_weeks,
            status: ProductStatus::Live,
            ..Candidate::default()
        }
    }

    #[test]
    fn ranks_live_candidates_by_fit_score() {
        let engine = MatchingEngine::default();
        let slow = live("slow", 20);
        let fast = live("fast", 4);

        let results = engine.match_products(&requirement(), &[slow, fast], 3);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].candidate_id, "fast");
        assert!(results[0].fit_score > results[1].fit_score);
    }

    #[test]
    fn skips_draft_and_disabled_candidates() {
        let engine = MatchingEngine::default();
        let mut draft = live("draft", 1);
        draft.status = ProductStatus::Draft;
        let mut disabled = live("disabled", 1);
        disabled.status = ProductStatus::Disabled;

        let results = engine.match_products(&requirement(), &[draft, disabled, live("ok", 8)], 3);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].candidate_id, "ok");
    }

    #[test]
    fn ties_keep_input_order() {
        let engine = MatchingEngine::default();
        let candidates = vec![live("a", 8), live("b", 8), live("c", 8)];

        let results = engine.match_products(&requirement(), &candidates, 3);
        let ids: Vec<_> = results.iter().map(|r| r.candidate_id.as_str()).collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn zero_cap_and_empty_input_return_nothing() {
        let engine = MatchingEngine::default();
        assert!(engine.match_products(&requirement(), &[live("a", 8)], 0).is_empty());
        assert!(engine.match_products(&requirement(), &[], 3).is_empty());
    }

    #[test]
    fn default_limit_is_three() {
        let engine = MatchingEngine::default();
        let candidates: Vec<_> = (0..5).map(|i| live(&format!("p{i}"), 8)).collect();

        assert_eq!(engine.match_with_default_limit(&requirement(), &candidates).len(), 3);
    }

    #[test]
    fn result_carries_terms_delivery_and_sla() {
        let engine = MatchingEngine::default();
        let result = engine.evaluate(&requirement(), &live("p", 8));

        assert_eq!(result.terms.purchase.price, 105.0);
        assert_eq!(result.delivery.install_weeks, 2);
        assert_eq!(result.sla.restore_hours, 8.0);
        assert!(!result.justifications.is_empty());
        assert_eq!(result.assumptions.len(), 2);
    }
}
