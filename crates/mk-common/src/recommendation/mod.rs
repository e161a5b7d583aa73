//! Recommendation scoring over caller-supplied interaction history.
//!
//! The engine never fetches anything. Callers hand over the catalog, the
//! organization directory and the view/interaction logs they already hold;
//! every algorithm filters the catalog down to live products from verified
//! suppliers that the caller did not exclude, then scores what is left.

mod browsing;
mod hybrid;
mod industry;
mod similar_buyers;
pub mod tracking;
mod trending;

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use tracing::debug;

use crate::{api::interaction_event::InteractionEventType, Candidate};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Algorithm {
    Browsing,
    Industry,
    Trending,
    SimilarBuyers,
    Hybrid,
}

impl Algorithm {
    /// The independent sources blended by `Hybrid`, in blending order.
    pub const SOURCES: [Algorithm; 4] = [
        Algorithm::Browsing,
        Algorithm::Industry,
        Algorithm::Trending,
        Algorithm::SimilarBuyers,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub browsing: f64,
    pub industry: f64,
    pub trending: f64,
    pub similar_buyers: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            browsing: 0.40,
            industry: 0.25,
            trending: 0.20,
            similar_buyers: 0.15,
        }
    }
}

impl BlendWeights {
    pub fn weight(&self, algorithm: Algorithm) -> f64 {
        match algorithm {
            Algorithm::Browsing => self.browsing,
            Algorithm::Industry => self.industry,
            Algorithm::Trending => self.trending,
            Algorithm::SimilarBuyers => self.similar_buyers,
            Algorithm::Hybrid => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationConfig {
    pub weights: BlendWeights,
    pub industry_window_days: i64,
    /// Length of each of the two trending windows.
    pub trending_window_days: i64,
    pub similar_buyer_window_days: i64,
    pub recent_view_limit: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            weights: BlendWeights::default(),
            industry_window_days: 60,
            trending_window_days: 7,
            similar_buyer_window_days: 90,
            recent_view_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub org_type: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub user_id: String,
    /// Organization of the viewing user.
    pub org_id: String,
    pub product_id: String,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: String,
    pub product_id: String,
    /// Carried for the caller's analytics. Similar-buyers counts every kind
    /// alike; a purchase is no stronger a signal than a click.
    pub kind: InteractionEventType,
    pub occurred_at: DateTime<Utc>,
}

/// Everything the caller already fetched for one recommendation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationDataset {
    pub catalog: Vec<Candidate>,
    #[serde(default)]
    pub organizations: HashMap<String, Organization>,
    #[serde(default)]
    pub views: Vec<ProductView>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// Lookup of organizations resolved upstream.
///
/// Verification is an external gate; scorers only read the flag. Unknown
/// organizations are unverified and have no type or name.
pub trait OrganizationDirectory {
    fn organization(&self, org_id: &str) -> Option<&Organization>;

    fn is_verified(&self, org_id: &str) -> bool {
        self.organization(org_id).is_some_and(|org| org.verified)
    }

    fn org_type(&self, org_id: &str) -> Option<&str> {
        self.organization(org_id)
            .and_then(|org| org.org_type.as_deref())
    }

    fn org_name(&self, org_id: &str) -> Option<&str> {
        self.organization(org_id).and_then(|org| org.name.as_deref())
    }
}

impl OrganizationDirectory for HashMap<String, Organization> {
    fn organization(&self, org_id: &str) -> Option<&Organization> {
        self.get(org_id)
    }
}

impl OrganizationDirectory for RecommendationDataset {
    fn organization(&self, org_id: &str) -> Option<&Organization> {
        self.organizations.organization(org_id)
    }
}

impl RecommendationDataset {
    pub fn product(&self, product_id: &str) -> Option<&Candidate> {
        self.catalog.iter().find(|c| c.id == product_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub user_id: String,
    pub org_id: String,
    pub limit: usize,
    pub exclude_ids: HashSet<String>,
    pub algorithm: Algorithm,
}

impl RecommendationRequest {
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            org_id: org_id.into(),
            limit: 10,
            exclude_ids: HashSet::new(),
            algorithm: Algorithm::Hybrid,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn excluding<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_ids.extend(ids.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub algorithm: Algorithm,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationMetadata {
    pub contributions: Vec<Contribution>,
}

impl RecommendationMetadata {
    pub fn reasons(&self) -> Vec<&str> {
        self.contributions.iter().map(|c| c.reason.as_str()).collect()
    }

    pub fn algorithms(&self) -> Vec<Algorithm> {
        self.contributions.iter().map(|c| c.algorithm).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub product_id: String,
    /// Always within `[0, 1]`.
    pub score: f64,
    pub reason: String,
    pub algorithm: Algorithm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RecommendationMetadata>,
}

impl RecommendationResult {
    pub(crate) fn new(
        product_id: &str,
        score: f64,
        reason: String,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            product_id: product_id.to_string(),
            score: clamp_unit(score),
            reason,
            algorithm,
            metadata: None,
        }
    }
}

pub(crate) fn clamp_unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Shared state handed to each scorer for one call.
pub(crate) struct ScoringContext<'a> {
    pub dataset: &'a RecommendationDataset,
    pub request: &'a RecommendationRequest,
    pub config: &'a RecommendationConfig,
    pub now: DateTime<Utc>,
    /// Live, verified, not excluded; catalog order.
    pub eligible: Vec<&'a Candidate>,
}

impl<'a> ScoringContext<'a> {
    fn new(
        dataset: &'a RecommendationDataset,
        request: &'a RecommendationRequest,
        config: &'a RecommendationConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let eligible = dataset
            .catalog
            .iter()
            .filter(|c| c.is_live())
            .filter(|c| dataset.is_verified(&c.org_id))
            .filter(|c| !request.exclude_ids.contains(&c.id))
            .collect();

        Self {
            dataset,
            request,
            config,
            now,
            eligible,
        }
    }

    pub fn days_ago(&self, days: i64) -> DateTime<Utc> {
        self.now - Duration::days(days)
    }

    pub fn run(&self, algorithm: Algorithm) -> Vec<RecommendationResult> {
        match algorithm {
            Algorithm::Browsing => browsing::score(self),
            Algorithm::Industry => industry::score(self),
            Algorithm::Trending => trending::score(self),
            Algorithm::SimilarBuyers => similar_buyers::score(self),
            Algorithm::Hybrid => hybrid::score(self),
        }
    }
}

pub(crate) fn sort_by_score(results: &mut [RecommendationResult]) {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Ranked recommendations for one user. `now` anchors the time windows.
    pub fn recommendations_for_user(
        &self,
        dataset: &RecommendationDataset,
        request: &RecommendationRequest,
        now: DateTime<Utc>,
    ) -> Vec<RecommendationResult> {
        if request.limit == 0 {
            return Vec::new();
        }

        let ctx = ScoringContext::new(dataset, request, &self.config, now);
        let mut results = ctx.run(request.algorithm);
        sort_by_score(&mut results);
        results.truncate(request.limit);

        debug!(
            algorithm = request.algorithm.as_ref(),
            eligible = ctx.eligible.len(),
            returned = results.len(),
            "scored recommendations"
        );

        results
    }
}
