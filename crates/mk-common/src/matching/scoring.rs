use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use super::{
    terms::{CommercialTermsConfig, DeliveryConfig, ServiceLevelConfig},
    weights::{Weights, DEFAULT_WEIGHTS},
};
use crate::{Candidate, IntegrationStyle, Requirement};

/// Controller vendors that ship PLC-native robot interfaces.
pub const PLC_VENDOR_KEYWORDS: [&str; 3] = ["siemens", "abb", "rockwell"];
/// Industrial Ethernet protocols recognised in controller descriptions.
pub const FIELDBUS_PROTOCOL_KEYWORDS: [&str; 2] = ["profinet", "ethercat"];

const HIGH_THROUGHPUT_PER_HR: f64 = 100.0;
const FAST_SPEED_MPS: f64 = 1.5;
const MAX_PAYLOAD_PENALTY: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub weights: Weights,
    pub max_results: usize,
    pub terms: CommercialTermsConfig,
    pub delivery: DeliveryConfig,
    pub service: ServiceLevelConfig,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            max_results: 3,
            terms: CommercialTermsConfig::default(),
            delivery: DeliveryConfig::default(),
            service: ServiceLevelConfig::default(),
        }
    }
}

impl MatchingConfig {
    /// Defaults overridden by `MK_WEIGHT_*` and `MK_MAX_RESULTS`.
    /// Values that fail to parse keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let weights = Weights {
            spec: env_f64("MK_WEIGHT_SPEC").unwrap_or(defaults.weights.spec),
            integration: env_f64("MK_WEIGHT_INTEGRATION").unwrap_or(defaults.weights.integration),
            lead_time: env_f64("MK_WEIGHT_LEAD_TIME").unwrap_or(defaults.weights.lead_time),
            service: env_f64("MK_WEIGHT_SERVICE").unwrap_or(defaults.weights.service),
            warranty: env_f64("MK_WEIGHT_WARRANTY").unwrap_or(defaults.weights.warranty),
            cost: env_f64("MK_WEIGHT_COST").unwrap_or(defaults.weights.cost),
        };

        if !weights.is_normalized() {
            tracing::warn!(
                sum = weights.sum(),
                "fit weights from environment do not sum to 1.0; scores will be clamped"
            );
        }

        Self {
            weights,
            max_results: std::env::var("MK_MAX_RESULTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_results),
            ..defaults
        }
    }

    pub fn with_weights(weights: Weights) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FitStatus {
    PerfectMatch,
    Match,
    PartialMatch,
    Miss,
}

impl FitStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            FitStatus::PerfectMatch
        } else if score >= 70.0 {
            FitStatus::Match
        } else if score >= 40.0 {
            FitStatus::PartialMatch
        } else {
            FitStatus::Miss
        }
    }
}

/// One weighted dimension, always in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: f64,
    pub status: FitStatus,
    pub details: String,
}

impl DimensionScore {
    fn new(raw: f64, details: Vec<String>) -> Self {
        let score = raw.clamp(0.0, 100.0);
        Self {
            score,
            status: FitStatus::from_score(score),
            details: if details.is_empty() {
                "base contribution only".into()
            } else {
                details.join(" / ")
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub spec: DimensionScore,
    pub integration: DimensionScore,
    pub lead_time: DimensionScore,
    pub service: DimensionScore,
    pub warranty: DimensionScore,
    pub cost: DimensionScore,
}

impl ScoreBreakdown {
    /// Weighted sum before rounding and clamping.
    pub fn weighted_total(&self, weights: &Weights) -> f64 {
        self.spec.score * weights.spec
            + self.integration.score * weights.integration
            + self.lead_time.score * weights.lead_time
            + self.service.score * weights.service
            + self.warranty.score * weights.warranty
            + self.cost.score * weights.cost
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitScore {
    pub total: f64,
    pub fit_score: u8,
    pub breakdown: ScoreBreakdown,
}

/// Scores one requirement against one candidate. Candidates never see each
/// other, so callers may fan this out freely.
pub struct FitScoringEngine {
    weights: Weights,
}

impl FitScoringEngine {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    pub fn calculate_fit(&self, requirement: &Requirement, candidate: &Candidate) -> FitScore {
        let breakdown = ScoreBreakdown {
            spec: self.score_spec(requirement, candidate),
            integration: self.score_integration(requirement, candidate),
            lead_time: self.score_lead_time(requirement, candidate),
            service: self.score_service(requirement, candidate),
            warranty: self.score_warranty(candidate),
            cost: self.score_cost(candidate),
        };

        let total = breakdown.weighted_total(&self.weights);

        FitScore {
            total,
            fit_score: to_fit_score(total),
            breakdown,
        }
    }

    fn score_spec(&self, requirement: &Requirement, candidate: &Candidate) -> DimensionScore {
        let mut score = 50.0;
        let mut details = Vec::new();

        match candidate.payload_kg {
            Some(payload) if payload >= requirement.payload_kg || requirement.payload_kg <= 0.0 => {
                score += 20.0;
                details.push(format!(
                    "payload {:.1}kg ≥ required {:.1}kg",
                    payload, requirement.payload_kg
                ));
            }
            Some(payload) => {
                let shortfall = (requirement.payload_kg - payload) / requirement.payload_kg;
                let penalty = (shortfall * 100.0).min(MAX_PAYLOAD_PENALTY);
                score -= penalty;
                details.push(format!(
                    "payload short: {:.1}kg < required {:.1}kg (-{:.0})",
                    payload, requirement.payload_kg, penalty
                ));
            }
            None => details.push("payload not declared".into()),
        }

        if requirement.throughput_per_hr > HIGH_THROUGHPUT_PER_HR {
            if let Some(speed) = candidate.max_speed_mps {
                if speed > FAST_SPEED_MPS {
                    score += 15.0;
                    details.push(format!("max speed {speed:.2} suits high throughput"));
                } else {
                    score += 5.0;
                    details.push(format!("max speed {speed:.2} is modest for high throughput"));
                }
            }
        }

        let attrs = &candidate.attributes;
        if attrs.has_certifications() {
            score += 10.0;
            details.push("certified".into());
        }
        if attrs.has_safety_rating() {
            score += 5.0;
            details.push("safety rating declared".into());
        }
        if attrs.has_connectivity() {
            score += 5.0;
            details.push("connectivity declared".into());
        }

        DimensionScore::new(score, details)
    }

    fn score_integration(
        &self,
        requirement: &Requirement,
        candidate: &Candidate,
    ) -> DimensionScore {
        let mut score = 30.0;
        let mut details = Vec::new();

        let controller = candidate
            .controller
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let controller_lower = controller.map(str::to_lowercase);
        let mentions_any = |keywords: &[&str]| {
            controller_lower
                .as_deref()
                .is_some_and(|c| keywords.iter().any(|k| c.contains(k)))
        };

        match requirement.integration {
            IntegrationStyle::Plc => {
                if mentions_any(&PLC_VENDOR_KEYWORDS) {
                    score += 50.0;
                    details.push("PLC-native controller vendor".into());
                } else if controller.is_some() {
                    score += 20.0;
                    details.push("controller declared, PLC vendor not recognised".into());
                }
            }
            IntegrationStyle::Fieldbus => {
                if mentions_any(&FIELDBUS_PROTOCOL_KEYWORDS) {
                    score += 60.0;
                    details.push("fieldbus protocol supported".into());
                } else if controller.is_some() {
                    score += 25.0;
                    details.push("controller declared, fieldbus protocol not stated".into());
                }
            }
            IntegrationStyle::Standalone => {
                score += 40.0;
                details.push("standalone operation".into());
            }
            IntegrationStyle::Other => {}
        }

        if candidate.attributes.has_connectivity() {
            score += 20.0;
            details.push("connectivity options listed".into());
        }

        DimensionScore::new(score, details)
    }

    fn score_lead_time(&self, requirement: &Requirement, candidate: &Candidate) -> DimensionScore {
        let lead = candidate.lead_time_weeks;
        let required = requirement.timeline_weeks;

        if lead <= required {
            return DimensionScore::new(
                100.0,
                vec![format!("{lead} weeks within {required}-week timeline")],
            );
        }

        let delay = (lead - required) as f64;
        let score = if required == 0 {
            0.0
        } else {
            (100.0 - 100.0 * (delay / required as f64)).max(0.0)
        };

        DimensionScore::new(
            score,
            vec![format!(
                "{lead} weeks exceeds {required}-week timeline by {delay:.0}"
            )],
        )
    }

    fn score_service(&self, requirement: &Requirement, candidate: &Candidate) -> DimensionScore {
        let mut score = 40.0;
        let mut details = Vec::new();

        if requirement
            .location
            .as_deref()
            .is_some_and(|l| !l.trim().is_empty())
        {
            score += 20.0;
            details.push("site location provided".into());
        }

        let attrs = &candidate.attributes;
        if attrs.has_service_team() {
            score += 20.0;
            details.push("field service team".into());
        }
        if attrs.has_remote_diagnostics() {
            score += 15.0;
            details.push("remote diagnostics".into());
        }
        if attrs.has_training_included() {
            score += 5.0;
            details.push("training included".into());
        }

        DimensionScore::new(score, details)
    }

    fn score_warranty(&self, candidate: &Candidate) -> DimensionScore {
        let mut score = 40.0;
        let mut details = Vec::new();

        let months = candidate.attributes.warranty_months_or_default();
        score += if months >= 24 {
            30.0
        } else if months >= 12 {
            20.0
        } else {
            10.0
        };
        details.push(format!("warranty {months} months"));

        if let Some(mttr) = candidate.attributes.mttr_hours {
            score += if mttr <= 4.0 {
                30.0
            } else if mttr <= 8.0 {
                20.0
            } else {
                10.0
            };
            details.push(format!("MTTR {mttr:.1}h"));
        }

        DimensionScore::new(score, details)
    }

    fn score_cost(&self, candidate: &Candidate) -> DimensionScore {
        let mut score = 30.0;
        let mut details = Vec::new();

        if candidate.price_min > 0.0 {
            let spread = (candidate.price_max - candidate.price_min).abs() / candidate.price_min;
            score += if spread < 0.2 {
                40.0
            } else if spread < 0.5 {
                30.0
            } else {
                20.0
            };
            details.push(format!("price spread {:.0}%", spread * 100.0));
        } else {
            score += 20.0;
            details.push("price band has no minimum".into());
        }

        let attrs = &candidate.attributes;
        if attrs.operating_cost_inr_per_year.is_some() {
            score += 20.0;
            details.push("annual operating cost disclosed".into());
        }
        if attrs.maintenance_cost_inr_per_year.is_some() {
            score += 10.0;
            details.push("annual maintenance cost disclosed".into());
        }

        DimensionScore::new(score, details)
    }
}

/// Rounds a weighted total into the 0..=100 fit score.
pub fn to_fit_score(total: f64) -> u8 {
    // `as` maps NaN to 0.
    total.clamp(0.0, 100.0).round() as u8
}
