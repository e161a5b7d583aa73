use thiserror::Error;

/// Default fit weights.
/// Spec fit dominates, integration and service coverage follow; cost
/// transparency is a tie-breaker.
pub const DEFAULT_WEIGHTS: Weights = Weights {
    spec: 0.40,
    integration: 0.20,
    lead_time: 0.10,
    service: 0.15,
    warranty: 0.10,
    cost: 0.05,
};

const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub spec: f64,
    pub integration: f64,
    pub lead_time: f64,
    pub service: f64,
    pub warranty: f64,
    pub cost: f64,
}

impl Default for Weights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weight `{name}` is negative or not finite: {value}")]
    Invalid { name: &'static str, value: f64 },
    #[error("weights sum to {0:.4}, expected 1.0")]
    NotNormalized(f64),
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.spec + self.integration + self.lead_time + self.service + self.warranty + self.cost
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() < SUM_TOLERANCE
    }

    /// Strict check for callers that load weights from configuration.
    /// The engine itself uses whatever it is given and clamps the result.
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in self.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::Invalid { name, value });
            }
        }

        if !self.is_normalized() {
            return Err(WeightsError::NotNormalized(self.sum()));
        }

        Ok(())
    }

    fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("spec", self.spec),
            ("integration", self.integration),
            ("lead_time", self.lead_time),
            ("service", self.service),
            ("warranty", self.warranty),
            ("cost", self.cost),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!((DEFAULT_WEIGHTS.sum() - 1.0).abs() < 1e-6);
        assert!(DEFAULT_WEIGHTS.is_normalized());
        assert_eq!(DEFAULT_WEIGHTS.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_and_unnormalized() {
        let negative = Weights {
            cost: -0.05,
            spec: 0.50,
            ..DEFAULT_WEIGHTS
        };
        assert!(matches!(
            negative.validate(),
            Err(WeightsError::Invalid { name: "cost", .. })
        ));

        let heavy = Weights {
            spec: 0.9,
            ..DEFAULT_WEIGHTS
        };
        assert!(!heavy.is_normalized());
        assert!(matches!(heavy.validate(), Err(WeightsError::NotNormalized(_))));
    }
}
