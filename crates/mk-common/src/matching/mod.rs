pub mod explain;
pub mod pipeline;
pub mod scoring;
pub mod terms;
pub mod weights;

pub use pipeline::{MatchResult, MatchingEngine};
pub use scoring::{FitStatus, MatchingConfig, ScoreBreakdown};
pub use weights::{Weights, WeightsError, DEFAULT_WEIGHTS};
