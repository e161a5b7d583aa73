use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use mk_common::{
    api::{match_response::MatchResponse, recommendation_response::RecommendationResponse},
    logging::{init_tracing_subscriber, install_tracing_panic_hook},
    matching::{MatchingConfig, MatchingEngine, WeightsError},
    recommendation::{
        Algorithm, RecommendationDataset, RecommendationEngine, RecommendationRequest,
    },
    Candidate, Requirement,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

const APP_NAME: &str = "mk-match";

#[derive(Debug, Parser)]
#[command(
    name = "mk-match",
    about = "Rank supplier products for a buyer intake, or recommend products to a user"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Start the Prometheus exporter (port from MK_METRICS_PORT, default 9464)
    #[arg(long, env = "MK_METRICS", default_value_t = false)]
    metrics: bool,

    /// Fail instead of clamping when MK_WEIGHT_* do not sum to 1.0
    #[arg(long, env = "MK_STRICT_WEIGHTS", default_value_t = false)]
    strict_weights: bool,

    /// Pretty-print the JSON response
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a requirement against a candidate catalog
    Match {
        /// JSON file holding one requirement
        #[arg(long)]
        requirement: PathBuf,

        /// JSON file holding an array of candidates
        #[arg(long)]
        candidates: PathBuf,

        /// Result cap (defaults to MK_MAX_RESULTS or 3)
        #[arg(long)]
        max_results: Option<usize>,
    },
    /// Recommend products for a user from caller-supplied history
    Recommend {
        /// JSON file holding catalog, organizations, views and interactions
        #[arg(long)]
        dataset: PathBuf,

        #[arg(long)]
        user: String,

        #[arg(long)]
        org: String,

        /// browsing | industry | trending | similar_buyers | hybrid
        #[arg(long, default_value = "hybrid")]
        algorithm: Algorithm,

        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Comma separated product ids to leave out
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Anchor for the time windows (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid fit weights: {0}")]
    Weights(#[from] WeightsError),
    #[error("failed to render response: {0}")]
    Render(serde_json::Error),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(CliError::Render)
}

fn run_match(
    config: MatchingConfig,
    requirement: &Path,
    candidates: &Path,
    max_results: Option<usize>,
) -> Result<MatchResponse, CliError> {
    let requirement: Requirement = read_json(requirement)?;
    let candidates: Vec<Candidate> = read_json(candidates)?;

    let engine = MatchingEngine::new(config);
    let cap = max_results.unwrap_or(engine.config().max_results);
    let live = candidates.iter().filter(|c| c.is_live()).count();
    let results = engine.match_products(&requirement, &candidates, cap);

    info!(
        candidates = candidates.len(),
        live,
        returned = results.len(),
        "match complete"
    );
    mk_metrics::record_match_run(live, results.len());

    Ok(MatchResponse::new(results, live, Utc::now()))
}

fn run_recommend(
    dataset: &Path,
    request: RecommendationRequest,
    now: DateTime<Utc>,
) -> Result<RecommendationResponse, CliError> {
    let dataset: RecommendationDataset = read_json(dataset)?;

    let engine = RecommendationEngine::default();
    let results = engine.recommendations_for_user(&dataset, &request, now);

    info!(
        algorithm = request.algorithm.as_ref(),
        user_id = %request.user_id,
        returned = results.len(),
        "recommendations complete"
    );
    mk_metrics::record_recommendations(request.algorithm.as_ref(), results.len());

    Ok(RecommendationResponse::new(
        request.user_id,
        request.org_id,
        request.algorithm,
        results,
        now,
    ))
}

fn run() -> Result<(), CliError> {
    dotenv().ok();
    init_tracing_subscriber(APP_NAME);
    install_tracing_panic_hook(APP_NAME);

    let cli = Cli::parse();
    if cli.metrics {
        mk_metrics::init_metrics("MK_METRICS_PORT", 9464);
    }

    let output = match cli.command {
        Command::Match {
            requirement,
            candidates,
            max_results,
        } => {
            let config = MatchingConfig::from_env();
            if cli.strict_weights {
                config.weights.validate()?;
            }
            let response = run_match(config, &requirement, &candidates, max_results)?;
            render(&response, cli.pretty)?
        }
        Command::Recommend {
            dataset,
            user,
            org,
            algorithm,
            limit,
            exclude,
            now,
        } => {
            let request = RecommendationRequest::new(user, org)
                .with_algorithm(algorithm)
                .with_limit(limit)
                .excluding(exclude);
            let response = run_recommend(&dataset, request, now.unwrap_or_else(Utc::now))?;
            render(&response, cli.pretty)?
        }
    };

    println!("{output}");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        tracing::error!(error = %err, "mk-match failed");
        eprintln!("mk-match failed: {err}");
        std::process::exit(1);
    }
}
