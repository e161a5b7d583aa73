use std::collections::HashMap;

use super::{
    clamp_unit, Algorithm, Contribution, RecommendationMetadata, RecommendationResult,
    ScoringContext,
};

/// Weighted blend of every source that produced a result for a product.
/// The first contributing source supplies the headline reason.
pub(super) fn score(ctx: &ScoringContext<'_>) -> Vec<RecommendationResult> {
    let weights = ctx.config.weights;
    let mut order: Vec<String> = Vec::new();
    let mut blended: HashMap<String, Vec<Contribution>> = HashMap::new();

    for algorithm in Algorithm::SOURCES {
        for result in ctx.run(algorithm) {
            let contributions = blended.entry(result.product_id.clone()).or_insert_with(|| {
                order.push(result.product_id.clone());
                Vec::new()
            });
            contributions.push(Contribution {
                algorithm,
                score: result.score,
                reason: result.reason,
            });
        }
    }

    order
        .into_iter()
        .filter_map(|product_id| {
            let contributions = blended.remove(&product_id)?;
            let combined: f64 = contributions
                .iter()
                .map(|c| c.score * weights.weight(c.algorithm))
                .sum();
            let reason = contributions.first()?.reason.clone();

            Some(RecommendationResult {
                product_id,
                score: clamp_unit(combined),
                reason,
                algorithm: Algorithm::Hybrid,
                metadata: Some(RecommendationMetadata { contributions }),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::recommendation::RecommendationConfig;

    #[test]
    fn blends_sources_with_weights_and_keeps_all_reasons() {
        let mut data = dataset(vec![
            product("seen", "sup-a", "arm", 100.0),
            product("both", "sup-a", "arm", 100.0),
            product("trend-only", "sup-b", "agv", 100.0),
        ]);
        data.views = vec![
            view("user-1", "buyer-1", "seen", 20),
            // peers and trending for "both"
            view("peer", "buyer-2", "both", 1),
            view("peer", "buyer-2", "both", 2),
            view("other", "buyer-3", "trend-only", 1),
        ];
        let request = request(Algorithm::Hybrid);
        let config = RecommendationConfig::default();
        let ctx = ScoringContext::new(&data, &request, &config, now());

        let results = score(&ctx);
        let both = results
            .iter()
            .find(|r| r.product_id == "both")
            .expect("blended product present");

        // browsing 1.0, industry 2/10, trending (2/10)/2
        let expected = 1.0 * 0.40 + 0.2 * 0.25 + 0.1 * 0.20;
        assert!((both.score - expected).abs() < 1e-9);
        assert_eq!(both.algorithm, Algorithm::Hybrid);
        assert!(both.reason.contains("Acme Robotics"));

        let metadata = both.metadata.as_ref().expect("metadata present");
        assert_eq!(
            metadata.algorithms(),
            vec![Algorithm::Browsing, Algorithm::Industry, Algorithm::Trending]
        );
        assert_eq!(metadata.reasons().len(), 3);

        let trend_only = results
            .iter()
            .find(|r| r.product_id == "trend-only")
            .expect("trending product present");
        assert!((trend_only.score - 0.05 * 0.20).abs() < 1e-9);
    }
}
