use std::collections::HashMap;

use super::{Algorithm, OrganizationDirectory, RecommendationResult, ScoringContext};

const SATURATION_VIEWS: f64 = 10.0;

/// Popularity among other organizations of the caller's type.
pub(super) fn score(ctx: &ScoringContext<'_>) -> Vec<RecommendationResult> {
    let Some(org_type) = ctx.dataset.org_type(&ctx.request.org_id) else {
        return Vec::new();
    };
    let since = ctx.days_ago(ctx.config.industry_window_days);

    let mut peer_views: HashMap<&str, u32> = HashMap::new();
    for view in &ctx.dataset.views {
        if view.viewed_at < since || view.org_id == ctx.request.org_id {
            continue;
        }
        if ctx.dataset.org_type(&view.org_id) != Some(org_type) {
            continue;
        }
        *peer_views.entry(view.product_id.as_str()).or_default() += 1;
    }

    ctx.eligible
        .iter()
        .filter_map(|candidate| {
            let count = *peer_views.get(candidate.id.as_str())?;
            Some(RecommendationResult::new(
                &candidate.id,
                (count as f64 / SATURATION_VIEWS).min(1.0),
                format!("Viewed {count} times by peers in your industry"),
                Algorithm::Industry,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::recommendation::{RecommendationConfig, RecommendationRequest};

    #[test]
    fn counts_only_recent_peer_views_of_same_type() {
        let mut data = dataset(vec![
            product("popular", "sup-a", "arm", 100.0),
            product("niche", "sup-b", "arm", 100.0),
        ]);
        data.views = vec![
            view("peer", "buyer-2", "popular", 5),
            view("peer", "buyer-2", "popular", 10),
            view("peer", "buyer-2", "popular", 59),
            // outside the window
            view("peer", "buyer-2", "popular", 61),
            // own org
            view("me", "buyer-1", "popular", 1),
            // different industry
            view("other", "buyer-3", "niche", 1),
        ];
        let request = request(Algorithm::Industry);
        let config = RecommendationConfig::default();
        let ctx = ScoringContext::new(&data, &request, &config, now());

        let results = score(&ctx);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product_id, "popular");
        assert!((results[0].score - 0.3).abs() < 1e-9);
        assert!(results[0].reason.contains('3'));
    }

    #[test]
    fn score_saturates_at_one() {
        let mut data = dataset(vec![product("hit", "sup-a", "arm", 100.0)]);
        data.views = (0..25).map(|_| view("peer", "buyer-2", "hit", 1)).collect();
        let request = request(Algorithm::Industry);
        let config = RecommendationConfig::default();
        let ctx = ScoringContext::new(&data, &request, &config, now());

        assert_eq!(score(&ctx)[0].score, 1.0);
    }

    #[test]
    fn unknown_org_type_yields_nothing() {
        let mut data = dataset(vec![product("hit", "sup-a", "arm", 100.0)]);
        data.views = vec![view("peer", "buyer-2", "hit", 1)];
        let request = RecommendationRequest::new("user-1", "no-such-org");
        let config = RecommendationConfig::default();
        let ctx = ScoringContext::new(&data, &request, &config, now());

        assert!(score(&ctx).is_empty());
    }
}
