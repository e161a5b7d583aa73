use std::collections::HashSet;

use super::{Algorithm, OrganizationDirectory, RecommendationResult, ScoringContext};

const BASE_SCORE: f64 = 0.5;
const SAME_SUPPLIER_BONUS: f64 = 0.3;
const PRICE_SIMILARITY_WEIGHT: f64 = 0.2;

/// Same-category products as the user's recent views, boosted for familiar
/// suppliers and similar price points. Already-viewed products are skipped.
pub(super) fn score(ctx: &ScoringContext<'_>) -> Vec<RecommendationResult> {
    let mut recent: Vec<_> = ctx
        .dataset
        .views
        .iter()
        .filter(|v| v.user_id == ctx.request.user_id)
        .collect();
    if recent.is_empty() {
        return Vec::new();
    }
    recent.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
    recent.truncate(ctx.config.recent_view_limit);

    let mut viewed_ids: HashSet<&str> = HashSet::new();
    let viewed_products: Vec<_> = recent
        .iter()
        .filter(|v| viewed_ids.insert(v.product_id.as_str()))
        .filter_map(|v| ctx.dataset.product(&v.product_id))
        .collect();

    let categories: HashSet<&str> = viewed_products
        .iter()
        .map(|p| p.category.as_str())
        .collect();
    let suppliers: HashSet<&str> = viewed_products.iter().map(|p| p.org_id.as_str()).collect();
    let average_midpoint = if viewed_products.is_empty() {
        None
    } else {
        let total: f64 = viewed_products.iter().map(|p| p.price_midpoint()).sum();
        Some(total / viewed_products.len() as f64)
    };

    ctx.eligible
        .iter()
        .filter(|c| !viewed_ids.contains(c.id.as_str()))
        .filter(|c| categories.contains(c.category.as_str()))
        .map(|candidate| {
            let mut score = BASE_SCORE;
            let same_supplier = suppliers.contains(candidate.org_id.as_str());
            if same_supplier {
                score += SAME_SUPPLIER_BONUS;
            }
            if let Some(average) = average_midpoint {
                score += PRICE_SIMILARITY_WEIGHT
                    * price_similarity(candidate.price_midpoint(), average);
            }

            let reason = if same_supplier {
                let supplier = ctx
                    .dataset
                    .org_name(&candidate.org_id)
                    .unwrap_or(&candidate.org_id);
                format!("From {supplier}, a supplier you viewed recently")
            } else {
                "Similar to products you recently viewed".to_string()
            };

            RecommendationResult::new(&candidate.id, score, reason, Algorithm::Browsing)
        })
        .collect()
}

/// min/max ratio of two prices; 0 when either is not positive.
pub(super) fn price_similarity(a: f64, b: f64) -> f64 {
    if a <= 0.0 || b <= 0.0 {
        return 0.0;
    }
    a.min(b) / a.max(b)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::recommendation::{Organization, RecommendationConfig};

    #[test]
    fn price_similarity_is_symmetric_ratio() {
        assert_eq!(price_similarity(50.0, 100.0), 0.5);
        assert_eq!(price_similarity(100.0, 50.0), 0.5);
        assert_eq!(price_similarity(0.0, 50.0), 0.0);
    }

    #[test]
    fn scores_same_category_with_supplier_and_price_bonus() {
        let mut data = dataset(vec![
            product("seen", "sup-a", "arm", 100.0),
            product("same-supplier", "sup-a", "arm", 100.0),
            product("other-supplier", "sup-b", "arm", 50.0),
            product("other-category", "sup-a", "agv", 100.0),
        ]);
        data.views = vec![view("user-1", "buyer-1", "seen", 1)];
        let request = request(Algorithm::Browsing);
        let config = RecommendationConfig::default();
        let ctx = ScoringContext::new(&data, &request, &config, now());

        let results = score(&ctx);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].product_id, "same-supplier");
        assert!((results[0].score - 1.0).abs() < 1e-9);
        assert!(results[0].reason.contains("Acme Robotics"));
        assert_eq!(results[1].product_id, "other-supplier");
        assert!((results[1].score - 0.6).abs() < 1e-9);
        assert_eq!(results[1].reason, "Similar to products you recently viewed");
    }

    #[test]
    fn supplier_reason_falls_back_to_org_id_without_a_name() {
        let mut data = dataset(vec![
            product("seen", "sup-n", "arm", 100.0),
            product("sibling", "sup-n", "arm", 100.0),
        ]);
        data.organizations.insert(
            "sup-n".to_string(),
            Organization {
                verified: true,
                ..Organization::default()
            },
        );
        data.views = vec![view("user-1", "buyer-1", "seen", 1)];

        let request = request(Algorithm::Browsing);
        let config = RecommendationConfig::default();
        let ctx = ScoringContext::new(&data, &request, &config, now());
        let results = score(&ctx);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product_id, "sibling");
        assert_eq!(results[0].reason, "From sup-n, a supplier you viewed recently");
    }

    #[test]
    fn no_history_means_no_results() {
        let data = dataset(vec![product("p", "sup-a", "arm", 100.0)]);
        let request = request(Algorithm::Browsing);
        let config = RecommendationConfig::default();
        let ctx = ScoringContext::new(&data, &request, &config, now());

        assert!(score(&ctx).is_empty());
    }

    #[test]
    fn only_the_most_recent_views_count() {
        let mut data = dataset(vec![
            product("old", "sup-a", "agv", 100.0),
            product("new", "sup-b", "arm", 100.0),
            product("agv-2", "sup-b", "agv", 100.0),
            product("arm-2", "sup-b", "arm", 100.0),
        ]);
        data.views = vec![
            view("user-1", "buyer-1", "old", 30),
            view("user-1", "buyer-1", "new", 1),
        ];
        let request = request(Algorithm::Browsing);
        let config = RecommendationConfig {
            recent_view_limit: 1,
            ..RecommendationConfig::default()
        };
        let ctx = ScoringContext::new(&data, &request, &config, now());

        let ids: Vec<_> = score(&ctx).into_iter().map(|r| r.product_id).collect();
        assert_eq!(ids, vec!["arm-2".to_string()]);
    }
}
