use std::collections::{HashMap, HashSet};

use super::{Algorithm, RecommendationResult, ScoringContext};

const SATURATION_INTERACTIONS: f64 = 5.0;

/// Collaborative signal: what other users who touched the same products
/// went on to interact with. Every interaction kind counts once.
pub(super) fn score(ctx: &ScoringContext<'_>) -> Vec<RecommendationResult> {
    let since = ctx.days_ago(ctx.config.similar_buyer_window_days);
    let target = ctx.request.user_id.as_str();

    let in_window: Vec<_> = ctx
        .dataset
        .interactions
        .iter()
        .filter(|i| i.occurred_at >= since)
        .collect();

    let own_products: HashSet<&str> = in_window
        .iter()
        .filter(|i| i.user_id == target)
        .map(|i| i.product_id.as_str())
        .collect();
    if own_products.is_empty() {
        return Vec::new();
    }

    let similar_users: HashSet<&str> = in_window
        .iter()
        .filter(|i| i.user_id != target && own_products.contains(i.product_id.as_str()))
        .map(|i| i.user_id.as_str())
        .collect();

    let mut co_interactions: HashMap<&str, u32> = HashMap::new();
    for interaction in &in_window {
        if similar_users.contains(interaction.user_id.as_str())
            && !own_products.contains(interaction.product_id.as_str())
        {
            *co_interactions
                .entry(interaction.product_id.as_str())
                .or_default() += 1;
        }
    }

    ctx.eligible
        .iter()
        .filter_map(|candidate| {
            let count = *co_interactions.get(candidate.id.as_str())?;
            Some(RecommendationResult::new(
                &candidate.id,
                (count as f64 / SATURATION_INTERACTIONS).min(1.0),
                format!("Buyers with similar interests interacted with this {count} times"),
                Algorithm::SimilarBuyers,
            ))
        })
        .collect()
}
