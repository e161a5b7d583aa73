use std::collections::HashMap;

use super::{Algorithm, RecommendationResult, ScoringContext};

/// Views in the latest window used as growth when the prior window is empty.
const BASELINE_VIEWS: f64 = 10.0;
const GROWTH_SATURATION: f64 = 2.0;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(super) struct WindowCounts {
    pub recent: u32,
    pub previous: u32,
}

impl WindowCounts {
    /// Relative growth between the windows, or `recent / 10` without history.
    pub fn growth_ratio(&self) -> f64 {
        if self.previous > 0 {
            (self.recent as f64 - self.previous as f64) / self.previous as f64
        } else {
            self.recent as f64 / BASELINE_VIEWS
        }
    }
}

/// Short-term view velocity. Products without positive growth are dropped.
pub(super) fn score(ctx: &ScoringContext<'_>) -> Vec<RecommendationResult> {
    let window = ctx.config.trending_window_days;
    let recent_start = ctx.days_ago(window);
    let previous_start = ctx.days_ago(window * 2);

    let mut counts: HashMap<&str, WindowCounts> = HashMap::new();
    for view in &ctx.dataset.views {
        if view.viewed_at > ctx.now || view.viewed_at < previous_start {
            continue;
        }
        let entry = counts.entry(view.product_id.as_str()).or_default();
        if view.viewed_at >= recent_start {
            entry.recent += 1;
        } else {
            entry.previous += 1;
        }
    }

    ctx.eligible
        .iter()
        .filter_map(|candidate| {
            let growth = counts.get(candidate.id.as_str())?.growth_ratio();
            if growth <= 0.0 {
                return None;
            }

            Some(RecommendationResult::new(
                &candidate.id,
                (growth / GROWTH_SATURATION).min(1.0),
                format!("Trending: views up {:.0}% this week", growth * 100.0),
                Algorithm::Trending,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::recommendation::RecommendationConfig;

    #[test]
    fn growth_ratio_uses_baseline_without_history() {
        let fresh = WindowCounts {
            recent: 5,
            previous: 0,
        };
        assert_eq!(fresh.growth_ratio(), 0.5);

        let doubled = WindowCounts {
            recent: 4,
            previous: 2,
        };
        assert_eq!(doubled.growth_ratio(), 1.0);
    }

    #[test]
    fn excludes_flat_and_declining_products() {
        let mut data = dataset(vec![
            product("rising", "sup-a", "arm", 100.0),
            product("flat", "sup-a", "arm", 100.0),
            product("falling", "sup-b", "arm", 100.0),
        ]);
        data.views = vec![
            view("u", "buyer-3", "rising", 1),
            view("u", "buyer-3", "rising", 2),
            view("u", "buyer-3", "rising", 3),
            view("u", "buyer-3", "rising", 9),
            view("u", "buyer-3", "flat", 1),
            view("u", "buyer-3", "flat", 8),
            view("u", "buyer-3", "falling", 10),
            view("u", "buyer-3", "falling", 11),
            view("u", "buyer-3", "falling", 2),
            // older than both windows
            view("u", "buyer-3", "falling", 20),
        ];
        let request = request(Algorithm::Trending);
        let config = RecommendationConfig::default();
        let ctx = ScoringContext::new(&data, &request, &config, now());

        let results = score(&ctx);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product_id, "rising");
        // (3 - 1) / 1 = 2.0, saturated
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[0].reason, "Trending: views up 200% this week");
    }
}
