//! Quick wins: keywords ranking just off the money positions where a
//! realistic push to the target position buys a measurable click uplift.

use serde::{Deserialize, Serialize};

use crate::analyzer::report::{opportunity_id, Effort};
use crate::config::Thresholds;
use crate::ctr;
use crate::model::RankedKeyword;

/// Quick-win candidates sit in this position band: close enough to page one
/// for optimization to move the needle, far enough to leave headroom.
const MIN_POSITION: u32 = 4;
const MAX_POSITION: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickWinOpportunity {
    pub id: String,
    pub keyword: String,
    pub search_volume: u64,
    pub current_position: u32,
    pub target_position: u32,
    pub current_clicks: u64,
    pub potential_clicks: u64,
    pub click_uplift: u64,
    /// Relative gain in percent, 0 when current clicks are 0.
    pub uplift_percentage: u64,
    pub effort: Effort,
    pub url: Option<String>,
    pub rationale: String,
}

pub fn detect(keywords: &[RankedKeyword], thresholds: &Thresholds) -> Vec<QuickWinOpportunity> {
    let target = thresholds.quick_win_target_position;
    let mut wins: Vec<QuickWinOpportunity> = keywords
        .iter()
        .filter(|kw| !kw.is_discarded)
        .filter(|kw| kw.search_volume >= thresholds.quick_win_min_volume)
        .filter_map(|kw| {
            let position = kw.position?;
            if !(MIN_POSITION..=MAX_POSITION).contains(&position) {
                return None;
            }

            let current_clicks = ctr::visible_volume(kw.search_volume, Some(position));
            let potential_clicks = ctr::visible_volume(kw.search_volume, Some(target));
            let click_uplift = potential_clicks.saturating_sub(current_clicks);
            if click_uplift < thresholds.quick_win_min_uplift {
                return None;
            }

            let uplift_percentage = if current_clicks > 0 {
                (click_uplift as f64 / current_clicks as f64 * 100.0).round() as u64
            } else {
                0
            };

            Some(QuickWinOpportunity {
                id: opportunity_id("quick_win", &kw.keyword),
                keyword: kw.keyword.clone(),
                search_volume: kw.search_volume,
                current_position: position,
                target_position: target,
                current_clicks,
                potential_clicks,
                click_uplift,
                uplift_percentage,
                effort: Effort::from_position(position),
                url: kw.url.clone(),
                rationale: format!(
                    "volume {}, position {} -> {}, +{} clicks/mo",
                    kw.search_volume, position, target, click_uplift
                ),
            })
        })
        .collect();

    // Tail comparisons keep the order total when duplicate keyword rows
    // differ only in position or URL.
    wins.sort_by(|a, b| {
        b.click_uplift
            .cmp(&a.click_uplift)
            .then(b.search_volume.cmp(&a.search_volume))
            .then_with(|| a.keyword.cmp(&b.keyword))
            .then(a.current_position.cmp(&b.current_position))
            .then_with(|| a.url.cmp(&b.url))
    });
    wins
}
