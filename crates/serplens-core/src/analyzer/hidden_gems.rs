//! Hidden gems: low-difficulty demand the domain barely touches, including
//! keywords it does not rank for at all.

use serde::{Deserialize, Serialize};

use crate::analyzer::report::opportunity_id;
use crate::config::Thresholds;
use crate::ctr;
use crate::model::RankedKeyword;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenGem {
    pub id: String,
    pub keyword: String,
    pub search_volume: u64,
    pub position: Option<u32>,
    /// Provider difficulty, or the position-derived estimate when the
    /// provider sent none.
    pub keyword_difficulty: f64,
    pub difficulty_estimated: bool,
    pub gem_type: GemType,
    /// Position the difficulty band suggests is realistically reachable.
    pub achievable_position: u32,
    pub potential_clicks: u64,
    pub url: Option<String>,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GemType {
    FirstMover,
    EasyWin,
    RisingTrend,
}

impl GemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GemType::FirstMover => "first-mover",
            GemType::EasyWin => "easy-win",
            GemType::RisingTrend => "rising-trend",
        }
    }
}

pub fn detect(keywords: &[RankedKeyword], thresholds: &Thresholds) -> Vec<HiddenGem> {
    let mut gems: Vec<HiddenGem> = keywords
        .iter()
        .filter(|kw| !kw.is_discarded)
        .filter(|kw| kw.search_volume >= thresholds.gem_min_volume)
        .filter_map(|kw| {
            let (difficulty, estimated) = match kw.keyword_difficulty {
                Some(kd) => (kd, false),
                // Absent difficulty is never treated as zero; estimate from
                // the current position and flag it.
                None => (estimate_difficulty(kw.position), true),
            };
            if difficulty > thresholds.gem_max_difficulty {
                return None;
            }

            let gem_type = classify_gem(kw, difficulty, thresholds.gem_easy_difficulty);
            let achievable_position = achievable_position(difficulty);
            let potential_clicks =
                ctr::visible_volume(kw.search_volume, Some(achievable_position));

            let suffix = if estimated { " est." } else { "" };
            let rationale = match kw.position {
                Some(pos) => format!(
                    "volume {}, difficulty {:.0}{}, position {} -> {} achievable",
                    kw.search_volume, difficulty, suffix, pos, achievable_position
                ),
                None => format!(
                    "volume {}, difficulty {:.0}{}, not ranking yet -> position {} reachable",
                    kw.search_volume, difficulty, suffix, achievable_position
                ),
            };

            Some(HiddenGem {
                id: opportunity_id("hidden_gem", &kw.keyword),
                keyword: kw.keyword.clone(),
                search_volume: kw.search_volume,
                position: kw.position,
                keyword_difficulty: difficulty,
                difficulty_estimated: estimated,
                gem_type,
                achievable_position,
                potential_clicks,
                url: kw.url.clone(),
                rationale,
            })
        })
        .collect();

    // Tail comparisons keep the order total when duplicate keyword rows
    // differ only in position or URL.
    gems.sort_by(|a, b| {
        b.potential_clicks
            .cmp(&a.potential_clicks)
            .then(b.search_volume.cmp(&a.search_volume))
            .then_with(|| a.keyword.cmp(&b.keyword))
            .then(a.position.cmp(&b.position))
            .then_with(|| a.url.cmp(&b.url))
    });
    gems
}

/// Ordered classification, first match wins.
fn classify_gem(kw: &RankedKeyword, difficulty: f64, easy_difficulty: f64) -> GemType {
    match kw.position {
        None => GemType::FirstMover,
        Some(pos) if pos > 20 && difficulty <= easy_difficulty => GemType::EasyWin,
        _ if kw.trend.is_some_and(|t| t > 0.0) => GemType::RisingTrend,
        _ => GemType::EasyWin,
    }
}

/// Fallback difficulty by current position. Ranking well implies the keyword
/// was winnable; no ranking at all stays deliberately conservative.
fn estimate_difficulty(position: Option<u32>) -> f64 {
    match position {
        None => 50.0,
        Some(1..=3) => 20.0,
        Some(4..=10) => 35.0,
        Some(11..=20) => 45.0,
        Some(21..=50) => 55.0,
        Some(_) => 65.0,
    }
}

/// Realistic landing position per difficulty band, deliberately never 1.
fn achievable_position(difficulty: f64) -> u32 {
    if difficulty <= 20.0 {
        3
    } else if difficulty <= 35.0 {
        5
    } else if difficulty <= 50.0 {
        8
    } else if difficulty <= 70.0 {
        12
    } else {
        15
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gem_row(keyword: &str, volume: u64, position: Option<u32>, kd: Option<f64>) -> RankedKeyword {
        let mut kw = RankedKeyword::new(keyword, volume, position);
        kw.keyword_difficulty = kd;
        kw
    }

    #[test]
    fn unranked_low_difficulty_is_first_mover() {
        let gems = detect(
            &[gem_row("ai shoe fitting", 800, None, Some(18.0))],
            &Thresholds::default(),
        );
        assert_eq!(gems.len(), 1);
        let gem = &gems[0];
        assert_eq!(gem.gem_type, GemType::FirstMover);
        assert!(!gem.difficulty_estimated);
        assert_eq!(gem.achievable_position, 3);
        // 800 * 0.09 at position 3.
        assert_eq!(gem.potential_clicks, 72);
        assert_eq!(
            gem.rationale,
            "volume 800, difficulty 18, not ranking yet -> position 3 reachable"
        );
    }

    #[test]
    fn deep_ranked_easy_keyword_is_easy_win() {
        let gems = detect(
            &[gem_row("trail socks", 400, Some(28), Some(18.0))],
            &Thresholds::default(),
        );
        assert_eq!(gems[0].gem_type, GemType::EasyWin);
    }

    #[test]
    fn rising_trend_needs_positive_trend() {
        let mut rising = gem_row("barefoot shoes", 900, Some(15), Some(30.0));
        rising.trend = Some(12.0);
        let mut falling = gem_row("toning shoes", 900, Some(15), Some(30.0));
        falling.trend = Some(-4.0);

        let gems = detect(&[rising, falling], &Thresholds::default());
        let by_kw = |kw: &str| gems.iter().find(|g| g.keyword == kw).unwrap().gem_type;
        assert_eq!(by_kw("barefoot shoes"), GemType::RisingTrend);
        assert_eq!(by_kw("toning shoes"), GemType::EasyWin);
    }

    #[test]
    fn first_mover_takes_precedence_over_trend() {
        let mut kw = gem_row("new niche", 500, None, Some(10.0));
        kw.trend = Some(30.0);
        let gems = detect(&[kw], &Thresholds::default());
        assert_eq!(gems[0].gem_type, GemType::FirstMover);
    }

    #[test]
    fn missing_difficulty_is_estimated_and_flagged() {
        let gems = detect(
            &[gem_row("easy ranked", 500, Some(2), None)],
            &Thresholds::default(),
        );
        let gem = &gems[0];
        assert!(gem.difficulty_estimated);
        assert_eq!(gem.keyword_difficulty, 20.0);
        assert!(gem.rationale.contains("est."));
    }

    #[test]
    fn unranked_without_difficulty_estimates_too_hard() {
        // Estimate for unranked is 50, above the default ceiling of 40.
        assert!(detect(
            &[gem_row("mystery keyword", 5000, None, None)],
            &Thresholds::default()
        )
        .is_empty());
    }

    #[test]
    fn difficulty_and_volume_filters_apply() {
        let keywords = vec![
            gem_row("too hard", 1000, Some(30), Some(75.0)),
            gem_row("too thin", 49, Some(30), Some(10.0)),
        ];
        assert!(detect(&keywords, &Thresholds::default()).is_empty());
    }

    #[test]
    fn achievable_position_bands() {
        assert_eq!(achievable_position(15.0), 3);
        assert_eq!(achievable_position(30.0), 5);
        assert_eq!(achievable_position(45.0), 8);
        assert_eq!(achievable_position(65.0), 12);
        assert_eq!(achievable_position(90.0), 15);
    }

    #[test]
    fn sorted_by_potential_then_volume_then_keyword() {
        let gems = detect(
            &[
                gem_row("bbb", 500, None, Some(20.0)),
                gem_row("aaa", 500, None, Some(20.0)),
                gem_row("ccc", 2000, None, Some(20.0)),
            ],
            &Thresholds::default(),
        );
        let order: Vec<&str> = gems.iter().map(|g| g.keyword.as_str()).collect();
        assert_eq!(order, vec!["ccc", "aaa", "bbb"]);
    }

    #[test]
    fn discarded_rows_never_surface() {
        let mut kw = gem_row("x", 1000, None, Some(10.0));
        kw.is_discarded = true;
        assert!(detect(&[kw], &Thresholds::default()).is_empty());
    }
}
