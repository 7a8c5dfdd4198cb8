//! Cannibalization: several of the domain's URLs ranking for the same
//! keyword and splitting clicks that one page could capture alone.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::analyzer::report::opportunity_id;
use crate::ctr;
use crate::model::RankedKeyword;

/// Position spread at or below which competing URLs may legitimately serve
/// different sub-intents.
const NARROW_SPREAD: u32 = 3;
/// Minimum share of group clicks for every URL before a narrow spread reads
/// as deliberate differentiation.
const MEANINGFUL_SHARE: f64 = 0.25;
/// Share of group clicks at which the best URL clearly dominates.
const DOMINANT_SHARE: f64 = 0.60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CannibalizationIssue {
    pub id: String,
    pub keyword: String,
    pub search_volume: u64,
    /// Competing URLs, best position first.
    pub urls: Vec<CompetingUrl>,
    /// Clicks per month captured by everything except the best URL; the
    /// volume recoverable by full consolidation.
    pub impact_score: u64,
    pub recommendation: Recommendation,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetingUrl {
    pub url: String,
    pub position: u32,
    pub visible_volume: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Consolidate,
    Redirect,
    Differentiate,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Consolidate => "consolidate",
            Recommendation::Redirect => "redirect",
            Recommendation::Differentiate => "differentiate",
        }
    }
}

pub fn detect(keywords: &[RankedKeyword]) -> Vec<CannibalizationIssue> {
    // Group by exact keyword text; only rows that actually rank somewhere
    // with a known URL can cannibalize.
    let mut groups: HashMap<&str, Vec<&RankedKeyword>> = HashMap::new();
    for kw in keywords.iter().filter(|k| !k.is_discarded) {
        if kw.position.is_some() && kw.url.as_deref().is_some_and(|u| !u.is_empty()) {
            groups.entry(kw.keyword.as_str()).or_default().push(kw);
        }
    }

    let mut issues: Vec<CannibalizationIssue> = groups
        .into_iter()
        .filter_map(|(keyword, rows)| build_issue(keyword, &rows))
        .collect();

    issues.sort_by(|a, b| {
        b.impact_score
            .cmp(&a.impact_score)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    issues
}

fn build_issue(keyword: &str, rows: &[&RankedKeyword]) -> Option<CannibalizationIssue> {
    // One entry per distinct URL, keeping its best position.
    let mut by_url: BTreeMap<&str, CompetingUrl> = BTreeMap::new();
    for row in rows {
        let url = row.url.as_deref()?;
        let position = row.position?;
        let candidate = CompetingUrl {
            url: url.to_string(),
            position,
            visible_volume: ctr::visible_volume(row.search_volume, Some(position)),
        };
        // Better position wins; on a position tie the larger estimate wins,
        // so duplicate provider rows resolve the same way in any order.
        match by_url.get(url) {
            Some(existing)
                if existing.position < position
                    || (existing.position == position
                        && existing.visible_volume >= candidate.visible_volume) => {}
            _ => {
                by_url.insert(url, candidate);
            }
        }
    }
    if by_url.len() < 2 {
        return None;
    }

    let mut urls: Vec<CompetingUrl> = by_url.into_values().collect();
    urls.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.url.cmp(&b.url)));

    let best_position = urls[0].position;
    let worst_position = urls[urls.len() - 1].position;
    let spread = worst_position - best_position;
    let group_visible: u64 = urls.iter().map(|u| u.visible_volume).sum();
    let impact_score = group_visible - urls[0].visible_volume;

    let recommendation = recommend(&urls, spread, group_visible);
    let search_volume = rows.iter().map(|r| r.search_volume).max().unwrap_or(0);

    Some(CannibalizationIssue {
        id: opportunity_id("cannibalization", keyword),
        keyword: keyword.to_string(),
        search_volume,
        impact_score,
        recommendation,
        rationale: format!(
            "{} URLs compete at positions {}-{}, {} clicks/mo split off the best page",
            urls.len(),
            best_position,
            worst_position,
            impact_score
        ),
        urls,
    })
}

/// Ordered recommendation rules, first match wins.
fn recommend(urls: &[CompetingUrl], spread: u32, group_visible: u64) -> Recommendation {
    if group_visible > 0 {
        let share = |u: &CompetingUrl| u.visible_volume as f64 / group_visible as f64;
        if spread <= NARROW_SPREAD && urls.iter().all(|u| share(u) >= MEANINGFUL_SHARE) {
            return Recommendation::Differentiate;
        }
        if spread > NARROW_SPREAD && share(&urls[0]) >= DOMINANT_SHARE {
            return Recommendation::Redirect;
        }
    }
    Recommendation::Consolidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(keyword: &str, volume: u64, position: u32, url: &str) -> RankedKeyword {
        let mut kw = RankedKeyword::new(keyword, volume, Some(position));
        kw.url = Some(url.to_string());
        kw
    }

    #[test]
    fn two_urls_with_wide_spread_and_dominant_top() {
        let keywords = vec![
            row("running shoes", 1000, 4, "https://example.com/a"),
            row("running shoes", 1000, 9, "https://example.com/b"),
        ];
        let issues = detect(&keywords);
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        // Impact is exactly the non-top URL's clicks: 1000 * 0.018.
        assert_eq!(issue.impact_score, 18);
        assert_eq!(issue.recommendation, Recommendation::Redirect);
        assert_eq!(issue.urls.len(), 2);
        assert_eq!(issue.urls[0].position, 4);
        assert_eq!(issue.id, "cannibalization:running shoes");
    }

    #[test]
    fn narrow_spread_with_comparable_urls_differentiates() {
        let keywords = vec![
            row("trail shoes", 1000, 4, "https://example.com/a"),
            row("trail shoes", 1000, 6, "https://example.com/b"),
        ];
        let issues = detect(&keywords);
        // Shares are 60/90 and 30/90, both above the 25% floor.
        assert_eq!(issues[0].recommendation, Recommendation::Differentiate);
        assert_eq!(issues[0].impact_score, 30);
    }

    #[test]
    fn spread_without_dominance_consolidates() {
        let keywords = vec![
            row("hiking boots", 1000, 5, "https://example.com/a"),
            row("hiking boots", 1000, 8, "https://example.com/b"),
            row("hiking boots", 1000, 12, "https://example.com/c"),
        ];
        let issues = detect(&keywords);
        // Best URL holds 40/70 < 60% of group clicks.
        assert_eq!(issues[0].recommendation, Recommendation::Consolidate);
        assert_eq!(issues[0].impact_score, 30);
    }

    #[test]
    fn single_url_never_an_issue() {
        let keywords = vec![
            row("solo", 1000, 4, "https://example.com/a"),
            row("solo", 1000, 9, "https://example.com/a"),
        ];
        assert!(detect(&keywords).is_empty());
    }

    #[test]
    fn duplicate_url_rows_keep_best_position() {
        let keywords = vec![
            row("dup", 1000, 9, "https://example.com/a"),
            row("dup", 1000, 4, "https://example.com/a"),
            row("dup", 1000, 6, "https://example.com/b"),
        ];
        let issues = detect(&keywords);
        assert_eq!(issues[0].urls.len(), 2);
        assert_eq!(issues[0].urls[0].position, 4);
        assert_eq!(issues[0].urls[0].url, "https://example.com/a");
    }

    #[test]
    fn rows_without_url_or_position_are_ignored() {
        let mut no_url = RankedKeyword::new("x", 1000, Some(4));
        no_url.url = None;
        let mut unranked = row("x", 1000, 5, "https://example.com/b");
        unranked.position = None;
        let ranked = row("x", 1000, 6, "https://example.com/c");
        assert!(detect(&[no_url, unranked, ranked]).is_empty());
    }

    #[test]
    fn issues_sorted_by_impact_then_keyword() {
        let keywords = vec![
            row("beta", 1000, 4, "https://example.com/a"),
            row("beta", 1000, 9, "https://example.com/b"),
            row("alpha", 10_000, 4, "https://example.com/c"),
            row("alpha", 10_000, 9, "https://example.com/d"),
            row("zulu", 1000, 4, "https://example.com/e"),
            row("zulu", 1000, 9, "https://example.com/f"),
        ];
        let issues = detect(&keywords);
        let order: Vec<&str> = issues.iter().map(|i| i.keyword.as_str()).collect();
        assert_eq!(order, vec!["alpha", "beta", "zulu"]);
    }

    #[test]
    fn discarded_rows_never_group() {
        let mut hidden = row("x", 1000, 4, "https://example.com/a");
        hidden.is_discarded = true;
        let visible = row("x", 1000, 9, "https://example.com/b");
        assert!(detect(&[hidden, visible]).is_empty());
    }
}
