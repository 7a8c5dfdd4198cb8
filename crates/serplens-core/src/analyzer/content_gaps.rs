//! Content gaps: categories where competitors cover the topic with more
//! pages than the analyzed domain ranks with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analyzer::report::opportunity_id;
use crate::classify::CategoryRules;
use crate::config::Thresholds;
use crate::metrics::round1;
use crate::model::RankedKeyword;

/// Coverage-gap percentage bands. Fixed properties of the priority scale.
const WIDE_GAP_PCT: f64 = 40.0;
const NARROW_GAP_PCT: f64 = 15.0;

/// Keywords listed per gap for reference.
const TOP_KEYWORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentGap {
    pub id: String,
    pub category: String,
    pub keyword_count: usize,
    pub total_volume: u64,
    /// Distinct URLs the domain ranks with in this category.
    pub your_coverage: usize,
    /// Competitor page baseline, supplied or estimated.
    pub competitor_coverage: f64,
    pub coverage_gap_pct: f64,
    /// True when the baseline was estimated from keyword count rather than
    /// supplied by the caller.
    pub estimated_baseline: bool,
    pub priority: GapPriority,
    /// Highest-volume keywords in the category, for orientation.
    pub top_keywords: Vec<String>,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPriority {
    High,
    Medium,
    Low,
}

impl GapPriority {
    /// Lower sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            GapPriority::High => 0,
            GapPriority::Medium => 1,
            GapPriority::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GapPriority::High => "high",
            GapPriority::Medium => "medium",
            GapPriority::Low => "low",
        }
    }
}

struct CategoryAgg<'a> {
    keyword_count: usize,
    total_volume: u64,
    urls: std::collections::BTreeSet<&'a str>,
    keywords: Vec<(&'a str, u64)>,
}

pub fn detect(
    keywords: &[RankedKeyword],
    rules: &CategoryRules,
    avg_competitor_coverage: Option<f64>,
    thresholds: &Thresholds,
) -> Vec<ContentGap> {
    let mut by_category: BTreeMap<String, CategoryAgg> = BTreeMap::new();
    for kw in keywords.iter().filter(|k| !k.is_discarded) {
        let category = rules.classify_row(kw).to_string();
        let agg = by_category.entry(category).or_insert_with(|| CategoryAgg {
            keyword_count: 0,
            total_volume: 0,
            urls: Default::default(),
            keywords: Vec::new(),
        });
        agg.keyword_count += 1;
        agg.total_volume += kw.search_volume;
        agg.keywords.push((kw.keyword.as_str(), kw.search_volume));
        if kw.position.is_some() {
            if let Some(url) = kw.url.as_deref().filter(|u| !u.is_empty()) {
                agg.urls.insert(url);
            }
        }
    }

    let mut gaps: Vec<ContentGap> = by_category
        .into_iter()
        .filter_map(|(category, agg)| {
            let your_coverage = agg.urls.len();
            let (baseline, estimated) = match avg_competitor_coverage {
                Some(coverage) => (coverage, false),
                None => (
                    agg.keyword_count as f64 / thresholds.keywords_per_page as f64,
                    true,
                ),
            };
            if baseline <= 0.0 {
                return None;
            }
            let gap_pct = round1((baseline - your_coverage as f64) / baseline * 100.0);
            if gap_pct <= 0.0 {
                return None;
            }

            let priority = if agg.total_volume >= thresholds.gap_high_volume
                && gap_pct >= WIDE_GAP_PCT
            {
                GapPriority::High
            } else if gap_pct < NARROW_GAP_PCT {
                GapPriority::Low
            } else {
                GapPriority::Medium
            };

            let mut ranked_keywords = agg.keywords;
            ranked_keywords.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            let top_keywords: Vec<String> = ranked_keywords
                .iter()
                .take(TOP_KEYWORDS)
                .map(|(kw, _)| (*kw).to_string())
                .collect();

            let rationale = format!(
                "{} keywords ({} searches/mo), {} pages vs ~{:.1} competitor pages, {:.0}% coverage gap",
                agg.keyword_count, agg.total_volume, your_coverage, baseline, gap_pct
            );

            Some(ContentGap {
                id: opportunity_id("content_gap", &category),
                category,
                keyword_count: agg.keyword_count,
                total_volume: agg.total_volume,
                your_coverage,
                competitor_coverage: round1(baseline),
                coverage_gap_pct: gap_pct,
                estimated_baseline: estimated,
                priority,
                top_keywords,
                rationale,
            })
        })
        .collect();

    gaps.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then(b.total_volume.cmp(&a.total_volume))
            .then_with(|| a.category.cmp(&b.category))
    });
    gaps
}
