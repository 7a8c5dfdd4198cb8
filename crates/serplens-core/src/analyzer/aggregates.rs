//! Category and funnel-stage rollups of the ranked keyword set.
//!
//! Stage and category SOV reuse the same CTR model as the headline metric,
//! just scoped to the rows inside the bucket.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analyzer::report::opportunity_id;
use crate::classify::CategoryRules;
use crate::ctr;
use crate::metrics::round1;
use crate::model::{FunnelStage, RankedKeyword};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySov {
    pub id: String,
    pub category: String,
    pub keyword_count: usize,
    pub total_volume: u64,
    pub visible_volume: u64,
    pub sov_pct: f64,
    pub has_data: bool,
    /// Mean position of the ranked rows, absent when none rank.
    pub average_position: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStageAnalysis {
    pub id: String,
    pub stage: FunnelStage,
    pub keyword_count: usize,
    pub total_volume: u64,
    pub visible_volume: u64,
    pub sov_pct: f64,
    pub has_data: bool,
    pub average_position: Option<f64>,
}

#[derive(Default)]
struct Bucket {
    keyword_count: usize,
    total_volume: u64,
    visible_volume: u64,
    position_sum: u64,
    ranked_count: usize,
}

impl Bucket {
    fn add(&mut self, kw: &RankedKeyword) {
        self.keyword_count += 1;
        self.total_volume += kw.search_volume;
        self.visible_volume += ctr::visible_volume(kw.search_volume, kw.position);
        if let Some(pos) = kw.position {
            self.position_sum += u64::from(pos);
            self.ranked_count += 1;
        }
    }

    fn sov_pct(&self) -> f64 {
        if self.total_volume > 0 {
            round1(self.visible_volume as f64 / self.total_volume as f64 * 100.0)
        } else {
            0.0
        }
    }

    fn average_position(&self) -> Option<f64> {
        if self.ranked_count > 0 {
            Some(round1(self.position_sum as f64 / self.ranked_count as f64))
        } else {
            None
        }
    }
}

/// Per-category SOV, largest demand first.
pub fn categories(keywords: &[RankedKeyword], rules: &CategoryRules) -> Vec<CategorySov> {
    let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();
    for kw in keywords.iter().filter(|k| !k.is_discarded) {
        buckets
            .entry(rules.classify_row(kw).to_string())
            .or_default()
            .add(kw);
    }

    let mut rollup: Vec<CategorySov> = buckets
        .into_iter()
        .map(|(category, bucket)| CategorySov {
            id: opportunity_id("category_sov", &category),
            sov_pct: bucket.sov_pct(),
            has_data: bucket.total_volume > 0,
            average_position: bucket.average_position(),
            keyword_count: bucket.keyword_count,
            total_volume: bucket.total_volume,
            visible_volume: bucket.visible_volume,
            category,
        })
        .collect();

    rollup.sort_by(|a, b| {
        b.total_volume
            .cmp(&a.total_volume)
            .then_with(|| a.category.cmp(&b.category))
    });
    rollup
}

/// Funnel rollup in fixed stage order. Every stage is present even when
/// empty so renderers always see the full funnel.
pub fn funnel(keywords: &[RankedKeyword]) -> Vec<FunnelStageAnalysis> {
    let mut buckets: BTreeMap<FunnelStage, Bucket> = FunnelStage::ALL
        .iter()
        .map(|stage| (*stage, Bucket::default()))
        .collect();
    for kw in keywords.iter().filter(|k| !k.is_discarded) {
        if let Some(bucket) = buckets.get_mut(&kw.funnel_stage()) {
            bucket.add(kw);
        }
    }

    FunnelStage::ALL
        .iter()
        .map(|stage| {
            let bucket = &buckets[stage];
            FunnelStageAnalysis {
                id: opportunity_id("funnel", stage.label()),
                stage: *stage,
                keyword_count: bucket.keyword_count,
                total_volume: bucket.total_volume,
                visible_volume: bucket.visible_volume,
                sov_pct: bucket.sov_pct(),
                has_data: bucket.total_volume > 0,
                average_position: bucket.average_position(),
            }
        })
        .collect()
}
