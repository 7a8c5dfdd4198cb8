use serde::{Deserialize, Serialize};

use crate::analyzer::action_plan::ActionItem;
use crate::analyzer::aggregates::{CategorySov, FunnelStageAnalysis};
use crate::analyzer::cannibalization::CannibalizationIssue;
use crate::analyzer::content_gaps::ContentGap;
use crate::analyzer::hidden_gems::HiddenGem;
use crate::analyzer::quick_wins::QuickWinOpportunity;
use crate::metrics::{GrowthGap, ShareOfSearch, ShareOfVoice};

/// Priority score at or above which an action counts as high priority.
pub const HIGH_PRIORITY: f64 = 70.0;

/// Estimated optimization effort for an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    /// Effort to move a ranking keyword to the target: the further from it,
    /// the harder the climb.
    pub fn from_position(position: u32) -> Self {
        match position {
            0..=7 => Effort::Low,
            8..=12 => Effort::Medium,
            _ => Effort::High,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Effort::Low => "LOW",
            Effort::Medium => "MEDIUM",
            Effort::High => "HIGH",
        }
    }
}

/// Deterministic identity for a derived entity, stable across runs so a UI
/// can track per-item state without engine involvement.
pub fn opportunity_id(kind: &str, key: &str) -> String {
    format!("{kind}:{}", key.to_lowercase())
}

/// The complete analysis of one keyword snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: SnapshotSummary,
    pub share_of_search: ShareOfSearch,
    pub share_of_voice: ShareOfVoice,
    pub growth_gap: GrowthGap,
    pub quick_wins: Vec<QuickWinOpportunity>,
    pub hidden_gems: Vec<HiddenGem>,
    pub cannibalization: Vec<CannibalizationIssue>,
    pub content_gaps: Vec<ContentGap>,
    pub categories: Vec<CategorySov>,
    pub funnel: Vec<FunnelStageAnalysis>,
    pub actions: Vec<ActionItem>,
}

/// Input-side counts and display context carried along with the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub brand_keyword_count: usize,
    pub ranked_keyword_count: usize,
    pub discarded_brand_count: usize,
    pub discarded_ranked_count: usize,
    pub location: Option<String>,
    pub language: Option<String>,
}

impl AnalysisReport {
    pub fn opportunity_count(&self) -> usize {
        self.quick_wins.len()
            + self.hidden_gems.len()
            + self.cannibalization.len()
            + self.content_gaps.len()
    }

    pub fn high_priority_action_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.priority >= HIGH_PRIORITY)
            .count()
    }

    /// Clicks per month at stake across the deduplicated action plan.
    pub fn total_estimated_uplift(&self) -> u64 {
        self.actions.iter().map(|a| a.estimated_uplift).sum()
    }
}

/// Format a search volume for terminal display.
pub fn format_volume(volume: u64) -> String {
    if volume >= 1_000_000 {
        trim_decimal(volume as f64 / 1_000_000.0, "M")
    } else if volume >= 1_000 {
        trim_decimal(volume as f64 / 1_000.0, "K")
    } else {
        volume.to_string()
    }
}

fn trim_decimal(value: f64, suffix: &str) -> String {
    let rendered = format!("{value:.1}");
    let rendered = rendered.strip_suffix(".0").unwrap_or(&rendered);
    format!("{rendered}{suffix}")
}
