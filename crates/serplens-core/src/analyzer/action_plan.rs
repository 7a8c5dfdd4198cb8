//! Action list synthesis: one ranked, de-duplicated to-do list built from
//! every detector's findings, scored on a shared 0-100 priority scale.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analyzer::cannibalization::{CannibalizationIssue, Recommendation};
use crate::analyzer::content_gaps::ContentGap;
use crate::analyzer::hidden_gems::HiddenGem;
use crate::analyzer::quick_wins::QuickWinOpportunity;
use crate::analyzer::report::{opportunity_id, Effort};
use crate::ctr;
use crate::metrics::round1;
use crate::model::{FunnelStage, RankedKeyword};

/// Priority formula weights. They sum to 1 so the result stays on the same
/// 0-100 scale as the sub-scores.
const W_IMPACT: f64 = 0.35;
const W_EFFORT: f64 = 0.25;
const W_STRATEGIC_FIT: f64 = 0.20;
const W_TIME_TO_RESULT: f64 = 0.20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub id: String,
    /// Keyword, or category label for content gaps.
    pub keyword: String,
    pub action_type: ActionType,
    pub source: ActionSource,
    pub title: String,
    /// Weighted composite, one decimal, higher is more urgent.
    pub priority: f64,
    pub impact: f64,
    pub effort: f64,
    pub strategic_fit: f64,
    pub time_to_result: f64,
    /// Clicks per month at stake, the impact numerator and sort tiebreak.
    pub estimated_uplift: u64,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Optimize,
    Create,
    Monitor,
    Investigate,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Optimize => "optimize",
            ActionType::Create => "create",
            ActionType::Monitor => "monitor",
            ActionType::Investigate => "investigate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    QuickWin,
    ContentGap,
    Cannibalization,
    HiddenGem,
}

impl ActionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionSource::QuickWin => "quick win",
            ActionSource::ContentGap => "content gap",
            ActionSource::Cannibalization => "cannibalization",
            ActionSource::HiddenGem => "hidden gem",
        }
    }
}

/// Pre-scored candidate, priority filled in once the batch max uplift is
/// known.
struct Candidate {
    keyword: String,
    action_type: ActionType,
    source: ActionSource,
    title: String,
    effort: f64,
    strategic_fit: f64,
    time_to_result: f64,
    estimated_uplift: u64,
    rationale: String,
}

pub fn synthesize(
    keywords: &[RankedKeyword],
    quick_wins: &[QuickWinOpportunity],
    content_gaps: &[ContentGap],
    cannibalization: &[CannibalizationIssue],
    hidden_gems: &[HiddenGem],
) -> Vec<ActionItem> {
    let stages = stage_lookup(keywords);
    let stage_of = |keyword: &str| {
        stages
            .get(keyword.to_lowercase().as_str())
            .copied()
            .unwrap_or(FunnelStage::Awareness)
    };

    let mut candidates: Vec<Candidate> = Vec::new();

    for win in quick_wins {
        candidates.push(Candidate {
            keyword: win.keyword.clone(),
            action_type: ActionType::Optimize,
            source: ActionSource::QuickWin,
            title: format!(
                "Optimize \"{}\" from position {} to {}",
                win.keyword, win.current_position, win.target_position
            ),
            effort: effort_score(win.effort),
            strategic_fit: stage_fit(stage_of(&win.keyword)),
            time_to_result: 90.0,
            estimated_uplift: win.click_uplift,
            rationale: win.rationale.clone(),
        });
    }

    for gap in content_gaps {
        candidates.push(Candidate {
            keyword: gap.category.clone(),
            action_type: ActionType::Create,
            source: ActionSource::ContentGap,
            title: format!("Create content for the {} topic", gap.category),
            effort: 75.0,
            strategic_fit: 70.0,
            // Clicks a solid page-one presence would capture for the topic.
            time_to_result: 30.0,
            estimated_uplift: ctr::visible_volume(gap.total_volume, Some(5)),
            rationale: gap.rationale.clone(),
        });
    }

    for issue in cannibalization {
        let (effort, time_to_result) = match issue.recommendation {
            Recommendation::Redirect => (40.0, 80.0),
            Recommendation::Differentiate => (55.0, 60.0),
            Recommendation::Consolidate => (70.0, 60.0),
        };
        candidates.push(Candidate {
            keyword: issue.keyword.clone(),
            action_type: ActionType::Investigate,
            source: ActionSource::Cannibalization,
            title: cannibalization_title(issue),
            effort,
            strategic_fit: 60.0,
            time_to_result,
            estimated_uplift: issue.impact_score,
            rationale: issue.rationale.clone(),
        });
    }

    for gem in hidden_gems {
        let (action_type, title, time_to_result) = match gem.position {
            Some(pos) => (
                ActionType::Monitor,
                format!("Monitor \"{}\" (position {})", gem.keyword, pos),
                50.0,
            ),
            None => (
                ActionType::Investigate,
                format!("Investigate \"{}\" (not ranking yet)", gem.keyword),
                35.0,
            ),
        };
        candidates.push(Candidate {
            keyword: gem.keyword.clone(),
            action_type,
            source: ActionSource::HiddenGem,
            title,
            effort: gem.keyword_difficulty,
            strategic_fit: stage_fit(stage_of(&gem.keyword)),
            time_to_result,
            estimated_uplift: gem.potential_clicks,
            rationale: gem.rationale.clone(),
        });
    }

    let max_uplift = candidates
        .iter()
        .map(|c| c.estimated_uplift)
        .max()
        .unwrap_or(0);

    let mut actions: Vec<ActionItem> = Vec::with_capacity(candidates.len());
    let mut seen: HashMap<(String, ActionType), usize> = HashMap::new();

    for candidate in candidates {
        let impact = if max_uplift > 0 {
            round1(candidate.estimated_uplift as f64 / max_uplift as f64 * 100.0)
        } else {
            0.0
        };
        let priority = round1(
            W_IMPACT * impact
                + W_EFFORT * (100.0 - candidate.effort)
                + W_STRATEGIC_FIT * candidate.strategic_fit
                + W_TIME_TO_RESULT * candidate.time_to_result,
        );
        // Identity covers keyword and type so a keyword surfacing from two
        // detectors under different actions keeps two trackable items.
        let item = ActionItem {
            id: opportunity_id(
                &format!("action_{}", candidate.action_type.as_str()),
                &candidate.keyword,
            ),
            keyword: candidate.keyword,
            action_type: candidate.action_type,
            source: candidate.source,
            title: candidate.title,
            priority,
            impact,
            effort: candidate.effort,
            strategic_fit: candidate.strategic_fit,
            time_to_result: candidate.time_to_result,
            estimated_uplift: candidate.estimated_uplift,
            rationale: candidate.rationale,
        };

        let key = (item.keyword.to_lowercase(), item.action_type);
        match seen.get(&key) {
            Some(&at) if actions[at].priority >= item.priority => {}
            Some(&at) => actions[at] = item,
            None => {
                seen.insert(key, actions.len());
                actions.push(item);
            }
        }
    }

    actions.sort_by(|a, b| {
        b.priority
            .total_cmp(&a.priority)
            .then(b.estimated_uplift.cmp(&a.estimated_uplift))
            .then_with(|| a.keyword.cmp(&b.keyword))
            .then_with(|| a.action_type.as_str().cmp(b.action_type.as_str()))
    });
    actions
}

fn cannibalization_title(issue: &CannibalizationIssue) -> String {
    match issue.recommendation {
        Recommendation::Consolidate => format!(
            "Consolidate {} pages competing for \"{}\"",
            issue.urls.len(),
            issue.keyword
        ),
        Recommendation::Redirect => {
            format!("Redirect weaker pages for \"{}\" to the leader", issue.keyword)
        }
        Recommendation::Differentiate => {
            format!("Differentiate pages ranking for \"{}\"", issue.keyword)
        }
    }
}

fn effort_score(effort: Effort) -> f64 {
    match effort {
        Effort::Low => 25.0,
        Effort::Medium => 50.0,
        Effort::High => 75.0,
    }
}

fn stage_fit(stage: FunnelStage) -> f64 {
    match stage {
        FunnelStage::Decision => 90.0,
        FunnelStage::Consideration => 70.0,
        FunnelStage::Awareness => 50.0,
    }
}

/// Funnel stage per lowercased keyword text. When duplicate rows disagree the
/// stage furthest down the funnel wins, independent of input order.
fn stage_lookup(keywords: &[RankedKeyword]) -> HashMap<String, FunnelStage> {
    let mut stages: HashMap<String, FunnelStage> = HashMap::new();
    for kw in keywords.iter().filter(|k| !k.is_discarded) {
        let stage = kw.funnel_stage();
        stages
            .entry(kw.keyword.to_lowercase())
            .and_modify(|existing| {
                if stage > *existing {
                    *existing = stage;
                }
            })
            .or_insert(stage);
    }
    stages
}
