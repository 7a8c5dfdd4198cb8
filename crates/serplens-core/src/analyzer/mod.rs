pub mod action_plan;
pub mod aggregates;
pub mod cannibalization;
pub mod content_gaps;
pub mod hidden_gems;
pub mod quick_wins;
pub mod report;

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::input::AnalysisInput;
use crate::metrics;
use report::{AnalysisReport, SnapshotSummary};

/// Run every metric and detector over a snapshot and assemble the report.
///
/// Pure given its inputs: no I/O, no mutation of the snapshot, identical
/// input values produce an identical report regardless of array order.
pub fn analyze(input: &AnalysisInput, config: &EngineConfig) -> Result<AnalysisReport> {
    let rules = config.category_rules()?;
    let thresholds = &config.thresholds;

    let share_of_search = metrics::share_of_search(&input.brand_keywords);
    let share_of_voice = metrics::share_of_voice(&input.ranked_keywords);
    let growth_gap = metrics::growth_gap(&share_of_search, &share_of_voice);

    let quick_wins = quick_wins::detect(&input.ranked_keywords, thresholds);
    let hidden_gems = hidden_gems::detect(&input.ranked_keywords, thresholds);
    let cannibalization = cannibalization::detect(&input.ranked_keywords);
    let content_gaps = content_gaps::detect(
        &input.ranked_keywords,
        &rules,
        input.avg_competitor_coverage,
        thresholds,
    );
    let categories = aggregates::categories(&input.ranked_keywords, &rules);
    let funnel = aggregates::funnel(&input.ranked_keywords);

    let actions = action_plan::synthesize(
        &input.ranked_keywords,
        &quick_wins,
        &content_gaps,
        &cannibalization,
        &hidden_gems,
    );

    Ok(AnalysisReport {
        summary: summarize(input),
        share_of_search,
        share_of_voice,
        growth_gap,
        quick_wins,
        hidden_gems,
        cannibalization,
        content_gaps,
        categories,
        funnel,
        actions,
    })
}

/// Same report as [`analyze`], with the detector passes spread across
/// blocking worker threads. Worth it for snapshots in the tens of thousands
/// of rows; the detectors are pure and mutually independent, so execution
/// order cannot change the output.
pub async fn analyze_parallel(
    input: Arc<AnalysisInput>,
    config: EngineConfig,
) -> Result<AnalysisReport> {
    let rules = config.category_rules()?;

    let qw_task = {
        let input = Arc::clone(&input);
        let thresholds = config.thresholds.clone();
        tokio::task::spawn_blocking(move || quick_wins::detect(&input.ranked_keywords, &thresholds))
    };
    let gem_task = {
        let input = Arc::clone(&input);
        let thresholds = config.thresholds.clone();
        tokio::task::spawn_blocking(move || {
            hidden_gems::detect(&input.ranked_keywords, &thresholds)
        })
    };
    let cann_task = {
        let input = Arc::clone(&input);
        tokio::task::spawn_blocking(move || cannibalization::detect(&input.ranked_keywords))
    };
    let gap_task = {
        let input = Arc::clone(&input);
        let rules = rules.clone();
        let thresholds = config.thresholds.clone();
        tokio::task::spawn_blocking(move || {
            content_gaps::detect(
                &input.ranked_keywords,
                &rules,
                input.avg_competitor_coverage,
                &thresholds,
            )
        })
    };
    let agg_task = {
        let input = Arc::clone(&input);
        let rules = rules.clone();
        tokio::task::spawn_blocking(move || {
            (
                aggregates::categories(&input.ranked_keywords, &rules),
                aggregates::funnel(&input.ranked_keywords),
            )
        })
    };

    // The share metrics are a single pass each; not worth a worker.
    let share_of_search = metrics::share_of_search(&input.brand_keywords);
    let share_of_voice = metrics::share_of_voice(&input.ranked_keywords);
    let growth_gap = metrics::growth_gap(&share_of_search, &share_of_voice);

    // A dropped worker falls back to the inline computation.
    let quick_wins = qw_task
        .await
        .unwrap_or_else(|_| quick_wins::detect(&input.ranked_keywords, &config.thresholds));
    let hidden_gems = gem_task
        .await
        .unwrap_or_else(|_| hidden_gems::detect(&input.ranked_keywords, &config.thresholds));
    let cannibalization = cann_task
        .await
        .unwrap_or_else(|_| cannibalization::detect(&input.ranked_keywords));
    let content_gaps = gap_task.await.unwrap_or_else(|_| {
        content_gaps::detect(
            &input.ranked_keywords,
            &rules,
            input.avg_competitor_coverage,
            &config.thresholds,
        )
    });
    let (categories, funnel) = agg_task.await.unwrap_or_else(|_| {
        (
            aggregates::categories(&input.ranked_keywords, &rules),
            aggregates::funnel(&input.ranked_keywords),
        )
    });

    let actions = action_plan::synthesize(
        &input.ranked_keywords,
        &quick_wins,
        &content_gaps,
        &cannibalization,
        &hidden_gems,
    );

    Ok(AnalysisReport {
        summary: summarize(&input),
        share_of_search,
        share_of_voice,
        growth_gap,
        quick_wins,
        hidden_gems,
        cannibalization,
        content_gaps,
        categories,
        funnel,
        actions,
    })
}

fn summarize(input: &AnalysisInput) -> SnapshotSummary {
    SnapshotSummary {
        brand_keyword_count: input.brand_keywords.len(),
        ranked_keyword_count: input.ranked_keywords.len(),
        discarded_brand_count: input.discarded_brand_count(),
        discarded_ranked_count: input.discarded_ranked_count(),
        location: input.location.clone(),
        language: input.language.clone(),
    }
}
