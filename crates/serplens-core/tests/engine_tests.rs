use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serplens_core::analyzer::{self, report::AnalysisReport};
use serplens_core::config::EngineConfig;
use serplens_core::input::{self, AnalysisInput};
use serplens_core::metrics::GapClassification;
use serplens_core::{ctr, EngineError};

/// Workspace root is two levels up from this crate's manifest.
fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent()
        .unwrap() // crates/
        .parent()
        .unwrap() // workspace root
        .join("tests/fixtures")
}

fn snapshot_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("snapshots").join(name)
}

fn demo_store() -> AnalysisInput {
    input::load_file(&snapshot_fixture("demo-store.json")).unwrap()
}

fn analyze_demo_store() -> AnalysisReport {
    analyzer::analyze(&demo_store(), &EngineConfig::default()).unwrap()
}

// --- headline metrics ---

#[test]
fn headline_metrics_hit_known_values() {
    let report = analyze_demo_store();

    // nike 10000 own / (nike + adidas) 25000; discarded reebok excluded.
    assert_eq!(report.share_of_search.percentage, 40.0);
    assert_eq!(report.share_of_search.own_volume, 10_000);
    assert_eq!(report.share_of_search.total_volume, 25_000);
    assert_eq!(report.share_of_search.keyword_count, 2);

    assert!(report.share_of_voice.has_data);
    assert!(report.share_of_voice.percentage > 0.0);
    assert!(report.share_of_voice.percentage <= 100.0);

    // Strong brand, weak organic capture.
    assert_eq!(
        report.growth_gap.gap,
        report.share_of_voice.percentage - report.share_of_search.percentage
    );
    assert_eq!(
        report.growth_gap.classification,
        GapClassification::MissingOpportunities
    );
}

#[test]
fn visible_volume_never_exceeds_search_volume() {
    for kw in demo_store().active_ranked() {
        assert!(
            kw.visible_volume() <= kw.search_volume,
            "{} captures more clicks than searches",
            kw.keyword
        );
    }
}

// --- detectors on the fixture ---

#[test]
fn quick_win_example_numbers() {
    let report = analyze_demo_store();
    assert_eq!(report.quick_wins.len(), 8);

    let win = report
        .quick_wins
        .iter()
        .find(|w| w.keyword == "quick win kw")
        .unwrap();
    assert_eq!(win.current_clicks, 25);
    assert_eq!(win.potential_clicks, 90);
    assert_eq!(win.click_uplift, 65);
    assert_eq!(win.uplift_percentage, 260);
}

#[test]
fn cannibalization_group_is_detected_with_correct_impact() {
    let report = analyze_demo_store();
    assert_eq!(report.cannibalization.len(), 1);

    let issue = &report.cannibalization[0];
    assert_eq!(issue.keyword, "running shoes");
    assert!(issue.urls.len() >= 2);
    // Everything beyond the best URL: the position-9 page's clicks.
    assert_eq!(issue.impact_score, 144);
    assert_eq!(issue.urls[0].position, 4);
}

#[test]
fn hidden_gems_cover_first_movers_and_easy_wins() {
    let report = analyze_demo_store();

    let zero_drop = report
        .hidden_gems
        .iter()
        .find(|g| g.keyword == "zero drop shoes")
        .unwrap();
    assert_eq!(zero_drop.gem_type.as_str(), "first-mover");
    assert!(!zero_drop.difficulty_estimated);
    assert_eq!(zero_drop.position, None);

    let guide = report
        .hidden_gems
        .iter()
        .find(|g| g.keyword == "trail running guide")
        .unwrap();
    assert_eq!(guide.gem_type.as_str(), "easy-win");
    assert_eq!(guide.keyword_difficulty, 20.0);
}

#[test]
fn content_gaps_use_supplied_competitor_baseline() {
    let report = analyze_demo_store();
    assert!(!report.content_gaps.is_empty());
    for gap in &report.content_gaps {
        assert!(!gap.estimated_baseline);
        assert_eq!(gap.competitor_coverage, 12.0);
        assert!(gap.coverage_gap_pct > 0.0);
        assert!(!gap.rationale.is_empty());
    }
    // High-volume categories with wide gaps lead the list.
    assert_eq!(report.content_gaps[0].priority.as_str(), "high");
}

#[test]
fn funnel_report_is_complete_and_ordered() {
    let report = analyze_demo_store();
    let stages: Vec<&str> = report.funnel.iter().map(|s| s.stage.label()).collect();
    assert_eq!(stages, vec!["awareness", "consideration", "decision"]);

    let total_rows: usize = report.funnel.iter().map(|s| s.keyword_count).sum();
    // Every active ranked row lands in exactly one stage.
    assert_eq!(total_rows, demo_store().active_ranked().count());
}

// --- action plan ---

#[test]
fn action_plan_is_ranked_and_deduplicated() {
    let report = analyze_demo_store();
    assert!(!report.actions.is_empty());

    for pair in report.actions.windows(2) {
        assert!(pair[0].priority >= pair[1].priority);
    }

    let mut seen = HashSet::new();
    let mut ids = HashSet::new();
    for action in &report.actions {
        assert!(
            seen.insert((action.keyword.to_lowercase(), action.action_type)),
            "duplicate action for {} ({:?})",
            action.keyword,
            action.action_type
        );
        assert!(
            ids.insert(action.id.clone()),
            "duplicate action id {}",
            action.id
        );
        assert!((0.0..=100.0).contains(&action.priority));
        assert!(!action.rationale.is_empty());
        assert!(!action.title.is_empty());
    }
}

#[test]
fn every_output_references_an_input_keyword_or_category() {
    let input = demo_store();
    let report = analyzer::analyze(&input, &EngineConfig::default()).unwrap();

    let keywords: HashSet<String> = input
        .ranked_keywords
        .iter()
        .map(|k| k.keyword.clone())
        .collect();
    let categories: HashSet<String> =
        report.categories.iter().map(|c| c.category.clone()).collect();

    for win in &report.quick_wins {
        assert!(keywords.contains(&win.keyword));
    }
    for gem in &report.hidden_gems {
        assert!(keywords.contains(&gem.keyword));
    }
    for issue in &report.cannibalization {
        assert!(keywords.contains(&issue.keyword));
    }
    for gap in &report.content_gaps {
        assert!(categories.contains(&gap.category));
    }
    for action in &report.actions {
        assert!(
            keywords.contains(&action.keyword) || categories.contains(&action.keyword),
            "action {} references nothing in the input",
            action.keyword
        );
    }
}

// --- determinism and discard semantics ---

#[test]
fn reordered_input_yields_identical_report() {
    let config = EngineConfig::default();
    let input = demo_store();
    let baseline = analyzer::analyze(&input, &config).unwrap();

    let mut reversed = input.clone();
    reversed.brand_keywords.reverse();
    reversed.ranked_keywords.reverse();
    let report = analyzer::analyze(&reversed, &config).unwrap();

    assert_eq!(baseline, report);
}

#[test]
fn analysis_is_idempotent() {
    let config = EngineConfig::default();
    let input = demo_store();
    let first = analyzer::analyze(&input, &config).unwrap();
    let second = analyzer::analyze(&input, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn report_survives_a_json_round_trip() {
    let report = analyze_demo_store();
    let json = serde_json::to_string(&report).unwrap();
    let back: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report, back);
}

#[test]
fn discarding_a_keyword_removes_it_from_every_output() {
    let config = EngineConfig::default();
    let mut input = demo_store();
    let before = analyzer::analyze(&input, &config).unwrap();

    for kw in input
        .ranked_keywords
        .iter_mut()
        .filter(|k| k.keyword == "best trail shoes")
    {
        kw.is_discarded = true;
    }
    let after = analyzer::analyze(&input, &config).unwrap();

    assert!(after.quick_wins.iter().all(|w| w.keyword != "best trail shoes"));
    assert!(after.hidden_gems.iter().all(|g| g.keyword != "best trail shoes"));
    assert!(after.actions.iter().all(|a| a.keyword != "best trail shoes"));

    // Volume contributions only ever shrink.
    assert!(after.share_of_voice.visible_volume <= before.share_of_voice.visible_volume);
    assert!(after.share_of_voice.total_volume < before.share_of_voice.total_volume);
    assert_eq!(after.share_of_search, before.share_of_search);
    assert_eq!(after.summary.discarded_ranked_count, before.summary.discarded_ranked_count + 1);
}

#[test]
fn discarding_the_own_brand_drops_sos() {
    let config = EngineConfig::default();
    let mut input = demo_store();
    let before = analyzer::analyze(&input, &config).unwrap();

    input.brand_keywords[0].is_discarded = true;
    let after = analyzer::analyze(&input, &config).unwrap();

    assert!(after.share_of_search.percentage < before.share_of_search.percentage);
    assert!(after.share_of_search.own_volume < before.share_of_search.own_volume);
}

#[test]
fn the_engine_never_mutates_its_input() {
    let input = demo_store();
    let copy = input.clone();
    let _ = analyzer::analyze(&input, &EngineConfig::default()).unwrap();
    assert_eq!(input, copy);
}

// --- parallel execution ---

#[test]
fn parallel_analysis_matches_sync_on_the_fixture() {
    let input = demo_store();
    let sync_report = analyzer::analyze(&input, &EngineConfig::default()).unwrap();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let parallel_report = rt
        .block_on(analyzer::analyze_parallel(
            Arc::new(input),
            EngineConfig::default(),
        ))
        .unwrap();

    assert_eq!(sync_report, parallel_report);
}

// --- error surface ---

#[test]
fn missing_snapshot_is_an_io_error() {
    let err = input::load_file(&snapshot_fixture("does-not-exist.json")).unwrap_err();
    assert!(matches!(err, EngineError::Io { .. }));
}

#[test]
fn tail_position_pin() {
    // Position 25 and unranked both fall back to the tail rate: 1000 * 0.001.
    assert_eq!(ctr::visible_volume(1000, Some(25)), 1);
    assert_eq!(ctr::visible_volume(1000, None), 1);
    assert_eq!(ctr::visible_volume(1000, Some(1)), 280);
}
