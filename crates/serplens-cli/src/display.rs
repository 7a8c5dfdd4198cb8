use colored::*;
use serplens_core::analyzer::action_plan::{ActionItem, ActionType};
use serplens_core::analyzer::cannibalization::{CannibalizationIssue, Recommendation};
use serplens_core::analyzer::content_gaps::{ContentGap, GapPriority};
use serplens_core::analyzer::hidden_gems::{GemType, HiddenGem};
use serplens_core::analyzer::quick_wins::QuickWinOpportunity;
use serplens_core::analyzer::report::{format_volume, AnalysisReport, Effort, HIGH_PRIORITY};
use serplens_core::metrics::GapClassification;

/// Print a full analysis report to the terminal.
pub fn print_analysis_report(report: &AnalysisReport, source: &str, top: Option<usize>) {
    println!();
    println!(
        "{}",
        format!(
            " Serplens v{} — Analyzing {}",
            env!("CARGO_PKG_VERSION"),
            source
        )
        .bold()
    );
    println!();

    // Snapshot context
    println!(" {}", "Snapshot".bold().underline());
    println!(
        " {} {} brand keywords, {} ranked keywords",
        "|-".dimmed(),
        report.summary.brand_keyword_count,
        report.summary.ranked_keyword_count
    );
    if report.summary.discarded_brand_count + report.summary.discarded_ranked_count > 0 {
        println!(
            " {} Discarded: {} brand, {} ranked",
            "|-".dimmed(),
            report.summary.discarded_brand_count,
            report.summary.discarded_ranked_count
        );
    }
    if let Some(ref location) = report.summary.location {
        let market = match report.summary.language {
            Some(ref language) => format!("{} ({})", location, language),
            None => location.clone(),
        };
        println!(" {} Market: {}", "|-".dimmed(), market.cyan());
    }
    println!();

    // Headline metrics
    println!(" {}", "Visibility".bold().underline());
    if report.share_of_search.has_data {
        println!(
            " {} Share of Search:  {} ({} of {} brand volume)",
            "|-".dimmed(),
            format!("{:.1}%", report.share_of_search.percentage).bold(),
            format_volume(report.share_of_search.own_volume),
            format_volume(report.share_of_search.total_volume)
        );
    } else {
        println!(
            " {} Share of Search:  {}",
            "|-".dimmed(),
            "no brand volume tracked".dimmed()
        );
    }
    if report.share_of_voice.has_data {
        println!(
            " {} Share of Voice:   {} ({} of {} clicks captured)",
            "|-".dimmed(),
            format!("{:.1}%", report.share_of_voice.percentage).bold(),
            format_volume(report.share_of_voice.visible_volume),
            format_volume(report.share_of_voice.total_volume)
        );
    } else {
        println!(
            " {} Share of Voice:   {}",
            "|-".dimmed(),
            "no ranked volume tracked".dimmed()
        );
    }
    if report.growth_gap.has_data {
        let classification = match report.growth_gap.classification {
            GapClassification::GrowthPotential => "growth potential".green().to_string(),
            GapClassification::MissingOpportunities => {
                "missing opportunities".yellow().to_string()
            }
            GapClassification::Balanced => "balanced".to_string(),
        };
        println!(
            " {} Growth Gap:       {:+.1} pts ({})",
            "|-".dimmed(),
            report.growth_gap.gap,
            classification
        );
    }
    println!();

    println!(" {}", "=".repeat(60).dimmed());
    println!();

    // Quick wins
    println!(
        " {}",
        format!("Quick Wins ({})", report.quick_wins.len())
            .bold()
            .underline()
    );
    if report.quick_wins.is_empty() {
        println!(" {} {}", "|-".dimmed(), "none detected".dimmed());
    } else {
        let visible = shown(&report.quick_wins, top);
        for win in visible {
            print_quick_win(win);
        }
        print_overflow(report.quick_wins.len(), visible.len());
    }
    println!();

    // Hidden gems
    println!(
        " {}",
        format!("Hidden Gems ({})", report.hidden_gems.len())
            .bold()
            .underline()
    );
    if report.hidden_gems.is_empty() {
        println!(" {} {}", "|-".dimmed(), "none detected".dimmed());
    } else {
        let visible = shown(&report.hidden_gems, top);
        for gem in visible {
            print_gem(gem);
        }
        print_overflow(report.hidden_gems.len(), visible.len());
    }
    println!();

    // Cannibalization
    println!(
        " {}",
        format!("Cannibalization ({})", report.cannibalization.len())
            .bold()
            .underline()
    );
    if report.cannibalization.is_empty() {
        println!(
            " {} No keywords with competing URLs. Nothing to untangle.",
            "OK".green().bold()
        );
    } else {
        let visible = shown(&report.cannibalization, top);
        for issue in visible {
            print_cannibalization(issue);
        }
        print_overflow(report.cannibalization.len(), visible.len());
    }
    println!();

    // Content gaps
    println!(
        " {}",
        format!("Content Gaps ({})", report.content_gaps.len())
            .bold()
            .underline()
    );
    if report.content_gaps.is_empty() {
        println!(" {} {}", "|-".dimmed(), "none detected".dimmed());
    } else {
        let visible = shown(&report.content_gaps, top);
        for gap in visible {
            print_content_gap(gap);
        }
        print_overflow(report.content_gaps.len(), visible.len());
    }
    println!();

    println!(" {}", "=".repeat(60).dimmed());
    println!();

    // Category breakdown
    if !report.categories.is_empty() {
        println!(" {}", "Category Share of Voice".bold().underline());
        println!(
            "   {:<20} {:>9} {:>9} {:>7} {:>9}",
            "Category".underline(),
            "Keywords".underline(),
            "Volume".underline(),
            "SOV".underline(),
            "Avg Pos".underline()
        );
        for category in &report.categories {
            let avg = category
                .average_position
                .map(|p| format!("{:.1}", p))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "   {:<20} {:>9} {:>9} {:>6.1}% {:>9}",
                category.category,
                category.keyword_count,
                format_volume(category.total_volume),
                category.sov_pct,
                avg
            );
        }
        println!();
    }

    // Funnel coverage
    println!(" {}", "Funnel Coverage".bold().underline());
    for stage in &report.funnel {
        if stage.has_data {
            let avg = stage
                .average_position
                .map(|p| format!(", avg pos {:.1}", p))
                .unwrap_or_default();
            println!(
                " {} {:<13} {} keywords, {} volume, SOV {:.1}%{}",
                "|-".dimmed(),
                stage.stage.label(),
                stage.keyword_count,
                format_volume(stage.total_volume),
                stage.sov_pct,
                avg
            );
        } else {
            println!(
                " {} {:<13} {}",
                "|-".dimmed(),
                stage.stage.label(),
                "no keywords".dimmed()
            );
        }
    }
    println!();

    println!(" {}", "=".repeat(60).dimmed());
    println!();

    // Top of the action plan
    if !report.actions.is_empty() {
        let action_limit = top.unwrap_or(5);
        println!(" {}", "Top Actions".bold().underline());
        for (i, action) in report.actions.iter().take(action_limit).enumerate() {
            println!(
                " {:>2}. {} {}",
                i + 1,
                priority_tag(action.priority),
                action.title.bold()
            );
            println!(
                "     {} est. +{} clicks/mo | impact {:.0} | effort {:.0} | fit {:.0}",
                "|".dimmed(),
                action.estimated_uplift,
                action.impact,
                action.effort,
                action.strategic_fit
            );
        }
        print_overflow(report.actions.len(), report.actions.len().min(action_limit));
        println!();
    }

    // Summary
    println!(" {}", "Summary".bold().underline());
    println!(
        " {} Opportunities found:      {}",
        "|-".dimmed(),
        report.opportunity_count()
    );
    let high = report.high_priority_action_count();
    println!(
        " {} High-priority actions:    {}",
        "|-".dimmed(),
        if high > 0 {
            high.to_string().yellow().bold().to_string()
        } else {
            "0".to_string()
        }
    );
    println!(
        " {} Est. clicks/mo at stake:  {}",
        "|-".dimmed(),
        format_volume(report.total_estimated_uplift()).green()
    );
    println!();

    if !report.actions.is_empty() {
        println!(
            " Run {} to see the full prioritized plan",
            format!("serplens actions {}", source).cyan()
        );
        println!(
            " Run {} to export the report",
            format!("serplens analyze {} --format json", source).cyan()
        );
        println!();
    }
}

/// Print the prioritized action plan on its own.
pub fn print_actions(report: &AnalysisReport, source: &str, limit: usize) {
    println!();
    println!(
        "{}",
        format!(
            " Serplens v{} — Action Plan for {}",
            env!("CARGO_PKG_VERSION"),
            source
        )
        .bold()
    );
    println!();

    if report.actions.is_empty() {
        println!(
            " {} No actions to take. The snapshot shows no addressable opportunities.",
            "OK".green().bold()
        );
        println!();
        return;
    }

    for (i, action) in report.actions.iter().take(limit).enumerate() {
        print_action(i + 1, action);
        println!();
    }

    if report.actions.len() > limit {
        println!(
            " ... and {} more. Re-run with {} to see them.",
            report.actions.len() - limit,
            format!("--limit {}", report.actions.len()).cyan()
        );
        println!();
    }
}

fn print_action(rank: usize, action: &ActionItem) {
    let type_tag = match action.action_type {
        ActionType::Optimize => " OPTIMIZE ".on_green().black().bold().to_string(),
        ActionType::Create => " CREATE ".on_blue().white().bold().to_string(),
        ActionType::Investigate => " INVESTIGATE ".on_yellow().black().bold().to_string(),
        ActionType::Monitor => " MONITOR ".dimmed().to_string(),
    };

    println!(
        " {:>2}. {} {} {}",
        rank,
        priority_tag(action.priority),
        type_tag,
        action.keyword.bold()
    );
    println!("     {} {}", "|".dimmed(), action.title);
    println!(
        "     {} impact {:.0} | effort {:.0} | strategic fit {:.0} | time to result {:.0}",
        "|".dimmed(),
        action.impact,
        action.effort,
        action.strategic_fit,
        action.time_to_result
    );
    println!(
        "     {} est. +{} clicks/mo | via {}",
        "|".dimmed(),
        action.estimated_uplift,
        action.source.as_str()
    );
    println!("     {} {}", "|".dimmed(), action.rationale.dimmed());
}

fn print_quick_win(win: &QuickWinOpportunity) {
    println!(
        " {} {} — #{} -> #{}, +{} clicks/mo (+{}%)",
        effort_tag(win.effort),
        win.keyword.bold(),
        win.current_position,
        win.target_position,
        win.click_uplift,
        win.uplift_percentage
    );
    let volume = format!("{} searches/mo", format_volume(win.search_volume));
    match win.url {
        Some(ref url) => println!("   {} {} | {}", "|".dimmed(), volume, url.dimmed()),
        None => println!("   {} {}", "|".dimmed(), volume),
    }
}

fn print_gem(gem: &HiddenGem) {
    let type_label = match gem.gem_type {
        GemType::FirstMover => gem.gem_type.as_str().magenta(),
        GemType::EasyWin => gem.gem_type.as_str().green(),
        GemType::RisingTrend => gem.gem_type.as_str().cyan(),
    };
    let difficulty = if gem.difficulty_estimated {
        format!("KD {:.0} est.", gem.keyword_difficulty)
    } else {
        format!("KD {:.0}", gem.keyword_difficulty)
    };
    println!(
        " {} [{}] {} searches/mo, {} — reachable #{}, ~{} clicks/mo",
        gem.keyword.bold(),
        type_label,
        format_volume(gem.search_volume),
        difficulty,
        gem.achievable_position,
        gem.potential_clicks
    );
}

fn print_cannibalization(issue: &CannibalizationIssue) {
    let tag = match issue.recommendation {
        Recommendation::Redirect => " REDIRECT ".on_red().white().bold().to_string(),
        Recommendation::Consolidate => " CONSOLIDATE ".on_yellow().black().bold().to_string(),
        Recommendation::Differentiate => " DIFFERENTIATE ".on_blue().white().bold().to_string(),
    };
    println!(" {} {}", tag, issue.keyword.bold());
    println!(
        "   {} {} URLs compete for {} searches/mo; {} clicks/mo at stake",
        "|".dimmed(),
        issue.urls.len(),
        format_volume(issue.search_volume),
        issue.impact_score
    );
    for url in &issue.urls {
        println!("   {} #{:<3} {}", "|".dimmed(), url.position, url.url.dimmed());
    }
    println!("   {} {}", "|".dimmed(), issue.rationale.dimmed());
}

fn print_content_gap(gap: &ContentGap) {
    let tag = match gap.priority {
        GapPriority::High => " HIGH ".on_red().white().bold().to_string(),
        GapPriority::Medium => " MEDIUM ".on_yellow().black().bold().to_string(),
        GapPriority::Low => " LOW ".on_blue().white().to_string(),
    };
    println!(" {} {}", tag, gap.category.bold());
    println!(
        "   {} {} keywords, {} searches/mo — {} of {:.0} pages covered ({:.0}% gap{})",
        "|".dimmed(),
        gap.keyword_count,
        format_volume(gap.total_volume),
        gap.your_coverage,
        gap.competitor_coverage,
        gap.coverage_gap_pct,
        if gap.estimated_baseline {
            ", est. baseline"
        } else {
            ""
        }
    );
    if !gap.top_keywords.is_empty() {
        println!(
            "   {} Top keywords: {}",
            "|".dimmed(),
            gap.top_keywords.join(", ").dimmed()
        );
    }
}

fn effort_tag(effort: Effort) -> String {
    match effort {
        Effort::Low => format!(" {} ", effort.symbol())
            .on_green()
            .black()
            .bold()
            .to_string(),
        Effort::Medium => format!(" {} ", effort.symbol())
            .on_yellow()
            .black()
            .bold()
            .to_string(),
        Effort::High => format!(" {} ", effort.symbol())
            .on_red()
            .white()
            .bold()
            .to_string(),
    }
}

fn priority_tag(priority: f64) -> String {
    let tag = format!("[{:>5.1}]", priority);
    if priority >= HIGH_PRIORITY {
        tag.yellow().bold().to_string()
    } else {
        tag.dimmed().to_string()
    }
}

fn shown<T>(items: &[T], top: Option<usize>) -> &[T] {
    match top {
        Some(limit) if limit < items.len() => &items[..limit],
        _ => items,
    }
}

fn print_overflow(total: usize, visible: usize) {
    if total > visible {
        println!(
            "   {}",
            format!("... and {} more", total - visible).dimmed()
        );
    }
}

/// Generate a markdown formatted analysis report.
pub fn format_markdown_report(report: &AnalysisReport, source: &str) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Serplens Analysis — {}\n\n", source));

    md.push_str("## Visibility\n\n");
    md.push_str("| Metric | Value |\n|--------|-------|\n");
    md.push_str(&format!(
        "| Share of Search | {} |\n",
        if report.share_of_search.has_data {
            format!("{:.1}%", report.share_of_search.percentage)
        } else {
            "no data".to_string()
        }
    ));
    md.push_str(&format!(
        "| Share of Voice | {} |\n",
        if report.share_of_voice.has_data {
            format!("{:.1}%", report.share_of_voice.percentage)
        } else {
            "no data".to_string()
        }
    ));
    md.push_str(&format!(
        "| Growth Gap | {:+.1} ({}) |\n\n",
        report.growth_gap.gap,
        report.growth_gap.classification.as_str()
    ));

    if !report.quick_wins.is_empty() {
        md.push_str("## Quick Wins\n\n");
        md.push_str("| Keyword | Volume | Position | Target | Uplift | Effort |\n");
        md.push_str("|---------|--------|----------|--------|--------|--------|\n");
        for win in &report.quick_wins {
            md.push_str(&format!(
                "| {} | {} | {} | {} | +{}/mo | {} |\n",
                win.keyword,
                format_volume(win.search_volume),
                win.current_position,
                win.target_position,
                win.click_uplift,
                win.effort.symbol()
            ));
        }
        md.push('\n');
    }

    if !report.hidden_gems.is_empty() {
        md.push_str("## Hidden Gems\n\n");
        md.push_str("| Keyword | Type | Volume | Difficulty | Reachable | Potential |\n");
        md.push_str("|---------|------|--------|------------|-----------|----------|\n");
        for gem in &report.hidden_gems {
            let difficulty = if gem.difficulty_estimated {
                format!("{:.0} (est.)", gem.keyword_difficulty)
            } else {
                format!("{:.0}", gem.keyword_difficulty)
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} | #{} | ~{}/mo |\n",
                gem.keyword,
                gem.gem_type.as_str(),
                format_volume(gem.search_volume),
                difficulty,
                gem.achievable_position,
                gem.potential_clicks
            ));
        }
        md.push('\n');
    }

    if !report.cannibalization.is_empty() {
        md.push_str("## Cannibalization\n\n");
        for issue in &report.cannibalization {
            md.push_str(&format!(
                "### {} — {}\n\n",
                issue.keyword,
                issue.recommendation.as_str()
            ));
            md.push_str(&format!("{}\n\n", issue.rationale));
            for url in &issue.urls {
                md.push_str(&format!("- #{} {}\n", url.position, url.url));
            }
            md.push('\n');
        }
    }

    if !report.content_gaps.is_empty() {
        md.push_str("## Content Gaps\n\n");
        md.push_str("| Category | Priority | Keywords | Volume | Coverage | Gap |\n");
        md.push_str("|----------|----------|----------|--------|----------|-----|\n");
        for gap in &report.content_gaps {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} of {:.0} | {:.0}% |\n",
                gap.category,
                gap.priority.as_str(),
                gap.keyword_count,
                format_volume(gap.total_volume),
                gap.your_coverage,
                gap.competitor_coverage,
                gap.coverage_gap_pct
            ));
        }
        md.push('\n');
    }

    if !report.categories.is_empty() {
        md.push_str("## Category Share of Voice\n\n");
        md.push_str("| Category | Keywords | Volume | SOV | Avg Position |\n");
        md.push_str("|----------|----------|--------|-----|--------------|\n");
        for category in &report.categories {
            let avg = category
                .average_position
                .map(|p| format!("{:.1}", p))
                .unwrap_or_else(|| "-".to_string());
            md.push_str(&format!(
                "| {} | {} | {} | {:.1}% | {} |\n",
                category.category,
                category.keyword_count,
                format_volume(category.total_volume),
                category.sov_pct,
                avg
            ));
        }
        md.push('\n');
    }

    md.push_str("## Funnel Coverage\n\n");
    md.push_str("| Stage | Keywords | Volume | SOV |\n");
    md.push_str("|-------|----------|--------|-----|\n");
    for stage in &report.funnel {
        md.push_str(&format!(
            "| {} | {} | {} | {:.1}% |\n",
            stage.stage.label(),
            stage.keyword_count,
            format_volume(stage.total_volume),
            stage.sov_pct
        ));
    }
    md.push('\n');

    if !report.actions.is_empty() {
        md.push_str("## Action Plan\n\n");
        md.push_str("| # | Action | Type | Priority | Est. Uplift |\n");
        md.push_str("|---|--------|------|----------|-------------|\n");
        for (i, action) in report.actions.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {:.1} | +{}/mo |\n",
                i + 1,
                action.title,
                action.action_type.as_str(),
                action.priority,
                action.estimated_uplift
            ));
        }
        md.push('\n');
    }

    md.push_str("## Summary\n\n");
    md.push_str(&format!(
        "| Metric | Value |\n|--------|-------|\n| Opportunities | {} |\n| High-priority actions | {} |\n| Est. clicks/mo at stake | {} |\n\n",
        report.opportunity_count(),
        report.high_priority_action_count(),
        report.total_estimated_uplift(),
    ));

    md.push_str("---\n*Generated by [Serplens](https://github.com/serplens/serplens)*\n");

    md
}
