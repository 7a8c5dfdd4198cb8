//! Engine configuration loaded from an optional `serplens.toml`.
//!
//! Every key has a default so an absent or partial file behaves like the
//! built-in tuning. Share/gap thresholds are deliberately NOT here: those are
//! fixed constants of the metric definitions, not tunables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{CategoryRules, DEFAULT_FALLBACK_CATEGORY};
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub categories: CategoryConfig,
}

/// Detector tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    /// Minimum search volume for a quick-win candidate.
    #[serde(default = "default_quick_win_min_volume")]
    pub quick_win_min_volume: u64,

    /// Keep a quick win only if it would gain at least this many clicks.
    #[serde(default = "default_quick_win_min_uplift")]
    pub quick_win_min_uplift: u64,

    /// Position a quick win is assumed to reach after optimization.
    #[serde(default = "default_quick_win_target_position")]
    pub quick_win_target_position: u32,

    /// Maximum keyword difficulty for a hidden gem.
    #[serde(default = "default_gem_max_difficulty")]
    pub gem_max_difficulty: f64,

    /// Minimum search volume for a hidden gem.
    #[serde(default = "default_gem_min_volume")]
    pub gem_min_volume: u64,

    /// Difficulty at or below which a deep-ranked gem counts as an easy win.
    #[serde(default = "default_gem_easy_difficulty")]
    pub gem_easy_difficulty: f64,

    /// Heuristic for estimating competitor page coverage from keyword counts.
    #[serde(default = "default_keywords_per_page")]
    pub keywords_per_page: u64,

    /// Category volume at which a wide coverage gap becomes high priority.
    #[serde(default = "default_gap_high_volume")]
    pub gap_high_volume: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryConfig {
    /// Label for keywords no rule matches.
    #[serde(default = "default_fallback_category")]
    pub fallback: String,

    /// Ordered override rules; empty means use the built-in list.
    #[serde(default)]
    pub rules: Vec<CategoryRuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRuleConfig {
    pub category: String,
    pub pattern: String,
}

fn default_quick_win_min_volume() -> u64 {
    100
}

fn default_quick_win_min_uplift() -> u64 {
    10
}

fn default_quick_win_target_position() -> u32 {
    3
}

fn default_gem_max_difficulty() -> f64 {
    40.0
}

fn default_gem_min_volume() -> u64 {
    50
}

fn default_gem_easy_difficulty() -> f64 {
    25.0
}

fn default_keywords_per_page() -> u64 {
    10
}

fn default_gap_high_volume() -> u64 {
    10_000
}

fn default_fallback_category() -> String {
    DEFAULT_FALLBACK_CATEGORY.to_string()
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            quick_win_min_volume: default_quick_win_min_volume(),
            quick_win_min_uplift: default_quick_win_min_uplift(),
            quick_win_target_position: default_quick_win_target_position(),
            gem_max_difficulty: default_gem_max_difficulty(),
            gem_min_volume: default_gem_min_volume(),
            gem_easy_difficulty: default_gem_easy_difficulty(),
            keywords_per_page: default_keywords_per_page(),
            gap_high_volume: default_gap_high_volume(),
        }
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback_category(),
            rules: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| EngineError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.thresholds.quick_win_target_position < 1 {
            return Err(EngineError::InvalidConfig(
                "quick_win_target_position must be at least 1".into(),
            ));
        }
        if self.thresholds.keywords_per_page < 1 {
            return Err(EngineError::InvalidConfig(
                "keywords_per_page must be at least 1".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.thresholds.gem_max_difficulty) {
            return Err(EngineError::InvalidConfig(
                "gem_max_difficulty must be within 0..=100".into(),
            ));
        }
        if self.thresholds.gem_easy_difficulty > self.thresholds.gem_max_difficulty {
            return Err(EngineError::InvalidConfig(
                "gem_easy_difficulty cannot exceed gem_max_difficulty".into(),
            ));
        }
        if self.categories.fallback.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "categories.fallback must not be empty".into(),
            ));
        }
        for rule in &self.categories.rules {
            if rule.category.trim().is_empty() {
                return Err(EngineError::InvalidConfig(format!(
                    "category rule with pattern {:?} has an empty label",
                    rule.pattern
                )));
            }
        }
        Ok(())
    }

    /// Compile the category rules this config describes. Empty override list
    /// means the built-in rules with this config's fallback label.
    pub fn category_rules(&self) -> Result<CategoryRules> {
        if self.categories.rules.is_empty() {
            return Ok(CategoryRules::default().with_fallback(self.categories.fallback.clone()));
        }
        CategoryRules::compile(
            self.categories
                .rules
                .iter()
                .map(|r| (r.category.as_str(), r.pattern.as_str())),
            self.categories.fallback.clone(),
        )
    }
}

/// Generate a starter configuration file.
pub fn generate_default_config() -> String {
    r#"# serplens engine configuration

[thresholds]
# Quick wins: positions 4-20 with at least this much monthly volume
quick_win_min_volume = 100
# Keep a quick win only if it gains at least this many clicks
quick_win_min_uplift = 10
# Position a quick win is assumed to reach
quick_win_target_position = 3

# Hidden gems: keyword difficulty ceiling and volume floor
gem_max_difficulty = 40.0
gem_min_volume = 50
# Deep-ranked keywords at or below this difficulty count as easy wins
gem_easy_difficulty = 25.0

# Content gaps: coverage heuristic and high-priority volume bar
keywords_per_page = 10
gap_high_volume = 10000

[categories]
# Label for keywords no rule matches
fallback = "General"

# Ordered override rules (first match wins). Uncomment to replace the
# built-in list. Patterns are matched against the lowercased keyword.
# [[categories.rules]]
# category = "Winter Tires"
# pattern = "winter tires"
#
# [[categories.rules]]
# category = "Tires"
# pattern = "tires"
"#
    .to_string()
}
