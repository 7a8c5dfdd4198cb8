//! Keyword categorization and funnel-stage mapping.

use regex::Regex;

use crate::error::{EngineError, Result};
use crate::model::{FunnelStage, Intent, RankedKeyword};

/// Ordered category rules evaluated against the lowercased keyword,
/// first match wins. Order is load-bearing: overlapping patterns (say
/// "winter tires" before a generic "tires") must stay in sequence.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<(String, Regex)>,
    fallback: String,
}

/// Built-in rule list, most specific intent first.
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("Buying Guide", r"\bbest\b|\btop \d+\b|\bguide\b"),
    ("Comparison", r"\bvs\.?\b|\bversus\b|\bcompar|\balternative"),
    ("Pricing", r"\bprice\b|\bpricing\b|\bcost\b|\bcheap\b|\bdiscount\b|\bdeal\b"),
    ("Reviews", r"\breview|\brating"),
    ("Local", r"\bnear me\b|\bnearby\b|\blocal\b"),
    (
        "Support",
        r"\bhow to\b|\bfix\b|\berror\b|\btroubleshoot|\binstall\b|\bsetup\b|\btutorial\b",
    ),
];

pub const DEFAULT_FALLBACK_CATEGORY: &str = "General";

impl CategoryRules {
    /// Compiles an ordered `(category, pattern)` list. Patterns are matched
    /// against lowercased keywords, so write them in lowercase.
    pub fn compile<I, S>(rules: I, fallback: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for (category, pattern) in rules {
            let re = Regex::new(pattern.as_ref()).map_err(|source| EngineError::InvalidPattern {
                pattern: pattern.as_ref().to_string(),
                source,
            })?;
            compiled.push((category.as_ref().to_string(), re));
        }
        Ok(Self {
            rules: compiled,
            fallback: fallback.into(),
        })
    }

    /// Resolves the category for a keyword. A non-empty provider-supplied
    /// category always wins; pattern rules only fill the blanks.
    pub fn classify<'a>(&'a self, keyword: &str, provider_category: Option<&'a str>) -> &'a str {
        if let Some(provided) = provider_category {
            if !provided.trim().is_empty() {
                return provided;
            }
        }
        let lowered = keyword.to_lowercase();
        for (category, pattern) in &self.rules {
            if pattern.is_match(&lowered) {
                return category;
            }
        }
        &self.fallback
    }

    pub fn classify_row<'a>(&'a self, row: &'a RankedKeyword) -> &'a str {
        self.classify(&row.keyword, row.category.as_deref())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Same rules, different fallback label.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::compile(DEFAULT_RULES.iter().copied(), DEFAULT_FALLBACK_CATEGORY)
            .expect("built-in category patterns compile")
    }
}

/// Maps a search intent to its funnel stage. Anything outside the four known
/// intents lands in awareness so no keyword falls out of funnel aggregates.
pub fn funnel_stage(intent: Intent) -> FunnelStage {
    match intent {
        Intent::Commercial => FunnelStage::Consideration,
        Intent::Transactional => FunnelStage::Decision,
        Intent::Informational | Intent::Navigational | Intent::Unknown => FunnelStage::Awareness,
    }
}
