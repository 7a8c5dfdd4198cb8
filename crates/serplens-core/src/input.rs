//! Keyword snapshot loading.
//!
//! A snapshot is one JSON document exported from the upstream data-fetch
//! layer, camelCase keys, carrying both keyword sets plus display-only
//! context. The loader is tolerant by design: rows clamp bad values instead
//! of failing, and absent collections default to empty.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::model::{BrandKeyword, RankedKeyword};

/// Everything one engine invocation reads. The engine borrows this immutably;
/// discard flags are toggled by the caller between runs, never by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    #[serde(default)]
    pub brand_keywords: Vec<BrandKeyword>,

    #[serde(default)]
    pub ranked_keywords: Vec<RankedKeyword>,

    /// Caller-supplied competitor coverage baseline for content gaps. When
    /// absent the detector estimates one per category.
    #[serde(default)]
    pub avg_competitor_coverage: Option<f64>,

    /// Display-only context from the provider export.
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub language: Option<String>,
}

impl AnalysisInput {
    /// Ranked keywords that still count, with soft-deleted rows filtered out.
    pub fn active_ranked(&self) -> impl Iterator<Item = &RankedKeyword> {
        self.ranked_keywords.iter().filter(|kw| !kw.is_discarded)
    }

    pub fn active_brands(&self) -> impl Iterator<Item = &BrandKeyword> {
        self.brand_keywords.iter().filter(|kw| !kw.is_discarded)
    }

    pub fn discarded_brand_count(&self) -> usize {
        self.brand_keywords.iter().filter(|k| k.is_discarded).count()
    }

    pub fn discarded_ranked_count(&self) -> usize {
        self.ranked_keywords.iter().filter(|k| k.is_discarded).count()
    }
}

/// Load a snapshot from a JSON file.
pub fn load_file(path: &Path) -> Result<AnalysisInput> {
    let content = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

/// Parse a snapshot from JSON text.
pub fn parse(content: &str) -> Result<AnalysisInput> {
    let input: AnalysisInput = serde_json::from_str(content)?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "brandKeywords": [
            {"keyword": "nike", "searchVolume": 10000, "isOwnBrand": true},
            {"keyword": "adidas", "searchVolume": 15000, "isOwnBrand": false}
        ],
        "rankedKeywords": [
            {
                "keyword": "running shoes",
                "searchVolume": 5000,
                "position": 7,
                "url": "https://example.com/shoes",
                "keywordDifficulty": 35,
                "searchIntent": {"mainIntent": "commercial", "probability": 0.8}
            },
            {"keyword": "negative row", "searchVolume": -10, "position": 0}
        ],
        "avgCompetitorCoverage": 12.5,
        "location": "United States",
        "language": "en"
    }"#;

    #[test]
    fn parses_full_snapshot() {
        let input = parse(SNAPSHOT).unwrap();
        assert_eq!(input.brand_keywords.len(), 2);
        assert_eq!(input.ranked_keywords.len(), 2);
        assert_eq!(input.avg_competitor_coverage, Some(12.5));
        assert_eq!(input.location.as_deref(), Some("United States"));
    }

    #[test]
    fn malformed_rows_clamp_instead_of_failing() {
        let input = parse(SNAPSHOT).unwrap();
        let bad = &input.ranked_keywords[1];
        assert_eq!(bad.search_volume, 0);
        assert_eq!(bad.position, None);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let input = parse("{}").unwrap();
        assert!(input.brand_keywords.is_empty());
        assert!(input.ranked_keywords.is_empty());
        assert_eq!(input.avg_competitor_coverage, None);
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn active_iterators_skip_discarded_rows() {
        let mut input = parse(SNAPSHOT).unwrap();
        input.ranked_keywords[0].is_discarded = true;
        assert_eq!(input.active_ranked().count(), 1);
        assert_eq!(input.discarded_ranked_count(), 1);
        assert_eq!(input.active_brands().count(), 2);
    }

    #[test]
    fn load_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();
        let input = load_file(file.path()).unwrap();
        assert_eq!(input.brand_keywords.len(), 2);
    }

    #[test]
    fn load_file_missing_path_is_io_error() {
        let err = load_file(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }
}
