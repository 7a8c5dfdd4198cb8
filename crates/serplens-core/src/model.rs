use serde::{Deserialize, Deserializer, Serialize};

/// A brand-name search term tracked for Share of Search.
///
/// `is_discarded` is a user-controlled soft delete: the row stays in the set
/// for audit/export but contributes zero volume to every aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandKeyword {
    pub keyword: String,
    #[serde(deserialize_with = "de_volume")]
    pub search_volume: u64,
    #[serde(default)]
    pub is_own_brand: bool,
    #[serde(default)]
    pub is_discarded: bool,
}

impl BrandKeyword {
    pub fn new(keyword: impl Into<String>, search_volume: u64, is_own_brand: bool) -> Self {
        Self {
            keyword: keyword.into(),
            search_volume,
            is_own_brand,
            is_discarded: false,
        }
    }
}

/// One ranking result for the analyzed domain.
///
/// `position` is the organic rank (1-based); `None` means the domain does not
/// currently rank for the keyword. Provider-supplied `category`,
/// `keyword_difficulty` and `search_intent` are optional enrichments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedKeyword {
    pub keyword: String,
    #[serde(deserialize_with = "de_volume")]
    pub search_volume: u64,
    #[serde(default, deserialize_with = "de_position")]
    pub position: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de_difficulty")]
    pub keyword_difficulty: Option<f64>,
    #[serde(default)]
    pub search_intent: Option<SearchIntent>,
    /// Demand trend as a percent change; positive means rising interest.
    #[serde(default)]
    pub trend: Option<f64>,
    #[serde(default)]
    pub is_discarded: bool,
}

impl RankedKeyword {
    pub fn new(keyword: impl Into<String>, search_volume: u64, position: Option<u32>) -> Self {
        Self {
            keyword: keyword.into(),
            search_volume,
            position,
            url: None,
            category: None,
            keyword_difficulty: None,
            search_intent: None,
            trend: None,
            is_discarded: false,
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.position.is_some()
    }

    /// Estimated clicks this row captures at its current position.
    pub fn visible_volume(&self) -> u64 {
        crate::ctr::visible_volume(self.search_volume, self.position)
    }

    /// Funnel stage for this keyword. A provider-supplied stage wins; otherwise
    /// the main intent is mapped, defaulting to awareness so no keyword drops
    /// out of funnel aggregates.
    pub fn funnel_stage(&self) -> FunnelStage {
        match &self.search_intent {
            Some(intent) => intent
                .funnel_stage
                .unwrap_or_else(|| crate::classify::funnel_stage(intent.main_intent)),
            None => FunnelStage::Awareness,
        }
    }
}

/// Provider-classified search intent for a keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIntent {
    pub main_intent: Intent,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub funnel_stage: Option<FunnelStage>,
}

impl SearchIntent {
    pub fn new(main_intent: Intent, probability: f64) -> Self {
        Self {
            main_intent,
            probability,
            funnel_stage: None,
        }
    }
}

/// Search intent taxonomy. Unrecognized provider values deserialize to
/// `Unknown` instead of failing the whole snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Informational,
    Navigational,
    Commercial,
    Transactional,
    #[serde(other)]
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Informational => "informational",
            Intent::Navigational => "navigational",
            Intent::Commercial => "commercial",
            Intent::Transactional => "transactional",
            Intent::Unknown => "unknown",
        }
    }
}

/// Coarse buyer-journey bucket derived from search intent. Declaration order
/// is journey order, which `Ord` relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelStage {
    Awareness,
    Consideration,
    Decision,
}

impl FunnelStage {
    /// Fixed rendering order for funnel reports.
    pub const ALL: [FunnelStage; 3] = [
        FunnelStage::Awareness,
        FunnelStage::Consideration,
        FunnelStage::Decision,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FunnelStage::Awareness => "awareness",
            FunnelStage::Consideration => "consideration",
            FunnelStage::Decision => "decision",
        }
    }
}

/// Accept any numeric volume and clamp garbage (negative, NaN) to zero so one
/// malformed row never aborts the whole analysis.
fn de_volume<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(de)?;
    if raw.is_finite() && raw > 0.0 {
        Ok(raw.round() as u64)
    } else {
        Ok(0)
    }
}

/// Positions below 1 are contract violations; treat them as unranked rather
/// than inventing a top rank.
fn de_position<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(de)?;
    Ok(raw
        .filter(|p| *p >= 1)
        .map(|p| p.min(i64::from(u32::MAX)) as u32))
}

fn de_difficulty<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(de)?;
    Ok(raw
        .filter(|kd| kd.is_finite())
        .map(|kd| kd.clamp(0.0, 100.0)))
}
