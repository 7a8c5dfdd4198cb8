//! Headline share metrics: Share of Search, Share of Voice, Growth Gap.
//!
//! All percentages are in points (0..=100) at one decimal of precision.
//! Zero denominators yield 0.0 with `has_data = false` so callers can tell
//! "no market tracked" apart from "we capture none of it".

use serde::{Deserialize, Serialize};

use crate::ctr;
use crate::model::{BrandKeyword, RankedKeyword};

/// Gap beyond which SOV/SOS divergence stops counting as balanced. A fixed
/// property of the metric, not a tunable.
const GAP_THRESHOLD: f64 = 2.0;

/// Brand-name demand you own, as a share of all tracked brand demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareOfSearch {
    pub percentage: f64,
    pub own_volume: u64,
    pub total_volume: u64,
    /// Non-discarded rows that entered the denominator.
    pub keyword_count: usize,
    pub has_data: bool,
}

/// CTR-weighted clicks captured, as a share of addressable organic volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareOfVoice {
    pub percentage: f64,
    pub visible_volume: u64,
    pub total_volume: u64,
    pub keyword_count: usize,
    pub has_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthGap {
    /// SOV minus SOS, percentage points.
    pub gap: f64,
    pub classification: GapClassification,
    pub has_data: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapClassification {
    GrowthPotential,
    MissingOpportunities,
    Balanced,
}

impl GapClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            GapClassification::GrowthPotential => "growth_potential",
            GapClassification::MissingOpportunities => "missing_opportunities",
            GapClassification::Balanced => "balanced",
        }
    }
}

pub fn share_of_search(keywords: &[BrandKeyword]) -> ShareOfSearch {
    let mut own_volume = 0u64;
    let mut total_volume = 0u64;
    let mut keyword_count = 0usize;

    for kw in keywords.iter().filter(|k| !k.is_discarded) {
        keyword_count += 1;
        total_volume += kw.search_volume;
        if kw.is_own_brand {
            own_volume += kw.search_volume;
        }
    }

    let has_data = total_volume > 0;
    let percentage = if has_data {
        round1(own_volume as f64 / total_volume as f64 * 100.0)
    } else {
        0.0
    };

    ShareOfSearch {
        percentage,
        own_volume,
        total_volume,
        keyword_count,
        has_data,
    }
}

pub fn share_of_voice(keywords: &[RankedKeyword]) -> ShareOfVoice {
    let mut visible_volume = 0u64;
    let mut total_volume = 0u64;
    let mut keyword_count = 0usize;

    for kw in keywords.iter().filter(|k| !k.is_discarded) {
        keyword_count += 1;
        total_volume += kw.search_volume;
        visible_volume += ctr::visible_volume(kw.search_volume, kw.position);
    }

    let has_data = total_volume > 0;
    let percentage = if has_data {
        round1(visible_volume as f64 / total_volume as f64 * 100.0)
    } else {
        0.0
    };

    ShareOfVoice {
        percentage,
        visible_volume,
        total_volume,
        keyword_count,
        has_data,
    }
}

/// Positive gap: organic visibility outruns brand awareness. Negative: brand
/// demand exists that rankings fail to capture.
pub fn growth_gap(sos: &ShareOfSearch, sov: &ShareOfVoice) -> GrowthGap {
    let gap = round1(sov.percentage - sos.percentage);
    let classification = if gap > GAP_THRESHOLD {
        GapClassification::GrowthPotential
    } else if gap < -GAP_THRESHOLD {
        GapClassification::MissingOpportunities
    } else {
        GapClassification::Balanced
    };

    GrowthGap {
        gap,
        classification,
        has_data: sos.has_data || sov.has_data,
    }
}

/// Round to one decimal place, the precision every share metric reports.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
