//! Position-based click-through model.
//!
//! Maps an organic ranking position to the share of searches expected to
//! click through, and from there to "visible volume", the engine's common
//! currency for weighing keywords against each other.

/// Click-through rate for positions 1..=20. Positions beyond the table and
/// unranked keywords get [`TAIL_CTR`].
const CTR_BY_POSITION: [f64; 20] = [
    0.28, 0.15, 0.09, 0.06, 0.04, 0.03, 0.025, 0.02, 0.018, 0.015, 0.012, 0.010, 0.008, 0.007,
    0.006, 0.005, 0.004, 0.003, 0.002, 0.0015,
];

/// Residual click-through for unranked keywords and anything past position 20.
pub const TAIL_CTR: f64 = 0.001;

/// Expected click-through rate at the given organic position. Unranked
/// keywords share the tail rate with deep positions.
pub fn ctr_at(position: Option<u32>) -> f64 {
    match position {
        Some(p) if (1..=CTR_BY_POSITION.len() as u32).contains(&p) => {
            CTR_BY_POSITION[p as usize - 1]
        }
        _ => TAIL_CTR,
    }
}

/// Estimated clicks a keyword captures at a position, rounded to whole
/// searches.
pub fn visible_volume(search_volume: u64, position: Option<u32>) -> u64 {
    (search_volume as f64 * ctr_at(position)).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_position_captures_28_percent() {
        assert_eq!(ctr_at(Some(1)), 0.28);
        assert_eq!(visible_volume(1000, Some(1)), 280);
    }

    #[test]
    fn deep_positions_fall_back_to_tail_rate() {
        assert_eq!(ctr_at(Some(25)), TAIL_CTR);
        assert_eq!(visible_volume(1000, Some(25)), 1);
    }

    #[test]
    fn unranked_keywords_fall_back_to_tail_rate() {
        assert_eq!(ctr_at(None), TAIL_CTR);
        assert_eq!(visible_volume(1000, None), 1);
        assert_eq!(visible_volume(50_000, None), 50);
    }

    #[test]
    fn table_boundary_positions() {
        assert_eq!(ctr_at(Some(20)), 0.0015);
        assert_eq!(ctr_at(Some(21)), TAIL_CTR);
    }

    #[test]
    fn curve_never_increases_with_depth() {
        let mut prev = ctr_at(Some(1));
        for pos in 2..=30 {
            let cur = ctr_at(Some(pos));
            assert!(cur <= prev, "ctr rose between {} and {}", pos - 1, pos);
            prev = cur;
        }
    }

    #[test]
    fn rounding_is_to_nearest_click() {
        // 100 * 0.025 = 2.5 rounds up.
        assert_eq!(visible_volume(100, Some(7)), 3);
        // 100 * 0.0015 = 0.15 rounds to zero clicks.
        assert_eq!(visible_volume(100, Some(20)), 0);
        assert_eq!(visible_volume(0, Some(1)), 0);
    }
}
