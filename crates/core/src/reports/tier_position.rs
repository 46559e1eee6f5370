//! Placement of the "you are here" marker on the tier progress bar.
//!
//! The bar is split into equal-width bands, one per tier, regardless of how
//! wide each tier's value range is. The marker sits at its band's index plus
//! the fraction of the band's value range already covered.

use serde::{Deserialize, Serialize};

/// Value range of one tier. An absent `max` marks the open-ended top tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBand {
    pub label: String,
    pub min: f64,
    pub max: Option<f64>,
}

/// Horizontal correction in pixels keyed by band count. The marker is drawn
/// from its left edge, so it is pulled back by roughly half its width, a
/// little more on dense bars where the band labels sit closer together.
const OFFSET_CORRECTIONS: [f64; 5] = [0.0, -6.0, -8.0, -10.0, -12.0];
const DENSE_OFFSET_CORRECTION: f64 = -14.0;

fn offset_correction(band_count: usize) -> f64 {
    OFFSET_CORRECTIONS
        .get(band_count)
        .copied()
        .unwrap_or(DENSE_OFFSET_CORRECTION)
}

/// Value span of band `index`. The open-ended last band borrows the span of
/// the band before it; a lone open-ended band has no span.
fn band_span(bands: &[TierBand], index: usize) -> Option<f64> {
    let band = &bands[index];
    match band.max {
        Some(max) => Some(max - band.min),
        None if index > 0 => {
            let previous = &bands[index - 1];
            Some(previous.max.unwrap_or(band.min) - previous.min)
        }
        None => None,
    }
}

/// Pixel offset of the indicator for `current` on a bar `width` pixels wide.
///
/// `bands` must be ordered by `min`. Values below the first band sit at the
/// start of the bar; the result is always within `[0, width]`.
pub fn tier_indicator_offset(current: f64, bands: &[TierBand], width: f64) -> f64 {
    if bands.is_empty() || !width.is_finite() || width <= 0.0 || !current.is_finite() {
        return 0.0;
    }
    let Some(index) = bands.iter().rposition(|b| current >= b.min) else {
        return 0.0;
    };

    // Without a span the marker stays at the start of its band.
    let fraction = match band_span(bands, index) {
        Some(span) if span > 0.0 => ((current - bands[index].min) / span).clamp(0.0, 1.0),
        Some(_) => 1.0,
        None => 0.0,
    };
    let band_width = width / bands.len() as f64;
    let raw = (index as f64 + fraction) * band_width + offset_correction(bands.len());
    raw.clamp(0.0, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(min: f64, max: Option<f64>) -> TierBand {
        TierBand {
            label: format!("{}", min),
            min,
            max,
        }
    }

    fn ladder() -> Vec<TierBand> {
        vec![
            band(0.0, Some(1000.0)),
            band(1000.0, Some(5000.0)),
            band(5000.0, None),
        ]
    }

    #[test]
    fn test_offset_within_bands() {
        let bands = ladder();
        // Halfway through the second of three 100px bands, minus the correction.
        assert_eq!(tier_indicator_offset(3000.0, &bands, 300.0), 150.0 - 10.0);
        // Start of the second band.
        assert_eq!(tier_indicator_offset(1000.0, &bands, 300.0), 100.0 - 10.0);
    }

    #[test]
    fn test_open_band_borrows_previous_span() {
        let bands = ladder();
        // 5000 + 4000 / 4000 wide = full last band.
        assert_eq!(tier_indicator_offset(9000.0, &bands, 300.0), 300.0 - 10.0);
        // 7000 is halfway.
        assert_eq!(tier_indicator_offset(7000.0, &bands, 300.0), 250.0 - 10.0);
    }

    #[test]
    fn test_lone_open_band_keeps_marker_at_its_start() {
        for min in [0.0, 1000.0] {
            let single = vec![band(min, None)];
            assert_eq!(tier_indicator_offset(min + 500.0, &single, 100.0), 0.0);
            assert_eq!(tier_indicator_offset(1e9, &single, 100.0), 0.0);
        }

        // After a closed band the open band borrows its span again.
        let two = vec![band(0.0, Some(100.0)), band(100.0, None)];
        assert_eq!(tier_indicator_offset(150.0, &two, 200.0), 150.0 - 8.0);
    }

    #[test]
    fn test_clamped_to_bar() {
        let bands = ladder();
        assert_eq!(tier_indicator_offset(0.0, &bands, 300.0), 0.0);
        assert_eq!(tier_indicator_offset(-50.0, &bands, 300.0), 0.0);
        assert_eq!(tier_indicator_offset(1e12, &bands, 300.0), 290.0);
        assert_eq!(tier_indicator_offset(10.0, &[], 300.0), 0.0);
        assert_eq!(tier_indicator_offset(10.0, &bands, 0.0), 0.0);
    }

    #[test]
    fn test_correction_depends_on_band_count() {
        let many: Vec<_> = (0..8)
            .map(|i| band(i as f64 * 10.0, Some((i + 1) as f64 * 10.0)))
            .collect();
        assert_eq!(tier_indicator_offset(40.0, &many, 800.0), 400.0 - 14.0);
        let single = vec![band(0.0, Some(10.0))];
        assert_eq!(tier_indicator_offset(5.0, &single, 100.0), 50.0 - 6.0);
    }
}
