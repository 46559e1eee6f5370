//! Property-based tests for chart data preparation.
//!
//! Values are whole numbers so that sums are exact regardless of the order
//! in which they are accumulated.

use fintrack_core::reports::{
    calculate_chart_domains, prepare_chart_data, tier_indicator_offset, ChartItem, ChartOptions,
    ChartRowKind, TierBand, OTHERS_ROW_ID, TOTAL_ROW_ID,
};
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

/// Generates a leaf chart item with a non-negative positive side and a
/// non-positive negative side.
fn arb_item() -> impl Strategy<Value = ChartItem> {
    ("[a-z]{1,8}", 0i32..100_000, 0i32..100_000).prop_map(|(label, pos, neg)| ChartItem {
        id: label.clone(),
        label,
        positive: f64::from(pos),
        negative: -f64::from(neg),
        children: vec![],
    })
}

/// Generates an item list with unique ids.
fn arb_items(max_count: usize) -> impl Strategy<Value = Vec<ChartItem>> {
    proptest::collection::vec(arb_item(), 0..=max_count).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, mut item)| {
                item.id = format!("{}-{}", item.id, i);
                item
            })
            .collect()
    })
}

fn arb_bands() -> impl Strategy<Value = Vec<TierBand>> {
    proptest::collection::vec(1i32..10_000, 1..8).prop_map(|widths| {
        let mut min = 0.0;
        let count = widths.len();
        widths
            .into_iter()
            .enumerate()
            .map(|(i, w)| {
                let max = min + f64::from(w);
                let band = TierBand {
                    label: format!("tier-{}", i),
                    min,
                    max: (i + 1 < count).then_some(max),
                };
                min = max;
                band
            })
            .collect()
    })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// More than `max_visible` items yield exactly `max_visible` originals
    /// plus one Others row holding the sums of the remainder.
    #[test]
    fn prop_others_bucket_sums_the_remainder(
        items in arb_items(30),
        max_visible in 1usize..10,
    ) {
        let options = ChartOptions { max_visible, ..ChartOptions::default() };
        let rows = prepare_chart_data(&items, &options);

        if items.len() > max_visible {
            prop_assert_eq!(rows.len(), max_visible + 1);
            for (row, item) in rows.iter().zip(&items) {
                prop_assert_eq!(&row.id, &item.id);
                prop_assert_eq!(row.kind, ChartRowKind::Item);
            }
            let others = &rows[max_visible];
            prop_assert_eq!(others.id.as_str(), OTHERS_ROW_ID);
            let rest = &items[max_visible..];
            prop_assert_eq!(others.positive, rest.iter().map(|i| i.positive).sum::<f64>());
            prop_assert_eq!(others.negative, rest.iter().map(|i| i.negative).sum::<f64>());
        } else {
            prop_assert_eq!(rows.len(), items.len());
            prop_assert!(rows.iter().all(|r| r.kind == ChartRowKind::Item));
        }
    }

    /// The total row sums every item and the visible rows plus Others add
    /// up to the same totals.
    #[test]
    fn prop_total_matches_visible_plus_others(items in arb_items(20)) {
        prop_assume!(!items.is_empty());
        let options = ChartOptions { include_total: true, ..ChartOptions::default() };
        let rows = prepare_chart_data(&items, &options);

        prop_assert_eq!(rows[0].id.as_str(), TOTAL_ROW_ID);
        let rest = &rows[1..];
        prop_assert_eq!(rows[0].positive, rest.iter().map(|r| r.positive).sum::<f64>());
        prop_assert_eq!(rows[0].negative, rest.iter().map(|r| r.negative).sum::<f64>());
    }

    /// Domains bracket every emitted value and always include zero.
    #[test]
    fn prop_domains_cover_all_rows(items in arb_items(20)) {
        let rows = prepare_chart_data(&items, &ChartOptions::default());
        let domain = calculate_chart_domains(&rows);

        prop_assert!(domain.min_negative <= 0.0);
        prop_assert!(domain.max_positive >= 0.0);
        prop_assert!(domain.min_negative < domain.max_positive);
        for row in &rows {
            prop_assert!(row.negative >= domain.min_negative);
            prop_assert!(row.positive <= domain.max_positive);
        }
    }

    /// The tier indicator never leaves the bar and never moves backwards as
    /// the value grows.
    #[test]
    fn prop_indicator_is_bounded_and_monotonic(
        bands in arb_bands(),
        a in 0i32..100_000,
        b in 0i32..100_000,
        width in 50i32..2000,
    ) {
        let width = f64::from(width);
        let (low, high) = (f64::from(a.min(b)), f64::from(a.max(b)));
        let low_offset = tier_indicator_offset(low, &bands, width);
        let high_offset = tier_indicator_offset(high, &bands, width);

        prop_assert!((0.0..=width).contains(&low_offset));
        prop_assert!((0.0..=width).contains(&high_offset));
        prop_assert!(low_offset <= high_offset);
    }
}
