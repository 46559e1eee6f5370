//! Data preparation for the two-sided (income above, expense below) bar
//! charts.
//!
//! Long lists are cut after `max_visible` items with the remainder folded
//! into one "Others" row. Rows whose id is in the expansion set are followed
//! by their children, recursively, so the chart can drill down in place.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Row id of the aggregated remainder.
pub const OTHERS_ROW_ID: &str = "__others__";
/// Row id of the grand total.
pub const TOTAL_ROW_ID: &str = "__total__";

pub const DEFAULT_MAX_VISIBLE: usize = 5;

/// One input series entry. `negative` holds values at or below zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartItem {
    pub id: String,
    pub label: String,
    pub positive: f64,
    pub negative: f64,
    #[serde(default)]
    pub children: Vec<ChartItem>,
}

impl ChartItem {
    /// Total height of the bar, used for ordering.
    pub fn magnitude(&self) -> f64 {
        self.positive.abs() + self.negative.abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartRowKind {
    Item,
    Others,
    Total,
}

/// A row ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow {
    pub id: String,
    pub label: String,
    pub positive: f64,
    pub negative: f64,
    pub kind: ChartRowKind,
    pub depth: u32,
    pub parent_id: Option<String>,
    pub has_children: bool,
    pub is_expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    pub max_visible: usize,
    pub include_total: bool,
    pub total_label: String,
    pub others_label: String,
    /// Ids of rows whose children are shown. `__others__` expands the
    /// remainder bucket.
    pub expanded: HashSet<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            max_visible: DEFAULT_MAX_VISIBLE,
            include_total: false,
            total_label: "Total".to_string(),
            others_label: "Others".to_string(),
            expanded: HashSet::new(),
        }
    }
}

/// Axis bounds for a two-sided chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDomain {
    pub min_negative: f64,
    pub max_positive: f64,
}

impl Default for ChartDomain {
    fn default() -> Self {
        Self {
            min_negative: -1.0,
            max_positive: 1.0,
        }
    }
}

fn sums<'a>(items: impl IntoIterator<Item = &'a ChartItem>) -> (f64, f64) {
    items
        .into_iter()
        .fold((0.0, 0.0), |(pos, neg), item| (pos + item.positive, neg + item.negative))
}

/// Flattens `items` into rows at `depth`, descending into the children of
/// expanded items.
pub fn build_processed_data(
    items: &[ChartItem],
    expanded: &HashSet<String>,
    depth: u32,
    parent_id: Option<&str>,
) -> Vec<ChartRow> {
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let has_children = !item.children.is_empty();
        let is_expanded = has_children && expanded.contains(&item.id);
        rows.push(ChartRow {
            id: item.id.clone(),
            label: item.label.clone(),
            positive: item.positive,
            negative: item.negative,
            kind: ChartRowKind::Item,
            depth,
            parent_id: parent_id.map(str::to_string),
            has_children,
            is_expanded,
        });
        if is_expanded {
            rows.extend(build_processed_data(
                &item.children,
                expanded,
                depth + 1,
                Some(&item.id),
            ));
        }
    }
    rows
}

/// Turns a sorted item list into chart rows.
///
/// With `include_total` a total row over every item comes first. When there
/// are more than `max_visible` items the first `max_visible` are kept and the
/// rest collapse into a single Others row carrying their summed values.
pub fn prepare_chart_data(items: &[ChartItem], options: &ChartOptions) -> Vec<ChartRow> {
    let mut rows = Vec::new();
    if items.is_empty() {
        return rows;
    }

    if options.include_total {
        let (positive, negative) = sums(items);
        rows.push(ChartRow {
            id: TOTAL_ROW_ID.to_string(),
            label: options.total_label.clone(),
            positive,
            negative,
            kind: ChartRowKind::Total,
            depth: 0,
            parent_id: None,
            has_children: false,
            is_expanded: false,
        });
    }

    let split = items.len().min(options.max_visible);
    let (visible, rest) = items.split_at(split);
    rows.extend(build_processed_data(visible, &options.expanded, 0, None));

    if !rest.is_empty() {
        let (positive, negative) = sums(rest);
        let is_expanded = options.expanded.contains(OTHERS_ROW_ID);
        rows.push(ChartRow {
            id: OTHERS_ROW_ID.to_string(),
            label: options.others_label.clone(),
            positive,
            negative,
            kind: ChartRowKind::Others,
            depth: 0,
            parent_id: None,
            has_children: true,
            is_expanded,
        });
        if is_expanded {
            rows.extend(build_processed_data(
                rest,
                &options.expanded,
                1,
                Some(OTHERS_ROW_ID),
            ));
        }
    }
    rows
}

/// Axis bounds covering every row: the smallest negative and the largest
/// positive value, each anchored at zero. `{-1, 1}` when there is nothing
/// to draw.
pub fn calculate_chart_domains(rows: &[ChartRow]) -> ChartDomain {
    let (min_negative, max_positive) = rows.iter().fold((0.0_f64, 0.0_f64), |(min, max), row| {
        (min.min(row.negative), max.max(row.positive))
    });
    if min_negative == 0.0 && max_positive == 0.0 {
        return ChartDomain::default();
    }
    ChartDomain {
        min_negative,
        max_positive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, positive: f64, negative: f64) -> ChartItem {
        ChartItem {
            id: id.to_string(),
            label: id.to_uppercase(),
            positive,
            negative,
            children: vec![],
        }
    }

    #[test]
    fn test_short_list_has_no_others() {
        let items = vec![item("a", 1.0, 0.0), item("b", 0.0, -2.0)];
        let rows = prepare_chart_data(&items, &ChartOptions::default());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.kind == ChartRowKind::Item));
    }

    #[test]
    fn test_others_collects_the_tail() {
        let items: Vec<_> = (0..8)
            .map(|i| item(&format!("c{}", i), i as f64, -(i as f64) / 2.0))
            .collect();
        let rows = prepare_chart_data(&items, &ChartOptions::default());
        assert_eq!(rows.len(), 6);
        let others = &rows[5];
        assert_eq!(others.id, OTHERS_ROW_ID);
        assert_eq!(others.label, "Others");
        assert_eq!(others.positive, 5.0 + 6.0 + 7.0);
        assert_eq!(others.negative, -9.0);
        assert!(!others.is_expanded);
    }

    #[test]
    fn test_total_row_comes_first() {
        let items = vec![item("a", 3.0, -1.0), item("b", 2.0, -4.0)];
        let options = ChartOptions {
            include_total: true,
            ..ChartOptions::default()
        };
        let rows = prepare_chart_data(&items, &options);
        assert_eq!(rows[0].kind, ChartRowKind::Total);
        assert_eq!(rows[0].positive, 5.0);
        assert_eq!(rows[0].negative, -5.0);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_expansion_is_recursive_and_tagged() {
        let mut food = item("food", 0.0, -10.0);
        let mut groceries = item("groceries", 0.0, -7.0);
        groceries.children = vec![item("veg", 0.0, -2.0)];
        food.children = vec![groceries, item("dining", 0.0, -3.0)];
        let items = vec![food, item("rent", 0.0, -20.0)];

        let collapsed = prepare_chart_data(&items, &ChartOptions::default());
        assert_eq!(collapsed.len(), 2);
        assert!(collapsed[0].has_children);

        let options = ChartOptions {
            expanded: ["food", "groceries"].iter().map(|s| s.to_string()).collect(),
            ..ChartOptions::default()
        };
        let rows = prepare_chart_data(&items, &options);
        let shape: Vec<_> = rows
            .iter()
            .map(|r| (r.id.as_str(), r.depth, r.parent_id.as_deref()))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("food", 0, None),
                ("groceries", 1, Some("food")),
                ("veg", 2, Some("groceries")),
                ("dining", 1, Some("food")),
                ("rent", 0, None),
            ]
        );
    }

    #[test]
    fn test_expanding_others_lists_the_tail() {
        let items: Vec<_> = (0..7).map(|i| item(&format!("c{}", i), 1.0, 0.0)).collect();
        let options = ChartOptions {
            max_visible: 5,
            expanded: [OTHERS_ROW_ID.to_string()].into_iter().collect(),
            ..ChartOptions::default()
        };
        let rows = prepare_chart_data(&items, &options);
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[6].parent_id.as_deref(), Some(OTHERS_ROW_ID));
        assert_eq!(rows[6].depth, 1);
    }

    #[test]
    fn test_domains() {
        assert_eq!(calculate_chart_domains(&[]), ChartDomain::default());

        let rows = prepare_chart_data(
            &[item("a", 4.0, -1.0), item("b", 2.5, -6.0)],
            &ChartOptions::default(),
        );
        let domain = calculate_chart_domains(&rows);
        assert_eq!(domain.min_negative, -6.0);
        assert_eq!(domain.max_positive, 4.0);

        let flat = prepare_chart_data(&[item("z", 0.0, 0.0)], &ChartOptions::default());
        assert_eq!(calculate_chart_domains(&flat), ChartDomain::default());
    }
}
