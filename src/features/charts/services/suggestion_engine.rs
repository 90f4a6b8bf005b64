//! Chart suggestions derived from column types
//!
//! Pure function of the table: the same file always yields the same suggestions in the
//! same order.

use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::features::charts::dtos::ChartSuggestion;
use crate::shared::constants::{DOUGHNUT_TOP_GROUPS, RADAR_MAX_COLUMNS, RADAR_MIN_COLUMNS};
use crate::shared::tabular::{CellValue, Column, DType, Table};

/// Suggest charts for a table.
///
/// Rules apply in a fixed order: pairwise charts on the first two numeric columns, bar
/// and doughnut on the first categorical/numeric pair, one histogram per numeric column,
/// a radar of means, a bubble on the first three numeric columns, one box plot per
/// numeric column.
pub fn suggest_charts(table: &Table) -> Vec<ChartSuggestion> {
    let (numeric, categorical) = table.partition_columns();
    let mut suggestions = Vec::new();

    if let [x, y, ..] = numeric.as_slice() {
        let (x, y) = (x.name.clone(), y.name.clone());
        suggestions.push(ChartSuggestion::Line {
            title: format!("Line: {} vs {}", y, x),
            x: x.clone(),
            y: y.clone(),
        });
        suggestions.push(ChartSuggestion::Scatter {
            title: format!("Scatter: {} vs {}", y, x),
            x: x.clone(),
            y: y.clone(),
        });
        suggestions.push(ChartSuggestion::Area {
            title: format!("Area: {} vs {}", y, x),
            x,
            y,
        });
    }

    if let (Some(num), Some(cat)) = (numeric.first(), categorical.first()) {
        suggestions.push(ChartSuggestion::Bar {
            x: cat.name.clone(),
            y: num.name.clone(),
            title: format!("Bar: {} by {}", num.name, cat.name),
        });

        let (labels, values): (Vec<Value>, Vec<Value>) =
            top_groups(cat, num, DOUGHNUT_TOP_GROUPS)
                .into_iter()
                .unzip();
        suggestions.push(ChartSuggestion::Doughnut {
            labels,
            values,
            title: format!("Top {} {} by {}", DOUGHNUT_TOP_GROUPS, cat.name, num.name),
        });
    }

    for column in &numeric {
        suggestions.push(ChartSuggestion::Histogram {
            x: column.name.clone(),
            title: format!("Histogram: {}", column.name),
        });
    }

    if (RADAR_MIN_COLUMNS..=RADAR_MAX_COLUMNS).contains(&numeric.len()) {
        let labels: Vec<String> = numeric.iter().map(|c| c.name.clone()).collect();
        suggestions.push(ChartSuggestion::Radar {
            title: format!("Radar: Means of {}", labels.join(", ")),
            values: numeric.iter().map(|c| c.mean()).collect(),
            labels,
        });
    }

    if let [x, y, r, ..] = numeric.as_slice() {
        suggestions.push(ChartSuggestion::Bubble {
            x: x.name.clone(),
            y: y.name.clone(),
            r: r.name.clone(),
            title: format!("Bubble: {} vs {} (size: {})", y.name, x.name, r.name),
        });
    }

    for column in &numeric {
        suggestions.push(ChartSuggestion::Box {
            x: column.name.clone(),
            title: format!("Box Plot: {}", column.name),
        });
    }

    suggestions
}

/// Running total of one group; integer columns keep integer sums
struct GroupSum {
    label: Value,
    int_sum: i64,
    float_sum: f64,
}

impl GroupSum {
    fn add(&mut self, value: &CellValue) {
        match value {
            CellValue::Int(v) => {
                self.int_sum = self.int_sum.saturating_add(*v);
                self.float_sum += *v as f64;
            }
            other => {
                if let Some(v) = other.as_f64().filter(|v| !v.is_nan()) {
                    self.float_sum += v;
                }
            }
        }
    }

    fn value(&self, dtype: DType) -> Value {
        match dtype {
            DType::Int64 => Value::from(self.int_sum),
            _ => Number::from_f64(self.float_sum).map_or(Value::Null, Value::Number),
        }
    }
}

/// Sum `values` grouped by `keys`, largest first, keeping at most `limit` groups.
///
/// Missing keys are dropped. Ties keep the order in which groups were first seen.
fn top_groups(keys: &Column, values: &Column, limit: usize) -> Vec<(Value, Value)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupSum> = Vec::new();

    for (key, value) in keys.values.iter().zip(&values.values) {
        if key.is_missing() {
            continue;
        }

        let label = key.to_json();
        let slot = *index.entry(label.to_string()).or_insert_with(|| {
            groups.push(GroupSum {
                label,
                int_sum: 0,
                float_sum: 0.0,
            });
            groups.len() - 1
        });
        groups[slot].add(value);
    }

    // sort_by is stable, so equal sums stay in first-seen order
    groups.sort_by(|a, b| {
        b.float_sum
            .partial_cmp(&a.float_sum)
            .unwrap_or(Ordering::Equal)
    });

    groups
        .into_iter()
        .take(limit)
        .map(|group| {
            let value = group.value(values.dtype);
            (group.label, value)
        })
        .collect()
}
