use chrono::NaiveDateTime;
use serde_json::Value;
use std::fmt;

/// Format used when a date-time cell leaves the process (JSON, prompts)
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Inferred storage type of a column.
///
/// Labels follow the conventional dataframe names (`int64`, `float64`, ...) because they
/// are persisted in file metadata and shown to users as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Int64,
    Float64,
    Bool,
    DateTime,
    Object,
}

impl DType {
    pub fn label(&self) -> &'static str {
        match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::DateTime => "datetime64[ns]",
            DType::Object => "object",
        }
    }

    /// Integer and floating-point columns count as numeric; everything else is categorical
    pub fn is_numeric(&self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single cell of a loaded table
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Text(String),
}

impl CellValue {
    /// Numeric view of the cell; NaN is returned as-is
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Null, or a float NaN
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// JSON representation. NaN and ±Infinity have no JSON form and become null.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Int(i) => Value::from(*i),
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::DateTime(dt) => Value::String(dt.format(DATETIME_FORMAT).to_string()),
            CellValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NaN"),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) if v.is_nan() => f.write_str("NaN"),
            CellValue::Float(v) if v.is_infinite() => {
                f.write_str(if *v > 0.0 { "inf" } else { "-inf" })
            }
            // Keep a trailing ".0" on integral floats so they read as floats
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e16 => write!(f, "{:.1}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// A named, typed column. All columns of a table have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: DType, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Non-missing numeric values in row order
    pub fn numeric_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .filter_map(CellValue::as_f64)
            .filter(|v| !v.is_nan())
    }

    /// Arithmetic mean of the non-missing values; None when there are none
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .numeric_values()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        (count > 0).then(|| sum / count as f64)
    }
}

/// In-memory, column-oriented view of an uploaded file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Build a table from row-aligned columns.
    ///
    /// Columns shorter than the longest one are padded with nulls.
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let num_rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for column in &mut columns {
            column.values.resize(num_rows, CellValue::Null);
        }
        Self { columns, num_rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Numeric and categorical columns, each in table order
    pub fn partition_columns(&self) -> (Vec<&Column>, Vec<&Column>) {
        self.columns.iter().partition(|c| c.dtype.is_numeric())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_labels() {
        assert_eq!(DType::Int64.label(), "int64");
        assert_eq!(DType::Float64.label(), "float64");
        assert_eq!(DType::DateTime.to_string(), "datetime64[ns]");
        assert!(DType::Float64.is_numeric());
        assert!(!DType::Bool.is_numeric());
        assert!(!DType::Object.is_numeric());
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        assert_eq!(CellValue::Float(f64::NAN).to_json(), Value::Null);
        assert_eq!(CellValue::Float(f64::INFINITY).to_json(), Value::Null);
        assert_eq!(CellValue::Float(f64::NEG_INFINITY).to_json(), Value::Null);
        assert_eq!(CellValue::Float(1.5).to_json(), serde_json::json!(1.5));
        assert_eq!(CellValue::Int(3).to_json(), serde_json::json!(3));
    }

    #[test]
    fn test_mean_skips_missing() {
        let column = Column::new(
            "score",
            DType::Float64,
            vec![
                CellValue::Float(1.0),
                CellValue::Float(f64::NAN),
                CellValue::Float(3.0),
            ],
        );
        assert_eq!(column.mean(), Some(2.0));

        let empty = Column::new("none", DType::Float64, vec![CellValue::Float(f64::NAN)]);
        assert_eq!(empty.mean(), None);
    }

    #[test]
    fn test_from_columns_pads_short_columns() {
        let table = Table::from_columns(vec![
            Column::new("a", DType::Int64, vec![CellValue::Int(1), CellValue::Int(2)]),
            Column::new("b", DType::Object, vec![CellValue::Text("x".into())]),
        ]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.columns()[1].values[1], CellValue::Null);
    }

    #[test]
    fn test_partition_preserves_order() {
        let table = Table::from_columns(vec![
            Column::new("city", DType::Object, vec![]),
            Column::new("b", DType::Float64, vec![]),
            Column::new("flag", DType::Bool, vec![]),
            Column::new("a", DType::Int64, vec![]),
        ]);
        let (numeric, categorical) = table.partition_columns();
        let numeric: Vec<_> = numeric.iter().map(|c| c.name.as_str()).collect();
        let categorical: Vec<_> = categorical.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(numeric, vec!["b", "a"]);
        assert_eq!(categorical, vec!["city", "flag"]);
    }

    #[test]
    fn test_display_matches_preview_style() {
        assert_eq!(CellValue::Float(2.0).to_string(), "2.0");
        assert_eq!(CellValue::Float(2.25).to_string(), "2.25");
        assert_eq!(CellValue::Null.to_string(), "NaN");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
    }
}
