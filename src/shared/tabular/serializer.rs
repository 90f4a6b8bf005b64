use serde_json::{Map, Value};

use super::table::Table;

/// Column name to the column's values, in column order.
///
/// Values keep their JSON type; NaN and ±Infinity are emitted as null.
pub fn to_columnar_json(table: &Table) -> Map<String, Value> {
    table
        .columns()
        .iter()
        .map(|column| {
            let values = column.values.iter().map(|v| v.to_json()).collect();
            (column.name.clone(), Value::Array(values))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::tabular::{CellValue, Column, DType};
    use serde_json::json;

    #[test]
    fn test_non_finite_values_serialize_as_null() {
        let table = Table::from_columns(vec![Column::new(
            "x",
            DType::Float64,
            vec![
                CellValue::Float(1.0),
                CellValue::Float(f64::NAN),
                CellValue::Float(f64::INFINITY),
                CellValue::Float(f64::NEG_INFINITY),
                CellValue::Float(2.0),
            ],
        )]);

        let json = Value::Object(to_columnar_json(&table));
        assert_eq!(json, json!({ "x": [1.0, null, null, null, 2.0] }));
    }

    #[test]
    fn test_column_order_and_types_are_kept() {
        let table = Table::from_columns(vec![
            Column::new("z", DType::Object, vec![CellValue::Text("a".into()), CellValue::Null]),
            Column::new("a", DType::Int64, vec![CellValue::Int(1), CellValue::Int(2)]),
            Column::new("m", DType::Bool, vec![CellValue::Bool(true), CellValue::Bool(false)]),
        ]);

        let serialized = serde_json::to_string(&to_columnar_json(&table)).unwrap();
        assert_eq!(serialized, r#"{"z":["a",null],"a":[1,2],"m":[true,false]}"#);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::from_columns(vec![Column::new("a", DType::Object, vec![])]);
        assert_eq!(Value::Object(to_columnar_json(&table)), json!({ "a": [] }));
    }
}
