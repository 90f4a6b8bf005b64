use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use super::table::{CellValue, Column, DType, Table};
use super::TableError;

/// Cell texts treated as missing values
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "<NA>",
];

const TRUE_LITERALS: &[&str] = &["True", "TRUE", "true"];
const FALSE_LITERALS: &[&str] = &["False", "FALSE", "false"];

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Excel,
}

impl TableFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(TableFormat::Csv),
            "xls" | "xlsx" => Some(TableFormat::Excel),
            _ => None,
        }
    }
}

/// Load a stored upload into a typed table.
///
/// The first row is the header. The extension (without the dot, any case) selects the
/// parser; anything other than csv/xls/xlsx fails before the file is touched.
pub fn load_table(path: &Path, extension: &str) -> Result<Table, TableError> {
    let format = TableFormat::from_extension(extension)
        .ok_or_else(|| TableError::UnsupportedFileType(extension.to_string()))?;

    if !path.is_file() {
        return Err(TableError::FileNotFound(path.to_path_buf()));
    }

    let table = match format {
        TableFormat::Csv => read_csv(path)?,
        TableFormat::Excel => read_excel(path)?,
    };

    tracing::debug!(
        path = %path.display(),
        columns = table.columns().len(),
        rows = table.num_rows(),
        "Loaded table"
    );

    Ok(table)
}

fn read_csv(path: &Path) -> Result<Table, TableError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TableError::FileNotFound(path.to_path_buf()),
        _ => TableError::Io(e),
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));
    let mut records = reader.byte_records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(TableError::Empty),
    };
    let names = normalize_headers(
        header
            .iter()
            .map(decode_field)
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h
                }
            })
            .collect(),
    );
    let width = names.len();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); width];
    for record in records {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                tracing::debug!("Skipping unreadable CSV row: {}", e);
                continue;
            }
        };

        if record.len() > width {
            tracing::debug!(
                line = record.position().map(|p| p.line()),
                fields = record.len(),
                expected = width,
                "Skipping CSV row with too many fields"
            );
            continue;
        }

        for (i, values) in raw.iter_mut().enumerate() {
            values.push(record.get(i).map(decode_field).unwrap_or_default());
        }
    }

    let columns = names
        .into_iter()
        .zip(raw)
        .map(|(name, values)| {
            let (dtype, values) = infer_text_column(values);
            Column::new(name, dtype, values)
        })
        .collect();

    Ok(Table::from_columns(columns))
}

/// Field text; bytes that are not valid UTF-8 become U+FFFD instead of dropping the row
fn decode_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn read_excel(path: &Path) -> Result<Table, TableError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| TableError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TableError::Empty)?
        .map_err(|e| TableError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or(TableError::Empty)?;
    let names = normalize_headers(
        header
            .iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect(),
    );
    let width = names.len();

    let mut raw: Vec<Vec<CellValue>> = vec![Vec::new(); width];
    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        for (i, values) in raw.iter_mut().enumerate() {
            values.push(row.get(i).map(excel_cell).unwrap_or(CellValue::Null));
        }
    }

    let columns = names
        .into_iter()
        .zip(raw)
        .map(|(name, values)| {
            let (dtype, values) = infer_cell_column(values);
            Column::new(name, dtype, values)
        })
        .collect();

    Ok(Table::from_columns(columns))
}

/// Blank headers become `Unnamed: {position}`; repeated names get `.1`, `.2`, ... suffixes
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name
            };

            let mut candidate = base.clone();
            let mut suffix = 0;
            while seen.contains(&candidate) {
                suffix += 1;
                candidate = format!("{}.{}", base, suffix);
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

fn is_missing_marker(text: &str) -> bool {
    MISSING_MARKERS.contains(&text)
}

fn parse_bool(text: &str) -> Option<bool> {
    if TRUE_LITERALS.contains(&text) {
        Some(true)
    } else if FALSE_LITERALS.contains(&text) {
        Some(false)
    } else {
        None
    }
}

/// Infer the type of a CSV column from its raw field texts.
///
/// - int64: every value parses as an integer and none is missing
/// - float64: every present value is numeric; missing values become NaN
/// - bool: every value is a true/false literal and none is missing
/// - object: anything else, raw text kept and missing values null
pub(crate) fn infer_text_column(raw: Vec<String>) -> (DType, Vec<CellValue>) {
    if raw.is_empty() {
        return (DType::Object, Vec::new());
    }

    let trimmed: Vec<Option<&str>> = raw
        .iter()
        .map(|v| {
            let t = v.trim();
            (!is_missing_marker(t)).then_some(t)
        })
        .collect();
    let has_missing = trimmed.iter().any(Option::is_none);
    let present = || trimmed.iter().flatten();

    if !has_missing {
        let ints: Option<Vec<i64>> = present().map(|s| s.parse::<i64>().ok()).collect();
        if let Some(ints) = ints {
            return (DType::Int64, ints.into_iter().map(CellValue::Int).collect());
        }
    }

    if present().all(|s| s.parse::<f64>().is_ok()) {
        let values = trimmed
            .iter()
            .map(|v| CellValue::Float(v.and_then(|s| s.parse().ok()).unwrap_or(f64::NAN)))
            .collect();
        return (DType::Float64, values);
    }

    if !has_missing {
        let bools: Option<Vec<bool>> = present().map(|s| parse_bool(s)).collect();
        if let Some(bools) = bools {
            return (DType::Bool, bools.into_iter().map(CellValue::Bool).collect());
        }
    }

    let values = raw
        .iter()
        .zip(&trimmed)
        .map(|(text, parsed)| match parsed {
            Some(_) => CellValue::Text(text.clone()),
            None => CellValue::Null,
        })
        .collect();
    (DType::Object, values)
}

fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Null),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::String(s) if is_missing_marker(s.trim()) => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
    }
}

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64
}

/// Infer the type of a spreadsheet column from already-typed cells.
///
/// Numeric columns whose values are all integral with no empty cells become int64.
pub(crate) fn infer_cell_column(cells: Vec<CellValue>) -> (DType, Vec<CellValue>) {
    if cells.is_empty() {
        return (DType::Object, cells);
    }

    let has_missing = cells.iter().any(|c| matches!(c, CellValue::Null));
    let present = || cells.iter().filter(|c| !matches!(c, CellValue::Null));
    let is_number = |c: &CellValue| matches!(c, CellValue::Int(_) | CellValue::Float(_));

    if present().all(is_number) {
        let all_integral = present().all(|c| match c {
            CellValue::Int(_) => true,
            CellValue::Float(f) => is_integral(*f),
            _ => false,
        });

        if !has_missing && all_integral {
            let values = cells
                .into_iter()
                .map(|c| match c {
                    CellValue::Float(f) => CellValue::Int(f as i64),
                    other => other,
                })
                .collect();
            return (DType::Int64, values);
        }

        let values = cells
            .into_iter()
            .map(|c| CellValue::Float(c.as_f64().unwrap_or(f64::NAN)))
            .collect();
        return (DType::Float64, values);
    }

    if !has_missing && present().all(|c| matches!(c, CellValue::Bool(_))) {
        return (DType::Bool, cells);
    }

    if present().all(|c| matches!(c, CellValue::DateTime(_))) {
        return (DType::DateTime, cells);
    }

    (DType::Object, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_loads_csv_with_inferred_types() {
        let file = csv_file("city,sales,units,active\nLagos,1.5,3,true\nAccra,2.5,4,False\n");
        let table = load_table(file.path(), "csv").unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column_names(), vec!["city", "sales", "units", "active"]);

        let dtypes: Vec<_> = table.columns().iter().map(|c| c.dtype).collect();
        assert_eq!(
            dtypes,
            vec![DType::Object, DType::Float64, DType::Int64, DType::Bool]
        );
        assert_eq!(table.column("units").unwrap().values[1], CellValue::Int(4));
        assert_eq!(table.column("active").unwrap().values[1], CellValue::Bool(false));
    }

    #[test]
    fn test_missing_values_promote_integers_to_float() {
        let file = csv_file("a,b\n1,x\n,y\n3,\n");
        let table = load_table(file.path(), "CSV").unwrap();

        let a = table.column("a").unwrap();
        assert_eq!(a.dtype, DType::Float64);
        assert!(a.values[1].is_missing());

        let b = table.column("b").unwrap();
        assert_eq!(b.dtype, DType::Object);
        assert_eq!(b.values[2], CellValue::Null);
    }

    #[test]
    fn test_header_only_csv_has_zero_rows() {
        let file = csv_file("a,b,c\n");
        let table = load_table(file.path(), "csv").unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert!(table.columns().iter().all(|c| c.dtype == DType::Object));
    }

    #[test]
    fn test_empty_csv_is_rejected() {
        let file = csv_file("");
        assert!(matches!(
            load_table(file.path(), "csv"),
            Err(TableError::Empty)
        ));
    }

    #[test]
    fn test_rows_with_extra_fields_are_skipped() {
        let file = csv_file("a,b\n1,2\n3,4,5\n6\n");
        let table = load_table(file.path(), "csv").unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("a").unwrap().values, vec![CellValue::Int(1), CellValue::Int(6)]);
        assert_eq!(table.column("b").unwrap().dtype, DType::Float64);
    }

    #[test]
    fn test_non_utf8_rows_are_kept() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"name,v\ncaf\xe9,1\nbar,2\n").unwrap();
        let table = load_table(file.path(), "csv").unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.column("name").unwrap().values[0],
            CellValue::Text("caf\u{fffd}".to_string())
        );
        assert_eq!(table.column("v").unwrap().dtype, DType::Int64);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = csv_file("a\n1\n");
        assert!(matches!(
            load_table(file.path(), "txt"),
            Err(TableError::UnsupportedFileType(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.csv");
        assert!(matches!(
            load_table(&path, "csv"),
            Err(TableError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_normalize_headers() {
        let names = normalize_headers(strings(&["id", "", "id", "id", " "]));
        assert_eq!(names, vec!["id", "Unnamed: 1", "id.1", "id.2", "Unnamed: 4"]);
    }

    #[test]
    fn test_object_columns_keep_raw_text() {
        let (dtype, values) = infer_text_column(strings(&[" 12", "abc", "NA"]));
        assert_eq!(dtype, DType::Object);
        assert_eq!(
            values,
            vec![
                CellValue::Text(" 12".to_string()),
                CellValue::Text("abc".to_string()),
                CellValue::Null
            ]
        );
    }

    #[test]
    fn test_all_missing_column_is_float() {
        let (dtype, values) = infer_text_column(strings(&["", "NaN"]));
        assert_eq!(dtype, DType::Float64);
        assert!(values.iter().all(CellValue::is_missing));
    }

    #[test]
    fn test_spreadsheet_integral_floats_become_int() {
        let (dtype, values) =
            infer_cell_column(vec![CellValue::Float(1.0), CellValue::Int(2), CellValue::Float(3.0)]);
        assert_eq!(dtype, DType::Int64);
        assert_eq!(values, vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)]);
    }

    #[test]
    fn test_spreadsheet_gaps_make_float() {
        let (dtype, values) = infer_cell_column(vec![CellValue::Int(1), CellValue::Null]);
        assert_eq!(dtype, DType::Float64);
        assert_eq!(values[0], CellValue::Float(1.0));
        assert!(values[1].is_missing());
    }

    #[test]
    fn test_spreadsheet_dates_and_mixed_cells() {
        let date = NaiveDateTime::parse_from_str("2024-03-01 00:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let (dtype, _) = infer_cell_column(vec![CellValue::DateTime(date), CellValue::Null]);
        assert_eq!(dtype, DType::DateTime);

        let (dtype, _) =
            infer_cell_column(vec![CellValue::Int(1), CellValue::Text("two".to_string())]);
        assert_eq!(dtype, DType::Object);
    }

    #[test]
    fn test_excel_cell_conversion() {
        assert_eq!(excel_cell(&Data::Empty), CellValue::Null);
        assert_eq!(excel_cell(&Data::String("N/A".to_string())), CellValue::Null);
        assert_eq!(
            excel_cell(&Data::String("Lagos".to_string())),
            CellValue::Text("Lagos".to_string())
        );
        assert_eq!(excel_cell(&Data::Float(2.5)), CellValue::Float(2.5));
    }
}
