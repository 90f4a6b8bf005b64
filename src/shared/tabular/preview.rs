use super::table::Table;

const COLUMN_GAP: &str = "  ";

/// Render the first `rows` rows as an aligned text grid with a leading row index.
///
/// ```text
///    city  sales
/// 0  Lagos    1.5
/// 1  Accra    2.0
/// ```
pub fn render_preview(table: &Table, rows: usize) -> String {
    let names = table.column_names();

    if table.is_empty() {
        return format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []",
            names.join(", ")
        );
    }

    let shown = rows.min(table.num_rows());
    let index: Vec<String> = (0..shown).map(|i| i.to_string()).collect();
    let index_width = index.iter().map(String::len).max().unwrap_or(0);

    let cells: Vec<Vec<String>> = table
        .columns()
        .iter()
        .map(|c| c.values.iter().take(shown).map(|v| v.to_string()).collect())
        .collect();
    let widths: Vec<usize> = names
        .iter()
        .zip(&cells)
        .map(|(name, values)| {
            values
                .iter()
                .map(|v| v.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(shown + 1);

    let mut header = " ".repeat(index_width);
    for (name, width) in names.iter().zip(&widths) {
        header.push_str(COLUMN_GAP);
        header.push_str(&format!("{:>width$}", name, width = *width));
    }
    lines.push(header);

    for (row, label) in index.iter().enumerate() {
        let mut line = format!("{:<width$}", label, width = index_width);
        for (values, width) in cells.iter().zip(&widths) {
            line.push_str(COLUMN_GAP);
            line.push_str(&format!("{:>width$}", values[row], width = *width));
        }
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::tabular::{CellValue, Column, DType};

    #[test]
    fn test_render_aligned_grid() {
        let table = Table::from_columns(vec![
            Column::new(
                "city",
                DType::Object,
                vec![CellValue::Text("Lagos".into()), CellValue::Text("Ife".into())],
            ),
            Column::new("sales", DType::Float64, vec![CellValue::Float(1.5), CellValue::Float(20.0)]),
        ]);

        let expected = "    city  sales\n0  Lagos    1.5\n1    Ife   20.0";
        assert_eq!(render_preview(&table, 10), expected);
    }

    #[test]
    fn test_render_limits_rows() {
        let values = (0..25).map(CellValue::Int).collect();
        let table = Table::from_columns(vec![Column::new("n", DType::Int64, values)]);

        let preview = render_preview(&table, 10);
        assert_eq!(preview.lines().count(), 11);
        assert!(preview.lines().last().unwrap().starts_with('9'));
    }

    #[test]
    fn test_render_empty_table() {
        let table = Table::from_columns(vec![
            Column::new("a", DType::Object, vec![]),
            Column::new("b", DType::Object, vec![]),
        ]);
        assert_eq!(
            render_preview(&table, 10),
            "Empty DataFrame\nColumns: [a, b]\nIndex: []"
        );
    }
}
