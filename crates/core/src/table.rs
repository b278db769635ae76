//! In-memory table of raw spreadsheet cells and numeric coercion.

use crate::types::{NumericColumn, TransactionRecord};
use crate::{Error, Result};
use std::collections::HashMap;

/// A raw cell value as read from the sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value.
    Blank,
    /// Numeric cell (integers are widened to f64).
    Number(f64),
    /// Text cell.
    Text(String),
    /// Boolean cell.
    Bool(bool),
    /// Dates, durations and error values, kept in display form.
    Other(String),
}

impl Cell {
    /// Text used when this cell is a header label.
    pub fn label(&self) -> String {
        match self {
            Cell::Blank => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) | Cell::Other(s) => s.clone(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

/// Convert a cell to a number.
///
/// Blank, boolean, date and unparseable cells yield `None`. Text is trimmed
/// before parsing; `NaN` and infinities are treated as missing too.
pub fn coerce(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        Cell::Blank | Cell::Bool(_) | Cell::Other(_) => return None,
    };
    value.is_finite().then_some(value)
}

/// Rows of cells keyed by the header row's labels.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Build a table from header labels and data rows.
    ///
    /// Duplicate labels resolve to their first occurrence. Short rows read
    /// as blank in their missing trailing columns.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self {
            columns,
            index,
            rows,
        }
    }

    /// Split raw sheet rows at the header position.
    ///
    /// Rows before `header_row` are dropped, the header row supplies the
    /// labels, and everything after it becomes data rows indexed from 0.
    pub fn from_rows(mut rows: Vec<Vec<Cell>>, header_row: usize) -> Result<Self> {
        if rows.len() <= header_row {
            return Err(Error::MissingHeader(header_row));
        }
        let data = rows.split_off(header_row + 1);
        let header = rows.pop().unwrap_or_default();
        let columns = header.iter().map(Cell::label).collect();
        Ok(Self::new(columns, data))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a cell by data row index and column label.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = *self.index.get(column)?;
        self.rows.get(row).map(|r| r.get(col).unwrap_or(&Cell::Blank))
    }

    /// Coerce the four money columns of every row.
    ///
    /// Fails with [`Error::MissingColumn`] before touching any row if a
    /// required label is absent from the header.
    pub fn records(&self) -> Result<Vec<TransactionRecord>> {
        let mut positions = Vec::with_capacity(NumericColumn::ALL.len());
        for column in NumericColumn::ALL {
            let pos = self
                .index
                .get(column.header())
                .copied()
                .ok_or_else(|| Error::MissingColumn(column.header().to_string()))?;
            positions.push((column, pos));
        }

        let mut skipped = 0usize;
        let records = self
            .rows
            .iter()
            .map(|row| {
                let mut record = TransactionRecord::default();
                for &(column, pos) in &positions {
                    let cell = row.get(pos).unwrap_or(&Cell::Blank);
                    let value = coerce(cell);
                    if value.is_none() && !matches!(cell, Cell::Blank) {
                        skipped += 1;
                    }
                    record.set(column, value);
                }
                record
            })
            .collect();

        if skipped > 0 {
            log::debug!("{} non-numeric cells treated as missing", skipped);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn header_row() -> Vec<Cell> {
        NumericColumn::ALL.iter().map(|c| text(c.header())).collect()
    }

    #[test]
    fn test_coerce_numbers_and_text() {
        assert_eq!(coerce(&Cell::Number(12.5)), Some(12.5));
        assert_eq!(coerce(&text("42")), Some(42.0));
        assert_eq!(coerce(&text(" 3.25 ")), Some(3.25));
        assert_eq!(coerce(&text("-7")), Some(-7.0));
    }

    #[test]
    fn test_coerce_invalid_values_are_missing() {
        assert_eq!(coerce(&text("")), None);
        assert_eq!(coerce(&text("n/a")), None);
        assert_eq!(coerce(&text("1,000")), None);
        assert_eq!(coerce(&text("NaN")), None);
        assert_eq!(coerce(&text("inf")), None);
        assert_eq!(coerce(&Cell::Number(f64::NAN)), None);
        assert_eq!(coerce(&Cell::Blank), None);
        assert_eq!(coerce(&Cell::Bool(true)), None);
        assert_eq!(coerce(&Cell::Other("2024-01-01".into())), None);
    }

    #[test]
    fn test_from_rows_uses_second_row_as_header() {
        let rows = vec![
            vec![text("Unnamed: 0"), text("Unnamed: 1")],
            vec![text("Order"), text("Total Income (currency)")],
            vec![text("A-1"), Cell::Number(10.0)],
            vec![text("A-2"), Cell::Number(20.0)],
        ];
        let table = RawTable::from_rows(rows, 1).unwrap();

        assert_eq!(table.columns(), &["Order", "Total Income (currency)"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "Order"), Some(&text("A-1")));
        assert_eq!(
            table.get(1, "Total Income (currency)"),
            Some(&Cell::Number(20.0))
        );
        assert_eq!(table.get(2, "Order"), None);
    }

    #[test]
    fn test_from_rows_without_header() {
        let rows = vec![vec![text("only one row")]];
        assert!(matches!(
            RawTable::from_rows(rows, 1),
            Err(Error::MissingHeader(1))
        ));
    }

    #[test]
    fn test_records_missing_column() {
        let columns = vec![
            "Total Income (currency)".to_string(),
            "Platform Technical Service Fee (currency)".to_string(),
            "Post-Consumption Refund (currency)".to_string(),
        ];
        let table = RawTable::new(columns, vec![]);

        match table.records() {
            Err(Error::MissingColumn(name)) => {
                assert_eq!(name, "Merchant Marketing Fee (currency)")
            }
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_records_coerce_each_column() {
        let columns = header_row().iter().map(Cell::label).collect();
        let rows = vec![
            vec![Cell::Number(100.0), text("5"), text(""), Cell::Number(10.0)],
            vec![text("oops"), Cell::Number(2.0)],
        ];
        let table = RawTable::new(columns, rows);
        let records = table.records().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].gross_income, Some(100.0));
        assert_eq!(records[0].platform_fee, Some(5.0));
        assert_eq!(records[0].marketing_fee, None);
        assert_eq!(records[0].refund, Some(10.0));
        assert_eq!(records[1].gross_income, None);
        assert_eq!(records[1].platform_fee, Some(2.0));
        assert_eq!(records[1].refund, None);
    }

    #[test]
    fn test_duplicate_header_uses_first_column() {
        let columns = vec!["a".to_string(), "a".to_string()];
        let table = RawTable::new(columns, vec![vec![Cell::Number(1.0), Cell::Number(2.0)]]);
        assert_eq!(table.get(0, "a"), Some(&Cell::Number(1.0)));
    }
}
