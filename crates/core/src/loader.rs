//! Workbook loading.
//!
//! Reads one sheet of an xlsx/xlsm/xlsb/xls/ods workbook into a [`RawTable`].
//! Transaction exports carry a generic first row that only restates the real
//! labels, so by default the second non-blank row is used as the header.

use crate::table::{Cell, RawTable};
use crate::{Error, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Default position of the header among the non-blank rows.
pub const DEFAULT_HEADER_ROW: usize = 1;

/// Loader for transaction workbooks.
#[derive(Debug, Clone)]
pub struct TableLoader {
    /// Sheet to read; the first sheet when `None`.
    sheet: Option<String>,
    /// Index of the header among non-blank rows.
    header_row: usize,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self {
            sheet: None,
            header_row: DEFAULT_HEADER_ROW,
        }
    }
}

impl TableLoader {
    /// Create a loader that reads the first sheet with the default header row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a named sheet instead of the first one.
    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Set which non-blank row holds the column labels.
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    /// Load a workbook from disk.
    pub fn load(&self, path: &Path) -> Result<RawTable> {
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            Error::SpreadsheetError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let range = match &self.sheet {
            Some(name) => workbook
                .worksheet_range(name)
                .map_err(|e| Error::SpreadsheetError(format!("Failed to read sheet '{}': {}", name, e)))?,
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| Error::SpreadsheetError("Workbook has no sheets".to_string()))?
                .map_err(|e| Error::SpreadsheetError(format!("Failed to read first sheet: {}", e)))?,
        };

        // Fully blank rows carry no data and would shift the header position.
        let rows: Vec<Vec<Cell>> = range
            .rows()
            .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
            .map(|row| row.iter().map(to_cell).collect())
            .collect();

        log::debug!(
            "Read {} non-blank rows from {}",
            rows.len(),
            path.display()
        );

        RawTable::from_rows(rows, self.header_row)
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Blank,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Other(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write_transactions, Value};
    use crate::types::NumericColumn;

    #[test]
    fn test_load_uses_second_row_as_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.xlsx");
        write_transactions(
            &path,
            &NumericColumn::ALL.map(|c| c.header()),
            &[
                vec![Value::N(100.0), Value::N(5.0), Value::N(3.0), Value::N(10.0)],
                vec![Value::N(50.0), Value::S("n/a"), Value::N(1.0), Value::Empty],
            ],
        );

        let table = TableLoader::new().load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_column("Total Income (currency)"));
        assert_eq!(
            table.get(1, "Platform Technical Service Fee (currency)"),
            Some(&Cell::Text("n/a".to_string()))
        );

        let records = table.records().unwrap();
        assert_eq!(records[0].gross_income, Some(100.0));
        assert_eq!(records[1].platform_fee, None);
        assert_eq!(records[1].refund, None);
    }

    #[test]
    fn test_load_named_sheet_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.xlsx");
        write_transactions(&path, &["a"], &[]);

        let loader = TableLoader::new().with_sheet(Some("Nope".to_string()));
        assert!(matches!(
            loader.load(&path),
            Err(Error::SpreadsheetError(_))
        ));
    }

    #[test]
    fn test_load_header_row_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.xlsx");
        write_transactions(&path, &["Order"], &[vec![Value::S("A-1")]]);

        // With header row 0 the restating row becomes the header and the
        // real label row becomes data.
        let table = TableLoader::new().with_header_row(0).load(&path).unwrap();
        assert_eq!(table.columns(), &["Column 1"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_load_not_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.xlsx");
        std::fs::write(&path, b"definitely not a zip").unwrap();

        assert!(matches!(
            TableLoader::new().load(&path),
            Err(Error::SpreadsheetError(_))
        ));
    }
}
