//! Workbook fixtures shared by the unit tests.

use rust_xlsxwriter::Workbook;
use std::path::Path;

/// A cell written into a fixture workbook.
pub(crate) enum Value {
    N(f64),
    S(&'static str),
    Empty,
}

/// Write a transaction export: a generic first row, the label row, then data.
pub(crate) fn write_transactions(path: &Path, header: &[&str], rows: &[Vec<Value>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, label) in header.iter().enumerate() {
        let col = col as u16;
        sheet
            .write_string(0, col, format!("Column {}", col + 1))
            .unwrap();
        sheet.write_string(1, col, *label).unwrap();
    }

    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 2;
        for (col, value) in row.iter().enumerate() {
            let col = col as u16;
            match value {
                Value::N(n) => {
                    sheet.write_number(r, col, *n).unwrap();
                }
                Value::S(s) => {
                    sheet.write_string(r, col, *s).unwrap();
                }
                Value::Empty => {}
            }
        }
    }

    workbook.save(path).unwrap();
}

/// The four required labels followed by an unrelated order-id column.
pub(crate) fn standard_header() -> Vec<&'static str> {
    let mut header: Vec<&'static str> = crate::NumericColumn::ALL
        .iter()
        .map(|c| c.header())
        .collect();
    header.push("Order ID");
    header
}
