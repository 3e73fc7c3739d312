use calamine::{open_workbook, DataType, Reader, Xlsx};
use winning_margins::builder::TableBuilder;

use crate::margins::*;

/// Reads the first worksheet of an Excel file. The first row is the header.
pub fn read_excel_table(path: &str) -> BMarginResult<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu { path })?
        .context(OpeningExcelSnafu { path })?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    let headers: Vec<String> = header.iter().map(cell_text).collect();
    debug!("read_excel_table: header: {:?}", headers);

    let mut builder = TableBuilder::new(&headers).context(TableShapeSnafu { path })?;
    for (idx, row) in iter.enumerate() {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        // Spreadsheets often carry formatted but empty rows at the bottom.
        if cells.iter().all(|c| c.is_empty()) {
            debug!("read_excel_table: idx: {:?} skipping empty row", idx);
            continue;
        }
        debug!("read_excel_table: idx: {:?} row: {:?}", idx, cells);
        builder.add_row(&cells).context(TableShapeSnafu { path })?;
    }
    Ok(builder.build())
}

/// The text of a cell, as a CSV export would show it.
fn cell_text(c: &DataType) -> String {
    match c {
        DataType::Empty => String::new(),
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        // Counts come out of Excel as floats.
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        other => format!("{:?}", other),
    }
}
