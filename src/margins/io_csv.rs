// Primitives for reading CSV files.

use crate::margins::*;

/// Reads a CSV file with a header row.
///
/// The cells are returned as they are. Rows that do not have as many fields
/// as the header are rejected.
pub fn read_csv_table(path: &str) -> BMarginResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(CsvParseSnafu { path })?;

    let headers: Vec<String> = rdr
        .headers()
        .context(CsvParseSnafu { path })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: header: {:?}", headers);
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Box::new(MarginError::EmptyTable {
            path: path.to_string(),
        }));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvParseSnafu { path })?;
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, line);
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok(Table { headers, rows })
}
