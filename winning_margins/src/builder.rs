pub use crate::config::*;

/// A builder for assembling a table row by row.
///
/// Readers that do not produce a table directly (spreadsheets for instance)
/// should go through the builder, as it checks the shape of every row.
///
/// ```
/// pub use winning_margins::builder::TableBuilder;
/// # use winning_margins::TableShapeError;
///
/// let mut builder = TableBuilder::new(&["Name of State/UT".to_string(), "No. Of Seats".to_string()])?;
///
/// builder.add_row(&["Goa".to_string(), "2".to_string()])?;
///
/// let table = builder.build();
/// assert_eq!(table.rows.len(), 1);
///
/// # Ok::<(), TableShapeError>(())
/// ```
pub struct TableBuilder {
    pub(crate) _headers: Vec<String>,
    pub(crate) _rows: Vec<Vec<String>>,
}

/// A row did not have as many cells as there are headers, or there was no header.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TableShapeError {
    /// 1-based, the header being row 0.
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

impl std::error::Error for TableShapeError {}

impl std::fmt::Display for TableShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {}: expected {} cells, found {}",
            self.row, self.expected, self.found
        )
    }
}

impl TableBuilder {
    pub fn new(headers: &[String]) -> Result<TableBuilder, TableShapeError> {
        if headers.is_empty() {
            return Err(TableShapeError {
                row: 0,
                expected: 1,
                found: 0,
            });
        }
        Ok(TableBuilder {
            _headers: headers.to_vec(),
            _rows: Vec::new(),
        })
    }

    /// Adds a row. The row must have exactly one cell per header.
    pub fn add_row(&mut self, cells: &[String]) -> Result<(), TableShapeError> {
        if cells.len() != self._headers.len() {
            return Err(TableShapeError {
                row: self._rows.len() + 1,
                expected: self._headers.len(),
                found: cells.len(),
            });
        }
        self._rows.push(cells.to_vec());
        Ok(())
    }

    pub fn build(self) -> Table {
        Table {
            headers: self._headers,
            rows: self._rows,
        }
    }
}
