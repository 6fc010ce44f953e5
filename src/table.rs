//! Tabular step arguments.
//!
//! A [`Table`] is the grid attached to a step such as
//! `Given I am on "Search" with the parameters:`. The first row is the
//! header; [`Table::hashes`] pairs each following row with it.

use crate::Parameters;
use indexmap::IndexMap;
use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

/// Column holding parameter names in a parameter table.
pub const PARAMETER_COLUMN: &str = "parameter";
/// Column holding parameter values in a parameter table.
pub const VALUE_COLUMN: &str = "value";
/// Column holding resource identifiers in a resource table.
pub const NAME_COLUMN: &str = "name";

/// Errors raised while interpreting a table.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TableError {
    /// The table has no header row.
    #[error("table has no header row")]
    #[diagnostic(code(hexavel::table::empty))]
    Empty,

    /// A data row is wider or narrower than the header.
    #[error("table row {row} has {found} cells but the header has {expected}")]
    #[diagnostic(code(hexavel::table::ragged_row))]
    RaggedRow {
        /// One-based row number, counting the header as row 1.
        row: usize,
        /// Header width.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },

    /// A required column is missing from the header.
    #[error("table has no `{column}` column")]
    #[diagnostic(code(hexavel::table::missing_column))]
    MissingColumn {
        /// The missing column name.
        column: &'static str,
    },
}

/// One data row keyed by header cell.
pub type Row = IndexMap<String, String>;

/// A Gherkin-style table: a header row followed by data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from raw rows, header first.
    #[must_use]
    pub const fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a table from borrowed cells, header first.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexavel::Table;
    /// let table = Table::from_rows(&[&["name"], &["Alice"]]);
    /// assert_eq!(table.raw().len(), 2);
    /// ```
    #[must_use]
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
                .collect(),
        )
    }

    /// Borrow the raw rows, header included.
    #[must_use]
    pub fn raw(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Pair each data row with the header.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Empty`] without a header and
    /// [`TableError::RaggedRow`] when a row width differs from the header.
    pub fn hashes(&self) -> Result<Vec<Row>, TableError> {
        let (header, body) = self.rows.split_first().ok_or(TableError::Empty)?;
        body.iter()
            .enumerate()
            .map(|(idx, cells)| {
                if cells.len() != header.len() {
                    return Err(TableError::RaggedRow {
                        row: idx + 2,
                        expected: header.len(),
                        found: cells.len(),
                    });
                }
                Ok(header.iter().cloned().zip(cells.iter().cloned()).collect())
            })
            .collect()
    }

    /// Collect the cells of `column` from every data row.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] when the header lacks `column`,
    /// along with the errors of [`Self::hashes`].
    pub fn column(&self, column: &'static str) -> Result<Vec<String>, TableError> {
        let header = self.rows.first().ok_or(TableError::Empty)?;
        if !header.iter().any(|cell| cell == column) {
            return Err(TableError::MissingColumn { column });
        }
        self.hashes()?
            .into_iter()
            .map(|mut row| row.swap_remove(column).ok_or(TableError::MissingColumn { column }))
            .collect()
    }
}

/// Cast a `parameter,value` table into an ordered parameter map.
///
/// Later rows overwrite earlier rows with the same parameter name; the key
/// keeps the position of its first occurrence.
///
/// # Errors
///
/// Returns a [`TableError`] when the table lacks either column or has
/// ragged rows.
///
/// # Examples
///
/// ```
/// use hexavel::{Table, cast_parameters_table};
/// let table = Table::from_rows(&[&["parameter", "value"], &["q", "1"], &["q", "2"]]);
/// let params = cast_parameters_table(&table).unwrap();
/// assert_eq!(params["q"], "2");
/// ```
pub fn cast_parameters_table(table: &Table) -> Result<Parameters, TableError> {
    let header = table.raw().first().ok_or(TableError::Empty)?;
    for column in [PARAMETER_COLUMN, VALUE_COLUMN] {
        if !header.iter().any(|cell| cell == column) {
            return Err(TableError::MissingColumn { column });
        }
    }
    let mut parameters = Parameters::new();
    for row in table.hashes()? {
        let name = row
            .get(PARAMETER_COLUMN)
            .ok_or(TableError::MissingColumn {
                column: PARAMETER_COLUMN,
            })?
            .clone();
        let value = row.get(VALUE_COLUMN).ok_or(TableError::MissingColumn {
            column: VALUE_COLUMN,
        })?;
        parameters.insert(name, Value::String(value.clone()));
    }
    Ok(parameters)
}
