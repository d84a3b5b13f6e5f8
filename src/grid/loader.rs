//! Rate chart loading.
//!
//! Turns the raw cells of a [`GridSource`] into a [`RateTable`]. Loading is
//! all-or-nothing: the first bad cell or ragged row aborts the load and no
//! partial table is ever returned.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::LoadError;
use crate::models::{Axis, RateTable};
use crate::numeric;

use super::GridSource;

/// Loads a rate table from a source.
///
/// Row 0 holds the SNF labels from column 1 onwards (column 0 is a header
/// label and ignored). Every later row holds a FAT label in column 0 followed
/// by one rate per SNF column. Blank lines are skipped; a row of blank
/// cells is not.
///
/// Duplicate axis values (compared numerically) keep only their last
/// occurrence, together with that occurrence's row or column of rates.
///
/// # Errors
///
/// - `SourceUnreadable` if the source cannot be read
/// - `EmptySource` if the source has no rows
/// - `RaggedRow` if a data row's width differs from the header's
/// - `InvalidCell` if a label or rate is not a non-negative decimal
///
/// # Example
///
/// ```
/// use milk_rate_engine::grid::{CellGridSource, load};
///
/// let source = CellGridSource::new(
///     "inline",
///     vec![
///         vec!["FAT", "8.5", "9.0"],
///         vec!["4.0", "45.0", "46.5"],
///         vec!["4.5", "47.0", "48.2"],
///     ],
/// );
///
/// let table = load(&source).unwrap();
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.column_count(), 2);
/// ```
pub fn load(source: &dyn GridSource) -> Result<RateTable, LoadError> {
    let cells = source.read_cells()?;
    load_cells(&cells, source.describe())
}

/// Loads a rate table from cells already in memory.
pub fn load_cells(cells: &[Vec<String>], source_name: String) -> Result<RateTable, LoadError> {
    let header = cells.first().ok_or_else(|| LoadError::EmptySource {
        source_name: source_name.clone(),
    })?;
    let width = header.len();

    let snf_labels = header
        .iter()
        .enumerate()
        .skip(1)
        .map(|(column, raw)| parse_label(raw, 0, column))
        .collect::<Result<Vec<_>, _>>()?;

    let mut fat_labels = Vec::new();
    let mut rate_rows = Vec::new();

    for (row, row_cells) in cells.iter().enumerate().skip(1) {
        if is_empty_record(row_cells) {
            continue;
        }
        if row_cells.len() != width {
            return Err(LoadError::RaggedRow {
                row,
                expected: width,
                actual: row_cells.len(),
            });
        }

        fat_labels.push(parse_label(&row_cells[0], row, 0)?);
        let rates = row_cells
            .iter()
            .enumerate()
            .skip(1)
            .map(|(column, raw)| parse_cell(raw, row, column))
            .collect::<Result<Vec<_>, _>>()?;
        rate_rows.push(rates);
    }

    let kept_columns = last_occurrences(&snf_labels);
    let kept_rows = last_occurrences(&fat_labels);
    if kept_columns.len() != snf_labels.len() || kept_rows.len() != fat_labels.len() {
        debug!(
            source = %source_name,
            duplicate_fat = fat_labels.len() - kept_rows.len(),
            duplicate_snf = snf_labels.len() - kept_columns.len(),
            "Dropped duplicate axis labels, last occurrence kept"
        );
    }

    let grid: Vec<Vec<Decimal>> = kept_rows
        .iter()
        .map(|&row| kept_columns.iter().map(|&column| rate_rows[row][column]).collect())
        .collect();

    let fat_axis = Axis::from_labels(kept_rows.iter().map(|&i| fat_labels[i].clone()).collect());
    let snf_axis = Axis::from_labels(
        kept_columns
            .iter()
            .map(|&i| snf_labels[i].clone())
            .collect(),
    );

    debug!(
        source = %source_name,
        rows = fat_axis.len(),
        columns = snf_axis.len(),
        "Parsed rate chart"
    );

    Ok(RateTable::new(fat_axis, snf_axis, grid, source_name))
}

/// Parses an axis label, keeping its trimmed source text.
fn parse_label(raw: &str, row: usize, column: usize) -> Result<(String, Decimal), LoadError> {
    let value = parse_cell(raw, row, column)?;
    Ok((raw.trim().to_string(), value))
}

/// Parses a cell as a non-negative decimal.
fn parse_cell(raw: &str, row: usize, column: usize) -> Result<Decimal, LoadError> {
    let trimmed = raw.trim();
    let invalid = || LoadError::InvalidCell {
        row,
        column,
        raw_value: raw.to_string(),
    };

    let value = numeric::parse_decimal(trimmed).ok_or_else(invalid)?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid());
    }

    Ok(value)
}

/// A blank line: no cells, or a single blank cell. A row of several blank
/// cells is a data row and fails on its first cell.
fn is_empty_record(row_cells: &[String]) -> bool {
    match row_cells {
        [] => true,
        [only] => only.trim().is_empty(),
        _ => false,
    }
}

/// Returns the positions of values that do not reappear later, in order.
fn last_occurrences(labels: &[(String, Decimal)]) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(i, (_, value))| !labels[i + 1..].iter().any(|(_, later)| later == value))
        .map(|(i, _)| i)
        .collect()
}
