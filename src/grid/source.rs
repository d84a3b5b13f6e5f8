//! Tabular sources a rate chart can be loaded from.
//!
//! The engine only needs rectangular text cells with the SNF labels in
//! row 0 and the FAT labels in column 0. Where those cells come from is
//! the business of a [`GridSource`] implementation.

use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// A provider of rate chart cells.
pub trait GridSource: Send + Sync {
    /// Returns a short human-readable description (usually a path).
    fn describe(&self) -> String;

    /// Reads every row of the source as raw cell text.
    ///
    /// Rows are returned as found; width validation is the loader's job.
    fn read_cells(&self) -> Result<Vec<Vec<String>>, LoadError>;
}

/// A rate chart stored as a CSV file.
///
/// Records may have differing widths so that a ragged row is reported by
/// the loader with its row number rather than as an opaque CSV error.
/// Surrounding whitespace is trimmed from every cell.
#[derive(Debug, Clone)]
pub struct CsvGridSource {
    path: PathBuf,
}

impl CsvGridSource {
    /// Creates a source reading the CSV file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unreadable(&self, message: impl ToString) -> LoadError {
        LoadError::SourceUnreadable {
            source_name: self.describe(),
            message: message.to_string(),
        }
    }
}

impl GridSource for CsvGridSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_cells(&self) -> Result<Vec<Vec<String>>, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.unreadable(e))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| self.unreadable(e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(rows)
    }
}

/// A rate chart already held in memory.
#[derive(Debug, Clone)]
pub struct CellGridSource {
    name: String,
    cells: Vec<Vec<String>>,
}

impl CellGridSource {
    /// Creates a named in-memory source.
    ///
    /// # Example
    ///
    /// ```
    /// use milk_rate_engine::grid::{CellGridSource, GridSource};
    ///
    /// let source = CellGridSource::new(
    ///     "inline",
    ///     vec![vec!["FAT", "8.5"], vec!["4.0", "45.0"]],
    /// );
    /// assert_eq!(source.read_cells().unwrap().len(), 2);
    /// ```
    pub fn new<R, C>(name: impl Into<String>, cells: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            cells: cells
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

impl GridSource for CellGridSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn read_cells(&self) -> Result<Vec<Vec<String>>, LoadError> {
        Ok(self.cells.clone())
    }
}
