//! Row set abstractions and implementations.
//!
//! The pipeline reads its input through the [`Source`] trait: a set of rows where
//! each cell is addressed by the row index and the key of a dimension or measure
//! (see [`crate::meta::Descriptor::key`]).
//! A cell exposes both a display label and a raw numeric value, as the host does.
//!
//! Two implementations are provided:
//! - `Vec<Row>` (and `[Row]`), row oriented, as delivered by a host data binding
//! - [`TableSource`], column oriented, e.g. as parsed from CSV
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

#[cfg(feature = "data-csv")]
mod csv;
#[cfg(feature = "data-csv")]
pub use csv::{CsvColSpec, CsvParseError, CsvParser};

/// A borrowed cell value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cell<'a> {
    /// Display label of the cell
    pub label: Option<&'a str>,
    /// Raw numeric value of the cell
    pub raw: Option<f64>,
}

impl<'a> Cell<'a> {
    /// A cell with a label only
    pub const fn label(label: &'a str) -> Self {
        Cell {
            label: Some(label),
            raw: None,
        }
    }

    /// A cell with a raw value only
    pub const fn raw(raw: f64) -> Self {
        Cell {
            label: None,
            raw: Some(raw),
        }
    }

    /// Check if the cell has neither label nor raw value
    pub fn is_null(&self) -> bool {
        self.label.is_none() && self.raw.is_none()
    }

    /// Get the textual value of the cell.
    /// This is the label if any, otherwise the raw value formatted.
    pub fn text(&self) -> Option<Cow<'a, str>> {
        match (self.label, self.raw) {
            (Some(label), _) => Some(Cow::Borrowed(label)),
            (None, Some(raw)) => Some(Cow::Owned(raw.to_string())),
            (None, None) => None,
        }
    }

    /// Get the numeric value of the cell.
    ///
    /// This is the raw value if finite, otherwise the label parsed as a number if finite,
    /// otherwise `0.0`. It never returns NaN.
    pub fn number(&self) -> f64 {
        self.raw
            .filter(|v| v.is_finite())
            .or_else(|| {
                self.label
                    .and_then(|l| l.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            })
            .unwrap_or(0.0)
    }

    /// Convert to an owned cell
    pub fn to_owned(&self) -> OwnedCell {
        OwnedCell {
            label: self.label.map(str::to_string),
            raw: self.raw,
        }
    }
}

/// An owned cell value. See [`Cell`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "binding-json", derive(serde::Deserialize))]
pub struct OwnedCell {
    /// Display label of the cell
    #[cfg_attr(feature = "binding-json", serde(default))]
    pub label: Option<String>,
    /// Raw numeric value of the cell
    #[cfg_attr(
        feature = "binding-json",
        serde(default, deserialize_with = "crate::binding::deserialize_raw")
    )]
    pub raw: Option<f64>,
}

impl OwnedCell {
    /// Borrow as a [`Cell`]
    pub fn as_cell(&self) -> Cell<'_> {
        Cell {
            label: self.label.as_deref(),
            raw: self.raw,
        }
    }
}

impl From<&str> for OwnedCell {
    fn from(label: &str) -> Self {
        OwnedCell {
            label: Some(label.to_string()),
            raw: None,
        }
    }
}

impl From<String> for OwnedCell {
    fn from(label: String) -> Self {
        OwnedCell {
            label: Some(label),
            raw: None,
        }
    }
}

impl From<f64> for OwnedCell {
    fn from(raw: f64) -> Self {
        OwnedCell {
            label: None,
            raw: Some(raw),
        }
    }
}

impl From<Option<f64>> for OwnedCell {
    fn from(raw: Option<f64>) -> Self {
        OwnedCell { label: None, raw }
    }
}

/// One observation: cells keyed by dimension or measure key, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "binding-json", derive(serde::Deserialize))]
#[cfg_attr(feature = "binding-json", serde(transparent))]
pub struct Row {
    cells: IndexMap<String, OwnedCell>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell for the given key, replacing any previous one
    pub fn set(&mut self, key: &str, cell: impl Into<OwnedCell>) {
        self.cells.insert(key.to_string(), cell.into());
    }

    /// Set the cell for the given key, returning self for chaining
    pub fn with(mut self, key: &str, cell: impl Into<OwnedCell>) -> Self {
        self.set(key, cell);
        self
    }

    /// Set a cell with both a label and a raw value, returning self for chaining
    pub fn with_cell(mut self, key: &str, label: &str, raw: f64) -> Self {
        self.set(
            key,
            OwnedCell {
                label: Some(label.to_string()),
                raw: Some(raw),
            },
        );
        self
    }

    /// Get the cell for the given key
    pub fn get(&self, key: &str) -> Option<Cell<'_>> {
        self.cells.get(key).map(OwnedCell::as_cell)
    }

    /// Iterate over the keys of this row
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

/// Trait for a row set.
/// Rows are addressed by index, cells by key.
pub trait Source: fmt::Debug {
    /// Get the number of rows
    fn len(&self) -> usize;

    /// Check whether there is no row
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the keys known to this source
    fn keys(&self) -> Vec<&str>;

    /// Get a cell by row index and key.
    /// Returns None if the row or the key does not exist, or the cell is null.
    fn cell(&self, row: usize, key: &str) -> Option<Cell<'_>>;
}

/// Empty source
impl Source for () {
    fn len(&self) -> usize {
        0
    }

    fn keys(&self) -> Vec<&str> {
        Vec::new()
    }

    fn cell(&self, _row: usize, _key: &str) -> Option<Cell<'_>> {
        None
    }
}

impl Source for [Row] {
    fn len(&self) -> usize {
        <[Row]>::len(self)
    }

    /// Keys of all rows, in first-seen order
    fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for row in self {
            for key in row.keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    fn cell(&self, row: usize, key: &str) -> Option<Cell<'_>> {
        self.get(row)?.get(key).filter(|c| !c.is_null())
    }
}

impl Source for Vec<Row> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn keys(&self) -> Vec<&str> {
        self.as_slice().keys()
    }

    fn cell(&self, row: usize, key: &str) -> Option<Cell<'_>> {
        self.as_slice().cell(row, key)
    }
}

impl Source for Arc<dyn Source> {
    fn len(&self) -> usize {
        self.as_ref().len()
    }

    fn keys(&self) -> Vec<&str> {
        self.as_ref().keys()
    }

    fn cell(&self, row: usize, key: &str) -> Option<Cell<'_>> {
        self.as_ref().cell(row, key)
    }
}

/// Column backed by a vector, type known at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum VecColumn {
    /// Numeric column, NaN is null
    F64(Vec<f64>),
    /// String column
    Str(Vec<Option<String>>),
}

impl VecColumn {
    /// Get the length of the column
    pub fn len(&self) -> usize {
        match self {
            VecColumn::F64(v) => v.len(),
            VecColumn::Str(v) => v.len(),
        }
    }

    /// Check whether the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the cell at the given row
    pub fn cell(&self, row: usize) -> Option<Cell<'_>> {
        match self {
            VecColumn::F64(v) => v.get(row).copied().filter(|v| !v.is_nan()).map(Cell::raw),
            VecColumn::Str(v) => v.get(row)?.as_deref().map(Cell::label),
        }
    }

    fn pad(&mut self, len: usize) {
        match self {
            VecColumn::F64(vec) => vec.resize(len, f64::NAN),
            VecColumn::Str(vec) => vec.resize(len, None),
        }
    }
}

impl From<Vec<f64>> for VecColumn {
    fn from(v: Vec<f64>) -> Self {
        VecColumn::F64(v)
    }
}

impl From<Vec<Option<String>>> for VecColumn {
    fn from(v: Vec<Option<String>>) -> Self {
        VecColumn::Str(v)
    }
}

impl From<Vec<String>> for VecColumn {
    fn from(v: Vec<String>) -> Self {
        VecColumn::Str(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for VecColumn {
    fn from(v: Vec<&str>) -> Self {
        VecColumn::Str(v.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

/// Simple table source backed by vectors.
/// This source owns the data and ensures that all columns have the same length.
#[derive(Clone, Default)]
pub struct TableSource {
    heads: Vec<String>,
    columns: Vec<VecColumn>,
    len: usize,
}

impl TableSource {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the column names
    pub fn heads(&self) -> &[String] {
        &self.heads
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&VecColumn> {
        let idx = self.heads.iter().position(|h| h == name)?;
        self.columns.get(idx)
    }

    /// Add a column with the given name.
    /// If a column with that name exists, it is replaced.
    /// Shorter columns are padded with null values.
    pub fn add_column(&mut self, name: &str, col: VecColumn) {
        self.len = self.len.max(col.len());
        match self.heads.iter().position(|h| h == name) {
            Some(idx) => self.columns[idx] = col,
            None => {
                self.heads.push(name.to_string());
                self.columns.push(col);
            }
        }
        for col in &mut self.columns {
            col.pad(self.len);
        }
    }

    /// Add a column with the given name, returning self for chaining
    pub fn with_column(mut self, name: &str, col: VecColumn) -> Self {
        self.add_column(name, col);
        self
    }

    /// Add a f64 column with the given name, returning self for chaining
    pub fn with_f64_column(mut self, name: &str, col: Vec<f64>) -> Self {
        self.add_column(name, VecColumn::F64(col));
        self
    }

    /// Add a string column with the given name, returning self for chaining
    pub fn with_str_column(mut self, name: &str, col: Vec<Option<String>>) -> Self {
        self.add_column(name, VecColumn::Str(col));
        self
    }

    /// Get the number of rows in the table
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the table has no row
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Source for TableSource {
    fn len(&self) -> usize {
        self.len
    }

    fn keys(&self) -> Vec<&str> {
        self.heads.iter().map(String::as_str).collect()
    }

    fn cell(&self, row: usize, key: &str) -> Option<Cell<'_>> {
        self.column(key)?.cell(row)
    }
}

/// Custom Debug implementation to pretty-print the table
impl fmt::Debug for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn cell_string(col: &VecColumn, row: usize) -> String {
            match col.cell(row).and_then(|c| c.text()) {
                Some(text) => text.into_owned(),
                None => "(null)".to_string(),
            }
        }

        let rows = self.len;
        let row_indices: Vec<usize> = if rows <= 10 {
            (0..rows).collect()
        } else {
            (0..5).chain((rows - 5)..rows).collect()
        };

        let widths: Vec<usize> = self
            .heads
            .iter()
            .zip(&self.columns)
            .map(|(head, col)| {
                row_indices
                    .iter()
                    .map(|&row| cell_string(col, row).len())
                    .fold(head.len(), usize::max)
            })
            .collect();

        writeln!(f, "TableSource: {} rows x {} columns", rows, self.heads.len())?;
        for (head, width) in self.heads.iter().zip(&widths) {
            write!(f, "| {:^width$} ", head, width = width)?;
        }
        writeln!(f, "|")?;
        for width in &widths {
            write!(f, "|{:=^width$}", "", width = width + 2)?;
        }
        writeln!(f, "|")?;

        for (i, &row) in row_indices.iter().enumerate() {
            if rows > 10 && i == 5 {
                for width in &widths {
                    write!(f, "| {:^width$} ", "...", width = width)?;
                }
                writeln!(f, "|")?;
            }
            for (col, width) in self.columns.iter().zip(&widths) {
                write!(f, "| {:>width$} ", cell_string(col, row), width = width)?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
