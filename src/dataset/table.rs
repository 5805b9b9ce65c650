//! Column-major tabular dataset.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// A single typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric values; missing cells are `NaN`
    Numeric(Vec<f64>),
    /// Free-form or categorical values
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Numeric values, if this is a numeric column.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Text(_) => None,
        }
    }

    /// Render one cell as it would be written to CSV.
    pub fn cell(&self, row: usize) -> String {
        match self {
            Column::Numeric(v) => format_number(v[row]),
            Column::Text(v) => v[row].clone(),
        }
    }

    /// Text rendering of every cell, used for categorical comparison.
    pub fn to_text(&self) -> Column {
        match self {
            Column::Numeric(v) => Column::Text(v.iter().map(|x| format_number(*x)).collect()),
            Column::Text(v) => Column::Text(v.clone()),
        }
    }

    /// Every cell rendered as text.
    pub fn text_cells(&self) -> Vec<String> {
        (0..self.len()).map(|i| self.cell(i)).collect()
    }

    /// Number of distinct cell values.
    pub fn distinct_count(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().map(|x| x.to_bits()).collect::<HashSet<_>>().len(),
            Column::Text(v) => v.iter().collect::<HashSet<_>>().len(),
        }
    }

    fn truncate(&mut self, n: usize) {
        match self {
            Column::Numeric(v) => v.truncate(n),
            Column::Text(v) => v.truncate(n),
        }
    }

    /// Append all cells of `other`, demoting to text on a type conflict.
    fn extend_from(&mut self, other: &Column) {
        if let (Column::Numeric(a), Column::Numeric(b)) = (&mut *self, other) {
            a.extend_from_slice(b);
            return;
        }
        if self.is_numeric() {
            *self = self.to_text();
        }
        if let (Column::Text(a), Column::Text(b)) = (self, other.to_text()) {
            a.extend(b);
        }
    }

    fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Column::Text(v) => Column::Text(indices.iter().map(|&i| v[i].clone()).collect()),
        }
    }

    /// Overwrite cell `dst` with cell `src` of `other`.
    fn set_from(&mut self, dst: usize, other: &Column, src: usize) {
        if let (Column::Numeric(a), Column::Numeric(b)) = (&mut *self, other) {
            a[dst] = b[src];
            return;
        }
        if self.is_numeric() {
            *self = self.to_text();
        }
        if let Column::Text(a) = self {
            a[dst] = other.cell(src);
        }
    }
}

/// Format a number the way the CSV writer emits it (`NaN` as empty cell).
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        String::new()
    } else {
        format!("{x}")
    }
}

/// Tabular dataset with a fixed column schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from named columns; all columns must have equal length
    /// and names must be unique.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |(_, c)| c.len());
        let mut seen = HashSet::new();
        for (name, col) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(Error::Dataset {
                    path: "<memory>".into(),
                    message: format!("duplicate column '{name}'"),
                });
            }
            if col.len() != n_rows {
                return Err(Error::Dataset {
                    path: "<memory>".into(),
                    message: format!(
                        "column '{name}' has {} rows, expected {n_rows}",
                        col.len()
                    ),
                });
            }
        }
        let (names, columns) = columns.into_iter().unzip();
        Ok(Self { names, columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.position(name).map(move |i| &mut self.columns[i])
    }

    /// Iterate `(name, column)` pairs in schema order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Names of numeric columns, in schema order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns()
            .filter(|(_, c)| c.is_numeric())
            .map(|(n, _)| n.to_string())
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Whether both datasets have the same set of column names.
    pub fn has_same_columns(&self, other: &Dataset) -> bool {
        let a: HashSet<_> = self.names.iter().collect();
        let b: HashSet<_> = other.names.iter().collect();
        a == b && self.names.len() == other.names.len()
    }

    /// Column names present in exactly one of the two datasets.
    pub fn schema_difference(&self, other: &Dataset) -> Vec<String> {
        let a: HashSet<_> = self.names.iter().collect();
        let b: HashSet<_> = other.names.iter().collect();
        let mut diff: Vec<String> = a.symmetric_difference(&b).map(|s| s.to_string()).collect();
        diff.sort();
        diff
    }

    /// Copy of `self` with columns reordered to match `template`.
    pub fn aligned_to(&self, template: &Dataset) -> Result<Dataset> {
        if !self.has_same_columns(template) {
            return Err(Error::evaluation(format!(
                "column sets differ: {:?}",
                self.schema_difference(template)
            )));
        }
        let columns = template
            .names
            .iter()
            .map(|name| {
                let col = self.column(name).cloned().unwrap_or(Column::Text(Vec::new()));
                (name.clone(), col)
            })
            .collect();
        Dataset::new(columns)
    }

    /// Rows of `self` followed by rows of `other`, in `self`'s column order.
    pub fn concat(&self, other: &Dataset) -> Result<Dataset> {
        let other = other.aligned_to(self)?;
        let mut out = self.clone();
        for (col, extra) in out.columns.iter_mut().zip(other.columns.iter()) {
            col.extend_from(extra);
        }
        out.n_rows += other.n_rows;
        Ok(out)
    }

    /// Keep only the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.n_rows {
            return;
        }
        for col in &mut self.columns {
            col.truncate(n);
        }
        self.n_rows = n;
    }

    /// Overwrite row `dst` with row `src_row` of `src`.
    ///
    /// `src` must already be aligned to this dataset's column order.
    pub fn copy_row_from(&mut self, dst: usize, src: &Dataset, src_row: usize) {
        for (col, other) in self.columns.iter_mut().zip(src.columns.iter()) {
            col.set_from(dst, other, src_row);
        }
    }

    /// New dataset holding the given rows, in the given order.
    ///
    /// Panics if an index is out of range.
    pub fn take_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            n_rows: indices.len(),
        }
    }

    /// One row rendered as strings.
    pub fn row(&self, i: usize) -> Vec<String> {
        self.columns.iter().map(|c| c.cell(i)).collect()
    }
}
