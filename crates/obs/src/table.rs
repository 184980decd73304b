//! Time-indexed table of value columns.

use chrono::NaiveDateTime;

use crate::error::ObsError;

/// A named column of values, one per timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<f64>,
}

impl Column {
    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column values. Missing measurements are `NaN`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Rows are timestamps, columns are named `f64` series.
///
/// A table may have zero rows and still carry column names; this is how an
/// observation without measurements keeps its schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    index: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl DataTable {
    /// Creates a table after checking column lengths and name uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`ObsError::LengthMismatch`] if a column length differs from
    /// the index length, or [`ObsError::DuplicateColumn`] if a name repeats.
    pub fn new(
        index: Vec<NaiveDateTime>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, ObsError> {
        let mut out = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if values.len() != index.len() {
                return Err(ObsError::LengthMismatch {
                    column: name,
                    expected: index.len(),
                    got: values.len(),
                });
            }
            if out.iter().any(|c: &Column| c.name == name) {
                return Err(ObsError::DuplicateColumn { name });
            }
            out.push(Column { name, values });
        }
        Ok(Self {
            index,
            columns: out,
        })
    }

    /// Creates a zero-row table with the given column names.
    ///
    /// # Errors
    ///
    /// Returns [`ObsError::DuplicateColumn`] if a name repeats.
    pub fn empty<I, S>(names: I) -> Result<Self, ObsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            Vec::new(),
            names.into_iter().map(|n| (n.into(), Vec::new())).collect(),
        )
    }

    /// Timestamps of the rows.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// All columns in insertion order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Renames a column in place. Returns `false` if `from` does not exist
    /// or `to` is already taken.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if from != to && self.columns.iter().any(|c| c.name == to) {
            return false;
        }
        match self.columns.iter_mut().find(|c| c.name == from) {
            Some(col) => {
                col.name = to.to_string();
                true
            }
            None => false,
        }
    }
}
