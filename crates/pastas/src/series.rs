//! Single time series as held by a series library.

use std::fmt;

use chrono::NaiveDateTime;
use hydrostore_meta::FlatMeta;
use serde::Serialize;

use crate::error::PastasError;

/// Which library a series belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Observed series to be modelled.
    #[default]
    Oseries,
    /// Explanatory series of the given kind, e.g. `prec` or `evap`.
    Stress(String),
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oseries => f.write_str("oseries"),
            Self::Stress(kind) => write!(f, "stress:{kind}"),
        }
    }
}

/// A named univariate series with flat metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PastasSeries {
    name: String,
    index: Vec<NaiveDateTime>,
    values: Vec<f64>,
    metadata: FlatMeta,
    kind: SeriesKind,
}

impl PastasSeries {
    /// Creates an observed series.
    ///
    /// # Errors
    ///
    /// Returns [`PastasError::EmptyName`] for an empty name, or
    /// [`PastasError::LengthMismatch`] when `index` and `values` differ in
    /// length.
    pub fn new(
        name: impl Into<String>,
        index: Vec<NaiveDateTime>,
        values: Vec<f64>,
    ) -> Result<Self, PastasError> {
        let name = name.into();
        if name.is_empty() {
            return Err(PastasError::EmptyName);
        }
        if index.len() != values.len() {
            return Err(PastasError::LengthMismatch {
                name,
                index: index.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            name,
            index,
            values,
            metadata: FlatMeta::new(),
            kind: SeriesKind::Oseries,
        })
    }

    pub fn with_metadata(mut self, metadata: FlatMeta) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_kind(mut self, kind: SeriesKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn metadata(&self) -> &FlatMeta {
        &self.metadata
    }

    pub fn kind(&self) -> &SeriesKind {
        &self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
