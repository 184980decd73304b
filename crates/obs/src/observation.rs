//! A single named time series with metadata.

use std::collections::BTreeMap;

use hydrostore_meta::{Extraction, MetaField, MetaValue, extract};

use crate::kind::ObsKind;
use crate::table::DataTable;

/// One named observation series.
///
/// The name is fixed at construction and doubles as the storage key.
/// Coordinates are optional; `None` means unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    name: String,
    x: Option<f64>,
    y: Option<f64>,
    filename: String,
    kind: ObsKind,
    data: DataTable,
    meta: BTreeMap<String, MetaField>,
}

impl Observation {
    /// Creates an observation with unknown coordinates and no metadata.
    pub fn new(name: impl Into<String>, data: DataTable) -> Self {
        Self {
            name: name.into(),
            x: None,
            y: None,
            filename: String::new(),
            kind: ObsKind::default(),
            data,
            meta: BTreeMap::new(),
        }
    }

    /// Sets the coordinates. Non-finite values are treated as unknown.
    pub fn with_xy(mut self, x: Option<f64>, y: Option<f64>) -> Self {
        self.x = x.filter(|v| v.is_finite());
        self.y = y.filter(|v| v.is_finite());
        self
    }

    /// Sets the file the observation was read from.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Sets the observation kind.
    pub fn with_kind(mut self, kind: ObsKind) -> Self {
        self.kind = kind;
        self
    }

    /// Replaces the free-form metadata.
    pub fn with_meta(mut self, meta: BTreeMap<String, MetaField>) -> Self {
        self.meta = meta;
        self
    }

    /// Inserts one free-form metadata entry, returning the previous value.
    pub fn insert_meta(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetaField>,
    ) -> Option<MetaField> {
        self.meta.insert(key.into(), value.into())
    }

    /// Observation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// X coordinate, `None` if unknown.
    pub fn x(&self) -> Option<f64> {
        self.x
    }

    /// Y coordinate, `None` if unknown.
    pub fn y(&self) -> Option<f64> {
        self.y
    }

    /// Source filename, empty if none.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Observation kind.
    pub fn kind(&self) -> ObsKind {
        self.kind
    }

    /// The measurements.
    pub fn data(&self) -> &DataTable {
        &self.data
    }

    /// Free-form metadata.
    pub fn meta(&self) -> &BTreeMap<String, MetaField> {
        &self.meta
    }

    /// Primitive metadata value under `key`, if any.
    pub fn meta_value(&self, key: &str) -> Option<&MetaValue> {
        self.meta.get(key).and_then(MetaField::as_value)
    }

    /// Declared fields in extraction order: `name`, `x`, `y` (only when
    /// known), `filename`, `kind`, `meta`.
    pub fn declared_fields(&self) -> Vec<(&'static str, MetaField)> {
        let mut fields = vec![("name", MetaField::from(self.name.as_str()))];
        if let Some(x) = self.x {
            fields.push(("x", MetaField::from(x)));
        }
        if let Some(y) = self.y {
            fields.push(("y", MetaField::from(y)));
        }
        fields.push(("filename", MetaField::from(self.filename.as_str())));
        fields.push(("kind", MetaField::from(self.kind.as_str())));
        fields.push(("meta", MetaField::Map(self.meta.clone())));
        fields
    }

    /// Flattens the declared fields into a persistable record.
    pub fn extract_metadata(&self) -> Extraction {
        let fields = self.declared_fields();
        extract(fields.iter().map(|(k, v)| (*k, v)))
    }
}
