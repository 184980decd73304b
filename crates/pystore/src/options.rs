//! Write options for items and collections.

use parquet::file::properties::WriterProperties;

use crate::error::StoreError;

/// Compression algorithm for item data files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, StoreError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level = parquet::basic::ZstdLevel::try_new(3)?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Options controlling how observations are written to a store.
///
/// # Example
///
/// ```
/// use hydrostore_pystore::{Compression, WriteOptions};
///
/// let options = WriteOptions::default()
///     .with_group_by("locatie")
///     .with_overwrite(true)
///     .with_compression(Compression::Zstd);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct WriteOptions {
    overwrite: bool,
    compression: Compression,
    row_group_size: usize,
    group_by: Option<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            compression: Compression::default(),
            row_group_size: 1_000_000,
            group_by: None,
        }
    }
}

impl WriteOptions {
    /// Replace existing items instead of failing.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Groups observations into collections by this metadata key.
    pub fn with_group_by(mut self, key: impl Into<String>) -> Self {
        self.group_by = Some(key.into());
        self
    }

    /// Whether existing items are replaced.
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Metadata key used to pick collections, if any.
    pub fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    /// Validates these options.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if `row_group_size` is zero or
    /// the grouping key is empty.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut problems = Vec::new();
        if self.row_group_size == 0 {
            problems.push("row_group_size must be greater than 0".to_string());
        }
        if self.group_by.as_deref() == Some("") {
            problems.push("group_by key must not be empty".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }

    /// Parquet writer properties for these options.
    pub(crate) fn writer_properties(&self) -> Result<WriterProperties, StoreError> {
        Ok(WriterProperties::builder()
            .set_compression(self.compression.to_parquet()?)
            .set_max_row_group_size(self.row_group_size)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let options = WriteOptions::default();
        assert!(!options.overwrite);
        assert_eq!(options.compression, Compression::Snappy);
        assert_eq!(options.row_group_size, 1_000_000);
        assert!(options.group_by.is_none());
    }

    #[test]
    fn builder_methods() {
        let options = WriteOptions::default()
            .with_overwrite(true)
            .with_compression(Compression::Zstd)
            .with_row_group_size(500)
            .with_group_by("locatie");
        assert!(options.overwrite());
        assert_eq!(options.compression, Compression::Zstd);
        assert_eq!(options.row_group_size, 500);
        assert_eq!(options.group_by(), Some("locatie"));
    }

    #[test]
    fn validate_collects_all_problems() {
        let options = WriteOptions::default()
            .with_row_group_size(0)
            .with_group_by("");
        match options.validate().unwrap_err() {
            StoreError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("row_group_size"));
                assert!(details.contains("group_by"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn writer_properties_for_each_compression() {
        for comp in [Compression::None, Compression::Snappy, Compression::Zstd] {
            let props = WriteOptions::default()
                .with_compression(comp)
                .writer_properties()
                .unwrap();
            assert_eq!(props.max_row_group_size(), 1_000_000);
        }
    }
}
