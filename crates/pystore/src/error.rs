//! Error types for hydrostore-pystore.

use std::path::PathBuf;

/// Error type for all fallible operations on a store.
///
/// Covers missing stores and collections, refused overwrites, invalid
/// names, and failures from the filesystem, Parquet and the metadata
/// record codec.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Returned when a store directory does not exist under the root.
    #[error("store not found: {}", path.display())]
    StoreNotFound {
        /// Expected location of the store.
        path: PathBuf,
    },

    /// Returned when a collection does not exist inside a store.
    #[error("collection '{collection}' not found in store '{store}'")]
    CollectionNotFound {
        /// Store name.
        store: String,
        /// Requested collection name.
        collection: String,
    },

    /// Returned when an item does not exist inside a collection.
    #[error("item '{item}' not found in collection '{collection}'")]
    ItemNotFound {
        /// Collection name.
        collection: String,
        /// Requested item name.
        item: String,
    },

    /// Returned when writing an item that exists without overwrite.
    #[error("item already exists: {} (enable overwrite to replace it)", path.display())]
    AlreadyExists {
        /// Location of the existing item.
        path: PathBuf,
    },

    /// Returned when assembling a collection from zero observations.
    #[error("cannot assemble a collection from zero observations")]
    EmptyInput,

    /// Returned when a store, collection or item name cannot be used as a
    /// directory name.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Wraps a filesystem failure.
    #[error("i/o error at {}: {reason}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Returned when an item's metadata record cannot be read or written.
    #[error("metadata error at {}: {reason}", path.display())]
    Metadata {
        /// Path of the metadata file.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Returned when a timestamp cannot be represented in the data file.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time conversion issue.
        reason: String,
    },

    /// Returned when stored columns do not form a valid data table.
    #[error("table error: {reason}")]
    Table {
        /// Description of the table failure.
        reason: String,
    },

    /// Returned when one or more option checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, e: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            reason: e.to_string(),
        }
    }
}

impl From<parquet::errors::ParquetError> for StoreError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        StoreError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for StoreError {
    fn from(e: arrow::error::ArrowError) -> Self {
        StoreError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<hydrostore_obs::ObsError> for StoreError {
    fn from(e: hydrostore_obs::ObsError) -> Self {
        StoreError::Table {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_store_not_found() {
        let err = StoreError::StoreNotFound {
            path: PathBuf::from("/data/stores/test_pystore"),
        };
        assert_eq!(err.to_string(), "store not found: /data/stores/test_pystore");
    }

    #[test]
    fn display_collection_not_found() {
        let err = StoreError::CollectionNotFound {
            store: "test_pystore".into(),
            collection: "B33F0133".into(),
        };
        assert_eq!(
            err.to_string(),
            "collection 'B33F0133' not found in store 'test_pystore'"
        );
    }

    #[test]
    fn display_already_exists() {
        let err = StoreError::AlreadyExists {
            path: PathBuf::from("/s/c/i"),
        };
        assert_eq!(
            err.to_string(),
            "item already exists: /s/c/i (enable overwrite to replace it)"
        );
    }

    #[test]
    fn display_empty_input() {
        assert_eq!(
            StoreError::EmptyInput.to_string(),
            "cannot assemble a collection from zero observations"
        );
    }

    #[test]
    fn display_invalid_name() {
        let err = StoreError::InvalidName {
            name: "a/b".into(),
            reason: "contains a path separator",
        };
        assert_eq!(
            err.to_string(),
            "invalid name \"a/b\": contains a path separator"
        );
    }

    #[test]
    fn from_parquet_error() {
        let pq_err = parquet::errors::ParquetError::General("test pq error".to_string());
        let err: StoreError = pq_err.into();
        assert!(matches!(err, StoreError::Parquet { .. }));
        assert!(err.to_string().contains("test pq error"));
    }

    #[test]
    fn from_arrow_error() {
        let arrow_err = arrow::error::ArrowError::SchemaError("bad schema".to_string());
        let err: StoreError = arrow_err.into();
        assert!(matches!(err, StoreError::Parquet { .. }));
        assert!(err.to_string().contains("bad schema"));
    }

    #[test]
    fn from_obs_error() {
        let obs_err = hydrostore_obs::ObsError::DuplicateColumn {
            name: "value".into(),
        };
        let err: StoreError = obs_err.into();
        assert!(matches!(err, StoreError::Table { .. }));
        assert_eq!(err.to_string(), "table error: duplicate column 'value'");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<StoreError>();
    }
}
