//! Error types for hydrostore-pastas.

use hydrostore_obs::ObsError;

/// Error type for moving observations into or out of a series library.
#[derive(Debug, thiserror::Error)]
pub enum PastasError {
    /// Returned when an observation lacks the column being exported.
    #[error("observation '{obs}' has no column '{column}'")]
    MissingColumn {
        /// Name of the observation.
        obs: String,
        /// The requested column.
        column: String,
    },

    /// Returned when a series name is taken and overwrite is disabled.
    #[error("{library} series '{name}' already exists")]
    AlreadyExists {
        /// `oseries` or `stresses`.
        library: &'static str,
        /// The taken name.
        name: String,
    },

    /// Returned when a series is looked up by a name that is not stored.
    #[error("{library} series '{name}' not found")]
    NotFound {
        /// `oseries` or `stresses`.
        library: &'static str,
        /// The missing name.
        name: String,
    },

    /// Returned when a series has an empty name.
    #[error("series name must not be empty")]
    EmptyName,

    /// Returned when a series has a different number of timestamps and
    /// values.
    #[error("series '{name}' has {index} timestamps but {values} values")]
    LengthMismatch {
        /// Name of the series.
        name: String,
        /// Number of timestamps.
        index: usize,
        /// Number of values.
        values: usize,
    },

    /// Returned when a series cannot be turned back into a data table.
    #[error("table error: {reason}")]
    Table {
        /// Description of the failure.
        reason: String,
    },
}

impl From<ObsError> for PastasError {
    fn from(e: ObsError) -> Self {
        PastasError::Table {
            reason: e.to_string(),
        }
    }
}
