//! Error types for hydrostore-obs.

/// Error type for constructing observations and their tables.
#[derive(Debug, thiserror::Error)]
pub enum ObsError {
    /// Returned when a value column does not have one value per timestamp.
    #[error("column '{column}' has {got} values, expected {expected}")]
    LengthMismatch {
        /// Name of the offending column.
        column: String,
        /// Length of the time index.
        expected: usize,
        /// Length of the column.
        got: usize,
    },

    /// Returned when two value columns share a name.
    #[error("duplicate column '{name}'")]
    DuplicateColumn {
        /// The repeated column name.
        name: String,
    },

    /// Returned when an observation kind name is not recognised.
    #[error("unknown observation kind: {name:?}")]
    UnknownKind {
        /// The name that failed to parse.
        name: String,
    },

    /// Returned when extent bounds are reversed or not finite.
    #[error("invalid extent: {details}")]
    InvalidExtent {
        /// Description of the problem.
        details: String,
    },
}
