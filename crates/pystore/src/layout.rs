//! On-disk layout conventions.
//!
//! ```text
//! <root>/
//!   <store>/
//!     <collection>/
//!       <item>/
//!         data.parquet
//!         metadata.json
//! ```
//!
//! Every level is a plain directory whose name is the store, collection or
//! item name, so names must be valid single path components.

use crate::error::StoreError;

/// File holding an item's data table.
pub const DATA_FILE_NAME: &str = "data.parquet";

/// File holding an item's metadata record.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Name of the timestamp column inside the data file.
pub const INDEX_COLUMN: &str = "index";

/// Checks that `name` can be used as a store, collection or item name.
///
/// # Errors
///
/// Returns [`StoreError::InvalidName`] for empty names, `.` and `..`, and
/// names containing a path separator or NUL.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative path component")
    } else if name.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if name.contains('\0') {
        Some("contains a NUL byte")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Suffix of the hidden directory a new item is written into.
pub(crate) const STAGING_SUFFIX: &str = "tmp";

/// Suffix of the hidden directory a replaced item is moved to.
pub(crate) const RETIRED_SUFFIX: &str = "old";

/// Hidden sibling directory name for `item`, e.g. `.MPN-N-1.tmp`.
pub(crate) fn sibling_name(item: &str, suffix: &str) -> String {
    format!(".{item}.{suffix}")
}

/// Whether a directory entry name is skipped during enumeration.
pub(crate) fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
