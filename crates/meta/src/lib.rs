//! # hydrostore-meta
//!
//! Metadata model shared by the hydrostore crates: a closed set of
//! primitive values ([`MetaValue`]), the nested source-side tree
//! ([`MetaField`]) observations carry, and [`extract`], which flattens the
//! latter into the record that is actually persisted.

mod error;
mod extract;
mod record;
mod value;

pub use error::MetaError;
pub use extract::{DroppedField, Extraction, extract};
pub use record::{DecodedRecord, decode_record, encode_record};
pub use value::{FlatMeta, MetaField, MetaValue, to_fields};

/// Reserved key holding the item name on metadata-only reads.
pub const NAME_KEY: &str = "name";

/// Reserved key recording which store an observation was read from.
pub const DATASTORE_KEY: &str = "datastore";

/// Reserved key for the x coordinate.
pub const X_KEY: &str = "x";

/// Reserved key for the y coordinate.
pub const Y_KEY: &str = "y";

/// Reserved key for the observation kind.
pub const KIND_KEY: &str = "kind";
