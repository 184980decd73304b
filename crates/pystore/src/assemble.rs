//! Assembling read observations into a collection.

use hydrostore_meta::DATASTORE_KEY;
use hydrostore_obs::{CollectionMeta, ObsCollection, Observation};

use crate::error::StoreError;

/// Name given to collections assembled without an explicit name.
pub const DEFAULT_COLLECTION_NAME: &str = "obs_coll";

/// Assembles observations into a collection keyed by observation name.
///
/// The collection's source is taken from the provenance key of the first
/// observation, its kind from the first observation's kind, and it is
/// marked as associated with that store.
///
/// # Errors
///
/// Returns [`StoreError::EmptyInput`] if `observations` is empty.
pub fn assemble(observations: Vec<Observation>, name: &str) -> Result<ObsCollection, StoreError> {
    let first = observations.first().ok_or(StoreError::EmptyInput)?;

    let meta = CollectionMeta {
        source: first.meta_value(DATASTORE_KEY).map(ToString::to_string),
        kind: first.kind(),
        associated: true,
    };
    Ok(ObsCollection::new(name, observations, meta))
}
