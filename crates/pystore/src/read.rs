//! Reading observations back out of a store.

use std::collections::BTreeSet;

use hydrostore_meta::{
    DATASTORE_KEY, FlatMeta, KIND_KEY, MetaValue, NAME_KEY, X_KEY, Y_KEY, to_fields,
};
use hydrostore_obs::{DataTable, ObsKind, Observation};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::{Collection, Item, Store};

/// Observations read from a store, plus requested names that were not
/// found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadReport {
    /// Reconstructed observations in enumeration order.
    pub observations: Vec<Observation>,
    /// Requested item names that matched no item. Always empty when no
    /// filter was given.
    pub missing: BTreeSet<String>,
}

/// Builds an observation from a stored record.
///
/// Coordinates come from the numeric `x`/`y` entries and are unknown when
/// absent. A stored `kind` entry that parses wins over `kind`. The
/// provenance key is set to `datastore`, and the whole record is kept as
/// the observation's metadata.
pub(crate) fn reconstruct(
    name: &str,
    table: DataTable,
    mut meta: FlatMeta,
    datastore: &str,
    kind: ObsKind,
) -> Observation {
    let x = meta.get(X_KEY).and_then(MetaValue::as_f64);
    let y = meta.get(Y_KEY).and_then(MetaValue::as_f64);
    let kind = meta
        .get(KIND_KEY)
        .and_then(MetaValue::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(kind);
    let filename = meta
        .get("filename")
        .and_then(MetaValue::as_str)
        .unwrap_or_default()
        .to_string();
    meta.insert(DATASTORE_KEY.to_string(), MetaValue::Text(datastore.to_string()));

    Observation::new(name, table)
        .with_xy(x, y)
        .with_filename(filename)
        .with_kind(kind)
        .with_meta(to_fields(&meta))
}

/// Reconstructs an observation from a stored item.
///
/// A zero-row item yields an empty table that keeps the stored column
/// names. `kind` applies only when the record holds no readable kind.
///
/// # Errors
///
/// Returns [`StoreError::ItemNotFound`] if the item does not exist, or the
/// I/O, Parquet and metadata errors of reading it.
pub fn read_item(item: &Item, kind: ObsKind) -> Result<Observation, StoreError> {
    let table = item.read_data()?;
    let meta = item.read_metadata()?;
    debug!(
        collection = item.collection(),
        item = item.name(),
        n_rows = table.len(),
        "item read"
    );
    Ok(reconstruct(item.name(), table, meta, item.datastore(), kind))
}

/// Item names of `collection` selected by `item_names`, in enumeration
/// order.
fn select_items(
    collection: &Collection,
    item_names: Option<&BTreeSet<String>>,
) -> Result<Vec<String>, StoreError> {
    let items = collection.items()?;
    Ok(match item_names {
        None => items,
        Some(wanted) => items.into_iter().filter(|i| wanted.contains(i)).collect(),
    })
}

fn requested_but_absent(
    item_names: Option<&BTreeSet<String>>,
    observations: &[Observation],
) -> BTreeSet<String> {
    let Some(wanted) = item_names else {
        return BTreeSet::new();
    };
    let found: BTreeSet<&str> = observations.iter().map(Observation::name).collect();
    wanted
        .iter()
        .filter(|n| !found.contains(n.as_str()))
        .cloned()
        .collect()
}

/// Reads the items of one collection.
///
/// With `item_names` only items in both the requested set and the
/// collection are read; requested names the collection lacks are listed in
/// [`ReadReport::missing`] instead of failing.
///
/// # Errors
///
/// Returns [`StoreError::CollectionNotFound`] if the collection does not
/// exist, or the first error from [`read_item`].
pub fn read_collection(
    store: &Store,
    collection: &str,
    item_names: Option<&BTreeSet<String>>,
    kind: ObsKind,
) -> Result<ReadReport, StoreError> {
    let collection = store.collection(collection)?;
    let observations = select_items(&collection, item_names)?
        .iter()
        .map(|name| read_item(&collection.item(name)?, kind))
        .collect::<Result<Vec<_>, _>>()?;

    let missing = requested_but_absent(item_names, &observations);
    Ok(ReadReport {
        observations,
        missing,
    })
}

/// Reads every collection of a store, applying the same item filter to
/// each.
///
/// [`ReadReport::missing`] lists requested names found in no collection.
///
/// # Errors
///
/// Returns [`StoreError::StoreNotFound`] if the store does not exist, or the
/// first error from [`read_collection`].
pub fn read_store(
    store: &Store,
    item_names: Option<&BTreeSet<String>>,
    kind: ObsKind,
) -> Result<ReadReport, StoreError> {
    let collections = store.collections()?;

    let mut observations = Vec::new();
    for name in &collections {
        let report = read_collection(store, name, item_names, kind)?;
        observations.extend(report.observations);
    }

    let missing = requested_but_absent(item_names, &observations);
    info!(
        store = store.name(),
        n_collections = collections.len(),
        n_observations = observations.len(),
        n_missing = missing.len(),
        "store read"
    );
    Ok(ReadReport {
        observations,
        missing,
    })
}

/// Every item of a store with its metadata record, in enumeration order.
pub(crate) fn read_inventory(store: &Store) -> Result<Vec<(Item, FlatMeta)>, StoreError> {
    let mut entries = Vec::new();
    for name in store.collections()? {
        let collection = store.collection(&name)?;
        for item_name in collection.items()? {
            let item = collection.item(&item_name)?;
            let meta = item.read_metadata()?;
            entries.push((item, meta));
        }
    }
    Ok(entries)
}

/// Reads only the metadata records of every item in a store.
///
/// Each record is tagged with the item name under the reserved `name` key.
/// Data files are never opened.
///
/// # Errors
///
/// Returns [`StoreError::StoreNotFound`] if the store does not exist, or the
/// first listing or metadata error.
pub fn read_store_metadata(store: &Store) -> Result<Vec<FlatMeta>, StoreError> {
    let records: Vec<FlatMeta> = read_inventory(store)?
        .into_iter()
        .map(|(item, mut meta)| {
            meta.insert(NAME_KEY.to_string(), MetaValue::Text(item.name().to_string()));
            meta
        })
        .collect();
    debug!(store = store.name(), n_records = records.len(), "metadata read");
    Ok(records)
}
