//! Loading a filtered collection from a store.

use std::collections::BTreeSet;

use hydrostore_meta::{FlatMeta, MetaValue, X_KEY, Y_KEY};
use hydrostore_obs::{CollectionMeta, DataTable, Extent, ObsCollection, ObsKind};
use tracing::{info, warn};

use crate::assemble::{DEFAULT_COLLECTION_NAME, assemble};
use crate::error::StoreError;
use crate::read::{read_inventory, read_item, read_store, reconstruct};
use crate::store::Store;

/// Selection of observations to load from a store.
///
/// # Example
///
/// ```
/// use hydrostore_obs::Extent;
/// use hydrostore_pystore::StoreQuery;
///
/// let query = StoreQuery::new()
///     .with_extent(Extent::new([115534.0, 115539.0, 0.0, 1e7]).unwrap())
///     .with_read_series(false);
/// assert!(!query.read_series());
/// ```
#[derive(Debug, Clone)]
pub struct StoreQuery {
    name: String,
    item_names: Option<BTreeSet<String>>,
    extent: Option<Extent>,
    read_series: bool,
    kind: ObsKind,
}

impl Default for StoreQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreQuery {
    /// Creates a query that loads every item with its data.
    ///
    /// Defaults: `name = "obs_coll"`, no name filter, no extent,
    /// `read_series = true`, `kind = Groundwater`.
    pub fn new() -> Self {
        Self {
            name: DEFAULT_COLLECTION_NAME.to_string(),
            item_names: None,
            extent: None,
            read_series: true,
            kind: ObsKind::default(),
        }
    }

    /// Sets the name of the resulting collection.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restricts loading to these item names.
    pub fn with_item_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts loading to items whose coordinates fall inside `extent`.
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Whether data tables are loaded (`true`) or only metadata.
    pub fn with_read_series(mut self, read_series: bool) -> Self {
        self.read_series = read_series;
        self
    }

    /// Sets the kind of the reconstructed observations.
    pub fn with_kind(mut self, kind: ObsKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether data tables are loaded.
    pub fn read_series(&self) -> bool {
        self.read_series
    }
}

fn in_extent(record: &FlatMeta, extent: &Extent) -> bool {
    let x = record.get(X_KEY).and_then(MetaValue::as_f64);
    let y = record.get(Y_KEY).and_then(MetaValue::as_f64);
    extent.contains(x, y)
}

/// Loads the observations selected by `query` into a collection.
///
/// With an extent, the metadata inventory is consulted first and only
/// items with known coordinates inside it are considered. Without
/// `read_series` the observations carry metadata and empty tables. A query
/// matching nothing yields an empty collection.
///
/// # Errors
///
/// Returns [`StoreError::StoreNotFound`] if the store does not exist, or
/// the first read error.
pub fn load_collection(store: &Store, query: &StoreQuery) -> Result<ObsCollection, StoreError> {
    let datastore = store.datastore();

    let observations = if query.extent.is_some() || !query.read_series {
        let entries = read_inventory(store)?.into_iter().filter(|(item, meta)| {
            query.extent.as_ref().is_none_or(|e| in_extent(meta, e))
                && query
                    .item_names
                    .as_ref()
                    .is_none_or(|wanted| wanted.contains(item.name()))
        });

        if query.read_series {
            entries
                .map(|(item, _)| read_item(&item, query.kind))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            entries
                .map(|(item, meta)| {
                    reconstruct(item.name(), DataTable::default(), meta, &datastore, query.kind)
                })
                .collect()
        }
    } else {
        let report = read_store(store, query.item_names.as_ref(), query.kind)?;
        if !report.missing.is_empty() {
            warn!(
                store = store.name(),
                missing = ?report.missing,
                "requested items not found in store"
            );
        }
        report.observations
    };

    info!(
        store = store.name(),
        n_observations = observations.len(),
        read_series = query.read_series,
        "collection loaded"
    );

    if observations.is_empty() {
        let meta = CollectionMeta {
            source: Some(datastore),
            kind: query.kind,
            associated: true,
        };
        return Ok(ObsCollection::new(query.name.clone(), Vec::new(), meta));
    }
    assemble(observations, &query.name)
}
