//! Writing observations into a store.

use std::fs;
use std::path::Path;

use hydrostore_meta::FlatMeta;
use hydrostore_obs::{DataTable, ObsCollection, Observation};
use parquet::file::properties::WriterProperties;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::layout::{DATA_FILE_NAME, METADATA_FILE_NAME, RETIRED_SUFFIX, STAGING_SUFFIX};
use crate::options::WriteOptions;
use crate::store::{Item, Store};
use crate::table_codec::{self, EncodedTable};

/// Writes one data table and its metadata record as an item.
///
/// Collection and item directories are created as needed. An existing
/// item is replaced as a whole (data and metadata) when overwrite is
/// enabled and refused otherwise.
///
/// Data and metadata are encoded before anything touches the disk, then
/// written into a hidden staging directory that is renamed into place. A
/// failed write leaves no item behind and keeps a replaced item intact.
///
/// # Errors
///
/// Returns [`StoreError::AlreadyExists`] if the item exists and overwrite is
/// disabled, [`StoreError::InvalidName`] for unusable names,
/// [`StoreError::Validation`] for invalid options, and I/O, Parquet or
/// metadata errors from the write itself.
pub fn write_item(
    store: &Store,
    collection: &str,
    item: &str,
    table: &DataTable,
    meta: &FlatMeta,
    options: &WriteOptions,
) -> Result<Item, StoreError> {
    options.validate()?;
    let props = options.writer_properties()?;
    let item = store.collection(collection)?.item(item)?;

    let encoded = table_codec::encode_table(table)?;
    let text = hydrostore_meta::encode_record(meta).map_err(|e| StoreError::Metadata {
        path: item.metadata_path(),
        reason: e.to_string(),
    })?;

    if item.exists() && !options.overwrite() {
        return Err(StoreError::AlreadyExists {
            path: item.path().to_path_buf(),
        });
    }

    let staging = item.sibling_path(STAGING_SUFFIX);
    remove_leftover(&staging)?;
    fs::create_dir_all(&staging).map_err(|e| StoreError::io(&staging, e))?;
    if let Err(e) = fill_staging(&staging, &encoded, &text, props) {
        discard(&staging);
        return Err(e);
    }
    if let Err(e) = commit(&item, &staging) {
        discard(&staging);
        return Err(e);
    }

    debug!(
        collection,
        item = item.name(),
        n_rows = table.len(),
        n_meta = meta.len(),
        "item written"
    );
    Ok(item)
}

fn fill_staging(
    staging: &Path,
    encoded: &EncodedTable,
    text: &str,
    props: WriterProperties,
) -> Result<(), StoreError> {
    table_codec::write_table(&staging.join(DATA_FILE_NAME), encoded, props)?;
    let metadata_path = staging.join(METADATA_FILE_NAME);
    fs::write(&metadata_path, text).map_err(|e| StoreError::io(&metadata_path, e))
}

/// Moves a complete staging directory into the item's place.
///
/// A previous item is set aside first and only removed once the new one
/// is in place; if the final rename fails it is moved back.
fn commit(item: &Item, staging: &Path) -> Result<(), StoreError> {
    if !item.exists() {
        return fs::rename(staging, item.path()).map_err(|e| StoreError::io(item.path(), e));
    }

    debug!(collection = item.collection(), item = item.name(), "replacing existing item");
    let retired = item.sibling_path(RETIRED_SUFFIX);
    remove_leftover(&retired)?;
    fs::rename(item.path(), &retired).map_err(|e| StoreError::io(item.path(), e))?;

    if let Err(e) = fs::rename(staging, item.path()) {
        if let Err(restore) = fs::rename(&retired, item.path()) {
            warn!(
                item = %item.path().display(),
                retired = %retired.display(),
                error = %restore,
                "could not restore replaced item"
            );
        }
        return Err(StoreError::io(item.path(), e));
    }

    if let Err(e) = fs::remove_dir_all(&retired) {
        warn!(path = %retired.display(), error = %e, "could not remove replaced item");
    }
    Ok(())
}

/// Removes a hidden directory left behind by an interrupted write.
fn remove_leftover(path: &Path) -> Result<(), StoreError> {
    if path.exists() {
        warn!(path = %path.display(), "removing leftover directory");
        fs::remove_dir_all(path).map_err(|e| StoreError::io(path, e))?;
    }
    Ok(())
}

fn discard(staging: &Path) {
    if staging.exists()
        && let Err(e) = fs::remove_dir_all(staging)
    {
        warn!(path = %staging.display(), error = %e, "could not remove staging directory");
    }
}

/// Collection name for `obs` given its extracted metadata.
///
/// Without a grouping key every observation gets its own collection named
/// after it. Observations lacking the key fall back to the same.
fn collection_name(obs: &Observation, meta: &FlatMeta, group_by: Option<&str>) -> String {
    match group_by {
        None => obs.name().to_string(),
        Some(key) => match meta.get(key) {
            Some(value) => value.to_string(),
            None => {
                warn!(
                    obs = obs.name(),
                    key, "grouping key missing, using observation name as collection"
                );
                obs.name().to_string()
            }
        },
    }
}

/// Writes every observation of a collection into `store`.
///
/// Metadata is extracted per observation; the collection each item lands in
/// is chosen by [`WriteOptions::with_group_by`]. Returns the number of items
/// written.
///
/// # Errors
///
/// Stops at the first failing item and returns its error; items written
/// before it stay in place.
pub fn write_collection(
    store: &Store,
    oc: &ObsCollection,
    options: &WriteOptions,
) -> Result<usize, StoreError> {
    options.validate()?;

    let mut n_written = 0;
    for obs in oc {
        let extraction = obs.extract_metadata();
        if !extraction.collisions.is_empty() {
            warn!(
                obs = obs.name(),
                keys = ?extraction.collisions,
                "metadata keys collided while flattening, last value kept"
            );
        }
        let collection = collection_name(obs, &extraction.meta, options.group_by());
        write_item(
            store,
            &collection,
            obs.name(),
            obs.data(),
            &extraction.meta,
            options,
        )?;
        n_written += 1;
    }

    info!(
        store = store.name(),
        n_written, "observations written to store"
    );
    Ok(n_written)
}
