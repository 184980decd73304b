//! Handles to stores, collections and items.
//!
//! Handles are cheap path wrappers; creating one never touches the disk.
//! The [`StoreRoot`] is passed explicitly to every operation instead of
//! living in process-wide state.

use std::fs;
use std::path::{Path, PathBuf};

use hydrostore_meta::{FlatMeta, decode_record};
use hydrostore_obs::DataTable;
use tracing::warn;

use crate::error::StoreError;
use crate::layout::{DATA_FILE_NAME, METADATA_FILE_NAME, is_hidden, sibling_name, validate_name};
use crate::table_codec;

/// Directory under which stores live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRoot {
    path: PathBuf,
}

impl StoreRoot {
    /// Creates a root at `path`. The directory need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Root directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Handle to the store called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] if `name` is not a valid name.
    pub fn store(&self, name: &str) -> Result<Store, StoreError> {
        validate_name(name)?;
        Ok(Store {
            name: name.to_string(),
            path: self.path.join(name),
        })
    }

    /// Names of the stores under this root, sorted. A missing root has no
    /// stores.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the root cannot be listed.
    pub fn stores(&self) -> Result<Vec<String>, StoreError> {
        if !self.path.is_dir() {
            return Ok(Vec::new());
        }
        list_dirs(&self.path)
    }
}

/// A named store: a directory of collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    name: String,
    path: PathBuf,
}

impl Store {
    /// Store name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store directory exists.
    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Provenance string recorded on observations read from this store.
    pub fn datastore(&self) -> String {
        self.path.display().to_string()
    }

    /// Handle to the collection called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] if `name` is not a valid name.
    pub fn collection(&self, name: &str) -> Result<Collection, StoreError> {
        validate_name(name)?;
        Ok(Collection {
            store: self.name.clone(),
            datastore: self.datastore(),
            name: name.to_string(),
            path: self.path.join(name),
        })
    }

    /// Names of the collections in this store, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StoreNotFound`] if the store does not exist, or
    /// [`StoreError::Io`] if it cannot be listed.
    pub fn collections(&self) -> Result<Vec<String>, StoreError> {
        if !self.exists() {
            return Err(StoreError::StoreNotFound {
                path: self.path.clone(),
            });
        }
        list_dirs(&self.path)
    }
}

/// A named collection: a directory of items inside a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    store: String,
    datastore: String,
    name: String,
    path: PathBuf,
}

impl Collection {
    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Collection directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the collection directory exists.
    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Handle to the item called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] if `name` is not a valid name.
    pub fn item(&self, name: &str) -> Result<Item, StoreError> {
        validate_name(name)?;
        Ok(Item {
            collection: self.name.clone(),
            datastore: self.datastore.clone(),
            name: name.to_string(),
            path: self.path.join(name),
        })
    }

    /// Names of the items in this collection, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CollectionNotFound`] if the collection does not
    /// exist, or [`StoreError::Io`] if it cannot be listed.
    pub fn items(&self) -> Result<Vec<String>, StoreError> {
        if !self.exists() {
            return Err(StoreError::CollectionNotFound {
                store: self.store.clone(),
                collection: self.name.clone(),
            });
        }
        list_dirs(&self.path)
    }
}

/// A persisted observation: data file plus metadata record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    collection: String,
    datastore: String,
    name: String,
    path: PathBuf,
}

impl Item {
    /// Item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the collection holding this item.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Provenance string of the store holding this item.
    pub fn datastore(&self) -> &str {
        &self.datastore
    }

    /// Whether the item directory exists.
    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Path of the data file.
    pub fn data_path(&self) -> PathBuf {
        self.path.join(DATA_FILE_NAME)
    }

    /// Path of the metadata file.
    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_FILE_NAME)
    }

    /// Hidden directory next to the item, used while replacing it.
    pub(crate) fn sibling_path(&self, suffix: &str) -> PathBuf {
        self.path.with_file_name(sibling_name(&self.name, suffix))
    }

    fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.exists() {
            Ok(())
        } else {
            Err(StoreError::ItemNotFound {
                collection: self.collection.clone(),
                item: self.name.clone(),
            })
        }
    }

    /// Reads the metadata record. The data file is not opened.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] if the item does not exist,
    /// [`StoreError::Io`] if the file cannot be read, or
    /// [`StoreError::Metadata`] if it is not a JSON object.
    pub fn read_metadata(&self) -> Result<FlatMeta, StoreError> {
        self.ensure_exists()?;
        let path = self.metadata_path();
        let bytes = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        let record = decode_record(&bytes).map_err(|e| StoreError::Metadata {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        if !record.skipped.is_empty() {
            warn!(
                item = %self.name,
                skipped = ?record.skipped,
                "metadata entries with non-primitive values were ignored"
            );
        }
        Ok(record.meta)
    }

    /// Reads the data table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] if the item does not exist, or
    /// [`StoreError::Io`] / [`StoreError::Parquet`] on read failures.
    pub fn read_data(&self) -> Result<DataTable, StoreError> {
        self.ensure_exists()?;
        table_codec::read_table(&self.data_path())
    }
}

/// Sorted names of the visible subdirectories of `dir`.
fn list_dirs(dir: &Path) -> Result<Vec<String>, StoreError> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| StoreError::io(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if !is_hidden(&name) => names.push(name),
            Ok(_) => {}
            Err(raw) => warn!(name = ?raw, dir = %dir.display(), "skipping non-UTF-8 entry"),
        }
    }
    names.sort();
    Ok(names)
}
