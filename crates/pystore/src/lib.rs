//! # hydrostore-pystore
//!
//! Maps observations onto a three-level directory store and back.
//!
//! ```text
//!  write:  Observation ─extract─▶ FlatMeta ─┐
//!                     └──── DataTable ──────┴─▶ write_item ─▶ <store>/<collection>/<item>/
//!
//!  read:   read_store ─▶ read_collection ─▶ read_item ─▶ Observation ─▶ assemble ─▶ ObsCollection
//! ```
//!
//! A store is a directory of collections, a collection a directory of items,
//! and an item a directory holding `data.parquet` and `metadata.json`. Which
//! collection an observation lands in is chosen by the caller, usually by
//! grouping on a metadata key such as the location.
//!
//! # Quick start
//!
//! ```ignore
//! use hydrostore_obs::ObsKind;
//! use hydrostore_pystore::{StoreRoot, WriteOptions, read_store, write_collection};
//!
//! let root = StoreRoot::new("data/stores");
//! let store = root.store("test_pystore")?;
//! write_collection(&store, &oc, &WriteOptions::default().with_group_by("locatie"))?;
//! let report = read_store(&store, None, ObsKind::Groundwater)?;
//! ```

mod assemble;
mod error;
mod layout;
mod options;
mod query;
mod read;
mod store;
mod table_codec;
mod write;

pub use assemble::{DEFAULT_COLLECTION_NAME, assemble};
pub use error::StoreError;
pub use layout::{DATA_FILE_NAME, INDEX_COLUMN, METADATA_FILE_NAME, validate_name};
pub use options::{Compression, WriteOptions};
pub use query::{StoreQuery, load_collection};
pub use read::{ReadReport, read_collection, read_item, read_store, read_store_metadata};
pub use store::{Collection, Item, Store, StoreRoot};
pub use write::{write_collection, write_item};
