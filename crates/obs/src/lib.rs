//! # hydrostore-obs
//!
//! In-memory observation model: a [`DataTable`] of time-indexed value
//! columns, the [`Observation`] wrapping it with identity, coordinates and
//! free-form metadata, and the [`ObsCollection`] that groups observations
//! behind a summary table.

mod collection;
mod error;
mod kind;
mod observation;
mod table;

pub use collection::{CollectionMeta, Extent, ObsCollection, SummaryRow};
pub use error::ObsError;
pub use kind::ObsKind;
pub use observation::Observation;
pub use table::{Column, DataTable};
