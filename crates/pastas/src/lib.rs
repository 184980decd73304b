//! Hand observation collections to a pastastore-style series library and
//! read them back.
//!
//! A connector holds two libraries: `oseries` (observed heads to be
//! modelled) and `stresses` (explanatory series such as precipitation).
//! [`create_pastastore`] fills one of them from an [`ObsCollection`];
//! [`read_oseries`] turns the oseries library back into observations.
//!
//! [`ObsCollection`]: hydrostore_obs::ObsCollection

mod connector;
mod error;
mod export;
mod import;
mod series;

pub use connector::{DictConnector, PastaStoreConnector};
pub use error::PastasError;
pub use export::{ExportOptions, create_pastastore, to_series};
pub use import::{read_oseries, to_observation};
pub use series::{PastasSeries, SeriesKind};
