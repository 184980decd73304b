//! Storage backends for series libraries.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::PastasError;
use crate::series::{PastasSeries, SeriesKind};

const OSERIES: &str = "oseries";
const STRESSES: &str = "stresses";

/// A store holding two series libraries: observed series and stresses.
///
/// Implementors provide the storage of already-tagged series; the
/// [`add_oseries`](Self::add_oseries) and [`add_stress`](Self::add_stress)
/// helpers set the series kind before handing it over.
pub trait PastaStoreConnector {
    /// Connector name.
    fn name(&self) -> &str;

    /// Stores a series in the library matching its kind.
    ///
    /// # Errors
    ///
    /// Returns [`PastasError::AlreadyExists`] if the library already holds
    /// a series of that name and `overwrite` is false.
    fn add_series(&mut self, series: PastasSeries, overwrite: bool) -> Result<(), PastasError>;

    /// Observed series, sorted by name.
    fn oseries(&self) -> Vec<&PastasSeries>;

    /// Stresses, sorted by name.
    fn stresses(&self) -> Vec<&PastasSeries>;

    /// Adds `series` to the oseries library.
    fn add_oseries(&mut self, series: PastasSeries, overwrite: bool) -> Result<(), PastasError> {
        self.add_series(series.with_kind(SeriesKind::Oseries), overwrite)
    }

    /// Adds `series` to the stresses library under the given stress kind.
    fn add_stress(
        &mut self,
        series: PastasSeries,
        kind: &str,
        overwrite: bool,
    ) -> Result<(), PastasError> {
        self.add_series(series.with_kind(SeriesKind::Stress(kind.to_string())), overwrite)
    }

    /// Looks up an observed series by name.
    ///
    /// # Errors
    ///
    /// Returns [`PastasError::NotFound`] if no such series is stored.
    fn get_oseries(&self, name: &str) -> Result<&PastasSeries, PastasError> {
        self.oseries()
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| PastasError::NotFound {
                library: OSERIES,
                name: name.to_string(),
            })
    }
}

/// In-memory connector.
#[derive(Debug, Clone, Default)]
pub struct DictConnector {
    name: String,
    oseries: BTreeMap<String, PastasSeries>,
    stresses: BTreeMap<String, PastasSeries>,
}

impl DictConnector {
    /// Creates an empty connector called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of series over both libraries.
    pub fn len(&self) -> usize {
        self.oseries.len() + self.stresses.len()
    }

    /// Whether both libraries are empty.
    pub fn is_empty(&self) -> bool {
        self.oseries.is_empty() && self.stresses.is_empty()
    }
}

impl PastaStoreConnector for DictConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_series(&mut self, series: PastasSeries, overwrite: bool) -> Result<(), PastasError> {
        let (library, map) = match series.kind() {
            SeriesKind::Oseries => (OSERIES, &mut self.oseries),
            SeriesKind::Stress(_) => (STRESSES, &mut self.stresses),
        };
        if !overwrite && map.contains_key(series.name()) {
            return Err(PastasError::AlreadyExists {
                library,
                name: series.name().to_string(),
            });
        }
        debug!(
            connector = %self.name,
            library,
            series = series.name(),
            n_values = series.len(),
            "series added"
        );
        map.insert(series.name().to_string(), series);
        Ok(())
    }

    fn oseries(&self) -> Vec<&PastasSeries> {
        self.oseries.values().collect()
    }

    fn stresses(&self) -> Vec<&PastasSeries> {
        self.stresses.values().collect()
    }
}
