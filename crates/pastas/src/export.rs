//! Exporting an observation collection into a series library.

use hydrostore_meta::FlatMeta;
use hydrostore_obs::{ObsCollection, Observation};
use tracing::{debug, info, warn};

use crate::connector::PastaStoreConnector;
use crate::error::PastasError;
use crate::series::{PastasSeries, SeriesKind};

/// Options for [`create_pastastore`].
///
/// # Example
///
/// ```
/// use hydrostore_pastas::{ExportOptions, SeriesKind};
///
/// let options = ExportOptions::default()
///     .with_obs_column("RH")
///     .with_kind(SeriesKind::Stress("prec".into()));
/// assert_eq!(options.obs_column(), "RH");
/// ```
#[derive(Debug, Clone)]
pub struct ExportOptions {
    obs_column: String,
    kind: SeriesKind,
    add_metadata: bool,
    overwrite: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            obs_column: "stand_m_tov_nap".to_string(),
            kind: SeriesKind::Oseries,
            add_metadata: true,
            overwrite: false,
        }
    }
}

impl ExportOptions {
    /// Column of each observation's table that becomes the series values.
    pub fn with_obs_column(mut self, column: impl Into<String>) -> Self {
        self.obs_column = column.into();
        self
    }

    /// Library the series go into.
    pub fn with_kind(mut self, kind: SeriesKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether flattened observation metadata travels with each series.
    pub fn with_add_metadata(mut self, add_metadata: bool) -> Self {
        self.add_metadata = add_metadata;
        self
    }

    /// Replace series of the same name instead of failing.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Value column exported from each observation.
    pub fn obs_column(&self) -> &str {
        &self.obs_column
    }

    /// Library the series are added to.
    pub fn kind(&self) -> &SeriesKind {
        &self.kind
    }
}

fn series_metadata(obs: &Observation, add_metadata: bool) -> FlatMeta {
    if !add_metadata {
        return FlatMeta::new();
    }
    let extraction = obs.extract_metadata();
    for dropped in &extraction.dropped {
        debug!(
            obs = obs.name(),
            field = %dropped.path,
            datatype = dropped.type_name,
            "field not added to series metadata"
        );
    }
    if !extraction.collisions.is_empty() {
        warn!(
            obs = obs.name(),
            keys = ?extraction.collisions,
            "metadata keys collided while flattening, last value kept"
        );
    }
    extraction.into_meta()
}

/// Converts one observation into a series, taking values from `column`.
///
/// # Errors
///
/// Returns [`PastasError::MissingColumn`] if the observation's table has no
/// such column, or [`PastasError::EmptyName`] for an unnamed observation.
pub fn to_series(
    obs: &Observation,
    column: &str,
    add_metadata: bool,
) -> Result<PastasSeries, PastasError> {
    let values = obs
        .data()
        .column(column)
        .ok_or_else(|| PastasError::MissingColumn {
            obs: obs.name().to_string(),
            column: column.to_string(),
        })?;
    let series = PastasSeries::new(obs.name(), obs.data().index().to_vec(), values.to_vec())?;
    Ok(series.with_metadata(series_metadata(obs, add_metadata)))
}

/// Adds every observation of `oc` to `connector`.
///
/// Each observation becomes one series named after it, in the library
/// chosen by [`ExportOptions::with_kind`]. Returns the number of series
/// added.
///
/// # Errors
///
/// Stops at the first observation that cannot be converted or stored;
/// series added before it stay in the connector.
pub fn create_pastastore<C>(
    oc: &ObsCollection,
    connector: &mut C,
    options: &ExportOptions,
) -> Result<usize, PastasError>
where
    C: PastaStoreConnector + ?Sized,
{
    let mut n_added = 0;
    for obs in oc {
        debug!(obs = obs.name(), kind = %options.kind, "adding to pastastore");
        let series = to_series(obs, &options.obs_column, options.add_metadata)?;
        match &options.kind {
            SeriesKind::Oseries => connector.add_oseries(series, options.overwrite)?,
            SeriesKind::Stress(kind) => connector.add_stress(series, kind, options.overwrite)?,
        }
        n_added += 1;
    }

    info!(
        connector = connector.name(),
        collection = oc.name(),
        n_added,
        "collection exported"
    );
    Ok(n_added)
}
