//! Rebuilding observations from the oseries library.

use std::collections::BTreeMap;

use hydrostore_meta::{KIND_KEY, MetaValue, NAME_KEY, X_KEY, Y_KEY, to_fields};
use hydrostore_obs::{DataTable, ObsKind, Observation};
use tracing::info;

use crate::connector::PastaStoreConnector;
use crate::error::PastasError;
use crate::series::PastasSeries;

/// Rebuilds one observation from a stored series.
///
/// Metadata keys are renamed through `rename` first. The observation name
/// comes from the `name` entry when it is text, else from the series name;
/// `x` and `y` are lifted from numeric entries. A carried `kind` entry is
/// dropped in favour of `kind`. The values form a single column named
/// after the kind's default value column.
///
/// # Errors
///
/// Returns [`PastasError::Table`] if the series cannot form a data table.
pub fn to_observation(
    series: &PastasSeries,
    kind: ObsKind,
    rename: &BTreeMap<String, String>,
) -> Result<Observation, PastasError> {
    let mut meta = series.metadata().clone();
    for (from, to) in rename {
        if let Some(value) = meta.remove(from) {
            meta.insert(to.clone(), value);
        }
    }
    meta.remove(KIND_KEY);

    let name = meta
        .get(NAME_KEY)
        .and_then(MetaValue::as_str)
        .unwrap_or(series.name())
        .to_string();
    let x = meta.get(X_KEY).and_then(MetaValue::as_f64);
    let y = meta.get(Y_KEY).and_then(MetaValue::as_f64);
    let filename = meta
        .get("filename")
        .and_then(MetaValue::as_str)
        .unwrap_or_default()
        .to_string();

    let data = DataTable::new(
        series.index().to_vec(),
        vec![(kind.value_column().to_string(), series.values().to_vec())],
    )?;

    Ok(Observation::new(name, data)
        .with_xy(x, y)
        .with_filename(filename)
        .with_kind(kind)
        .with_meta(to_fields(&meta)))
}

/// Rebuilds observations from every series in the oseries library, in
/// library order.
///
/// # Errors
///
/// Returns the first error from [`to_observation`].
pub fn read_oseries<C>(
    connector: &C,
    kind: ObsKind,
    rename: &BTreeMap<String, String>,
) -> Result<Vec<Observation>, PastasError>
where
    C: PastaStoreConnector + ?Sized,
{
    let observations = connector
        .oseries()
        .into_iter()
        .map(|s| to_observation(s, kind, rename))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        connector = connector.name(),
        n_observations = observations.len(),
        "oseries read"
    );
    Ok(observations)
}
