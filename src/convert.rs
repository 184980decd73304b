//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, anyhow, bail};

use hydrostore_obs::{Extent, ObsKind};
use hydrostore_pastas::{ExportOptions, SeriesKind};
use hydrostore_pystore::{Compression, Store, StoreQuery, StoreRoot, WriteOptions};

use crate::cli::StoreArgs;
use crate::config::*;

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses an observation kind name.
pub fn parse_kind(s: &str) -> Result<ObsKind> {
    Ok(s.parse::<ObsKind>()?)
}

/// Parses a pastastore library name: `oseries`, or any other string as a
/// stress kind.
pub fn parse_series_kind(s: &str) -> Result<SeriesKind> {
    match s.trim() {
        "" => bail!("series kind must not be empty"),
        "oseries" => Ok(SeriesKind::Oseries),
        other => Ok(SeriesKind::Stress(other.to_string())),
    }
}

/// Builds an [`Extent`] from `[xmin, xmax, ymin, ymax]`.
pub fn parse_extent(bounds: &[f64]) -> Result<Extent> {
    let bounds: [f64; 4] = bounds
        .try_into()
        .map_err(|_| anyhow!("extent needs 4 values, got {}", bounds.len()))?;
    Ok(Extent::new(bounds)?)
}

/// Opens the store named by the CLI flags or, failing that, the config.
pub fn open_store(cfg: &StoreToml, args: &StoreArgs) -> Result<Store> {
    let root = args.root.as_ref().unwrap_or(&cfg.root);
    let name = args
        .store
        .as_deref()
        .or(cfg.name.as_deref())
        .ok_or_else(|| anyhow!("no store name: set [store].name in config or use --store"))?;
    StoreRoot::new(root)
        .store(name)
        .with_context(|| format!("invalid store name {name:?}"))
}

/// Builds [`WriteOptions`] from the TOML write configuration.
pub fn build_write_options(write: &WriteToml) -> Result<WriteOptions> {
    let compression = parse_compression(&write.compression)?;
    let mut options = WriteOptions::default()
        .with_overwrite(write.overwrite)
        .with_compression(compression)
        .with_row_group_size(write.row_group_size);
    if let Some(ref key) = write.group_by {
        options = options.with_group_by(key);
    }
    options.validate()?;
    Ok(options)
}

/// Builds a [`StoreQuery`] from the TOML read configuration.
pub fn build_query(read: &ReadToml) -> Result<StoreQuery> {
    let mut query = StoreQuery::new()
        .with_name(&read.collection_name)
        .with_kind(parse_kind(&read.kind)?)
        .with_read_series(read.read_series);
    if let Some(ref items) = read.items {
        query = query.with_item_names(items.iter().cloned());
    }
    if let Some(bounds) = read.extent {
        query = query.with_extent(parse_extent(&bounds)?);
    }
    Ok(query)
}

/// Builds [`ExportOptions`] from the TOML pastas configuration.
pub fn build_export_options(pastas: &PastasToml) -> Result<ExportOptions> {
    Ok(ExportOptions::default()
        .with_obs_column(&pastas.obs_column)
        .with_kind(parse_series_kind(&pastas.kind)?)
        .with_add_metadata(pastas.add_metadata)
        .with_overwrite(pastas.overwrite))
}
