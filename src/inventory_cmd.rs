//! Inventory command: list the metadata records of a store.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use hydrostore_meta::{MetaValue, X_KEY, Y_KEY};
use hydrostore_pystore::read_store_metadata;

use crate::cli::InventoryArgs;
use crate::config::HydrostoreConfig;
use crate::convert;
use crate::output;

/// Run the inventory listing.
pub fn run(args: InventoryArgs) -> Result<()> {
    let _cmd = info_span!("inventory").entered();
    let config = HydrostoreConfig::load(args.store.config.as_deref())?;
    let store = convert::open_store(&config.store, &args.store)?;

    let extent = match (&args.extent, &config.read.extent) {
        (Some(bounds), _) => Some(convert::parse_extent(bounds)?),
        (None, Some(bounds)) => Some(convert::parse_extent(bounds)?),
        (None, None) => None,
    };

    let mut records = read_store_metadata(&store)
        .with_context(|| format!("failed to read metadata of store {:?}", store.name()))?;
    let n_total = records.len();
    if let Some(extent) = extent {
        records.retain(|r| {
            extent.contains(
                r.get(X_KEY).and_then(MetaValue::as_f64),
                r.get(Y_KEY).and_then(MetaValue::as_f64),
            )
        });
    }
    info!(
        store = store.name(),
        n_total,
        n_listed = records.len(),
        "inventory built"
    );

    output::write_json(args.output.as_deref(), &records)
}
