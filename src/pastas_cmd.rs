//! Pastas command: export a store into a pastastore library.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use hydrostore_pastas::{
    DictConnector, PastaStoreConnector, PastasSeries, SeriesKind, create_pastastore,
};
use hydrostore_pystore::load_collection;

use crate::cli::PastasArgs;
use crate::config::HydrostoreConfig;
use crate::convert;
use crate::output;

#[derive(Serialize)]
struct LibraryDump<'a> {
    connector: &'a str,
    oseries: Vec<&'a PastasSeries>,
    stresses: Vec<&'a PastasSeries>,
}

/// Run the pastastore export.
pub fn run(args: PastasArgs) -> Result<()> {
    let _cmd = info_span!("pastas").entered();
    let config = HydrostoreConfig::load(args.store.config.as_deref())?;
    let store = convert::open_store(&config.store, &args.store)?;

    let mut options = convert::build_export_options(&config.pastas)?;
    if let Some(ref column) = args.obs_column {
        options = options.with_obs_column(column);
    }
    if let Some(ref kind) = args.stress {
        options = options.with_kind(SeriesKind::Stress(kind.clone()));
    }

    let query = convert::build_query(&config.read)?.with_read_series(true);
    let oc = load_collection(&store, &query)
        .with_context(|| format!("failed to load collection from store {:?}", store.name()))?;

    let mut connector = DictConnector::new(&config.pastas.connector);
    let n_added = create_pastastore(&oc, &mut connector, &options)
        .context("failed to export collection to pastastore")?;
    info!(
        connector = connector.name(),
        n_added,
        kind = %options.kind(),
        "pastastore filled"
    );

    let dump = LibraryDump {
        connector: connector.name(),
        oseries: connector.oseries(),
        stresses: connector.stresses(),
    };
    output::write_json(args.output.as_deref(), &dump)
}
