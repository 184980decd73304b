//! Summary command: load a collection and write its summary table.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use hydrostore_obs::{ObsKind, SummaryRow};
use hydrostore_pystore::load_collection;

use crate::cli::SummaryArgs;
use crate::config::HydrostoreConfig;
use crate::convert;
use crate::output;

#[derive(Serialize)]
struct CollectionSummary<'a> {
    collection: &'a str,
    source: Option<&'a str>,
    kind: ObsKind,
    n_observations: usize,
    observations: Vec<SummaryRow>,
}

/// Run the summary pipeline.
pub fn run(args: SummaryArgs) -> Result<()> {
    let _cmd = info_span!("summary").entered();
    let config = HydrostoreConfig::load(args.store.config.as_deref())?;
    let store = convert::open_store(&config.store, &args.store)?;

    let mut query = convert::build_query(&config.read)?;
    if let Some(items) = args.items {
        query = query.with_item_names(items);
    }
    if let Some(ref bounds) = args.extent {
        query = query.with_extent(convert::parse_extent(bounds)?);
    }
    if args.metadata_only {
        query = query.with_read_series(false);
    }

    let oc = load_collection(&store, &query)
        .with_context(|| format!("failed to load collection from store {:?}", store.name()))?;
    info!(
        collection = oc.name(),
        n_observations = oc.len(),
        "collection loaded"
    );

    let summary = CollectionSummary {
        collection: oc.name(),
        source: oc.meta().source.as_deref(),
        kind: oc.meta().kind,
        n_observations: oc.len(),
        observations: oc.summary(),
    };
    output::write_json(args.output.as_deref(), &summary)
}
