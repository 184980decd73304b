//! Regroup command: copy a store into another, grouped by a metadata key.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use hydrostore_pystore::{StoreRoot, load_collection, write_collection};

use crate::cli::RegroupArgs;
use crate::config::HydrostoreConfig;
use crate::convert;

/// Run the regroup pipeline.
pub fn run(args: RegroupArgs) -> Result<()> {
    let _cmd = info_span!("regroup").entered();
    let config = HydrostoreConfig::load(args.store.config.as_deref())?;
    let source = convert::open_store(&config.store, &args.store)?;

    if source.name() == args.target {
        bail!("target store must differ from the source store {:?}", args.target);
    }
    let root = args.store.root.as_ref().unwrap_or(&config.store.root);
    let target = StoreRoot::new(root)
        .store(&args.target)
        .with_context(|| format!("invalid target store name {:?}", args.target))?;

    let mut options = convert::build_write_options(&config.write)?;
    if let Some(ref key) = args.group_by {
        options = options.with_group_by(key);
    }
    if args.overwrite {
        options = options.with_overwrite(true);
    }
    if options.group_by().is_none() {
        warn!("no grouping key given, every item gets its own collection");
    }

    let query = convert::build_query(&config.read)?.with_read_series(true);
    let oc = load_collection(&source, &query)
        .with_context(|| format!("failed to read store {:?}", source.name()))?;

    let n_written = write_collection(&target, &oc, &options)
        .with_context(|| format!("failed to write store {:?}", target.name()))?;
    info!(
        source = source.name(),
        target = target.name(),
        n_written,
        "store regrouped"
    );
    Ok(())
}
