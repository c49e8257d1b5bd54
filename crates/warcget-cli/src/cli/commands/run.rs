//! `warcget run` – process one url-list object against the filesystem store.

use anyhow::Result;
use std::sync::Arc;

use warcget_core::config::JobConfig;
use warcget_core::job::{self, Trigger};
use warcget_core::store::{FsStore, ObjectStore};

use crate::cli::RunOverrides;

/// Applies CLI overrides, validates the configuration, and runs the job.
pub async fn run_job(
    mut cfg: JobConfig,
    container: &str,
    object: &str,
    root: Option<&str>,
    overrides: RunOverrides,
) -> Result<()> {
    if let Some(output) = overrides.output {
        cfg.output_container = Some(output);
    }
    if let Some(concurrency) = overrides.concurrency {
        cfg.concurrency = concurrency;
    }
    if let Some(sleep) = overrides.sleep {
        cfg.sleep_secs = sleep;
    }
    if let Some(naming) = overrides.naming {
        cfg.naming = naming.parse()?;
    }
    let config = cfg.validate()?;

    let root = match root {
        Some(dir) => dir.to_string(),
        None => std::env::current_dir()?.to_string_lossy().into_owned(),
    };
    let store: Arc<dyn ObjectStore> = Arc::new(FsStore::new(root));

    let trigger = Trigger {
        container: container.to_string(),
        object: object.to_string(),
    };
    let report = job::run(store, &config, &trigger).await?;

    if report.skipped {
        println!("{} is not a url-list object; nothing to do.", object);
    } else {
        println!(
            "{}: {} urls, {} archived, {} dropped",
            object, report.urls, report.persisted, report.dropped
        );
    }
    Ok(())
}
