//! `warcget event` – process a JSON storage-notification payload.

use anyhow::{Context, Result};

use warcget_core::config::JobConfig;
use warcget_core::job::Trigger;

use crate::cli::RunOverrides;

use super::run::run_job;

/// Reads the event file and hands the named object to the run pipeline.
pub async fn run_event(
    cfg: JobConfig,
    path: &str,
    root: Option<&str>,
    overrides: RunOverrides,
) -> Result<()> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading event file {}", path))?;
    let trigger = Trigger::from_json(&data)
        .with_context(|| format!("parsing event file {}", path))?;
    run_job(cfg, &trigger.container, &trigger.object, root, overrides).await
}
