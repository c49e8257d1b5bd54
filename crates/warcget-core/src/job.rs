//! Job orchestration: one triggered run over a url-list object.
//!
//! Wires list decoding, naming, the bounded scheduler, and the object store
//! into a single run: decode the list, fetch/encode/persist every URL under
//! the concurrency ceiling, wait for the drain barrier, then delete the
//! input object exactly once. Per-URL failures are captured inside the
//! archive records; only configuration, input-source, and persist/delete
//! failures fail the job.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::error::JobError;
use crate::fetch::{self, FetchOptions};
use crate::naming;
use crate::scheduler::{BoundedScheduler, Slot};
use crate::store::ObjectStore;
use crate::urilist;
use crate::warc;

/// Storage notification payload naming the object to process. Only objects
/// matching the url-list naming convention are handled; anything else is a
/// no-op skip.
#[derive(Debug, Clone, Deserialize)]
pub struct Trigger {
    /// Container holding the url-list object.
    pub container: String,
    /// Object name, possibly with `/` path segments.
    pub object: String,
}

impl Trigger {
    /// Parses a JSON notification payload, e.g. from a store event hook.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

/// Terminal state of one per-URL task.
enum TaskEnd {
    /// Archive object written.
    Persisted,
    /// Encode-stage failure; nothing written.
    Dropped,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    /// Valid URLs decoded from the input list.
    pub urls: usize,
    /// Tasks whose archive object was written.
    pub persisted: usize,
    /// Tasks dropped by an encode failure.
    pub dropped: usize,
    /// True when the trigger named a non-list object and nothing ran.
    pub skipped: bool,
}

/// Runs one job: reads the url-list object named by `trigger`, archives one
/// WARC object per URL into `config.output_container`, and deletes the
/// input on success.
pub async fn run(
    store: Arc<dyn ObjectStore>,
    config: &Config,
    trigger: &Trigger,
) -> Result<JobReport, JobError> {
    tracing::info!("{} run started", trigger.object);

    if !urilist::is_url_list(&trigger.object) {
        tracing::info!("skipping non url-list object {:?}", trigger.object);
        return Ok(JobReport {
            skipped: true,
            ..JobReport::default()
        });
    }

    let raw = store
        .read(&trigger.container, &trigger.object)
        .await
        .map_err(|source| JobError::ListRead {
            name: trigger.object.clone(),
            source,
        })?;
    let urls = urilist::decode(&trigger.object, &raw).map_err(|source| JobError::ListDecode {
        name: trigger.object.clone(),
        source,
    })?;
    tracing::info!("URL count: {}", urls.len());

    let prefix = naming::key_prefix(&trigger.object).map(str::to_string);
    let options = FetchOptions {
        timeout: config.request_timeout,
        ..FetchOptions::default()
    };

    let mut scheduler = BoundedScheduler::new(config.concurrency);
    for (line, url) in urls.iter().enumerate() {
        if line % 100 == 0 {
            tracing::info!("{} [{}] {}", trigger.object, line, url);
        }

        let slot = scheduler.admit().await;
        let key = naming::prefixed_key(
            prefix.as_deref(),
            &naming::object_key(url, config.naming),
        );
        scheduler.spawn(archive_one(
            Arc::clone(&store),
            config.output_container.clone(),
            key,
            url.clone(),
            options,
            slot,
        ));

        if config.sleep_interval > Duration::ZERO {
            tokio::time::sleep(config.sleep_interval).await;
        }
    }

    let mut report = JobReport {
        urls: urls.len(),
        ..JobReport::default()
    };
    let mut failure = None;
    for result in scheduler.drain().await {
        match result {
            Ok(TaskEnd::Persisted) => report.persisted += 1,
            Ok(TaskEnd::Dropped) => report.dropped += 1,
            Err(err) => {
                failure.get_or_insert(err);
            }
        }
    }
    if let Some(err) = failure {
        // Keep the input object so the job can be re-triggered.
        return Err(err);
    }

    tracing::info!("{} all tasks completed, cleaning up", trigger.object);
    store
        .delete(&trigger.container, &trigger.object)
        .await
        .map_err(|source| JobError::Delete {
            name: trigger.object.clone(),
            source,
        })?;

    tracing::info!(
        "{} run completed: {} persisted, {} dropped",
        trigger.object,
        report.persisted,
        report.dropped
    );
    Ok(report)
}

/// One per-URL task: fetch (outcome is always data), wrap into a WARC
/// record, persist. Encode failures drop the task; persist failures are
/// fatal to the job and surface after the drain barrier. The persist step
/// is not bounded by the per-request deadline, so a timed-out fetch's 599
/// record is still written.
async fn archive_one(
    store: Arc<dyn ObjectStore>,
    output_container: String,
    key: String,
    url: Url,
    options: FetchOptions,
    slot: Slot,
) -> Result<TaskEnd, JobError> {
    let _slot = slot;
    let target = url.to_string();

    let outcome = {
        let fetch_target = target.clone();
        match tokio::task::spawn_blocking(move || fetch::fetch(&fetch_target, options)).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!("fetch task for {} did not complete: {}", target, err);
                return Ok(TaskEnd::Dropped);
            }
        }
    };
    tracing::debug!("{} -> {}", target, outcome.status_line());

    let record = match warc::wrap_response(&target, &outcome.into_http_bytes()) {
        Ok(record) => record,
        Err(err) => {
            tracing::warn!("encoding archive record for {}: {}", target, err);
            return Ok(TaskEnd::Dropped);
        }
    };

    store
        .write(&output_container, &key, &record)
        .await
        .map_err(|source| JobError::Persist { name: key, source })?;
    Ok(TaskEnd::Persisted)
}
