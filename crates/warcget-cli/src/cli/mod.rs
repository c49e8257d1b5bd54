//! CLI for the warcget URL-list archiver.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use warcget_core::config;

use commands::{run_event, run_job, run_key};

/// Top-level CLI for the warcget URL-list archiver.
#[derive(Debug, Parser)]
#[command(name = "warcget")]
#[command(
    about = "warcget: fetch a list of URLs concurrently and archive each response as gzipped WARC",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Flags that override the configured run options.
#[derive(Debug, clap::Args)]
pub struct RunOverrides {
    /// Output container archive objects are written to.
    #[arg(long, value_name = "NAME")]
    pub output: Option<String>,
    /// How many fetches to keep in flight at once.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,
    /// Seconds to pause between task admissions (politeness delay).
    #[arg(long, value_name = "SECS")]
    pub sleep: Option<f64>,
    /// Object naming mode: sha1, url, or hostname.
    #[arg(long, value_name = "MODE")]
    pub naming: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Process a url-list object: fetch every URL and archive the responses.
    Run {
        /// Container (directory under --root) holding the url-list object.
        container: String,
        /// Name of the url-list object (`.txt` or `.txt.gz`), may contain `/` segments.
        object: String,
        /// Directory the store containers live under (default: current directory).
        #[arg(long, value_name = "DIR")]
        root: Option<String>,
        #[command(flatten)]
        overrides: RunOverrides,
    },

    /// Process a JSON storage-notification event naming the url-list object.
    Event {
        /// Path to the event payload, e.g. `{"container": "in", "object": "urls.txt"}`.
        path: String,
        /// Directory the store containers live under (default: current directory).
        #[arg(long, value_name = "DIR")]
        root: Option<String>,
        #[command(flatten)]
        overrides: RunOverrides,
    },

    /// Print the archive object key a URL maps to.
    Key {
        /// URL to name.
        url: String,
        /// Naming mode: sha1, url, or hostname (default from config).
        #[arg(long, value_name = "MODE")]
        naming: Option<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                container,
                object,
                root,
                overrides,
            } => run_job(cfg, &container, &object, root.as_deref(), overrides).await?,
            CliCommand::Event {
                path,
                root,
                overrides,
            } => run_event(cfg, &path, root.as_deref(), overrides).await?,
            CliCommand::Key { url, naming } => run_key(&cfg, &url, naming.as_deref())?,
        }

        Ok(())
    }
}
