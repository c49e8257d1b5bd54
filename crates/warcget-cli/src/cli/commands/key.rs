//! `warcget key` – print the archive object key a URL maps to.

use anyhow::{Context, Result};
use url::Url;

use warcget_core::config::JobConfig;
use warcget_core::naming;

/// Resolves the naming mode (flag wins over config) and prints the key.
pub fn run_key(cfg: &JobConfig, url: &str, naming: Option<&str>) -> Result<()> {
    let mode = match naming {
        Some(s) => s.parse()?,
        None => cfg.naming,
    };
    let url = Url::parse(url).with_context(|| format!("parsing url {:?}", url))?;
    println!("{}", naming::object_key(&url, mode));
    Ok(())
}
