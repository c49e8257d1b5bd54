//! Output object naming.
//!
//! Derives the archive object key for each URL. Key computation is a pure
//! function of `(url, mode)` so re-running a list produces the same names.

use sha1::{Digest, Sha1};
use url::Url;

use crate::config::NameMode;

/// Extension appended to every archive object key.
pub const ARCHIVE_SUFFIX: &str = ".warc.gz";

/// Returns the archive object key for `url` under `mode`.
///
/// Hostname mode uses the host alone; two URLs that differ only in path,
/// query, or scheme then map to the same key and overwrite each other.
pub fn object_key(url: &Url, mode: NameMode) -> String {
    let stem = match mode {
        NameMode::Sha1 => hex::encode(Sha1::digest(url.as_str().as_bytes())),
        NameMode::Url => urlencoding::encode(url.as_str()).into_owned(),
        NameMode::Hostname => url.host_str().unwrap_or_default().to_string(),
    };
    format!("{stem}{ARCHIVE_SUFFIX}")
}

/// Directory-style prefix of an input object name: every `/`-separated
/// segment except the last. `None` for bare names.
pub fn key_prefix(name: &str) -> Option<&str> {
    match name.rsplit_once('/') {
        Some(("", _)) | None => None,
        Some((prefix, _)) => Some(prefix),
    }
}

/// Joins the input object's prefix onto an archive key with a single `/`,
/// so outputs land next to the list that produced them.
pub fn prefixed_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(p) => format!("{p}/{key}"),
        None => key.to_string(),
    }
}
