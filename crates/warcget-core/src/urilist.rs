//! text/uri-list decoding.
//!
//! Turns the raw bytes of a url-list object into parsed URLs, one per line.
//! Gzip-compressed lists are recognized by the `.gz` naming hint. Lines that
//! fail to parse are skipped with a warning and never enter the pipeline.

use flate2::read::GzDecoder;
use std::io::{self, BufRead, BufReader};
use url::Url;

/// True if `name` follows the url-list naming convention: `.txt`, optionally
/// gzip-compressed. Trigger events for any other name are a no-op skip.
pub fn is_url_list(name: &str) -> bool {
    name.ends_with(".txt") || name.ends_with(".txt.gz")
}

fn is_gzipped(name: &str) -> bool {
    name.ends_with(".gz")
}

/// Decodes the bytes of the url-list object `name` into URLs, decompressing
/// first when the name carries the `.gz` hint. Blank lines and lines that do
/// not parse as absolute URLs are skipped; an i/o error (e.g. gzip
/// corruption) is fatal to the run.
pub fn decode(name: &str, raw: &[u8]) -> io::Result<Vec<Url>> {
    if is_gzipped(name) {
        decode_lines(BufReader::new(GzDecoder::new(raw)))
    } else {
        decode_lines(raw)
    }
}

fn decode_lines<R: BufRead>(reader: R) -> io::Result<Vec<Url>> {
    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match Url::parse(&line) {
            Ok(url) => urls.push(url),
            Err(err) => tracing::warn!("skipping invalid url {:?}: {}", line, err),
        }
    }
    Ok(urls)
}
