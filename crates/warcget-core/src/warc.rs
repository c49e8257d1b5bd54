//! WARC record encoding.
//!
//! Wraps one captured HTTP response into a WARC/1.0 response record and
//! gzip-compresses it, one record per archive object. The record is framed
//! by its own Content-Length header so standard WARC readers can parse it
//! without external context.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

const WARC_VERSION: &str = "WARC/1.0";
/// Content-Type of a record payload holding a raw HTTP response.
const HTTP_RESPONSE_TYPE: &str = "application/http;msgtype=response";

/// Builds one gzipped WARC response record for `target_uri`, wrapping the
/// HTTP response wire bytes produced by the fetch worker. An error here is
/// an encode failure: the caller drops the task, the run continues.
pub fn wrap_response(target_uri: &str, http_bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    write_record(&mut encoder, target_uri, http_bytes)?;
    encoder.finish()
}

fn write_record<W: Write>(w: &mut W, target_uri: &str, content: &[u8]) -> io::Result<()> {
    write!(w, "{WARC_VERSION}\r\n")?;
    write!(w, "WARC-Type: response\r\n")?;
    write!(w, "WARC-Target-URI: {target_uri}\r\n")?;
    write!(w, "Content-Type: {HTTP_RESPONSE_TYPE}\r\n")?;
    write!(w, "Content-Length: {}\r\n", content.len())?;
    write!(w, "\r\n")?;
    w.write_all(content)?;
    // Record boundary: two CRLFs after the content block.
    w.write_all(b"\r\n\r\n")?;
    Ok(())
}
