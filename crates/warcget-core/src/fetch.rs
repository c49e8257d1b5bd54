//! HTTP fetch worker.
//!
//! One GET per URL via the curl crate (libcurl), following redirects, with a
//! per-request deadline. A fetch always yields a [`FetchOutcome`]; transport
//! failures become synthetic 599 responses instead of errors, so a bad URL
//! or dead host is archived as data and never aborts the run.

use std::time::Duration;

/// Synthesized status line when the request cannot be constructed.
const STATUS_REQUEST_ERROR: &str = "HTTP/1.0 599 Request Error";
/// Synthesized status line for transport failures (DNS, TCP, TLS, deadline).
const STATUS_CONNECTION_ERROR: &str = "HTTP/1.0 599 Connection Error";

/// Fetch knobs shared by every task in a run. Each transfer builds its own
/// curl `Easy` handle from these.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Deadline for the whole transfer, redirects included.
    pub timeout: Duration,
    /// Redirect ceiling before the transfer is failed.
    pub max_redirects: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 10,
        }
    }
}

/// Tagged result of one fetch attempt. Exactly one per URL, always produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server delivered a final (post-redirect) response. `head` holds
    /// the raw status line and headers as received, including the blank line
    /// terminator; `body` the full payload.
    Success { head: Vec<u8>, body: Vec<u8> },
    /// The request could not be constructed.
    RequestError { reason: String },
    /// The request was sent but failed in transport.
    ConnectionError { reason: String },
}

impl FetchOutcome {
    /// First line of the response; synthesized for error outcomes.
    pub fn status_line(&self) -> String {
        match self {
            FetchOutcome::Success { head, .. } => {
                let line = head.split(|&b| b == b'\n').next().unwrap_or_default();
                String::from_utf8_lossy(line).trim_end().to_string()
            }
            FetchOutcome::RequestError { .. } => STATUS_REQUEST_ERROR.to_string(),
            FetchOutcome::ConnectionError { .. } => STATUS_CONNECTION_ERROR.to_string(),
        }
    }

    /// Serializes the outcome as an HTTP/1.x response in wire format, the
    /// payload of one archive record.
    pub fn into_http_bytes(self) -> Vec<u8> {
        match self {
            FetchOutcome::Success { mut head, body } => {
                head.extend_from_slice(&body);
                head
            }
            FetchOutcome::RequestError { reason } => synthesize(STATUS_REQUEST_ERROR, &reason),
            FetchOutcome::ConnectionError { reason } => {
                synthesize(STATUS_CONNECTION_ERROR, &reason)
            }
        }
    }
}

fn synthesize(status: &str, reason: &str) -> Vec<u8> {
    format!("{status}\r\nError: {reason}\r\n\r\n").into_bytes()
}

fn configure(
    easy: &mut curl::easy::Easy,
    url: &str,
    options: FetchOptions,
) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(options.max_redirects)?;
    easy.timeout(options.timeout)?;
    Ok(())
}

/// Fetches `url` with one GET, following redirects, bounded by the deadline
/// in `options`. Never fails: every outcome is represented as data.
/// Runs in the current thread; call from `spawn_blocking` if used from
/// async code.
pub fn fetch(url: &str, options: FetchOptions) -> FetchOutcome {
    let mut head: Vec<u8> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    if let Err(err) = configure(&mut easy, url, options) {
        return FetchOutcome::RequestError {
            reason: err.to_string(),
        };
    }

    {
        let mut transfer = easy.transfer();
        let registered = transfer.header_function(|line| {
            // follow_location delivers one header block per hop; a new
            // status line resets the buffer so only the final hop survives.
            if line.starts_with(b"HTTP/") {
                head.clear();
            }
            head.extend_from_slice(line);
            true
        });
        if let Err(err) = registered {
            return FetchOutcome::RequestError {
                reason: err.to_string(),
            };
        }
        let registered = transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        });
        if let Err(err) = registered {
            return FetchOutcome::RequestError {
                reason: err.to_string(),
            };
        }
        if let Err(err) = transfer.perform() {
            return FetchOutcome::ConnectionError {
                reason: err.to_string(),
            };
        }
    }

    FetchOutcome::Success { head, body }
}
