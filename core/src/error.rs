//! Error types for the PDT verification client.
//!
//! # Design
//! Transport failures get their own variants instead of being folded into a
//! `success = false` result: callers frequently distinguish "the processor
//! said FAIL" from "we never got a usable answer." `MissingBoundary` is kept
//! separate from `Io` because it means the remote spoke, but never produced
//! the blank line separating headers from the body.

use std::fmt;
use std::io;

/// Errors returned by the verification exchange.
#[derive(Debug)]
pub enum PdtError {
    /// The connection could not be established (DNS failure, refused
    /// connection, connect timeout).
    Connect(io::Error),

    /// TLS setup or handshake failed.
    Tls(String),

    /// The connection dropped or timed out mid-exchange.
    Io(io::Error),

    /// The stream ended before the header/body boundary (an empty CRLF line)
    /// was seen — the response carries no usable body.
    MissingBoundary,

    /// The response could not be interpreted as text.
    InvalidResponse(String),
}

impl fmt::Display for PdtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdtError::Connect(e) => write!(f, "connection failed: {e}"),
            PdtError::Tls(msg) => write!(f, "TLS failure: {msg}"),
            PdtError::Io(e) => write!(f, "exchange I/O failed: {e}"),
            PdtError::MissingBoundary => {
                write!(f, "no header/body boundary found in response")
            }
            PdtError::InvalidResponse(msg) => {
                write!(f, "invalid response: {msg}")
            }
        }
    }
}

impl std::error::Error for PdtError {}
