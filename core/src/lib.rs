//! Synchronous PayPal Payment Data Transfer (PDT) verification client.
//!
//! # Overview
//! Confirms a completed checkout server-to-server: given the transaction
//! token PayPal hands back after checkout and the merchant's PDT auth token,
//! the client POSTs a `_notify-synch` request to the confirmation endpoint,
//! reads the raw response, and parses the line-oriented `key=value` body
//! into a [`VerificationResult`].
//!
//! # Design
//! - `PdtClient` keeps the protocol logic pure: `build_request` produces the
//!   wire bytes and `parse_response` consumes a response body, so both sides
//!   are testable without a network. `verify` chains them through the one
//!   I/O step in [`exchange`].
//! - Endpoint resolution (production/sandbox host, plaintext/TLS port) is a
//!   pure function of [`Endpoint`] flags; [`ResolvedEndpoint`] has public
//!   fields so tests and unusual callers can target any host.
//! - The connection is a scoped resource: opened, fully driven, and dropped
//!   within a single `exchange` call. No pooling, no reuse, no retries.
//! - Transport faults surface as [`PdtError`]; a reachable processor that
//!   answers anything but `SUCCESS` is an `Ok` result with `success = false`.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod exchange;
pub mod types;

pub use client::{verify, PdtClient};
pub use endpoint::{Endpoint, ResolvedEndpoint};
pub use error::PdtError;
pub use types::{VerificationResult, VerifyRequest};
