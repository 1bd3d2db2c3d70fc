//! Request builder and response parser for the PDT confirmation protocol.
//!
//! # Design
//! `PdtClient` carries only a resolved endpoint. `build_request` and
//! `parse_response` are pure — the socket round-trip between them lives in
//! the `exchange` module — so every protocol rule here is testable without
//! a network. This is the same build/execute/parse split the exchange's
//! callers see: build the wire bytes, run them through the transport, hand
//! the body back to the parser.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use tracing::warn;

use crate::endpoint::{Endpoint, ResolvedEndpoint};
use crate::error::PdtError;
use crate::exchange;
use crate::types::{VerificationResult, VerifyRequest};

/// Client for one-shot PDT verification calls against a fixed endpoint.
#[derive(Debug, Clone)]
pub struct PdtClient {
    endpoint: ResolvedEndpoint,
}

impl PdtClient {
    /// Client for the PayPal endpoint selected by `endpoint`'s flags.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint: endpoint.resolve(),
        }
    }

    /// Client for an already-resolved endpoint (any host and port).
    pub fn with_endpoint(endpoint: ResolvedEndpoint) -> Self {
        Self { endpoint }
    }

    /// Build the complete HTTP/1.0 request (head and body) for `request`.
    ///
    /// Tokens are percent-encoded into the form body; well-formed PDT tokens
    /// are alphanumeric and pass through unchanged.
    pub fn build_request(&self, request: &VerifyRequest) -> Vec<u8> {
        let tx = utf8_percent_encode(&request.transaction_token, NON_ALPHANUMERIC);
        let at = utf8_percent_encode(&request.auth_token, NON_ALPHANUMERIC);
        let body = format!("cmd=_notify-synch&tx={tx}&at={at}");

        let head = format!(
            "POST /cgi-bin/webscr HTTP/1.0\r\n\
             Content-Type: application/x-www-form-urlencoded\r\n\
             Content-Length: {}\r\n\
             \r\n",
            body.len()
        );

        let mut wire = head.into_bytes();
        wire.extend_from_slice(body.as_bytes());
        wire
    }

    /// Decode a response body into a [`VerificationResult`].
    ///
    /// The first line must be exactly `SUCCESS`; each following line splits
    /// on its first `=` and both halves are URL-decoded. Duplicate keys keep
    /// the last occurrence. A line without `=` is skipped with a warning.
    pub fn parse_response(&self, body: &str) -> VerificationResult {
        let mut lines = body.lines();

        let Some(first) = lines.next() else {
            return VerificationResult::failure();
        };
        if first != "SUCCESS" {
            return VerificationResult::failure();
        }

        let mut fields = BTreeMap::new();
        for (index, line) in lines.enumerate() {
            match line.split_once('=') {
                Some((raw_key, raw_value)) => {
                    fields.insert(url_decode(raw_key), url_decode(raw_value));
                }
                None => {
                    // Line 0 is the SUCCESS marker, so body line numbering
                    // starts at 1.
                    warn!(line = index + 1, "skipping body line without '='");
                }
            }
        }
        VerificationResult::verified(fields)
    }

    /// Perform one full verification: build the request, drive the exchange,
    /// parse the body.
    pub fn verify(
        &self,
        transaction_token: &str,
        auth_token: &str,
    ) -> Result<VerificationResult, PdtError> {
        let request = VerifyRequest {
            transaction_token: transaction_token.to_string(),
            auth_token: auth_token.to_string(),
        };
        let wire = self.build_request(&request);
        let body = exchange::exchange(&self.endpoint, &wire)?;
        Ok(self.parse_response(&body))
    }
}

/// Verify `transaction_token` against the endpoint selected by `endpoint`.
///
/// Convenience wrapper over [`PdtClient`] for one-off calls.
pub fn verify(
    transaction_token: &str,
    auth_token: &str,
    endpoint: Endpoint,
) -> Result<VerificationResult, PdtError> {
    PdtClient::new(endpoint).verify(transaction_token, auth_token)
}

/// Decode one `application/x-www-form-urlencoded` token: `+` means space,
/// `%XX` sequences are percent-decoded.
fn url_decode(raw: &str) -> String {
    let unplussed = raw.replace('+', " ");
    percent_decode_str(&unplussed).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PdtClient {
        PdtClient::new(Endpoint::default())
    }

    fn split_request(wire: &[u8]) -> (String, String) {
        let text = std::str::from_utf8(wire).unwrap();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        (head.to_string(), body.to_string())
    }

    #[test]
    fn build_request_head_is_minimal_http10() {
        let wire = client().build_request(&VerifyRequest {
            transaction_token: "4X9012345A6789012".to_string(),
            auth_token: "Zm9vYmFy".to_string(),
        });
        let (head, body) = split_request(&wire);

        let mut lines = head.lines();
        assert_eq!(lines.next(), Some("POST /cgi-bin/webscr HTTP/1.0"));
        assert_eq!(
            lines.next(),
            Some("Content-Type: application/x-www-form-urlencoded")
        );
        assert_eq!(
            lines.next(),
            Some(format!("Content-Length: {}", body.len()).as_str())
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn build_request_interpolates_tokens() {
        let wire = client().build_request(&VerifyRequest {
            transaction_token: "TX123".to_string(),
            auth_token: "AT456".to_string(),
        });
        let (_, body) = split_request(&wire);
        assert_eq!(body, "cmd=_notify-synch&tx=TX123&at=AT456");
    }

    #[test]
    fn build_request_encodes_hostile_tokens() {
        let wire = client().build_request(&VerifyRequest {
            transaction_token: "a&b=c".to_string(),
            auth_token: "x y".to_string(),
        });
        let (_, body) = split_request(&wire);
        assert_eq!(body, "cmd=_notify-synch&tx=a%26b%3Dc&at=x%20y");
    }

    #[test]
    fn parse_success_with_fields() {
        let result = client().parse_response("SUCCESS\nfirst_name=John\nlast_name=Doe\n");
        assert!(result.is_success());
        assert_eq!(result.get("first_name"), Some("John"));
        assert_eq!(result.get("last_name"), Some("Doe"));
        assert_eq!(result.fields().len(), 2);
    }

    #[test]
    fn parse_fail_first_line() {
        let result = client().parse_response("FAIL\nError: transaction not found\n");
        assert!(!result.is_success());
        assert!(result.fields().is_empty());
    }

    #[test]
    fn parse_empty_body() {
        let result = client().parse_response("");
        assert!(!result.is_success());
    }

    #[test]
    fn parse_requires_exact_success_marker() {
        assert!(!client().parse_response("SUCCESS \nk=v\n").is_success());
        assert!(!client().parse_response(" SUCCESS\nk=v\n").is_success());
        assert!(!client().parse_response("success\nk=v\n").is_success());
    }

    #[test]
    fn parse_decodes_both_sides() {
        let result = client().parse_response("SUCCESS\nfirst%5Fname=John%20Q\namount=19%2E99\n");
        assert!(result.is_success());
        assert_eq!(result.get("first_name"), Some("John Q"));
        assert_eq!(result.get("amount"), Some("19.99"));
    }

    #[test]
    fn parse_plus_decodes_to_space() {
        let result = client().parse_response("SUCCESS\naddress=1+Main+St\n");
        assert_eq!(result.get("address"), Some("1 Main St"));
    }

    #[test]
    fn parse_duplicate_key_last_wins() {
        let result = client().parse_response("SUCCESS\nk=1\nk=2\n");
        assert_eq!(result.get("k"), Some("2"));
        assert_eq!(result.fields().len(), 1);
    }

    #[test]
    fn parse_skips_line_without_equals() {
        let result = client().parse_response("SUCCESS\nnot a pair\nk=v\n");
        assert!(result.is_success());
        assert_eq!(result.get("k"), Some("v"));
        assert_eq!(result.fields().len(), 1);
    }

    #[test]
    fn parse_splits_on_first_equals_only() {
        let result = client().parse_response("SUCCESS\nmemo=a=b=c\n");
        assert_eq!(result.get("memo"), Some("a=b=c"));
    }

    #[test]
    fn parse_accepts_crlf_terminated_lines() {
        let result = client().parse_response("SUCCESS\r\nfirst_name=John\r\n");
        assert!(result.is_success());
        assert_eq!(result.get("first_name"), Some("John"));
    }

    #[test]
    fn url_decode_handles_percent_and_plus() {
        assert_eq!(url_decode("a%2Bb"), "a+b");
        assert_eq!(url_decode("a+b"), "a b");
        assert_eq!(url_decode("plain"), "plain");
    }
}
