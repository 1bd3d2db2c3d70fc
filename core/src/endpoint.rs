//! PDT confirmation endpoint selection.
//!
//! # Design
//! The two PayPal hosts live in a constant table and selection is a pure
//! function of the [`Endpoint`] flags — no globals, no error paths. The
//! resolved value is plain data with public fields: the exchange layer takes
//! any `ResolvedEndpoint`, which is also how integration tests point the
//! client at a local mock server.

const PRODUCTION_HOST: &str = "www.paypal.com";
const SANDBOX_HOST: &str = "sandbox.paypal.com";

/// Which PDT confirmation endpoint to talk to.
///
/// Both flags default to `false`: production host, plaintext port 80.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Endpoint {
    /// Use PayPal's sandbox server instead of production.
    pub use_sandbox: bool,
    /// Connect over TLS (port 443) instead of plaintext (port 80).
    pub use_tls: bool,
}

impl Endpoint {
    /// Resolve the flags into concrete connection parameters.
    pub fn resolve(&self) -> ResolvedEndpoint {
        let host = if self.use_sandbox {
            SANDBOX_HOST
        } else {
            PRODUCTION_HOST
        };
        let (port, encrypted) = if self.use_tls { (443, true) } else { (80, false) };
        ResolvedEndpoint {
            host: host.to_string(),
            port,
            encrypted,
        }
    }
}

/// Concrete connection parameters for one verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub host: String,
    pub port: u16,
    pub encrypted: bool,
}
