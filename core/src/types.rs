//! Request and result values for a PDT verification.
//!
//! # Design
//! `VerificationResult` exposes the transaction ledger through an explicit
//! map and an `Option`-returning accessor: arbitrary keys learned at runtime
//! can still be looked up, but an absent key is a visible `None`, never a
//! silent empty value. The invariant that `fields` is populated only when
//! `success` is true is enforced by the crate-private constructors.

use std::collections::BTreeMap;

/// The two caller-supplied tokens for one verification call.
///
/// Both tokens are opaque. They are percent-encoded when embedded into the
/// request body, so a token containing `&` or `=` cannot corrupt the form
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyRequest {
    /// Short-lived transaction token issued by PayPal after checkout.
    pub transaction_token: String,
    /// Long-lived merchant PDT identity token.
    pub auth_token: String,
}

/// Outcome of one verification exchange.
///
/// Immutable after construction; one value is produced per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    success: bool,
    fields: BTreeMap<String, String>,
}

impl VerificationResult {
    pub(crate) fn failure() -> Self {
        Self {
            success: false,
            fields: BTreeMap::new(),
        }
    }

    pub(crate) fn verified(fields: BTreeMap<String, String>) -> Self {
        Self {
            success: true,
            fields,
        }
    }

    /// True iff the processor answered `SUCCESS`.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Look up one decoded transaction field (e.g. `mc_gross`) by name.
    ///
    /// Returns `None` when the key is absent — including always when the
    /// verification failed, since failed results carry no fields.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// All decoded transaction fields, in key order.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}
