//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a debtor name where a client
//! RUC is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed string ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates an ID from anything string-like.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

typed_id!(ClientId, "Tax identifier (RUC) of the selling client.");
typed_id!(
    InvoiceId,
    "Invoice identifier, unique within a client (series plus number)."
);
typed_id!(
    InvoiceKey,
    "Stable selection identity of an invoice: `{client_id}-{invoice_id}`."
);

impl InvoiceKey {
    /// Builds the composite key for an invoice of a client.
    #[must_use]
    pub fn compose(client_id: &ClientId, invoice_id: &InvoiceId) -> Self {
        Self(format!("{client_id}-{invoice_id}"))
    }
}
