//! Errors from the enrichment providers.

/// Errors from the location/weather provider layer.
///
/// Handlers never surface these to the client; a failed lookup degrades
/// the field instead (manual place entry, weather "unavailable").
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered but the payload was missing an expected field.
    #[error("Provider response missing '{0}'")]
    MissingField(&'static str),
}
