//! Location and weather enrichment for journal entries.
//!
//! Resolves coordinates to a human-readable place name and fetches a
//! weather snapshot for the moment of writing. Both lookups are best
//! effort: callers degrade to manual place entry and the "unavailable"
//! weather sentinel when a provider cannot answer.

pub mod error;
pub mod http;
pub mod provider;

pub use error::EnrichError;
pub use http::{HttpEnricher, HttpEnricherConfig};
pub use provider::{EnrichmentProvider, FixedProvider, ResolvedPlace};
