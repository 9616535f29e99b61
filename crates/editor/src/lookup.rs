//! Stale-response guards for fire-and-forget lookups.
//!
//! Reverse geocoding, place search-as-you-type, and the weather preview are
//! single-shot requests with no cancellation: a superseding request does not
//! abort an in-flight earlier one, so responses can arrive out of order.
//! Each input field owns a [`RequestSequencer`]; a response is applied only
//! when its ticket is still the newest, so a stale reply can never overwrite
//! fresher state.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation counter for one input field.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

/// A ticket identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestSequencer {
    pub fn new() -> Self {
        RequestSequencer::default()
    }

    /// Issue a ticket for a new outgoing request, superseding all earlier
    /// ones.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether a response carrying `ticket` may be applied: true only for
    /// the most recently issued ticket.
    pub fn accept(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}
