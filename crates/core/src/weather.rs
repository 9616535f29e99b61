//! Weather snapshot captured at write time.
//!
//! Enrichment is best-effort: a provider failure (missing credential,
//! timeout, non-2xx) degrades the snapshot to the `unavailable` sentinel
//! instead of failing the write. The snapshot is captured at creation and
//! refreshed only when an update resubmits coordinates; an update without
//! coordinates carries the stored snapshot over unchanged.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// The stored weather field: either an opaque provider response or the
/// unavailable sentinel. Serialized as a tagged object so clients can render
/// "N/A" without probing the payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherSnapshot {
    Available {
        /// The provider response, stored verbatim.
        data: serde_json::Value,
        captured_at: Timestamp,
    },
    Unavailable,
}

impl WeatherSnapshot {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, WeatherSnapshot::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_sentinel_shape() {
        let json = serde_json::to_value(WeatherSnapshot::Unavailable).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "unavailable" }));
    }

    #[test]
    fn test_available_round_trip() {
        let snapshot = WeatherSnapshot::Available {
            data: serde_json::json!({ "temp_c": 11.5, "summary": "Drizzle" }),
            captured_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["status"], "available");
        let back: WeatherSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
