//! The provider trait and a fixed in-memory implementation for tests.

use async_trait::async_trait;

use naturelog_core::entry::Coordinates;
use naturelog_core::place::normalize_place;
use naturelog_core::weather::WeatherSnapshot;

use crate::error::EnrichError;

/// A reverse-geocoded place, reduced to the two components shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlace {
    /// City, town, or village.
    pub locality: String,
    /// State, province, or county.
    pub region: String,
}

impl ResolvedPlace {
    /// The "locality, region" display form.
    pub fn display_name(&self) -> String {
        normalize_place(&format!("{}, {}", self.locality, self.region))
    }
}

/// Resolves coordinates to a place name and a weather snapshot.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<ResolvedPlace, EnrichError>;

    async fn current_weather(&self, coords: Coordinates) -> Result<WeatherSnapshot, EnrichError>;
}

/// A provider that always answers with fixed values, or always fails.
/// Used by tests and local development without network access.
pub struct FixedProvider {
    place: Option<ResolvedPlace>,
    weather: Option<WeatherSnapshot>,
}

impl FixedProvider {
    pub fn new(place: ResolvedPlace, weather: WeatherSnapshot) -> Self {
        FixedProvider { place: Some(place), weather: Some(weather) }
    }

    /// A provider whose every lookup fails, for exercising the degraded
    /// paths.
    pub fn unavailable() -> Self {
        FixedProvider { place: None, weather: None }
    }
}

#[async_trait]
impl EnrichmentProvider for FixedProvider {
    async fn reverse_geocode(&self, _coords: Coordinates) -> Result<ResolvedPlace, EnrichError> {
        self.place
            .clone()
            .ok_or(EnrichError::MissingField("address"))
    }

    async fn current_weather(&self, _coords: Coordinates) -> Result<WeatherSnapshot, EnrichError> {
        self.weather
            .clone()
            .ok_or(EnrichError::MissingField("current_weather"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_locality_comma_region() {
        let place = ResolvedPlace { locality: "Springfield".into(), region: "Illinois".into() };
        assert_eq!(place.display_name(), "Springfield, Illinois");
    }

    #[tokio::test]
    async fn test_fixed_provider_round_trip() {
        let provider = FixedProvider::new(
            ResolvedPlace { locality: "Ely".into(), region: "Cambridgeshire".into() },
            WeatherSnapshot::Unavailable,
        );
        let coords = Coordinates { lat: 52.39, lng: 0.26 };
        let place = provider.reverse_geocode(coords).await.unwrap();
        assert_eq!(place.display_name(), "Ely, Cambridgeshire");
        assert!(provider.current_weather(coords).await.unwrap().is_unavailable());
    }

    #[tokio::test]
    async fn test_unavailable_provider_fails_both_lookups() {
        let provider = FixedProvider::unavailable();
        let coords = Coordinates { lat: 0.0, lng: 0.0 };
        assert!(provider.reverse_geocode(coords).await.is_err());
        assert!(provider.current_weather(coords).await.is_err());
    }
}
