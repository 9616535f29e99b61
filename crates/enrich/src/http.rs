//! HTTP-backed enrichment provider.
//!
//! Reverse geocoding uses a Nominatim-compatible `/reverse` endpoint and
//! weather uses an Open-Meteo-compatible `/v1/forecast` endpoint. Both
//! requests share one pooled [`reqwest::Client`] with a hard timeout so a
//! slow provider can never stall entry creation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use naturelog_core::entry::Coordinates;
use naturelog_core::weather::WeatherSnapshot;

use crate::error::EnrichError;
use crate::provider::{EnrichmentProvider, ResolvedPlace};

/// Configuration for [`HttpEnricher`].
#[derive(Debug, Clone)]
pub struct HttpEnricherConfig {
    /// Base URL of the Nominatim-compatible geocoder,
    /// e.g. `https://nominatim.openstreetmap.org`.
    pub geocode_url: String,
    /// Base URL of the Open-Meteo-compatible weather API,
    /// e.g. `https://api.open-meteo.com`.
    pub weather_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header. Nominatim's usage policy requires one that
    /// identifies the application.
    pub user_agent: String,
}

/// Enrichment provider backed by public HTTP APIs.
pub struct HttpEnricher {
    client: reqwest::Client,
    geocode_url: String,
    weather_url: String,
}

impl HttpEnricher {
    pub fn new(config: HttpEnricherConfig) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .build()?;
        Ok(HttpEnricher {
            client,
            geocode_url: config.geocode_url,
            weather_url: config.weather_url,
        })
    }

    /// Ensure the response has a success status code, otherwise capture the
    /// status and body for the error.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, EnrichError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::Api { status: status.as_u16(), body });
        }
        Ok(response)
    }
}

#[async_trait]
impl EnrichmentProvider for HttpEnricher {
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<ResolvedPlace, EnrichError> {
        let response = self
            .client
            .get(format!("{}/reverse", self.geocode_url))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", coords.lat.to_string()),
                ("lon", coords.lng.to_string()),
            ])
            .send()
            .await?;
        let body: serde_json::Value = Self::ensure_success(response).await?.json().await?;

        let address = body
            .get("address")
            .ok_or(EnrichError::MissingField("address"))?;
        let locality = ["city", "town", "village", "hamlet"]
            .iter()
            .find_map(|key| address.get(*key).and_then(|v| v.as_str()))
            .ok_or(EnrichError::MissingField("address.city"))?;
        let region = ["state", "county"]
            .iter()
            .find_map(|key| address.get(*key).and_then(|v| v.as_str()))
            .ok_or(EnrichError::MissingField("address.state"))?;

        tracing::debug!(lat = coords.lat, lng = coords.lng, locality, region, "Reverse geocoded");

        Ok(ResolvedPlace { locality: locality.to_string(), region: region.to_string() })
    }

    async fn current_weather(&self, coords: Coordinates) -> Result<WeatherSnapshot, EnrichError> {
        let response = self
            .client
            .get(format!("{}/v1/forecast", self.weather_url))
            .query(&[
                ("latitude", coords.lat.to_string()),
                ("longitude", coords.lng.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?;
        let body: serde_json::Value = Self::ensure_success(response).await?.json().await?;

        let data = body
            .get("current_weather")
            .cloned()
            .ok_or(EnrichError::MissingField("current_weather"))?;

        Ok(WeatherSnapshot::Available { data, captured_at: Utc::now() })
    }
}
