//! IP geolocation lookup.
//!
//! [`IpApiLocator`] queries an ip-api.com compatible JSON endpoint. The
//! [`GeoLocator`] trait is the seam the enrichment step is written against.

use std::net::IpAddr;
use std::time::Duration;

use agency_core::submission::GeoLocation;
use async_trait::async_trait;
use serde::Deserialize;

/// Default lookup endpoint.
const DEFAULT_GEO_URL: &str = "http://ip-api.com";

/// Default upper bound on a single lookup.
const DEFAULT_GEO_TIMEOUT_MS: u64 = 3_000;

/// Fields requested from the provider.
const LOOKUP_FIELDS: &str = "status,message,country,regionName,city,lat,lon";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Geolocation provider settings.
#[derive(Clone)]
pub struct GeoConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// Optional provider key, sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// Upper bound on a single lookup.
    pub timeout: Duration,
}

impl std::fmt::Debug for GeoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEO_URL.to_string(),
            api_key: None,
            timeout: Duration::from_millis(DEFAULT_GEO_TIMEOUT_MS),
        }
    }
}

impl GeoConfig {
    /// Load geolocation settings from environment variables.
    ///
    /// | Env Var                 | Default             |
    /// |-------------------------|---------------------|
    /// | `GEO_LOOKUP_URL`        | `http://ip-api.com` |
    /// | `GEO_LOOKUP_API_KEY`    | unset               |
    /// | `GEO_LOOKUP_TIMEOUT_MS` | `3000`              |
    pub fn from_env() -> Self {
        let base_url = std::env::var("GEO_LOOKUP_URL")
            .unwrap_or_else(|_| DEFAULT_GEO_URL.into())
            .trim_end_matches('/')
            .to_string();

        let api_key = std::env::var("GEO_LOOKUP_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let timeout_ms: u64 = std::env::var("GEO_LOOKUP_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_GEO_TIMEOUT_MS.to_string())
            .parse()
            .expect("GEO_LOOKUP_TIMEOUT_MS must be a valid u64");

        Self {
            base_url,
            api_key,
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why a lookup produced no location. Never surfaced to API callers.
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Geolocation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status code.
    #[error("Geolocation provider returned HTTP {0}")]
    HttpStatus(u16),

    /// The provider answered but could not resolve the address.
    #[error("Geolocation lookup failed: {0}")]
    Lookup(String),

    /// The lookup did not finish within the configured timeout.
    #[error("Geolocation lookup timed out after {0:?}")]
    Timeout(Duration),
}

// ---------------------------------------------------------------------------
// Locator
// ---------------------------------------------------------------------------

/// Resolves a routable IP address to a location.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn lookup(&self, ip: IpAddr) -> Result<GeoLocation, EnrichmentError>;
}

/// Provider response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    city: Option<String>,
    region_name: Option<String>,
    country: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpApiResponse {
    fn into_location(self) -> Result<GeoLocation, EnrichmentError> {
        if self.status != "success" {
            return Err(EnrichmentError::Lookup(
                self.message.unwrap_or_else(|| self.status.clone()),
            ));
        }
        match (self.city, self.region_name, self.country, self.lat, self.lon) {
            (Some(city), Some(region), Some(country), Some(lat), Some(lng)) => Ok(GeoLocation {
                city,
                region,
                country,
                lat,
                lng,
            }),
            _ => Err(EnrichmentError::Lookup("incomplete response".into())),
        }
    }
}

/// HTTP client for an ip-api.com compatible provider.
pub struct IpApiLocator {
    client: reqwest::Client,
    config: GeoConfig,
}

impl IpApiLocator {
    /// Build a locator whose HTTP client enforces `config.timeout`.
    pub fn new(config: GeoConfig) -> Result<Self, EnrichmentError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn lookup_url(&self, ip: IpAddr) -> String {
        format!("{}/json/{ip}", self.config.base_url)
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn lookup(&self, ip: IpAddr) -> Result<GeoLocation, EnrichmentError> {
        let mut request = self
            .client
            .get(self.lookup_url(ip))
            .query(&[("fields", LOOKUP_FIELDS)]);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::HttpStatus(status.as_u16()));
        }

        response.json::<IpApiResponse>().await?.into_location()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn success_response_maps_all_fields() {
        let body: IpApiResponse = serde_json::from_value(serde_json::json!({
            "status": "success",
            "country": "India",
            "regionName": "Telangana",
            "city": "Hyderabad",
            "lat": 17.385,
            "lon": 78.4867
        }))
        .unwrap();
        let geo = body.into_location().unwrap();
        assert_eq!(geo.city, "Hyderabad");
        assert_eq!(geo.region, "Telangana");
        assert_eq!(geo.country, "India");
        assert_eq!(geo.lng, 78.4867);
    }

    #[test]
    fn fail_status_is_lookup_error() {
        let body: IpApiResponse = serde_json::from_value(serde_json::json!({
            "status": "fail",
            "message": "reserved range"
        }))
        .unwrap();
        assert_matches!(body.into_location(), Err(EnrichmentError::Lookup(ref m)) if m == "reserved range");
    }

    #[test]
    fn partial_response_is_lookup_error() {
        let body: IpApiResponse = serde_json::from_value(serde_json::json!({
            "status": "success",
            "country": "India"
        }))
        .unwrap();
        assert_matches!(body.into_location(), Err(EnrichmentError::Lookup(_)));
    }

    #[test]
    fn lookup_url_embeds_ip() {
        let locator = IpApiLocator::new(GeoConfig {
            base_url: "http://geo.test".into(),
            ..GeoConfig::default()
        })
        .unwrap();
        assert_eq!(
            locator.lookup_url("49.205.100.10".parse().unwrap()),
            "http://geo.test/json/49.205.100.10"
        );
    }
}
