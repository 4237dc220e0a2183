//! Submission enrichment: client IP and location, attached before a new
//! submission is persisted.
//!
//! Enrichment never fails. Private and loopback addresses get the `Local`
//! sentinel without a lookup; a failed or slow lookup degrades to `Unknown`.

pub mod geo;

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use agency_core::network::is_local_address;
use agency_core::submission::{GeoLocation, Location};

use self::geo::{EnrichmentError, GeoConfig, GeoLocator, IpApiLocator};

/// Stored in place of an IP when none could be determined.
pub const UNKNOWN_IP: &str = "unknown";

/// The derived metadata for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub ip_address: String,
    pub location: Location,
}

/// Runs the enrichment step against a [`GeoLocator`] with a bounded wait.
pub struct Enricher {
    locator: Arc<dyn GeoLocator>,
    timeout: Duration,
}

impl Enricher {
    pub fn new(locator: Arc<dyn GeoLocator>, timeout: Duration) -> Self {
        Self { locator, timeout }
    }

    /// Build an enricher backed by [`IpApiLocator`].
    pub fn from_config(config: &GeoConfig) -> Result<Self, EnrichmentError> {
        let locator = IpApiLocator::new(config.clone())?;
        Ok(Self::new(Arc::new(locator), config.timeout))
    }

    /// Derive `ip_address` and `location` for a client address.
    pub async fn enrich(&self, client: Option<IpAddr>) -> Enrichment {
        let Some(ip) = client else {
            tracing::debug!("No client address available, location unknown");
            return Enrichment {
                ip_address: UNKNOWN_IP.to_string(),
                location: Location::unknown(),
            };
        };

        if is_local_address(ip) {
            return Enrichment {
                ip_address: ip.to_string(),
                location: Location::local(),
            };
        }

        let location = match self.lookup(ip).await {
            Ok(geo) => {
                tracing::debug!(%ip, city = %geo.city, country = %geo.country, "Resolved client location");
                Location::Resolved(geo)
            }
            Err(e) => {
                tracing::warn!(%ip, error = %e, "Geolocation lookup failed, storing Unknown");
                Location::unknown()
            }
        };

        Enrichment {
            ip_address: ip.to_string(),
            location,
        }
    }

    async fn lookup(&self, ip: IpAddr) -> Result<GeoLocation, EnrichmentError> {
        tokio::time::timeout(self.timeout, self.locator.lookup(ip))
            .await
            .map_err(|_| EnrichmentError::Timeout(self.timeout))?
    }
}
