//! Sources of the user's coordinates for location lookups.
//!
//! A terminal has no geolocation API, so the client asks a [`Locator`].
//! [`FixedLocator`] reports configured coordinates, [`LookupLocator`] asks
//! an HTTP geolocation service, and [`NoLocator`] reports that lookups are
//! unsupported.

use crate::config::LocationConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Something that can tell where the user is.
#[async_trait]
pub trait Locator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Build the locator described by the configuration.
pub fn locator_from_config(config: &LocationConfig) -> Arc<dyn Locator> {
    match config {
        LocationConfig::Disabled => Arc::new(NoLocator),
        LocationConfig::Fixed {
            latitude,
            longitude,
        } => Arc::new(FixedLocator::new(Coordinates {
            latitude: *latitude,
            longitude: *longitude,
        })),
        LocationConfig::Lookup { url } => Arc::new(LookupLocator::new(url.clone())),
    }
}

/// Locator for hosts without any position source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocator;

#[async_trait]
impl Locator for NoLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Locator that always reports the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator {
    coordinates: Coordinates,
}

impl FixedLocator {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl Locator for FixedLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}

/// Locator backed by an HTTP geolocation service.
///
/// Expects a JSON body with `lat` and `lon` fields (the shape returned by
/// common IP geolocation services). A `status` field other than `success`
/// is treated as a failed lookup.
#[derive(Debug, Clone)]
pub struct LookupLocator {
    client: Client,
    url: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl LookupLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Locator for LookupLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LocationError::Unavailable(format!(
                "lookup returned status {}",
                response.status()
            )));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if let Some(status) = body.status.as_deref() {
            if status != "success" {
                return Err(LocationError::Denied(
                    body.message.unwrap_or_else(|| status.to_string()),
                ));
            }
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(LocationError::Unavailable(
                "lookup response has no coordinates".into(),
            )),
        }
    }
}

/// Errors that can occur while acquiring coordinates.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// The position source refused to answer.
    #[error("Location denied: {0}")]
    Denied(String),

    /// The position source failed.
    #[error("Location unavailable: {0}")]
    Unavailable(String),

    /// No position source exists on this host.
    #[error("Location lookup is not supported")]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_no_locator_is_unsupported() {
        assert!(matches!(
            NoLocator.locate().await,
            Err(LocationError::Unsupported)
        ));
    }

    #[tokio::test]
    async fn test_fixed_locator() {
        let here = Coordinates {
            latitude: 19.07,
            longitude: 72.87,
        };
        assert_eq!(FixedLocator::new(here).locate().await.unwrap(), here);
    }

    #[tokio::test]
    async fn test_locator_from_config() {
        let locator = locator_from_config(&LocationConfig::Fixed {
            latitude: 1.5,
            longitude: -2.5,
        });
        let coords = locator.locate().await.unwrap();
        assert_eq!(coords.latitude, 1.5);
        assert_eq!(coords.longitude, -2.5);

        let locator = locator_from_config(&LocationConfig::Disabled);
        assert!(locator.locate().await.is_err());
    }

    #[tokio::test]
    async fn test_lookup_locator_reads_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "lat": 28.6139,
                "lon": 77.209
            })))
            .mount(&server)
            .await;

        let locator = LookupLocator::new(format!("{}/json", server.uri()));
        let coords = locator.locate().await.unwrap();
        assert_eq!(coords.latitude, 28.6139);
        assert_eq!(coords.longitude, 77.209);
    }

    #[tokio::test]
    async fn test_lookup_locator_failed_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "fail",
                "message": "reserved range"
            })))
            .mount(&server)
            .await;

        let locator = LookupLocator::new(server.uri());
        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, LocationError::Denied(msg) if msg == "reserved range"));
    }

    #[tokio::test]
    async fn test_lookup_locator_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let locator = LookupLocator::new(server.uri());
        assert!(matches!(
            locator.locate().await,
            Err(LocationError::Unavailable(_))
        ));
    }
}
