use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{Result, RouteError};
use crate::models::GeoPoint;
use crate::utils::config::GeocoderConfig;

pub trait Geocoder: Send + Sync {
    /// Resolves a postal address to a validated location.
    fn geocode(&self, address: &str) -> Result<GeoPoint>;
}

// Nominatim returns coordinates as strings
#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Geocoder backed by the OpenStreetMap Nominatim search API
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RouteError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, address: &str) -> Result<GeoPoint> {
        let url = format!("{}/search", self.base_url);
        log::debug!("[GEOCODER] Resolving \"{}\"", address);

        let failed = |reason: String| RouteError::Geocoding {
            address: address.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("status {}", status)));
        }

        let text = response.text().map_err(|e| failed(e.to_string()))?;
        parse_places(address, &text)
    }
}

/// Parses a Nominatim search response, taking the first match
pub fn parse_places(address: &str, text: &str) -> Result<GeoPoint> {
    let places: Vec<Place> = serde_json::from_str(text)?;
    let place = places
        .first()
        .ok_or_else(|| RouteError::UnresolvableAddress(address.to_string()))?;

    let parse = |value: &str| {
        value.trim().parse::<f64>().map_err(|e| RouteError::Geocoding {
            address: address.to_string(),
            reason: format!("bad coordinate \"{}\": {}", value, e),
        })
    };

    GeoPoint::try_new(parse(&place.lat)?, parse(&place.lon)?)
}

/// Geocoder answering from a fixed address table, optionally deferring to another geocoder
pub struct StaticGeocoder {
    locations: HashMap<String, GeoPoint>,
    fallback: Option<Box<dyn Geocoder>>,
}

impl StaticGeocoder {
    pub fn new(locations: HashMap<String, GeoPoint>) -> Self {
        Self {
            locations,
            fallback: None,
        }
    }

    /// Addresses missing from the table are passed to `fallback`
    pub fn with_fallback(mut self, fallback: Box<dyn Geocoder>) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, address: &str) -> Result<GeoPoint> {
        if let Some(point) = self.locations.get(address) {
            point.validate()?;
            return Ok(*point);
        }

        match &self.fallback {
            Some(fallback) => fallback.geocode(address),
            None => Err(RouteError::UnresolvableAddress(address.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_place() {
        let body = r#"[
            {"place_id": 1, "lat": "9.9312328", "lon": "76.2673041", "display_name": "Kochi"},
            {"place_id": 2, "lat": "10.0", "lon": "76.0"}
        ]"#;

        let point = parse_places("Kochi, Kerala, India", body).unwrap();
        assert_eq!(point, GeoPoint::new(9.9312328, 76.2673041));
    }

    #[test]
    fn test_parse_no_match() {
        assert!(matches!(
            parse_places("Nowhere", "[]"),
            Err(RouteError::UnresolvableAddress(address)) if address == "Nowhere"
        ));
    }

    #[test]
    fn test_parse_bad_coordinates() {
        assert!(parse_places("X", r#"[{"lat": "north", "lon": "1.0"}]"#).is_err());
        assert!(matches!(
            parse_places("X", r#"[{"lat": "120.0", "lon": "1.0"}]"#),
            Err(RouteError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_static_geocoder() {
        let mut table = HashMap::new();
        table.insert("Kochi".to_string(), GeoPoint::new(9.9312, 76.2673));
        let geocoder = StaticGeocoder::new(table);

        assert_eq!(geocoder.geocode("Kochi").unwrap(), GeoPoint::new(9.9312, 76.2673));
        assert!(matches!(
            geocoder.geocode("Chennai"),
            Err(RouteError::UnresolvableAddress(_))
        ));
    }

    #[test]
    fn test_static_geocoder_fallback() {
        let mut inner = HashMap::new();
        inner.insert("Chennai".to_string(), GeoPoint::new(13.0827, 80.2707));
        let geocoder =
            StaticGeocoder::new(HashMap::new()).with_fallback(Box::new(StaticGeocoder::new(inner)));

        assert_eq!(geocoder.geocode("Chennai").unwrap(), GeoPoint::new(13.0827, 80.2707));
    }
}
