use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{Result, RouteError};
use crate::models::GeoPoint;
use crate::routing::provider::{LiveRoute, LiveRouteProvider, RouteLookup, UnavailableReason};
use crate::utils::config::RoutingConfig;

// --- Data Structures for parsing calculateRoute responses ---
#[derive(Deserialize)]
struct CalculateRouteResponse {
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Deserialize)]
struct RouteEntry {
    summary: RouteSummary,
    #[serde(default)]
    legs: Vec<RouteLeg>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteSummary {
    #[serde(default)]
    length_in_meters: f64,
    #[serde(default)]
    travel_time_in_seconds: f64,
}

#[derive(Deserialize)]
struct RouteLeg {
    #[serde(default)]
    points: Vec<LegPoint>,
}

#[derive(Deserialize)]
struct LegPoint {
    latitude: f64,
    longitude: f64,
}

/// Truck routing with live traffic from the TomTom calculateRoute API
pub struct TomTomProvider {
    client: Client,
    api_key: String,
    base_url: String,
    vehicle_max_speed: u32,
}

impl TomTomProvider {
    /// Creates a provider whose requests are bounded by `config.timeout_secs`
    pub fn new(api_key: String, config: &RoutingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RouteError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            vehicle_max_speed: config.vehicle_max_speed,
        })
    }

    /// Request URL for a route between two points
    pub fn route_url(&self, origin: &GeoPoint, destination: &GeoPoint) -> String {
        format!(
            "{}/routing/1/calculateRoute/{},{}:{},{}/json",
            self.base_url,
            origin.latitude,
            origin.longitude,
            destination.latitude,
            destination.longitude
        )
    }

    fn request(&self, origin: &GeoPoint, destination: &GeoPoint) -> RouteLookup {
        let url = self.route_url(origin, destination);
        let max_speed = self.vehicle_max_speed.to_string();
        log::debug!("[PROVIDER] Calling calculateRoute for {:?} -> {:?}", origin, destination);

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("routeType", "fastest"),
                ("traffic", "true"),
                ("travelMode", "truck"),
                ("vehicleMaxSpeed", max_speed.as_str()),
                ("computeTravelTimeFor", "all"),
                ("routeRepresentation", "polyline"),
            ])
            .send()
        {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                return RouteLookup::Unavailable(UnavailableReason::Timeout);
            }
            Err(e) => {
                return RouteLookup::Unavailable(UnavailableReason::Transport(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            return RouteLookup::Unavailable(UnavailableReason::Status(status.as_u16()));
        }

        match response.text() {
            Ok(text) => parse_route_response(&text),
            Err(e) if e.is_timeout() => RouteLookup::Unavailable(UnavailableReason::Timeout),
            Err(e) => RouteLookup::Unavailable(UnavailableReason::Transport(e.to_string())),
        }
    }
}

impl LiveRouteProvider for TomTomProvider {
    fn fetch_route(&self, origin: &GeoPoint, destination: &GeoPoint) -> RouteLookup {
        let lookup = self.request(origin, destination);
        if let RouteLookup::Unavailable(reason) = &lookup {
            log::warn!(
                "Could not get live route {:?} -> {:?}: {}",
                origin,
                destination,
                reason
            );
        }
        lookup
    }
}

/// Parses a calculateRoute response body into a lookup result
pub fn parse_route_response(text: &str) -> RouteLookup {
    let response: CalculateRouteResponse = match serde_json::from_str(text) {
        Ok(response) => response,
        Err(e) => {
            log::debug!("Unparseable route response: {}. Body: {}", e, text);
            return RouteLookup::Unavailable(UnavailableReason::Malformed(e.to_string()));
        }
    };

    let Some(route) = response.routes.into_iter().next() else {
        return RouteLookup::Unavailable(UnavailableReason::EmptyRoute);
    };

    let coordinates: Vec<GeoPoint> = route
        .legs
        .iter()
        .flat_map(|leg| leg.points.iter())
        .map(|point| GeoPoint::new(point.latitude, point.longitude))
        .collect();

    if coordinates.is_empty() {
        return RouteLookup::Unavailable(UnavailableReason::EmptyRoute);
    }

    if let Some(bad) = coordinates.iter().find(|p| p.validate().is_err()) {
        return RouteLookup::Unavailable(UnavailableReason::Malformed(format!(
            "invalid polyline point {:?}",
            bad
        )));
    }

    let distance_km = route.summary.length_in_meters / 1000.0;
    let time_mins = route.summary.travel_time_in_seconds / 60.0;

    if !(distance_km.is_finite() && distance_km >= 0.0 && time_mins.is_finite() && time_mins >= 0.0)
    {
        return RouteLookup::Unavailable(UnavailableReason::Malformed(format!(
            "invalid summary: {} km, {} min",
            distance_km, time_mins
        )));
    }

    RouteLookup::Found(LiveRoute {
        coordinates,
        distance_km,
        time_mins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    const SAMPLE: &str = r#"{
        "formatVersion": "0.0.12",
        "routes": [{
            "summary": {"lengthInMeters": 215400, "travelTimeInSeconds": 15840},
            "legs": [
                {"points": [{"latitude": 8.52410, "longitude": 76.93660},
                            {"latitude": 9.10000, "longitude": 76.60000}]},
                {"points": [{"latitude": 9.93120, "longitude": 76.26730}]}
            ]
        }]
    }"#;

    fn config(base_url: &str) -> RoutingConfig {
        RoutingConfig {
            base_url: base_url.to_string(),
            timeout_secs: 1,
            ..RoutingConfig::default()
        }
    }

    // Serves a single canned HTTP response on a loopback port, returns its base URL
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        });

        format!("http://{}", address)
    }

    #[test]
    fn test_parse_route() {
        let RouteLookup::Found(route) = parse_route_response(SAMPLE) else {
            panic!("sample response should contain a route");
        };

        assert_eq!(route.coordinates.len(), 3);
        assert_eq!(route.coordinates[0], GeoPoint::new(8.5241, 76.9366));
        assert_eq!(route.coordinates[2], GeoPoint::new(9.9312, 76.2673));
        assert!((route.distance_km - 215.4).abs() < 1e-9);
        assert!((route.time_mins - 264.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_empty_routes() {
        assert_eq!(
            parse_route_response(r#"{"routes": []}"#),
            RouteLookup::Unavailable(UnavailableReason::EmptyRoute)
        );
        assert_eq!(
            parse_route_response(r#"{"error": {"description": "no key"}}"#),
            RouteLookup::Unavailable(UnavailableReason::EmptyRoute)
        );
    }

    #[test]
    fn test_parse_route_without_points() {
        let body = r#"{"routes": [{"summary": {"lengthInMeters": 10, "travelTimeInSeconds": 5}}]}"#;
        assert_eq!(
            parse_route_response(body),
            RouteLookup::Unavailable(UnavailableReason::EmptyRoute)
        );
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(matches!(
            parse_route_response("<html>502 Bad Gateway</html>"),
            RouteLookup::Unavailable(UnavailableReason::Malformed(_))
        ));
    }

    #[test]
    fn test_route_url() {
        let provider = TomTomProvider::new("key".to_string(), &config("https://api.tomtom.com/")).unwrap();
        let url = provider.route_url(&GeoPoint::new(8.5, 76.9), &GeoPoint::new(13.0, 80.25));

        assert_eq!(
            url,
            "https://api.tomtom.com/routing/1/calculateRoute/8.5,76.9:13,80.25/json"
        );
    }

    #[test]
    fn test_unreachable_service_is_unavailable() {
        // Nothing listens on port 9 of the loopback interface
        let provider = TomTomProvider::new("key".to_string(), &config("http://127.0.0.1:9")).unwrap();
        let lookup = provider.fetch_route(&GeoPoint::new(8.5, 76.9), &GeoPoint::new(13.0, 80.25));

        assert!(matches!(lookup, RouteLookup::Unavailable(_)));
    }

    #[test]
    fn test_error_status_is_unavailable() {
        let base_url = serve_once("HTTP/1.1 500 Internal Server Error", r#"{"error": "boom"}"#);
        let provider = TomTomProvider::new("key".to_string(), &config(&base_url)).unwrap();
        let lookup = provider.fetch_route(&GeoPoint::new(8.5, 76.9), &GeoPoint::new(13.0, 80.25));

        assert_eq!(lookup, RouteLookup::Unavailable(UnavailableReason::Status(500)));
    }

    #[test]
    fn test_forbidden_status_is_unavailable() {
        let base_url = serve_once("HTTP/1.1 403 Forbidden", "{}");
        let provider = TomTomProvider::new("bad-key".to_string(), &config(&base_url)).unwrap();
        let lookup = provider.fetch_route(&GeoPoint::new(8.5, 76.9), &GeoPoint::new(13.0, 80.25));

        assert_eq!(lookup, RouteLookup::Unavailable(UnavailableReason::Status(403)));
    }

    #[test]
    fn test_empty_route_response_is_unavailable() {
        let base_url = serve_once("HTTP/1.1 200 OK", r#"{"routes":[]}"#);
        let provider = TomTomProvider::new("key".to_string(), &config(&base_url)).unwrap();
        let lookup = provider.fetch_route(&GeoPoint::new(8.5, 76.9), &GeoPoint::new(13.0, 80.25));

        assert_eq!(lookup, RouteLookup::Unavailable(UnavailableReason::EmptyRoute));
    }

    #[test]
    fn test_fetch_route_from_service() {
        let base_url = serve_once("HTTP/1.1 200 OK", SAMPLE);
        let provider = TomTomProvider::new("key".to_string(), &config(&base_url)).unwrap();

        match provider.fetch_route(&GeoPoint::new(8.5241, 76.9366), &GeoPoint::new(9.9312, 76.2673)) {
            RouteLookup::Found(route) => {
                assert_eq!(route.coordinates.len(), 3);
                assert!((route.distance_km - 215.4).abs() < 1e-9);
            }
            other => panic!("expected a route, got {:?}", other),
        }
    }
}
