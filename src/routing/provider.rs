use thiserror::Error;

use crate::models::{GeoPoint, Km, Minutes};

/// A road route returned by a live routing service
#[derive(Debug, Clone, PartialEq)]
pub struct LiveRoute {
    /// Polyline from origin to destination
    pub coordinates: Vec<GeoPoint>,
    pub distance_km: Km,
    pub time_mins: Minutes,
}

impl LiveRoute {
    /// Makes sure the polyline starts at `origin` and ends at `destination`.
    ///
    /// Services snap endpoints to the road network, so the first and last
    /// polyline points rarely match the requested coordinates exactly.
    pub fn anchored(mut self, origin: GeoPoint, destination: GeoPoint) -> Self {
        if self.coordinates.first() != Some(&origin) {
            self.coordinates.insert(0, origin);
        }
        if self.coordinates.last() != Some(&destination) || self.coordinates.len() < 2 {
            self.coordinates.push(destination);
        }
        self
    }
}

/// Why a live route could not be obtained
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnavailableReason {
    #[error("live routing is disabled")]
    Disabled,

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("service responded with status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no route in response")]
    EmptyRoute,
}

/// Outcome of a live route lookup. `Unavailable` is expected and never fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteLookup {
    Found(LiveRoute),
    Unavailable(UnavailableReason),
}

/// Source of detailed road routes between two points.
///
/// Implementations issue at most one bounded request per call and never
/// retry; the caller falls back to an estimate on `Unavailable`.
pub trait LiveRouteProvider: Send + Sync {
    fn fetch_route(&self, origin: &GeoPoint, destination: &GeoPoint) -> RouteLookup;
}

/// Provider used when live routing is switched off
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLiveRoutes;

impl LiveRouteProvider for NoLiveRoutes {
    fn fetch_route(&self, _origin: &GeoPoint, _destination: &GeoPoint) -> RouteLookup {
        RouteLookup::Unavailable(UnavailableReason::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchoring_adds_missing_endpoints() {
        let origin = GeoPoint::new(8.5241, 76.9366);
        let destination = GeoPoint::new(9.9312, 76.2673);
        let route = LiveRoute {
            coordinates: vec![GeoPoint::new(8.5243, 76.9361), GeoPoint::new(9.9310, 76.2670)],
            distance_km: 210.0,
            time_mins: 260.0,
        };

        let anchored = route.anchored(origin, destination);
        assert_eq!(anchored.coordinates.len(), 4);
        assert_eq!(anchored.coordinates.first(), Some(&origin));
        assert_eq!(anchored.coordinates.last(), Some(&destination));
    }

    #[test]
    fn test_anchoring_keeps_exact_endpoints() {
        let origin = GeoPoint::new(8.5241, 76.9366);
        let destination = GeoPoint::new(9.9312, 76.2673);
        let route = LiveRoute {
            coordinates: vec![origin, GeoPoint::new(9.0, 76.5), destination],
            distance_km: 210.0,
            time_mins: 260.0,
        };

        assert_eq!(route.clone().anchored(origin, destination), route);
    }

    #[test]
    fn test_disabled_provider() {
        let lookup = NoLiveRoutes.fetch_route(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(1.0, 1.0));
        assert_eq!(lookup, RouteLookup::Unavailable(UnavailableReason::Disabled));
    }
}
