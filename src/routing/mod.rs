pub mod geocoder;
pub mod provider;
pub mod tomtom;

pub use geocoder::{Geocoder, NominatimGeocoder, StaticGeocoder};
pub use provider::{LiveRoute, LiveRouteProvider, NoLiveRoutes, RouteLookup, UnavailableReason};
pub use tomtom::TomTomProvider;
