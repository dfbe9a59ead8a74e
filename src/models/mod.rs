// Models module - exports all model types

mod location;
mod route;
mod supplier;

// Re-export model types
pub use self::location::GeoPoint;
pub use self::route::{RouteCandidate, RouteDetail, RouteSelection};
pub use self::supplier::Supplier;

// Common type aliases for improved code readability
pub type Cost = f64;
pub type Km = f64;
pub type Minutes = f64;
