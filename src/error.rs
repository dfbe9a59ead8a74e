// Error taxonomy for configuration, validation and rendering failures

use thiserror::Error;

/// Errors surfaced to callers of the optimizer.
///
/// Live routing failures are deliberately absent: they are reported as
/// [`crate::routing::RouteLookup::Unavailable`] and always fall back.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Invalid coordinate: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Address could not be resolved: {0}")]
    UnresolvableAddress(String),

    #[error("Geocoding request for \"{address}\" failed: {reason}")]
    Geocoding { address: String, reason: String },

    #[error("No supplier has a resolvable location")]
    NoSuppliers,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to render route map: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RouteError>;
