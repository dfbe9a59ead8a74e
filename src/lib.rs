// Public modules
pub mod algorithms;
pub mod error;
pub mod models;
pub mod routing;
pub mod utils;

// Re-exports for convenience
pub use algorithms::astar::AStar;
pub use algorithms::cost_model::{CostModel, TrafficWeatherCostModel};
pub use algorithms::optimizer::RouteOptimizer;
pub use error::{Result, RouteError};
pub use models::{GeoPoint, RouteCandidate, RouteDetail, RouteSelection, Supplier};
