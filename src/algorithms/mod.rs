pub mod astar;
pub mod cost_model;
pub mod optimizer;

// Common algorithm traits
use crate::error::Result;
use crate::models::{Cost, GeoPoint};

/// A path found by a search, with its accumulated cost
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPath {
    /// Ordered nodes from start to goal
    pub nodes: Vec<GeoPoint>,

    /// Sum of edge costs along the path
    pub cost: Cost,
}

/// Trait for minimum-cost path searches over a set of candidate nodes
pub trait PathFinder {
    /// Find the cheapest path from `start` to `goal` through `neighbors`.
    ///
    /// Returns `Ok(None)` when the goal cannot be reached, including when
    /// `neighbors` is empty, and an error when either endpoint is invalid.
    fn find_path(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        neighbors: &[GeoPoint],
    ) -> Result<Option<SearchPath>>;
}
