// Route models for representing supplier routes and the optimizer's selection

use crate::models::{Cost, GeoPoint, Km, Minutes, Supplier};
use serde::{Deserialize, Serialize};

/// Descriptive metadata attached to a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDetail {
    /// Name of the destination supplier
    pub supplier: String,

    /// Road distance reported by the live provider
    pub distance_km: Option<Km>,

    /// Travel time reported by the live provider
    pub time_mins: Option<Minutes>,

    /// True when the path is an estimate rather than a live road route
    pub is_direct: bool,
}

impl RouteDetail {
    /// Detail for a road route returned by the live provider
    pub fn road<S: Into<String>>(supplier: S, distance_km: Km, time_mins: Minutes) -> Self {
        Self {
            supplier: supplier.into(),
            distance_km: Some(distance_km),
            time_mins: Some(time_mins),
            is_direct: false,
        }
    }

    /// Detail for an estimated route used when no road route was available
    pub fn direct<S: Into<String>>(supplier: S) -> Self {
        Self {
            supplier: supplier.into(),
            distance_km: None,
            time_mins: None,
            is_direct: true,
        }
    }
}

/// One supplier's proposed route, produced per optimization run
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate<'a> {
    /// Supplier this route ends at
    pub supplier: &'a Supplier,

    /// Ordered points from the origin to the supplier location
    pub path: Vec<GeoPoint>,

    /// Non-negative route cost
    pub cost: Cost,

    /// Route metadata
    pub detail: RouteDetail,
}

impl RouteCandidate<'_> {
    /// Checks if this candidate can take part in selection
    pub fn is_feasible(&self) -> bool {
        self.cost.is_finite() && self.path.len() >= 2
    }
}

/// The globally cheapest route chosen by the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSelection {
    /// Ordered points from the origin to the chosen supplier
    pub path: Vec<GeoPoint>,

    /// Cost of the route, `f64::INFINITY` (written as `"inf"`) when nothing was feasible
    #[serde(with = "cost_or_inf")]
    pub cost: Cost,

    /// Route metadata, absent when nothing was feasible
    pub detail: Option<RouteDetail>,
}

impl RouteSelection {
    /// The degenerate "no feasible route" result
    pub fn infeasible(origin: GeoPoint) -> Self {
        Self {
            path: vec![origin, origin],
            cost: f64::INFINITY,
            detail: None,
        }
    }

    /// Checks if a route was actually found
    pub fn is_feasible(&self) -> bool {
        self.cost.is_finite() && self.detail.is_some()
    }

    /// Checks if the path follows roads, as opposed to an estimated line
    pub fn follows_roads(&self) -> bool {
        self.detail.as_ref().map_or(false, |detail| !detail.is_direct)
    }
}

impl From<RouteCandidate<'_>> for RouteSelection {
    fn from(candidate: RouteCandidate<'_>) -> Self {
        Self {
            path: candidate.path,
            cost: candidate.cost,
            detail: Some(candidate.detail),
        }
    }
}

// JSON has no infinity; an unreachable cost is written as the string "inf"
mod cost_or_inf {
    use serde::{de, Deserialize, Deserializer, Serializer};

    const INF: &str = "inf";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(cost: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if cost.is_infinite() && cost.is_sign_positive() {
            serializer.serialize_str(INF)
        } else {
            serializer.serialize_f64(*cost)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(cost) => Ok(cost),
            Repr::Text(text) if text == INF => Ok(f64::INFINITY),
            Repr::Text(text) => Err(de::Error::invalid_value(
                de::Unexpected::Str(&text),
                &"a number or \"inf\"",
            )),
        }
    }
}
