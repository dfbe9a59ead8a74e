// Location model representing geographic coordinates in decimal degrees

use crate::error::{Result, RouteError};
use crate::models::Km;
use crate::utils::distance::great_circle_km;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A (latitude, longitude) pair in decimal degrees.
///
/// Points are used as graph-node keys, so equality is exact: two points are
/// equal only when both coordinates compare equal as `f64`. Hashing uses the
/// bit pattern with `-0.0` folded into `0.0` to stay consistent with `==`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new point without validation
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a new point, rejecting non-finite or out-of-range coordinates
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self::new(latitude, longitude);
        point.validate()?;
        Ok(point)
    }

    /// Checks that both coordinates are finite and inside the valid degree ranges
    pub fn validate(&self) -> Result<()> {
        let valid = self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);

        if valid {
            Ok(())
        } else {
            Err(RouteError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Great-circle distance to another point in kilometers
    pub fn distance_to(&self, other: &GeoPoint) -> Km {
        great_circle_km(self, other)
    }
}

impl Eq for GeoPoint {}

impl Hash for GeoPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Adding 0.0 maps -0.0 to 0.0, which compare equal
        (self.latitude + 0.0).to_bits().hash(state);
        (self.longitude + 0.0).to_bits().hash(state);
    }
}
