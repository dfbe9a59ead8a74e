// Travel cost model combining distance, time-of-day traffic and weather risk

use chrono::{NaiveDateTime, Timelike};

use crate::error::Result;
use crate::models::{Cost, GeoPoint, Km};
use crate::utils::distance::great_circle_km;

/// Multiplier applied during peak commuting hours
pub const PEAK_TRAFFIC_MULTIPLIER: f64 = 1.5;

/// Distance at which the weather-risk proxy saturates at 1.0
pub const WEATHER_RISK_SATURATION_KM: Km = 1000.0;

/// Cost substituted for an edge whose cost could not be computed
pub const INVALID_COST_PENALTY: Cost = 1000.0;

/// Computes the travel cost between two points at a given local time.
///
/// Implementations must return a cost that is never below
/// [`CostModel::lower_bound`] for the same pair, otherwise path search loses
/// optimality.
pub trait CostModel: Send + Sync {
    /// Cost of travelling from `a` to `b` at local time `at`
    fn cost(&self, a: &GeoPoint, b: &GeoPoint, at: NaiveDateTime) -> Result<Cost>;

    /// Admissible estimate of the cost from `a` to `b`, used as the search heuristic
    fn lower_bound(&self, a: &GeoPoint, b: &GeoPoint) -> Cost {
        great_circle_km(a, b)
    }
}

/// Evaluates `model`, substituting [`INVALID_COST_PENALTY`] when it fails
pub fn cost_or_penalty(
    model: &dyn CostModel,
    a: &GeoPoint,
    b: &GeoPoint,
    at: NaiveDateTime,
) -> Cost {
    match model.cost(a, b, at) {
        Ok(cost) => cost,
        Err(e) => {
            log::warn!(
                "Cost between {:?} and {:?} unavailable ({}), using penalty {}",
                a,
                b,
                e,
                INVALID_COST_PENALTY
            );
            INVALID_COST_PENALTY
        }
    }
}

/// Default cost model: `distance * traffic * (1 + weather_risk)`.
///
/// The weather term is a distance-derived placeholder, `min(1, km / 1000)`,
/// not a live weather reading. It only scales cost upward, as does the
/// traffic multiplier, so the raw distance stays a valid lower bound.
#[derive(Debug, Clone, Copy)]
pub struct TrafficWeatherCostModel {
    /// Multiplier applied inside the peak windows
    pub peak_multiplier: f64,

    /// Distance at which the weather proxy reaches 1.0
    pub weather_saturation_km: Km,
}

impl Default for TrafficWeatherCostModel {
    fn default() -> Self {
        Self {
            peak_multiplier: PEAK_TRAFFIC_MULTIPLIER,
            weather_saturation_km: WEATHER_RISK_SATURATION_KM,
        }
    }
}

impl TrafficWeatherCostModel {
    /// Creates the model with the standard multipliers
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the hour falls in a commuting window (07-10 or 16-19 inclusive)
    pub fn is_peak_hour(hour: u32) -> bool {
        (7..=10).contains(&hour) || (16..=19).contains(&hour)
    }

    /// Traffic multiplier for the given local time
    pub fn traffic_multiplier(&self, at: NaiveDateTime) -> f64 {
        if Self::is_peak_hour(at.hour()) {
            self.peak_multiplier
        } else {
            1.0
        }
    }

    /// Dimensionless weather-risk proxy in `[0, 1]`
    pub fn weather_risk(&self, distance_km: Km) -> f64 {
        (distance_km / self.weather_saturation_km).min(1.0)
    }
}

impl CostModel for TrafficWeatherCostModel {
    fn cost(&self, a: &GeoPoint, b: &GeoPoint, at: NaiveDateTime) -> Result<Cost> {
        a.validate()?;
        b.validate()?;

        let distance = great_circle_km(a, b);
        let traffic = self.traffic_multiplier(at);
        let weather = self.weather_risk(distance);

        Ok(distance * traffic * (1.0 + weather))
    }
}
