// Route metrics and the route-inefficiency rule consumed by reporting

use serde::Serialize;

use crate::models::{Cost, GeoPoint, Km, RouteSelection};
use crate::utils::distance::path_length_km;

/// Cost per kilometre under the standard, multiplier-free model
pub const STANDARD_COST_PER_KM: f64 = 1.0;

/// A route is inefficient when its cost exceeds this multiple of the normal cost
pub const INEFFICIENCY_RATIO: f64 = 1.5;

/// Average speed assumed for the dashboard time estimate, km/h
pub const AVERAGE_SPEED_KMH: f64 = 30.0;

/// Fuel economy assumed for the dashboard, km per litre
pub const KM_PER_LITRE: f64 = 10.0;

/// CO2 emitted per litre of fuel, kg
pub const CO2_KG_PER_LITRE: f64 = 2.3;

/// Capability to price a path without traffic or weather effects
pub trait NormalCostCalculator {
    fn normal_cost(&self, path: &[GeoPoint]) -> Cost;
}

/// Flat per-kilometre pricing over the path's segments
#[derive(Debug, Clone, Copy)]
pub struct PerKmNormalCost {
    pub cost_per_km: f64,
}

impl Default for PerKmNormalCost {
    fn default() -> Self {
        Self {
            cost_per_km: STANDARD_COST_PER_KM,
        }
    }
}

impl NormalCostCalculator for PerKmNormalCost {
    fn normal_cost(&self, path: &[GeoPoint]) -> Cost {
        if path.len() < 2 {
            return 0.0;
        }
        path_length_km(path) * self.cost_per_km
    }
}

/// Result of comparing a selected route against its normal cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EfficiencyAssessment {
    pub actual_cost: Cost,
    pub normal_cost: Cost,
    pub is_inefficient: bool,
}

/// Applies the inefficiency rule `actual > 1.5 * normal`.
///
/// Returns `None` when no calculator is available or either cost is not a
/// finite positive number, e.g. for an infeasible selection.
pub fn assess_efficiency(
    selection: &RouteSelection,
    calculator: Option<&dyn NormalCostCalculator>,
) -> Option<EfficiencyAssessment> {
    let calculator = calculator?;
    if !selection.is_feasible() {
        return None;
    }

    let normal_cost = calculator.normal_cost(&selection.path);
    let actual_cost = selection.cost;
    if !(actual_cost > 0.0 && normal_cost > 0.0 && normal_cost.is_finite()) {
        return None;
    }

    Some(EfficiencyAssessment {
        actual_cost,
        normal_cost,
        is_inefficient: actual_cost > INEFFICIENCY_RATIO * normal_cost,
    })
}

/// Summary figures shown next to the route map
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteMetrics {
    pub distance_km: Km,
    pub estimated_time_min: f64,
    pub fuel_usage_liters: f64,
    pub co2_emissions_kg: f64,
    pub cost_per_km: f64,
}

impl RouteMetrics {
    /// Derives the metrics from a path and its cost
    pub fn from_path(path: &[GeoPoint], cost: Cost) -> Self {
        let distance_km = path_length_km(path);
        let fuel_usage_liters = distance_km / KM_PER_LITRE;
        let cost_per_km = if distance_km > 0.0 && cost.is_finite() {
            cost / distance_km
        } else {
            0.0
        };

        Self {
            distance_km,
            estimated_time_min: distance_km / AVERAGE_SPEED_KMH * 60.0,
            fuel_usage_liters,
            co2_emissions_kg: fuel_usage_liters * CO2_KG_PER_LITRE,
            cost_per_km,
        }
    }

    /// Metrics for a selection, preferring the provider's figures when present
    pub fn from_selection(selection: &RouteSelection) -> Self {
        let mut metrics = Self::from_path(&selection.path, selection.cost);
        if let Some(detail) = &selection.detail {
            if let Some(distance_km) = detail.distance_km {
                metrics.distance_km = distance_km;
            }
            if let Some(time_mins) = detail.time_mins {
                metrics.estimated_time_min = time_mins;
            }
        }
        metrics
    }
}
