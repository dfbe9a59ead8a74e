use chrono::{Local, NaiveDateTime};
use rayon::prelude::*;

use crate::algorithms::cost_model::{cost_or_penalty, CostModel};
use crate::error::{Result, RouteError};
use crate::models::{Cost, GeoPoint, RouteCandidate, RouteDetail, RouteSelection, Supplier};
use crate::routing::{Geocoder, LiveRoute, LiveRouteProvider, RouteLookup};
use crate::utils::config::SupplierConfig;

/// Weight of road distance (km) in the live route score
pub const DISTANCE_WEIGHT: f64 = 1.0;

/// Weight of travel time (minutes) in the live route score
pub const TIME_WEIGHT: f64 = 0.1;

/// Selects the cheapest route from the hospital to one of a fixed set of suppliers.
///
/// The supplier set and origin are fixed at construction. Each run asks the
/// live provider first and falls back to the direct line priced by the cost
/// model.
pub struct RouteOptimizer {
    origin: GeoPoint,
    suppliers: Vec<Supplier>,
    cost_model: Box<dyn CostModel>,
    provider: Box<dyn LiveRouteProvider>,
    parallel: bool,
}

impl RouteOptimizer {
    /// Creates an optimizer over already located suppliers.
    ///
    /// Suppliers with invalid locations are dropped; an empty remainder is an error.
    pub fn new(
        origin: GeoPoint,
        suppliers: Vec<Supplier>,
        cost_model: Box<dyn CostModel>,
        provider: Box<dyn LiveRouteProvider>,
    ) -> Result<Self> {
        origin.validate()?;

        let suppliers: Vec<Supplier> = suppliers
            .into_iter()
            .filter(|supplier| match supplier.location.validate() {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Excluding supplier {}: {}", supplier.name, e);
                    false
                }
            })
            .collect();

        if suppliers.is_empty() {
            return Err(RouteError::NoSuppliers);
        }

        Ok(Self {
            origin,
            suppliers,
            cost_model,
            provider,
            parallel: false,
        })
    }

    /// Geocodes the hospital and suppliers, then creates the optimizer.
    ///
    /// An unresolvable hospital is fatal. Unresolvable suppliers are logged
    /// and excluded.
    pub fn from_addresses(
        hospital_address: &str,
        suppliers: &[SupplierConfig],
        geocoder: &dyn Geocoder,
        cost_model: Box<dyn CostModel>,
        provider: Box<dyn LiveRouteProvider>,
    ) -> Result<Self> {
        let origin = geocoder.geocode(hospital_address).map_err(|e| {
            log::error!("Hospital address \"{}\" cannot be located: {}", hospital_address, e);
            e
        })?;
        log::info!("Hospital located at {:?}", origin);

        let located = suppliers
            .iter()
            .filter_map(|entry| match geocoder.geocode(&entry.address) {
                Ok(location) => Some(Supplier::new(&entry.name, &entry.address, location)),
                Err(e) => {
                    log::error!("Excluding supplier {}: {}", entry.name, e);
                    None
                }
            })
            .collect();

        Self::new(origin, located, cost_model, provider)
    }

    /// Issue the per-supplier routing calls concurrently
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    /// Blended distance/time score of a live route (km and minutes, unitless)
    pub fn live_route_cost(route: &LiveRoute) -> Cost {
        route.distance_km * DISTANCE_WEIGHT + route.time_mins * TIME_WEIGHT
    }

    /// Runs the optimization at the current local time
    pub fn optimize_route(&self) -> RouteSelection {
        self.optimize_route_at(Local::now().naive_local())
    }

    /// Runs the optimization as if departing at `departure`.
    ///
    /// Ties keep the earliest supplier; if no candidate has a finite cost the
    /// degenerate `[origin, origin]` selection with infinite cost is returned.
    pub fn optimize_route_at(&self, departure: NaiveDateTime) -> RouteSelection {
        let mut best: Option<RouteCandidate<'_>> = None;

        for candidate in self.evaluate_candidates(departure) {
            if !candidate.is_feasible() {
                log::warn!("No feasible route to {}", candidate.supplier.name);
                continue;
            }

            let better = best
                .as_ref()
                .map_or(true, |current| candidate.cost < current.cost);
            if better {
                log::info!(
                    "Found better route to {} with cost: {:.2}",
                    candidate.supplier.name,
                    candidate.cost
                );
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) => RouteSelection::from(candidate),
            None => {
                log::warn!("No valid routes found");
                RouteSelection::infeasible(self.origin)
            }
        }
    }

    /// Evaluates every supplier, in supplier order
    pub fn evaluate_candidates(&self, departure: NaiveDateTime) -> Vec<RouteCandidate<'_>> {
        if self.parallel {
            // Indexed collect keeps supplier order
            self.suppliers
                .par_iter()
                .map(|supplier| self.evaluate_supplier(supplier, departure))
                .collect()
        } else {
            self.suppliers
                .iter()
                .map(|supplier| self.evaluate_supplier(supplier, departure))
                .collect()
        }
    }

    /// Live route first, direct-line estimate otherwise
    fn evaluate_supplier<'a>(
        &'a self,
        supplier: &'a Supplier,
        departure: NaiveDateTime,
    ) -> RouteCandidate<'a> {
        match self.provider.fetch_route(&self.origin, &supplier.location) {
            RouteLookup::Found(route) => {
                let cost = Self::live_route_cost(&route);
                log::info!(
                    "Route to {} has {} points, distance: {:.2} km, time: {:.1} min, cost: {:.2}",
                    supplier.name,
                    route.coordinates.len(),
                    route.distance_km,
                    route.time_mins,
                    cost
                );

                let detail = RouteDetail::road(&supplier.name, route.distance_km, route.time_mins);
                let route = route.anchored(self.origin, supplier.location);

                RouteCandidate {
                    supplier,
                    path: route.coordinates,
                    cost,
                    detail,
                }
            }
            RouteLookup::Unavailable(reason) => {
                log::debug!("Live route to {} unavailable: {}", supplier.name, reason);
                self.direct_line(supplier, departure)
            }
        }
    }

    /// Straight line from the hospital to the supplier, priced by the cost model
    fn direct_line<'a>(
        &'a self,
        supplier: &'a Supplier,
        departure: NaiveDateTime,
    ) -> RouteCandidate<'a> {
        let cost = cost_or_penalty(
            self.cost_model.as_ref(),
            &self.origin,
            &supplier.location,
            departure,
        );
        log::info!("Using direct route to {}, cost: {:.2}", supplier.name, cost);

        RouteCandidate {
            supplier,
            path: vec![self.origin, supplier.location],
            cost,
            detail: RouteDetail::direct(&supplier.name),
        }
    }
}
