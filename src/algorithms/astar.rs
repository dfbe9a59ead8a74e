use std::cmp::{Ordering, Reverse};
use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use priority_queue::PriorityQueue;

use crate::algorithms::cost_model::{cost_or_penalty, CostModel};
use crate::algorithms::{PathFinder, SearchPath};
use crate::error::Result;
use crate::models::{Cost, GeoPoint};

// Custom wrapper to make f64 implement Ord
#[derive(PartialEq, Copy, Clone, Debug)]
struct F64Wrapper(f64);

impl Eq for F64Wrapper {}

impl PartialOrd for F64Wrapper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for F64Wrapper {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// Frontier priority: estimated total cost, then insertion sequence so that
// ties are resolved in favour of the earliest inserted node
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug)]
struct FrontierKey {
    f_score: F64Wrapper,
    sequence: u64,
}

/// A* search over the complete graph `{start} ∪ neighbors`.
///
/// Every node is reachable from every other node with the edge weight given
/// by the cost model at the departure time. The heuristic is
/// [`CostModel::lower_bound`] towards the goal, which is consistent for the
/// default model because each edge costs at least its great-circle distance.
pub struct AStar<'a> {
    cost_model: &'a dyn CostModel,
    departure: NaiveDateTime,
}

impl<'a> AStar<'a> {
    /// Creates a new search using `cost_model` evaluated at `departure`
    pub fn new(cost_model: &'a dyn CostModel, departure: NaiveDateTime) -> Self {
        Self {
            cost_model,
            departure,
        }
    }

    /// Builds the vertex set, dropping duplicates, the start node and invalid points
    fn vertices(start: &GeoPoint, neighbors: &[GeoPoint]) -> Vec<GeoPoint> {
        let mut seen = HashSet::new();
        let mut vertices = Vec::with_capacity(neighbors.len());

        for neighbor in neighbors {
            if let Err(e) = neighbor.validate() {
                log::warn!("Skipping search node: {}", e);
                continue;
            }
            if neighbor != start && seen.insert(*neighbor) {
                vertices.push(*neighbor);
            }
        }

        vertices
    }

    /// Walks predecessors back from the goal and returns the path start-first
    fn reconstruct_path(
        came_from: &HashMap<GeoPoint, GeoPoint>,
        start: GeoPoint,
        goal: GeoPoint,
    ) -> Vec<GeoPoint> {
        let mut path = vec![goal];
        let mut current = goal;

        while current != start {
            match came_from.get(&current) {
                Some(previous) => {
                    path.push(*previous);
                    current = *previous;
                }
                None => break,
            }
        }

        path.reverse();
        path
    }
}

impl PathFinder for AStar<'_> {
    fn find_path(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        neighbors: &[GeoPoint],
    ) -> Result<Option<SearchPath>> {
        start.validate()?;
        goal.validate()?;

        if neighbors.is_empty() {
            log::debug!("Search has no neighbor nodes, no path to {:?}", goal);
            return Ok(None);
        }

        let vertices = Self::vertices(&start, neighbors);

        let mut g_score: HashMap<GeoPoint, Cost> = HashMap::new();
        let mut came_from: HashMap<GeoPoint, GeoPoint> = HashMap::new();
        let mut closed: HashSet<GeoPoint> = HashSet::new();
        let mut frontier: PriorityQueue<GeoPoint, Reverse<FrontierKey>> = PriorityQueue::new();
        let mut sequence: u64 = 0;

        g_score.insert(start, 0.0);
        frontier.push(
            start,
            Reverse(FrontierKey {
                f_score: F64Wrapper(self.cost_model.lower_bound(&start, &goal)),
                sequence,
            }),
        );

        while let Some((current, _)) = frontier.pop() {
            let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);

            // Standard goal test: the goal is the cheapest frontier entry
            if current == goal {
                return Ok(Some(SearchPath {
                    nodes: Self::reconstruct_path(&came_from, start, goal),
                    cost: current_g,
                }));
            }

            closed.insert(current);

            for neighbor in &vertices {
                if closed.contains(neighbor) {
                    continue;
                }

                let edge = cost_or_penalty(self.cost_model, &current, neighbor, self.departure);
                let tentative_g = current_g + edge;
                let known_g = g_score.get(neighbor).copied().unwrap_or(f64::INFINITY);

                // Relaxation - update if this path is cheaper
                if tentative_g < known_g {
                    came_from.insert(*neighbor, current);
                    g_score.insert(*neighbor, tentative_g);

                    sequence += 1;
                    let f_score = tentative_g + self.cost_model.lower_bound(neighbor, &goal);
                    frontier.push(
                        *neighbor,
                        Reverse(FrontierKey {
                            f_score: F64Wrapper(f_score),
                            sequence,
                        }),
                    );
                }
            }
        }

        log::debug!("Frontier exhausted without reaching {:?}", goal);
        Ok(None)
    }
}
