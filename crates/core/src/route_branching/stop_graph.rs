//! The stop graph: one vertex per stop visit, one edge per consecutive pair of
//! stops in some pattern's representative trip.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::route_branching::corrections::CorrectionRules;
use crate::route_branching::error::RouteBranchingError;
use crate::route_branching::graph::{Graph, GraphBuilder};
use crate::transit::{RouteStopsResult, StopIdentifier, TransitProvider, Typicality};

/// A stop id plus how many times the same trip has already visited it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisambiguatedStopId {
    pub stop_id: StopIdentifier,
    pub index: usize,
}

impl DisambiguatedStopId {
    pub fn new(stop_id: impl Into<StopIdentifier>, index: usize) -> Self {
        Self {
            stop_id: stop_id.into(),
            index,
        }
    }
}

impl fmt::Display for DisambiguatedStopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index == 0 {
            write!(f, "{}", self.stop_id)
        } else {
            write!(f, "{}#{}", self.stop_id, self.index)
        }
    }
}

/// Display record of a stop in the diagram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stop {
    pub id: StopIdentifier,
    pub name: Arc<str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopVertex {
    pub stop: Stop,
    /// Typicalities of every pattern passing through this vertex
    pub typicalities: BTreeSet<Typicality>,
}

pub type StopGraph = Graph<DisambiguatedStopId, StopVertex>;

pub(crate) fn build_stop_graph(
    route_stops: &RouteStopsResult,
    provider: &dyn TransitProvider,
    corrections: &dyn CorrectionRules,
) -> Result<StopGraph, RouteBranchingError> {
    let canonical: HashSet<&StopIdentifier> = route_stops.stop_ids.iter().collect();
    let mut builder = GraphBuilder::new();

    for pattern in provider.route_patterns_for(&route_stops.route_id, route_stops.direction_id) {
        let Some(trip) = provider.get_trip(pattern.representative_trip_id()) else {
            debug!(
                pattern = %pattern.id(),
                trip = %pattern.representative_trip_id(),
                "Skipping pattern without representative trip"
            );
            continue;
        };

        let Some(stops) = resolve_stops(trip.stop_ids(), &canonical, provider) else {
            warn!(
                pattern = %pattern.id(),
                trip = %trip.id(),
                "Discarding trip with stops outside the canonical sequence"
            );
            continue;
        };

        let typicality = pattern.typicality().unwrap_or(Typicality::Typical);
        let visits = disambiguate(stops);
        if visits.len() < 2 {
            continue;
        }

        for (id, stop) in &visits {
            builder
                .vertex_or_insert_with(id.clone(), || StopVertex {
                    stop: stop.clone(),
                    typicalities: BTreeSet::new(),
                })
                .typicalities
                .insert(typicality);
        }
        for ((from, _), (to, _)) in visits.into_iter().tuple_windows() {
            builder.put_edge(from, to);
        }
    }

    corrections.rewrite_stop_graph(&route_stops.route_id, route_stops.direction_id, &mut builder);

    if builder.contains_cycle() {
        return Err(RouteBranchingError::StopGraphContainsCycle);
    }

    let dropped = builder.drop_skipping_edges();
    if !dropped.is_empty() {
        debug!(count = dropped.len(), "Dropped skipping edges");
    }

    let graph = builder.build();
    debug!(
        route = %route_stops.route_id,
        direction = %route_stops.direction_id,
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Built stop graph"
    );
    Ok(graph)
}

/// Map each stop onto itself or its nearest ancestor in `canonical`.
///
/// Returns `None` if any stop has no such ancestor.
fn resolve_stops(
    stop_ids: &[StopIdentifier],
    canonical: &HashSet<&StopIdentifier>,
    provider: &dyn TransitProvider,
) -> Option<Vec<Stop>> {
    stop_ids
        .iter()
        .map(|stop_id| {
            provider
                .stop_ancestry(stop_id)
                .into_iter()
                .find(|stop| canonical.contains(stop.id()))
                .map(|stop| Stop {
                    id: stop.id().clone(),
                    name: Arc::from(stop.name()),
                })
        })
        .collect()
}

fn disambiguate(stops: Vec<Stop>) -> Vec<(DisambiguatedStopId, Stop)> {
    let mut visits: HashMap<StopIdentifier, usize> = HashMap::new();
    stops
        .into_iter()
        .map(|stop| {
            let count = visits.entry(stop.id.clone()).or_default();
            let id = DisambiguatedStopId::new(stop.id.clone(), *count);
            *count += 1;
            (id, stop)
        })
        .collect()
}
