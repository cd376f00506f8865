use std::collections::{BTreeSet, HashMap};

use branchline_transit::{DirectionId, RouteIdentifier, StopIdentifier, TransitProvider};
use itertools::Itertools;

/// Station-level stop lists of every representative trip for a route in one
/// direction, in pattern order.
pub fn representative_stop_lists(
    provider: &dyn TransitProvider,
    route_id: &RouteIdentifier,
    direction: DirectionId,
) -> Vec<Vec<StopIdentifier>> {
    provider
        .route_patterns_for(route_id, direction)
        .iter()
        .filter_map(|pattern| provider.get_trip(pattern.representative_trip_id()))
        .map(|trip| {
            trip.stop_ids()
                .iter()
                .map(|stop_id| {
                    provider
                        .stop_ancestry(stop_id)
                        .last()
                        .map(|station| station.id().clone())
                        .unwrap_or_else(|| stop_id.clone())
                })
                .collect()
        })
        .collect()
}

/// A stop order consistent with every consecutive pair in `stop_lists`.
///
/// Among stops that could go next, the one seen first wins. If the pairs
/// contain a cycle there is no such order and stops are listed by first
/// appearance instead.
pub fn infer_canonical_order(stop_lists: &[Vec<StopIdentifier>]) -> Vec<StopIdentifier> {
    let stops: Vec<&StopIdentifier> = stop_lists.iter().flatten().unique().collect();
    let index: HashMap<&StopIdentifier, usize> =
        stops.iter().enumerate().map(|(i, stop)| (*stop, i)).collect();

    let edges: BTreeSet<(usize, usize)> = stop_lists
        .iter()
        .flat_map(|stop_list| stop_list.iter().tuple_windows())
        .map(|(from, to)| (index[from], index[to]))
        .filter(|(from, to)| from != to)
        .collect();

    let mut in_degree = vec![0usize; stops.len()];
    for &(_, to) in &edges {
        in_degree[to] += 1;
    }

    let mut ready: BTreeSet<usize> = (0..stops.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(stops.len());
    while let Some(next) = ready.pop_first() {
        order.push(next);
        for &(_, to) in edges.range((next, 0)..=(next, usize::MAX)) {
            in_degree[to] -= 1;
            if in_degree[to] == 0 {
                ready.insert(to);
            }
        }
    }

    if order.len() < stops.len() {
        log::warn!("Representative trips disagree on stop order, using first appearance");
        order = (0..stops.len()).collect();
    }

    order.into_iter().map(|i| stops[i].clone()).collect()
}
