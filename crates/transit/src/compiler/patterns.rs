//! Route pattern derivation for feeds that do not publish patterns.
//!
//! Trips of one route and direction visiting the same stops in the same
//! order form one pattern.

use std::collections::{BTreeMap, HashMap};

use crate::identifiers::*;
use crate::models::types::DirectionId;
use crate::provider::{RoutePatternImpl, TripImpl};

/// Group trips into patterns and tag each trip with its pattern id.
///
/// Patterns are ordered by descending trip count (ties by representative
/// trip id), which becomes their `sort_order`. The representative trip is the
/// smallest trip id of the group. Typicality is left unset.
pub fn derive_route_patterns(trips: &mut [TripImpl]) -> Vec<RoutePatternImpl> {
    let mut groups: BTreeMap<
        (RouteIdentifier, DirectionId),
        HashMap<Vec<StopIdentifier>, Vec<usize>>,
    > = BTreeMap::new();

    for (index, trip) in trips.iter().enumerate() {
        groups
            .entry((trip.route_id.clone(), trip.direction_id))
            .or_default()
            .entry(trip.stop_ids.clone())
            .or_default()
            .push(index);
    }

    let mut patterns = Vec::new();
    for ((route_id, direction_id), sequences) in groups {
        let mut ranked: Vec<(usize, TripIdentifier, Vec<usize>)> = sequences
            .into_values()
            .filter_map(|members| {
                let representative = members.iter().map(|&i| &trips[i].id).min()?.clone();
                Some((members.len(), representative, members))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        for (sort_order, (_, representative, members)) in ranked.into_iter().enumerate() {
            let id = RoutePatternIdentifier::new(format!("{route_id}-{direction_id}-{sort_order}"));
            for index in members {
                trips[index].route_pattern_id = Some(id.clone());
            }
            patterns.push(RoutePatternImpl {
                id,
                route_id: route_id.clone(),
                direction_id,
                typicality: None,
                representative_trip_id: representative,
                sort_order: sort_order as i32,
            });
        }
    }

    patterns
}
