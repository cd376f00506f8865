use itertools::Itertools;

use crate::route_branching::error::RouteBranchingError;
use crate::route_branching::segment_graph::SegmentGraph;
use crate::route_branching::stop_graph::DisambiguatedStopId;
use crate::transit::{StopIdentifier, TransitProvider};

/// Put segments in the order their first stops appear in the canonical list.
///
/// A canonical parent station also matches a segment starting at one of its
/// child stops. Every segment must be found.
pub(crate) fn segment_order(
    segment_graph: &SegmentGraph,
    stop_ids: &[StopIdentifier],
    provider: &dyn TransitProvider,
) -> Result<Vec<DisambiguatedStopId>, RouteBranchingError> {
    let order: Vec<DisambiguatedStopId> = stop_ids
        .iter()
        .filter_map(|stop_id| find_segment(segment_graph, stop_id, provider))
        .unique()
        .collect();

    let total = segment_graph.vertex_count();
    if order.len() != total {
        return Err(RouteBranchingError::SegmentsLost {
            lost: total.abs_diff(order.len()),
            total,
        });
    }

    Ok(order)
}

fn find_segment(
    segment_graph: &SegmentGraph,
    stop_id: &StopIdentifier,
    provider: &dyn TransitProvider,
) -> Option<DisambiguatedStopId> {
    let direct = DisambiguatedStopId::new(stop_id.clone(), 0);
    if segment_graph.contains_vertex(&direct) {
        return Some(direct);
    }

    let stop = provider.get_stop(stop_id)?;
    segment_graph
        .vertices()
        .keys()
        .find(|id| id.index == 0 && stop.child_stop_ids().contains(&id.stop_id))
        .cloned()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use super::*;
    use crate::route_branching::graph::GraphBuilder;
    use crate::route_branching::segment_graph::BranchSegmentInGraph;
    use crate::route_branching::stop_graph::Stop;
    use crate::transit::{StaticTransitProvider, StopImpl};

    fn segments(first_stops: &[&str]) -> SegmentGraph {
        let mut graph = GraphBuilder::new();
        for pair in first_stops.windows(2) {
            graph.put_edge(
                DisambiguatedStopId::new(pair[0], 0),
                DisambiguatedStopId::new(pair[1], 0),
            );
        }
        for stop_id in first_stops {
            graph.put_vertex(
                DisambiguatedStopId::new(*stop_id, 0),
                BranchSegmentInGraph {
                    stops: vec![Stop {
                        id: StopIdentifier::new(stop_id),
                        name: Arc::from(*stop_id),
                    }],
                    typicalities: BTreeSet::new(),
                },
            );
        }
        graph.build()
    }

    fn stop(id: &str, parent: Option<&str>) -> StopImpl {
        StopImpl {
            id: StopIdentifier::new(id),
            name: Arc::from(id),
            parent_station_id: parent.map(StopIdentifier::new),
            child_stop_ids: Vec::new(),
        }
    }

    fn ids(stop_ids: &[&str]) -> Vec<StopIdentifier> {
        stop_ids.iter().map(StopIdentifier::new).collect()
    }

    #[test]
    fn test_canonical_order_wins() {
        let graph = segments(&["a", "c", "b"]);
        let provider = StaticTransitProvider::new();
        let order = segment_order(&graph, &ids(&["a", "b", "x", "c"]), &provider).unwrap();
        let order: Vec<_> = order.iter().map(|id| id.stop_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parent_station_matches_child_segment() {
        let graph = segments(&["a", "b-platform"]);
        let provider = StaticTransitProvider::from_data(
            vec![stop("a", None), stop("b", None), stop("b-platform", Some("b"))],
            vec![],
            vec![],
            vec![],
        );
        let order = segment_order(&graph, &ids(&["a", "b"]), &provider).unwrap();
        assert_eq!(order[1], DisambiguatedStopId::new("b-platform", 0));
    }

    #[test]
    fn test_missing_segment_is_reported() {
        let graph = segments(&["a", "b", "c"]);
        let provider = StaticTransitProvider::new();
        assert_eq!(
            segment_order(&graph, &ids(&["a", "c"]), &provider),
            Err(RouteBranchingError::SegmentsLost { lost: 1, total: 3 })
        );
    }

    #[test]
    fn test_repeated_canonical_stop_counts_once() {
        let graph = segments(&["a", "b"]);
        let provider = StaticTransitProvider::new();
        let order = segment_order(&graph, &ids(&["a", "b", "a"]), &provider).unwrap();
        assert_eq!(order.len(), 2);
    }
}
