//! Collapse runs of unbranched stops into segments.

use std::collections::{BTreeSet, VecDeque};

use itertools::Itertools;
use tracing::debug;

use crate::route_branching::error::RouteBranchingError;
use crate::route_branching::graph::{Graph, GraphBuilder};
use crate::route_branching::stop_graph::{DisambiguatedStopId, Stop, StopGraph};
use crate::transit::Typicality;

/// A maximal run of stops with no forks or merges inside it and a single
/// answer to "is this typical service?".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchSegmentInGraph {
    pub stops: Vec<Stop>,
    pub typicalities: BTreeSet<Typicality>,
}

impl BranchSegmentInGraph {
    pub fn is_typical(&self) -> bool {
        self.typicalities.contains(&Typicality::Typical)
    }
}

/// Segments keyed by the id of their first stop.
pub type SegmentGraph = Graph<DisambiguatedStopId, BranchSegmentInGraph>;

pub(crate) fn collapse_stop_graph(
    stop_graph: &StopGraph,
) -> Result<SegmentGraph, RouteBranchingError> {
    let mut segments = GraphBuilder::new();
    let mut frontier: VecDeque<DisambiguatedStopId> = stop_graph.sources().into_iter().collect();

    while let Some(start) = frontier.pop_front() {
        if segments.contains_vertex(&start) {
            continue;
        }
        let Some(start_vertex) = stop_graph.vertex(&start) else {
            continue;
        };

        let mut stops = vec![start_vertex.stop.clone()];
        let mut typicalities = start_vertex.typicalities.clone();
        let mut current = start.clone();

        while let Ok(next) = stop_graph.neighbors_out(&current).exactly_one() {
            if !stop_graph.neighbors_in(next).eq([&current]) {
                break;
            }
            let Some(next_vertex) = stop_graph.vertex(next) else {
                break;
            };

            let already_typical =
                (!typicalities.is_empty()).then(|| typicalities.contains(&Typicality::Typical));
            let next_typical = next_vertex.typicalities.contains(&Typicality::Typical);
            if already_typical.is_some_and(|typical| typical != next_typical) {
                break;
            }

            stops.push(next_vertex.stop.clone());
            typicalities.extend(next_vertex.typicalities.iter().copied());
            current = next.clone();
        }

        for next in stop_graph.neighbors_out(&current) {
            frontier.push_back(next.clone());
            segments.put_edge(start.clone(), next.clone());
        }
        segments.put_vertex(start, BranchSegmentInGraph { stops, typicalities });
    }

    if segments.contains_cycle() {
        return Err(RouteBranchingError::SegmentGraphContainsCycle);
    }

    let graph = segments.build();
    debug!(
        segments = graph.vertex_count(),
        edges = graph.edge_count(),
        "Collapsed stop graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::route_branching::stop_graph::StopVertex;
    use crate::transit::StopIdentifier;

    fn stop_graph(
        vertices: &[(&str, &[Typicality])],
        edges: &[(&str, &str)],
    ) -> StopGraph {
        let mut graph = GraphBuilder::new();
        for &(id, typicalities) in vertices {
            graph.put_vertex(
                DisambiguatedStopId::new(id, 0),
                StopVertex {
                    stop: Stop {
                        id: StopIdentifier::new(id),
                        name: Arc::from(id),
                    },
                    typicalities: typicalities.iter().copied().collect(),
                },
            );
        }
        for &(from, to) in edges {
            graph.put_edge(DisambiguatedStopId::new(from, 0), DisambiguatedStopId::new(to, 0));
        }
        graph.build()
    }

    fn names(segment: &BranchSegmentInGraph) -> Vec<&str> {
        segment.stops.iter().map(|stop| stop.name.as_ref()).collect()
    }

    fn id(stop_id: &str) -> DisambiguatedStopId {
        DisambiguatedStopId::new(stop_id, 0)
    }

    const TYPICAL: &[Typicality] = &[Typicality::Typical];
    const ATYPICAL: &[Typicality] = &[Typicality::Atypical];

    #[test]
    fn test_straight_line_is_one_segment() {
        let graph = stop_graph(
            &[("a", TYPICAL), ("b", TYPICAL), ("c", TYPICAL)],
            &[("a", "b"), ("b", "c")],
        );
        let segments = collapse_stop_graph(&graph).unwrap();

        assert_eq!(segments.vertex_count(), 1);
        let segment = segments.vertex(&id("a")).unwrap();
        assert_eq!(names(segment), vec!["a", "b", "c"]);
        assert!(segment.is_typical());
    }

    #[test]
    fn test_fork_and_merge() {
        let graph = stop_graph(
            &[
                ("s1", &[Typicality::Typical, Typicality::Atypical]),
                ("s2", TYPICAL),
                ("s3", ATYPICAL),
                ("s4", &[Typicality::Typical, Typicality::Atypical]),
                ("s5", TYPICAL),
            ],
            &[("s1", "s2"), ("s2", "s4"), ("s4", "s5"), ("s1", "s3"), ("s3", "s4")],
        );
        let segments = collapse_stop_graph(&graph).unwrap();

        let ids: Vec<_> = segments.vertices().keys().map(|id| id.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2", "s3", "s4"]);
        assert_eq!(names(segments.vertex(&id("s4")).unwrap()), vec!["s4", "s5"]);
        assert!(!segments.vertex(&id("s3")).unwrap().is_typical());
        assert!(segments.contains_edge(&id("s1"), &id("s2")));
        assert!(segments.contains_edge(&id("s1"), &id("s3")));
        assert!(segments.contains_edge(&id("s2"), &id("s4")));
        assert!(segments.contains_edge(&id("s3"), &id("s4")));
        assert_eq!(segments.edge_count(), 4);
    }

    #[test]
    fn test_typicality_change_splits_segment() {
        let graph = stop_graph(
            &[("a", TYPICAL), ("b", TYPICAL), ("c", ATYPICAL), ("d", ATYPICAL)],
            &[("a", "b"), ("b", "c"), ("c", "d")],
        );
        let segments = collapse_stop_graph(&graph).unwrap();

        assert_eq!(names(segments.vertex(&id("a")).unwrap()), vec!["a", "b"]);
        assert_eq!(names(segments.vertex(&id("c")).unwrap()), vec!["c", "d"]);
        assert!(segments.contains_edge(&id("a"), &id("c")));
    }

    #[test]
    fn test_non_typical_kinds_stay_together() {
        let graph = stop_graph(
            &[("a", ATYPICAL), ("b", &[Typicality::Deviation])],
            &[("a", "b")],
        );
        let segments = collapse_stop_graph(&graph).unwrap();
        let segment = segments.vertex(&id("a")).unwrap();
        assert_eq!(names(segment), vec!["a", "b"]);
        assert_eq!(
            segment.typicalities,
            BTreeSet::from([Typicality::Deviation, Typicality::Atypical])
        );
    }

    #[test]
    fn test_loop_into_merge_is_segment_cycle() {
        // b -> a re-enters the segment starting at a, which then points at
        // itself
        let graph = stop_graph(
            &[("s", TYPICAL), ("a", TYPICAL), ("b", TYPICAL)],
            &[("s", "a"), ("a", "b"), ("b", "a")],
        );
        assert!(matches!(
            collapse_stop_graph(&graph),
            Err(RouteBranchingError::SegmentGraphContainsCycle)
        ));
    }

    #[test]
    fn test_empty_graph() {
        let segments = collapse_stop_graph(&stop_graph(&[], &[])).unwrap();
        assert_eq!(segments.vertex_count(), 0);
    }
}
