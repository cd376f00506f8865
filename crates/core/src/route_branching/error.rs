use itertools::Itertools;
use thiserror::Error;

use crate::route_branching::stop_graph::DisambiguatedStopId;
use crate::transit::RouteIdentifier;

/// Every way a branch diagram can fail for one route and direction.
///
/// None of these are recoverable: the same inputs fail the same way every
/// time, and the caller should fall back to a flat stop list.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RouteBranchingError {
    #[error("route {0} not found")]
    RouteNotFound(RouteIdentifier),

    #[error("stop graph contains a cycle")]
    StopGraphContainsCycle,

    #[error("segment graph contains a cycle")]
    SegmentGraphContainsCycle,

    #[error("lost {lost} of {total} segments while ordering")]
    SegmentsLost { lost: usize, total: usize },

    #[error(
        "canonical order is not topological: expected [{}] before {}",
        join_ids(.expected_before),
        .expected_after
    )]
    SequenceOutOfOrder {
        expected_before: Vec<DisambiguatedStopId>,
        expected_after: DisambiguatedStopId,
    },

    #[error(
        "segment {} has siblings on both sides: [{}]",
        .segment,
        join_ids(.siblings)
    )]
    SiblingsOnBothSides {
        segment: DisambiguatedStopId,
        siblings: Vec<DisambiguatedStopId>,
    },

    #[error(
        "segment {} is skipped by more than one segment: [{}]",
        .segment,
        join_ids(.skipping)
    )]
    MultipleSegmentsSkippingCurrent {
        segment: DisambiguatedStopId,
        skipping: Vec<DisambiguatedStopId>,
    },
}

fn join_ids(ids: &[DisambiguatedStopId]) -> String {
    ids.iter().join(", ")
}
