//! Lay ordered segments out on the two sticks of the diagram.
//!
//! Every segment is drawn on either the left or the right stick. Segments
//! sharing a parent or a child go on opposite sticks, so a fork or merge
//! always crosses from one stick to the other.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Neg;

use itertools::Itertools;
use strum::{Display, EnumIter};

use crate::route_branching::error::RouteBranchingError;
use crate::route_branching::segment_graph::{BranchSegmentInGraph, SegmentGraph};
use crate::route_branching::stop_graph::{DisambiguatedStopId, Stop};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum StickSide {
    Left,
    Right,
}

impl Neg for StickSide {
    type Output = StickSide;

    fn neg(self) -> StickSide {
        match self {
            StickSide::Left => StickSide::Right,
            StickSide::Right => StickSide::Left,
        }
    }
}

/// What to draw on one stick at one stop.
///
/// When `current_cross` is set the stop is a fork or a merge, depending on
/// `before` and `after` of the stick without `current_stop`. The stop itself
/// is always on both branches: forks happen after it and merges before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StickSideState {
    pub before: bool,
    pub current_stop: bool,
    pub current_cross: bool,
    pub after: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StickState {
    pub left: StickSideState,
    pub right: StickSideState,
}

impl StickState {
    /// Place `own` on `side` and `opposite` on the other stick.
    pub fn on_side(side: StickSide, own: StickSideState, opposite: StickSideState) -> Self {
        match side {
            StickSide::Left => StickState {
                left: own,
                right: opposite,
            },
            StickSide::Right => StickState {
                left: opposite,
                right: own,
            },
        }
    }

    pub fn side(&self, side: StickSide) -> &StickSideState {
        match side {
            StickSide::Left => &self.left,
            StickSide::Right => &self.right,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchStop {
    pub stop: Stop,
    pub stick_state: StickState,
}

/// A segment ready to draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchSegment {
    pub stops: Vec<BranchStop>,
    pub name: Option<String>,
    pub is_typical: bool,
}

/// Pick a stick for every segment, visiting them in canonical order.
pub(crate) fn assign_sides(
    order: &[DisambiguatedStopId],
    segment_graph: &SegmentGraph,
) -> Result<BTreeMap<DisambiguatedStopId, StickSide>, RouteBranchingError> {
    let mut sides = BTreeMap::new();

    for segment in order {
        let unassigned: Vec<DisambiguatedStopId> = segment_graph
            .neighbors_in(segment)
            .filter(|parent| !sides.contains_key(*parent))
            .cloned()
            .collect();
        if !unassigned.is_empty() {
            return Err(RouteBranchingError::SequenceOutOfOrder {
                expected_before: unassigned,
                expected_after: segment.clone(),
            });
        }

        let parent_sides = sides_of(&sides, segment_graph.neighbors_in(segment));
        let siblings: BTreeSet<&DisambiguatedStopId> = segment_graph
            .neighbors_in(segment)
            .flat_map(|parent| segment_graph.neighbors_out(parent))
            .chain(
                segment_graph
                    .neighbors_out(segment)
                    .flat_map(|child| segment_graph.neighbors_in(child)),
            )
            .filter(|sibling| *sibling != segment)
            .collect();
        let sibling_sides = sides_of(&sides, siblings.iter().copied());

        let side = if sibling_sides.len() > 1 {
            return Err(RouteBranchingError::SiblingsOnBothSides {
                segment: segment.clone(),
                siblings: siblings.into_iter().cloned().collect(),
            });
        } else if let Some(&sibling_side) = sibling_sides.first() {
            -sibling_side
        } else if let Ok(&parent_side) = parent_sides.iter().exactly_one() {
            parent_side
        } else {
            StickSide::Right
        };

        sides.insert(segment.clone(), side);
    }

    Ok(sides)
}

/// Work out the stick state of every stop, keeping sticks continuous through
/// segments that another segment jumps over.
pub(crate) fn branch_segments(
    order: &[DisambiguatedStopId],
    segment_graph: &SegmentGraph,
    sides: &BTreeMap<DisambiguatedStopId, StickSide>,
    segment_name: impl Fn(&BranchSegmentInGraph) -> Option<String>,
) -> Result<Vec<BranchSegment>, RouteBranchingError> {
    let mut result = Vec::with_capacity(order.len());
    let mut skipping_current: BTreeSet<DisambiguatedStopId> = BTreeSet::new();

    for (position, id) in order.iter().enumerate() {
        let Some(segment) = segment_graph.vertex(id) else {
            continue;
        };

        skipping_current.remove(id);
        if skipping_current.len() > 1 {
            return Err(RouteBranchingError::MultipleSegmentsSkippingCurrent {
                segment: id.clone(),
                skipping: skipping_current.into_iter().collect(),
            });
        }
        let has_skipping = !skipping_current.is_empty();

        let Some(&side) = sides.get(id) else {
            continue;
        };
        let parent_sides = sides_of(sides, segment_graph.neighbors_in(id));
        let child_sides = sides_of(sides, segment_graph.neighbors_out(id));

        let last_index = segment.stops.len().saturating_sub(1);
        let stops = segment
            .stops
            .iter()
            .enumerate()
            .map(|(index, stop)| {
                let is_first = index == 0;
                let is_last = index == last_index;
                let current_cross =
                    (is_first && parent_sides.len() > 1) || (is_last && child_sides.len() > 1);

                let own = StickSideState {
                    before: !is_first || !parent_sides.is_empty(),
                    current_stop: true,
                    current_cross,
                    after: !is_last || !child_sides.is_empty(),
                };
                let opposite = StickSideState {
                    before: (is_first
                        && parent_sides.contains(&side)
                        && parent_sides.contains(&-side))
                        || has_skipping,
                    current_stop: false,
                    current_cross,
                    after: (is_last && child_sides.contains(&-side)) || has_skipping,
                };

                BranchStop {
                    stop: stop.clone(),
                    stick_state: StickState::on_side(side, own, opposite),
                }
            })
            .collect();

        if let Some(next) = order.get(position + 1) {
            skipping_current.extend(
                segment_graph
                    .neighbors_out(id)
                    .filter(|child| *child != next)
                    .cloned(),
            );
        }

        result.push(BranchSegment {
            stops,
            name: segment_name(segment),
            is_typical: segment.is_typical(),
        });
    }

    Ok(result)
}

fn sides_of<'a>(
    sides: &BTreeMap<DisambiguatedStopId, StickSide>,
    segments: impl Iterator<Item = &'a DisambiguatedStopId>,
) -> BTreeSet<StickSide> {
    segments.filter_map(|id| sides.get(id).copied()).collect()
}
