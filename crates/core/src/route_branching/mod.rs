//! Branch diagrams for a route in one direction.
//!
//! Turns something like `A->B->D->E->F` typical plus `B->C->E` atypical into
//!
//! ```text
//!    ┍ A
//!   ┌┾ B
//! ® │┝ C
//!   ┥│ D
//!   └┾ E
//!    ┕ F
//! ```
//!
//! A _segment_ is a run of stops visited one after another that are either
//! all typical or all non-typical. A new segment starts where
//! - stops change from typical to non-typical or back
//! - there are multiple next stops
//! - the next stop has multiple previous stops
//!
//! A new segment does not start when stops change from one kind of
//! non-typical to another, or when some trips are truncated versions of
//! similarly typical trips.
//!
//! The pipeline runs in stages: build a stop graph from each pattern's
//! representative trip, collapse it into a segment graph, order the segments
//! by the canonical stop list, then lay them out on a left and a right stick.
//! Any stage can fail with a [`RouteBranchingError`], in which case callers
//! should show a flat stop list instead.

use std::sync::LazyLock;

use tracing::{debug, warn};

use crate::transit::{RouteStopsResult, TransitProvider};

pub mod corrections;
mod error;
pub mod graph;
mod names;
mod order;
pub mod render;
mod segment_graph;
mod sides;
mod stop_graph;

pub use corrections::{CorrectionRules, CorrectionTable};
pub use error::RouteBranchingError;
pub use graph::{Graph, GraphBuilder};
pub use names::{BranchNames, name_candidates};
pub use segment_graph::{BranchSegmentInGraph, SegmentGraph};
pub use sides::{BranchSegment, BranchStop, StickSide, StickSideState, StickState};
pub use stop_graph::{DisambiguatedStopId, Stop, StopGraph, StopVertex};

static BUILTIN_CORRECTIONS: LazyLock<CorrectionTable> = LazyLock::new(CorrectionTable::builtin);

/// Everything computed for one route and direction.
///
/// After [`RouteBranching::calculate`] succeeds every field is set. A
/// [`PartialRouteBranching`] keeps whichever stages finished before the
/// failure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteBranching {
    /// Connections between individual stops, with how typical each stop is
    pub stop_graph: Option<StopGraph>,
    /// Connections between segments
    pub segment_graph: Option<SegmentGraph>,
    /// Segments to draw, in order
    pub segments: Option<Vec<BranchSegment>>,
}

/// Result of [`RouteBranching::calculate_partial`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialRouteBranching {
    pub branching: RouteBranching,
    pub error: Option<RouteBranchingError>,
}

impl PartialRouteBranching {
    pub fn into_result(self) -> Result<RouteBranching, RouteBranchingError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.branching),
        }
    }
}

impl RouteBranching {
    /// Calculate with the built-in correction table.
    pub fn calculate(
        route_stops: &RouteStopsResult,
        provider: &dyn TransitProvider,
    ) -> Result<Self, RouteBranchingError> {
        Self::calculate_with(route_stops, provider, &*BUILTIN_CORRECTIONS)
    }

    pub fn calculate_with(
        route_stops: &RouteStopsResult,
        provider: &dyn TransitProvider,
        corrections: &dyn CorrectionRules,
    ) -> Result<Self, RouteBranchingError> {
        Self::calculate_partial(route_stops, provider, corrections).into_result()
    }

    /// Run as many stages as possible, keeping the output of each one that
    /// succeeded.
    pub fn calculate_partial(
        route_stops: &RouteStopsResult,
        provider: &dyn TransitProvider,
        corrections: &dyn CorrectionRules,
    ) -> PartialRouteBranching {
        let mut branching = RouteBranching::default();
        let error = branching.run_stages(route_stops, provider, corrections).err();

        if let Some(error) = &error {
            warn!(
                route = %route_stops.route_id,
                direction = %route_stops.direction_id,
                %error,
                "Route branching failed"
            );
        }

        PartialRouteBranching { branching, error }
    }

    fn run_stages(
        &mut self,
        route_stops: &RouteStopsResult,
        provider: &dyn TransitProvider,
        corrections: &dyn CorrectionRules,
    ) -> Result<(), RouteBranchingError> {
        let route_stops = corrections.rewrite_route_stops(route_stops.clone());
        let route = provider
            .get_route(&route_stops.route_id)
            .ok_or_else(|| RouteBranchingError::RouteNotFound(route_stops.route_id.clone()))?;
        let names = BranchNames::for_route(route.as_ref(), route_stops.direction_id);

        let stop_graph = self
            .stop_graph
            .insert(stop_graph::build_stop_graph(&route_stops, provider, corrections)?);
        let segment_graph = self
            .segment_graph
            .insert(segment_graph::collapse_stop_graph(stop_graph)?);

        let order = order::segment_order(segment_graph, &route_stops.stop_ids, provider)?;
        let sides = sides::assign_sides(&order, segment_graph)?;
        let segments = sides::branch_segments(&order, segment_graph, &sides, |segment| {
            segment.name(&names)
        })?;

        debug!(
            route = %route_stops.route_id,
            direction = %route_stops.direction_id,
            segments = segments.len(),
            "Calculated route branching"
        );
        self.segments = Some(segments);
        Ok(())
    }
}
