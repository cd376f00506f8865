use branchline_core::route_branching::{BranchSegment, BranchStop, StickSideState};
use branchline_transit::{DirectionId, RouteStopsResult};

use crate::state::route_details::BranchingError;

/// What one stick looks like at one stop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, uniffi::Record)]
pub struct StickSideStateRecord {
    pub before: bool,
    pub current_stop: bool,
    pub current_cross: bool,
    pub after: bool,
}

impl From<StickSideState> for StickSideStateRecord {
    fn from(state: StickSideState) -> Self {
        Self {
            before: state.before,
            current_stop: state.current_stop,
            current_cross: state.current_cross,
            after: state.after,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, uniffi::Record)]
pub struct BranchStopRecord {
    pub stop_id: String,
    pub stop_name: String,
    pub left: StickSideStateRecord,
    pub right: StickSideStateRecord,
}

impl From<BranchStop> for BranchStopRecord {
    fn from(stop: BranchStop) -> Self {
        Self {
            stop_id: stop.stop.id.to_string(),
            stop_name: stop.stop.name.to_string(),
            left: stop.stick_state.left.into(),
            right: stop.stick_state.right.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, uniffi::Record)]
pub struct BranchSegmentRecord {
    pub stops: Vec<BranchStopRecord>,
    pub name: Option<String>,
    pub is_typical: bool,
}

impl From<BranchSegment> for BranchSegmentRecord {
    fn from(segment: BranchSegment) -> Self {
        Self {
            stops: segment.stops.into_iter().map(Into::into).collect(),
            name: segment.name,
            is_typical: segment.is_typical,
        }
    }
}

/// Canonical stop order for a route, as fetched by the host app.
#[derive(Clone, Debug, PartialEq, Eq, uniffi::Record)]
pub struct RouteStopsInput {
    pub route_id: String,
    /// GTFS direction, 0 or 1
    pub direction_id: u8,
    pub stop_ids: Vec<String>,
}

impl TryFrom<RouteStopsInput> for RouteStopsResult {
    type Error = BranchingError;

    fn try_from(input: RouteStopsInput) -> Result<Self, Self::Error> {
        let direction = DirectionId::from_gtfs(input.direction_id)
            .ok_or(BranchingError::InvalidDirection(input.direction_id))?;
        Ok(RouteStopsResult::new(input.route_id, direction, input.stop_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_stops_input_direction() {
        let input = RouteStopsInput {
            route_id: "Red".into(),
            direction_id: 1,
            stop_ids: vec!["place-alfcl".into(), "place-jfk".into()],
        };
        let route_stops = RouteStopsResult::try_from(input.clone()).unwrap();
        assert_eq!(route_stops.direction_id, DirectionId::Inbound);
        assert_eq!(route_stops.stop_ids.len(), 2);

        let invalid = RouteStopsInput {
            direction_id: 2,
            ..input
        };
        assert!(matches!(
            RouteStopsResult::try_from(invalid),
            Err(BranchingError::InvalidDirection(2))
        ));
    }
}
