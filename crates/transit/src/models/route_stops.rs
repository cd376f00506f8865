//! Canonical stop order for a route in one direction.

use crate::identifiers::{RouteIdentifier, StopIdentifier};
use crate::models::types::DirectionId;

/// The authoritative left-to-right stop order a route visits in one
/// direction, as supplied by the upstream stop-sequence service.
///
/// Ids are parent stations where the stop has one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStopsResult {
    pub route_id: RouteIdentifier,
    pub direction_id: DirectionId,
    pub stop_ids: Vec<StopIdentifier>,
}

impl RouteStopsResult {
    pub fn new(
        route_id: impl Into<RouteIdentifier>,
        direction_id: DirectionId,
        stop_ids: impl IntoIterator<Item = impl Into<StopIdentifier>>,
    ) -> Self {
        Self {
            route_id: route_id.into(),
            direction_id,
            stop_ids: stop_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the canonical list begins with `prefix`.
    pub fn starts_with(&self, prefix: &[StopIdentifier]) -> bool {
        self.stop_ids.starts_with(prefix)
    }
}
