//! Core traits for transit entities.
//!
//! These traits define the public interface for transit data.
//! Implementations can be in-memory, database-backed, or remote.

use std::sync::Arc;

use crate::identifiers::*;
use crate::models::types::*;

// ============================================================================
// Core Entity Traits
// ============================================================================

/// A single transit trip (vehicle run visiting an ordered list of stops)
pub trait Trip: Send + Sync {
    fn id(&self) -> &TripIdentifier;
    fn route_id(&self) -> &RouteIdentifier;

    /// Pattern this trip belongs to, if the feed assigns one
    fn route_pattern_id(&self) -> Option<&RoutePatternIdentifier>;

    /// Direction (e.g., Northbound vs Southbound)
    fn direction_id(&self) -> DirectionId;

    /// Display name (e.g., "Ashmont", "To City Center")
    fn headsign(&self) -> &str;

    /// Ordered stop (platform) ids this trip visits
    fn stop_ids(&self) -> &[StopIdentifier];
}

/// A named variant of a route's path in one direction
pub trait RoutePattern: Send + Sync {
    fn id(&self) -> &RoutePatternIdentifier;
    fn route_id(&self) -> &RouteIdentifier;
    fn direction_id(&self) -> DirectionId;

    /// How normal this pattern is; `None` means the feed does not say
    fn typicality(&self) -> Option<Typicality>;

    /// Trip whose stop sequence stands in for the whole pattern
    fn representative_trip_id(&self) -> &TripIdentifier;

    fn sort_order(&self) -> i32 {
        0
    }
}

/// A transit route (e.g., "Red Line", "Route 66")
pub trait Route: Send + Sync {
    fn id(&self) -> &RouteIdentifier;

    /// Type of transportation
    fn route_type(&self) -> RouteType;

    /// Short name (e.g., "1", "A", "Red")
    fn short_name(&self) -> &str;

    /// Long name (e.g., "Providence/Stoughton Line")
    fn long_name(&self) -> &str;

    /// Direction name (e.g., "Outbound", "South")
    fn direction_name(&self, direction: DirectionId) -> Option<&str>;

    /// Where the direction is headed (e.g., "Ashmont/Braintree")
    fn direction_destination(&self, direction: DirectionId) -> Option<&str>;
}

/// A stop, platform or parent station
pub trait TransitStop: Send + Sync {
    fn id(&self) -> &StopIdentifier;
    fn name(&self) -> &str;

    /// Parent station (if this is a platform or entrance)
    fn parent_station_id(&self) -> Option<&StopIdentifier>;

    /// Platforms and entrances (if this is a parent station)
    fn child_stop_ids(&self) -> &[StopIdentifier];
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Provider of all transit data with lookup and query methods
pub trait TransitProvider: Send + Sync {
    // ---- Lookups ----
    fn get_stop(&self, id: &StopIdentifier) -> Option<Arc<dyn TransitStop>>;
    fn get_route(&self, id: &RouteIdentifier) -> Option<Arc<dyn Route>>;
    fn get_route_pattern(&self, id: &RoutePatternIdentifier) -> Option<Arc<dyn RoutePattern>>;
    fn get_trip(&self, id: &TripIdentifier) -> Option<Arc<dyn Trip>>;

    // ---- Collections ----
    fn all_routes(&self) -> Vec<Arc<dyn Route>>;

    /// Patterns serving a route in one direction, in a stable order
    fn route_patterns_for(
        &self,
        route: &RouteIdentifier,
        direction: DirectionId,
    ) -> Vec<Arc<dyn RoutePattern>>;

    // ---- Station hierarchy ----

    /// The stop itself followed by each of its ancestor stations, nearest
    /// first. Unknown ids yield an empty list; parent loops are cut.
    fn stop_ancestry(&self, id: &StopIdentifier) -> Vec<Arc<dyn TransitStop>> {
        let mut ancestry: Vec<Arc<dyn TransitStop>> = Vec::new();
        let mut next = self.get_stop(id);

        while let Some(stop) = next {
            if ancestry.iter().any(|seen| seen.id() == stop.id()) {
                break;
            }
            next = stop
                .parent_station_id()
                .and_then(|parent_id| self.get_stop(parent_id));
            ancestry.push(stop);
        }

        ancestry
    }
}
