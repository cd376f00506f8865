//! In-memory transit provider backed by a global data snapshot.
//!
//! This is the core implementation that stores all transit data in memory
//! with lookup maps for the queries route diagrams need.

use std::collections::HashMap;
use std::sync::Arc;

use crate::identifiers::*;
use crate::models::{traits::*, types::*};

// ============================================================================
// Concrete Implementations of Traits
// ============================================================================

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopImpl {
    pub id: StopIdentifier,
    pub name: Arc<str>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent_station_id: Option<StopIdentifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub child_stop_ids: Vec<StopIdentifier>,
}

impl TransitStop for StopImpl {
    fn id(&self) -> &StopIdentifier {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent_station_id(&self) -> Option<&StopIdentifier> {
        self.parent_station_id.as_ref()
    }

    fn child_stop_ids(&self) -> &[StopIdentifier] {
        &self.child_stop_ids
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripImpl {
    pub id: TripIdentifier,
    pub route_id: RouteIdentifier,
    #[cfg_attr(feature = "serde", serde(default))]
    pub route_pattern_id: Option<RoutePatternIdentifier>,
    pub direction_id: DirectionId,
    #[cfg_attr(feature = "serde", serde(default = "empty_str"))]
    pub headsign: Arc<str>,
    pub stop_ids: Vec<StopIdentifier>,
}

impl Trip for TripImpl {
    fn id(&self) -> &TripIdentifier {
        &self.id
    }

    fn route_id(&self) -> &RouteIdentifier {
        &self.route_id
    }

    fn route_pattern_id(&self) -> Option<&RoutePatternIdentifier> {
        self.route_pattern_id.as_ref()
    }

    fn direction_id(&self) -> DirectionId {
        self.direction_id
    }

    fn headsign(&self) -> &str {
        &self.headsign
    }

    fn stop_ids(&self) -> &[StopIdentifier] {
        &self.stop_ids
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutePatternImpl {
    pub id: RoutePatternIdentifier,
    pub route_id: RouteIdentifier,
    pub direction_id: DirectionId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub typicality: Option<Typicality>,
    pub representative_trip_id: TripIdentifier,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sort_order: i32,
}

impl RoutePattern for RoutePatternImpl {
    fn id(&self) -> &RoutePatternIdentifier {
        &self.id
    }

    fn route_id(&self) -> &RouteIdentifier {
        &self.route_id
    }

    fn direction_id(&self) -> DirectionId {
        self.direction_id
    }

    fn typicality(&self) -> Option<Typicality> {
        self.typicality
    }

    fn representative_trip_id(&self) -> &TripIdentifier {
        &self.representative_trip_id
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteImpl {
    pub id: RouteIdentifier,
    pub route_type: RouteType,
    #[cfg_attr(feature = "serde", serde(default = "empty_str"))]
    pub short_name: Arc<str>,
    #[cfg_attr(feature = "serde", serde(default = "empty_str"))]
    pub long_name: Arc<str>,
    /// Indexed by `DirectionId::index`
    #[cfg_attr(feature = "serde", serde(default))]
    pub direction_names: [Option<Arc<str>>; 2],
    /// Indexed by `DirectionId::index`
    #[cfg_attr(feature = "serde", serde(default))]
    pub direction_destinations: [Option<Arc<str>>; 2],
}

impl Route for RouteImpl {
    fn id(&self) -> &RouteIdentifier {
        &self.id
    }

    fn route_type(&self) -> RouteType {
        self.route_type
    }

    fn short_name(&self) -> &str {
        &self.short_name
    }

    fn long_name(&self) -> &str {
        &self.long_name
    }

    fn direction_name(&self, direction: DirectionId) -> Option<&str> {
        self.direction_names[direction.index()].as_deref()
    }

    fn direction_destination(&self, direction: DirectionId) -> Option<&str> {
        self.direction_destinations[direction.index()].as_deref()
    }
}

#[cfg(feature = "serde")]
fn empty_str() -> Arc<str> {
    "".into()
}

/// Plain-data form of a global snapshot, as exchanged with the host app
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitSnapshot {
    #[cfg_attr(feature = "serde", serde(default))]
    pub stops: Vec<StopImpl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub routes: Vec<RouteImpl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub route_patterns: Vec<RoutePatternImpl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trips: Vec<TripImpl>,
}

// ============================================================================
// Static Provider
// ============================================================================

/// In-memory transit provider over a read-only snapshot
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone, Debug, Default)]
pub struct StaticTransitProvider {
    // Core data
    routes: Vec<Arc<RouteImpl>>,

    // Lookup maps
    stop_map: HashMap<StopIdentifier, Arc<StopImpl>>,
    route_map: HashMap<RouteIdentifier, Arc<RouteImpl>>,
    route_pattern_map: HashMap<RoutePatternIdentifier, Arc<RoutePatternImpl>>,
    trip_map: HashMap<TripIdentifier, Arc<TripImpl>>,

    // Patterns per route and direction, sorted by (sort_order, id)
    patterns_by_route: HashMap<(RouteIdentifier, DirectionId), Vec<Arc<RoutePatternImpl>>>,
}

impl StaticTransitProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Build provider from raw data (used by deserializer)
    pub fn from_data(
        stops: Vec<StopImpl>,
        routes: Vec<RouteImpl>,
        route_patterns: Vec<RoutePatternImpl>,
        trips: Vec<TripImpl>,
    ) -> Self {
        let stops = with_derived_children(stops);
        let routes: Vec<Arc<RouteImpl>> = routes.into_iter().map(Arc::new).collect();

        // Build lookup maps
        let stop_map: HashMap<_, _> = stops
            .into_iter()
            .map(|s| (s.id.clone(), Arc::new(s)))
            .collect();

        let route_map: HashMap<_, _> = routes
            .iter()
            .map(|r| (r.id.clone(), r.clone()))
            .collect();

        let trip_map: HashMap<_, _> = trips
            .into_iter()
            .map(|t| (t.id.clone(), Arc::new(t)))
            .collect();

        let mut patterns_by_route: HashMap<_, Vec<Arc<RoutePatternImpl>>> = HashMap::new();
        let mut route_pattern_map = HashMap::new();
        for pattern in route_patterns.into_iter().map(Arc::new) {
            patterns_by_route
                .entry((pattern.route_id.clone(), pattern.direction_id))
                .or_default()
                .push(pattern.clone());
            route_pattern_map.insert(pattern.id.clone(), pattern);
        }
        for patterns in patterns_by_route.values_mut() {
            patterns.sort_by(|a, b| (a.sort_order, &a.id).cmp(&(b.sort_order, &b.id)));
        }

        Self {
            routes,
            stop_map,
            route_map,
            route_pattern_map,
            trip_map,
            patterns_by_route,
        }
    }
}

impl From<TransitSnapshot> for StaticTransitProvider {
    fn from(snapshot: TransitSnapshot) -> Self {
        Self::from_data(
            snapshot.stops,
            snapshot.routes,
            snapshot.route_patterns,
            snapshot.trips,
        )
    }
}

/// Fill in `child_stop_ids` from parent links the input did not mirror.
fn with_derived_children(mut stops: Vec<StopImpl>) -> Vec<StopImpl> {
    let index: HashMap<StopIdentifier, usize> = stops
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.clone(), i))
        .collect();

    let links: Vec<(usize, StopIdentifier)> = stops
        .iter()
        .filter_map(|s| {
            let parent = s.parent_station_id.as_ref()?;
            Some((*index.get(parent)?, s.id.clone()))
        })
        .collect();

    for (parent, child) in links {
        let children = &mut stops[parent].child_stop_ids;
        if !children.contains(&child) {
            children.push(child);
        }
    }

    stops
}

impl TransitProvider for StaticTransitProvider {
    fn get_stop(&self, id: &StopIdentifier) -> Option<Arc<dyn TransitStop>> {
        self.stop_map.get(id).map(|s| s.clone() as Arc<dyn TransitStop>)
    }

    fn get_route(&self, id: &RouteIdentifier) -> Option<Arc<dyn Route>> {
        self.route_map.get(id).map(|r| r.clone() as Arc<dyn Route>)
    }

    fn get_route_pattern(&self, id: &RoutePatternIdentifier) -> Option<Arc<dyn RoutePattern>> {
        self.route_pattern_map
            .get(id)
            .map(|p| p.clone() as Arc<dyn RoutePattern>)
    }

    fn get_trip(&self, id: &TripIdentifier) -> Option<Arc<dyn Trip>> {
        self.trip_map.get(id).map(|t| t.clone() as Arc<dyn Trip>)
    }

    fn all_routes(&self) -> Vec<Arc<dyn Route>> {
        self.routes
            .iter()
            .map(|r| r.clone() as Arc<dyn Route>)
            .collect()
    }

    fn route_patterns_for(
        &self,
        route: &RouteIdentifier,
        direction: DirectionId,
    ) -> Vec<Arc<dyn RoutePattern>> {
        self.patterns_by_route
            .get(&(route.clone(), direction))
            .map(|patterns| {
                patterns
                    .iter()
                    .map(|p| p.clone() as Arc<dyn RoutePattern>)
                    .collect()
            })
            .unwrap_or_default()
    }
}
