//! Builds small transit snapshots for pipeline tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use branchline_core::transit::{
    DirectionId, RouteIdentifier, RouteImpl, RoutePatternIdentifier, RoutePatternImpl,
    RouteStopsResult, RouteType, StaticTransitProvider, StopIdentifier, StopImpl, TripIdentifier,
    TripImpl, Typicality,
};

#[derive(Default)]
pub struct Fixture {
    stops: Vec<StopImpl>,
    routes: Vec<RouteImpl>,
    route_patterns: Vec<RoutePatternImpl>,
    trips: Vec<TripImpl>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        mut self,
        id: &str,
        route_type: RouteType,
        long_name: &str,
        destinations: [Option<&str>; 2],
    ) -> Self {
        self.routes.push(RouteImpl {
            id: RouteIdentifier::new(id),
            route_type,
            short_name: Arc::from(id),
            long_name: Arc::from(long_name),
            direction_names: [Some(Arc::from("Outbound")), Some(Arc::from("Inbound"))],
            direction_destinations: destinations.map(|destination| destination.map(Arc::from)),
        });
        self
    }

    pub fn bus_route(self, id: &str) -> Self {
        self.route(id, RouteType::Bus, id, [None, None])
    }

    /// A stop whose id is its name.
    pub fn stop(self, name: &str) -> Self {
        self.named_stop(name, name, None)
    }

    pub fn named_stop(mut self, id: &str, name: &str, parent: Option<&str>) -> Self {
        self.stops.push(StopImpl {
            id: StopIdentifier::new(id),
            name: Arc::from(name),
            parent_station_id: parent.map(StopIdentifier::new),
            child_stop_ids: Vec::new(),
        });
        self
    }

    /// A pattern whose representative trip visits `stops`. Stops not added
    /// beforehand are created with their id as name.
    pub fn pattern(
        mut self,
        route: &str,
        direction: DirectionId,
        id: &str,
        typicality: Option<Typicality>,
        stops: &[&str],
    ) -> Self {
        let trip_id = format!("{id}-trip");
        self.trips.push(TripImpl {
            id: TripIdentifier::new(&trip_id),
            route_id: RouteIdentifier::new(route),
            route_pattern_id: Some(RoutePatternIdentifier::new(id)),
            direction_id: direction,
            headsign: Arc::from(stops.last().copied().unwrap_or_default()),
            stop_ids: stops.iter().map(StopIdentifier::new).collect(),
        });
        self.route_patterns.push(RoutePatternImpl {
            id: RoutePatternIdentifier::new(id),
            route_id: RouteIdentifier::new(route),
            direction_id: direction,
            typicality,
            representative_trip_id: TripIdentifier::new(&trip_id),
            sort_order: self.route_patterns.len() as i32,
        });
        self
    }

    pub fn provider(mut self) -> StaticTransitProvider {
        let known: BTreeSet<StopIdentifier> =
            self.stops.iter().map(|stop| stop.id.clone()).collect();
        let missing: BTreeSet<StopIdentifier> = self
            .trips
            .iter()
            .flat_map(|trip| trip.stop_ids.iter())
            .filter(|stop_id| !known.contains(*stop_id))
            .cloned()
            .collect();
        for stop_id in missing {
            self.stops.push(StopImpl {
                name: Arc::from(stop_id.as_str()),
                id: stop_id,
                parent_station_id: None,
                child_stop_ids: Vec::new(),
            });
        }

        StaticTransitProvider::from_data(self.stops, self.routes, self.route_patterns, self.trips)
    }
}

pub fn route_stops(route: &str, direction: DirectionId, stops: &[&str]) -> RouteStopsResult {
    RouteStopsResult::new(route, direction, stops.iter().copied())
}

pub const RED_LINE_TRUNK: &[&str] = &[
    "Alewife",
    "Davis",
    "Porter",
    "Harvard",
    "Central",
    "Kendall/MIT",
    "Charles/MGH",
    "Park Street",
    "Downtown Crossing",
    "South Station",
    "Broadway",
    "Andrew",
    "JFK/UMass",
];
pub const ASHMONT_BRANCH: &[&str] = &["Savin Hill", "Fields Corner", "Shawmut", "Ashmont"];
pub const BRAINTREE_BRANCH: &[&str] = &[
    "North Quincy",
    "Wollaston",
    "Quincy Center",
    "Quincy Adams",
    "Braintree",
];

/// Red Line southbound, with platform-level trips resolving to stations.
pub fn red_line() -> (StaticTransitProvider, RouteStopsResult) {
    let mut fixture = Fixture::new().route(
        "Red",
        RouteType::Subway,
        "Red Line",
        [Some("Ashmont/Braintree"), Some("Alewife")],
    );

    let all_stations = RED_LINE_TRUNK.iter().chain(ASHMONT_BRANCH).chain(BRAINTREE_BRANCH);
    for station in all_stations {
        let platform = format!("{station}-sb");
        fixture = fixture
            .named_stop(station, station, None)
            .named_stop(&platform, station, Some(station));
    }

    let platforms = |stations: &[&[&str]]| -> Vec<String> {
        stations
            .iter()
            .flat_map(|stations| stations.iter())
            .map(|station| format!("{station}-sb"))
            .collect()
    };
    let ashmont = platforms(&[RED_LINE_TRUNK, ASHMONT_BRANCH]);
    let braintree = platforms(&[RED_LINE_TRUNK, BRAINTREE_BRANCH]);
    let ashmont: Vec<&str> = ashmont.iter().map(String::as_str).collect();
    let braintree: Vec<&str> = braintree.iter().map(String::as_str).collect();

    let provider = fixture
        .pattern("Red", DirectionId::Outbound, "Red-1-0", Some(Typicality::Typical), &ashmont)
        .pattern("Red", DirectionId::Outbound, "Red-3-0", Some(Typicality::Typical), &braintree)
        .provider();

    let canonical: Vec<&str> = RED_LINE_TRUNK
        .iter()
        .chain(ASHMONT_BRANCH)
        .chain(BRAINTREE_BRANCH)
        .copied()
        .collect();
    (provider, route_stops("Red", DirectionId::Outbound, &canonical))
}
