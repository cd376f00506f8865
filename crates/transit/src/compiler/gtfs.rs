//! GTFS feed to snapshot compiler.

use std::sync::Arc;

use gtfs_structures::{DirectionType, Gtfs};

use crate::compiler::patterns::derive_route_patterns;
use crate::identifiers::*;
use crate::models::types::*;
use crate::provider::{RouteImpl, StopImpl, TransitSnapshot, TripImpl};

/// Load a GTFS feed (zip or directory) into a snapshot.
pub fn compile_gtfs(path: &str) -> Result<TransitSnapshot> {
    let gtfs = Gtfs::new(path).map_err(|e| TransitError::SerializationError(e.to_string()))?;
    Ok(snapshot_from_gtfs(&gtfs))
}

/// Convert parsed GTFS data.
///
/// Routes whose type has no counterpart in [`RouteType`] are skipped along
/// with their trips. Trips without a direction are treated as outbound.
pub fn snapshot_from_gtfs(gtfs: &Gtfs) -> TransitSnapshot {
    let stops = gtfs
        .stops
        .values()
        .map(|stop| StopImpl {
            id: StopIdentifier::new(&stop.id),
            name: Option::<String>::from(stop.name.clone())
                .unwrap_or_default()
                .into(),
            parent_station_id: stop.parent_station.as_deref().map(StopIdentifier::new),
            child_stop_ids: Vec::new(),
        })
        .collect();

    let routes: Vec<RouteImpl> = gtfs
        .routes
        .values()
        .filter_map(|route| {
            Some(RouteImpl {
                id: RouteIdentifier::new(&route.id),
                route_type: route_type_from_gtfs(&route.route_type)?,
                short_name: Option::<String>::from(route.short_name.clone())
                    .unwrap_or_default()
                    .into(),
                long_name: Option::<String>::from(route.long_name.clone())
                    .unwrap_or_default()
                    .into(),
                direction_names: [None, None],
                direction_destinations: [None, None],
            })
        })
        .collect();

    let mut trips: Vec<TripImpl> = gtfs
        .trips
        .values()
        .filter(|trip| routes.iter().any(|route| route.id.as_str() == trip.route_id))
        .map(|trip| {
            let mut stop_times: Vec<_> = trip.stop_times.iter().collect();
            stop_times.sort_by_key(|st| st.stop_sequence);

            TripImpl {
                id: TripIdentifier::new(&trip.id),
                route_id: RouteIdentifier::new(&trip.route_id),
                route_pattern_id: None,
                direction_id: match trip.direction_id {
                    Some(DirectionType::Inbound) => DirectionId::Inbound,
                    _ => DirectionId::Outbound,
                },
                headsign: Arc::from(trip.trip_headsign.clone().unwrap_or_default()),
                stop_ids: stop_times
                    .iter()
                    .map(|st| StopIdentifier::new(&st.stop.id))
                    .collect(),
            }
        })
        .collect();

    let route_patterns = derive_route_patterns(&mut trips);

    TransitSnapshot {
        stops,
        routes,
        route_patterns,
        trips,
    }
}

fn route_type_from_gtfs(route_type: &gtfs_structures::RouteType) -> Option<RouteType> {
    use gtfs_structures::RouteType as GtfsRouteType;

    match route_type {
        GtfsRouteType::Tramway => Some(RouteType::Tram),
        GtfsRouteType::Subway => Some(RouteType::Subway),
        GtfsRouteType::Rail => Some(RouteType::Rail),
        GtfsRouteType::Bus => Some(RouteType::Bus),
        GtfsRouteType::Ferry => Some(RouteType::Ferry),
        GtfsRouteType::CableCar => Some(RouteType::CableTram),
        GtfsRouteType::Gondola => Some(RouteType::AerialLift),
        GtfsRouteType::Funicular => Some(RouteType::Funicular),
        _ => None,
    }
}
