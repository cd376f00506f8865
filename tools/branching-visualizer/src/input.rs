use anyhow::{Context, Result};
use branchline_core::route_branching::CorrectionTable;
use branchline_transit::{
    DirectionId, RouteIdentifier, RouteStopsResult, StaticTransitProvider, TransitSnapshot,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load a JSON snapshot as written by the host app
pub fn load_snapshot(path: &Path) -> Result<StaticTransitProvider> {
    let snapshot: TransitSnapshot = read_json(path)?;
    log::info!(
        "Loaded snapshot: {} stops, {} routes, {} patterns, {} trips",
        snapshot.stops.len(),
        snapshot.routes.len(),
        snapshot.route_patterns.len(),
        snapshot.trips.len()
    );
    Ok(snapshot.into())
}

/// Compile a GTFS feed (zip or directory)
pub fn load_gtfs(path: &Path) -> Result<StaticTransitProvider> {
    let snapshot = branchline_transit::compiler::compile_gtfs(&path.to_string_lossy())
        .with_context(|| format!("Failed to compile GTFS feed {}", path.display()))?;
    log::info!(
        "Compiled GTFS: {} stops, {} routes, {} patterns",
        snapshot.stops.len(),
        snapshot.routes.len(),
        snapshot.route_patterns.len()
    );
    Ok(snapshot.into())
}

pub type RouteStopsMap = HashMap<(RouteIdentifier, DirectionId), RouteStopsResult>;

/// Canonical stop lists keyed by route and direction
pub fn load_route_stops(path: &Path) -> Result<RouteStopsMap> {
    let route_stops: Vec<RouteStopsResult> = read_json(path)?;
    Ok(route_stops
        .into_iter()
        .map(|route_stops| {
            (
                (route_stops.route_id.clone(), route_stops.direction_id),
                route_stops,
            )
        })
        .collect())
}

pub fn load_corrections(path: Option<&Path>) -> Result<CorrectionTable> {
    match path {
        Some(path) => {
            let table: CorrectionTable = read_json(path)?;
            log::info!("Loaded {} corrections from {}", table.len(), path.display());
            Ok(table)
        }
        None => Ok(CorrectionTable::builtin()),
    }
}
