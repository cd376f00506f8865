use anyhow::{bail, Result};
use branchline_core::route_branching::render::graph_stats;
use branchline_core::route_branching::{BranchNames, CorrectionTable, RouteBranching};
use branchline_transit::{
    DirectionId, RouteIdentifier, RouteStopsResult, StaticTransitProvider, TransitProvider,
};
use clap::Parser;
use itertools::Itertools;
use std::path::{Path, PathBuf};

mod canonical;
mod input;
mod output;

use canonical::{infer_canonical_order, representative_stop_lists};
use input::{load_corrections, load_gtfs, load_route_stops, load_snapshot, RouteStopsMap};

#[derive(Parser, Debug)]
#[command(
    name = "branching-visualizer",
    author,
    version,
    about = "Render route branch diagrams and their graphs for inspection",
    long_about = "Runs the route branching pipeline for every requested route and direction \
                  and writes GraphViz files for the stop and segment graphs alongside a text \
                  rendering of the diagram.\n\n\
                  Canonical stop orders come from --route-stops when given; otherwise they \
                  are inferred from the representative trips of each route pattern."
)]
struct Args {
    /// JSON snapshot of global data
    #[arg(long, conflicts_with = "gtfs", required_unless_present = "gtfs")]
    snapshot: Option<PathBuf>,

    /// GTFS feed (zip or directory) to compile instead of a snapshot
    #[arg(long)]
    gtfs: Option<PathBuf>,

    /// Route to render; repeat for several (default: all routes)
    #[arg(long = "route")]
    routes: Vec<String>,

    /// Only render this direction
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    direction: Option<u8>,

    /// JSON array of canonical stop lists
    #[arg(long)]
    route_stops: Option<PathBuf>,

    /// JSON correction table (default: built-in corrections)
    #[arg(long)]
    corrections: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "route-branching")]
    output: PathBuf,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

enum Outcome {
    Written,
    Skipped,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let provider = match (&args.snapshot, &args.gtfs) {
        (Some(path), _) => load_snapshot(path)?,
        (None, Some(path)) => load_gtfs(path)?,
        (None, None) => bail!("Either --snapshot or --gtfs is required"),
    };
    let known_route_stops = match &args.route_stops {
        Some(path) => load_route_stops(path)?,
        None => RouteStopsMap::new(),
    };
    let corrections = load_corrections(args.corrections.as_deref())?;

    let route_ids: Vec<RouteIdentifier> = if args.routes.is_empty() {
        provider
            .all_routes()
            .iter()
            .map(|route| route.id().clone())
            .sorted()
            .collect()
    } else {
        args.routes.iter().map(RouteIdentifier::new).collect()
    };
    let directions = match args.direction {
        Some(direction) => vec![DirectionId::try_from(direction)?],
        None => vec![DirectionId::Outbound, DirectionId::Inbound],
    };

    log::info!(
        "Rendering {} routes into {}",
        route_ids.len(),
        args.output.display()
    );

    let (mut written, mut skipped, mut failed) = (0usize, 0usize, 0usize);
    for route_id in &route_ids {
        for &direction in &directions {
            let route_stops = known_route_stops
                .get(&(route_id.clone(), direction))
                .cloned()
                .unwrap_or_else(|| inferred_route_stops(&provider, route_id, direction));

            match visualize(&provider, &corrections, &route_stops, &args.output) {
                Ok(Outcome::Written) => written += 1,
                Ok(Outcome::Skipped) => skipped += 1,
                Err(error) => {
                    log::error!("{route_id} direction {direction}: {error:#}");
                    failed += 1;
                }
            }
        }
    }

    log::info!("Written: {written}, skipped: {skipped}, failed: {failed}");

    if failed > 0 {
        bail!(
            "{failed} of {} route directions failed",
            written + skipped + failed
        );
    }

    Ok(())
}

fn inferred_route_stops(
    provider: &StaticTransitProvider,
    route_id: &RouteIdentifier,
    direction: DirectionId,
) -> RouteStopsResult {
    let stop_lists = representative_stop_lists(provider, route_id, direction);
    RouteStopsResult::new(
        route_id.clone(),
        direction,
        infer_canonical_order(&stop_lists),
    )
}

fn visualize(
    provider: &StaticTransitProvider,
    corrections: &CorrectionTable,
    route_stops: &RouteStopsResult,
    output: &Path,
) -> Result<Outcome> {
    let route_id = &route_stops.route_id;
    let direction = route_stops.direction_id;

    let partial = RouteBranching::calculate_partial(route_stops, provider, corrections);
    let branching = &partial.branching;

    if let Some(stop_graph) = &branching.stop_graph {
        log::debug!("{route_id}/{direction} stop graph: {}", graph_stats(stop_graph));
    }
    if let Some(segment_graph) = &branching.segment_graph {
        log::debug!(
            "{route_id}/{direction} segment graph: {}",
            graph_stats(segment_graph)
        );
    }

    if partial.error.is_none() && output::is_trivial(branching) {
        log::debug!("{route_id}/{direction}: nothing to draw");
        return Ok(Outcome::Skipped);
    }

    if branching.stop_graph.is_some() {
        let route = provider.get_route(route_id);
        let names = route
            .as_deref()
            .map(|route| BranchNames::for_route(route, direction))
            .unwrap_or_default();
        output::write_branching(
            &output::route_directory(output, route_id, direction),
            &output::caption(route.as_deref(), route_id, direction),
            branching,
            &names,
        )?;
    }

    match partial.error {
        Some(error) => Err(error.into()),
        None => Ok(Outcome::Written),
    }
}
