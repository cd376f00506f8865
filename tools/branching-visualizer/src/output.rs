use anyhow::{Context, Result};
use branchline_core::route_branching::render::{render_text, segment_graph_dot, stop_graph_dot};
use branchline_core::route_branching::{BranchNames, RouteBranching};
use branchline_transit::{DirectionId, Route, RouteIdentifier};
use std::fs;
use std::path::{Path, PathBuf};

/// `<output>/<route>/<direction>`, with path separators in the route id
/// replaced
pub fn route_directory(
    output: &Path,
    route_id: &RouteIdentifier,
    direction: DirectionId,
) -> PathBuf {
    output
        .join(route_id.as_str().replace(['/', '\\'], "_"))
        .join(direction.to_string())
}

/// First line of `out.txt`, e.g. `Red Line (Red) direction 0 to Ashmont/Braintree`
pub fn caption(
    route: Option<&dyn Route>,
    route_id: &RouteIdentifier,
    direction: DirectionId,
) -> String {
    let Some(route) = route else {
        return format!("{route_id} direction {direction}");
    };

    let name = [route.long_name(), route.short_name()]
        .into_iter()
        .find(|name| !name.is_empty())
        .unwrap_or(route_id.as_str());
    let mut caption = format!("{name} ({route_id}) direction {direction}");
    if let Some(destination) = route.direction_destination(direction) {
        caption.push_str(" to ");
        caption.push_str(destination);
    }
    caption
}

/// Nothing worth drawing: no stops at all, or a single segment.
pub fn is_trivial(branching: &RouteBranching) -> bool {
    let no_stops = branching
        .stop_graph
        .as_ref()
        .map_or(true, |graph| graph.vertex_count() == 0);
    let one_segment = branching
        .segment_graph
        .as_ref()
        .is_some_and(|graph| graph.vertex_count() <= 1);
    no_stops || one_segment
}

/// Write whichever of `stopGraph.dot`, `segmentGraph.dot` and `out.txt` the
/// branching has data for
pub fn write_branching(
    dir: &Path,
    caption: &str,
    branching: &RouteBranching,
    names: &BranchNames,
) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    if let Some(stop_graph) = &branching.stop_graph {
        write_file(&dir.join("stopGraph.dot"), &stop_graph_dot(stop_graph))?;
    }
    if let Some(segment_graph) = &branching.segment_graph {
        write_file(
            &dir.join("segmentGraph.dot"),
            &segment_graph_dot(segment_graph, names),
        )?;
    }
    if let Some(segments) = &branching.segments {
        let mut text = format!("{caption}\n");
        for line in render_text(segments) {
            text.push_str(&line);
            text.push('\n');
        }
        write_file(&dir.join("out.txt"), &text)?;
    }

    log::debug!("Wrote {}", dir.display());
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
