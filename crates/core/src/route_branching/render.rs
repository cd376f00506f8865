//! Plain-text and GraphViz renderings for inspecting a branching by eye.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use crate::route_branching::graph::Graph;
use crate::route_branching::names::BranchNames;
use crate::route_branching::segment_graph::SegmentGraph;
use crate::route_branching::sides::{BranchSegment, StickSideState};
use crate::route_branching::stop_graph::{DisambiguatedStopId, StopGraph};
use crate::transit::Typicality;

const ELIDE_STOP_NAMES_OVER: usize = 50;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W").expect("valid identifier regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Weight {
    None,
    Light,
    Heavy,
}

impl Weight {
    fn heavy_if(condition: bool) -> Self {
        if condition { Weight::Heavy } else { Weight::None }
    }

    fn light_if(condition: bool) -> Self {
        if condition { Weight::Light } else { Weight::None }
    }
}

/// One box-drawing cell, described by its four arms. Vertical arms are
/// always light.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BoxDrawing {
    left: Weight,
    right: Weight,
    up: bool,
    down: bool,
}

impl BoxDrawing {
    fn left_stick(state: &StickSideState) -> Self {
        BoxDrawing {
            left: Weight::heavy_if(state.current_stop),
            right: Weight::light_if(state.current_cross),
            up: state.before,
            down: state.after,
        }
    }

    fn right_stick(state: &StickSideState) -> Self {
        BoxDrawing {
            left: Weight::light_if(state.current_cross),
            right: Weight::heavy_if(state.current_stop),
            up: state.before,
            down: state.after,
        }
    }

    fn glyph(self) -> char {
        use Weight::{Heavy as H, Light as L, None as N};

        match (self.left, self.right, self.up, self.down) {
            (N, N, false, false) => ' ',
            (N, N, false, true) => '╷',
            (N, N, true, false) => '╵',
            (N, N, true, true) => '│',
            (N, L, false, false) => '╶',
            (N, L, false, true) => '┌',
            (N, L, true, false) => '└',
            (N, L, true, true) => '├',
            (N, H, false, false) => '╺',
            (N, H, false, true) => '┍',
            (N, H, true, false) => '┕',
            (N, H, true, true) => '┝',
            (L, N, false, false) => '╴',
            (L, N, false, true) => '┐',
            (L, N, true, false) => '┘',
            (L, N, true, true) => '┤',
            (L, L, false, false) => '─',
            (L, L, false, true) => '┬',
            (L, L, true, false) => '┴',
            (L, L, true, true) => '┼',
            (L, H, false, false) => '╼',
            (L, H, false, true) => '┮',
            (L, H, true, false) => '┶',
            (L, H, true, true) => '┾',
            (H, N, false, false) => '╸',
            (H, N, false, true) => '┑',
            (H, N, true, false) => '┙',
            (H, N, true, true) => '┥',
            (H, L, false, false) => '╾',
            (H, L, false, true) => '┭',
            (H, L, true, false) => '┵',
            (H, L, true, true) => '┽',
            (H, H, false, false) => '━',
            (H, H, false, true) => '┯',
            (H, H, true, false) => '┷',
            (H, H, true, true) => '┿',
        }
    }
}

/// One line per stop: a `®` for non-typical segments, the left and right
/// sticks, then the stop name.
pub fn render_text(segments: &[BranchSegment]) -> Vec<String> {
    segments
        .iter()
        .flat_map(|segment| {
            let marker = if segment.is_typical { ' ' } else { '®' };
            segment.stops.iter().map(move |stop| {
                let state = &stop.stick_state;
                format!(
                    "{marker} {}{} {}",
                    BoxDrawing::left_stick(&state.left).glyph(),
                    BoxDrawing::right_stick(&state.right).glyph(),
                    stop.stop.name
                )
            })
        })
        .collect()
}

pub fn stop_graph_dot(stop_graph: &StopGraph) -> String {
    to_dot(stop_graph, |id, vertex| {
        let mut label = format!("{} ({})", vertex.stop.name, vertex.stop.id);
        if id.index > 0 {
            let _ = write!(label, " (index={})", id.index);
        }
        push_typicality(&mut label, &vertex.typicalities);
        label
    })
}

/// Segments are labelled with the first of `names` they match.
pub fn segment_graph_dot(segment_graph: &SegmentGraph, names: &BranchNames) -> String {
    to_dot(segment_graph, |_, segment| {
        let stops: Vec<&str> = segment.stops.iter().map(|stop| stop.name.as_ref()).collect();
        let total_length: usize = stops.iter().map(|name| name.chars().count()).sum();
        let stop_names = match stops.as_slice() {
            [first, .., last] if total_length > ELIDE_STOP_NAMES_OVER => {
                format!("{first}, ...{} stops..., {last}", stops.len() - 2)
            }
            _ => stops.join(", "),
        };

        let mut label = match segment.name(names) {
            Some(name) => format!("{name} branch ({stop_names})"),
            None => stop_names,
        };
        push_typicality(&mut label, &segment.typicalities);
        label
    })
}

fn push_typicality(label: &mut String, typicalities: &BTreeSet<Typicality>) {
    if let Some(most_typical) = typicalities.first() {
        let _ = write!(label, " [{most_typical}]");
    }
}

fn dot_id(id: &DisambiguatedStopId) -> String {
    NON_WORD
        .replace_all(&format!("s{}-i{}", id.stop_id, id.index), "_")
        .into_owned()
}

fn to_dot<L>(
    graph: &Graph<DisambiguatedStopId, L>,
    label: impl Fn(&DisambiguatedStopId, &L) -> String,
) -> String {
    let mut dot = String::from("digraph G {\n");
    for (id, vertex) in graph.vertices() {
        let text = label(id, vertex).replace('"', "\\\"");
        let _ = writeln!(dot, "{} [label=\"{text}\"];", dot_id(id));
    }
    for (from, to) in graph.edges() {
        let _ = writeln!(dot, "{} -> {};", dot_id(from), dot_id(to));
    }
    dot.push_str("}\n");
    dot
}

/// One-line summary of a graph's size, for logs.
pub fn graph_stats<L>(graph: &Graph<DisambiguatedStopId, L>) -> String {
    format!(
        "V={} E={} sources=[{}]",
        graph.vertex_count(),
        graph.edge_count(),
        graph.sources().iter().join(", ")
    )
}
