//! Per-route patches for known-bad upstream data.
//!
//! Some routes publish trip patterns or canonical stop orders that cannot be
//! drawn as a branch diagram as-is. Rather than special-casing them inside the
//! algorithm, each fix is a row in a [`CorrectionTable`] keyed by route and
//! direction, so the whole set can be listed and tested on its own.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::route_branching::graph::GraphBuilder;
use crate::route_branching::stop_graph::{DisambiguatedStopId, StopVertex};
use crate::transit::{DirectionId, RouteIdentifier, RouteStopsResult, StopIdentifier};

/// Hooks applied before and during stop graph construction.
pub trait CorrectionRules: Send + Sync {
    /// Fix up the canonical stop order before anything else runs.
    fn rewrite_route_stops(&self, route_stops: RouteStopsResult) -> RouteStopsResult;

    /// Fix up the stop graph after every trip has been added, before the
    /// cycle check.
    fn rewrite_stop_graph(
        &self,
        route_id: &RouteIdentifier,
        direction_id: DirectionId,
        stop_graph: &mut GraphBuilder<DisambiguatedStopId, StopVertex>,
    );
}

pub type Edge = (DisambiguatedStopId, DisambiguatedStopId);

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum StopSequenceRewrite {
    /// Swap in `replacement` if the canonical list starts with `expected`.
    /// Both lists must have the same length.
    ReplacePrefix {
        expected: Vec<StopIdentifier>,
        replacement: Vec<StopIdentifier>,
    },
}

impl StopSequenceRewrite {
    pub fn apply(&self, mut route_stops: RouteStopsResult) -> RouteStopsResult {
        match self {
            StopSequenceRewrite::ReplacePrefix {
                expected,
                replacement,
            } => {
                if route_stops.starts_with(expected) {
                    route_stops
                        .stop_ids
                        .splice(..expected.len(), replacement.iter().cloned());
                    debug!(route = %route_stops.route_id, "Rewrote canonical stop prefix");
                }
                route_stops
            }
        }
    }
}

/// Condition a stop graph must meet before a [`GraphCorrection`] applies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum GraphGuard {
    ContainsAllEdges(Vec<Edge>),
    VerticesExactly(BTreeSet<DisambiguatedStopId>),
}

impl GraphGuard {
    fn matches(&self, stop_graph: &GraphBuilder<DisambiguatedStopId, StopVertex>) -> bool {
        match self {
            GraphGuard::ContainsAllEdges(edges) => edges
                .iter()
                .all(|(from, to)| stop_graph.contains_edge(from, to)),
            GraphGuard::VerticesExactly(vertices) => stop_graph.vertex_ids().eq(vertices.iter()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum GraphEdit {
    PutEdge(DisambiguatedStopId, DisambiguatedStopId),
    RemoveEdge(DisambiguatedStopId, DisambiguatedStopId),
    /// Add `to` as a new vertex carrying the label of `from`.
    CopyVertex {
        from: DisambiguatedStopId,
        to: DisambiguatedStopId,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphCorrection {
    pub guard: GraphGuard,
    pub edits: Vec<GraphEdit>,
}

impl GraphCorrection {
    /// Apply the edits in order if the guard holds. Returns whether it did.
    ///
    /// Nothing is applied if an edit names a vertex the graph does not have
    /// at that point, since an unlabelled endpoint would drop out of the
    /// segment graph.
    pub fn apply(&self, stop_graph: &mut GraphBuilder<DisambiguatedStopId, StopVertex>) -> bool {
        if !self.guard.matches(stop_graph) {
            return false;
        }
        if let Some(unknown) = self.first_unknown_vertex(stop_graph) {
            warn!(vertex = %unknown, "Skipping stop graph correction naming an unknown vertex");
            return false;
        }

        for edit in &self.edits {
            match edit {
                GraphEdit::PutEdge(from, to) => stop_graph.put_edge(from.clone(), to.clone()),
                GraphEdit::RemoveEdge(from, to) => {
                    stop_graph.remove_edge(from, to);
                }
                GraphEdit::CopyVertex { from, to } => {
                    if let Some(label) = stop_graph.vertex(from).cloned() {
                        stop_graph.put_vertex(to.clone(), label);
                    }
                }
            }
        }

        true
    }

    fn first_unknown_vertex<'a>(
        &'a self,
        stop_graph: &GraphBuilder<DisambiguatedStopId, StopVertex>,
    ) -> Option<&'a DisambiguatedStopId> {
        let mut copies: BTreeSet<&DisambiguatedStopId> = BTreeSet::new();
        let known = |id: &DisambiguatedStopId, copies: &BTreeSet<&DisambiguatedStopId>| {
            stop_graph.contains_vertex(id) || copies.contains(id)
        };

        for edit in &self.edits {
            match edit {
                GraphEdit::PutEdge(from, to) => {
                    if let Some(unknown) = [from, to].into_iter().find(|id| !known(*id, &copies)) {
                        return Some(unknown);
                    }
                }
                GraphEdit::RemoveEdge(..) => {}
                GraphEdit::CopyVertex { from, to } => {
                    if !known(from, &copies) {
                        return Some(from);
                    }
                    copies.insert(to);
                }
            }
        }

        None
    }
}

/// Everything known to be wrong with one route and direction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Correction {
    #[cfg_attr(feature = "serde", serde(default))]
    pub stop_sequence: Option<StopSequenceRewrite>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stop_graph: Option<GraphCorrection>,
}

/// One row of a [`CorrectionTable`] in its serialized form.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrectionEntry {
    pub route_id: RouteIdentifier,
    pub direction_id: DirectionId,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub correction: Correction,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<CorrectionEntry>", into = "Vec<CorrectionEntry>")
)]
pub struct CorrectionTable {
    entries: BTreeMap<(RouteIdentifier, DirectionId), Correction>,
}

impl CorrectionTable {
    /// A table that changes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        route_id: impl Into<RouteIdentifier>,
        direction_id: DirectionId,
        correction: Correction,
    ) {
        self.entries.insert((route_id.into(), direction_id), correction);
    }

    pub fn get(
        &self,
        route_id: &RouteIdentifier,
        direction_id: DirectionId,
    ) -> Option<&Correction> {
        self.entries.get(&(route_id.clone(), direction_id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = CorrectionEntry> + '_ {
        self.entries
            .iter()
            .map(|((route_id, direction_id), correction)| CorrectionEntry {
                route_id: route_id.clone(),
                direction_id: *direction_id,
                correction: correction.clone(),
            })
    }

    /// Fixes for routes whose published data does not form a drawable
    /// diagram, as of July 2025.
    pub fn builtin() -> Self {
        use DirectionId::{Inbound, Outbound};

        let mut table = Self::empty();

        // The 64 outbound is A->C->E B->C->E D->E, but the canonical order
        // lists D first, which would make three parallel segments.
        let a = ["730", "2755"];
        let b = ["1060", "72"];
        let c = ["1123"];
        let d = ["2231", "12232", "24486", "24487", "24488", "24489", "2442", "2443"];
        let e = ["2444"];
        table.insert(
            "64",
            Outbound,
            Correction {
                stop_sequence: Some(StopSequenceRewrite::ReplacePrefix {
                    expected: stops([&d[..], &a, &b, &c, &e]),
                    replacement: stops([&a[..], &b, &c, &d, &e]),
                }),
                stop_graph: None,
            },
        );

        // A->C B->C B->D: drop the atypical A->C.
        table.insert(
            "33",
            Outbound,
            graph_fix(
                GraphGuard::ContainsAllEdges(vec![
                    edge("89414", "89413"),
                    edge("8955", "89413"),
                    edge("8955", "8970"),
                ]),
                vec![remove("89414", "89413")],
            ),
        );

        // A->C A->D B->C B->D with canonical order ADBC: drop A->C and B->D.
        table.insert(
            "33",
            Inbound,
            graph_fix(
                GraphGuard::ContainsAllEdges(vec![
                    edge("8335", "6516"),
                    edge("8335", "8337"),
                    edge("6515", "6516"),
                    edge("6515", "8337"),
                ]),
                vec![remove("8335", "6516"), remove("6515", "8337")],
            ),
        );

        // Typical A->B with a deviation B->A.
        table.insert(
            "70",
            Outbound,
            graph_fix(
                GraphGuard::ContainsAllEdges(vec![
                    edge("88333", "883321"),
                    edge("883321", "88333"),
                ]),
                vec![remove("883321", "88333")],
            ),
        );

        // A->B typical, A->C deviation, A->D atypical: connect C->D.
        table.insert(
            "238",
            Outbound,
            graph_fix(
                GraphGuard::ContainsAllEdges(vec![
                    edge("4058", "4252"),
                    edge("4058", "4277"),
                    edge("4058", "4214"),
                ]),
                vec![put("4277", "4214")],
            ),
        );

        // B->C and B->D both reach F: connect D->C.
        table.insert(
            "350",
            Outbound,
            graph_fix(
                GraphGuard::ContainsAllEdges(vec![
                    edge("50940", "49807"),
                    edge("50940", "49805"),
                    edge("1691", "1692"),
                ]),
                vec![put("49805", "49807")],
            ),
        );

        // Hingham/Hull inbound is listed as ACBD: connect C->B.
        table.insert(
            "Boat-F1",
            Inbound,
            graph_fix(
                GraphGuard::ContainsAllEdges(vec![
                    edge("Boat-Hingham", "Boat-George"),
                    edge("Boat-Hingham", "Boat-Rowes"),
                    edge("Boat-Hingham", "Boat-Hull"),
                ]),
                vec![put("Boat-Rowes", "Boat-George")],
            ),
        );

        // Morning trips visit Logan only at the end and afternoon trips only
        // at the start, so the two visits never get told apart.
        table.insert(
            "Boat-F6",
            Inbound,
            split_logan("Boat-Winthrop", "Boat-Aquarium", "Boat-Fan"),
        );
        table.insert(
            "Boat-F7",
            Inbound,
            split_logan("Boat-Quincy", "Boat-Fan", "Boat-Aquarium"),
        );

        table
    }
}

impl CorrectionRules for CorrectionTable {
    fn rewrite_route_stops(&self, route_stops: RouteStopsResult) -> RouteStopsResult {
        match self
            .get(&route_stops.route_id, route_stops.direction_id)
            .and_then(|correction| correction.stop_sequence.as_ref())
        {
            Some(rewrite) => rewrite.apply(route_stops),
            None => route_stops,
        }
    }

    fn rewrite_stop_graph(
        &self,
        route_id: &RouteIdentifier,
        direction_id: DirectionId,
        stop_graph: &mut GraphBuilder<DisambiguatedStopId, StopVertex>,
    ) {
        let Some(correction) = self
            .get(route_id, direction_id)
            .and_then(|correction| correction.stop_graph.as_ref())
        else {
            return;
        };

        if correction.apply(stop_graph) {
            debug!(route = %route_id, direction = %direction_id, "Applied stop graph correction");
        }
    }
}

impl From<Vec<CorrectionEntry>> for CorrectionTable {
    fn from(entries: Vec<CorrectionEntry>) -> Self {
        let mut table = Self::empty();
        for entry in entries {
            table.insert(entry.route_id, entry.direction_id, entry.correction);
        }
        table
    }
}

impl From<CorrectionTable> for Vec<CorrectionEntry> {
    fn from(table: CorrectionTable) -> Self {
        table.entries().collect()
    }
}

fn stops<const N: usize>(groups: [&[&str]; N]) -> Vec<StopIdentifier> {
    groups
        .into_iter()
        .flatten()
        .map(StopIdentifier::new)
        .collect()
}

fn first_visit(stop_id: &str) -> DisambiguatedStopId {
    DisambiguatedStopId::new(stop_id, 0)
}

fn edge(from: &str, to: &str) -> Edge {
    (first_visit(from), first_visit(to))
}

fn put(from: &str, to: &str) -> GraphEdit {
    GraphEdit::PutEdge(first_visit(from), first_visit(to))
}

fn remove(from: &str, to: &str) -> GraphEdit {
    GraphEdit::RemoveEdge(first_visit(from), first_visit(to))
}

fn graph_fix(guard: GraphGuard, edits: Vec<GraphEdit>) -> Correction {
    Correction {
        stop_sequence: None,
        stop_graph: Some(GraphCorrection { guard, edits }),
    }
}

/// Route `terminal -> Logan -> first -> .. -> last -> Logan -> terminal`
/// where only one Logan vertex exists: give the trailing visit its own.
fn split_logan(terminal: &str, first: &str, last: &str) -> Correction {
    let terminal_out = first_visit(terminal);
    let logan = first_visit("Boat-Logan");
    let first = first_visit(first);
    let last = first_visit(last);
    let logan_again = DisambiguatedStopId::new("Boat-Logan", 1);
    let terminal_back = DisambiguatedStopId::new(terminal, 1);

    graph_fix(
        GraphGuard::VerticesExactly(BTreeSet::from([
            terminal_out.clone(),
            logan.clone(),
            first,
            last.clone(),
            terminal_back.clone(),
        ])),
        vec![
            GraphEdit::CopyVertex {
                from: logan.clone(),
                to: logan_again.clone(),
            },
            GraphEdit::PutEdge(last.clone(), logan_again.clone()),
            GraphEdit::RemoveEdge(last, logan.clone()),
            GraphEdit::PutEdge(logan_again, terminal_back.clone()),
            GraphEdit::RemoveEdge(logan.clone(), terminal_back),
            GraphEdit::RemoveEdge(logan, terminal_out),
        ],
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::route_branching::stop_graph::Stop;
    use crate::transit::Typicality;

    fn vertex(stop_id: &str) -> StopVertex {
        StopVertex {
            stop: Stop {
                id: StopIdentifier::new(stop_id),
                name: Arc::from(stop_id),
            },
            typicalities: BTreeSet::from([Typicality::Typical]),
        }
    }

    fn graph(
        edges: &[((&str, usize), (&str, usize))],
    ) -> GraphBuilder<DisambiguatedStopId, StopVertex> {
        let mut graph = GraphBuilder::new();
        for &((from, from_index), (to, to_index)) in edges {
            let from = DisambiguatedStopId::new(from, from_index);
            let to = DisambiguatedStopId::new(to, to_index);
            graph.put_vertex(from.clone(), vertex(from.stop_id.as_str()));
            graph.put_vertex(to.clone(), vertex(to.stop_id.as_str()));
            graph.put_edge(from, to);
        }
        graph
    }

    fn rewrite(
        table: &CorrectionTable,
        route_id: &str,
        direction_id: DirectionId,
        stop_graph: &mut GraphBuilder<DisambiguatedStopId, StopVertex>,
    ) {
        table.rewrite_stop_graph(&RouteIdentifier::new(route_id), direction_id, stop_graph);
    }

    fn has_edge(
        stop_graph: &GraphBuilder<DisambiguatedStopId, StopVertex>,
        from: &str,
        to: &str,
    ) -> bool {
        stop_graph.contains_edge(&first_visit(from), &first_visit(to))
    }

    fn single_route_table(correction: GraphCorrection) -> CorrectionTable {
        let mut table = CorrectionTable::empty();
        table.insert(
            "R",
            DirectionId::Outbound,
            Correction {
                stop_sequence: None,
                stop_graph: Some(correction),
            },
        );
        table
    }

    #[test]
    fn test_empty_table_changes_nothing() {
        let table = CorrectionTable::empty();
        let route_stops = RouteStopsResult::new("64", DirectionId::Outbound, ["2231", "730"]);
        assert_eq!(table.rewrite_route_stops(route_stops.clone()), route_stops);
        assert!(table.is_empty());
    }

    #[test]
    fn test_route_64_prefix_rewrite() {
        let table = CorrectionTable::builtin();
        let bad = [
            "2231", "12232", "24486", "24487", "24488", "24489", "2442", "2443", "730", "2755",
            "1060", "72", "1123", "2444", "99",
        ];
        let rewritten =
            table.rewrite_route_stops(RouteStopsResult::new("64", DirectionId::Outbound, bad));
        let ids: Vec<&str> = rewritten.stop_ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "730", "2755", "1060", "72", "1123", "2231", "12232", "24486", "24487", "24488",
                "24489", "2442", "2443", "2444", "99",
            ]
        );

        // other direction untouched
        let inbound = RouteStopsResult::new("64", DirectionId::Inbound, bad);
        assert_eq!(table.rewrite_route_stops(inbound.clone()), inbound);
    }

    #[test]
    fn test_route_64_rewrite_requires_full_prefix() {
        let table = CorrectionTable::builtin();
        let route_stops =
            RouteStopsResult::new("64", DirectionId::Outbound, ["2231", "12232", "730"]);
        assert_eq!(table.rewrite_route_stops(route_stops.clone()), route_stops);
    }

    #[test]
    fn test_edge_guard() {
        let table = CorrectionTable::builtin();
        let mut stop_graph = graph(&[(("88333", 0), ("883321", 0)), (("883321", 0), ("88333", 0))]);
        assert!(stop_graph.contains_cycle());

        rewrite(&table, "70", DirectionId::Outbound, &mut stop_graph);
        assert!(!stop_graph.contains_cycle());
        assert!(stop_graph.contains_edge(
            &DisambiguatedStopId::new("88333", 0),
            &DisambiguatedStopId::new("883321", 0)
        ));
    }

    #[test]
    fn test_edge_guard_not_met() {
        let table = CorrectionTable::builtin();
        let mut stop_graph = graph(&[(("4058", 0), ("4252", 0)), (("4058", 0), ("4277", 0))]);
        rewrite(&table, "238", DirectionId::Outbound, &mut stop_graph);
        assert!(!stop_graph.contains_edge(
            &DisambiguatedStopId::new("4277", 0),
            &DisambiguatedStopId::new("4214", 0)
        ));
    }

    #[test]
    fn test_logan_split() {
        let table = CorrectionTable::builtin();
        // morning: Winthrop -> Aquarium -> Fan -> Logan -> Winthrop
        // afternoon: Winthrop -> Logan -> Aquarium -> Fan -> Winthrop
        let mut stop_graph = graph(&[
            (("Boat-Winthrop", 0), ("Boat-Aquarium", 0)),
            (("Boat-Aquarium", 0), ("Boat-Fan", 0)),
            (("Boat-Fan", 0), ("Boat-Logan", 0)),
            (("Boat-Logan", 0), ("Boat-Winthrop", 1)),
            (("Boat-Winthrop", 0), ("Boat-Logan", 0)),
            (("Boat-Logan", 0), ("Boat-Aquarium", 0)),
            (("Boat-Fan", 0), ("Boat-Winthrop", 1)),
        ]);

        rewrite(&table, "Boat-F6", DirectionId::Inbound, &mut stop_graph);

        let logan = DisambiguatedStopId::new("Boat-Logan", 0);
        let logan_again = DisambiguatedStopId::new("Boat-Logan", 1);
        let fan = DisambiguatedStopId::new("Boat-Fan", 0);
        let winthrop_back = DisambiguatedStopId::new("Boat-Winthrop", 1);

        assert_eq!(
            stop_graph.vertex(&logan_again).map(|v| v.stop.id.as_str()),
            Some("Boat-Logan")
        );
        assert!(stop_graph.contains_edge(&fan, &logan_again));
        assert!(stop_graph.contains_edge(&logan_again, &winthrop_back));
        assert!(!stop_graph.contains_edge(&fan, &logan));
        assert!(!stop_graph.contains_edge(&logan, &winthrop_back));
        assert!(!stop_graph.contains_cycle());
    }

    #[test]
    fn test_route_33_outbound_drops_atypical_edge() {
        let table = CorrectionTable::builtin();
        let mut stop_graph = graph(&[
            (("89414", 0), ("89413", 0)),
            (("8955", 0), ("89413", 0)),
            (("8955", 0), ("8970", 0)),
        ]);

        rewrite(&table, "33", DirectionId::Outbound, &mut stop_graph);

        assert!(!has_edge(&stop_graph, "89414", "89413"));
        assert!(has_edge(&stop_graph, "8955", "89413"));
        assert!(has_edge(&stop_graph, "8955", "8970"));
    }

    #[test]
    fn test_route_33_inbound_drops_crossing_edges() {
        let table = CorrectionTable::builtin();
        let mut stop_graph = graph(&[
            (("8335", 0), ("6516", 0)),
            (("8335", 0), ("8337", 0)),
            (("6515", 0), ("6516", 0)),
            (("6515", 0), ("8337", 0)),
        ]);

        rewrite(&table, "33", DirectionId::Inbound, &mut stop_graph);

        assert!(!has_edge(&stop_graph, "8335", "6516"));
        assert!(!has_edge(&stop_graph, "6515", "8337"));
        assert!(has_edge(&stop_graph, "8335", "8337"));
        assert!(has_edge(&stop_graph, "6515", "6516"));
    }

    #[test]
    fn test_route_350_outbound_connects_branches() {
        let table = CorrectionTable::builtin();
        let mut stop_graph = graph(&[
            (("50940", 0), ("49807", 0)),
            (("50940", 0), ("49805", 0)),
            (("1691", 0), ("1692", 0)),
        ]);

        rewrite(&table, "350", DirectionId::Outbound, &mut stop_graph);

        assert!(has_edge(&stop_graph, "49805", "49807"));
        assert!(has_edge(&stop_graph, "50940", "49805"));
        assert!(has_edge(&stop_graph, "50940", "49807"));
    }

    #[test]
    fn test_hingham_hull_inbound_connects_rowes_to_george() {
        let table = CorrectionTable::builtin();
        let mut stop_graph = graph(&[
            (("Boat-Hingham", 0), ("Boat-George", 0)),
            (("Boat-Hingham", 0), ("Boat-Rowes", 0)),
            (("Boat-Hingham", 0), ("Boat-Hull", 0)),
        ]);

        rewrite(&table, "Boat-F1", DirectionId::Inbound, &mut stop_graph);

        assert!(has_edge(&stop_graph, "Boat-Rowes", "Boat-George"));
        assert!(has_edge(&stop_graph, "Boat-Hingham", "Boat-George"));
        assert!(!stop_graph.contains_cycle());
    }

    #[test]
    fn test_quincy_logan_split() {
        let table = CorrectionTable::builtin();
        // morning: Quincy -> Fan -> Aquarium -> Logan -> Quincy
        // afternoon: Quincy -> Logan -> Fan -> Aquarium -> Quincy
        let mut stop_graph = graph(&[
            (("Boat-Quincy", 0), ("Boat-Fan", 0)),
            (("Boat-Fan", 0), ("Boat-Aquarium", 0)),
            (("Boat-Aquarium", 0), ("Boat-Logan", 0)),
            (("Boat-Logan", 0), ("Boat-Quincy", 1)),
            (("Boat-Quincy", 0), ("Boat-Logan", 0)),
            (("Boat-Logan", 0), ("Boat-Fan", 0)),
            (("Boat-Aquarium", 0), ("Boat-Quincy", 1)),
        ]);
        assert!(stop_graph.contains_cycle());

        rewrite(&table, "Boat-F7", DirectionId::Inbound, &mut stop_graph);

        let logan = DisambiguatedStopId::new("Boat-Logan", 0);
        let logan_again = DisambiguatedStopId::new("Boat-Logan", 1);
        let aquarium = DisambiguatedStopId::new("Boat-Aquarium", 0);
        let quincy = DisambiguatedStopId::new("Boat-Quincy", 0);
        let quincy_back = DisambiguatedStopId::new("Boat-Quincy", 1);

        assert!(stop_graph.contains_edge(&aquarium, &logan_again));
        assert!(stop_graph.contains_edge(&logan_again, &quincy_back));
        assert!(stop_graph.contains_edge(&quincy, &logan));
        assert!(!stop_graph.contains_edge(&aquarium, &logan));
        assert!(!stop_graph.contains_edge(&logan, &quincy_back));
        assert!(!stop_graph.contains_cycle());
    }

    #[test]
    fn test_edit_naming_unknown_vertex_changes_nothing() {
        let correction = GraphCorrection {
            guard: GraphGuard::ContainsAllEdges(vec![edge("a", "b")]),
            edits: vec![remove("b", "c"), put("b", "ghost")],
        };
        let mut stop_graph = graph(&[(("a", 0), ("b", 0)), (("b", 0), ("c", 0))]);

        assert!(!correction.apply(&mut stop_graph));
        assert!(has_edge(&stop_graph, "b", "c"));
        assert!(!has_edge(&stop_graph, "b", "ghost"));
        assert!(!stop_graph.contains_vertex(&first_visit("ghost")));

        // same through the table
        let table = single_route_table(correction);
        rewrite(&table, "R", DirectionId::Outbound, &mut stop_graph);
        assert!(has_edge(&stop_graph, "b", "c"));
        assert_eq!(stop_graph.vertex_ids().count(), 3);
    }

    #[test]
    fn test_copy_of_unknown_vertex_changes_nothing() {
        let correction = GraphCorrection {
            guard: GraphGuard::ContainsAllEdges(vec![edge("a", "b")]),
            edits: vec![GraphEdit::CopyVertex {
                from: first_visit("ghost"),
                to: DisambiguatedStopId::new("ghost", 1),
            }],
        };
        let mut stop_graph = graph(&[(("a", 0), ("b", 0))]);

        assert!(!correction.apply(&mut stop_graph));
        assert_eq!(stop_graph.vertex_ids().count(), 2);
    }

    #[test]
    fn test_edit_may_use_earlier_copy() {
        let b_again = DisambiguatedStopId::new("b", 1);
        let correction = GraphCorrection {
            guard: GraphGuard::ContainsAllEdges(vec![edge("a", "b")]),
            edits: vec![
                GraphEdit::CopyVertex {
                    from: first_visit("b"),
                    to: b_again.clone(),
                },
                GraphEdit::PutEdge(first_visit("c"), b_again.clone()),
            ],
        };
        let mut stop_graph = graph(&[(("a", 0), ("b", 0)), (("b", 0), ("c", 0))]);

        assert!(correction.apply(&mut stop_graph));
        assert!(stop_graph.contains_edge(&first_visit("c"), &b_again));
        assert_eq!(
            stop_graph.vertex(&b_again).map(|v| v.stop.id.as_str()),
            Some("b")
        );
    }

    #[test]
    fn test_builtin_entries() {
        let table = CorrectionTable::builtin();
        assert_eq!(table.len(), 9);
        assert!(table.get(&RouteIdentifier::new("33"), DirectionId::Inbound).is_some());
        assert!(table.get(&RouteIdentifier::new("Red"), DirectionId::Outbound).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_table_json_round_trip() {
        let table = CorrectionTable::builtin();
        let json = serde_json::to_string(&table).unwrap();
        let parsed: CorrectionTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_table_from_json() {
        let json = r#"[
            {
                "route_id": "70",
                "direction_id": 0,
                "stop_graph": {
                    "guard": {"contains_all_edges": [[
                        {"stop_id": "b", "index": 0},
                        {"stop_id": "a", "index": 0}
                    ]]},
                    "edits": [{"remove_edge": [
                        {"stop_id": "b", "index": 0},
                        {"stop_id": "a", "index": 0}
                    ]}]
                }
            }
        ]"#;
        let table: CorrectionTable = serde_json::from_str(json).unwrap();
        let mut stop_graph = graph(&[(("a", 0), ("b", 0)), (("b", 0), ("a", 0))]);
        rewrite(&table, "70", DirectionId::Outbound, &mut stop_graph);
        assert!(!stop_graph.contains_cycle());
    }
}
