//! Directed graphs over ordered vertex ids.
//!
//! [`GraphBuilder`] is the mutable scratchpad used while a graph is being
//! assembled; [`GraphBuilder::build`] consumes it into an immutable [`Graph`].
//! Adjacency is kept in ordered maps so that every traversal, and therefore
//! every derived diagram, is deterministic.

use std::collections::{BTreeMap, BTreeSet};

/// Forward and reverse adjacency, always exact transposes of each other.
///
/// Vertices without edges in a direction have no entry in that map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adjacency<V: Ord> {
    forward: BTreeMap<V, BTreeSet<V>>,
    reverse: BTreeMap<V, BTreeSet<V>>,
}

impl<V: Ord> Default for Adjacency<V> {
    fn default() -> Self {
        Self {
            forward: BTreeMap::new(),
            reverse: BTreeMap::new(),
        }
    }
}

impl<V: Ord + Clone> Adjacency<V> {
    pub fn forward(&self) -> &BTreeMap<V, BTreeSet<V>> {
        &self.forward
    }

    pub fn reverse(&self) -> &BTreeMap<V, BTreeSet<V>> {
        &self.reverse
    }

    fn put_edge(&mut self, from: V, to: V) {
        self.forward
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
        self.reverse.entry(to).or_default().insert(from);
    }

    fn remove_edge(&mut self, from: &V, to: &V) -> bool {
        let removed = remove_from(&mut self.forward, from, to);
        remove_from(&mut self.reverse, to, from);
        removed
    }

    pub fn successors<'a>(&'a self, vertex: &V) -> impl Iterator<Item = &'a V> + use<'a, V> {
        self.forward.get(vertex).into_iter().flatten()
    }

    pub fn predecessors<'a>(&'a self, vertex: &V) -> impl Iterator<Item = &'a V> + use<'a, V> {
        self.reverse.get(vertex).into_iter().flatten()
    }

    pub fn out_degree(&self, vertex: &V) -> usize {
        self.forward.get(vertex).map_or(0, BTreeSet::len)
    }

    pub fn in_degree(&self, vertex: &V) -> usize {
        self.reverse.get(vertex).map_or(0, BTreeSet::len)
    }

    pub fn contains_edge(&self, from: &V, to: &V) -> bool {
        self.forward
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }

    pub fn edges(&self) -> impl Iterator<Item = (&V, &V)> {
        self.forward
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
    }

    pub fn edge_count(&self) -> usize {
        self.forward.values().map(BTreeSet::len).sum()
    }

    /// Vertices with outgoing edges but no incoming edges.
    pub fn sources(&self) -> BTreeSet<V> {
        self.forward
            .keys()
            .filter(|vertex| !self.reverse.contains_key(*vertex))
            .cloned()
            .collect()
    }

    /// Whether any vertex is reachable from itself.
    pub fn contains_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            OnPath,
            Finished,
        }

        let mut marks: BTreeMap<&V, Mark> = BTreeMap::new();

        for root in self.forward.keys() {
            if marks.contains_key(root) {
                continue;
            }

            marks.insert(root, Mark::OnPath);
            let mut stack = vec![(root, self.successors(root))];

            while let Some((vertex, children)) = stack.last_mut() {
                let vertex = *vertex;
                match children.next() {
                    Some(child) => match marks.get(child) {
                        Some(Mark::OnPath) => return true,
                        Some(Mark::Finished) => {}
                        None => {
                            marks.insert(child, Mark::OnPath);
                            stack.push((child, self.successors(child)));
                        }
                    },
                    None => {
                        marks.insert(vertex, Mark::Finished);
                        stack.pop();
                    }
                }
            }
        }

        false
    }

    /// Whether any of `targets` can reach `from` (or is `from`).
    pub fn any_reachable_reverse(&self, from: &V, targets: &BTreeSet<V>) -> bool {
        if targets.contains(from) {
            return true;
        }

        let mut frontier = vec![from];
        let mut seen = BTreeSet::new();

        while let Some(vertex) = frontier.pop() {
            if !seen.insert(vertex) {
                continue;
            }
            for neighbor in self.predecessors(vertex) {
                if targets.contains(neighbor) {
                    return true;
                }
                frontier.push(neighbor);
            }
        }

        false
    }

    /// If we have A->B->C and also A->C, drop A->C so neither A nor C thinks
    /// it has an extra neighbor.
    ///
    /// For every vertex with several successors, the edge to a successor is
    /// dropped when that successor can be reached backwards from one of its
    /// siblings.
    fn drop_skipping_edges(&mut self) -> Vec<(V, V)> {
        let mut skipping = Vec::new();

        for (from, targets) in &self.forward {
            if targets.len() < 2 {
                continue;
            }
            for target in targets {
                let mut siblings = targets.clone();
                siblings.remove(target);
                if self.any_reachable_reverse(target, &siblings) {
                    skipping.push((from.clone(), target.clone()));
                }
            }
        }

        for (from, to) in &skipping {
            self.remove_edge(from, to);
        }

        skipping
    }
}

fn remove_from<V: Ord>(map: &mut BTreeMap<V, BTreeSet<V>>, key: &V, value: &V) -> bool {
    let Some(values) = map.get_mut(key) else {
        return false;
    };
    let removed = values.remove(value);
    if values.is_empty() {
        map.remove(key);
    }
    removed
}

/// An immutable directed graph with a label per vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph<V: Ord, L> {
    vertices: BTreeMap<V, L>,
    adjacency: Adjacency<V>,
}

impl<V: Ord + Clone, L> Graph<V, L> {
    pub fn vertices(&self) -> &BTreeMap<V, L> {
        &self.vertices
    }

    pub fn vertex(&self, id: &V) -> Option<&L> {
        self.vertices.get(id)
    }

    pub fn contains_vertex(&self, id: &V) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn adjacency(&self) -> &Adjacency<V> {
        &self.adjacency
    }

    pub fn neighbors_out<'a>(&'a self, id: &V) -> impl Iterator<Item = &'a V> + use<'a, V, L> {
        self.adjacency.successors(id)
    }

    pub fn neighbors_in<'a>(&'a self, id: &V) -> impl Iterator<Item = &'a V> + use<'a, V, L> {
        self.adjacency.predecessors(id)
    }

    pub fn out_degree(&self, id: &V) -> usize {
        self.adjacency.out_degree(id)
    }

    pub fn in_degree(&self, id: &V) -> usize {
        self.adjacency.in_degree(id)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&V, &V)> {
        self.adjacency.edges()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    pub fn sources(&self) -> BTreeSet<V> {
        self.adjacency.sources()
    }

    pub fn contains_edge(&self, from: &V, to: &V) -> bool {
        self.adjacency.contains_edge(from, to)
    }

    pub fn contains_all_edges<'a>(&self, edges: impl IntoIterator<Item = (&'a V, &'a V)>) -> bool
    where
        V: 'a,
    {
        edges
            .into_iter()
            .all(|(from, to)| self.adjacency.contains_edge(from, to))
    }

    pub fn contains_cycle(&self) -> bool {
        self.adjacency.contains_cycle()
    }
}

/// Construction scratchpad for a [`Graph`].
#[derive(Clone, Debug)]
pub struct GraphBuilder<V: Ord, L> {
    vertices: BTreeMap<V, L>,
    adjacency: Adjacency<V>,
}

impl<V: Ord, L> Default for GraphBuilder<V, L> {
    fn default() -> Self {
        Self {
            vertices: BTreeMap::new(),
            adjacency: Adjacency::default(),
        }
    }
}

impl<V: Ord + Clone, L> GraphBuilder<V, L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_vertex(&mut self, id: V, label: L) {
        self.vertices.insert(id, label);
    }

    pub fn vertex_or_insert_with(&mut self, id: V, label: impl FnOnce() -> L) -> &mut L {
        self.vertices.entry(id).or_insert_with(label)
    }

    pub fn vertex(&self, id: &V) -> Option<&L> {
        self.vertices.get(id)
    }

    pub fn vertex_mut(&mut self, id: &V) -> Option<&mut L> {
        self.vertices.get_mut(id)
    }

    pub fn contains_vertex(&self, id: &V) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = &V> {
        self.vertices.keys()
    }

    pub fn adjacency(&self) -> &Adjacency<V> {
        &self.adjacency
    }

    pub fn put_edge(&mut self, from: V, to: V) {
        self.adjacency.put_edge(from, to);
    }

    /// Returns whether the edge existed.
    pub fn remove_edge(&mut self, from: &V, to: &V) -> bool {
        self.adjacency.remove_edge(from, to)
    }

    pub fn contains_edge(&self, from: &V, to: &V) -> bool {
        self.adjacency.contains_edge(from, to)
    }

    pub fn contains_cycle(&self) -> bool {
        self.adjacency.contains_cycle()
    }

    pub fn any_reachable_reverse(&self, from: &V, targets: &BTreeSet<V>) -> bool {
        self.adjacency.any_reachable_reverse(from, targets)
    }

    /// Removes redundant shortcut edges, returning the edges removed.
    pub fn drop_skipping_edges(&mut self) -> Vec<(V, V)> {
        self.adjacency.drop_skipping_edges()
    }

    pub fn build(self) -> Graph<V, L> {
        Graph {
            vertices: self.vertices,
            adjacency: self.adjacency,
        }
    }
}
