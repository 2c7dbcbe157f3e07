//! The metric-graph store: vertex and edge storage, queries, and the
//! single mutation entry point.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use crate::consumer::{ConsumerRegistry, GraphConsumer};
use crate::resolve::{self, Relation, Resolution};
use crate::{Error, Result, gexf, rweg};

/// One stored edge, recorded under its owning endpoint.
///
/// Directed edges live under their out-vertex. Undirected edges live under
/// whichever endpoint the merge left them on; every edge is stored exactly
/// once, so iterating all vertices' records enumerates each edge once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EdgeRecord {
    pub(crate) neighbor: u32,
    pub(crate) length: f64,
    pub(crate) directed: bool,
}

/// A weighted graph with mixed directed and undirected edges.
///
/// Every edge carries a strictly positive finite length. If both directions
/// between a pair are ever declared, the pair collapses into a single
/// undirected edge with one length; the store never holds two independent
/// directed edges over the same pair. Vertices exist exactly when some edge
/// references them.
///
/// The design is single-threaded and synchronous: every mutation resolves
/// through the merge table, applies, and notifies registered consumers
/// before returning.
#[derive(Debug, Default)]
pub struct MetricGraph {
    adjacency: BTreeMap<u32, Vec<EdgeRecord>>,
    consumers: ConsumerRegistry,
}

impl MetricGraph {
    /// Constructs an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or updates the relationship between `out_vertex` and `in_vertex`.
    ///
    /// Missing vertices are created. When both vertices already exist, the
    /// desired edge merges with the current relationship: a directed request
    /// against the opposite direction, or an undirected request against any
    /// directed edge, folds the pair into one undirected edge; an existing
    /// undirected edge only ever has its length updated. All registered
    /// consumers are invalidated on every successful call, length-only
    /// updates included.
    ///
    /// Fails with [`Error::InvalidLength`] when `length` is not a positive
    /// finite number; the graph is left untouched in that case.
    pub fn update_edge(
        &mut self,
        out_vertex: u32,
        in_vertex: u32,
        length: f64,
        directed: bool,
    ) -> Result<()> {
        if !(length > 0.0) || !length.is_finite() {
            return Err(Error::InvalidLength { length });
        }

        match resolve::resolve(self.relation(out_vertex, in_vertex), directed) {
            Resolution::Insert { directed } => {
                self.adjacency.entry(in_vertex).or_default();
                self.adjacency.entry(out_vertex).or_default().push(EdgeRecord {
                    neighbor: in_vertex,
                    length,
                    directed,
                });
            }
            Resolution::UpdateLength => self.rewrite_stored(out_vertex, in_vertex, length, false),
            Resolution::MakeUndirected => self.rewrite_stored(out_vertex, in_vertex, length, true),
        }

        self.consumers.invalidate_all();
        Ok(())
    }

    /// Whether `vertex` is part of the current vertex set.
    pub fn contains_vertex(&self, vertex: u32) -> bool {
        self.adjacency.contains_key(&vertex)
    }

    /// The vertex set, in stable ascending order.
    pub fn vertices(&self) -> Vec<u32> {
        self.adjacency.keys().copied().collect()
    }

    /// Length of the edge traversable from `out_vertex` to `in_vertex`.
    ///
    /// Returns positive infinity when no such edge exists, absent vertices
    /// and wrong-way directed edges included. The sentinel lets callers
    /// feed the result straight into shortest-path-style arithmetic.
    pub fn edge_length(&self, out_vertex: u32, in_vertex: u32) -> f64 {
        match self.relation(out_vertex, in_vertex) {
            Relation::Forward(length) | Relation::Undirected(length) => length,
            Relation::None | Relation::Backward(_) => f64::INFINITY,
        }
    }

    /// Writes one human-readable line per stored edge. Descriptive only;
    /// nothing parses this back.
    pub fn write_edge_list<W: Write>(&self, output: &mut W) -> io::Result<()> {
        for (&vertex, records) in &self.adjacency {
            for record in records {
                let arrow = if record.directed { "->" } else { "--" };
                writeln!(
                    output,
                    "{vertex} {arrow} {} (length {})",
                    record.neighbor, record.length
                )?;
            }
        }
        Ok(())
    }

    /// Registers a consumer for mutation and destruction notifications.
    ///
    /// The graph keeps only a weak handle; the consumer owns its lifetime
    /// and each real association registers once.
    pub fn associate<C>(&mut self, consumer: &Rc<C>)
    where
        C: GraphConsumer + 'static,
    {
        self.consumers.associate(consumer);
    }

    /// Replaces this graph's contents with `other`'s.
    ///
    /// Consumers registered on `other` are invalidated by the assignment
    /// and receive their `kill` when `other` is dropped at the end of this
    /// call. This graph's own consumers and registry are untouched.
    pub fn assign_from(&mut self, mut other: MetricGraph) {
        other.consumers.invalidate_all();
        self.adjacency = std::mem::take(&mut other.adjacency);
    }

    /// Saves the graph in the RWEG binary format; see [`crate::rweg::save`].
    pub fn to_rweg(&self, file_name: &str, rewrite: bool) -> Result<PathBuf> {
        rweg::save(self, file_name, rewrite)
    }

    /// Merges an RWEG file into the graph; see [`crate::rweg::load`].
    pub fn from_rweg(&mut self, file_name: &str) -> Result<()> {
        rweg::load(self, file_name)
    }

    /// Saves the graph as a GEXF document; see [`crate::gexf::save`].
    pub fn to_gexf(&self, file_name: &str, rewrite: bool) -> Result<PathBuf> {
        gexf::save(self, file_name, rewrite)
    }

    /// Merges a GEXF document into the graph; see [`crate::gexf::load`].
    pub fn from_gexf(&mut self, file_name: &str) -> Result<()> {
        gexf::load(self, file_name)
    }

    /// The records stored under `vertex`, all of which depart it.
    ///
    /// The reverse view of an undirected edge stored under the other
    /// endpoint is intentionally not included; the codecs rely on each edge
    /// surfacing exactly once across the whole vertex iteration.
    pub(crate) fn departing_edges(&self, vertex: u32) -> &[EdgeRecord] {
        self.adjacency.get(&vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolves the actual stored relationship for the ordered pair
    /// `(v, w)`, searching both endpoints' records.
    pub(crate) fn relation(&self, v: u32, w: u32) -> Relation {
        match self.locate(v, w) {
            None => Relation::None,
            Some((_, record)) if !record.directed => Relation::Undirected(record.length),
            Some((owner, record)) if owner == v => Relation::Forward(record.length),
            Some((_, record)) => Relation::Backward(record.length),
        }
    }

    /// Finds the record covering the unordered pair, returning its owning
    /// vertex and a copy. The merge invariant guarantees at most one.
    fn locate(&self, v: u32, w: u32) -> Option<(u32, EdgeRecord)> {
        if let Some(record) = self
            .adjacency
            .get(&v)
            .and_then(|records| records.iter().find(|r| r.neighbor == w))
        {
            return Some((v, *record));
        }
        if let Some(record) = self
            .adjacency
            .get(&w)
            .and_then(|records| records.iter().find(|r| r.neighbor == v))
        {
            return Some((w, *record));
        }
        None
    }

    /// Updates the stored record for the pair in place, optionally forcing
    /// it undirected. The record stays under its current owner.
    fn rewrite_stored(&mut self, v: u32, w: u32, length: f64, force_undirected: bool) {
        for (owner, neighbor) in [(v, w), (w, v)] {
            if let Some(records) = self.adjacency.get_mut(&owner) {
                if let Some(record) = records.iter_mut().find(|r| r.neighbor == neighbor) {
                    record.length = length;
                    if force_undirected {
                        record.directed = false;
                    }
                    return;
                }
            }
        }
    }
}

impl Drop for MetricGraph {
    fn drop(&mut self) {
        self.consumers.kill_all();
    }
}

#[cfg(test)]
mod tests {
    use super::MetricGraph;

    #[test]
    fn rejects_non_positive_length_without_state_change() {
        let mut graph = MetricGraph::new();
        assert!(graph.update_edge(1, 2, 0.0, true).is_err());
        assert!(graph.update_edge(1, 2, -4.0, false).is_err());
        assert!(graph.update_edge(1, 2, f64::NAN, false).is_err());
        assert!(graph.update_edge(1, 2, f64::INFINITY, false).is_err());
        assert!(graph.vertices().is_empty());
    }

    #[test]
    fn inserting_an_edge_creates_both_vertices() {
        let mut graph = MetricGraph::new();
        graph.update_edge(7, 3, 1.5, true).unwrap();

        assert!(graph.contains_vertex(7));
        assert!(graph.contains_vertex(3));
        assert_eq!(graph.vertices(), vec![3, 7]);
    }

    #[test]
    fn edge_length_uses_infinity_as_absence_sentinel() {
        let mut graph = MetricGraph::new();
        graph.update_edge(1, 2, 2.5, true).unwrap();

        assert_eq!(graph.edge_length(1, 2), 2.5);
        // Wrong way along a directed edge, and vertices that do not exist.
        assert_eq!(graph.edge_length(2, 1), f64::INFINITY);
        assert_eq!(graph.edge_length(1, 99), f64::INFINITY);
        assert_eq!(graph.edge_length(98, 99), f64::INFINITY);
    }

    #[test]
    fn undirected_edge_is_traversable_both_ways() {
        let mut graph = MetricGraph::new();
        graph.update_edge(1, 2, 4.0, false).unwrap();

        assert_eq!(graph.edge_length(1, 2), 4.0);
        assert_eq!(graph.edge_length(2, 1), 4.0);
    }

    #[test]
    fn opposing_directed_declarations_fold_to_one_undirected_edge() {
        let mut graph = MetricGraph::new();
        graph.update_edge(1, 2, 3.0, true).unwrap();
        graph.update_edge(2, 1, 3.0, true).unwrap();

        assert_eq!(graph.edge_length(1, 2), 3.0);
        assert_eq!(graph.edge_length(2, 1), 3.0);

        // The pair stays undirected; a directed request now only updates
        // the length.
        graph.update_edge(1, 2, 7.0, true).unwrap();
        assert_eq!(graph.edge_length(1, 2), 7.0);
        assert_eq!(graph.edge_length(2, 1), 7.0);
    }

    #[test]
    fn directed_update_keeps_direction_and_sets_length() {
        let mut graph = MetricGraph::new();
        graph.update_edge(1, 2, 3.0, true).unwrap();
        graph.update_edge(1, 2, 9.0, true).unwrap();

        assert_eq!(graph.edge_length(1, 2), 9.0);
        assert_eq!(graph.edge_length(2, 1), f64::INFINITY);
    }

    #[test]
    fn undirected_request_widens_a_directed_edge() {
        let mut graph = MetricGraph::new();
        graph.update_edge(1, 2, 3.0, true).unwrap();
        graph.update_edge(1, 2, 5.0, false).unwrap();

        assert_eq!(graph.edge_length(1, 2), 5.0);
        assert_eq!(graph.edge_length(2, 1), 5.0);
    }

    #[test]
    fn self_loops_are_ordinary_edges() {
        let mut graph = MetricGraph::new();
        graph.update_edge(5, 5, 1.0, true).unwrap();

        assert_eq!(graph.vertices(), vec![5]);
        assert_eq!(graph.edge_length(5, 5), 1.0);
    }

    #[test]
    fn assign_from_moves_contents() {
        let mut source = MetricGraph::new();
        source.update_edge(1, 2, 2.0, false).unwrap();

        let mut destination = MetricGraph::new();
        destination.update_edge(8, 9, 1.0, true).unwrap();
        destination.assign_from(source);

        assert_eq!(destination.vertices(), vec![1, 2]);
        assert_eq!(destination.edge_length(1, 2), 2.0);
        assert_eq!(destination.edge_length(8, 9), f64::INFINITY);
    }

    #[test]
    fn edge_list_output_has_one_line_per_edge() {
        let mut graph = MetricGraph::new();
        graph.update_edge(1, 2, 3.0, true).unwrap();
        graph.update_edge(2, 3, 4.5, false).unwrap();

        let mut output = Vec::new();
        graph.write_edge_list(&mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|l| l.contains("1 -> 2")));
        assert!(lines.iter().any(|l| l.contains("2 -- 3")));
    }
}
