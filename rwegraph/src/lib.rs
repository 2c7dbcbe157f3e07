//! Weighted metric-graph store with RWEG binary and GEXF interchange
//! persistence.
//!
//! A metric graph pairs every edge with a strictly positive length and
//! allows directed and undirected edges to mix, under one invariant: if a
//! pair of vertices is traversable in both directions, it is a single
//! undirected edge with a single length. All mutation funnels through
//! [`MetricGraph::update_edge`], whose merge table also governs how the
//! codecs reconcile duplicate and mutual edge declarations on load.
//!
//! External objects holding derived views over a graph register through
//! [`MetricGraph::associate`] and are notified synchronously when the graph
//! changes ([`GraphConsumer::invalidate`]) or ceases to exist
//! ([`GraphConsumer::kill`]).
//!
//! The design is single-threaded; sharing a graph across threads is the
//! caller's problem to serialize externally.

mod consumer;
mod error;
mod graph;
mod paths;
mod resolve;

pub mod gexf;
pub mod rweg;

pub use consumer::GraphConsumer;
pub use error::{Error, Result};
pub use graph::MetricGraph;
