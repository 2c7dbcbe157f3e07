//! Merge-decision table for `MetricGraph::update_edge`.
//!
//! Every mutation, whether issued directly or replayed by a codec, runs
//! through [`resolve`], so overlapping edge declarations settle identically
//! regardless of where they came from.

/// Stored relationship between an ordered vertex pair `(v, w)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Relation {
    /// No edge connects the pair in either direction.
    None,
    /// Directed edge `v -> w` with the stored length.
    Forward(f64),
    /// Directed edge `w -> v` with the stored length.
    Backward(f64),
    /// Undirected edge `v -- w` with the stored length.
    Undirected(f64),
}

/// What `update_edge` must do to the stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Nothing connects the pair yet; insert the desired edge as requested.
    Insert { directed: bool },
    /// Keep the stored record where and how it is; set its length.
    UpdateLength,
    /// Rewrite the stored record as undirected and set its length.
    MakeUndirected,
}

/// Resolves a desired edge against the current relationship.
///
/// A directed request against the opposite direction, or an undirected
/// request against any directed edge, folds the pair into a single
/// undirected edge; an undirected edge never narrows back to directed.
/// The pair therefore always ends up with at most one relationship.
pub(crate) fn resolve(current: Relation, desired_directed: bool) -> Resolution {
    match (current, desired_directed) {
        (Relation::None, directed) => Resolution::Insert { directed },
        (Relation::Forward(_), true) => Resolution::UpdateLength,
        (Relation::Forward(_), false) => Resolution::MakeUndirected,
        (Relation::Backward(_), _) => Resolution::MakeUndirected,
        (Relation::Undirected(_), _) => Resolution::UpdateLength,
    }
}
