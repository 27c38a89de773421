//! Package node registry backed by petgraph.
//!
//! Every package name maps to exactly one node. Edges and worklist entries
//! hold a [`NodeIndex`], never a copy of the node, so feature widening is
//! seen by every holder at once.

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use portman_core::package_ref::PackageRef;

/// Whether the node has been scheduled for its current feature set.
///
/// Set when a worklist entry is pushed; cleared only when the feature set
/// widens, so a node is never scheduled twice for the same features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Unqueued,
    Queued,
}

/// Whether the node's dependencies are known for its current feature set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatState {
    Unstated,
    Stated,
}

/// Whether the orderer has emitted (or is emitting) the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Unlisted,
    Listed,
}

/// What the most recent query said about the package itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Not queried yet.
    Unknown,
    /// Needs the operation (install or removal) performed.
    Required,
    /// Already in the desired state: installed when installing, absent when removing.
    Satisfied,
}

/// The single mutable representation of one package during resolution.
#[derive(Debug, Clone)]
pub struct PackageNode {
    name: String,
    features: BTreeSet<String>,
    queue: QueueState,
    stat: StatState,
    list: ListState,
    presence: Presence,
}

impl PackageNode {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            features: BTreeSet::new(),
            queue: QueueState::Unqueued,
            stat: StatState::Unstated,
            list: ListState::Unlisted,
            presence: Presence::Unknown,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn features(&self) -> &BTreeSet<String> {
        &self.features
    }

    pub fn queue_state(&self) -> QueueState {
        self.queue
    }

    pub fn stat_state(&self) -> StatState {
        self.stat
    }

    pub fn list_state(&self) -> ListState {
        self.list
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// The node rendered with every feature known so far.
    pub fn package_ref(&self) -> PackageRef {
        PackageRef {
            name: self.name.clone(),
            features: self.features.clone(),
        }
    }

    /// Merge `requested` into the feature set.
    ///
    /// Returns `true` if anything was added, in which case the node is reset
    /// to `Unqueued`/`Unstated` so it gets stated again with the union.
    pub(crate) fn widen(&mut self, requested: &BTreeSet<String>) -> bool {
        if requested.is_subset(&self.features) {
            return false;
        }
        self.features.extend(requested.iter().cloned());
        self.queue = QueueState::Unqueued;
        self.stat = StatState::Unstated;
        true
    }

    pub(crate) fn mark_queued(&mut self) {
        debug_assert_eq!(self.queue, QueueState::Unqueued, "{} queued twice", self.name);
        self.queue = QueueState::Queued;
    }

    pub(crate) fn mark_stated(&mut self, presence: Presence) {
        debug_assert_eq!(self.stat, StatState::Unstated, "{} stated twice", self.name);
        debug_assert_eq!(self.queue, QueueState::Queued, "{} stated without being queued", self.name);
        self.stat = StatState::Stated;
        self.presence = presence;
    }

    pub(crate) fn mark_listed(&mut self) {
        debug_assert_eq!(self.list, ListState::Unlisted, "{} listed twice", self.name);
        self.list = ListState::Listed;
    }
}

/// Arena of [`PackageNode`]s indexed by package name.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    graph: DiGraph<PackageNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the node for `name`, creating an empty one on first sight.
    pub fn get_or_insert(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(PackageNode::new(name));
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Look up a node by bare package name.
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &PackageNode {
        &self.graph[idx]
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIndex) -> &mut PackageNode {
        &mut self.graph[idx]
    }

    /// Record that `from` depends on `to`. Repeated edges are ignored.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if !self.graph.edges(from).any(|e| e.target() == to) {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Direct dependencies of a node, in the order they were discovered.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut deps: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        // petgraph yields the most recently added edge first
        deps.reverse();
        deps
    }

    /// Reverse dependencies (who depends on this node).
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut deps: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect();
        deps.reverse();
        deps
    }

    /// All nodes in creation order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_node_per_name() {
        let mut reg = NodeRegistry::new();
        let a = reg.get_or_insert("zlib");
        let b = reg.get_or_insert("zlib");
        assert_eq!(a, b);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.find("zlib"), Some(a));
        assert_eq!(reg.find("fmt"), None);
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut reg = NodeRegistry::new();
        let a = reg.get_or_insert("a");
        let b = reg.get_or_insert("b");
        reg.add_edge(a, b);
        reg.add_edge(a, b);
        assert_eq!(reg.dependencies_of(a), vec![b]);
        assert_eq!(reg.dependents_of(b), vec![a]);
    }

    #[test]
    fn dependencies_keep_discovery_order() {
        let mut reg = NodeRegistry::new();
        let root = reg.get_or_insert("root");
        let x = reg.get_or_insert("x");
        let y = reg.get_or_insert("y");
        let z = reg.get_or_insert("z");
        reg.add_edge(root, y);
        reg.add_edge(root, x);
        reg.add_edge(root, z);
        assert_eq!(reg.dependencies_of(root), vec![y, x, z]);
    }

    #[test]
    fn widen_resets_flags_only_on_new_features() {
        let mut reg = NodeRegistry::new();
        let idx = reg.get_or_insert("curl");
        let node = reg.node_mut(idx);

        assert!(node.widen(&features(&["core"])));
        node.mark_queued();
        node.mark_stated(Presence::Required);
        assert_eq!(node.stat_state(), StatState::Stated);

        assert!(!node.widen(&features(&["core"])));
        assert_eq!(node.queue_state(), QueueState::Queued);
        assert_eq!(node.stat_state(), StatState::Stated);

        assert!(node.widen(&features(&["ssl"])));
        assert_eq!(node.queue_state(), QueueState::Unqueued);
        assert_eq!(node.stat_state(), StatState::Unstated);
        assert_eq!(node.features(), &features(&["core", "ssl"]));
    }

    #[test]
    fn package_ref_reflects_current_features() {
        let mut reg = NodeRegistry::new();
        let idx = reg.get_or_insert("foo");
        reg.node_mut(idx).widen(&features(&["b", "a"]));
        assert_eq!(reg.node(idx).package_ref().to_string(), "foo[a,b]");
    }

    #[test]
    #[should_panic(expected = "stated without being queued")]
    #[cfg(debug_assertions)]
    fn stating_requires_queueing() {
        let mut reg = NodeRegistry::new();
        let idx = reg.get_or_insert("foo");
        reg.node_mut(idx).mark_stated(Presence::Required);
    }
}
