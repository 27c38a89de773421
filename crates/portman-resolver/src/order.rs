//! Post-order walk producing a linear install (or removal) order.
//!
//! A node is marked listed before its dependencies are visited, which is
//! what stops the walk on cycles. For cyclic subgraphs the order is some
//! terminating order, not a guaranteed topological one.

use petgraph::graph::NodeIndex;
use portman_core::package_ref::PackageRef;

use crate::graph::{ListState, NodeRegistry, Presence};

struct Frame {
    node: NodeIndex,
    deps: Vec<NodeIndex>,
    next: usize,
}

/// Order the subgraphs reachable from `roots`, in the given root order.
///
/// Every package appears after all of its dependencies (for acyclic input)
/// and at most once. Packages whose query reported them as already
/// satisfied are walked but not emitted. Unknown root names are skipped.
pub fn order(registry: &mut NodeRegistry, roots: &[&str]) -> Vec<PackageRef> {
    let mut indices = Vec::with_capacity(roots.len());
    for name in roots {
        match registry.find(name) {
            Some(idx) => indices.push(idx),
            None => tracing::warn!("cannot order unknown package {name}"),
        }
    }
    order_indices(registry, &indices)
}

/// Order every node, using creation order for the roots.
pub fn order_all(registry: &mut NodeRegistry) -> Vec<PackageRef> {
    let roots: Vec<NodeIndex> = registry.node_indices().collect();
    order_indices(registry, &roots)
}

fn order_indices(registry: &mut NodeRegistry, roots: &[NodeIndex]) -> Vec<PackageRef> {
    let mut ordering = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for &root in roots {
        if let Some(frame) = enter(registry, root) {
            stack.push(frame);
        }

        while let Some(top) = stack.last_mut() {
            if let Some(&dep) = top.deps.get(top.next) {
                top.next += 1;
                if let Some(frame) = enter(registry, dep) {
                    stack.push(frame);
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let node = registry.node(done.node);
            if node.presence() != Presence::Satisfied {
                ordering.push(node.package_ref());
            }
        }
    }

    ordering
}

/// Mark `idx` listed and return its frame, or `None` if it was already listed.
fn enter(registry: &mut NodeRegistry, idx: NodeIndex) -> Option<Frame> {
    if registry.node(idx).list_state() == ListState::Listed {
        return None;
    }
    registry.node_mut(idx).mark_listed();
    Some(Frame {
        node: idx,
        deps: registry.dependencies_of(idx),
        next: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(edges: &[(&str, &str)], nodes: &[&str]) -> NodeRegistry {
        let mut reg = NodeRegistry::new();
        for name in nodes {
            let idx = reg.get_or_insert(name);
            reg.node_mut(idx)
                .widen(&std::iter::once("core".to_string()).collect());
        }
        for (from, to) in edges {
            let f = reg.get_or_insert(from);
            let t = reg.get_or_insert(to);
            reg.add_edge(f, t);
        }
        reg
    }

    fn names(ordering: &[PackageRef]) -> Vec<&str> {
        ordering.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn chain_is_reversed() {
        let mut reg = registry_with(&[("app", "lib"), ("lib", "base")], &["app", "lib", "base"]);
        let ordering = order(&mut reg, &["app"]);
        assert_eq!(names(&ordering), vec!["base", "lib", "app"]);
    }

    #[test]
    fn diamond_lists_shared_dependency_once() {
        let mut reg = registry_with(
            &[("top", "left"), ("top", "right"), ("left", "bottom"), ("right", "bottom")],
            &["top", "left", "right", "bottom"],
        );
        let ordering = order(&mut reg, &["top"]);
        assert_eq!(names(&ordering), vec!["bottom", "left", "right", "top"]);
    }

    #[test]
    fn roots_are_concatenated_in_caller_order() {
        let mut reg = registry_with(&[("b", "shared"), ("a", "shared")], &["a", "b", "shared"]);
        let ordering = order(&mut reg, &["b", "a"]);
        assert_eq!(names(&ordering), vec!["shared", "b", "a"]);
    }

    #[test]
    fn self_loop_terminates() {
        let mut reg = registry_with(&[("a", "a")], &["a"]);
        assert_eq!(names(&order(&mut reg, &["a"])), vec!["a"]);
    }

    #[test]
    fn two_cycle_terminates_with_both_nodes() {
        let mut reg = registry_with(&[("a", "b"), ("b", "a")], &["a", "b"]);
        let ordering = order_all(&mut reg);
        assert_eq!(names(&ordering), vec!["b", "a"]);
    }

    #[test]
    fn unknown_root_is_skipped() {
        let mut reg = registry_with(&[], &["a"]);
        assert_eq!(names(&order(&mut reg, &["missing", "a"])), vec!["a"]);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let count = 50_000;
        let names: Vec<String> = (0..count).map(|i| format!("p{i}")).collect();
        let mut reg = NodeRegistry::new();
        let mut prev: Option<NodeIndex> = None;
        for name in &names {
            let idx = reg.get_or_insert(name);
            if let Some(p) = prev {
                reg.add_edge(p, idx);
            }
            prev = Some(idx);
        }
        let ordering = order(&mut reg, &["p0"]);
        assert_eq!(ordering.len(), count);
        assert_eq!(ordering[0].name, format!("p{}", count - 1));
        assert_eq!(ordering[count - 1].name, "p0");
    }
}
