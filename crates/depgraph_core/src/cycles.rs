//! Circular dependency detection.
//!
//! A depth-first search over all nodes (in input order) with an explicit
//! frame stack. When a dependency is found on the current DFS path the
//! dependency is marked, and every frame between it and the top of the path
//! is marked as it unwinds, up to the root of that DFS tree. Nodes finished
//! in an earlier branch are not revisited, so the set of marked ancestors
//! depends on traversal order: a node importing into a cycle is flagged only
//! when it is reached before the cycle's members.

use log::{debug, info};
use std::collections::HashMap;

use crate::types::DependencyNode;

struct Frame {
    node: usize,
    next_dep: usize,
    reached_cycle: bool,
}

/// Sets `has_cycle` on every node that is part of, or a DFS ancestor of, a
/// circular import chain. All other nodes are reset to `false`.
pub fn annotate_cycles(nodes: &mut [DependencyNode]) {
    let index: HashMap<&str, usize> =
        nodes.iter().enumerate().map(|(i, n)| (n.id.as_str(), i)).collect();
    // Dependencies that are not nodes can never be part of a cycle
    let adjacency: Vec<Vec<usize>> = nodes
        .iter()
        .map(|n| n.dependencies.iter().filter_map(|d| index.get(d.as_str()).copied()).collect())
        .collect();

    let affected = find_cycle_affected(&adjacency);
    for (node, flagged) in nodes.iter_mut().zip(affected) {
        node.has_cycle = flagged;
    }
    info!("Detected {} nodes with cycles", nodes.iter().filter(|n| n.has_cycle).count());
}

fn find_cycle_affected(adjacency: &[Vec<usize>]) -> Vec<bool> {
    let n = adjacency.len();
    let mut visited = vec![false; n];
    let mut on_stack = vec![false; n];
    let mut affected = vec![false; n];
    let mut stack: Vec<Frame> = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        on_stack[start] = true;
        stack.push(Frame { node: start, next_dep: 0, reached_cycle: false });

        while let Some(frame) = stack.last_mut() {
            if let Some(&dep) = adjacency[frame.node].get(frame.next_dep) {
                frame.next_dep += 1;
                if on_stack[dep] {
                    debug!("Back edge {} -> {}", frame.node, dep);
                    affected[dep] = true;
                    frame.reached_cycle = true;
                } else if !visited[dep] {
                    visited[dep] = true;
                    on_stack[dep] = true;
                    stack.push(Frame { node: dep, next_dep: 0, reached_cycle: false });
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            on_stack[done.node] = false;
            if done.reached_cycle {
                affected[done.node] = true;
                if let Some(parent) = stack.last_mut() {
                    parent.reached_cycle = true;
                }
            }
        }
    }

    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn node(id: &str, deps: &[&str]) -> DependencyNode {
        DependencyNode {
            id: id.to_string(),
            file_path: PathBuf::from(id),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            has_cycle: false,
        }
    }

    fn flagged(nodes: &[DependencyNode]) -> Vec<&str> {
        nodes.iter().filter(|n| n.has_cycle).map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_mutual_import_flags_both() {
        let mut nodes = vec![node("a", &["b"]), node("b", &["a"])];
        annotate_cycles(&mut nodes);
        assert_eq!(flagged(&nodes), vec!["a", "b"]);
    }

    #[test]
    fn test_acyclic_graph_has_no_flags() {
        let mut nodes = vec![
            node("a", &["b", "c"]),
            node("b", &["d"]),
            node("c", &["d"]),
            node("d", &[]),
            node("e", &["a", "d"]),
        ];
        annotate_cycles(&mut nodes);
        assert!(flagged(&nodes).is_empty());
    }

    #[test]
    fn test_ancestor_of_cycle_is_flagged() {
        // c is visited first and imports into the a <-> b cycle
        let mut nodes = vec![node("c", &["a"]), node("a", &["b"]), node("b", &["a"])];
        annotate_cycles(&mut nodes);
        assert_eq!(flagged(&nodes), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_ancestor_visited_after_cycle_is_not_flagged() {
        let mut nodes = vec![node("a", &["b"]), node("b", &["a"]), node("c", &["a"])];
        annotate_cycles(&mut nodes);
        assert_eq!(flagged(&nodes), vec!["a", "b"]);
    }

    #[test]
    fn test_three_node_cycle_flags_all_members() {
        let mut nodes = vec![node("a", &["b"]), node("b", &["c"]), node("c", &["a"])];
        annotate_cycles(&mut nodes);
        assert_eq!(flagged(&nodes), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_self_import() {
        let mut nodes = vec![node("a", &["a"]), node("b", &[])];
        annotate_cycles(&mut nodes);
        assert_eq!(flagged(&nodes), vec!["a"]);
    }

    #[test]
    fn test_descendant_of_cycle_is_not_flagged() {
        let mut nodes = vec![node("a", &["b"]), node("b", &["a", "leaf"]), node("leaf", &[])];
        annotate_cycles(&mut nodes);
        assert_eq!(flagged(&nodes), vec!["a", "b"]);
    }

    #[test]
    fn test_disconnected_components() {
        let mut nodes = vec![
            node("x", &["y"]),
            node("y", &[]),
            node("p", &["q"]),
            node("q", &["p"]),
        ];
        annotate_cycles(&mut nodes);
        assert_eq!(flagged(&nodes), vec!["p", "q"]);
    }

    #[test]
    fn test_unknown_dependencies_are_ignored() {
        let mut nodes = vec![node("a", &["outside", "b"]), node("b", &["outside"])];
        annotate_cycles(&mut nodes);
        assert!(flagged(&nodes).is_empty());
    }

    #[test]
    fn test_flags_are_reset() {
        let mut nodes = vec![node("a", &[])];
        nodes[0].has_cycle = true;
        annotate_cycles(&mut nodes);
        assert!(flagged(&nodes).is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let count = 50_000;
        let ids: Vec<String> = (0..count).map(|i| format!("m{}", i)).collect();
        let mut nodes: Vec<DependencyNode> = (0..count)
            .map(|i| {
                let next = (i + 1) % count;
                DependencyNode {
                    id: ids[i].clone(),
                    file_path: PathBuf::from(&ids[i]),
                    dependencies: vec![ids[next].clone()],
                    has_cycle: false,
                }
            })
            .collect();

        annotate_cycles(&mut nodes);
        assert!(nodes.iter().all(|n| n.has_cycle));
    }
}
