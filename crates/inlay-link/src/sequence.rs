//! Dependency-first ordering of graph nodes.

use rustc_hash::FxHashMap;

use crate::graph::DependencyGraph;

/// Topological order of a [`DependencyGraph`].
///
/// For every edge `u -> v` that is not a back-edge, `v` comes before `u` in
/// `order`. Each back-edge found is recorded in `cycles` as the closed path
/// `[v, ..., u, v]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    pub order: Vec<String>,
    pub cycles: Vec<Vec<String>>,
}

impl Sequence {
    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|node| node == id)
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Order the graph with a three-color depth-first search.
///
/// Seeds and edges are visited in discovery order, so equal graphs always
/// produce equal sequences. The stack is explicit and never grows past the
/// number of nodes.
pub fn sequence(graph: &DependencyGraph) -> Sequence {
    let mut marks: FxHashMap<&str, Mark> = FxHashMap::default();
    let mut result = Sequence::default();
    // (node, index of the next dependency to visit)
    let mut stack: Vec<(&str, usize)> = Vec::new();

    for seed in graph.seeds() {
        if marks.contains_key(seed) {
            continue;
        }
        marks.insert(seed, Mark::InProgress);
        stack.push((seed, 0));

        while let Some(&(node, next)) = stack.last() {
            let Some(dep) = graph.dependency_at(node, next) else {
                marks.insert(node, Mark::Done);
                result.order.push(node.to_string());
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            match marks.get(dep) {
                None => {
                    marks.insert(dep, Mark::InProgress);
                    stack.push((dep, 0));
                }
                Some(Mark::InProgress) => {
                    let start = stack.iter().position(|(n, _)| *n == dep).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|(n, _)| n.to_string()).collect();
                    cycle.push(dep.to_string());
                    tracing::debug!(cycle = cycle.join(" -> "), "skipping back-edge");
                    result.cycles.push(cycle);
                }
                Some(Mark::Done) => {}
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use indexmap::{IndexMap, IndexSet};

    use super::*;

    /// `edges` pairs a node with its space separated dependencies.
    fn graph(seeds: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let seeds: IndexSet<String> = seeds.iter().map(|s| s.to_string()).collect();
        let edges: IndexMap<String, IndexSet<String>> = edges
            .iter()
            .map(|(from, to)| {
                (
                    from.to_string(),
                    to.split_whitespace().map(str::to_string).collect(),
                )
            })
            .collect();
        DependencyGraph::from_parts("entry.js", seeds, edges)
    }

    #[test]
    fn dependencies_come_first() {
        let g = graph(
            &["a", "b"],
            &[("a", "c d"), ("b", "d"), ("c", "d"), ("d", "")],
        );
        let seq = sequence(&g);
        assert_eq!(seq.order, vec!["d", "c", "a", "b"]);
        assert!(!seq.has_cycles());
    }

    #[test]
    fn diamond_emits_shared_node_once() {
        let g = graph(
            &["top"],
            &[
                ("top", "left right"),
                ("left", "base"),
                ("right", "base"),
                ("base", ""),
            ],
        );
        let seq = sequence(&g);
        assert_eq!(seq.order, vec!["base", "left", "right", "top"]);
    }

    #[test]
    fn cycle_terminates_and_is_recorded() {
        let g = graph(&["a"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let seq = sequence(&g);
        assert_eq!(seq.order, vec!["c", "b", "a"]);
        assert_eq!(seq.cycles, vec![vec!["a", "b", "c", "a"]]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let g = graph(&["a"], &[("a", "a")]);
        let seq = sequence(&g);
        assert_eq!(seq.order, vec!["a"]);
        assert_eq!(seq.cycles.len(), 1);
    }

    #[test]
    fn empty_graph() {
        let seq = sequence(&DependencyGraph::default());
        assert!(seq.order.is_empty());
        assert_eq!(seq.position("a"), None);
    }
}
