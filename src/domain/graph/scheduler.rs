//! Deterministic topological scheduling for execution graphs

use std::collections::{HashMap, VecDeque};

/// Kahn's algorithm over the surviving nodes of a graph.
///
/// Determinism: the ready queue is seeded with zero-in-degree nodes in
/// declaration order, and successors are released in edge declaration
/// order, so the same definition always produces the same order.
///
/// Nodes on a cycle never reach in-degree zero and are left out of the
/// result; the acyclic remainder still executes as a partial order.
pub fn topological_order(node_ids: &[String], edges: &[(String, String)]) -> Vec<String> {
    let mut in_degree: HashMap<&str, usize> =
        node_ids.iter().map(|id| (id.as_str(), 0)).collect();
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();

    for (source, target) in edges {
        // edges referencing dropped nodes were filtered by the parser,
        // but stay defensive about the invariant here too
        if !in_degree.contains_key(source.as_str()) || !in_degree.contains_key(target.as_str()) {
            continue;
        }

        successors
            .entry(source.as_str())
            .or_default()
            .push(target.as_str());
        if let Some(degree) = in_degree.get_mut(target.as_str()) {
            *degree += 1;
        }
    }

    let mut ready: VecDeque<&str> = node_ids
        .iter()
        .map(String::as_str)
        .filter(|id| in_degree.get(id).copied() == Some(0))
        .collect();

    let mut order = Vec::with_capacity(node_ids.len());

    while let Some(id) = ready.pop_front() {
        order.push(id.to_string());

        if let Some(next) = successors.get(id) {
            for &target in next {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(target);
                    }
                }
            }
        }
    }

    order
}
