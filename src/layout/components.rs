use std::collections::HashMap;

use crate::ir::Canvas;

use super::types::{ComponentMap, Rect};

/// Disjoint sets over dense indices, with path compression.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    pub fn find(&mut self, idx: usize) -> usize {
        let mut root = idx;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cursor = idx;
        while self.parent[cursor] != root {
            let next = self.parent[cursor];
            self.parent[cursor] = root;
            cursor = next;
        }
        root
    }

    /// Hangs the root of `b` under the root of `a`.
    pub fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_b] = root_a;
        }
    }
}

/// Splits plain nodes into edge-connected components, then gives each group
/// the component most of its enclosed plain nodes belong to.
///
/// Group containment is taken from the groups' current rectangles. A group
/// enclosing no plain node gets a fresh component of its own. Component ids
/// are dense and numbered in order of first appearance.
pub fn compute_components(canvas: &Canvas) -> ComponentMap {
    let plain: Vec<&str> = canvas.plain_nodes().map(|node| node.id.as_str()).collect();
    let index: HashMap<&str, usize> = plain.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut sets = UnionFind::new(plain.len());
    for edge in &canvas.edges {
        let (Some(&a), Some(&b)) = (
            index.get(edge.from_node.as_str()),
            index.get(edge.to_node.as_str()),
        ) else {
            continue;
        };
        sets.union(a, b);
    }

    let mut components = ComponentMap::new();
    let mut renumbered: HashMap<usize, usize> = HashMap::new();
    for (idx, id) in plain.iter().enumerate() {
        let root = sets.find(idx);
        let next = renumbered.len();
        let component = *renumbered.entry(root).or_insert(next);
        components.insert((*id).to_string(), component);
    }

    let mut next = renumbered.len();
    let plain_count = next;
    for group in canvas.groups() {
        let rect = Rect::of(group);
        let inside = canvas
            .plain_nodes()
            .filter(|node| rect.contains(&Rect::of(node)))
            .filter_map(|node| components.get(&node.id).copied());
        match plurality(inside) {
            Some(component) => {
                components.insert(group.id.clone(), component);
            }
            None => {
                components.insert(group.id.clone(), next);
                next += 1;
            }
        }
    }

    log::debug!(
        "components: {plain_count} over plain nodes, {} singleton group(s)",
        next - plain_count
    );
    components
}

/// Most frequent value; ties go to the value seen first.
fn plurality(values: impl Iterator<Item = usize>) -> Option<usize> {
    let mut counts: Vec<(usize, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    let mut best: Option<(usize, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
