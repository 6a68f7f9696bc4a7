//! Layered layout engine
//!
//! One algorithm, reused for the block-level link graph and the label-level
//! route graph: nodes are assigned to layers by a wave-based topological
//! pass, layers advance along X by the previous layer's widest node plus a
//! gap, and nodes within a layer stack vertically centered around zero.
//! Cyclic graphs are handled by seeding the single node with the globally
//! minimal in-degree; nodes unreachable from any seed form one final
//! catch-all layer. Everything is deterministic given the same node and
//! edge order.

pub mod config;

pub use config::LayoutConfig;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A 2D position in the diagram coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Layout input: a node with a stable id and a size.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

/// Layout output: the node id with its computed position, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub id: String,
    pub position: Point,
    pub layer: usize,
}

/// Compute the layered layout. Edges reference node ids; edges mentioning
/// unknown ids are ignored.
pub fn layered(
    nodes: &[LayoutNode],
    edges: &[(String, String)],
    config: &LayoutConfig,
) -> Vec<PlacedNode> {
    if nodes.is_empty() {
        return Vec::new();
    }

    // Index lookup is internal only; nothing observable iterates this map.
    let index_of: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree: Vec<usize> = vec![0; nodes.len()];
    for (source, target) in edges {
        let (Some(&s), Some(&t)) = (index_of.get(source.as_str()), index_of.get(target.as_str()))
        else {
            continue;
        };
        successors[s].push(t);
        in_degree[t] += 1;
    }

    // Seed with all zero-in-degree nodes; a cyclic graph gets the first
    // node (in input order) with the globally minimal in-degree.
    let mut remaining = in_degree.clone();
    let mut queue: Vec<usize> = (0..nodes.len()).filter(|&i| remaining[i] == 0).collect();
    if queue.is_empty() {
        let min_degree = *remaining.iter().min().unwrap_or(&0);
        if let Some(seed) = (0..nodes.len()).find(|&i| remaining[i] == min_degree) {
            queue.push(seed);
        }
    }

    let mut visited = vec![false; nodes.len()];
    let mut layers: Vec<Vec<usize>> = Vec::new();
    while !queue.is_empty() {
        for &i in &queue {
            visited[i] = true;
        }
        let mut next = Vec::new();
        for &i in &queue {
            for &succ in &successors[i] {
                if visited[succ] {
                    continue;
                }
                remaining[succ] = remaining[succ].saturating_sub(1);
                if remaining[succ] == 0 && !next.contains(&succ) {
                    next.push(succ);
                }
            }
        }
        layers.push(queue);
        queue = next;
    }

    // Nodes never reached (back-edges kept their in-degree positive, or
    // they were unreachable from any seed) form one catch-all layer.
    let orphans: Vec<usize> = (0..nodes.len()).filter(|&i| !visited[i]).collect();
    if !orphans.is_empty() {
        layers.push(orphans);
    }

    place_layers(nodes, &layers, config)
}

/// Turn layer assignments into coordinates: X advances by the widest node
/// of the previous layer plus the horizontal gap; within a layer, nodes
/// stack vertically centered around zero and narrower nodes center within
/// the layer column.
fn place_layers(
    nodes: &[LayoutNode],
    layers: &[Vec<usize>],
    config: &LayoutConfig,
) -> Vec<PlacedNode> {
    let mut placed: Vec<Option<PlacedNode>> = vec![None; nodes.len()];

    let mut x = 0.0;
    for (layer_idx, layer) in layers.iter().enumerate() {
        let layer_width = layer
            .iter()
            .map(|&i| nodes[i].width)
            .fold(0.0_f64, f64::max);
        let total_height: f64 = layer.iter().map(|&i| nodes[i].height).sum::<f64>()
            + config.vertical_gap * layer.len().saturating_sub(1) as f64;

        let mut y = -total_height / 2.0;
        for &i in layer {
            placed[i] = Some(PlacedNode {
                id: nodes[i].id.clone(),
                position: Point::new(x + (layer_width - nodes[i].width) / 2.0, y),
                layer: layer_idx,
            });
            y += nodes[i].height + config.vertical_gap;
        }

        x += layer_width + config.horizontal_gap;
    }

    placed.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> LayoutNode {
        LayoutNode::new(id, 100.0, 50.0)
    }

    fn edge(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    fn placed<'a>(result: &'a [PlacedNode], id: &str) -> &'a PlacedNode {
        result.iter().find(|p| p.id == id).unwrap()
    }

    #[test]
    fn test_chain_gets_increasing_layers() {
        let nodes = [node("a"), node("b"), node("c")];
        let edges = [edge("a", "b"), edge("b", "c")];
        let result = layered(&nodes, &edges, &LayoutConfig::default());

        assert_eq!(placed(&result, "a").layer, 0);
        assert_eq!(placed(&result, "b").layer, 1);
        assert_eq!(placed(&result, "c").layer, 2);
        assert!(placed(&result, "a").position.x < placed(&result, "b").position.x);
        assert!(placed(&result, "b").position.x < placed(&result, "c").position.x);
    }

    #[test]
    fn test_siblings_share_a_layer() {
        let nodes = [node("a"), node("b"), node("c")];
        let edges = [edge("a", "b"), edge("a", "c")];
        let result = layered(&nodes, &edges, &LayoutConfig::default());

        assert_eq!(placed(&result, "b").layer, 1);
        assert_eq!(placed(&result, "c").layer, 1);
        assert_eq!(
            placed(&result, "b").position.x,
            placed(&result, "c").position.x
        );
        assert!(placed(&result, "b").position.y < placed(&result, "c").position.y);
    }

    #[test]
    fn test_layer_stack_centered_around_zero() {
        let nodes = [node("a"), node("b"), node("c")];
        let edges = [edge("a", "b"), edge("a", "c")];
        let result = layered(&nodes, &edges, &LayoutConfig::default());

        let b = placed(&result, "b").position.y;
        let c = placed(&result, "c").position.y;
        // two 50-high nodes with a 24 gap: stack spans -62..62
        assert_eq!(b, -62.0);
        assert_eq!(c, 12.0);
    }

    #[test]
    fn test_narrow_node_centered_in_layer() {
        let nodes = [
            node("a"),
            LayoutNode::new("wide", 200.0, 50.0),
            LayoutNode::new("narrow", 100.0, 50.0),
        ];
        let edges = [edge("a", "wide"), edge("a", "narrow")];
        let result = layered(&nodes, &edges, &LayoutConfig::default());

        let wide_x = placed(&result, "wide").position.x;
        let narrow_x = placed(&result, "narrow").position.x;
        assert_eq!(narrow_x, wide_x + 50.0);
    }

    #[test]
    fn test_cycle_seeds_min_in_degree_node() {
        let nodes = [node("a"), node("b")];
        let edges = [edge("a", "b"), edge("b", "a")];
        let result = layered(&nodes, &edges, &LayoutConfig::default());

        assert_eq!(result.len(), 2);
        assert_eq!(placed(&result, "a").layer, 0);
    }

    #[test]
    fn test_unreachable_node_in_catch_all_layer() {
        // c -> b keeps b's in-degree positive after the a-wave, and c is
        // inside a cycle with b, so both land in the catch-all layer.
        let nodes = [node("a"), node("b"), node("c")];
        let edges = [edge("a", "b"), edge("b", "c"), edge("c", "b")];
        let result = layered(&nodes, &edges, &LayoutConfig::default());

        assert_eq!(placed(&result, "a").layer, 0);
        assert_eq!(placed(&result, "b").layer, 1);
        assert_eq!(placed(&result, "c").layer, 1);
    }

    #[test]
    fn test_determinism() {
        let nodes = [node("a"), node("b"), node("c"), node("d")];
        let edges = [edge("a", "b"), edge("a", "c"), edge("c", "d")];
        let first = layered(&nodes, &edges, &LayoutConfig::default());
        let second = layered(&nodes, &edges, &LayoutConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_graph() {
        let result = layered(&[], &[], &LayoutConfig::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_unknown_edge_ids_ignored() {
        let nodes = [node("a")];
        let edges = [edge("a", "ghost")];
        let result = layered(&nodes, &edges, &LayoutConfig::default());
        assert_eq!(result.len(), 1);
    }
}
