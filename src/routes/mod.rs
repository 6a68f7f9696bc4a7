//! Label-level route graph
//!
//! Finer-grained than the block-level link graph: one node per label, with
//! explicit jump/call edges and implicit fall-through edges between
//! sequential labels whose bodies lack a terminal statement. Routes are
//! complete entry-to-terminal paths over this graph.

pub mod builder;
pub mod enumerate;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::layout::{layered, LayoutConfig, LayoutNode, Point};
use crate::model::{AnalysisResult, Block};
use crate::palette::Palette;

/// A node of the route graph: one label occurrence, id `<blockId>:<label>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelNode {
    pub id: String,
    pub block_id: String,
    pub label: String,
    pub start_line: usize,
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteLinkKind {
    Jump,
    Call,
    Implicit,
}

/// A directed edge between label nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLink {
    pub source_id: String,
    pub target_id: String,
    pub kind: RouteLinkKind,
}

impl RouteLink {
    /// The deterministic key a route uses to reference this edge.
    pub fn key(&self) -> String {
        format!("{}-{}", self.source_id, self.target_id)
    }
}

/// One complete entry-to-terminal path, as a colored set of edge keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedRoute {
    pub id: String,
    pub color: String,
    pub link_ids: BTreeSet<String>,
}

/// The route sub-feature output triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGraph {
    pub label_nodes: Vec<LabelNode>,
    pub route_links: Vec<RouteLink>,
    pub identified_routes: Vec<IdentifiedRoute>,
}

/// Build the route graph with default palette and layout settings.
pub fn route_graph(blocks: &[Block], analysis: &AnalysisResult) -> RouteGraph {
    route_graph_with(blocks, analysis, &Palette::default(), &LayoutConfig::default())
}

/// Build the route graph: nodes and edges from the label table and jump
/// facts, routes from cycle-safe traversal, positions from the layered
/// layout.
pub fn route_graph_with(
    blocks: &[Block],
    analysis: &AnalysisResult,
    palette: &Palette,
    config: &LayoutConfig,
) -> RouteGraph {
    let mut label_nodes = builder::build_nodes(blocks, analysis, config);
    let route_links = builder::build_links(blocks, analysis, &label_nodes);
    let identified_routes = enumerate::enumerate_routes(&label_nodes, &route_links, palette);

    let layout_nodes: Vec<LayoutNode> = label_nodes
        .iter()
        .map(|n| LayoutNode::new(n.id.clone(), n.width, n.height))
        .collect();
    let edges: Vec<(String, String)> = route_links
        .iter()
        .map(|l| (l.source_id.clone(), l.target_id.clone()))
        .collect();
    for placed in layered(&layout_nodes, &edges, config) {
        if let Some(node) = label_nodes.iter_mut().find(|n| n.id == placed.id) {
            node.position = placed.position;
        }
    }

    RouteGraph {
        label_nodes,
        route_links,
        identified_routes,
    }
}
