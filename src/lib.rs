//! Narrative Atlas - static analysis and flow graphs for visual-novel scripts
//!
//! This library extracts labels, characters, variables, screens and jump
//! statements from line-oriented narrative script blocks, resolves jumps
//! into a cross-block link graph, classifies blocks, and builds a
//! label-level route graph with deterministic layered positions.
//!
//! # Example
//!
//! ```rust
//! use narrative_atlas::{analyze, Block};
//!
//! let blocks = [
//!     Block::new("intro", "label start:\n    \"Hello.\"\n    jump ending\n"),
//!     Block::new("finale", "label ending:\n    return\n"),
//! ];
//! let result = analyze(&blocks);
//! assert!(result.labels.contains_key("start"));
//! assert_eq!(result.links.len(), 1);
//! ```

pub mod analysis;
pub mod error;
pub mod layout;
pub mod model;
pub mod palette;
pub mod routes;
pub mod scan;

pub use analysis::{analyze, analyze_with_palette, SPECIAL_STORY_FILES};
pub use error::{collect_diagnostics, Diagnostic};
pub use layout::{layered, LayoutConfig, LayoutNode, PlacedNode, Point};
pub use model::{
    AnalysisResult, Block, BlockTag, Character, DialogueLine, ImageDef, JumpKind, JumpLocation,
    LabelKind, LabelLocation, Link, ScreenDef, Variable, VariableKind, VariableUsage,
};
pub use palette::{Palette, PaletteError, DEFAULT_COLORS};
pub use routes::{
    route_graph, route_graph_with, IdentifiedRoute, LabelNode, RouteGraph, RouteLink,
    RouteLinkKind,
};

/// Lay out the blocks of an analysis as cards in the block-level link
/// graph, using the link edges for layering.
pub fn layout_blocks(
    blocks: &[Block],
    analysis: &AnalysisResult,
    config: &LayoutConfig,
) -> Vec<PlacedNode> {
    let nodes: Vec<LayoutNode> = blocks
        .iter()
        .map(|b| LayoutNode::new(b.id.clone(), config.block_size.0, config.block_size.1))
        .collect();
    let edges: Vec<(String, String)> = analysis
        .links
        .iter()
        .map(|l| (l.source_id.clone(), l.target_id.clone()))
        .collect();
    layered(&nodes, &edges, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blocks() -> Vec<Block> {
        vec![
            Block::new(
                "script.rpy",
                "define e = Character(\"Eileen\")\nlabel start:\n    e \"Welcome.\"\n    jump chapter1\n",
            )
            .with_file_path("game/script.rpy"),
            Block::new(
                "chapter1.rpy",
                "label chapter1:\n    \"A new day.\"\n    return\n",
            )
            .with_file_path("game/chapter1.rpy"),
        ]
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let blocks = sample_blocks();
        let result = analyze(&blocks);

        assert_eq!(result.labels["start"].block_id, "script.rpy");
        assert_eq!(result.links.len(), 1);
        assert_eq!(result.links[0].target_label, "chapter1");
        assert!(result.characters.contains_key("e"));
        assert!(result.story_block_ids.contains("script.rpy"));
        assert!(result.story_block_ids.contains("chapter1.rpy"));
    }

    #[test]
    fn test_layout_blocks_places_every_block() {
        let blocks = sample_blocks();
        let result = analyze(&blocks);
        let placed = layout_blocks(&blocks, &result, &LayoutConfig::default());
        assert_eq!(placed.len(), 2);
        assert!(placed.iter().any(|p| p.id == "script.rpy" && p.layer == 0));
        assert!(placed.iter().any(|p| p.id == "chapter1.rpy" && p.layer == 1));
    }

    #[test]
    fn test_route_graph_end_to_end() {
        let blocks = sample_blocks();
        let result = analyze(&blocks);
        let graph = route_graph(&blocks, &result);
        assert_eq!(graph.label_nodes.len(), 2);
        assert_eq!(graph.route_links.len(), 1);
        assert_eq!(graph.identified_routes.len(), 1);
    }
}
