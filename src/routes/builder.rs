//! Route graph construction
//!
//! Nodes come from the global label table, ordered by block input order
//! then line. Explicit edges attribute each resolvable jump to the nearest
//! label at or before the jump's line in the same block; implicit edges
//! model fall-through between sequential labels whose separating lines
//! contain no top-level `jump`/`call`/`return`.

use std::collections::BTreeSet;

use crate::layout::{LayoutConfig, Point};
use crate::model::{AnalysisResult, Block, JumpKind};
use crate::routes::{LabelNode, RouteLink, RouteLinkKind};
use crate::scan::lexer::{indent_of, lex_line, Token};

/// One node per global label-table entry, in block order then line order.
pub fn build_nodes(
    blocks: &[Block],
    analysis: &AnalysisResult,
    config: &LayoutConfig,
) -> Vec<LabelNode> {
    let mut nodes = Vec::new();
    for block in blocks {
        let mut in_block: Vec<_> = analysis
            .labels
            .values()
            .filter(|l| l.block_id == block.id)
            .collect();
        in_block.sort_by_key(|l| l.line);
        for location in in_block {
            nodes.push(LabelNode {
                id: node_id(&block.id, &location.label),
                block_id: block.id.clone(),
                label: location.label.clone(),
                start_line: location.line,
                position: Point::default(),
                width: config.label_node_width(&location.label),
                height: config.label_node_height,
            });
        }
    }
    nodes
}

/// Explicit jump/call edges followed by implicit fall-through edges,
/// deduplicated by `(source, target)` (the route key space collapses
/// parallel edges anyway).
pub fn build_links(
    blocks: &[Block],
    analysis: &AnalysisResult,
    nodes: &[LabelNode],
) -> Vec<RouteLink> {
    let mut links = Vec::new();
    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    let push = |links: &mut Vec<RouteLink>,
                seen: &mut BTreeSet<(String, String)>,
                link: RouteLink| {
        if seen.insert((link.source_id.clone(), link.target_id.clone())) {
            links.push(link);
        }
    };

    for block in blocks {
        let labels_here: Vec<&LabelNode> = nodes.iter().filter(|n| n.block_id == block.id).collect();
        if labels_here.is_empty() {
            continue;
        }

        // Explicit edges: one per resolvable jump, attributed to the
        // nearest label at or before the jump's line. Jumps before the
        // first label have no current-label context and are skipped.
        for jump in analysis.jumps_for(&block.id) {
            if jump.is_dynamic {
                continue;
            }
            let Some(target_label) = analysis.labels.get(&jump.target) else {
                continue;
            };
            let Some(current) = labels_here
                .iter()
                .filter(|n| n.start_line <= jump.line)
                .max_by_key(|n| n.start_line)
            else {
                continue;
            };
            let kind = match jump.kind {
                JumpKind::Jump => RouteLinkKind::Jump,
                JumpKind::Call => RouteLinkKind::Call,
            };
            push(
                &mut links,
                &mut seen,
                RouteLink {
                    source_id: current.id.clone(),
                    target_id: node_id(&target_label.block_id, &target_label.label),
                    kind,
                },
            );
        }

        // Implicit edges between consecutive labels lacking a terminal
        // statement in between.
        let lines: Vec<&str> = block.content.lines().collect();
        for pair in labels_here.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if falls_through(&lines, a.start_line, b.start_line) {
                push(
                    &mut links,
                    &mut seen,
                    RouteLink {
                        source_id: a.id.clone(),
                        target_id: b.id.clone(),
                        kind: RouteLinkKind::Implicit,
                    },
                );
            }
        }
    }

    links
}

pub fn node_id(block_id: &str, label: &str) -> String {
    format!("{}:{}", block_id, label)
}

/// Control falls through from the label at `from_line` to the one at
/// `to_line` when no line strictly between them carries a top-level
/// `jump`/`call`/`return`. "Top level" is relative to the body: the first
/// non-blank line between the labels sets the body indent, and terminal
/// statements nested deeper (menu choices, conditionals) do not stop the
/// fall-through.
fn falls_through(lines: &[&str], from_line: usize, to_line: usize) -> bool {
    let mut body_indent: Option<usize> = None;

    // 1-based line numbers; scan lines strictly between the two labels.
    for idx in from_line..to_line.saturating_sub(1) {
        let Some(line) = lines.get(idx) else { break };
        if line.trim().is_empty() {
            continue;
        }
        let indent = indent_of(line);
        let body = *body_indent.get_or_insert(indent);
        if indent > body {
            continue;
        }
        if is_terminal_statement(line) {
            return false;
        }
    }
    true
}

fn is_terminal_statement(line: &str) -> bool {
    matches!(
        lex_line(line).first(),
        Some((Token::Jump | Token::Call | Token::Return, _))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    fn graph(blocks: &[Block]) -> (Vec<LabelNode>, Vec<RouteLink>) {
        let analysis = analyze(blocks);
        let nodes = build_nodes(blocks, &analysis, &LayoutConfig::default());
        let links = build_links(blocks, &analysis, &nodes);
        (nodes, links)
    }

    #[test]
    fn test_one_node_per_label() {
        let blocks = [Block::new("b1", "label start:\n    \"Hi\"\nlabel ending:\n")];
        let (nodes, _) = graph(&blocks);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, "b1:start");
        assert_eq!(nodes[0].start_line, 1);
        assert_eq!(nodes[1].id, "b1:ending");
    }

    #[test]
    fn test_implicit_fall_through_edge() {
        let blocks = [Block::new("b1", "label part1:\n    \"Hi\"\nlabel part2:\n    \"Bye\"\n")];
        let (_, links) = graph(&blocks);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].kind, RouteLinkKind::Implicit);
        assert_eq!(links[0].source_id, "b1:part1");
        assert_eq!(links[0].target_id, "b1:part2");
    }

    #[test]
    fn test_return_suppresses_implicit_edge() {
        let blocks = [Block::new(
            "b1",
            "label part1:\n    \"Hi\"\n    return\nlabel part2:\n    \"Bye\"\n",
        )];
        let (_, links) = graph(&blocks);
        assert!(links.is_empty());
    }

    #[test]
    fn test_nested_jump_does_not_suppress_fall_through() {
        let content = "label part1:\n    menu:\n        \"Leave\":\n            jump ending\n        \"Stay\":\n            \"ok\"\nlabel part2:\n    \"Bye\"\nlabel ending:\n";
        let blocks = [Block::new("b1", content)];
        let (_, links) = graph(&blocks);
        // the nested jump produces an explicit edge, and part1 still falls
        // through to part2
        assert!(links
            .iter()
            .any(|l| l.kind == RouteLinkKind::Implicit && l.target_id == "b1:part2"));
        assert!(links
            .iter()
            .any(|l| l.kind == RouteLinkKind::Jump && l.target_id == "b1:ending"));
    }

    #[test]
    fn test_explicit_edge_attribution() {
        let blocks = [
            Block::new("b1", "label start:\n    \"Hi\"\n    jump chapter1\n"),
            Block::new("b2", "label chapter1:\n"),
        ];
        let (_, links) = graph(&blocks);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source_id, "b1:start");
        assert_eq!(links[0].target_id, "b2:chapter1");
        assert_eq!(links[0].kind, RouteLinkKind::Jump);
    }

    #[test]
    fn test_jump_before_any_label_skipped() {
        let blocks = [
            Block::new("b1", "jump chapter1\nlabel late:\n"),
            Block::new("b2", "label chapter1:\n"),
        ];
        let (_, links) = graph(&blocks);
        assert!(links.is_empty());
    }

    #[test]
    fn test_adjacent_labels_fall_through() {
        let blocks = [Block::new("b1", "label a:\nlabel b:\n")];
        let (_, links) = graph(&blocks);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].kind, RouteLinkKind::Implicit);
    }

    #[test]
    fn test_call_edge_kind() {
        let blocks = [Block::new("b1", "label start:\n    call helper\nlabel helper:\n")];
        let (_, links) = graph(&blocks);
        // call suppresses the implicit edge and produces a call edge
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].kind, RouteLinkKind::Call);
        assert_eq!(links[0].target_id, "b1:helper");
    }
}
