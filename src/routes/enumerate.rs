//! Route enumeration
//!
//! Depth-first traversal from every entry label (no incoming edges) with a
//! per-traversal visited set. A route is recorded at every reachable
//! terminal label (no outgoing edges); routes sharing a prefix share edge
//! keys. A traversal trapped in cycles records its longest dead-end path
//! once, and a graph with no entry labels at all seeds from the node with
//! the globally minimal in-degree, so any graph with edges reports at
//! least one route.

use std::collections::{BTreeMap, BTreeSet};

use crate::palette::Palette;
use crate::routes::{IdentifiedRoute, LabelNode, RouteLink};

pub fn enumerate_routes(
    nodes: &[LabelNode],
    links: &[RouteLink],
    palette: &Palette,
) -> Vec<IdentifiedRoute> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let mut successors: BTreeMap<&str, Vec<&RouteLink>> = BTreeMap::new();
    let mut in_degree: BTreeMap<&str, usize> = nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
    for link in links {
        successors
            .entry(link.source_id.as_str())
            .or_default()
            .push(link);
        if let Some(d) = in_degree.get_mut(link.target_id.as_str()) {
            *d += 1;
        }
    }

    // Entry labels in node order; a fully cyclic graph falls back to the
    // first node with the globally minimal in-degree, mirroring the layout
    // engine's cycle-breaking rule.
    let mut entries: Vec<&str> = nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| in_degree.get(id).copied() == Some(0))
        .collect();
    if entries.is_empty() {
        let min_degree = in_degree.values().copied().min().unwrap_or(0);
        if let Some(seed) = nodes
            .iter()
            .map(|n| n.id.as_str())
            .find(|id| in_degree.get(id).copied() == Some(min_degree))
        {
            entries.push(seed);
        }
    }

    let mut paths: Vec<Vec<String>> = Vec::new();
    for entry in entries {
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut stack: Vec<String> = Vec::new();
        let mut found = Vec::new();
        let mut fallback: Option<Vec<String>> = None;
        walk(
            entry,
            &successors,
            &mut visited,
            &mut stack,
            &mut found,
            &mut fallback,
        );
        if found.is_empty() {
            if let Some(path) = fallback {
                if !path.is_empty() {
                    found.push(path);
                }
            }
        }
        paths.extend(found);
    }

    paths
        .into_iter()
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(idx, path)| {
            let link_ids: BTreeSet<String> = path.into_iter().collect();
            let signature: String = link_ids.iter().cloned().collect::<Vec<_>>().join("|");
            IdentifiedRoute {
                id: format!("route-{}", idx),
                color: palette.color_for(&signature).to_string(),
                link_ids,
            }
        })
        .collect()
}

/// Cycle-safe DFS: nodes stay visited across siblings of the same
/// traversal, so each node is expanded once and route count stays bounded
/// by the edge count.
fn walk<'a>(
    node: &'a str,
    successors: &BTreeMap<&'a str, Vec<&'a RouteLink>>,
    visited: &mut BTreeSet<&'a str>,
    stack: &mut Vec<String>,
    found: &mut Vec<Vec<String>>,
    fallback: &mut Option<Vec<String>>,
) {
    visited.insert(node);
    let succs = successors.get(node).map(Vec::as_slice).unwrap_or(&[]);

    if succs.is_empty() {
        // terminal label: the current stack is one complete route
        if !stack.is_empty() {
            found.push(stack.clone());
        }
        return;
    }

    let mut advanced = false;
    for &link in succs {
        if visited.contains(link.target_id.as_str()) {
            continue;
        }
        stack.push(link.key());
        walk(link.target_id.as_str(), successors, visited, stack, found, fallback);
        stack.pop();
        advanced = true;
    }

    if !advanced {
        // every successor already visited: a cycle closed here; remember
        // the longest such dead-end path in case no terminal is reachable
        let longer = fallback.as_ref().map_or(true, |f| stack.len() > f.len());
        if longer {
            *fallback = Some(stack.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::layout::LayoutConfig;
    use crate::model::Block;
    use crate::routes::builder;

    fn routes(blocks: &[Block]) -> Vec<IdentifiedRoute> {
        let analysis = analyze(blocks);
        let nodes = builder::build_nodes(blocks, &analysis, &LayoutConfig::default());
        let links = builder::build_links(blocks, &analysis, &nodes);
        enumerate_routes(&nodes, &links, &Palette::default())
    }

    #[test]
    fn test_chain_yields_route() {
        let blocks = [Block::new(
            "b1",
            "label start:\n    jump middle\nlabel middle:\n    jump ending\nlabel ending:\n    return\n",
        )];
        let result = routes(&blocks);
        assert_eq!(result.len(), 1);
        assert!(result[0].link_ids.len() >= 2);
        assert!(result[0].link_ids.contains("b1:start-b1:middle"));
        assert!(result[0].link_ids.contains("b1:middle-b1:ending"));
        let color = &result[0].color;
        assert!(color.starts_with('#') && color.len() == 7);
    }

    #[test]
    fn test_branching_yields_multiple_routes() {
        let content = "label start:\n    menu:\n        \"Left\":\n            jump left\n        \"Right\":\n            jump right\nlabel left:\n    return\nlabel right:\n    return\n";
        let blocks = [Block::new("b1", content)];
        let result = routes(&blocks);
        assert_eq!(result.len(), 2);
        // shared prefix is allowed, distinct terminals are not shared
        assert_ne!(result[0].link_ids, result[1].link_ids);
    }

    #[test]
    fn test_link_ids_are_graph_edge_keys() {
        let blocks = [Block::new(
            "b1",
            "label start:\n    jump middle\nlabel middle:\n    jump ending\nlabel ending:\n    return\n",
        )];
        let analysis = analyze(&blocks);
        let nodes = builder::build_nodes(&blocks, &analysis, &LayoutConfig::default());
        let links = builder::build_links(&blocks, &analysis, &nodes);
        let result = enumerate_routes(&nodes, &links, &Palette::default());

        let edge_keys: Vec<String> = links.iter().map(RouteLink::key).collect();
        for id in &result[0].link_ids {
            assert!(edge_keys.contains(id));
        }
    }

    #[test]
    fn test_cycle_still_reports_a_route() {
        let blocks = [Block::new(
            "b1",
            "label a:\n    jump b\nlabel b:\n    jump a\n",
        )];
        let result = routes(&blocks);
        assert_eq!(result.len(), 1);
        assert!(!result[0].link_ids.is_empty());
    }

    #[test]
    fn test_isolated_label_produces_no_route() {
        let blocks = [Block::new("b1", "label start:\n    return\n")];
        let result = routes(&blocks);
        assert!(result.is_empty());
    }

    #[test]
    fn test_route_colors_deterministic() {
        let blocks = [Block::new(
            "b1",
            "label start:\n    jump ending\nlabel ending:\n    return\n",
        )];
        let first = routes(&blocks);
        let second = routes(&blocks);
        assert_eq!(first, second);
    }
}
