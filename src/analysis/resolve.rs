//! Cross-reference resolution
//!
//! Phase 2: each non-dynamic jump occurrence is resolved against the
//! complete global label table. A hit in a different block upserts a
//! deduplicated inter-block link; a hit in the same block needs no edge; a
//! miss is recorded as an invalid jump. Errors are data, never failures.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Block, Link};
use crate::scan::Extraction;

/// Deduplicated links plus per-block unresolved targets, both in
/// first-seen order over blocks then lines.
pub struct Resolution {
    pub links: Vec<Link>,
    pub invalid_jumps: BTreeMap<String, Vec<String>>,
}

pub fn resolve(blocks: &[Block], extraction: &Extraction) -> Resolution {
    let mut links = Vec::new();
    let mut seen_links: BTreeSet<(String, String)> = BTreeSet::new();
    let mut invalid_jumps: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for block in blocks {
        let Some(jumps) = extraction.jumps.get(&block.id) else {
            continue;
        };
        for jump in jumps {
            if jump.is_dynamic {
                continue; // target is runtime-determined; nothing to resolve
            }
            match extraction.labels.get(&jump.target) {
                Some(label) if label.block_id == block.id => {
                    // intra-block jump: no rendered edge needed
                }
                Some(label) => {
                    let key = (block.id.clone(), label.block_id.clone());
                    if seen_links.insert(key) {
                        links.push(Link {
                            source_id: block.id.clone(),
                            target_id: label.block_id.clone(),
                            target_label: jump.target.clone(),
                        });
                    }
                }
                None => {
                    let entry = invalid_jumps.entry(block.id.clone()).or_default();
                    if !entry.contains(&jump.target) {
                        entry.push(jump.target.clone());
                    }
                }
            }
        }
    }

    Resolution {
        links,
        invalid_jumps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use crate::scan;

    fn run(blocks: &[Block]) -> Resolution {
        let ex = scan::extract(blocks, &Palette::default());
        resolve(blocks, &ex)
    }

    #[test]
    fn test_cross_block_link() {
        let blocks = [
            Block::new("b1", "label start:\n    jump chapter1\n"),
            Block::new("b2", "label chapter1:\n    \"Hi\"\n"),
        ];
        let res = run(&blocks);
        assert_eq!(res.links.len(), 1);
        assert_eq!(res.links[0].source_id, "b1");
        assert_eq!(res.links[0].target_id, "b2");
        assert_eq!(res.links[0].target_label, "chapter1");
        assert!(res.invalid_jumps.is_empty());
    }

    #[test]
    fn test_duplicate_jump_deduplicated() {
        let blocks = [
            Block::new("b1", "label start:\n    jump chapter1\n    jump chapter1\n"),
            Block::new("b2", "label chapter1:\n"),
        ];
        let res = run(&blocks);
        assert_eq!(res.links.len(), 1);
    }

    #[test]
    fn test_intra_block_jump_makes_no_link() {
        let blocks = [Block::new("b1", "label start:\n    jump ending\nlabel ending:\n")];
        let res = run(&blocks);
        assert!(res.links.is_empty());
        assert!(res.invalid_jumps.is_empty());
    }

    #[test]
    fn test_invalid_jump_recorded_once() {
        let blocks = [Block::new(
            "b1",
            "label start:\n    jump nowhere\n    jump nowhere\n",
        )];
        let res = run(&blocks);
        assert!(res.links.is_empty());
        assert_eq!(res.invalid_jumps["b1"], vec!["nowhere".to_string()]);
    }

    #[test]
    fn test_dynamic_jump_not_resolved() {
        let blocks = [Block::new("b1", "label start:\n    jump expression dest\n")];
        let res = run(&blocks);
        assert!(res.links.is_empty());
        // "expression" must never be looked up or reported
        assert!(res.invalid_jumps.get("b1").is_none());
    }
}
