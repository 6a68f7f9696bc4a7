//! Block classification
//!
//! Roots, leaves, and branching blocks come from the link graph and the
//! raw jump facts; the story / screen-only / config partition is strict:
//! every block lands in exactly one of the three sets.

use std::collections::BTreeSet;

use crate::model::{Block, BlockTag, Link};
use crate::scan::Extraction;

/// File basenames that count as story blocks even without a label
/// (dedicated variables/characters files).
pub const SPECIAL_STORY_FILES: [&str; 2] = ["variables.rpy", "characters.rpy"];

pub struct Classification {
    pub root_block_ids: BTreeSet<String>,
    pub leaf_block_ids: BTreeSet<String>,
    pub branching_block_ids: BTreeSet<String>,
    pub story_block_ids: BTreeSet<String>,
    pub screen_only_block_ids: BTreeSet<String>,
    pub config_block_ids: BTreeSet<String>,
}

pub fn classify(blocks: &[Block], extraction: &Extraction, links: &[Link]) -> Classification {
    let all_target_ids: BTreeSet<&str> = links.iter().map(|l| l.target_id.as_str()).collect();

    let mut root_block_ids = BTreeSet::new();
    let mut leaf_block_ids = BTreeSet::new();
    let mut branching_block_ids = BTreeSet::new();
    let mut story_block_ids = BTreeSet::new();
    let mut screen_only_block_ids = BTreeSet::new();
    let mut config_block_ids = BTreeSet::new();

    for block in blocks {
        let id = block.id.as_str();
        let tags = extraction.block_types.get(id);
        let has = |tag: BlockTag| tags.is_some_and(|t| t.contains(&tag));

        if !all_target_ids.contains(id) {
            root_block_ids.insert(block.id.clone());
        }

        // A leaf has no jump statements at all; a block whose only jump is
        // invalid is not a leaf.
        if extraction.jumps.get(id).map_or(true, |j| j.is_empty()) {
            leaf_block_ids.insert(block.id.clone());
        }

        let distinct_targets: BTreeSet<&str> = links
            .iter()
            .filter(|l| l.source_id == id)
            .map(|l| l.target_id.as_str())
            .collect();
        if has(BlockTag::Menu) || distinct_targets.len() > 1 {
            branching_block_ids.insert(block.id.clone());
        }

        // Strict partition: story > screen-only > config.
        if has(BlockTag::Label) || is_special_story_path(block.file_path.as_deref()) {
            story_block_ids.insert(block.id.clone());
        } else if extraction.screen_definers.contains(id) {
            screen_only_block_ids.insert(block.id.clone());
        } else {
            config_block_ids.insert(block.id.clone());
        }
    }

    Classification {
        root_block_ids,
        leaf_block_ids,
        branching_block_ids,
        story_block_ids,
        screen_only_block_ids,
        config_block_ids,
    }
}

fn is_special_story_path(path: Option<&str>) -> bool {
    let Some(path) = path else { return false };
    let basename = path.rsplit(['/', '\\']).next().unwrap_or(path);
    SPECIAL_STORY_FILES.contains(&basename)
}
