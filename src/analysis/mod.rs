//! Analysis pipeline: extraction, resolution, classification, usage
//!
//! `analyze` is a pure function of the block list: no state survives the
//! call, identical input yields identical output. Extraction runs to
//! completion over every block before any resolution begins.

pub mod classify;
pub mod resolve;
pub mod usage;

pub use classify::SPECIAL_STORY_FILES;

use crate::model::{AnalysisResult, Block};
use crate::palette::Palette;
use crate::scan;

/// Run the full analysis with the default palette.
pub fn analyze(blocks: &[Block]) -> AnalysisResult {
    analyze_with_palette(blocks, &Palette::default())
}

/// Run the full analysis; the palette supplies default character colors.
pub fn analyze_with_palette(blocks: &[Block], palette: &Palette) -> AnalysisResult {
    // Phase 1: lexical extraction across all blocks (hard phase barrier:
    // the label table must be complete before resolution starts).
    let extraction = scan::extract(blocks, palette);

    // Phase 2: cross-reference resolution and the derived indexes.
    let resolution = resolve::resolve(blocks, &extraction);
    let classes = classify::classify(blocks, &extraction, &resolution.links);
    let usage = usage::index(blocks, &extraction);

    AnalysisResult {
        labels: extraction.labels,
        jumps: extraction.jumps,
        links: resolution.links,
        invalid_jumps: resolution.invalid_jumps,
        first_labels: extraction.first_labels,
        root_block_ids: classes.root_block_ids,
        leaf_block_ids: classes.leaf_block_ids,
        branching_block_ids: classes.branching_block_ids,
        story_block_ids: classes.story_block_ids,
        screen_only_block_ids: classes.screen_only_block_ids,
        config_block_ids: classes.config_block_ids,
        characters: extraction.characters,
        dialogue_lines: usage.dialogue_lines,
        character_usage: usage.character_usage,
        variables: extraction.variables,
        variable_usages: usage.variable_usages,
        screens: extraction.screens,
        defined_images: extraction.defined_images,
        block_types: extraction.block_types,
    }
}
