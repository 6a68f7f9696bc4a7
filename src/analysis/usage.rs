//! Usage indexing for characters and variables
//!
//! Dialogue counts start at zero for every defined character so unused
//! characters still appear in the result. Variable usage is a word-boundary
//! text scan over every line of every block, skipping each variable's own
//! definition line.

use std::collections::BTreeMap;

use crate::model::{Block, DialogueLine, VariableUsage};
use crate::scan::Extraction;

pub struct UsageIndex {
    pub character_usage: BTreeMap<String, usize>,
    pub dialogue_lines: BTreeMap<String, Vec<DialogueLine>>,
    pub variable_usages: BTreeMap<String, Vec<VariableUsage>>,
}

pub fn index(blocks: &[Block], extraction: &Extraction) -> UsageIndex {
    let mut character_usage: BTreeMap<String, usize> = extraction
        .characters
        .keys()
        .map(|tag| (tag.clone(), 0))
        .collect();

    let mut dialogue_lines: BTreeMap<String, Vec<DialogueLine>> = BTreeMap::new();
    for block in blocks {
        let Some(candidates) = extraction.speech.get(&block.id) else {
            continue;
        };
        for speech in candidates {
            let Some(count) = character_usage.get_mut(&speech.tag) else {
                continue; // leading word is not a defined character
            };
            *count += 1;
            dialogue_lines
                .entry(block.id.clone())
                .or_default()
                .push(speech.clone());
        }
    }

    let mut variable_usages: BTreeMap<String, Vec<VariableUsage>> = BTreeMap::new();
    for variable in extraction.variables.values() {
        let mut sites = Vec::new();
        for block in blocks {
            for (idx, line) in block.content.lines().enumerate() {
                let line_no = idx + 1;
                if block.id == variable.defined_in_block_id && line_no == variable.line {
                    continue; // the definition site is not a usage
                }
                if contains_word(line, &variable.name) {
                    sites.push(VariableUsage {
                        block_id: block.id.clone(),
                        line: line_no,
                    });
                }
            }
        }
        variable_usages.insert(variable.name.clone(), sites);
    }

    UsageIndex {
        character_usage,
        dialogue_lines,
        variable_usages,
    }
}

/// Word-boundary containment: `name` occurs in `line` with no word
/// character on either side.
fn contains_word(line: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let bytes = line.as_bytes();
    let mut from = 0;
    while let Some(pos) = line[from..].find(name) {
        let at = from + pos;
        let end = at + name.len();
        let before_ok = at == 0 || !is_word_byte(bytes[at - 1]);
        let after_ok = end >= bytes.len() || !is_word_byte(bytes[end]);
        if before_ok && after_ok {
            return true;
        }
        from = at + 1;
    }
    false
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
