//! Core data model for the analysis engine
//!
//! Everything here is plain data: the engine consumes `Block`s and produces
//! an `AnalysisResult` with no behavior and no external handles, so the
//! whole output contract is serializable. All maps and sets are B-tree
//! collections so that iteration order, and therefore serialized output, is
//! deterministic for identical input.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One independently edited fragment of script text.
///
/// Blocks are owned by the caller (the editor); the engine only reads
/// `content`. `id` must be stable and unique across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub content: String,
    pub file_path: Option<String>,
}

impl Block {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            file_path: None,
        }
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// Whether a label-table entry came from a `label` header or a named `menu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Label,
    Menu,
}

/// A named entry point recorded in the global label table.
///
/// Lines are 1-based; `column` is the 0-based byte offset of the
/// `label`/`menu` keyword within its line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelLocation {
    pub block_id: String,
    pub label: String,
    pub line: usize,
    pub column: usize,
    pub kind: LabelKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JumpKind {
    Jump,
    Call,
}

/// One `jump`/`call` occurrence in a block.
///
/// `column_start` is the keyword's byte offset within the line,
/// `column_end` one past the end of the target word; editors use these for
/// inline decorations. A dynamic transfer (`jump expression <var>`) records
/// the literal word `expression` and is never resolved against the label
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpLocation {
    pub block_id: String,
    pub target: String,
    pub line: usize,
    pub column_start: usize,
    pub column_end: usize,
    pub kind: JumpKind,
    pub is_dynamic: bool,
}

/// A resolved inter-block edge: the jump target is a label defined in a
/// different block. One entry per distinct `(source, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source_id: String,
    pub target_id: String,
    pub target_label: String,
}

/// A character defined via `define <tag> = Character(...)`.
///
/// Presentation kwargs are stored raw (unquoted where the source quoted
/// them); a kwarg whose value is the literal `None` leaves its field unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub tag: String,
    pub name: String,
    pub color: String,
    pub defined_in_block_id: String,
    pub line: usize,
    pub profile: Option<String>,
    pub kind: Option<String>,
    pub image: Option<String>,
    pub voice_tag: Option<String>,
    pub who_prefix: Option<String>,
    pub who_suffix: Option<String>,
    pub what_prefix: Option<String>,
    pub what_suffix: Option<String>,
    pub who_style: Option<String>,
    pub what_style: Option<String>,
    pub window_style: Option<String>,
    pub dynamic: Option<String>,
    pub condition: Option<String>,
    pub slow: Option<String>,
    pub slow_abortable: Option<String>,
    pub afm: Option<String>,
    pub ctc: Option<String>,
    pub ctc_pause: Option<String>,
    pub ctc_position: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Define,
    Default,
}

/// A `define`/`default` variable assignment. `initial_value` is the raw
/// right-hand side, unparsed, with any trailing comment stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub kind: VariableKind,
    pub name: String,
    pub initial_value: String,
    pub defined_in_block_id: String,
    pub line: usize,
}

/// A `screen <name>(<params>):` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenDef {
    pub name: String,
    pub parameters: String,
    pub defined_in_block_id: String,
    pub line: usize,
}

/// An `image <name tokens> = ...` definition, keyed by the space-joined
/// name tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDef {
    pub name: String,
    pub defined_in_block_id: String,
    pub line: usize,
}

/// A dialogue line attributed to a character tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub line: usize,
    pub tag: String,
}

/// One usage site of a variable (excluding its definition line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableUsage {
    pub block_id: String,
    pub line: usize,
}

/// Coarse content categories present in a block, for editor iconography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    Label,
    Menu,
    Jump,
    Dialogue,
    Python,
}

/// Aggregate output of one analysis call.
///
/// Recomputed from scratch on every call; identical input yields identical
/// output, down to serialization bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Global label table, keyed by label name. Duplicate names follow
    /// last-write-wins, except that a plain label is never replaced by a
    /// named menu of the same name.
    pub labels: BTreeMap<String, LabelLocation>,
    /// All jump/call occurrences per block, in line order.
    pub jumps: BTreeMap<String, Vec<JumpLocation>>,
    /// Deduplicated inter-block links, in first-seen order.
    pub links: Vec<Link>,
    /// Unresolved jump targets per block, deduplicated, first-seen order.
    pub invalid_jumps: BTreeMap<String, Vec<String>>,
    /// First label defined in each block, where one exists.
    pub first_labels: BTreeMap<String, String>,
    pub root_block_ids: BTreeSet<String>,
    pub leaf_block_ids: BTreeSet<String>,
    pub branching_block_ids: BTreeSet<String>,
    pub story_block_ids: BTreeSet<String>,
    pub screen_only_block_ids: BTreeSet<String>,
    pub config_block_ids: BTreeSet<String>,
    pub characters: BTreeMap<String, Character>,
    /// Dialogue lines attributed to known characters, per block.
    pub dialogue_lines: BTreeMap<String, Vec<DialogueLine>>,
    /// Dialogue line count per character tag; defined-but-unused characters
    /// appear with a count of zero.
    pub character_usage: BTreeMap<String, usize>,
    pub variables: BTreeMap<String, Variable>,
    /// Usage sites per variable name, excluding the definition line, at
    /// most one per `(block, line)`.
    pub variable_usages: BTreeMap<String, Vec<VariableUsage>>,
    pub screens: BTreeMap<String, ScreenDef>,
    pub defined_images: BTreeMap<String, ImageDef>,
    pub block_types: BTreeMap<String, BTreeSet<BlockTag>>,
}

impl AnalysisResult {
    /// Jump occurrences recorded for a block (empty when none).
    pub fn jumps_for(&self, block_id: &str) -> &[JumpLocation] {
        self.jumps.get(block_id).map(Vec::as_slice).unwrap_or(&[])
    }
}
