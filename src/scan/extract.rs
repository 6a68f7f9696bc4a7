//! Phase-1 lexical extraction
//!
//! One pass over every line of every block, producing the global tables the
//! resolver and route builder consume. This phase has no cross-block data
//! dependency; the global label table must be complete before any
//! resolution starts (hard phase barrier).

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    Block, BlockTag, Character, DialogueLine, ImageDef, JumpKind, JumpLocation, LabelKind,
    LabelLocation, ScreenDef, Variable, VariableKind,
};
use crate::palette::Palette;
use crate::scan::characters;
use crate::scan::lexer::{lex_line, Span, Token};

/// Everything phase 1 knows, before cross-reference resolution.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Global label table, keyed by label name.
    pub labels: BTreeMap<String, LabelLocation>,
    pub first_labels: BTreeMap<String, String>,
    /// Jump/call occurrences per block, in line order.
    pub jumps: BTreeMap<String, Vec<JumpLocation>>,
    pub characters: BTreeMap<String, Character>,
    pub variables: BTreeMap<String, Variable>,
    pub screens: BTreeMap<String, ScreenDef>,
    /// Blocks that define at least one screen. Tracked separately because
    /// `screens` is keyed by name and a shadowed definition drops its
    /// block from that map.
    pub screen_definers: BTreeSet<String>,
    pub defined_images: BTreeMap<String, ImageDef>,
    /// Dialogue candidates per block: any `<word> "..."` line. The usage
    /// indexer keeps only the ones whose word is a defined character tag.
    pub speech: BTreeMap<String, Vec<DialogueLine>>,
    pub block_types: BTreeMap<String, BTreeSet<BlockTag>>,
}

/// Run the extraction over all blocks, in input order.
pub fn extract(blocks: &[Block], palette: &Palette) -> Extraction {
    let mut ex = Extraction::default();

    for block in blocks {
        // Multi-line pattern scan first: Character argument lists may span
        // lines, which the line scan below cannot see.
        for character in characters::scan_block(&block.id, &block.content, palette) {
            ex.characters.insert(character.tag.clone(), character);
        }

        scan_lines(block, &mut ex);
    }

    ex
}

fn scan_lines(block: &Block, ex: &mut Extraction) {
    let mut tags = BTreeSet::new();

    for (idx, line) in block.content.lines().enumerate() {
        let line_no = idx + 1;
        let tokens = lex_line(line);
        if tokens.is_empty() {
            continue;
        }

        match tokens.as_slice() {
            // label X:
            [(Token::Label, kw_span), (Token::Ident(name), _), rest @ ..] if has_colon(rest) => {
                tags.insert(BlockTag::Label);
                upsert_label(
                    &mut ex.labels,
                    LabelLocation {
                        block_id: block.id.clone(),
                        label: name.clone(),
                        line: line_no,
                        column: kw_span.start,
                        kind: LabelKind::Label,
                    },
                );
                ex.first_labels
                    .entry(block.id.clone())
                    .or_insert_with(|| name.clone());
            }

            // menu X:   (named menus are jump targets too)
            [(Token::Menu, kw_span), (Token::Ident(name), _), rest @ ..] if has_colon(rest) => {
                tags.insert(BlockTag::Menu);
                upsert_label(
                    &mut ex.labels,
                    LabelLocation {
                        block_id: block.id.clone(),
                        label: name.clone(),
                        line: line_no,
                        column: kw_span.start,
                        kind: LabelKind::Menu,
                    },
                );
            }

            // menu:
            [(Token::Menu, _), ..] => {
                tags.insert(BlockTag::Menu);
            }

            // screen X(params): / screen X:
            [(Token::Screen, _), (Token::Ident(name), _), rest @ ..] if has_colon(rest) => {
                ex.screen_definers.insert(block.id.clone());
                ex.screens.insert(
                    name.clone(),
                    ScreenDef {
                        name: name.clone(),
                        parameters: screen_parameters(line, rest),
                        defined_in_block_id: block.id.clone(),
                        line: line_no,
                    },
                );
            }

            // define X = ... / default X = ...  (Character handled above)
            [(Token::Define, _), rest @ ..] => {
                scan_variable(block, line, line_no, VariableKind::Define, rest, ex);
            }
            [(Token::Default, _), rest @ ..] => {
                scan_variable(block, line, line_no, VariableKind::Default, rest, ex);
            }

            // image a b c = ...
            [(Token::Image, _), rest @ ..] => {
                scan_image(block, line_no, rest, ex);
            }

            // e "dialogue"
            [(Token::Ident(tag), _), (Token::Str(_), _), ..] => {
                tags.insert(BlockTag::Dialogue);
                ex.speech
                    .entry(block.id.clone())
                    .or_default()
                    .push(DialogueLine {
                        line: line_no,
                        tag: tag.clone(),
                    });
            }

            // "narration"
            [(Token::Str(_), _), ..] => {
                tags.insert(BlockTag::Dialogue);
            }

            [(Token::Dollar, _), ..] | [(Token::Python, _), ..] => {
                tags.insert(BlockTag::Python);
            }

            _ => {}
        }

        scan_jumps(block, line_no, &tokens, ex, &mut tags);
    }

    ex.block_types.insert(block.id.clone(), tags);
}

/// Record every `jump <word>` / `call <word>` occurrence on the line.
/// Strings and comments are atomic tokens, so targets inside them are
/// invisible here by construction.
fn scan_jumps(
    block: &Block,
    line_no: usize,
    tokens: &[(Token, Span)],
    ex: &mut Extraction,
    tags: &mut BTreeSet<BlockTag>,
) {
    for window in tokens.windows(2) {
        let (kw, kw_span) = &window[0];
        let kind = match kw {
            Token::Jump => JumpKind::Jump,
            Token::Call => JumpKind::Call,
            _ => continue,
        };
        let (next, next_span) = &window[1];
        let Some(target) = next.word() else { continue };

        tags.insert(BlockTag::Jump);
        ex.jumps
            .entry(block.id.clone())
            .or_default()
            .push(JumpLocation {
                block_id: block.id.clone(),
                target: target.to_string(),
                line: line_no,
                column_start: kw_span.start,
                column_end: next_span.end,
                kind,
                is_dynamic: target == "expression",
            });
    }
}

fn scan_variable(
    block: &Block,
    line: &str,
    line_no: usize,
    kind: VariableKind,
    rest: &[(Token, Span)],
    ex: &mut Extraction,
) {
    // Name: Ident (. Ident)* followed by `=`
    let mut name_parts = Vec::new();
    let mut i = 0;
    loop {
        match rest.get(i) {
            Some((Token::Ident(part), _)) => name_parts.push(part.clone()),
            _ => return,
        }
        match rest.get(i + 1) {
            Some((Token::Dot, _)) => i += 2,
            Some((Token::Equals, _)) => {
                i += 1;
                break;
            }
            _ => return,
        }
    }
    let eq_span = &rest[i].1;

    // Negative lookahead: `define e = Character(...)` is a character, not
    // a variable.
    if matches!(
        (rest.get(i + 1), rest.get(i + 2)),
        (Some((Token::Ident(ctor), _)), Some((Token::ParenOpen, _))) if ctor == "Character"
    ) {
        return;
    }

    // The raw right-hand side, with any trailing comment stripped.
    let mut value_end = line.len();
    for (tok, span) in rest {
        if *tok == Token::Comment {
            value_end = span.start;
            break;
        }
    }
    let initial_value = line[eq_span.end..value_end].trim().to_string();

    let name = name_parts.join(".");
    ex.variables.insert(
        name.clone(),
        Variable {
            kind,
            name,
            initial_value,
            defined_in_block_id: block.id.clone(),
            line: line_no,
        },
    );
}

/// `image <name tokens> = ...`: the key is the space-joined name tokens.
fn scan_image(block: &Block, line_no: usize, rest: &[(Token, Span)], ex: &mut Extraction) {
    let mut name_parts = Vec::new();
    let mut saw_equals = false;
    for (tok, _) in rest {
        if *tok == Token::Equals {
            saw_equals = true;
            break;
        }
        match tok.word() {
            Some(w) => name_parts.push(w.to_string()),
            None => return,
        }
    }
    if saw_equals && !name_parts.is_empty() {
        let name = name_parts.join(" ");
        ex.defined_images.insert(
            name.clone(),
            ImageDef {
                name,
                defined_in_block_id: block.id.clone(),
                line: line_no,
            },
        );
    }
}

fn has_colon(rest: &[(Token, Span)]) -> bool {
    rest.iter().any(|(t, _)| *t == Token::Colon)
}

/// Recover the raw parameter text of a screen header from the original
/// line, using the parenthesis token spans. Empty when the screen takes no
/// parameters.
fn screen_parameters(line: &str, rest: &[(Token, Span)]) -> String {
    let mut open = None;
    let mut depth = 0usize;
    for (tok, span) in rest {
        match tok {
            Token::ParenOpen => {
                if depth == 0 {
                    open = Some(span.end);
                }
                depth += 1;
            }
            Token::ParenClose => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(start) = open {
                        return line[start..span.start].trim().to_string();
                    }
                }
            }
            Token::Colon if depth == 0 => break,
            _ => {}
        }
    }
    String::new()
}

/// Insert a label into the global table. Last write wins, except that a
/// plain-label entry is never replaced by a named menu of the same name.
fn upsert_label(labels: &mut BTreeMap<String, LabelLocation>, incoming: LabelLocation) {
    if let Some(existing) = labels.get(&incoming.label) {
        if existing.kind == LabelKind::Label && incoming.kind == LabelKind::Menu {
            return;
        }
    }
    labels.insert(incoming.label.clone(), incoming);
}
