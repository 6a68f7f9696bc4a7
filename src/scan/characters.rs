//! Character definition scan
//!
//! `define <tag> = Character(<args>)` is the one construct whose argument
//! list may span multiple lines, so it gets its own whole-block pass. The
//! argument text is collected by balancing parentheses while respecting
//! both quote styles, then split on top-level commas into positionals and
//! `key=value` kwargs. An unparseable kwarg is silently skipped and the
//! character is still registered from whatever is recoverable.

use crate::model::Character;
use crate::palette::Palette;
use crate::scan::lexer::{lex_line, Token};

/// Scan one block for character definitions, in source order.
pub fn scan_block(block_id: &str, content: &str, palette: &Palette) -> Vec<Character> {
    let lines: Vec<&str> = content.lines().collect();
    let mut characters = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some((tag, after_paren)) = match_character_header(line) else {
            continue;
        };

        let Some(args) = collect_argument_text(&lines, idx, after_paren) else {
            continue; // unbalanced parens: nothing recoverable
        };

        let mut character = Character {
            tag: tag.clone(),
            name: tag.clone(),
            color: palette.color_for(&tag).to_string(),
            defined_in_block_id: block_id.to_string(),
            line: idx + 1,
            profile: find_profile(&lines, idx),
            ..Character::default()
        };
        apply_arguments(&mut character, &args);
        characters.push(character);
    }

    characters
}

/// Match `define <tag> = Character(` at the start of a line. Returns the
/// tag and the column just after the opening parenthesis.
fn match_character_header(line: &str) -> Option<(String, usize)> {
    let tokens = lex_line(line);
    match tokens.as_slice() {
        [(Token::Define, _), (Token::Ident(tag), _), (Token::Equals, _), (Token::Ident(ctor), _), (Token::ParenOpen, open_span), ..]
            if ctor == "Character" =>
        {
            Some((tag.clone(), open_span.end))
        }
        _ => None,
    }
}

/// Collect the argument text between the opening parenthesis and its
/// matching close, possibly across lines. Quote contents do not count
/// toward nesting.
fn collect_argument_text(lines: &[&str], start_idx: usize, start_col: usize) -> Option<String> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut out = String::new();

    for (idx, line) in lines.iter().enumerate().skip(start_idx) {
        let text: &str = if idx == start_idx { &line[start_col..] } else { line };
        for ch in text.chars() {
            if escaped {
                escaped = false;
                out.push(ch);
                continue;
            }
            match quote {
                Some(q) => {
                    if ch == '\\' {
                        escaped = true;
                    } else if ch == q {
                        quote = None;
                    }
                    out.push(ch);
                }
                None => match ch {
                    '"' | '\'' => {
                        quote = Some(ch);
                        out.push(ch);
                    }
                    '(' => {
                        depth += 1;
                        out.push(ch);
                    }
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(out);
                        }
                        out.push(ch);
                    }
                    _ => out.push(ch),
                },
            }
        }
        out.push('\n');
    }
    None
}

/// Split argument text on top-level commas (nested calls and strings keep
/// their commas).
pub fn split_arguments(args: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut current = String::new();

    for ch in args.chars() {
        if escaped {
            escaped = false;
            current.push(ch);
            continue;
        }
        match quote {
            Some(q) => {
                if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '(' | '[' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    pieces.push(current.trim().to_string());
                    current = String::new();
                }
                _ => current.push(ch),
            },
        }
    }
    let last = current.trim();
    if !last.is_empty() {
        pieces.push(last.to_string());
    }
    pieces
}

/// Split a `key=value` argument at a top-level single `=`. Returns None
/// for positional arguments (and for comparison operators).
fn split_kwarg(piece: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let bytes = piece.as_bytes();
    for (i, ch) in piece.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                '=' if depth == 0 => {
                    let next_eq = bytes.get(i + 1) == Some(&b'=');
                    let prev = if i == 0 { None } else { bytes.get(i - 1) };
                    let prev_op = matches!(prev, Some(b'=') | Some(b'!') | Some(b'<') | Some(b'>'));
                    if next_eq || prev_op {
                        return None;
                    }
                    return Some((piece[..i].trim(), piece[i + 1..].trim()));
                }
                _ => {}
            },
        }
    }
    None
}

/// Strip one layer of matching quotes.
fn unquote(value: &str) -> &str {
    let v = value.trim();
    if v.len() >= 2 {
        let first = v.chars().next().unwrap();
        if (first == '"' || first == '\'') && v.ends_with(first) {
            return &v[1..v.len() - 1];
        }
    }
    v
}

/// Apply the split argument list to a character. The first positional is
/// the display name; `name=None` or a missing name falls back to the tag.
fn apply_arguments(character: &mut Character, args: &str) {
    let mut saw_name = false;

    for (pos, piece) in split_arguments(args).iter().enumerate() {
        match split_kwarg(piece) {
            Some((key, value)) => apply_kwarg(character, key, value, &mut saw_name),
            None => {
                if pos == 0 {
                    let name = unquote(piece);
                    if name != "None" && !name.is_empty() {
                        character.name = name.to_string();
                    }
                    saw_name = true;
                }
                // other positionals carry no structural meaning here
            }
        }
    }
}

fn apply_kwarg(character: &mut Character, key: &str, value: &str, saw_name: &mut bool) {
    let value = unquote(value);
    if key == "name" {
        if value != "None" && !value.is_empty() && !*saw_name {
            character.name = value.to_string();
        }
        *saw_name = true;
        return;
    }
    if key == "color" {
        if value != "None" && !value.is_empty() {
            character.color = value.to_string();
        }
        return;
    }
    if value == "None" {
        return; // Ren'Py's own default; leave the field unset
    }
    let slot = match key {
        "kind" => &mut character.kind,
        "image" => &mut character.image,
        "voice_tag" => &mut character.voice_tag,
        "who_prefix" => &mut character.who_prefix,
        "who_suffix" => &mut character.who_suffix,
        "what_prefix" => &mut character.what_prefix,
        "what_suffix" => &mut character.what_suffix,
        "who_style" => &mut character.who_style,
        "what_style" => &mut character.what_style,
        "window_style" => &mut character.window_style,
        "dynamic" => &mut character.dynamic,
        "condition" => &mut character.condition,
        "slow" => &mut character.slow,
        "slow_abortable" => &mut character.slow_abortable,
        "afm" => &mut character.afm,
        "ctc" => &mut character.ctc,
        "ctc_pause" => &mut character.ctc_pause,
        "ctc_position" => &mut character.ctc_position,
        _ => return, // unknown kwarg: skip silently
    };
    *slot = Some(value.to_string());
}

/// Recover a profile string from an immediately preceding `# profile:`
/// comment, skipping blank lines.
fn find_profile(lines: &[&str], define_idx: usize) -> Option<String> {
    for line in lines[..define_idx].iter().rev() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        return trimmed
            .strip_prefix("# profile:")
            .map(|text| text.trim().to_string());
    }
    None
}
