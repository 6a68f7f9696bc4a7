//! Line lexer for narrative script text using logos
//!
//! The extractor is line-oriented: each line of a block is lexed
//! independently and token spans are byte offsets within that line, which
//! is exactly what editors need for inline decorations. String literals
//! (both quote styles) and `#` comments lex as single tokens, so a `jump`
//! inside dialogue text or a trailing comment can never be mistaken for a
//! statement.

use logos::Logos;

/// Byte range within a single line
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    // Statement keywords
    #[token("label")]
    Label,
    #[token("menu")]
    Menu,
    #[token("screen")]
    Screen,
    #[token("define")]
    Define,
    #[token("default")]
    Default,
    #[token("image")]
    Image,
    #[token("jump")]
    Jump,
    #[token("call")]
    Call,
    #[token("return")]
    Return,
    #[token("python")]
    Python,

    // One-line python statement marker
    #[token("$")]
    Dollar,

    // Delimiters
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    Str(String),

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    // A comment runs to the end of the line; nothing after it is scanned
    #[regex(r"#[^\n]*")]
    Comment,
}

impl Token {
    /// The word a token contributes when it appears where `\w+` is
    /// expected. Keywords are ordinary words in that position (so
    /// `call screen x` records the target `screen`).
    pub fn word(&self) -> Option<&str> {
        match self {
            Token::Ident(s) => Some(s),
            Token::Label => Some("label"),
            Token::Menu => Some("menu"),
            Token::Screen => Some("screen"),
            Token::Define => Some("define"),
            Token::Default => Some("default"),
            Token::Image => Some("image"),
            Token::Jump => Some("jump"),
            Token::Call => Some("call"),
            Token::Return => Some("return"),
            Token::Python => Some("python"),
            _ => None,
        }
    }
}

/// Lex one line into tokens with byte spans, dropping unrecognized input.
pub fn lex_line(line: &str) -> Vec<(Token, Span)> {
    Token::lexer(line)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
        .collect()
}

/// Leading whitespace width of a line, in bytes.
pub fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<Token> {
        lex_line(line).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_label_header() {
        assert_eq!(
            tokens("label start:"),
            vec![Token::Label, Token::Ident("start".to_string()), Token::Colon]
        );
    }

    #[test]
    fn test_keywords_vs_identifiers() {
        assert_eq!(
            tokens("labels jumper"),
            vec![
                Token::Ident("labels".to_string()),
                Token::Ident("jumper".to_string())
            ]
        );
    }

    #[test]
    fn test_string_is_single_token() {
        assert_eq!(
            tokens(r#""You should jump over the log""#),
            vec![Token::Str("You should jump over the log".to_string())]
        );
    }

    #[test]
    fn test_single_quoted_string() {
        assert_eq!(
            tokens("'hello there'"),
            vec![Token::Str("hello there".to_string())]
        );
    }

    #[test]
    fn test_comment_swallows_rest_of_line() {
        assert_eq!(
            tokens("return # then jump nowhere"),
            vec![Token::Return, Token::Comment]
        );
    }

    #[test]
    fn test_jump_statement_spans() {
        let toks = lex_line("    jump chapter1");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].0, Token::Jump);
        assert_eq!(toks[0].1, 4..8);
        assert_eq!(toks[1].0, Token::Ident("chapter1".to_string()));
        assert_eq!(toks[1].1, 9..17);
    }

    #[test]
    fn test_dialogue_line() {
        assert_eq!(
            tokens(r#"e "Hello, world.""#),
            vec![
                Token::Ident("e".to_string()),
                Token::Str("Hello, world.".to_string())
            ]
        );
    }

    #[test]
    fn test_python_one_liner() {
        assert_eq!(
            tokens("$ flag = True"),
            vec![
                Token::Dollar,
                Token::Ident("flag".to_string()),
                Token::Equals,
                Token::Ident("True".to_string())
            ]
        );
    }

    #[test]
    fn test_keyword_word_form() {
        assert_eq!(Token::Screen.word(), Some("screen"));
        assert_eq!(Token::Ident("x".to_string()).word(), Some("x"));
        assert_eq!(Token::Colon.word(), None);
    }

    #[test]
    fn test_indent_of() {
        assert_eq!(indent_of("    jump x"), 4);
        assert_eq!(indent_of("label start:"), 0);
    }

    #[test]
    fn test_unrecognized_input_dropped() {
        // Brackets and interpolation syntax are not statements; they lex
        // away without breaking the surrounding tokens.
        let toks = tokens("show eileen happy at right [b]");
        assert!(toks.contains(&Token::Ident("eileen".to_string())));
    }
}
