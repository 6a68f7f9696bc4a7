//! Error and diagnostic types

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::model::{AnalysisResult, Block, JumpKind};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A resolvable problem found during analysis, tied to a source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub block_id: String,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    /// Format the diagnostic with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, self.span.clone()))
                    .with_message(&self.message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }
}

/// One diagnostic per unresolved static jump or call, in block order then
/// line order.
pub fn collect_diagnostics(blocks: &[Block], analysis: &AnalysisResult) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for block in blocks {
        let Some(invalid) = analysis.invalid_jumps.get(&block.id) else {
            continue;
        };
        for jump in analysis.jumps_for(&block.id) {
            if jump.is_dynamic || !invalid.contains(&jump.target) {
                continue;
            }
            let start = byte_offset(&block.content, jump.line, jump.column_start);
            let end = byte_offset(&block.content, jump.line, jump.column_end);
            let verb = match jump.kind {
                JumpKind::Jump => "jump",
                JumpKind::Call => "call",
            };
            diagnostics.push(Diagnostic {
                block_id: block.id.clone(),
                span: start..end,
                message: format!("{} target '{}' is not a known label", verb, jump.target),
            });
        }
    }
    diagnostics
}

/// Translate a (1-based line, byte column) location into an offset into
/// the whole block content.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (idx, text) in content.lines().enumerate() {
        if idx + 1 == line {
            return offset + column.min(text.len());
        }
        offset += text.len() + 1;
    }
    content.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    #[test]
    fn test_invalid_jump_produces_diagnostic() {
        let blocks = [Block::new("b1", "label start:\n    jump nowhere\n")];
        let analysis = analyze(&blocks);
        let diagnostics = collect_diagnostics(&blocks, &analysis);
        assert_eq!(diagnostics.len(), 1);
        let d = &diagnostics[0];
        assert_eq!(d.block_id, "b1");
        assert_eq!(
            &blocks[0].content[d.span.clone()],
            "jump nowhere"
        );
        assert!(d.message.contains("nowhere"));
    }

    #[test]
    fn test_resolved_jump_produces_none() {
        let blocks = [Block::new(
            "b1",
            "label start:\n    jump ending\nlabel ending:\n    return\n",
        )];
        let analysis = analyze(&blocks);
        assert!(collect_diagnostics(&blocks, &analysis).is_empty());
    }

    #[test]
    fn test_format_renders_source_context() {
        let blocks = [Block::new("script.rpy", "label start:\n    jump missing\n")];
        let analysis = analyze(&blocks);
        let diagnostics = collect_diagnostics(&blocks, &analysis);
        let rendered = diagnostics[0].format(&blocks[0].content, "script.rpy");
        assert!(rendered.contains("missing"));
        assert!(rendered.contains("script.rpy"));
    }

    #[test]
    fn test_byte_offset_spans_lines() {
        let content = "first\nsecond\n";
        assert_eq!(byte_offset(content, 1, 0), 0);
        assert_eq!(byte_offset(content, 2, 0), 6);
        assert_eq!(byte_offset(content, 2, 3), 9);
    }
}
