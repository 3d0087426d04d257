//! Output formats for tokens and diagnostics.

use miette::{MietteError, MietteSpanContents, SourceCode, SourceSpan, SpanContents};
use rill_core::text::TextPos;
use rill_core::{LineMap, SourceFile};
use rill_diagnostics::{Diagnostic, DiagnosticCollection};
use rill_scanner::{Token, TokenKind};
use serde::Serialize;
use std::io::{self, Write};

// ANSI color codes
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// One line per token: `<lexeme>\t<KIND>`.
pub fn write_tokens<W: Write>(out: &mut W, tokens: &[Token<'_>]) -> io::Result<()> {
    for token in tokens {
        writeln!(out, "{}", token)?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct JsonToken<'a> {
    kind: TokenKind,
    lexeme: &'a str,
    line: u32,
    column: u32,
    start: u32,
    end: u32,
}

/// All tokens as a pretty-printed JSON array.
pub fn write_json<W: Write>(out: &mut W, source: &SourceFile, tokens: &[Token<'_>]) -> io::Result<()> {
    let line_map = LineMap::new(source.text());
    let records: Vec<JsonToken<'_>> = tokens
        .iter()
        .map(|token| JsonToken {
            kind: token.kind,
            lexeme: token.lexeme,
            line: token.line,
            column: line_map.line_and_column_of(token.span.start).column,
            start: token.span.start,
            end: token.span.end(),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)
}

/// Plain `Syntax Error: <message> at line <n>` on stderr.
pub fn print_diagnostic(diag: &Diagnostic, use_color: bool) {
    if use_color {
        eprintln!(
            "{}{}Syntax Error{}: {} at line {}",
            BOLD, RED, RESET, diag.message_text, diag.line
        );
    } else {
        eprintln!("{}", diag);
    }
}

/// Bytes of source kept on each side of a label in a pretty report.
const CONTEXT_BYTES: usize = 120;

/// The slice of the source one report shows.
///
/// Spans handed to [`SourceCode::read_span`] are offsets into the whole
/// source; the contents it returns carry whole-file line and column numbers.
#[derive(Debug)]
struct Snippet {
    name: String,
    text: String,
    /// Byte offset of `text` in the source.
    offset: usize,
    /// 0-based line and column of the first byte of `text`.
    line: usize,
    column: usize,
}

impl Snippet {
    /// Cut out the label plus up to one line and [`CONTEXT_BYTES`] of
    /// context on each side.
    fn around(name: &str, text: &str, line_map: &LineMap, start: usize, end: usize) -> Self {
        let line = line_map.line_of(start as TextPos);
        let context_line = line_map
            .line_start(line.saturating_sub(1).max(1))
            .map_or(0, |pos| pos as usize);
        let begin = ceil_char_boundary(text, context_line.max(start.saturating_sub(CONTEXT_BYTES)));

        let limit = floor_char_boundary(text, end.saturating_add(CONTEXT_BYTES));
        let finish = text[end..limit]
            .match_indices('\n')
            .nth(1)
            .map_or(limit, |(i, _)| end + i);

        let at = line_map.line_and_column_of(begin as TextPos);
        Self {
            name: name.to_string(),
            text: text[begin..finish].to_string(),
            offset: begin,
            line: at.line as usize - 1,
            column: at.column as usize - 1,
        }
    }
}

impl SourceCode for Snippet {
    fn read_span<'a>(
        &'a self,
        span: &SourceSpan,
        context_lines_before: usize,
        context_lines_after: usize,
    ) -> Result<Box<dyn SpanContents<'a> + 'a>, MietteError> {
        let local = SourceSpan::new(span.offset().saturating_sub(self.offset).into(), span.len());
        let inner = self.text.read_span(&local, context_lines_before, context_lines_after)?;
        let column = if inner.line() == 0 {
            self.column + inner.column()
        } else {
            inner.column()
        };
        Ok(Box::new(MietteSpanContents::new_named(
            self.name.clone(),
            inner.data(),
            SourceSpan::new((inner.span().offset() + self.offset).into(), inner.span().len()),
            self.line + inner.line(),
            column,
            inner.line_count(),
        )))
    }
}

fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

fn ceil_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

/// A scan diagnostic rendered by miette with a label on the source.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(rill::scan))]
pub struct ScanReport {
    message: String,
    #[source_code]
    src: Snippet,
    #[label("here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
}

impl ScanReport {
    pub fn new(name: &str, text: &str, line_map: &LineMap, diag: &Diagnostic) -> Self {
        let (start, end) = match diag.span {
            Some(span) => {
                let range = span.to_range();
                let end = floor_char_boundary(text, range.end.min(range.start + CONTEXT_BYTES));
                (range.start, end.max(range.start))
            }
            None => {
                let start = line_map.line_start(diag.line).map_or(text.len(), |pos| pos as usize);
                (start, start)
            }
        };
        Self {
            message: diag.message_text.clone(),
            src: Snippet::around(name, text, line_map, start, end),
            span: diag.span.map(|_| SourceSpan::from((start, end - start))),
            help: Some(format!("R{} reported at line {}", diag.code, diag.line)),
        }
    }
}

/// Print every diagnostic as a miette report.
pub fn print_reports(source: &SourceFile, diagnostics: &DiagnosticCollection) {
    let name = source.name();
    let line_map = LineMap::new(source.text());
    for diag in diagnostics {
        let report = miette::Report::new(ScanReport::new(&name, source.text(), &line_map, diag));
        eprintln!("{:?}", report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rill_scanner::scan;

    #[test]
    fn test_write_tokens() {
        let result = scan("a `xor` b;");
        let mut out = Vec::new();
        write_tokens(&mut out, result.tokens()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a\tIDENTIFIER\n`xor`\tBIT_XOR\nb\tIDENTIFIER\n;\tSEMICOLON\n"
        );
    }

    #[test]
    fn test_write_json() {
        let source = SourceFile::new("t.rl", "x\n  += 1");
        let result = scan(source.text());
        let mut out = Vec::new();
        write_json(&mut out, &source, result.tokens()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let tokens = value.as_array().unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1]["kind"], "PLUS_EQUAL");
        assert_eq!(tokens[1]["lexeme"], "+=");
        assert_eq!(tokens[1]["line"], 2);
        assert_eq!(tokens[1]["column"], 3);
        assert_eq!(tokens[1]["start"], 4);
        assert_eq!(tokens[1]["end"], 6);
    }

    fn report_for(text: &str, index: usize) -> ScanReport {
        let result = scan(text);
        let diag = &result.diagnostics().diagnostics()[index];
        ScanReport::new("t.rl", text, &LineMap::new(text), diag)
    }

    #[test]
    fn test_scan_report_carries_span() {
        let report = report_for("x = \"abc", 0);
        assert_eq!(report.to_string(), "Unterminated string");
        assert_eq!(report.span, Some(SourceSpan::from((4, 4))));
        assert_eq!(report.help.as_deref(), Some("R1002 reported at line 1"));
    }

    #[test]
    fn test_snippet_keeps_whole_file_lines() {
        let report = report_for("a\nb\n@ c\nd\ne", 0);
        assert_eq!(report.src.text, "b\n@ c\nd");
        let span = report.span.unwrap();
        assert_eq!(span, SourceSpan::from((4, 1)));

        let contents = report.src.read_span(&span, 0, 0).unwrap();
        assert_eq!(contents.line(), 2);
        assert_eq!(contents.column(), 0);
        assert_eq!(contents.span().offset(), 4);
        assert_eq!(contents.name(), Some("t.rl"));
    }

    #[test]
    fn test_snippet_is_bounded_on_long_lines() {
        let text = "@".repeat(10_000);
        let report = report_for(&text, 5_000);
        assert_eq!(report.span, Some(SourceSpan::from((5_000, 1))));
        assert!(report.src.text.len() <= 2 * CONTEXT_BYTES + 1);

        let contents = report.src.read_span(&report.span.unwrap(), 0, 0).unwrap();
        assert_eq!(contents.line(), 0);
        assert_eq!(contents.column(), 5_000);
    }

    #[test]
    fn test_long_unterminated_string_label_is_clipped() {
        let text = format!("x = \"{}", "é".repeat(1_000));
        let report = report_for(&text, 0);
        let span = report.span.unwrap();
        assert_eq!(span.offset(), 4);
        assert!(span.len() <= CONTEXT_BYTES);
        assert!(text.is_char_boundary(span.offset() + span.len()));
    }
}
