//! rill_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Scanning problems are data, not control flow: the scanner hands every
//! malformed lexeme to a [`DiagnosticSink`] and keeps going. The default sink
//! is [`DiagnosticCollection`], which the scan result carries back to the
//! caller so it can decide for itself whether the input was acceptable.

use rill_core::text::TextSpan;
use std::fmt;

/// A diagnostic message template with a code.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1002).
    pub code: u32,
    /// The message text.
    pub message: &'static str,
}

/// A realized diagnostic with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line the scanner was on when it detected the problem.
    pub line: u32,
    /// The source span of the offending lexeme, if known.
    pub span: Option<TextSpan>,
    /// The message text.
    pub message_text: String,
    /// The diagnostic code.
    pub code: u32,
}

impl Diagnostic {
    /// Create a diagnostic reported at `line`.
    pub fn new(message: &DiagnosticMessage, line: u32) -> Self {
        Self {
            line,
            span: None,
            message_text: message.message.to_string(),
            code: message.code,
        }
    }

    /// Attach the span of the offending source text.
    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syntax Error: {} at line {}", self.message_text, self.line)
    }
}

/// Receiver for diagnostics produced while scanning.
///
/// Reporting never fails and never stops the scanner.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// A collection of diagnostics accumulated during scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Every scanner diagnostic is an error, so any entry counts.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Sort diagnostics by line, then by position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by_key(|d| (d.line, d.span.map_or(0, |s| s.start)));
    }
}

impl DiagnosticSink for DiagnosticCollection {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.add(diagnostic);
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $msg:expr) => {
            DiagnosticMessage { code: $code, message: $msg }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1099)
    // ========================================================================
    pub const UNIDENTIFIED_TOKEN: DiagnosticMessage = diag!(1001, "Unidentified token");
    pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(1002, "Unterminated string");
    pub const UNTERMINATED_MULTI_LINE_COMMENT: DiagnosticMessage = diag!(1003, "Unterminated multi line comment");
    pub const UNTERMINATED_BACKTICK_OPERATOR: DiagnosticMessage = diag!(1004, "Unterminated backtick operator");
    pub const UNIDENTIFIED_BACKTICK_OPERATOR: DiagnosticMessage = diag!(1005, "Unidentified backtick operator");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(&messages::UNTERMINATED_STRING, 3);
        assert_eq!(diag.to_string(), "Syntax Error: Unterminated string at line 3");
    }

    #[test]
    fn test_diagnostic_without_span() {
        let diag = Diagnostic::new(&messages::UNIDENTIFIED_TOKEN, 1);
        assert!(diag.span.is_none());
        assert_eq!(diag.code, 1001);
    }

    #[test]
    fn test_diagnostic_with_span() {
        let diag = Diagnostic::new(&messages::UNIDENTIFIED_BACKTICK_OPERATOR, 2)
            .with_span(TextSpan::new(4, 5));
        assert_eq!(diag.span, Some(TextSpan::new(4, 5)));
        assert_eq!(diag.message_text, "Unidentified backtick operator");
    }

    #[test]
    fn test_diagnostic_collection() {
        let mut collection = DiagnosticCollection::new();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
        assert!(!collection.has_errors());

        collection.add(Diagnostic::new(&messages::UNIDENTIFIED_TOKEN, 1));
        assert!(collection.has_errors());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_diagnostic_collection_sort() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(&messages::UNTERMINATED_STRING, 7).with_span(TextSpan::new(40, 3)));
        collection.add(Diagnostic::new(&messages::UNIDENTIFIED_TOKEN, 2).with_span(TextSpan::new(9, 1)));
        collection.add(Diagnostic::new(&messages::UNIDENTIFIED_TOKEN, 2).with_span(TextSpan::new(3, 1)));
        collection.sort();

        let starts: Vec<_> = (&collection)
            .into_iter()
            .map(|d| (d.line, d.span.unwrap().start))
            .collect();
        assert_eq!(starts, vec![(2, 3), (2, 9), (7, 40)]);
    }

    #[test]
    fn test_collection_is_a_sink() {
        let mut collection = DiagnosticCollection::new();
        collection.report(Diagnostic::new(&messages::UNTERMINATED_BACKTICK_OPERATOR, 5));
        collection.report(Diagnostic::new(&messages::UNIDENTIFIED_TOKEN, 6));
        assert_eq!(collection.diagnostics()[0].line, 5);
        assert_eq!(collection.into_diagnostics().len(), 2);
    }

    #[test]
    fn test_closure_is_a_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |d: Diagnostic| seen.push((d.line, d.message_text));
            sink.report(Diagnostic::new(&messages::UNTERMINATED_MULTI_LINE_COMMENT, 4));
        }
        assert_eq!(seen, vec![(4, "Unterminated multi line comment".to_string())]);
    }
}
