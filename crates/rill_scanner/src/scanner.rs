//! The rill scanner.
//!
//! A byte-at-a-time state machine: the first byte of a lexeme picks a rule,
//! and each rule looks at most one byte further to choose between the bare
//! operator, its `=` form and its doubled form. Whitespace and comments are
//! skipped in a loop inside [`Scanner::next_token`], so long runs of blank
//! lines or comments never grow the call stack.

use crate::char_codes::*;
use crate::token::{Token, TokenKind};
use memchr::{memchr, memchr2};
use rill_core::text::{TextPos, TextSpan};
use rill_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage, DiagnosticSink};
use tracing::{debug, trace};

/// The tokens of a whole source text together with everything reported
/// while scanning it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult<'src> {
    tokens: Vec<Token<'src>>,
    diagnostics: DiagnosticCollection,
}

impl<'src> ScanResult<'src> {
    /// Producing tokens in source order. Neither the end sentinel nor
    /// unidentified tokens are included.
    pub fn tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    /// Diagnostics in the order they were reported.
    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Whether any malformed lexeme was reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// The kinds of all tokens, in order.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    pub fn into_parts(self) -> (Vec<Token<'src>>, DiagnosticCollection) {
        (self.tokens, self.diagnostics)
    }
}

/// The scanner converts rill source text into tokens.
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    /// The source text being scanned.
    text: &'src str,
    /// Current position in the text. Only ever moves forward.
    pos: usize,
    /// Current 1-based line.
    line: u32,
}

impl<'src> Scanner<'src> {
    /// Create a new scanner for the given source text.
    ///
    /// Token spans hold [`TextPos`] offsets, so `text` must be at most
    /// `TextPos::MAX` bytes long. `SourceFile::load` rejects anything larger.
    pub fn new(text: &'src str) -> Self {
        debug_assert!(TextPos::try_from(text.len()).is_ok(), "source text too large");
        Self { text, pos: 0, line: 1 }
    }

    /// The next unread byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The current line.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Whether the whole text has been consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Scan the whole text, collecting diagnostics into the result.
    pub fn scan(self) -> ScanResult<'src> {
        let mut diagnostics = DiagnosticCollection::new();
        let tokens = self.scan_with(&mut diagnostics);
        ScanResult { tokens, diagnostics }
    }

    /// Scan the whole text, sending diagnostics to `sink`.
    ///
    /// Unidentified tokens have already been reported when they are produced,
    /// so they are simply left out of the returned sequence.
    pub fn scan_with<S>(mut self, sink: &mut S) -> Vec<Token<'src>>
    where
        S: DiagnosticSink + ?Sized,
    {
        let mut tokens = Vec::new();
        let mut dropped = 0usize;
        loop {
            let token = self.next_token(sink);
            match token.kind {
                TokenKind::End => break,
                TokenKind::Unidentified => dropped += 1,
                _ => tokens.push(token),
            }
        }
        debug!(
            tokens = tokens.len(),
            dropped,
            lines = self.line,
            bytes = self.text.len(),
            "scan finished"
        );
        tokens
    }

    /// Produce the next raw token.
    ///
    /// Unlike [`Scanner::scan`], this returns unidentified tokens and the end
    /// sentinel. Once the text is exhausted every call returns `End`, whose
    /// lexeme is empty.
    pub fn next_token<S>(&mut self, sink: &mut S) -> Token<'src>
    where
        S: DiagnosticSink + ?Sized,
    {
        loop {
            let start = self.pos;
            let line = self.line;
            let Some(ch) = self.current_byte() else {
                return self.make_token(TokenKind::End, start, line);
            };

            let kind = match ch {
                LINE_FEED => {
                    self.pos += 1;
                    self.line += 1;
                    continue;
                }
                c if is_white_space_single_line(c) => {
                    self.pos += 1;
                    continue;
                }
                b'(' => self.single(TokenKind::LeftParen),
                b')' => self.single(TokenKind::RightParen),
                b'[' => self.single(TokenKind::LeftSquare),
                b']' => self.single(TokenKind::RightSquare),
                b'{' => self.single(TokenKind::LeftBrace),
                b'}' => self.single(TokenKind::RightBrace),
                b',' => self.single(TokenKind::Comma),
                b';' => self.single(TokenKind::Semicolon),
                b'*' => self.single(TokenKind::Star),

                b'.' => self.scan_dot(),
                b'-' => self.scan_minus(),
                b'+' => self.scan_plus(),
                b'!' => self.scan_bang(),
                b'=' => self.scan_equal(),
                b'<' => self.scan_less(),
                b'>' => self.scan_greater(),
                b'%' => self.scan_percent(),
                b'&' => self.scan_ampersand(),
                b'|' => self.scan_pipe(),
                SLASH => match self.scan_slash(sink) {
                    Some(kind) => kind,
                    None => continue,
                },

                DOUBLE_QUOTE => self.scan_string(sink),
                BACKTICK => self.scan_backtick_operator(sink),

                c if is_digit(c) => self.scan_number(),
                c if is_identifier_start(c) => self.scan_identifier(),

                _ => self.scan_unidentified(sink),
            };

            let token = self.make_token(kind, start, line);
            trace!(
                kind = %token.kind,
                line = token.line,
                span_start = token.span.start,
                span_end = token.span.end(),
                "token"
            );
            return token;
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Look at the byte at the current position without advancing.
    #[inline]
    fn current_byte(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Look at the byte at position pos + offset.
    #[inline]
    fn char_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    /// The unread remainder of the text.
    #[inline]
    fn rest(&self) -> &'src [u8] {
        &self.text.as_bytes()[self.pos..]
    }

    fn make_token(&self, kind: TokenKind, start: usize, line: u32) -> Token<'src> {
        Token::new(
            kind,
            &self.text[start..self.pos],
            TextSpan::from_bounds(start as TextPos, self.pos as TextPos),
            line,
        )
    }

    fn report<S>(&self, sink: &mut S, message: &DiagnosticMessage, start: usize)
    where
        S: DiagnosticSink + ?Sized,
    {
        let span = TextSpan::from_bounds(start as TextPos, self.pos as TextPos);
        debug!(code = message.code, line = self.line, %span, "{}", message.message);
        sink.report(Diagnostic::new(message, self.line).with_span(span));
    }

    #[inline]
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn skip_digits(&mut self) {
        while self.current_byte().is_some_and(is_digit) {
            self.pos += 1;
        }
    }

    /// Advance to the next `delimiter`, counting newlines on the way.
    ///
    /// Leaves the cursor on the delimiter and returns `true`, or leaves it at
    /// the end of the text and returns `false`.
    fn skip_to_delimiter(&mut self, delimiter: u8) -> bool {
        loop {
            match memchr2(delimiter, LINE_FEED, self.rest()) {
                Some(offset) => {
                    self.pos += offset;
                    if self.text.as_bytes()[self.pos] == delimiter {
                        return true;
                    }
                    self.pos += 1;
                    self.line += 1;
                }
                None => {
                    self.pos = self.text.len();
                    return false;
                }
            }
        }
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_dot(&mut self) -> TokenKind {
        if self.char_at(1).is_some_and(is_digit) {
            self.pos += 1;
            self.scan_fraction_and_exponent()
        } else if self.char_at(1) == Some(b'.') {
            self.pos += 2;
            TokenKind::DotDot
        } else {
            self.pos += 1;
            TokenKind::Dot
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        if self.char_at(1) == Some(b'=') {
            self.pos += 2;
            TokenKind::MinusEqual
        } else if self.char_at(1) == Some(b'-') {
            self.pos += 2;
            TokenKind::MinusMinus
        } else {
            self.pos += 1;
            TokenKind::Minus
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        if self.char_at(1) == Some(b'=') {
            self.pos += 2;
            TokenKind::PlusEqual
        } else if self.char_at(1) == Some(b'+') {
            self.pos += 2;
            TokenKind::PlusPlus
        } else {
            self.pos += 1;
            TokenKind::Plus
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        if self.char_at(1) == Some(b'=') {
            self.pos += 2;
            TokenKind::BangEqual
        } else {
            self.pos += 1;
            TokenKind::Bang
        }
    }

    fn scan_equal(&mut self) -> TokenKind {
        if self.char_at(1) == Some(b'=') {
            self.pos += 2;
            TokenKind::EqualEqual
        } else {
            self.pos += 1;
            TokenKind::Equal
        }
    }

    fn scan_less(&mut self) -> TokenKind {
        if self.char_at(1) == Some(b'=') {
            self.pos += 2;
            TokenKind::LessEqual
        } else if self.char_at(1) == Some(b'<') {
            self.pos += 2;
            TokenKind::LeftShift
        } else {
            self.pos += 1;
            TokenKind::Less
        }
    }

    fn scan_greater(&mut self) -> TokenKind {
        if self.char_at(1) == Some(b'=') {
            self.pos += 2;
            TokenKind::GreaterEqual
        } else if self.char_at(1) == Some(b'>') {
            self.pos += 2;
            TokenKind::RightShift
        } else {
            self.pos += 1;
            TokenKind::Greater
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        if self.char_at(1) == Some(b'=') {
            self.pos += 2;
            TokenKind::PercentEqual
        } else {
            self.pos += 1;
            TokenKind::Percent
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        if self.char_at(1) == Some(b'&') {
            self.pos += 2;
            TokenKind::AmpersandAmpersand
        } else {
            self.pos += 1;
            TokenKind::Ampersand
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        if self.char_at(1) == Some(b'|') {
            self.pos += 2;
            TokenKind::PipePipe
        } else {
            self.pos += 1;
            TokenKind::Pipe
        }
    }

    /// Scan `/`, `/=` or a comment. Returns `None` when a comment was skipped.
    fn scan_slash<S>(&mut self, sink: &mut S) -> Option<TokenKind>
    where
        S: DiagnosticSink + ?Sized,
    {
        match self.char_at(1) {
            Some(SLASH) => {
                self.skip_line_comment();
                None
            }
            Some(ASTERISK) => self.skip_block_comment(sink),
            Some(b'=') => {
                self.pos += 2;
                Some(TokenKind::SlashEqual)
            }
            _ => {
                self.pos += 1;
                Some(TokenKind::Slash)
            }
        }
    }

    /// Skip `// ...` up to, not including, the newline.
    fn skip_line_comment(&mut self) {
        self.pos += 2;
        self.pos = match memchr(LINE_FEED, self.rest()) {
            Some(offset) => self.pos + offset,
            None => self.text.len(),
        };
    }

    /// Skip `/* ... */`. An unterminated comment becomes a single
    /// unidentified token covering the rest of the text.
    fn skip_block_comment<S>(&mut self, sink: &mut S) -> Option<TokenKind>
    where
        S: DiagnosticSink + ?Sized,
    {
        let start = self.pos;
        self.pos += 2;
        while self.skip_to_delimiter(ASTERISK) {
            if self.char_at(1) == Some(SLASH) {
                self.pos += 2;
                return None;
            }
            self.pos += 1;
        }
        self.report(sink, &messages::UNTERMINATED_MULTI_LINE_COMMENT, start);
        Some(TokenKind::Unidentified)
    }

    fn scan_number(&mut self) -> TokenKind {
        self.skip_digits();
        // `1..5` is a range, so a dot followed by another dot stays out.
        if self.current_byte() == Some(b'.') && self.char_at(1) != Some(b'.') {
            self.pos += 1;
        }
        self.scan_fraction_and_exponent()
    }

    /// Scan the digits after the decimal point, then an optional exponent.
    /// A missing exponent digit is not an error: `1e` and `1e+` are numbers.
    fn scan_fraction_and_exponent(&mut self) -> TokenKind {
        self.skip_digits();
        if self.current_byte().is_some_and(is_exponent_marker) {
            self.pos += 1;
            if let Some(b'+') | Some(b'-') = self.current_byte() {
                self.pos += 1;
            }
            self.skip_digits();
        }
        TokenKind::Number
    }

    fn scan_string<S>(&mut self, sink: &mut S) -> TokenKind
    where
        S: DiagnosticSink + ?Sized,
    {
        let start = self.pos;
        self.pos += 1; // skip opening quote
        if self.skip_to_delimiter(DOUBLE_QUOTE) {
            self.pos += 1; // skip closing quote
        } else {
            self.report(sink, &messages::UNTERMINATED_STRING, start);
        }
        TokenKind::String
    }

    fn scan_backtick_operator<S>(&mut self, sink: &mut S) -> TokenKind
    where
        S: DiagnosticSink + ?Sized,
    {
        let start = self.pos;
        self.pos += 1; // skip opening backtick
        if !self.skip_to_delimiter(BACKTICK) {
            self.report(sink, &messages::UNTERMINATED_BACKTICK_OPERATOR, start);
            return TokenKind::Unidentified;
        }
        self.pos += 1; // skip closing backtick

        match TokenKind::from_backtick_operator(&self.text[start..self.pos]) {
            Some(kind) => kind,
            None => {
                self.report(sink, &messages::UNIDENTIFIED_BACKTICK_OPERATOR, start);
                TokenKind::Unidentified
            }
        }
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1;
        while self.current_byte().is_some_and(is_identifier_part) {
            self.pos += 1;
        }
        TokenKind::from_keyword(&self.text[start..self.pos]).unwrap_or(TokenKind::Identifier)
    }

    /// Consume one character that starts no lexeme. Non-ASCII characters are
    /// consumed whole so the token stays on a character boundary.
    fn scan_unidentified<S>(&mut self, sink: &mut S) -> TokenKind
    where
        S: DiagnosticSink + ?Sized,
    {
        let start = self.pos;
        let width = self.text[start..].chars().next().map_or(1, char::len_utf8);
        self.pos += width;
        self.report(sink, &messages::UNIDENTIFIED_TOKEN, start);
        TokenKind::Unidentified
    }
}
