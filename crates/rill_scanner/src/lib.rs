//! rill_scanner: Lexer/tokenizer for rill source code.
//!
//! Converts source text into a flat sequence of typed tokens:
//! - Single and two-character operators, chosen by longest match
//! - Numbers, including the leading-dot form (`.5`) and exponents
//! - Strings and backtick operators (`` `xor` ``), which may span lines
//! - Line and block comments, skipped without producing tokens
//!
//! Tokens borrow their text from the source buffer. Malformed input is
//! reported through a [`rill_diagnostics::DiagnosticSink`] and never stops
//! the scan.

mod char_codes;
mod scanner;
mod token;

pub use scanner::{ScanResult, Scanner};
pub use token::{Token, TokenKind};

/// Scan a whole source text, collecting diagnostics into the result.
pub fn scan(text: &str) -> ScanResult<'_> {
    Scanner::new(text).scan()
}
