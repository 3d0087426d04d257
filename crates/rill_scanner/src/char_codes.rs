//! Byte constants and character classes used by the scanner.
//!
//! The language is ASCII-only outside of string, comment and backtick
//! bodies, so classification works on raw bytes.

pub const LINE_FEED: u8 = b'\n';
pub const DOUBLE_QUOTE: u8 = b'"';
pub const BACKTICK: u8 = b'`';
pub const ASTERISK: u8 = b'*';
pub const SLASH: u8 = b'/';

/// Whitespace that is skipped without affecting the line counter.
#[inline]
pub fn is_white_space_single_line(ch: u8) -> bool {
    matches!(ch, b' ' | b'\r' | b'\t')
}

/// Check if a byte is a decimal digit.
#[inline]
pub fn is_digit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

/// Check if a byte can start an identifier. Underscore counts as alphabetic.
#[inline]
pub fn is_identifier_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

/// Check if a byte can continue an identifier.
#[inline]
pub fn is_identifier_part(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

/// Check if a byte introduces an exponent in a numeric literal.
#[inline]
pub fn is_exponent_marker(ch: u8) -> bool {
    matches!(ch, b'e' | b'E')
}
