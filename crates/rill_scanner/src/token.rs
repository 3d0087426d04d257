//! Token kinds and the tokens produced by the scanner.

use rill_core::text::TextSpan;
use serde::Serialize;
use std::fmt;

/// The lexical category of a token.
///
/// This is a closed set shared with downstream consumers. A few kinds
/// (`QuestionMark`, `Colon`, `Tilde`, `BitNot`, `StarEqual`,
/// `AmpersandEqual`, `PipeEqual`) are reserved and never produced by the
/// scanner today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Structural
    LeftParen,
    RightParen,
    LeftSquare,
    RightSquare,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Semicolon,
    QuestionMark,
    Colon,
    Tilde,

    // Arithmetic and bitwise
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Mod,
    Div,

    // Comparison and assignment
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    PlusPlus,
    MinusMinus,
    PlusEqual,
    MinusEqual,
    SlashEqual,
    StarEqual,
    PercentEqual,
    LeftShift,
    RightShift,
    AmpersandEqual,
    AmpersandAmpersand,
    PipeEqual,
    PipePipe,
    DotDot,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Else,
    False,
    Def,
    For,
    If,
    Or,
    Print,
    Return,
    True,
    While,
    In,
    As,
    Break,

    Unidentified,
    End,
}

impl TokenKind {
    /// The upper-case name printed next to each lexeme, e.g. `PLUS_EQUAL`.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftSquare => "LEFT_SQUARE",
            TokenKind::RightSquare => "RIGHT_SQUARE",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::QuestionMark => "QUESTION_MARK",
            TokenKind::Colon => "COLON",
            TokenKind::Tilde => "TILDE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::Ampersand => "AMPERSAND",
            TokenKind::Pipe => "PIPE",
            TokenKind::BitAnd => "BIT_AND",
            TokenKind::BitOr => "BIT_OR",
            TokenKind::BitXor => "BIT_XOR",
            TokenKind::BitNot => "BIT_NOT",
            TokenKind::Mod => "MOD",
            TokenKind::Div => "DIV",
            TokenKind::Bang => "BANG",
            TokenKind::BangEqual => "BANG_EQUAL",
            TokenKind::Equal => "EQUAL",
            TokenKind::EqualEqual => "EQUAL_EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::PlusPlus => "PLUS_PLUS",
            TokenKind::MinusMinus => "MINUS_MINUS",
            TokenKind::PlusEqual => "PLUS_EQUAL",
            TokenKind::MinusEqual => "MINUS_EQUAL",
            TokenKind::SlashEqual => "SLASH_EQUAL",
            TokenKind::StarEqual => "STAR_EQUAL",
            TokenKind::PercentEqual => "PERCENT_EQUAL",
            TokenKind::LeftShift => "LEFT_SHIFT",
            TokenKind::RightShift => "RIGHT_SHIFT",
            TokenKind::AmpersandEqual => "AMPERSAND_EQUAL",
            TokenKind::AmpersandAmpersand => "AMPERSAND_AMPERSAND",
            TokenKind::PipeEqual => "PIPE_EQUAL",
            TokenKind::PipePipe => "PIPE_PIPE",
            TokenKind::DotDot => "DOT_DOT",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::And => "AND",
            TokenKind::Else => "ELSE",
            TokenKind::False => "FALSE",
            TokenKind::Def => "DEF",
            TokenKind::For => "FOR",
            TokenKind::If => "IF",
            TokenKind::Or => "OR",
            TokenKind::Print => "PRINT",
            TokenKind::Return => "RETURN",
            TokenKind::True => "TRUE",
            TokenKind::While => "WHILE",
            TokenKind::In => "IN",
            TokenKind::As => "AS",
            TokenKind::Break => "BREAK",
            TokenKind::Unidentified => "UNIDENTIFIED",
            TokenKind::End => "END",
        }
    }

    /// Look up a keyword. Matching is case-sensitive.
    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        match text {
            "and" => Some(TokenKind::And),
            "as" => Some(TokenKind::As),
            "break" => Some(TokenKind::Break),
            "def" => Some(TokenKind::Def),
            "else" => Some(TokenKind::Else),
            "false" => Some(TokenKind::False),
            "for" => Some(TokenKind::For),
            "if" => Some(TokenKind::If),
            "in" => Some(TokenKind::In),
            "or" => Some(TokenKind::Or),
            "print" => Some(TokenKind::Print),
            "return" => Some(TokenKind::Return),
            "true" => Some(TokenKind::True),
            "while" => Some(TokenKind::While),
            _ => None,
        }
    }

    /// Look up a backtick operator. `text` includes both backticks.
    pub fn from_backtick_operator(text: &str) -> Option<TokenKind> {
        match text {
            "`and`" => Some(TokenKind::BitAnd),
            "`or`" => Some(TokenKind::BitOr),
            "`xor`" => Some(TokenKind::BitXor),
            "`mod`" => Some(TokenKind::Mod),
            "`div`" => Some(TokenKind::Div),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Else
                | TokenKind::False
                | TokenKind::Def
                | TokenKind::For
                | TokenKind::If
                | TokenKind::Or
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::True
                | TokenKind::While
                | TokenKind::In
                | TokenKind::As
                | TokenKind::Break
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::String | TokenKind::Number)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scanned token.
///
/// The lexeme is a view into the source buffer, so a token cannot outlive
/// the text it was scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The source text of the token.
    pub lexeme: &'src str,
    /// Byte range of the lexeme in the source text.
    pub span: TextSpan,
    /// 1-based line on which the token starts.
    pub line: u32,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, lexeme: &'src str, span: TextSpan, line: u32) -> Self {
        Self {
            kind,
            lexeme,
            span,
            line,
        }
    }

    /// The length of this token in bytes.
    pub fn len(&self) -> u32 {
        self.span.length
    }

    /// Whether this token has zero length (only the end sentinel does).
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.lexeme, self.kind.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_case_sensitive() {
        assert_eq!(TokenKind::from_keyword("print"), Some(TokenKind::Print));
        assert_eq!(TokenKind::from_keyword("Print"), None);
        assert_eq!(TokenKind::from_keyword("printer"), None);
    }

    #[test]
    fn test_every_keyword_round_trips_through_its_name() {
        for word in [
            "and", "as", "break", "def", "else", "false", "for", "if", "in", "or", "print",
            "return", "true", "while",
        ] {
            let kind = TokenKind::from_keyword(word).unwrap();
            assert!(kind.is_keyword());
            assert_eq!(kind.name(), word.to_ascii_uppercase());
        }
    }

    #[test]
    fn test_backtick_operator_lookup() {
        assert_eq!(TokenKind::from_backtick_operator("`xor`"), Some(TokenKind::BitXor));
        assert_eq!(TokenKind::from_backtick_operator("`div`"), Some(TokenKind::Div));
        assert_eq!(TokenKind::from_backtick_operator("xor"), None);
        assert_eq!(TokenKind::from_backtick_operator("`not`"), None);
    }

    #[test]
    fn test_serde_name_matches_display_name() {
        for kind in [
            TokenKind::LeftParen,
            TokenKind::BitXor,
            TokenKind::AmpersandAmpersand,
            TokenKind::DotDot,
            TokenKind::Unidentified,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::PlusEqual, "+=", TextSpan::new(4, 2), 1);
        assert_eq!(token.to_string(), "+=\tPLUS_EQUAL");
        assert_eq!(token.len(), 2);
        assert_eq!(token.kind, TokenKind::PlusEqual);
        assert!(!token.kind.is_literal());
    }
}
