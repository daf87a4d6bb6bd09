use std::fmt;

/// Position in source code (line and column, both 1-indexed, counted in
/// decoded codepoints rather than bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Token classification.
///
/// `ProgramStart` is a sentinel: it is never emitted, but stands in for
/// "no previous token" in the lexer's single-token lookback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    ProgramStart,
    Identifier,
    IntNumber,
    FloatNumber,
    Keyword,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Operator,
    ArgSeparator,
    String,
}

impl TokenKind {
    /// Human-readable name used in token dumps and lex errors.
    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::ProgramStart => "program start",
            TokenKind::Identifier => "identifier",
            TokenKind::IntNumber => "number",
            TokenKind::FloatNumber => "number",
            TokenKind::Keyword => "keyword",
            TokenKind::LParen => "left parentheses",
            TokenKind::RParen => "right parentheses",
            TokenKind::LBrace => "left brace",
            TokenKind::RBrace => "right brace",
            TokenKind::LBracket => "left bracket",
            TokenKind::RBracket => "right bracket",
            TokenKind::Operator => "operator",
            TokenKind::ArgSeparator => "argument separator",
            TokenKind::String => "string",
        }
    }
}

/// A classified lexeme with its source position. `text` is the exact source
/// lexeme, except for strings, where it is the decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Token kind='{}', text='{}', position={}:{}>",
            self.kind.description(),
            self.text,
            self.position.line,
            self.position.column
        )
    }
}
