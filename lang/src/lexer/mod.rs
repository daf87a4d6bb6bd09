pub mod token;

pub use token::{Position, Token, TokenKind};

#[cfg(test)]
mod tests;

use crate::utf8::{self, Codepoint};

const IDENTIFIER_START_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const IDENTIFIER_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";
const DIGIT_CHARS: &str = "0123456789";
const WHITESPACE_CHARS: &str = " \t\r\n";

/// The fixed operator set, probed longest-match-first with a bounded
/// two-codepoint lookahead.
const OPERATORS: [&str; 12] = [
    "=", "+", "-", "*", "/", "%", "!=", "==", ">", ">=", "<", "<=",
];

const KEYWORDS: [&str; 4] = ["if", "else", "while", "for"];

/// Terminal tokenizer failure. Callers must stop pulling tokens after one.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// The token kind cannot legally follow the previous token.
    UnexpectedToken {
        what: &'static str,
        position: Position,
    },
    /// A closing bracket with no matching opener of the same kind.
    MismatchedBracket { ch: char, position: Position },
    /// A malformed number literal.
    InvalidNumber {
        message: &'static str,
        position: Position,
    },
    UnterminatedString { position: Position },
    /// No token class matched at the cursor.
    UnknownToken { position: Position },
    /// The source bytes are not valid UTF-8 at the cursor.
    InvalidUtf8 { position: Position },
}

pub type LexResult = Result<Vec<Token>, LexError>;

/// Tokenizes the entire input, reclassifying keyword identifiers along the
/// way. This is the form the parser expects.
pub fn lex(input: &str) -> LexResult {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_token()? {
        tokens.push(find_keyword(token));
    }

    Ok(tokens)
}

/// Reclassifies an identifier that spells a reserved word into a keyword
/// token. The scanner itself never produces `Keyword`: callers that pull
/// tokens one at a time apply this before handing tokens to the parser.
pub fn find_keyword(token: Token) -> Token {
    if token.kind == TokenKind::Identifier && KEYWORDS.contains(&token.text.as_str()) {
        return Token {
            kind: TokenKind::Keyword,
            ..token
        };
    }

    token
}

/// Which token kinds may legally precede `kind`.
///
/// Operator and string tokens skip this check when emitted, though both
/// still update the lookback. Keyword reclassification happens after
/// lexing, so `Keyword` never reaches it as the emitted kind either; it can
/// appear as a predecessor only in the rows below, where it is kept for the
/// grammar's sake.
fn may_follow(kind: TokenKind, prev: TokenKind) -> bool {
    use TokenKind::*;

    match kind {
        // An identifier or a list opener can start a statement, and a
        // statement boundary can sit after every kind, so neither has an
        // impossible predecessor.
        Identifier | LBracket => true,
        // A number after an identifier is impossible in every context.
        IntNumber | FloatNumber => !matches!(prev, Identifier),
        LParen => matches!(
            prev,
            ProgramStart
                | Identifier
                | Keyword
                | LParen
                | RParen
                | LBrace
                | LBracket
                | RBracket
                | Operator
                | ArgSeparator
        ),
        RParen => matches!(
            prev,
            Identifier | IntNumber | FloatNumber | String | LParen | RParen | RBrace | RBracket
        ),
        LBrace => matches!(prev, Identifier | Keyword | LParen | RParen | ArgSeparator),
        RBrace => matches!(
            prev,
            Identifier
                | IntNumber
                | FloatNumber
                | String
                | Keyword
                | RParen
                | LBrace
                | RBrace
                | RBracket
        ),
        RBracket => matches!(
            prev,
            Identifier | IntNumber | FloatNumber | String | RParen | LBracket | RBracket
                | ArgSeparator
        ),
        ArgSeparator => matches!(
            prev,
            Identifier | IntNumber | FloatNumber | String | RParen | RBrace | RBracket
        ),
        _ => true,
    }
}

/// Pull-based scanner over one source string.
///
/// State beyond the cursor: the current line/column, the kind of the last
/// emitted token (`prev_kind`), and a stack of open `(`/`{` brackets used
/// to reject mismatched closers at lex time.
pub struct Lexer<'a> {
    source: &'a [u8],
    index: usize,
    line: u32,
    column: u32,
    brackets: Vec<TokenKind>,
    prev_kind: TokenKind,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            source: input.as_bytes(),
            index: 0,
            line: 1,
            column: 1,
            brackets: Vec::new(),
            prev_kind: TokenKind::ProgramStart,
        }
    }

    /// Produces the next token, or `Ok(None)` at end of input. An error is
    /// terminal for the stream: there is no recovery or resynchronization.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace()?;

        if self.is_at_end() {
            return Ok(None);
        }

        let position = Self::position(self);
        let ch = self.peek()?;

        if utf8::char_in_set(IDENTIFIER_START_CHARS.as_bytes(), ch) {
            self.check_lookback(TokenKind::Identifier, position)?;
            let token = self.next_identifier()?;
            self.prev_kind = TokenKind::Identifier;
            return Ok(Some(token));
        }

        if utf8::char_in_set(DIGIT_CHARS.as_bytes(), ch) {
            self.check_lookback(TokenKind::IntNumber, position)?;
            let token = self.next_number()?;
            self.prev_kind = token.kind;
            return Ok(Some(token));
        }

        match self.peek_byte() {
            Some(b'(') => {
                self.check_lookback(TokenKind::LParen, position)?;
                self.advance()?;
                self.brackets.push(TokenKind::LParen);
                Ok(Some(self.emit(TokenKind::LParen, "(", position)))
            }
            Some(b')') => {
                self.check_lookback(TokenKind::RParen, position)?;
                self.advance()?;
                if self.brackets.pop() != Some(TokenKind::LParen) {
                    return Err(LexError::MismatchedBracket { ch: ')', position });
                }
                Ok(Some(self.emit(TokenKind::RParen, ")", position)))
            }
            Some(b'{') => {
                self.check_lookback(TokenKind::LBrace, position)?;
                self.advance()?;
                self.brackets.push(TokenKind::LBrace);
                Ok(Some(self.emit(TokenKind::LBrace, "{", position)))
            }
            Some(b'}') => {
                self.check_lookback(TokenKind::RBrace, position)?;
                self.advance()?;
                if self.brackets.pop() != Some(TokenKind::LBrace) {
                    return Err(LexError::MismatchedBracket { ch: '}', position });
                }
                Ok(Some(self.emit(TokenKind::RBrace, "}", position)))
            }
            Some(b'[') => {
                self.check_lookback(TokenKind::LBracket, position)?;
                self.advance()?;
                Ok(Some(self.emit(TokenKind::LBracket, "[", position)))
            }
            Some(b']') => {
                self.check_lookback(TokenKind::RBracket, position)?;
                self.advance()?;
                Ok(Some(self.emit(TokenKind::RBracket, "]", position)))
            }
            Some(b',') => {
                self.check_lookback(TokenKind::ArgSeparator, position)?;
                self.advance()?;
                Ok(Some(self.emit(TokenKind::ArgSeparator, ",", position)))
            }
            Some(quote @ (b'"' | b'\'')) => {
                let token = self.next_string(quote)?;
                self.prev_kind = TokenKind::String;
                Ok(Some(token))
            }
            _ => {
                if let Some(text) = self.next_operator()? {
                    self.prev_kind = TokenKind::Operator;
                    return Ok(Some(Token::new(TokenKind::Operator, text, position)));
                }

                Err(LexError::UnknownToken { position })
            }
        }
    }

    fn check_lookback(&self, kind: TokenKind, position: Position) -> Result<(), LexError> {
        if may_follow(kind, self.prev_kind) {
            Ok(())
        } else {
            Err(LexError::UnexpectedToken {
                what: kind.description(),
                position,
            })
        }
    }

    fn emit(&mut self, kind: TokenKind, text: &str, position: Position) -> Token {
        self.prev_kind = kind;
        Token::new(kind, text, position)
    }

    fn next_identifier(&mut self) -> Result<Token, LexError> {
        let position = Self::position(self);
        let mut text = String::new();

        while !self.is_at_end() {
            let ch = self.peek()?;
            if !utf8::char_in_set(IDENTIFIER_CHARS.as_bytes(), ch) {
                break;
            }
            text.extend(ch.to_char());
            self.advance()?;
        }

        Ok(Token::new(TokenKind::Identifier, text, position))
    }

    fn next_number(&mut self) -> Result<Token, LexError> {
        let position = Self::position(self);
        let mut text = String::new();
        let mut floating = false;

        while !self.is_at_end() {
            let ch = self.peek()?;
            if !utf8::char_in_set(DIGIT_CHARS.as_bytes(), ch) {
                break;
            }
            text.extend(ch.to_char());
            self.advance()?;

            if self.peek_byte() == Some(b'.') {
                if floating {
                    return Err(LexError::InvalidNumber {
                        message: "a floating point number may contain only one period",
                        position,
                    });
                }
                floating = true;
                text.push('.');
                self.advance()?;
            }
        }

        if text.ends_with('.') {
            return Err(LexError::InvalidNumber {
                message: "a floating point number must end with a digit",
                position,
            });
        }

        let kind = if floating {
            TokenKind::FloatNumber
        } else {
            TokenKind::IntNumber
        };
        Ok(Token::new(kind, text, position))
    }

    /// Scans a string delimited by `quote` (`"` or `'`), decoding the four
    /// recognized escapes. The closing quote cannot be escaped: a backslash
    /// before anything else is kept verbatim.
    fn next_string(&mut self, quote: u8) -> Result<Token, LexError> {
        let position = Self::position(self);
        self.advance()?; // opening quote

        let mut text = String::new();

        while !self.is_at_end() {
            let ch = self.advance()?;

            if ch.is_ascii(quote) {
                return Ok(Token::new(TokenKind::String, text, position));
            }

            if ch.is_ascii(b'\\') {
                match self.peek_byte() {
                    Some(b'n') => {
                        text.push('\n');
                        self.advance()?;
                    }
                    Some(b'r') => {
                        text.push('\r');
                        self.advance()?;
                    }
                    Some(b't') => {
                        text.push('\t');
                        self.advance()?;
                    }
                    Some(b'\\') => {
                        text.push('\\');
                        self.advance()?;
                    }
                    _ => text.push('\\'),
                }
            } else {
                text.extend(ch.to_char());
            }
        }

        Err(LexError::UnterminatedString { position })
    }

    /// Longest-match probe against the operator set: the two-codepoint
    /// combination is tried before the single codepoint.
    fn next_operator(&mut self) -> Result<Option<String>, LexError> {
        let first = self.peek()?;
        let mut single = String::new();
        single.extend(first.to_char());

        let second_offset = self.index + first.byte_len();
        if second_offset < self.source.len() {
            if let Some(second) = utf8::decode(&self.source[second_offset..]) {
                let mut pair = single.clone();
                pair.extend(second.to_char());
                if OPERATORS.contains(&pair.as_str()) {
                    self.advance()?;
                    self.advance()?;
                    return Ok(Some(pair));
                }
            }
        }

        if OPERATORS.contains(&single.as_str()) {
            self.advance()?;
            return Ok(Some(single));
        }

        Ok(None)
    }

    fn skip_whitespace(&mut self) -> Result<(), LexError> {
        while !self.is_at_end() {
            let ch = self.peek()?;
            if !utf8::char_in_set(WHITESPACE_CHARS.as_bytes(), ch) {
                break;
            }
            self.advance()?;
        }

        Ok(())
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn is_at_end(&self) -> bool {
        self.index >= self.source.len()
    }

    /// First byte at the cursor; matches an ASCII codepoint exactly, since
    /// multi-byte codepoints lead with a byte above 0x7f.
    fn peek_byte(&self) -> Option<u8> {
        self.source.get(self.index).copied()
    }

    fn peek(&self) -> Result<Codepoint, LexError> {
        utf8::decode(&self.source[self.index..]).ok_or(LexError::InvalidUtf8 {
            position: self.position(),
        })
    }

    /// Consumes the codepoint at the cursor, maintaining line and column.
    /// `\r\n` counts as a single line break; `\r` advances no column.
    fn advance(&mut self) -> Result<Codepoint, LexError> {
        let ch = self.peek()?;

        if ch.is_ascii(b'\n') {
            self.line += 1;
            self.column = 1;
        } else if ch.is_ascii(b'\r') {
            if self.source.get(self.index + 1) != Some(&b'\n') {
                self.line += 1;
                self.column = 1;
            }
        } else {
            self.column += 1;
        }

        self.index += ch.byte_len();
        Ok(ch)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
