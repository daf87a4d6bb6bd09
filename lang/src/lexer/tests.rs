use expect_test::expect;

use super::*;

fn token(kind: TokenKind, text: &str, line: u32, column: u32) -> Token {
    Token::new(kind, text, Position::new(line, column))
}

#[test]
fn lex_empty_input() {
    assert_eq!(lex("").unwrap(), vec![]);
    assert_eq!(lex("  \t\n").unwrap(), vec![]);
}

#[test]
fn lex_call_with_list_and_nested_expression() {
    let tokens = lex("Print([21, 5 * (2 + 1)])").unwrap();
    assert_eq!(
        tokens,
        vec![
            token(TokenKind::Identifier, "Print", 1, 1),
            token(TokenKind::LParen, "(", 1, 6),
            token(TokenKind::LBracket, "[", 1, 7),
            token(TokenKind::IntNumber, "21", 1, 8),
            token(TokenKind::ArgSeparator, ",", 1, 10),
            token(TokenKind::IntNumber, "5", 1, 12),
            token(TokenKind::Operator, "*", 1, 14),
            token(TokenKind::LParen, "(", 1, 16),
            token(TokenKind::IntNumber, "2", 1, 17),
            token(TokenKind::Operator, "+", 1, 19),
            token(TokenKind::IntNumber, "1", 1, 21),
            token(TokenKind::RParen, ")", 1, 22),
            token(TokenKind::RBracket, "]", 1, 23),
            token(TokenKind::RParen, ")", 1, 24),
        ]
    );
}

#[test]
fn token_debug_shape() {
    let tokens = lex("Print").unwrap();
    expect![[r#"
        [
            Token {
                kind: Identifier,
                text: "Print",
                position: Position {
                    line: 1,
                    column: 1,
                },
            },
        ]
    "#]]
    .assert_debug_eq(&tokens);
}

#[test]
fn lex_identifiers_and_keywords() {
    let tokens = lex("if x while else for foo_1").unwrap();
    assert_eq!(
        tokens,
        vec![
            token(TokenKind::Keyword, "if", 1, 1),
            token(TokenKind::Identifier, "x", 1, 4),
            token(TokenKind::Keyword, "while", 1, 6),
            token(TokenKind::Keyword, "else", 1, 12),
            token(TokenKind::Keyword, "for", 1, 17),
            token(TokenKind::Identifier, "foo_1", 1, 21),
        ]
    );
}

#[test]
fn find_keyword_reclassifies_only_reserved_identifiers() {
    let position = Position::new(1, 1);
    let reclassified = find_keyword(Token::new(TokenKind::Identifier, "while", position));
    assert_eq!(reclassified.kind, TokenKind::Keyword);
    assert_eq!(reclassified.text, "while");

    let plain = find_keyword(Token::new(TokenKind::Identifier, "iffy", position));
    assert_eq!(plain.kind, TokenKind::Identifier);

    // only identifiers are reclassified
    let string = find_keyword(Token::new(TokenKind::String, "if", position));
    assert_eq!(string.kind, TokenKind::String);
}

#[test]
fn lex_numbers() {
    let tokens = lex("1 2.5 100 12.0").unwrap();
    assert_eq!(
        tokens,
        vec![
            token(TokenKind::IntNumber, "1", 1, 1),
            token(TokenKind::FloatNumber, "2.5", 1, 3),
            token(TokenKind::IntNumber, "100", 1, 7),
            token(TokenKind::FloatNumber, "12.0", 1, 11),
        ]
    );
}

#[test]
fn lex_number_with_two_periods() {
    assert_eq!(
        lex("1.2.3"),
        Err(LexError::InvalidNumber {
            message: "a floating point number may contain only one period",
            position: Position::new(1, 1),
        })
    );
}

#[test]
fn lex_number_with_trailing_period() {
    assert_eq!(
        lex("7."),
        Err(LexError::InvalidNumber {
            message: "a floating point number must end with a digit",
            position: Position::new(1, 1),
        })
    );
}

#[test]
fn lex_strings() {
    assert_eq!(
        lex(r#""hello world""#).unwrap(),
        vec![token(TokenKind::String, "hello world", 1, 1)]
    );
    assert_eq!(
        lex("'single'").unwrap(),
        vec![token(TokenKind::String, "single", 1, 1)]
    );
    // the other quote kind is plain payload
    assert_eq!(
        lex(r#""it's""#).unwrap(),
        vec![token(TokenKind::String, "it's", 1, 1)]
    );
}

#[test]
fn lex_string_escapes() {
    let tokens = lex(r#""a\nb\tc\\d""#).unwrap();
    assert_eq!(tokens[0].text, "a\nb\tc\\d");

    // unrecognized escapes keep the backslash verbatim
    let tokens = lex(r#""a\qb""#).unwrap();
    assert_eq!(tokens[0].text, "a\\qb");
}

#[test]
fn lex_unterminated_string() {
    assert_eq!(
        lex(r#""abc"#),
        Err(LexError::UnterminatedString {
            position: Position::new(1, 1),
        })
    );
}

#[test]
fn lex_operators_longest_match_first() {
    let tokens = lex("a >= b == c < d").unwrap();
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["a", ">=", "b", "==", "c", "<", "d"]);
    assert_eq!(tokens[1].kind, TokenKind::Operator);
    assert_eq!(tokens[3].kind, TokenKind::Operator);
    assert_eq!(tokens[5].kind, TokenKind::Operator);
}

#[test]
fn lex_assignment_and_arithmetic() {
    let tokens = lex("x = x % 2 != 0").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::IntNumber,
            TokenKind::Operator,
            TokenKind::IntNumber,
        ]
    );
}

#[test]
fn lex_rejects_number_after_identifier() {
    assert_eq!(
        lex("foo 5"),
        Err(LexError::UnexpectedToken {
            what: "number",
            position: Position::new(1, 5),
        })
    );
}

#[test]
fn lex_rejects_closer_at_program_start() {
    assert_eq!(
        lex(")"),
        Err(LexError::UnexpectedToken {
            what: "right parentheses",
            position: Position::new(1, 1),
        })
    );
}

#[test]
fn lex_rejects_separator_after_opener() {
    assert_eq!(
        lex("Print(, 1)"),
        Err(LexError::UnexpectedToken {
            what: "argument separator",
            position: Position::new(1, 7),
        })
    );
}

#[test]
fn lex_rejects_paren_after_number() {
    assert_eq!(
        lex("1 (2)"),
        Err(LexError::UnexpectedToken {
            what: "left parentheses",
            position: Position::new(1, 3),
        })
    );
}

#[test]
fn lex_operators_skip_the_lookback_check() {
    // two operators in a row lex fine; the parser rejects them later
    let tokens = lex("1 + + 2").unwrap();
    assert_eq!(tokens.len(), 4);
    // a string directly after a number lexes fine too
    assert!(lex("1 'a'").is_ok());
}

#[test]
fn lex_mismatched_close_brace_inside_parens() {
    assert_eq!(
        lex("if (x { 1 )"),
        Err(LexError::MismatchedBracket {
            ch: ')',
            position: Position::new(1, 11),
        })
    );
}

#[test]
fn lex_unopened_closer() {
    assert_eq!(
        lex("Print(1))"),
        Err(LexError::MismatchedBracket {
            ch: ')',
            position: Position::new(1, 9),
        })
    );
    assert_eq!(
        lex("if (1) { } }"),
        Err(LexError::MismatchedBracket {
            ch: '}',
            position: Position::new(1, 12),
        })
    );
}

#[test]
fn lex_unknown_token() {
    assert_eq!(
        lex("#"),
        Err(LexError::UnknownToken {
            position: Position::new(1, 1),
        })
    );
    assert_eq!(
        lex("x @ y"),
        Err(LexError::UnknownToken {
            position: Position::new(1, 3),
        })
    );
}

#[test]
fn lex_tracks_lines_and_columns() {
    let tokens = lex("a\nbb\n  c").unwrap();
    assert_eq!(tokens[0].position, Position::new(1, 1));
    assert_eq!(tokens[1].position, Position::new(2, 1));
    assert_eq!(tokens[2].position, Position::new(3, 3));
}

#[test]
fn lex_counts_crlf_as_one_line_break() {
    let tokens = lex("a\r\nb").unwrap();
    assert_eq!(tokens[0].position, Position::new(1, 1));
    assert_eq!(tokens[1].position, Position::new(2, 1));
}

#[test]
fn lex_counts_columns_in_codepoints() {
    // the string spans 7 codepoints regardless of byte length
    let tokens = lex("\"héllo\" x").unwrap();
    assert_eq!(tokens[0], token(TokenKind::String, "héllo", 1, 1));
    assert_eq!(tokens[1], token(TokenKind::Identifier, "x", 1, 9));
}

#[test]
fn pull_based_lexing_without_reclassification() {
    let lexer = Lexer::new("if (1)");
    let tokens: Result<Vec<Token>, LexError> = lexer.collect();
    let tokens = tokens.unwrap();
    // the scanner itself never produces keywords
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text, "if");
    assert_eq!(tokens.len(), 4);
}

#[test]
fn token_display() {
    let rendered = token(TokenKind::Identifier, "Print", 1, 1).to_string();
    assert_eq!(
        rendered,
        "<Token kind='identifier', text='Print', position=1:1>"
    );
}
