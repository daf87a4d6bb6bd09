pub mod ast;


use crate::lexer::{Position, Token, TokenKind};
use ast::Node;

/// Parse failure. Terminal: no recovery is attempted, and any partially
/// built tree is discarded. `position` is `None` only when the token
/// sequence ended before the grammar did.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: Option<Position>,
}

impl ParseError {
    fn new(message: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    fn at(message: impl Into<String>, token: &Token) -> Self {
        Self::new(message, Some(token.position))
    }

    fn end_of_input() -> Self {
        Self::new("Unexpected end of input", None)
    }
}

/// Node kind a binary operator token maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
}

impl BinaryOp {
    /// Multiplicative operators bind tighter than additive ones.
    fn priority(self) -> u16 {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => 101,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Mod => 102,
        }
    }

    fn node(self, left: Node, right: Node) -> Node {
        let left = Box::new(left);
        let right = Box::new(right);
        match self {
            BinaryOp::Add => Node::Add { left, right },
            BinaryOp::Subtract => Node::Subtract { left, right },
            BinaryOp::Multiply => Node::Multiply { left, right },
            BinaryOp::Divide => Node::Divide { left, right },
            BinaryOp::Mod => Node::Mod { left, right },
        }
    }
}

/// Ephemeral operator/priority pairing driving the expression fold; never
/// part of the tree.
#[derive(Debug, Clone, Copy)]
struct PrioritizedOperator {
    op: BinaryOp,
    priority: u16,
}

/// Maps each raw operator token of an expression run to its node kind and
/// priority. Only the arithmetic operators have node kinds; everything else
/// the tokenizer recognizes is rejected here.
fn operator_priorities(tokens: &[&Token]) -> Result<Vec<PrioritizedOperator>, ParseError> {
    tokens
        .iter()
        .map(|token| {
            let op = match token.text.as_str() {
                "+" => BinaryOp::Add,
                "-" => BinaryOp::Subtract,
                "*" => BinaryOp::Multiply,
                "/" => BinaryOp::Divide,
                "%" => BinaryOp::Mod,
                _ => return Err(ParseError::at("Unknown operator", token)),
            };
            Ok(PrioritizedOperator {
                op,
                priority: op.priority(),
            })
        })
        .collect()
}

/// Recursive-descent parser over the complete, keyword-reclassified token
/// sequence.
///
/// Every parse function is a pure function of the token vector and a start
/// index, returning the built node together with the number of tokens it
/// consumed; no traversal state lives on the parser itself.
pub struct Parser {
    tokens: Vec<Token>,
}

pub fn parse(tokens: Vec<Token>) -> Result<Node, ParseError> {
    Parser::new(tokens).parse()
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Parses the whole token sequence into a `Program` node.
    pub fn parse(&self) -> Result<Node, ParseError> {
        let (body, _) = self.parse_sequence(0, None)?;
        Ok(Node::Program {
            body: Box::new(body),
        })
    }

    fn token_at(&self, index: usize) -> Result<&Token, ParseError> {
        self.tokens.get(index).ok_or_else(ParseError::end_of_input)
    }

    fn kind_at(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).map(|token| token.kind)
    }

    fn expect(&self, index: usize, kind: TokenKind, message: &str) -> Result<(), ParseError> {
        let token = self.token_at(index)?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(ParseError::at(message, token))
        }
    }

    /// Parses statements from `index` until `stop` (or end of input when
    /// `stop` is `None`). The consumed count never includes the stop token.
    fn parse_sequence(
        &self,
        index: usize,
        stop: Option<TokenKind>,
    ) -> Result<(Node, usize), ParseError> {
        let mut nodes = Vec::new();
        let mut length = 0;

        while let Some(kind) = self.kind_at(index + length) {
            if stop == Some(kind) {
                break;
            }
            let (statement, consumed) = self.parse_statement(index + length)?;
            nodes.push(statement);
            length += consumed;
        }

        Ok((Node::Sequence { nodes }, length))
    }

    /// Statement dispatch on the first token. A bare literal or list
    /// literal is legal but yields the `Empty` placeholder: statement
    /// results are discarded.
    fn parse_statement(&self, index: usize) -> Result<(Node, usize), ParseError> {
        let token = self.token_at(index)?;

        match token.kind {
            TokenKind::IntNumber | TokenKind::FloatNumber | TokenKind::String => {
                Ok((Node::Empty, 1))
            }
            TokenKind::LParen => {
                // parenthesized statement unwrap: re-parse one token later
                let (statement, consumed) = self.parse_statement(index + 1)?;
                Ok((statement, consumed + 1))
            }
            TokenKind::LBracket => {
                let (_, consumed) = self.parse_list_definition(index)?;
                Ok((Node::Empty, consumed))
            }
            TokenKind::Identifier => {
                let next = self.token_at(index + 1)?;
                if next.kind == TokenKind::LParen {
                    self.parse_function_call(index)
                } else if next.kind == TokenKind::Operator && next.text == "=" {
                    let (value, consumed) = self.parse_expression(index + 2)?;
                    Ok((
                        Node::Assignment {
                            name: token.text.clone(),
                            value: Box::new(value),
                        },
                        2 + consumed,
                    ))
                } else {
                    Err(ParseError::at("Invalid statement start", token))
                }
            }
            TokenKind::Keyword => match token.text.as_str() {
                "if" => self.parse_if_statement(index),
                "while" => self.parse_while_statement(index),
                "for" => self.parse_for_statement(index),
                _ => Err(ParseError::at("Invalid statement start", token)),
            },
            _ => Err(ParseError::at("Invalid statement start", token)),
        }
    }

    /// `if (condition) { ... }` with an optional `else` block. An `else`
    /// directly followed by `if` is parsed as a nested if statement wrapped
    /// in a one-element sequence, which is how chains nest.
    fn parse_if_statement(&self, index: usize) -> Result<(Node, usize), ParseError> {
        let (condition, mut length) = self.parse_condition(index, "if")?;

        let (then_body, then_len) = self.parse_block(index + length)?;
        length += then_len;

        let mut else_body = None;
        if let Some(token) = self.tokens.get(index + length) {
            if token.kind == TokenKind::Keyword && token.text == "else" {
                length += 1;
                let next = self.token_at(index + length)?;
                let body = if next.kind == TokenKind::Keyword && next.text == "if" {
                    let (nested, consumed) = self.parse_statement(index + length)?;
                    length += consumed;
                    Node::Sequence {
                        nodes: vec![nested],
                    }
                } else {
                    let (body, consumed) = self.parse_block(index + length)?;
                    length += consumed;
                    body
                };
                else_body = Some(Box::new(body));
            }
        }

        Ok((
            Node::If {
                condition: Box::new(condition),
                then_body: Box::new(then_body),
                else_body,
            },
            length,
        ))
    }

    fn parse_while_statement(&self, index: usize) -> Result<(Node, usize), ParseError> {
        let (condition, mut length) = self.parse_condition(index, "while")?;

        let (body, body_len) = self.parse_block(index + length)?;
        length += body_len;

        Ok((
            Node::While {
                condition: Box::new(condition),
                body: Box::new(body),
            },
            length,
        ))
    }

    /// `for ({ init }, condition, { increment }) { body }`: both auxiliary
    /// bodies are brace-delimited statement sequences nested inside the
    /// parenthesized header.
    fn parse_for_statement(&self, index: usize) -> Result<(Node, usize), ParseError> {
        self.expect(index + 1, TokenKind::LParen, "Expected '(' after 'for'")?;
        let mut length = 2;

        self.expect(
            index + length,
            TokenKind::LBrace,
            "Expected '{' to open the initialization block",
        )?;
        length += 1;
        let (init, init_len) = self.parse_sequence(index + length, Some(TokenKind::RBrace))?;
        length += init_len;
        self.expect(
            index + length,
            TokenKind::RBrace,
            "Expected '}' to close the initialization block",
        )?;
        length += 1;

        self.expect(
            index + length,
            TokenKind::ArgSeparator,
            "Expected ',' after the initialization block",
        )?;
        length += 1;

        let (condition, condition_len) = self.parse_expression(index + length)?;
        length += condition_len;
        self.expect(
            index + length,
            TokenKind::ArgSeparator,
            "Expected ',' after the loop condition",
        )?;
        length += 1;

        self.expect(
            index + length,
            TokenKind::LBrace,
            "Expected '{' to open the increment block",
        )?;
        length += 1;
        let (increment, increment_len) =
            self.parse_sequence(index + length, Some(TokenKind::RBrace))?;
        length += increment_len;
        self.expect(
            index + length,
            TokenKind::RBrace,
            "Expected '}' to close the increment block",
        )?;
        length += 1;

        self.expect(
            index + length,
            TokenKind::RParen,
            "Expected ')' to close the loop header",
        )?;
        length += 1;

        let (body, body_len) = self.parse_block(index + length)?;
        length += body_len;

        Ok((
            Node::For {
                init: Box::new(init),
                condition: Box::new(condition),
                increment: Box::new(increment),
                body: Box::new(body),
            },
            length,
        ))
    }

    /// `(condition)` directly after the keyword at `index`. Consumed count
    /// includes the keyword and both parentheses.
    fn parse_condition(&self, index: usize, keyword: &str) -> Result<(Node, usize), ParseError> {
        self.expect(
            index + 1,
            TokenKind::LParen,
            &format!("Expected '(' after '{keyword}'"),
        )?;
        let (condition, condition_len) = self.parse_expression(index + 2)?;
        self.expect(
            index + 2 + condition_len,
            TokenKind::RParen,
            "Expected ')' after condition",
        )?;
        Ok((condition, 3 + condition_len))
    }

    /// `{ statement* }`. Consumed count includes both braces.
    fn parse_block(&self, index: usize) -> Result<(Node, usize), ParseError> {
        self.expect(index, TokenKind::LBrace, "Expected '{' to open block")?;
        let (body, body_len) = self.parse_sequence(index + 1, Some(TokenKind::RBrace))?;
        self.expect(
            index + 1 + body_len,
            TokenKind::RBrace,
            "Expected '}' to close block",
        )?;
        Ok((body, body_len + 2))
    }

    fn parse_list_definition(&self, index: usize) -> Result<(Node, usize), ParseError> {
        let (items, items_len) = self.parse_enclosed(index + 1, TokenKind::RBracket)?;
        self.expect(
            index + 1 + items_len,
            TokenKind::RBracket,
            "Expected ']' to close list",
        )?;
        Ok((Node::ListDefinition { items }, items_len + 2))
    }

    /// `name(arg arg ...)`: arguments are expressions parsed back to back
    /// until the closing parenthesis; separators between them are skipped
    /// rather than required.
    fn parse_function_call(&self, index: usize) -> Result<(Node, usize), ParseError> {
        let token = self.token_at(index)?;
        if token.kind != TokenKind::Identifier {
            return Err(ParseError::at(
                "Expected identifier to start function call",
                token,
            ));
        }

        self.expect(
            index + 1,
            TokenKind::LParen,
            "Expected '(' to open argument list",
        )?;
        let (args, args_len) = self.parse_enclosed(index + 2, TokenKind::RParen)?;
        self.expect(
            index + 2 + args_len,
            TokenKind::RParen,
            "Expected ')' to close argument list",
        )?;

        Ok((
            Node::FunctionCall {
                name: token.text.clone(),
                args,
            },
            args_len + 3,
        ))
    }

    /// Parses expressions back to back until `stop`. Consumed count covers
    /// the expressions and any separators, never the stop token.
    fn parse_enclosed(
        &self,
        index: usize,
        stop: TokenKind,
    ) -> Result<(Vec<Node>, usize), ParseError> {
        let mut nodes = Vec::new();
        let mut length = 0;

        while let Some(kind) = self.kind_at(index + length) {
            if kind == stop {
                break;
            }
            if kind == TokenKind::ArgSeparator {
                length += 1;
                continue;
            }
            let (expr, consumed) = self.parse_expression(index + length)?;
            nodes.push(expr);
            length += consumed;
        }

        Ok((nodes, length))
    }

    /// Parses one term; if an operator follows, collects the whole
    /// flattened operator/operand run and folds it by priority.
    ///
    /// The run ends at a closing `)`, `]`, `}`, at end of input, or at the
    /// first non-operator token after an operand (the next statement). The
    /// fold repeatedly collapses the leftmost highest-priority operator, so
    /// grouping among equal priorities is left-associative.
    fn parse_expression(&self, index: usize) -> Result<(Node, usize), ParseError> {
        let (left, left_len) = self.parse_term(index)?;
        let mut length = left_len;

        match self.kind_at(index + length) {
            Some(TokenKind::Operator) => {}
            _ => return Ok((left, length)),
        }

        let mut terms = vec![left];
        let mut operator_tokens: Vec<&Token> = Vec::new();

        loop {
            let Some(token) = self.tokens.get(index + length) else {
                break;
            };
            if token.kind != TokenKind::Operator {
                break;
            }
            if token.text == "=" {
                return Err(ParseError::at(
                    "No assignment is allowed inside an expression",
                    token,
                ));
            }
            operator_tokens.push(token);
            length += 1;

            match self.kind_at(index + length) {
                None | Some(TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace) => {
                    break;
                }
                _ => {
                    let (term, consumed) = self.parse_term(index + length)?;
                    terms.push(term);
                    length += consumed;
                }
            }
        }

        if terms.len() != operator_tokens.len() + 1 {
            return Err(ParseError::new(
                "Invalid operators count",
                operator_tokens.first().map(|token| token.position),
            ));
        }

        let mut operators = operator_priorities(&operator_tokens)?;

        while terms.len() > 1 {
            let mut best = 0;
            for (i, operator) in operators.iter().enumerate() {
                if operator.priority > operators[best].priority {
                    best = i;
                }
            }

            let operator = operators.remove(best);
            let right = terms.remove(best + 1);
            let left = terms.remove(best);
            terms.insert(best, operator.op.node(left, right));
        }

        Ok((terms.remove(0), length))
    }

    fn parse_term(&self, index: usize) -> Result<(Node, usize), ParseError> {
        let token = self.token_at(index)?;

        match token.kind {
            TokenKind::LBracket => self.parse_list_definition(index),
            TokenKind::Identifier => match self.kind_at(index + 1) {
                Some(TokenKind::LParen) => self.parse_function_call(index),
                Some(TokenKind::LBracket) => {
                    let (slice_index, consumed) = self.parse_expression(index + 2)?;
                    self.expect(
                        index + 2 + consumed,
                        TokenKind::RBracket,
                        "Expected ']' to close index",
                    )?;
                    Ok((
                        Node::ListSlice {
                            collection: Box::new(Node::VariableRef {
                                name: token.text.clone(),
                            }),
                            index: Box::new(slice_index),
                        },
                        consumed + 3,
                    ))
                }
                _ => Ok((
                    Node::VariableRef {
                        name: token.text.clone(),
                    },
                    1,
                )),
            },
            TokenKind::IntNumber => {
                let value = token
                    .text
                    .parse::<i64>()
                    .map_err(|_| ParseError::at("Invalid integer constant", token))?;
                Ok((Node::IntConstant(value), 1))
            }
            TokenKind::FloatNumber => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| ParseError::at("Invalid floating point constant", token))?;
                Ok((Node::FloatConstant(value), 1))
            }
            TokenKind::LParen => {
                let (expr, consumed) = self.parse_expression(index + 1)?;
                self.expect(
                    index + 1 + consumed,
                    TokenKind::RParen,
                    "Expected ')' to close expression",
                )?;
                Ok((expr, consumed + 2))
            }
            TokenKind::String => Ok((Node::StringConstant(token.text.clone()), 1)),
            _ => Err(ParseError::at("Unexpected token, while parsing term", token)),
        }
    }
}
