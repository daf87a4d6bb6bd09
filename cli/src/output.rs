//! CLI output formatting for the JSON mode.
//!
//! Machine-readable output for integration with editors and other tools.
//! The serialized shapes live here so the library itself stays serde-free.

use ember_lang::error::EmberError;
use ember_lang::lexer::Token;
use ember_lang::parser::ast::Node;
use serde::Serialize;

/// Output mode for CLI execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable output (default)
    Text,
    /// One JSON object per result
    Json,
}

impl OutputMode {
    pub fn from_arg(arg: &str) -> Result<Self, String> {
        match arg {
            "text" => Ok(OutputMode::Text),
            "json" => Ok(OutputMode::Json),
            other => Err(format!(
                "Unknown output format '{other}' (expected 'text' or 'json')"
            )),
        }
    }
}

#[derive(Debug, Serialize)]
struct TokenOutput<'a> {
    kind: &'static str,
    text: &'a str,
    line: u32,
    column: u32,
}

#[derive(Debug, Serialize)]
struct TokensOutput<'a> {
    tokens: Vec<TokenOutput<'a>>,
}

/// Error with 1-indexed line and column, when the error carries them.
#[derive(Debug, Serialize)]
struct ErrorOutput<'a> {
    error: &'static str,
    message: &'a str,
    line: Option<u32>,
    column: Option<u32>,
}

#[derive(Debug, Serialize)]
struct AstOutput {
    ast: String,
}

pub fn format_tokens_json(tokens: &[Token]) -> String {
    let output = TokensOutput {
        tokens: tokens
            .iter()
            .map(|token| TokenOutput {
                kind: token.kind.description(),
                text: &token.text,
                line: token.position.line,
                column: token.position.column,
            })
            .collect(),
    };
    serde_json::to_string(&output).unwrap()
}

pub fn format_error_json(err: &EmberError) -> String {
    let output = ErrorOutput {
        error: err.kind(),
        message: err.message(),
        line: err.position().map(|position| position.line),
        column: err.position().map(|position| position.column),
    };
    serde_json::to_string(&output).unwrap()
}

pub fn format_ast_json(program: &Node) -> String {
    let output = AstOutput {
        ast: program.to_string(),
    };
    serde_json::to_string(&output).unwrap()
}
