//! Ember CLI - front-end driver
//!
//! Usage:
//!   ember-cli <SCRIPT>           Parse a script file
//!   ember-cli -e <CODE>          Parse inline source
//!   ember-cli -t <SCRIPT>        Also print the token stream
//!   ember-cli -o <FORMAT>        Output format: text (default), json
//!   cat file | ember-cli         Read source from stdin

mod output;

use clap::Parser;
use ember_lang::error::EmberError;
use ember_lang::lexer::{self, Lexer, Token};
use ember_lang::parser;
use output::OutputMode;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

/// Ember language front end
#[derive(Parser, Debug)]
#[command(name = "ember-cli", version, about = "Ember language front end", long_about = None)]
struct Args {
    /// The script file to parse (stdin is read when omitted and -e unused)
    script: Option<PathBuf>,

    /// Parse inline source instead of a file
    #[arg(short = 'e', long = "eval", value_name = "CODE")]
    eval: Option<String>,

    /// Print the token stream before the syntax tree
    #[arg(short = 't', long = "tokens")]
    tokens: bool,

    /// Output format: text (default) or json
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FORMAT",
        default_value = "text"
    )]
    output: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mode = match OutputMode::from_arg(&args.output) {
        Ok(mode) => mode,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let source = match read_source(&args) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Failed to read source: {err}");
            return ExitCode::FAILURE;
        }
    };

    run(&source, args.tokens, mode)
}

fn read_source(args: &Args) -> io::Result<String> {
    if let Some(code) = &args.eval {
        return Ok(code.clone());
    }

    if let Some(path) = &args.script {
        return fs::read_to_string(path);
    }

    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;
    Ok(source)
}

fn run(source: &str, dump_tokens: bool, mode: OutputMode) -> ExitCode {
    let mut lexer = Lexer::new(source);
    let mut tokens: Vec<Token> = Vec::new();

    // Pull tokens one at a time, reclassifying keywords before anything
    // downstream sees them. A lex error is terminal for the stream.
    loop {
        match lexer.next_token() {
            Ok(Some(token)) => {
                let token = lexer::find_keyword(token);
                if dump_tokens && mode == OutputMode::Text {
                    println!("{token}");
                }
                tokens.push(token);
            }
            Ok(None) => break,
            Err(err) => return report(&EmberError::from(err), mode),
        }
    }

    if dump_tokens && mode == OutputMode::Json {
        println!("{}", output::format_tokens_json(&tokens));
    }

    match parser::parse(tokens) {
        Ok(program) => {
            match mode {
                OutputMode::Text => println!("{program}"),
                OutputMode::Json => println!("{}", output::format_ast_json(&program)),
            }
            ExitCode::SUCCESS
        }
        Err(err) => report(&EmberError::from(err), mode),
    }
}

fn report(err: &EmberError, mode: OutputMode) -> ExitCode {
    match mode {
        OutputMode::Text => eprintln!("{err}"),
        OutputMode::Json => println!("{}", output::format_error_json(err)),
    }
    ExitCode::FAILURE
}
