//! Driver for the Lox front end: scans and parses a source text and renders the result.

use lox_parser::ast::Stmt;
use lox_parser::lexer::Scanner;
use lox_parser::parser::{Parser, ParserConfig};
use lox_parser::printer::{print_program, to_source};
use lox_source::{Source, SyntaxError};

/// Exit code for source files with syntax errors (`EX_DATAERR` from `sysexits.h`).
pub const EX_DATAERR: i32 = 65;

/// What to print for a parsed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// Print every scanned token before the program.
    pub tokens: bool,
    /// Print the program as Lox source instead of S-expressions.
    pub as_source: bool,
    pub parser: ParserConfig,
}

/// Result of processing one source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Text for stdout. The program is only rendered when there were no errors.
    pub output: String,
    pub errors: Vec<SyntaxError>,
}

impl Outcome {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Scans and parses `content`. Returns the program if no error was reported, otherwise every
/// reported error.
pub fn parse(content: &str, config: ParserConfig) -> Result<Vec<Stmt>, Vec<SyntaxError>> {
    let source = Source::new(content);
    let tokens = Scanner::new(&source).scan_tokens();
    let program = Parser::with_config(tokens, &source, config).parse_program();
    if source.has_no_errors() {
        Ok(program)
    } else {
        Err(source.errors.errors())
    }
}

/// Scans and parses `content` and renders it according to `options`.
pub fn process(content: &str, options: &Options) -> Outcome {
    let source = Source::new(content);
    let tokens = Scanner::new(&source).scan_tokens();

    let mut output = String::new();
    if options.tokens {
        for token in &tokens {
            output.push_str(&token.to_string());
            output.push('\n');
        }
    }

    let program = Parser::with_config(tokens, &source, options.parser).parse_program();
    if source.has_no_errors() {
        let rendered = if options.as_source {
            to_source(&program)
        } else {
            print_program(&program)
        };
        output.push_str(rendered.trim_end());
        if !rendered.trim_end().is_empty() {
            output.push('\n');
        }
    }

    Outcome {
        output,
        errors: source.errors.errors(),
    }
}
