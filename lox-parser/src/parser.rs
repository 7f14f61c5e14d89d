use crate::ast::{Expr, Stmt};
use crate::lexer::{Literal, Scanner, Token, TokenKind};
use log::{debug, info};
use lox_source::{Source, SyntaxError};
use thiserror::Error;

mod expr;
mod stmt;

/// Default for [`ParserConfig::max_depth`].
///
/// Every open level of nesting costs roughly a dozen stack frames (one per precedence level).
/// Must fit in a 2 MiB thread stack in debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum number of nested statements, unary operators and parenthesized or right-recursive
    /// expressions. Deeper input is rejected with a syntax error instead of exhausting the stack.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Structural parse failure. The diagnostic has already been reported to the [`Source`] by the
/// time this is returned; it only unwinds the parser to the enclosing declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("parse error")]
pub struct ParseError;

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'a> {
    /// Always ends with exactly one [`TokenKind::Eof`].
    tokens: Vec<Token>,
    /// Index of the next token to be consumed.
    current: usize,
    /// Number of currently open nesting levels. See [`ParserConfig::max_depth`].
    depth: usize,
    config: ParserConfig,
    /// Source code. Errors are reported to `source.errors`.
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, source: &'a Source<'a>) -> Self {
        Self::with_config(tokens, source, ParserConfig::default())
    }

    pub fn with_config(mut tokens: Vec<Token>, source: &'a Source<'a>, config: ParserConfig) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token::eof(line));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
            config,
            source,
        }
    }

    /// Scans `source` and creates a parser over the resulting tokens.
    pub fn from_source(source: &'a Source<'a>) -> Self {
        let tokens = Scanner::new(source).scan_tokens();
        Self::new(tokens, source)
    }

    /// Parses declarations until the end of input.
    ///
    /// Syntax errors are reported to the [`Source`] and the offending declarations are left out
    /// of the returned program. Whether to go on with a program that has errors is up to the
    /// caller (see [`Source::has_no_errors`]).
    pub fn parse_program(&mut self) -> Vec<Stmt> {
        info!("parsing {} tokens", self.tokens.len());
        let mut program = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.parse_declaration() {
                program.push(stmt);
            }
        }
        info!(
            "parsed {} top level statements with {} errors",
            program.len(),
            self.source.errors.len()
        );
        program
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    /// The next token to be consumed.
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// The last consumed token, or the first token if nothing was consumed yet.
    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Returns `true` once every token but [`TokenKind::Eof`] has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Tests the next token without consuming it. Always `false` at the end of input.
    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Consumes the next token and returns it. Does nothing at the end of input, in which case
    /// the last consumed token is returned.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// Predicate that tests whether the next token is of `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Same as [`Self::eat`] but accepts any of `kinds`.
    fn eat_any(&mut self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|&kind| self.eat(kind))
    }

    /// Eats a token of `kind` or fails with `message`.
    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.error(self.peek(), message))
        }
    }

    /// Reports an error located at `token` without unwinding.
    fn report(&self, token: &Token, message: &str) {
        let context = if token.kind == TokenKind::Eof {
            "at end".to_string()
        } else {
            format!("at '{}'", token.lexeme)
        };
        self.source
            .errors
            .add_error(SyntaxError::new(token.line, context, message));
    }

    /// Reports an error located at `token` and returns the [`ParseError`] to unwind with.
    fn error(&self, token: &Token, message: &str) -> ParseError {
        self.report(token, message);
        ParseError
    }

    /// Runs `rule` one nesting level deeper, failing if that exceeds [`ParserConfig::max_depth`].
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.config.max_depth {
            return Err(self.error(self.peek(), "Too much nesting."));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Skips tokens until the start of the next statement so parsing can resume after an error.
    fn synchronize(&mut self) {
        debug!("synchronizing after error on line {}", self.peek().line);
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon || self.peek().kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }
}
