use std::fmt;

use log::trace;
use logos::Logos;
use lox_source::{Source, SyntaxError};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")] // single line comments
pub enum TokenKind {
    // punctuation
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // operators
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("+")]
    Plus,
    #[token("/")]
    Slash,
    #[token("*")]
    Star,
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEqual,
    #[token("=")]
    Equal,
    #[token("==")]
    EqualEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,

    // literals
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,
    #[regex(r#""[^"]*""#)]
    String,
    /// A string literal that reaches the end of the source. Never emitted by [`Scanner`].
    #[regex(r#""[^"]*"#)]
    UnterminatedString,
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    // keywords
    #[token("and")]
    And,
    #[token("class")]
    Class,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("fun")]
    Fun,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("nil")]
    Nil,
    #[token("or")]
    Or,
    #[token("print")]
    Print,
    #[token("return")]
    Return,
    #[token("super")]
    Super,
    #[token("this")]
    This,
    #[token("true")]
    True,
    #[token("var")]
    Var,
    #[token("while")]
    While,

    /// Only generated by the [`Scanner`] after the last token.
    Eof,
}

impl TokenKind {
    /// Returns `true` if a statement or declaration can start with this token.
    /// These are the tokens error recovery stops at.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return
        )
    }
}

/// Decoded value of a `Number` or `String` token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text. Empty for synthesized tokens.
    pub lexeme: String,
    /// 1-based line of the first character of the token.
    pub line: u32,
    pub literal: Option<Literal>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            literal: None,
        }
    }

    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    /// Creates the end of input token.
    pub fn eof(line: u32) -> Self {
        Self::new(TokenKind::Eof, "", line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if !self.lexeme.is_empty() {
            write!(f, " {}", self.lexeme)?;
        }
        write!(f, " line {}", self.line)
    }
}

/// Turns [`Source`] content into a sequence of [`Token`]s terminated by [`TokenKind::Eof`].
/// Lexical errors are reported to `source.errors` and the offending text is skipped.
pub struct Scanner<'a> {
    source: &'a Source<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self { source }
    }

    pub fn scan_tokens(&self) -> Vec<Token> {
        let content = self.source.content;
        let mut lexer = TokenKind::lexer(content);
        let mut tokens = Vec::new();
        let mut line = 1;
        let mut last_offset = 0;

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            line += count_newlines(&content[last_offset..span.start]);
            last_offset = span.start;

            let lexeme = lexer.slice();
            match result {
                Ok(TokenKind::UnterminatedString) => self.error(line, "Unterminated string."),
                Ok(TokenKind::String) => {
                    let text = &lexeme[1..lexeme.len() - 1];
                    tokens.push(
                        Token::new(TokenKind::String, lexeme, line)
                            .with_literal(Literal::String(text.to_string())),
                    );
                }
                Ok(TokenKind::Number) => match lexeme.parse() {
                    Ok(value) => tokens.push(
                        Token::new(TokenKind::Number, lexeme, line)
                            .with_literal(Literal::Number(value)),
                    ),
                    Err(_) => self.error(line, "Invalid number."),
                },
                Ok(kind) => tokens.push(Token::new(kind, lexeme, line)),
                Err(()) => self.error(line, "Unexpected character."),
            }
        }
        line += count_newlines(&content[last_offset..]);
        tokens.push(Token::eof(line));

        trace!("scanned {} tokens", tokens.len());
        tokens
    }

    fn error(&self, line: u32, message: &str) {
        self.source
            .errors
            .add_error(SyntaxError::new(line, "", message));
    }
}

fn count_newlines(text: &str) -> u32 {
    text.bytes().filter(|&byte| byte == b'\n').count() as u32
}
