//! Lox front end: tokens, abstract syntax tree and a recursive descent parser with error recovery.
//!
//! ```
//! use lox_parser::parser::Parser;
//! use lox_parser::printer::print_program;
//! use lox_source::Source;
//!
//! let source = Source::new("for (var i = 0; i < 3; i = i + 1) print i;");
//! let program = Parser::from_source(&source).parse_program();
//! assert!(source.has_no_errors());
//! assert_eq!(
//!     print_program(&program),
//!     "(block (var i 0) (while (< i 3) (block (print i) (expr (= i (+ i 1))))))"
//! );
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod visitor;
