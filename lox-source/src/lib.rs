//! Source code representation and error management.

use std::{cell::RefCell, fmt};

use thiserror::Error;

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Accumulated errors.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        !self.errors.has_errors()
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// Represents a syntax error (compile time error).
///
/// `context` locates the error inside the line, e.g. `at 'foo'` or `at end`. It is empty when
/// there is no token to point at (scanner errors).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] Error{}: {message}", prefixed(.context))]
pub struct SyntaxError {
    pub line: u32,
    pub context: String,
    pub message: String,
}

fn prefixed(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" {}", context)
    }
}

impl SyntaxError {
    /// Create a new syntax error on `line` with the specified `context` and `message`.
    pub fn new(line: u32, context: impl ToString, message: impl ToString) -> Self {
        Self {
            line,
            context: context.to_string(),
            message: message.to_string(),
        }
    }
}

/// Manages all the errors.
pub struct ErrorReporter {
    errors: RefCell<Vec<SyntaxError>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds an error to the `ErrorReporter`.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, error: SyntaxError) {
        // This should be the only place where self.errors is borrowed mutably (apart from `reset`).
        self.errors.borrow_mut().push(error);
    }

    /// Returns `true` if at least one error was reported.
    pub fn has_errors(&self) -> bool {
        !self.errors.borrow().is_empty()
    }

    /// Number of reported errors.
    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Returns a snapshot of all the errors reported so far, in reporting order.
    pub fn errors(&self) -> Vec<SyntaxError> {
        self.errors.borrow().clone()
    }

    /// Forgets every reported error. Used by the REPL between input lines.
    pub fn reset(&self) {
        self.errors.borrow_mut().clear();
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.borrow();
        for error in errors.iter() {
            writeln!(f, "{}", error)?;
        }

        Ok(())
    }
}
