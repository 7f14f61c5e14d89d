//! Pretty printers for the AST.
//!
//! [`print_expr`], [`print_stmt`] and [`print_program`] render S-expressions for debugging and
//! tests. [`to_source`] renders Lox source that parses back into the same tree.

use crate::ast::{Expr, Stmt};
use crate::lexer::TokenKind;

const INDENT: &str = "    ";

/// Renders `expr` as an S-expression, e.g. `(+ 1 (* 2 3))`.
pub fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::StringLit(value) => format!("\"{}\"", value),
        Expr::NumberLit(value) => value.to_string(),
        Expr::BoolLit(value) => value.to_string(),
        Expr::NilLit => "nil".to_string(),
        Expr::Unary { op, arg } => format!("({} {})", op.lexeme, print_expr(arg)),
        Expr::Binary { lhs, op, rhs } | Expr::Logical { lhs, op, rhs } => format!(
            "({} {} {})",
            op.lexeme,
            print_expr(lhs),
            print_expr(rhs)
        ),
        Expr::Conditional {
            condition,
            then_branch,
            else_branch,
        } => format!(
            "(?: {} {} {})",
            print_expr(condition),
            print_expr(then_branch),
            print_expr(else_branch)
        ),
        Expr::Grouping(inner) => format!("(group {})", print_expr(inner)),
        Expr::Variable(name) => name.lexeme.clone(),
        Expr::Assign { name, value } => format!("(= {} {})", name.lexeme, print_expr(value)),
        Expr::Error => "<error>".to_string(),
    }
}

/// Renders `stmt` as an S-expression, e.g. `(while (< i 3) (print i))`.
pub fn print_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Expr(expr) => format!("(expr {})", print_expr(expr)),
        Stmt::Print(expr) => format!("(print {})", print_expr(expr)),
        Stmt::VarDeclaration {
            name,
            initializer: Some(initializer),
        } => format!("(var {} {})", name.lexeme, print_expr(initializer)),
        Stmt::VarDeclaration {
            name,
            initializer: None,
        } => format!("(var {})", name.lexeme),
        Stmt::Block(body) => {
            let mut out = "(block".to_string();
            for stmt in body {
                out.push(' ');
                out.push_str(&print_stmt(stmt));
            }
            out.push(')');
            out
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => match else_branch {
            Some(else_branch) => format!(
                "(if {} {} {})",
                print_expr(condition),
                print_stmt(then_branch),
                print_stmt(else_branch)
            ),
            None => format!("(if {} {})", print_expr(condition), print_stmt(then_branch)),
        },
        Stmt::While { condition, body } => {
            format!("(while {} {})", print_expr(condition), print_stmt(body))
        }
    }
}

/// Renders every statement of `program` on its own line.
pub fn print_program(program: &[Stmt]) -> String {
    program
        .iter()
        .map(print_stmt)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders `program` as Lox source.
///
/// Parentheses are only emitted for [`Expr::Grouping`] nodes, so a tree obtained by parsing is
/// printed back into source that parses into the same tree.
pub fn to_source(program: &[Stmt]) -> String {
    let mut printer = SourcePrinter::default();
    for stmt in program {
        printer.stmt(stmt);
        printer.out.push('\n');
    }
    printer.out
}

#[derive(Default)]
struct SourcePrinter {
    out: String,
    depth: usize,
}

impl SourcePrinter {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    /// Writes `stmt` at the current position. Nested statements start on the same line.
    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => {
                self.expr(expr);
                self.out.push(';');
            }
            Stmt::Print(expr) => {
                self.out.push_str("print ");
                self.expr(expr);
                self.out.push(';');
            }
            Stmt::VarDeclaration { name, initializer } => {
                self.out.push_str("var ");
                self.out.push_str(&name.lexeme);
                if let Some(initializer) = initializer {
                    self.out.push_str(" = ");
                    self.expr(initializer);
                }
                self.out.push(';');
            }
            Stmt::Block(body) => {
                self.out.push('{');
                self.depth += 1;
                for stmt in body {
                    self.out.push('\n');
                    self.indent();
                    self.stmt(stmt);
                }
                self.depth -= 1;
                if !body.is_empty() {
                    self.out.push('\n');
                    self.indent();
                }
                self.out.push('}');
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.out.push_str("if (");
                self.expr(condition);
                self.out.push_str(") ");
                self.stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.out.push_str(" else ");
                    self.stmt(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.out.push_str("while (");
                self.expr(condition);
                self.out.push_str(") ");
                self.stmt(body);
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::StringLit(value) => {
                self.out.push('"');
                self.out.push_str(value);
                self.out.push('"');
            }
            Expr::NumberLit(value) => self.out.push_str(&value.to_string()),
            Expr::BoolLit(value) => self.out.push_str(&value.to_string()),
            Expr::NilLit => self.out.push_str("nil"),
            Expr::Unary { op, arg } => {
                self.out.push_str(&op.lexeme);
                self.expr(arg);
            }
            Expr::Binary { lhs, op, rhs } | Expr::Logical { lhs, op, rhs } => {
                self.expr(lhs);
                if op.kind != TokenKind::Comma {
                    self.out.push(' ');
                }
                self.out.push_str(&op.lexeme);
                self.out.push(' ');
                self.expr(rhs);
            }
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                self.expr(condition);
                self.out.push_str(" ? ");
                self.expr(then_branch);
                self.out.push_str(" : ");
                self.expr(else_branch);
            }
            Expr::Grouping(inner) => {
                self.out.push('(');
                self.expr(inner);
                self.out.push(')');
            }
            Expr::Variable(name) => self.out.push_str(&name.lexeme),
            Expr::Assign { name, value } => {
                self.out.push_str(&name.lexeme);
                self.out.push_str(" = ");
                self.expr(value);
            }
            // Not valid Lox. Only present in programs that had errors.
            Expr::Error => self.out.push_str("<error>"),
        }
    }
}
