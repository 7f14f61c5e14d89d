//! Abstract syntax tree nodes.
//!
//! Every node owns its children. There is no sharing between trees and no node is mutated once
//! the parser has returned it.

use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    StringLit(String),
    NumberLit(f64),
    BoolLit(bool),
    NilLit,
    /// A prefix expression (e.g. `-a` or `!b`).
    Unary { op: Token, arg: Box<Expr> },
    /// A binary expression (e.g. `1+1`). The comma operator is a binary expression too.
    Binary {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// A ternary conditional (e.g. `a ? b : c`).
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// A parenthesized expression (e.g. `(a)`).
    Grouping(Box<Expr>),
    /// An identifier (e.g. `foo`).
    Variable(Token),
    /// An assignment (e.g. `a = 1`). `name` is always an identifier token.
    Assign { name: Token, value: Box<Expr> },
    /// A short-circuiting `and` / `or`.
    Logical {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// The missing operand of a binary operator with no left-hand side (e.g. `== 1`).
    /// Only produced after an error has been reported.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// An expression followed by `;`.
    Expr(Expr),
    Print(Expr),
    /// `var name = initializer;` with an optional initializer.
    VarDeclaration {
        name: Token,
        initializer: Option<Expr>,
    },
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// `while` loop. `for` loops are desugared into this.
    While { condition: Expr, body: Box<Stmt> },
}

impl Expr {
    pub fn binary(lhs: Expr, op: Token, rhs: Expr) -> Self {
        Expr::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    pub fn logical(lhs: Expr, op: Token, rhs: Expr) -> Self {
        Expr::Logical {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }
}
