//! Visitor pattern for AST nodes.

use crate::ast::{Expr, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::StringLit(_) => {}
        Expr::NumberLit(_) => {}
        Expr::BoolLit(_) => {}
        Expr::NilLit => {}
        Expr::Unary { op: _, arg } => visitor.visit_expr(arg),
        Expr::Binary { lhs, op: _, rhs } | Expr::Logical { lhs, op: _, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_expr(then_branch);
            visitor.visit_expr(else_branch);
        }
        Expr::Grouping(inner) => visitor.visit_expr(inner),
        Expr::Variable(_) => {}
        Expr::Assign { name: _, value } => visitor.visit_expr(value),
        Expr::Error => {}
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Expr(expr) => visitor.visit_expr(expr),
        Stmt::Print(expr) => visitor.visit_expr(expr),
        Stmt::VarDeclaration {
            name: _,
            initializer,
        } => {
            if let Some(initializer) = initializer {
                visitor.visit_expr(initializer);
            }
        }
        Stmt::Block(body) => {
            for stmt in body {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::While { condition, body } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(body);
        }
    }
}
