use super::*;

impl<'a> Parser<'a> {
    /// Parses a declaration (or statement).
    ///
    /// This is where parsing recovers from syntax errors: on failure the parser is synchronized to
    /// the next statement boundary and `None` is returned. Callers must skip `None`.
    pub fn parse_declaration(&mut self) -> Option<Stmt> {
        debug!("parsing declaration on line {}", self.peek().line);
        let result = if self.eat(TokenKind::Var) {
            self.parse_var_declaration()
        } else {
            self.parse_stmt()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(ParseError) => {
                self.synchronize();
                None
            }
        }
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        self.nested(|parser| {
            if parser.eat(TokenKind::Print) {
                parser.parse_print_stmt()
            } else if parser.eat(TokenKind::LeftBrace) {
                parser.parse_block_stmt()
            } else if parser.eat(TokenKind::If) {
                parser.parse_if_stmt()
            } else if parser.eat(TokenKind::While) {
                parser.parse_while_stmt()
            } else if parser.eat(TokenKind::For) {
                parser.parse_for_stmt()
            } else {
                parser.parse_expr_stmt()
            }
        })
    }

    /// Parses the rest of a `var` declaration. `var` has already been eaten.
    fn parse_var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expected variable name.")?;
        let initializer = if self.eat(TokenKind::Equal) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.consume(
            TokenKind::Semicolon,
            "Expected ';' after variable declaration.",
        )?;
        Ok(Stmt::VarDeclaration { name, initializer })
    }

    fn parse_print_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after value.")?;
        Ok(Stmt::Print(expr))
    }

    /// Parses the body of a block. `{` has already been eaten.
    fn parse_block_stmt(&mut self) -> ParseResult<Stmt> {
        let mut body = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.parse_declaration() {
                body.push(stmt);
            }
        }
        self.consume(TokenKind::RightBrace, "Expected '}' after block.")?;
        Ok(Stmt::Block(body))
    }

    /// `else` is bound to the nearest `if` because the then branch eats it first.
    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'if'.")?;
        let condition = self.parse_expr()?;
        self.consume(TokenKind::RightParen, "Expected ')' after if condition.")?;

        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'while'.")?;
        let condition = self.parse_expr()?;
        self.consume(TokenKind::RightParen, "Expected ')' after while condition.")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { condition, body })
    }

    /// Parses a `for` loop and desugars it into a `while` loop:
    ///
    /// `for (init; cond; incr) body` becomes `{ init; while (cond) { body; incr; } }`.
    /// A missing condition is `true`. Missing initializer and increment are left out.
    fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'for'.")?;

        let initializer = if self.eat(TokenKind::Semicolon) {
            None
        } else if self.eat(TokenKind::Var) {
            Some(self.parse_var_declaration()?)
        } else {
            Some(self.parse_expr_stmt()?)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after loop condition.")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume(TokenKind::RightParen, "Expected ')' after for clauses.")?;

        let mut body = self.parse_stmt()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expr(increment)]);
        }
        let condition = condition.unwrap_or(Expr::BoolLit(true));
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };
        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after value.")?;
        Ok(Stmt::Expr(expr))
    }
}
