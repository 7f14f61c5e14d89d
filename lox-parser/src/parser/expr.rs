use super::*;

/// Operand parser of one precedence level.
type Rule<'a> = fn(&mut Parser<'a>) -> ParseResult<Expr>;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression, including the comma operator.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.nested(Self::parse_comma)
    }

    /// Parses a left associative chain of `operand`s separated by any of `operators`.
    fn parse_left_assoc(
        &mut self,
        operators: &[TokenKind],
        operand: Rule<'a>,
        node: fn(Expr, Token, Expr) -> Expr,
    ) -> ParseResult<Expr> {
        let mut lhs = operand(self)?;
        while self.eat_any(operators) {
            let op = self.previous().clone();
            let rhs = operand(self)?;
            lhs = node(lhs, op, rhs);
        }
        Ok(lhs)
    }

    fn parse_comma(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[TokenKind::Comma], Self::parse_assignment, Expr::binary)
    }

    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_conditional()?;
        if !self.eat(TokenKind::Equal) {
            return Ok(expr);
        }

        let equals = self.previous().clone();
        let value = self.nested(Self::parse_assignment)?;
        match expr {
            Expr::Variable(name) => Ok(Expr::Assign {
                name,
                value: Box::new(value),
            }),
            expr => {
                // not a grammar error, keep going with the lhs
                self.report(&equals, "Invalid assignment target.");
                Ok(expr)
            }
        }
    }

    /// Parses `condition ? then : else`. Both branches may be any expression.
    fn parse_conditional(&mut self) -> ParseResult<Expr> {
        let condition = self.parse_logic_or()?;
        if !self.eat(TokenKind::Question) {
            return Ok(condition);
        }

        let then_branch = self.parse_expr()?;
        self.consume(
            TokenKind::Colon,
            "Expected ':' after then-branch of ternary conditional expression.",
        )?;
        let else_branch = self.parse_expr()?;
        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn parse_logic_or(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[TokenKind::Or], Self::parse_logic_and, Expr::logical)
    }

    fn parse_logic_and(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[TokenKind::And], Self::parse_equality, Expr::logical)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[TokenKind::EqualEqual, TokenKind::BangEqual],
            Self::parse_comparison,
            Expr::binary,
        )
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ],
            Self::parse_term,
            Expr::binary,
        )
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[TokenKind::Minus, TokenKind::Plus],
            Self::parse_factor,
            Expr::binary,
        )
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[TokenKind::Star, TokenKind::Slash],
            Self::parse_unary,
            Expr::binary,
        )
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        self.nested(|parser| {
            if parser.eat_any(&[TokenKind::Bang, TokenKind::Minus]) {
                let op = parser.previous().clone();
                let arg = parser.parse_unary()?;
                Ok(Expr::Unary {
                    op,
                    arg: Box::new(arg),
                })
            } else {
                parser.parse_primary()
            }
        })
    }

    /// Parses a primary (atom) expression.
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::False => {
                self.advance();
                Ok(Expr::BoolLit(false))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::BoolLit(true))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Expr::NilLit)
            }
            TokenKind::Number | TokenKind::String => self.parse_literal_expr(),
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.consume(TokenKind::RightParen, "Expected ')' after expression.")?;
                Ok(Expr::Grouping(Box::new(expr)))
            }
            TokenKind::Identifier => Ok(Expr::Variable(self.advance().clone())),

            // Error productions for binary operators without a lhs.
            TokenKind::EqualEqual | TokenKind::BangEqual => {
                self.parse_missing_lhs(Self::parse_equality)
            }
            TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
                self.parse_missing_lhs(Self::parse_comparison)
            }
            TokenKind::Plus => self.parse_missing_lhs(Self::parse_term),
            TokenKind::Star | TokenKind::Slash => self.parse_missing_lhs(Self::parse_factor),

            _ => Err(self.error(self.peek(), "Expected expression.")),
        }
    }

    /* Expressions.Literals */
    /// Parses a number or string literal from the decoded token payload.
    fn parse_literal_expr(&mut self) -> ParseResult<Expr> {
        let token = self.advance().clone();
        match (token.kind, token.literal) {
            (TokenKind::Number, Some(Literal::Number(value))) => Ok(Expr::NumberLit(value)),
            (TokenKind::String, Some(Literal::String(value))) => Ok(Expr::StringLit(value)),
            _ => Err(self.error(self.previous(), "Expected literal value.")),
        }
    }

    /// Reports the operator as missing its left operand, then parses and drops the right operand
    /// with `operand` so parsing resumes after it.
    fn parse_missing_lhs(&mut self, operand: Rule<'a>) -> ParseResult<Expr> {
        let op = self.advance().clone();
        self.report(&op, "Missing left-hand operand.");
        operand(self)?;
        Ok(Expr::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::print_expr;
    use insta::assert_snapshot;

    /// Parses a single expression that must span the whole input and produce no errors.
    fn expr(content: &str) -> Expr {
        let source = Source::new(content);
        let mut parser = Parser::from_source(&source);
        let ast = parser.parse_expr();
        assert!(source.has_no_errors(), "{}", source.errors);
        assert!(parser.is_at_end());
        ast.expect("no errors were reported")
    }

    fn sexpr(content: &str) -> String {
        print_expr(&expr(content))
    }

    /// Parses a single expression and returns the result along with the reported messages.
    fn expr_with_errors(content: &str) -> (ParseResult<Expr>, Vec<String>) {
        let source = Source::new(content);
        let result = Parser::from_source(&source).parse_expr();
        let errors = source
            .errors
            .errors()
            .iter()
            .map(ToString::to_string)
            .collect();
        (result, errors)
    }

    #[test]
    fn test_literal() {
        assert_eq!(expr("true"), Expr::BoolLit(true));
        assert_eq!(expr("false"), Expr::BoolLit(false));
        assert_eq!(expr("nil"), Expr::NilLit);
        assert_eq!(expr("1"), Expr::NumberLit(1.0));
        assert_eq!(expr("2.5"), Expr::NumberLit(2.5));
        assert_eq!(expr("\"str\""), Expr::StringLit("str".to_string()));
    }

    #[test]
    fn test_identifier() {
        match expr("foo") {
            Expr::Variable(name) => {
                assert_eq!(name.kind, TokenKind::Identifier);
                assert_eq!(name.lexeme, "foo");
            }
            other => panic!("expected a variable, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_expr() {
        assert_snapshot!(sexpr("1 + 1"), @"(+ 1 1)");
        assert_snapshot!(sexpr("1 == 2 - 1"), @"(== 1 (- 2 1))");
        assert_snapshot!(sexpr("1 + 2 * 3"), @"(+ 1 (* 2 3))");
        assert_snapshot!(sexpr("2 * 2 * 2"), @"(* (* 2 2) 2)"); // should be (2 * 2) * 2
        assert_snapshot!(sexpr("1 - 2 - 3"), @"(- (- 1 2) 3)");
        assert_snapshot!(sexpr("1 < 2 == 3 >= 4"), @"(== (< 1 2) (>= 3 4))");
        assert_snapshot!(sexpr("6 / 3 != 1"), @"(!= (/ 6 3) 1)");
    }

    #[test]
    fn test_precedence_shape() {
        let ast = expr("1 + 2 * 3");
        match ast {
            Expr::Binary { lhs, op, rhs } => {
                assert_eq!(*lhs, Expr::NumberLit(1.0));
                assert_eq!(op.kind, TokenKind::Plus);
                assert!(matches!(*rhs, Expr::Binary { ref op, .. } if op.kind == TokenKind::Star));
            }
            other => panic!("expected a binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_grouping() {
        assert_snapshot!(sexpr("(1 + 2) * 3"), @"(* (group (+ 1 2)) 3)");
        assert_snapshot!(sexpr("((a))"), @"(group (group a))");
    }

    #[test]
    fn test_unary() {
        assert_snapshot!(sexpr("-1"), @"(- 1)");
        assert_snapshot!(sexpr("!!a"), @"(! (! a))");
        assert_snapshot!(sexpr("- -a * b"), @"(* (- (- a)) b)");
        assert_snapshot!(sexpr("-a + b"), @"(+ (- a) b)");
    }

    #[test]
    fn test_logical() {
        assert_snapshot!(sexpr("a or b and c"), @"(or a (and b c))");
        assert_snapshot!(sexpr("a and b or c"), @"(or (and a b) c)");
        assert_snapshot!(sexpr("a or b or c"), @"(or (or a b) c)");
        assert_snapshot!(sexpr("a == b and c"), @"(and (== a b) c)");
        assert!(matches!(expr("a and b"), Expr::Logical { .. }));
    }

    #[test]
    fn test_assignment() {
        assert_snapshot!(sexpr("a = 1"), @"(= a 1)");
        assert_snapshot!(sexpr("a = b = c"), @"(= a (= b c))"); // should be a = (b = c)
        assert_snapshot!(sexpr("a = b or c"), @"(= a (or b c))");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let inner = match expr("a = b = c") {
            Expr::Assign { name, value } => {
                assert_eq!(name.lexeme, "a");
                *value
            }
            other => panic!("expected an assignment, got {:?}", other),
        };
        match inner {
            Expr::Assign { name, value } => {
                assert_eq!(name.lexeme, "b");
                assert!(matches!(*value, Expr::Variable(ref c) if c.lexeme == "c"));
            }
            other => panic!("expected an assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_conditional() {
        assert_snapshot!(sexpr("a ? b : c"), @"(?: a b c)");
        assert_snapshot!(sexpr("a ? b : c ? d : e"), @"(?: a b (?: c d e))");
        assert_snapshot!(sexpr("a ? b ? c : d : e"), @"(?: a (?: b c d) e)");
        assert_snapshot!(sexpr("a or b ? c : d"), @"(?: (or a b) c d)");
        // branches are full expressions
        assert_snapshot!(sexpr("a ? b = 1, c : d = 2"), @"(?: a (, (= b 1) c) (= d 2))");
    }

    #[test]
    fn test_conditional_is_right_associative() {
        match expr("a ? b : c ? d : e") {
            Expr::Conditional { else_branch, .. } => {
                assert!(matches!(*else_branch, Expr::Conditional { .. }))
            }
            other => panic!("expected a conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_comma() {
        assert_snapshot!(sexpr("a, b"), @"(, a b)");
        assert_snapshot!(sexpr("a, b, c"), @"(, (, a b) c)");
        assert_snapshot!(sexpr("a = 1, b = 2"), @"(, (= a 1) (= b 2))");
    }

    #[test]
    fn test_operator_token_is_kept() {
        let source = Source::new("1 +\n 2");
        let ast = Parser::from_source(&source).parse_expr();
        match ast {
            Ok(Expr::Binary { op, .. }) => {
                assert_eq!(op.kind, TokenKind::Plus);
                assert_eq!(op.lexeme, "+");
                assert_eq!(op.line, 1);
            }
            other => panic!("expected a binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        let (result, errors) = expr_with_errors("1 = 2");
        assert_eq!(result, Ok(Expr::NumberLit(1.0)));
        assert_eq!(errors, vec!["[line 1] Error at '=': Invalid assignment target."]);

        let (result, errors) = expr_with_errors("(a) = 2");
        assert!(matches!(result, Ok(Expr::Grouping(_))));
        assert_eq!(errors.len(), 1);

        let (result, errors) = expr_with_errors("a + b = c");
        assert!(matches!(result, Ok(Expr::Binary { .. })));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_missing_left_operand() {
        let (result, errors) = expr_with_errors("== 1");
        assert_eq!(result, Ok(Expr::Error));
        assert_eq!(errors, vec!["[line 1] Error at '==': Missing left-hand operand."]);

        for content in &["!= 1", "< 1", "<= 1", "> 1", ">= 1", "+ 1", "* 1", "/ 1"] {
            let (result, errors) = expr_with_errors(content);
            assert_eq!(result, Ok(Expr::Error), "{}", content);
            assert_eq!(errors.len(), 1, "{}", content);
        }
    }

    #[test]
    fn test_missing_left_operand_discards_matching_level() {
        let source = Source::new("+ 1 * 2 - 3 == 4");
        let mut parser = Parser::from_source(&source);
        // the term `1 * 2 - 3` is discarded, the equality is built on the absent operand
        let ast = parser.parse_expr();
        assert_eq!(source.errors.len(), 1);
        assert!(parser.is_at_end());
        match ast {
            Ok(Expr::Binary { lhs, op, rhs }) => {
                assert_eq!(*lhs, Expr::Error);
                assert_eq!(op.kind, TokenKind::EqualEqual);
                assert_eq!(*rhs, Expr::NumberLit(4.0));
            }
            other => panic!("expected a binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_leading_minus_is_unary() {
        assert_snapshot!(sexpr("- 1 + 2"), @"(+ (- 1) 2)");
    }

    #[test]
    fn test_structural_errors() {
        let (result, errors) = expr_with_errors("(1 + 2");
        assert_eq!(result, Err(ParseError));
        assert_eq!(errors, vec!["[line 1] Error at end: Expected ')' after expression."]);

        let (result, errors) = expr_with_errors("a ? b");
        assert_eq!(result, Err(ParseError));
        assert_eq!(
            errors,
            vec!["[line 1] Error at end: Expected ':' after then-branch of ternary conditional expression."]
        );

        let (result, errors) = expr_with_errors(")");
        assert_eq!(result, Err(ParseError));
        assert_eq!(errors, vec!["[line 1] Error at ')': Expected expression."]);

        let (result, errors) = expr_with_errors("1 +");
        assert_eq!(result, Err(ParseError));
        assert_eq!(errors, vec!["[line 1] Error at end: Expected expression."]);
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let content = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
        let source = Source::new(&content);
        let tokens = Scanner::new(&source).scan_tokens();
        let config = ParserConfig { max_depth: 32 };
        let result = Parser::with_config(tokens, &source, config).parse_expr();
        assert_eq!(result, Err(ParseError));
        let messages: Vec<_> = source
            .errors
            .errors()
            .into_iter()
            .map(|error| error.message)
            .collect();
        assert_eq!(messages, vec!["Too much nesting."]);
    }

    #[test]
    fn test_nesting_below_limit() {
        let content = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        let source = Source::new(&content);
        let tokens = Scanner::new(&source).scan_tokens();
        let config = ParserConfig { max_depth: 64 };
        let result = Parser::with_config(tokens, &source, config).parse_expr();
        assert!(result.is_ok());
        assert!(source.has_no_errors());
    }
}
