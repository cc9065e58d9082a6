// ABOUTME: Pratt parser turning a token stream into a Program AST

use crate::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // > <
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // fn(x)
    Index,       // arr[x]
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

/// Pratt-style recursive-descent parser. Keeps two tokens of lookahead
/// (`current`, `peek`) advanced in lock-step with the lexer; a match over
/// `current.kind` plays the prefix-handler table's role and a match over
/// `peek.kind` inside `parse_expression`'s loop plays the infix/precedence
/// tables' role.
pub struct Parser {
    lexer: Lexer,
    current: Token,
    peek: Token,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Parser {
            lexer,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn advance(&mut self) {
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek.kind == kind {
            self.advance();
            true
        } else {
            self.errors.push(format!(
                "expected next token to be {}, got {} instead",
                kind, self.peek.kind
            ));
            false
        }
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek.kind)
    }

    fn current_precedence(&self) -> Precedence {
        precedence_of(self.current.kind)
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while self.current.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier {
            token: self.current.clone(),
            value: self.current.literal.clone(),
        };

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek.kind == TokenKind::Semicolon {
            self.advance();
        }

        Some(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();

        // `return;` / `return }` with no expression evaluates as null. Don't
        // advance past `return` itself in that case, so the block loop's
        // trailing `advance()` lands exactly on the `;` or `}` that follows.
        let value = if matches!(
            self.peek.kind,
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        ) {
            None
        } else {
            self.advance();
            Some(self.parse_expression(Precedence::Lowest)?)
        };

        if self.peek.kind == TokenKind::Semicolon {
            self.advance();
        }

        Some(Statement::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek.kind == TokenKind::Semicolon {
            self.advance();
        }

        Some(Statement::Expression { token, expression })
    }

    fn parse_expression(&mut self, min_precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while self.peek.kind != TokenKind::Semicolon && min_precedence < self.peek_precedence() {
            left = match self.peek.kind {
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Slash
                | TokenKind::Asterisk
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt => {
                    self.advance();
                    self.parse_infix_expression(left)?
                }
                TokenKind::LParen => {
                    self.advance();
                    self.parse_call_expression(left)?
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.parse_index_expression(left)?
                }
                _ => return Some(left),
            };
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.current.kind {
            TokenKind::Ident => self.parse_identifier_or_assign(),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Str => Some(Expression::StringLiteral {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            }),
            TokenKind::True | TokenKind::False => Some(Expression::BooleanLiteral {
                token: self.current.clone(),
                value: self.current.kind == TokenKind::True,
            }),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            other => {
                self.errors
                    .push(format!("No prefix parse function for {} found", other));
                None
            }
        }
    }

    fn parse_identifier_or_assign(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let name = Identifier {
            token: token.clone(),
            value: token.literal.clone(),
        };

        if self.peek.kind == TokenKind::Assign {
            self.advance(); // consume identifier -> now on `=`
            self.advance(); // consume `=` -> now on start of rhs
            let value = self.parse_expression(Precedence::Lowest)?;
            return Some(Expression::Assign {
                token,
                name,
                value: Box::new(value),
            });
        }

        Some(Expression::Identifier(name))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral { token, value }),
            Err(_) => {
                self.errors
                    .push(format!("could not parse {} as integer", token.literal));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();
        let precedence = self.current_precedence();
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek.kind == TokenKind::Else {
            self.advance();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current.clone();
        let mut statements = Vec::new();
        self.advance();

        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }

        BlockStatement { token, statements }
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expression::FunctionLiteral {
            token,
            parameters,
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();

        if self.peek.kind == TokenKind::RParen {
            self.advance();
            return Some(params);
        }

        self.advance();
        params.push(Identifier {
            token: self.current.clone(),
            value: self.current.literal.clone(),
        });

        while self.peek.kind == TokenKind::Comma {
            self.advance();
            self.advance();
            params.push(Identifier {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            });
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(params)
    }

    fn parse_list_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expression::ListLiteral { token, elements })
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let mut pairs = Vec::new();

        while self.peek.kind != TokenKind::RBrace {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if self.peek.kind != TokenKind::RBrace && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }

        Some(Expression::HashLiteral { token, pairs })
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        self.advance();
        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }

        let assigned_value = if self.peek.kind == TokenKind::Assign {
            self.advance(); // on `=`
            self.advance(); // on start of rhs
            Some(Box::new(self.parse_expression(Precedence::Lowest)?))
        } else {
            None
        };

        Some(Expression::Index {
            token,
            left: Box::new(left),
            index: Box::new(index),
            assigned_value,
        })
    }

    /// Parses a comma-separated expression list terminated by `end`,
    /// consuming `end` itself. Shared by call arguments and list literals.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek.kind == end {
            self.advance();
            return Some(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek.kind == TokenKind::Comma {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }
}

/// Parse `source` into a `(Program, errors)` pair. Callers must check
/// `errors` is empty before evaluating.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    (program, parser.errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Program {
        let (program, errors) = parse(source);
        assert!(errors.is_empty(), "parser errors: {:?}", errors);
        program
    }

    #[test]
    fn test_let_statements() {
        let program = parse_ok("let x = 5; let y = 10; let foobar = 838383;");
        assert_eq!(program.statements.len(), 3);
        match &program.statements[0] {
            Statement::Let { name, .. } => assert_eq!(name.value, "x"),
            other => panic!("expected Let, got {:?}", other),
        }
    }

    #[test]
    fn test_return_statements() {
        let program = parse_ok("return 5; return 10; return 993322;");
        assert_eq!(program.statements.len(), 3);
        for stmt in &program.statements {
            assert!(matches!(stmt, Statement::Return { .. }));
        }
    }

    #[test]
    fn test_precedence_display() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        ];

        for (input, expected) in cases {
            let program = parse_ok(input);
            assert_eq!(program.to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_if_expression() {
        let program = parse_ok("if (x < y) { x }");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::Expression {
                expression: Expression::If { alternative, .. },
                ..
            } => assert!(alternative.is_none()),
            other => panic!("expected If expression, got {:?}", other),
        }
    }

    #[test]
    fn test_if_expression_display_has_braces_and_parens() {
        let program = parse_ok("if (x < y) { x }");
        // The `If` arm wraps its condition in mandatory parens; the
        // condition's own `Infix` Display also parenthesizes itself, so a
        // comparison condition prints doubly-parenthesized. Still fully
        // parenthesized, still round-trips to the same AST (P1/P2).
        assert_eq!(program.to_string(), "if ((x < y)) {x}");
    }

    #[test]
    fn test_if_else_expression_display() {
        let program = parse_ok("if (x < y) { x } else { y }");
        assert_eq!(program.to_string(), "if ((x < y)) {x} else {y}");
    }

    #[test]
    fn test_function_literal_display_has_braces() {
        let program = parse_ok("fn(x, y) { x + y }");
        assert_eq!(program.to_string(), "fn(x, y) {(x + y)}");
    }

    /// P1: `program.to_string()` must itself be parseable and yield a
    /// structurally identical AST for programs containing `if`/`fn`, not
    /// just flat infix expressions.
    #[test]
    fn test_p1_round_trip_if_and_fn_literals() {
        let cases = [
            "if (x < y) { x } else { y }",
            "fn(x, y) { x + y }",
            "let f = fn(x) { if (x) { return 1; } return 2; };",
        ];

        for input in cases {
            let program = parse_ok(input);
            let printed = program.to_string();
            let reparsed = parse_ok(&printed);
            assert_eq!(
                reparsed.to_string(),
                printed,
                "round-trip mismatch for input: {}",
                input
            );
        }
    }

    #[test]
    fn test_function_literal_parameters() {
        let program = parse_ok("fn() {}; fn(x) {}; fn(x, y, z) {}");
        let expected: [&[&str]; 3] = [&[], &["x"], &["x", "y", "z"]];

        for (stmt, expected_params) in program.statements.iter().zip(expected) {
            match stmt {
                Statement::Expression {
                    expression: Expression::FunctionLiteral { parameters, .. },
                    ..
                } => {
                    let names: Vec<&str> =
                        parameters.iter().map(|p| p.value.as_str()).collect();
                    assert_eq!(names, expected_params);
                }
                other => panic!("expected FunctionLiteral, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_call_expression() {
        let program = parse_ok("add(1, 2 * 3, 4 + 5);");
        match &program.statements[0] {
            Statement::Expression {
                expression: Expression::Call { arguments, .. },
                ..
            } => assert_eq!(arguments.len(), 3),
            other => panic!("expected Call, got {:?}", other),
        }
    }

    #[test]
    fn test_list_literal() {
        let program = parse_ok("[1, 2 * 2, 3 + 3]");
        match &program.statements[0] {
            Statement::Expression {
                expression: Expression::ListLiteral { elements, .. },
                ..
            } => assert_eq!(elements.len(), 3),
            other => panic!("expected ListLiteral, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_literal() {
        let program = parse_ok(r#"{"one": 1, "two": 2, "three": 3}"#);
        match &program.statements[0] {
            Statement::Expression {
                expression: Expression::HashLiteral { pairs, .. },
                ..
            } => assert_eq!(pairs.len(), 3),
            other => panic!("expected HashLiteral, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_hash_literal() {
        let program = parse_ok("{}");
        match &program.statements[0] {
            Statement::Expression {
                expression: Expression::HashLiteral { pairs, .. },
                ..
            } => assert!(pairs.is_empty()),
            other => panic!("expected HashLiteral, got {:?}", other),
        }
    }

    #[test]
    fn test_index_expression() {
        let program = parse_ok("myArray[1 + 1]");
        match &program.statements[0] {
            Statement::Expression {
                expression:
                    Expression::Index {
                        assigned_value, ..
                    },
                ..
            } => assert!(assigned_value.is_none()),
            other => panic!("expected Index, got {:?}", other),
        }
    }

    #[test]
    fn test_index_assignment() {
        let program = parse_ok("a[1] = 9;");
        match &program.statements[0] {
            Statement::Expression {
                expression:
                    Expression::Index {
                        assigned_value, ..
                    },
                ..
            } => assert!(assigned_value.is_some()),
            other => panic!("expected Index with assigned value, got {:?}", other),
        }
    }

    #[test]
    fn test_assign_expression() {
        let program = parse_ok("x = x + 1;");
        match &program.statements[0] {
            Statement::Expression {
                expression: Expression::Assign { name, .. },
                ..
            } => assert_eq!(name.value, "x"),
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_semicolons() {
        let program = parse_ok("let x = 1\nlet y = 2");
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_no_prefix_parse_function_error() {
        let (_, errors) = parse("*5;");
        assert!(!errors.is_empty());
        assert!(errors[0].contains("No prefix parse function"));
    }
}
