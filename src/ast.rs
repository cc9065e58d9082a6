// ABOUTME: AST node definitions: statements, expressions, and the Program root

use std::fmt;

use crate::token::Token;

/// An identifier occurring in binding position (`let` name, parameter name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A brace-delimited sequence of statements: the body of `if`/`fn`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Option<Expression>,
    },
    Expression {
        token: Token,
        expression: Expression,
    },
    Block(BlockStatement),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value, .. } => {
                write!(f, "let {} = {};", name, value)
            }
            Statement::Return { value, .. } => match value {
                Some(value) => write!(f, "return {};", value),
                None => write!(f, "return;"),
            },
            Statement::Expression { expression, .. } => {
                write!(f, "{}", expression)
            }
            Statement::Block(block) => write!(f, "{}", block),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral {
        token: Token,
        value: i64,
    },
    StringLiteral {
        token: Token,
        value: String,
    },
    BooleanLiteral {
        token: Token,
        value: bool,
    },
    ListLiteral {
        token: Token,
        elements: Vec<Expression>,
    },
    HashLiteral {
        token: Token,
        pairs: Vec<(Expression, Expression)>,
    },
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        token: Token,
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Index {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
        assigned_value: Option<Box<Expression>>,
    },
    Assign {
        token: Token,
        name: Identifier,
        value: Box<Expression>,
    },
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::IntegerLiteral { value, .. } => write!(f, "{}", value),
            Expression::StringLiteral { value, .. } => write!(f, "{}", value),
            Expression::BooleanLiteral { value, .. } => write!(f, "{}", value),
            Expression::ListLiteral { elements, .. } => {
                let parts: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Expression::HashLiteral { pairs, .. } => {
                let parts: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k, v))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Expression::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, " else {}", alt)?;
                }
                Ok(())
            }
            Expression::FunctionLiteral {
                parameters, body, ..
            } => {
                let parts: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
                write!(f, "fn({}) {}", parts.join(", "), body)
            }
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                let parts: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", function, parts.join(", "))
            }
            Expression::Index {
                left,
                index,
                assigned_value,
                ..
            } => match assigned_value {
                Some(value) => write!(f, "({}[{}] = {})", left, index, value),
                None => write!(f, "({}[{}])", left, index),
            },
            Expression::Assign { name, value, .. } => write!(f, "({} = {})", name, value),
        }
    }
}

/// An ordered sequence of top-level statements: the root of a parsed program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_program_to_string() {
        let program = Program {
            statements: vec![Statement::Let {
                token: Token::new(TokenKind::Let, "let"),
                name: Identifier {
                    token: Token::new(TokenKind::Ident, "myVar"),
                    value: "myVar".to_string(),
                },
                value: Expression::Identifier(Identifier {
                    token: Token::new(TokenKind::Ident, "anotherVar"),
                    value: "anotherVar".to_string(),
                }),
            }],
        };

        assert_eq!(program.to_string(), "let myVar = anotherVar;");
    }

    #[test]
    fn test_infix_display_parenthesizes() {
        let left = Expression::Identifier(Identifier {
            token: Token::new(TokenKind::Ident, "a"),
            value: "a".to_string(),
        });
        let right = Expression::Identifier(Identifier {
            token: Token::new(TokenKind::Ident, "b"),
            value: "b".to_string(),
        });
        let expr = Expression::Infix {
            token: Token::new(TokenKind::Plus, "+"),
            left: Box::new(left),
            operator: "+".to_string(),
            right: Box::new(right),
        };
        assert_eq!(expr.to_string(), "(a + b)");
    }
}
