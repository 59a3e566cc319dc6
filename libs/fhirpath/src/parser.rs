//! Expression parser - converts strings to AST
//!
//! Recursive descent following the grammar precedence rules, lowest to
//! highest:
//! 1. implies
//! 2. or/xor
//! 3. and
//! 4. membership (in, contains)
//! 5. equality (=, !=)
//! 6. inequality (<=, <, >, >=)
//! 7. invocation (.) and indexer ([ ])
//! 8. term (literal, `$this`, identifier, function, parenthesized, `{}`)
//!
//! Unknown functions and bad arities are rejected here, so a malformed
//! constraint surfaces when its schema is loaded, not per resource.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ast::{BinaryOp, Expr, Literal};
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};

/// Functions of the invariant subset; all are nullary
const FUNCTIONS: &[&str] = &["exists", "empty", "not", "count", "first"];

const MAX_RECURSION_DEPTH: usize = 100;

/// Parser for constraint expressions
pub struct Parser {
    lexer: Lexer,
    current: Token,
    recursion_depth: usize,
}

impl Parser {
    /// Create a new parser for the given input string
    pub fn new(input: String) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            recursion_depth: 0,
        }
    }

    /// Parse the entire expression (top-level entry point)
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.parse_expression()?;

        if self.current.token_type != TokenType::Eof {
            return Err(self.unexpected("end of expression"));
        }

        Ok(expr)
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn expect(&mut self, token_type: TokenType, what: &str) -> Result<()> {
        if self.current.token_type == token_type {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        match self.current.token_type {
            TokenType::Error => Error::ParseError(format!(
                "{} at position {}",
                self.current.value, self.current.position
            )),
            TokenType::Eof => Error::ParseError(format!("expected {expected}, found end of input")),
            _ => Error::ParseError(format!(
                "expected {expected}, found '{}' at position {}",
                self.current.value, self.current.position
            )),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            return Err(Error::ParseError(format!(
                "expression too deeply nested (max depth: {MAX_RECURSION_DEPTH})"
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.recursion_depth -= 1;
    }

    fn parse_expression(&mut self) -> Result<Expr> {
        self.enter()?;
        let expr = self.parse_implies();
        self.leave();
        expr
    }

    fn parse_implies(&mut self) -> Result<Expr> {
        let mut left = self.parse_or()?;
        while self.current.token_type == TokenType::Implies {
            self.advance();
            let right = self.parse_or()?;
            left = Expr::Binary {
                op: BinaryOp::Implies,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        loop {
            let op = match self.current.token_type {
                TokenType::Or => BinaryOp::Or,
                TokenType::Xor => BinaryOp::Xor,
                _ => break,
            };
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_membership()?;
        while self.current.token_type == TokenType::And {
            self.advance();
            let right = self.parse_membership()?;
            left = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_membership(&mut self) -> Result<Expr> {
        let mut left = self.parse_equality()?;
        loop {
            let op = match self.current.token_type {
                TokenType::In => BinaryOp::In,
                TokenType::Contains => BinaryOp::Contains,
                _ => break,
            };
            self.advance();
            let right = self.parse_equality()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut left = self.parse_inequality()?;
        loop {
            let op = match self.current.token_type {
                TokenType::Equal => BinaryOp::Equal,
                TokenType::NotEqual => BinaryOp::NotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_inequality()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_inequality(&mut self) -> Result<Expr> {
        let mut left = self.parse_postfix()?;
        loop {
            let op = match self.current.token_type {
                TokenType::LessThan => BinaryOp::LessThan,
                TokenType::LessThanOrEqual => BinaryOp::LessThanOrEqual,
                TokenType::GreaterThan => BinaryOp::GreaterThan,
                TokenType::GreaterThanOrEqual => BinaryOp::GreaterThanOrEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_postfix()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// Invocation chains and indexers: `a.b.c()[0]`
    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_term()?;
        loop {
            match self.current.token_type {
                TokenType::Dot => {
                    self.advance();
                    expr = self.parse_invocation(expr)?;
                }
                TokenType::OpenBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenType::CloseBracket, "']'")?;
                    expr = Expr::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// A member or function applied to `base`
    fn parse_invocation(&mut self, base: Expr) -> Result<Expr> {
        if self.current.token_type != TokenType::Identifier {
            return Err(self.unexpected("member name"));
        }
        let name = self.current.value.clone();
        self.advance();

        if self.current.token_type == TokenType::OpenParen {
            self.advance();
            let args = self.parse_arguments()?;
            self.check_function(&name, &args)?;
            Ok(Expr::Function {
                base: Box::new(base),
                name,
                args,
            })
        } else {
            Ok(Expr::Path {
                base: Box::new(base),
                name,
            })
        }
    }

    /// Arguments up to the closing parenthesis
    fn parse_arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.current.token_type == TokenType::CloseParen {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            match self.current.token_type {
                TokenType::Comma => self.advance(),
                TokenType::CloseParen => {
                    self.advance();
                    return Ok(args);
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }
    }

    fn check_function(&self, name: &str, args: &[Expr]) -> Result<()> {
        if !FUNCTIONS.contains(&name) {
            return Err(Error::FunctionNotFound(name.to_string()));
        }
        if !args.is_empty() {
            return Err(Error::ParseError(format!(
                "function '{name}' takes no arguments"
            )));
        }
        Ok(())
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let token = self.current.clone();
        match token.token_type {
            TokenType::StringLiteral => {
                self.advance();
                Ok(Expr::Literal(Literal::String(token.value)))
            }
            TokenType::NumberLiteral => {
                self.advance();
                self.parse_number(&token)
            }
            TokenType::DateLiteral => {
                self.advance();
                let date = NaiveDate::parse_from_str(&token.value, "%Y-%m-%d").map_err(|_| {
                    Error::ParseError(format!("invalid date literal '@{}'", token.value))
                })?;
                Ok(Expr::Literal(Literal::Date(date)))
            }
            TokenType::True => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true)))
            }
            TokenType::False => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(false)))
            }
            TokenType::This => {
                self.advance();
                Ok(Expr::This)
            }
            TokenType::Identifier => {
                self.advance();
                // Bare invocations navigate from the context node.
                if self.current.token_type == TokenType::OpenParen {
                    self.advance();
                    let args = self.parse_arguments()?;
                    self.check_function(&token.value, &args)?;
                    Ok(Expr::Function {
                        base: Box::new(Expr::This),
                        name: token.value,
                        args,
                    })
                } else {
                    Ok(Expr::Path {
                        base: Box::new(Expr::This),
                        name: token.value,
                    })
                }
            }
            TokenType::OpenParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenType::CloseParen, "')'")?;
                Ok(expr)
            }
            TokenType::OpenBrace => {
                self.advance();
                self.expect(TokenType::CloseBrace, "'}'")?;
                Ok(Expr::Literal(Literal::Empty))
            }
            _ => Err(self.unexpected("a term")),
        }
    }

    fn parse_number(&self, token: &Token) -> Result<Expr> {
        if token.value.contains('.') {
            let value = Decimal::from_str(&token.value).map_err(|_| {
                Error::ParseError(format!("invalid number literal '{}'", token.value))
            })?;
            Ok(Expr::Literal(Literal::Decimal(value)))
        } else {
            let value: i64 = token.value.parse().map_err(|_| {
                Error::ParseError(format!("invalid number literal '{}'", token.value))
            })?;
            Ok(Expr::Literal(Literal::Integer(value)))
        }
    }
}
