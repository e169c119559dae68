//! Recursive-descent parser producing an `Expr` tree.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! or         := and  ( ("||" | "or")  and )*
//! and        := unary ( ("&&" | "and") unary )*
//! unary      := ("!" | "not") unary | comparison
//! comparison := operand ( ("==" | "!=" | "<" | "<=" | ">" | ">=") operand )?
//! operand    := literal | path | "(" or ")"
//! ```

use vigil_contracts::error::VigilResult;

use crate::lexer::{error, tokenize, Token};

/// Nesting limit for parentheses and `not` chains.
pub const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Path(String),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

/// Parse `expression` into an `Expr`.
pub fn parse(expression: &str) -> VigilResult<Expr> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(error(expression, "empty expression"));
    }
    let mut parser = Parser {
        expression,
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(error(expression, &format!("unexpected trailing {token:?}"))),
    }
}

struct Parser<'e> {
    expression: &'e str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn descend(&mut self) -> VigilResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(error(self.expression, "expression nested too deeply"));
        }
        Ok(())
    }

    fn or(&mut self) -> VigilResult<Expr> {
        let mut left = self.and()?;
        while self.eat(&Token::Or) {
            let right = self.and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> VigilResult<Expr> {
        let mut left = self.unary()?;
        while self.eat(&Token::And) {
            let right = self.unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> VigilResult<Expr> {
        if self.eat(&Token::Not) {
            self.descend()?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> VigilResult<Expr> {
        let left = self.operand()?;
        let op = match self.peek() {
            Some(Token::Eq) => CompareOp::Eq,
            Some(Token::Ne) => CompareOp::Ne,
            Some(Token::Lt) => CompareOp::Lt,
            Some(Token::Le) => CompareOp::Le,
            Some(Token::Gt) => CompareOp::Gt,
            Some(Token::Ge) => CompareOp::Ge,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.operand()?;
        Ok(Expr::Compare(op, Box::new(left), Box::new(right)))
    }

    fn operand(&mut self) -> VigilResult<Expr> {
        match self.advance() {
            Some(Token::Null) => Ok(Expr::Literal(Literal::Null)),
            Some(Token::True) => Ok(Expr::Literal(Literal::Bool(true))),
            Some(Token::False) => Ok(Expr::Literal(Literal::Bool(false))),
            Some(Token::Num(n)) => Ok(Expr::Literal(Literal::Num(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Literal::Str(s))),
            Some(Token::Ident(path)) => Ok(Expr::Path(path)),
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.or()?;
                if !self.eat(&Token::RParen) {
                    return Err(error(self.expression, "missing ')'"));
                }
                self.depth -= 1;
                Ok(inner)
            }
            Some(token) => Err(error(self.expression, &format!("unexpected {token:?}"))),
            None => Err(error(self.expression, "unexpected end of expression")),
        }
    }
}
