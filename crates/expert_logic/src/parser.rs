//! Expression parser and rule-text structural validation.
//!
//! Precedence, tightest first: `!`, `+` (AND), `|` (OR), `^` (XOR).
//! Binary operators of equal precedence associate left to right.
//!
//! ```text
//! expr    := xorExpr
//! xorExpr := orExpr ( '^' orExpr )*
//! orExpr  := andExpr ( '|' andExpr )*
//! andExpr := unary ( '+' unary )*
//! unary   := '!' unary | LETTER | '(' expr ')'
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::facts::FactId;
use crate::lexer::{self, Token};

/// An infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
}

impl BinaryOp {
    fn from_token(token: Token) -> Option<Self> {
        match token {
            Token::And => Some(BinaryOp::And),
            Token::Or => Some(BinaryOp::Or),
            Token::Xor => Some(BinaryOp::Xor),
            _ => None,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::And => 3,
            BinaryOp::Or => 2,
            BinaryOp::Xor => 1,
        }
    }

    fn symbol(self) -> char {
        match self {
            BinaryOp::And => '+',
            BinaryOp::Or => '|',
            BinaryOp::Xor => '^',
        }
    }
}

/// A parsed boolean expression over facts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Fact(FactId),
    Not(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Flattens a conjunction of optionally negated facts into
    /// `(fact, negated)` literals. Returns `None` for any other shape.
    pub fn conjunction_literals(&self) -> Option<Vec<(FactId, bool)>> {
        match self {
            Expr::Fact(fact) => Some(vec![(*fact, false)]),
            Expr::Not(inner) => match inner.as_ref() {
                Expr::Fact(fact) => Some(vec![(*fact, true)]),
                _ => None,
            },
            Expr::Binary {
                op: BinaryOp::And,
                lhs,
                rhs,
            } => {
                let mut literals = lhs.conjunction_literals()?;
                literals.extend(rhs.conjunction_literals()?);
                Some(literals)
            }
            Expr::Binary { .. } => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            _ => u8::MAX,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Fact(fact) => write!(f, "{}", fact),
            Expr::Not(inner) => match inner.as_ref() {
                Expr::Binary { .. } => write!(f, "!({})", inner),
                _ => write!(f, "!{}", inner),
            },
            Expr::Binary { op, lhs, rhs } => {
                let own = op.precedence();
                if lhs.precedence() < own {
                    write!(f, "({})", lhs)?;
                } else {
                    write!(f, "{}", lhs)?;
                }
                write!(f, "{}", op.symbol())?;
                if rhs.precedence() <= own {
                    write!(f, "({})", rhs)
                } else {
                    write!(f, "{}", rhs)
                }
            }
        }
    }
}

/// Tokenizes and parses an expression.
pub fn parse(text: &str) -> Result<Expr> {
    let tokens = lexer::tokenize(text)?;
    parse_tokens(&tokens)
}

/// Parses a token sequence into an expression tree.
pub fn parse_tokens(tokens: &[Token]) -> Result<Expr> {
    if tokens.is_empty() {
        return Err(Error::Syntax("empty expression".to_string()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_xor()?;
    match parser.peek() {
        None => Ok(expr),
        Some(Token::RParen) => Err(Error::Syntax(
            "unbalanced parentheses: unexpected ')'".to_string(),
        )),
        Some(token) => Err(Error::Syntax(format!(
            "unexpected '{}' at token {}",
            token, parser.pos
        ))),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn parse_xor(&mut self) -> Result<Expr> {
        self.parse_binary(BinaryOp::Xor, Self::parse_or)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        self.parse_binary(BinaryOp::Or, Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        self.parse_binary(BinaryOp::And, Self::parse_unary)
    }

    fn parse_binary(
        &mut self,
        op: BinaryOp,
        operand: fn(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        let mut lhs = operand(self)?;
        while self.peek().and_then(BinaryOp::from_token) == Some(op) {
            self.bump();
            let rhs = operand(self)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Not) => {
                self.bump();
                let inner = self.parse_unary()?;
                Ok(Expr::Not(Box::new(inner)))
            }
            Some(Token::Letter(fact)) => {
                self.bump();
                Ok(Expr::Fact(fact))
            }
            Some(Token::LParen) => {
                self.bump();
                let inner = self.parse_xor()?;
                if self.peek() != Some(Token::RParen) {
                    return Err(Error::Syntax(
                        "unbalanced parentheses: missing ')'".to_string(),
                    ));
                }
                self.bump();
                Ok(inner)
            }
            Some(token) => Err(Error::Syntax(format!(
                "expected a fact, '!' or '(' but found '{}'",
                token
            ))),
            None => Err(Error::Syntax("unexpected end of expression".to_string())),
        }
    }
}

/// Checks the token-level shape of one side of a rule.
///
/// `text` is only used to name the offending rule in the error.
pub fn validate_structure(text: &str, tokens: &[Token]) -> Result<()> {
    let fail = |reason: &str| Err(Error::rule_format(text.trim(), reason));

    let (Some(&first), Some(&last)) = (tokens.first(), tokens.last()) else {
        return fail("empty expression");
    };
    if first.is_binary_operator() {
        return fail("starts with an operator");
    }
    if !matches!(last, Token::Letter(_) | Token::RParen) {
        return fail("must end with a fact or ')'");
    }

    let mut depth = 0usize;
    let mut previous: Option<Token> = None;
    for (i, &token) in tokens.iter().enumerate() {
        let after_operand = matches!(previous, Some(Token::Letter(_) | Token::RParen));
        match token {
            Token::Letter(_) if after_operand => return fail("two operands without an operator"),
            Token::LParen if after_operand => return fail("'(' directly after an operand"),
            Token::Not if after_operand => return fail("'!' directly after an operand"),
            Token::Not => {
                if !matches!(tokens.get(i + 1), Some(Token::Letter(_) | Token::LParen)) {
                    return fail("'!' must be followed by a fact or '('");
                }
            }
            Token::LParen => depth += 1,
            Token::RParen => {
                if !after_operand {
                    return fail("')' must close an operand");
                }
                depth = match depth.checked_sub(1) {
                    Some(d) => d,
                    None => return fail("unbalanced parentheses"),
                };
            }
            t if t.is_binary_operator() && !after_operand => {
                return fail("operator without a left operand")
            }
            _ => {}
        }
        previous = Some(token);
    }
    if depth != 0 {
        return fail("unbalanced parentheses");
    }
    Ok(())
}
