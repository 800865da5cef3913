//! Expression lexer.
//!
//! Turns expression text such as `A + !(B | C)` into a flat token sequence.
//! Whitespace is ignored; any character outside the alphabet is a
//! [`Error::Lex`].

use std::fmt;

use crate::error::{Error, Result};
use crate::facts::FactId;

/// A lexical token of the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Letter(FactId),
    /// `+`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `!`
    Not,
    LParen,
    RParen,
}

impl Token {
    /// Returns `true` for the infix operators `+`, `|` and `^`.
    pub fn is_binary_operator(self) -> bool {
        matches!(self, Token::And | Token::Or | Token::Xor)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Letter(fact) => write!(f, "{}", fact),
            Token::And => f.write_str("+"),
            Token::Or => f.write_str("|"),
            Token::Xor => f.write_str("^"),
            Token::Not => f.write_str("!"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// Tokenizes an expression.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(text.len());
    for (position, c) in text.trim().chars().enumerate() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '+' => Token::And,
            '|' => Token::Or,
            '^' => Token::Xor,
            '!' => Token::Not,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c => match FactId::parse(c) {
                Some(fact) => Token::Letter(fact),
                None => {
                    return Err(Error::Lex {
                        character: c,
                        position,
                    })
                }
            },
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// Renders tokens back to canonical, whitespace-free text.
pub fn canonical(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(c: char) -> Token {
        Token::Letter(FactId::parse(c).unwrap())
    }

    #[test]
    fn test_tokenize_all_operators() {
        let tokens = tokenize("A + !(b | C) ^ D").unwrap();
        assert_eq!(
            tokens,
            vec![
                letter('A'),
                Token::And,
                Token::Not,
                Token::LParen,
                letter('B'),
                Token::Or,
                letter('C'),
                Token::RParen,
                Token::Xor,
                letter('D'),
            ]
        );
    }

    #[test]
    fn test_tokenize_rejects_foreign_characters() {
        let err = tokenize("A & B").unwrap_err();
        assert_eq!(
            err,
            Error::Lex {
                character: '&',
                position: 2
            }
        );
        assert!(tokenize("A1").is_err());
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_canonical_strips_whitespace() {
        let tokens = tokenize(" a +  !b ").unwrap();
        assert_eq!(canonical(&tokens), "A+!B");
    }
}
