//! Error types for the expert logic engine.

use thiserror::Error;

use crate::facts::FactId;

/// A specialized `Result` type for rule-base operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur while loading a rule base or resolving a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A character outside the expression alphabet was found.
    #[error("Unexpected character '{character}' at position {position}")]
    Lex { character: char, position: usize },

    /// A rule, fact or query line is malformed.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// A rule is structurally invalid or its conclusion is not a conjunction of literals.
    #[error("Wrong rule format in \"{text}\": {reason}")]
    RuleFormat { text: String, reason: String },

    /// Verification found conflicting derivations for a queried fact.
    #[error("Contradiction on {fact}: {detail}")]
    Contradiction { fact: FactId, detail: String },

    /// A loading error tied to its 1-based line in the rule base.
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<Error>,
    },

    /// An error occurred during data serialization.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Builds a [`Error::RuleFormat`] for the given rule text.
    pub fn rule_format(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::RuleFormat {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Attaches a line number to this error.
    pub fn at_line(self, line: usize) -> Self {
        Error::Line {
            line,
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
