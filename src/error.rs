//! Error types for parsing, evaluation and enumeration.

use thiserror::Error;

use crate::token::Token;
use crate::types::Var;

/// The expression cannot be reduced to a well-formed postfix program.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum MalformedExpressionError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    #[error("unrecognized word '{word}' at offset {offset}")]
    UnrecognizedWord { word: String, offset: usize },

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("missing operand")]
    MissingOperand,

    #[error("unexpected token '{token}'")]
    UnexpectedToken { token: Token },

    #[error("expression is nested more than {max} levels deep")]
    TooDeeplyNested { max: usize },

    #[error("expression expands to more than {max} tokens")]
    TooManyTokens { max: usize },
}

/// A postfix program could not be reduced to a single boolean.
///
/// Programs produced by [`parse`][crate::parser::parse] never trigger these,
/// but hand-built ones ([`Program::from_postfix`][crate::parser::Program::from_postfix]) can.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum EvaluationError {
    #[error("stack underflow at '{token}'")]
    StackUnderflow { token: Token },

    #[error("evaluation ended with {size} values on the stack")]
    ResidualStack { size: usize },

    #[error("variable {var} is not assigned")]
    UnboundVariable { var: Var },

    #[error("token '{token}' cannot appear in a postfix program")]
    UnexpectedToken { token: Token },
}

/// Any failure while building a truth table.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    #[error("malformed expression: {0}")]
    Malformed(#[from] MalformedExpressionError),

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("expression has {count} variables, at most {max} are allowed")]
    TooManyVariables { count: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
