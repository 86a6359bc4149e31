//! Infix to postfix conversion (shunting-yard).
//!
//! Precedence, from strongest to weakest: `¬` (3), `∧` (2), `∨` (1).
//! Conjunction and disjunction are left-associative, negation is a
//! right-associative prefix operator.

use std::fmt;
use std::str::FromStr;

use log::{debug, trace};

use crate::error::MalformedExpressionError;
use crate::token::{eliminate_implications_with_limit, tokenize, variables, Token, MAX_TOKENS};
use crate::types::Var;

/// An expression compiled to Reverse Polish notation.
///
/// A program is built once per expression and then evaluated against any
/// number of assignments.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Program {
    postfix: Vec<Token>,
    /// Distinct variables, sorted.
    variables: Vec<Var>,
}

impl Program {
    /// Wraps an already postfix-ordered token sequence without validating it.
    ///
    /// Evaluating an ill-formed program reports an [`EvaluationError`][crate::error::EvaluationError].
    pub fn from_postfix(postfix: Vec<Token>) -> Self {
        let variables = variables(&postfix);
        Self { postfix, variables }
    }

    /// Compiles an infix token stream.
    pub fn from_tokens(tokens: &[Token]) -> Result<Self, MalformedExpressionError> {
        Self::from_tokens_with_limit(tokens, MAX_TOKENS)
    }

    /// Compiles an infix token stream that may expand to at most `max_tokens`
    /// tokens once `→` and `↔` are rewritten.
    pub fn from_tokens_with_limit(tokens: &[Token], max_tokens: usize) -> Result<Self, MalformedExpressionError> {
        let tokens = eliminate_implications_with_limit(tokens, max_tokens)?;
        let postfix = shunting_yard(&tokens)?;
        Ok(Self::from_postfix(postfix))
    }

    pub fn postfix(&self) -> &[Token] {
        &self.postfix
    }

    /// The distinct variables of the expression, in ascending order.
    pub fn variables(&self) -> &[Var] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.postfix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postfix.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.postfix.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl FromStr for Program {
    type Err = MalformedExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parses an expression into a postfix program.
pub fn parse(expression: &str) -> Result<Program, MalformedExpressionError> {
    let tokens = tokenize(expression)?;
    let program = Program::from_tokens(&tokens)?;
    debug!("parse({:?}) -> [{}]", expression, program);
    Ok(program)
}

/// Reorders an infix token stream (without `→`/`↔`) into postfix.
///
/// The scan alternates between expecting an operand and expecting an
/// operator, which rejects dangling operators, adjacent operands and empty
/// groups before the postfix sequence is ever evaluated.
pub fn shunting_yard(tokens: &[Token]) -> Result<Vec<Token>, MalformedExpressionError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::with_capacity(tokens.len() / 2);
    let mut expect_operand = true;

    for &token in tokens {
        trace!("token {}: output = {:?}, stack = {:?}", token, output, stack);
        match token {
            Token::Var(_) | Token::Const(_) => {
                if !expect_operand {
                    return Err(MalformedExpressionError::UnexpectedToken { token });
                }
                output.push(token);
                expect_operand = false;
            }
            Token::Not | Token::LParen => {
                if !expect_operand {
                    return Err(MalformedExpressionError::UnexpectedToken { token });
                }
                stack.push(token);
            }
            Token::And | Token::Or => {
                if expect_operand {
                    return Err(MalformedExpressionError::MissingOperand);
                }
                while let Some(&top) = stack.last() {
                    if top == Token::LParen || top.precedence() < token.precedence() {
                        break;
                    }
                    output.push(top);
                    stack.pop();
                }
                stack.push(token);
                expect_operand = true;
            }
            Token::RParen => {
                if expect_operand {
                    return Err(MalformedExpressionError::MissingOperand);
                }
                loop {
                    match stack.pop() {
                        Some(Token::LParen) => break,
                        Some(op) => output.push(op),
                        None => return Err(MalformedExpressionError::UnbalancedParentheses),
                    }
                }
            }
            Token::Implies | Token::Iff => {
                return Err(MalformedExpressionError::UnexpectedToken { token });
            }
        }
    }

    if expect_operand {
        return Err(MalformedExpressionError::MissingOperand);
    }
    while let Some(op) = stack.pop() {
        if op == Token::LParen {
            return Err(MalformedExpressionError::UnbalancedParentheses);
        }
        output.push(op);
    }

    Ok(output)
}
