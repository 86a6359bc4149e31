//! Postfix evaluation.
//!
//! Every connective is a plain boolean function applied to values popped
//! from an explicit stack. The expression text is never handed to anything
//! that could execute it.

use log::trace;

use crate::error::EvaluationError;
use crate::parser::Program;
use crate::token::Token;
use crate::types::Assignment;

pub fn not(a: bool) -> bool {
    !a
}

pub fn and(a: bool, b: bool) -> bool {
    a && b
}

pub fn or(a: bool, b: bool) -> bool {
    a || b
}

/// Something that evaluates to a boolean under an assignment.
pub trait Eval {
    fn eval(&self, assignment: &Assignment) -> Result<bool, EvaluationError>;
}

impl Eval for Program {
    fn eval(&self, assignment: &Assignment) -> Result<bool, EvaluationError> {
        evaluate(self, assignment)
    }
}

impl Eval for bool {
    fn eval(&self, _assignment: &Assignment) -> Result<bool, EvaluationError> {
        Ok(*self)
    }
}

/// Evaluates a postfix program against an assignment.
///
/// Binary operators pop their right operand first, then the left one.
/// Exactly one value must remain on the stack at the end.
pub fn evaluate(program: &Program, assignment: &Assignment) -> Result<bool, EvaluationError> {
    let mut stack: Vec<bool> = Vec::with_capacity(program.len());

    for &token in program.postfix() {
        let value = match token {
            Token::Var(var) => assignment
                .get(var)
                .ok_or(EvaluationError::UnboundVariable { var })?,
            Token::Const(value) => value,
            Token::Not => {
                let a = stack.pop().ok_or(EvaluationError::StackUnderflow { token })?;
                not(a)
            }
            Token::And | Token::Or => {
                let right = stack.pop().ok_or(EvaluationError::StackUnderflow { token })?;
                let left = stack.pop().ok_or(EvaluationError::StackUnderflow { token })?;
                if token == Token::And {
                    and(left, right)
                } else {
                    or(left, right)
                }
            }
            Token::Implies | Token::Iff | Token::LParen | Token::RParen => {
                return Err(EvaluationError::UnexpectedToken { token });
            }
        };
        stack.push(value);
    }

    match stack.as_slice() {
        &[result] => {
            trace!("evaluate([{}], {}) -> {}", program, assignment, result);
            Ok(result)
        }
        _ => Err(EvaluationError::ResidualStack { size: stack.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::parser::parse;
    use crate::types::Var;

    fn assign(pairs: &[(char, bool)]) -> Assignment {
        pairs.iter().map(|&(c, b)| (Var::new(c), b)).collect()
    }

    #[test]
    fn test_eval_var() {
        let program = parse("A").unwrap();
        assert!(program.eval(&assign(&[('A', true)])).unwrap());
        assert!(!program.eval(&assign(&[('A', false)])).unwrap());
    }

    #[test]
    fn test_eval_not() {
        let program = parse("¬A").unwrap();
        assert!(!evaluate(&program, &assign(&[('A', true)])).unwrap());
        assert!(evaluate(&program, &assign(&[('A', false)])).unwrap());
    }

    #[test]
    fn test_eval_and_binds_tighter() {
        let program = parse("A ∨ B ∧ C").unwrap();
        let row = assign(&[('A', false), ('B', true), ('C', true)]);
        assert!(evaluate(&program, &row).unwrap());
        let row = assign(&[('A', false), ('B', true), ('C', false)]);
        assert!(!evaluate(&program, &row).unwrap());
    }

    #[test]
    fn test_eval_iff() {
        let program = parse("A <-> B").unwrap();
        assert!(evaluate(&program, &assign(&[('A', true), ('B', true)])).unwrap());
        assert!(!evaluate(&program, &assign(&[('A', true), ('B', false)])).unwrap());
        assert!(!evaluate(&program, &assign(&[('A', false), ('B', true)])).unwrap());
        assert!(evaluate(&program, &assign(&[('A', false), ('B', false)])).unwrap());
    }

    #[test]
    fn test_eval_constants() {
        let program = parse("T ∧ F").unwrap();
        assert!(!evaluate(&program, &Assignment::new()).unwrap());
        let program = parse("T ∨ F").unwrap();
        assert!(evaluate(&program, &Assignment::new()).unwrap());
    }

    #[test]
    fn test_eval_unbound_variable() {
        let program = parse("A ∧ B").unwrap();
        assert_eq!(
            evaluate(&program, &assign(&[('A', true)])),
            Err(EvaluationError::UnboundVariable { var: Var::new('B') })
        );
    }

    #[test]
    fn test_eval_underflow() {
        let program = Program::from_postfix(vec![Token::Const(true), Token::And]);
        assert_eq!(
            evaluate(&program, &Assignment::new()),
            Err(EvaluationError::StackUnderflow { token: Token::And })
        );
        let program = Program::from_postfix(vec![Token::Not]);
        assert_eq!(
            evaluate(&program, &Assignment::new()),
            Err(EvaluationError::StackUnderflow { token: Token::Not })
        );
    }

    #[test]
    fn test_eval_residual_stack() {
        let program = Program::from_postfix(vec![Token::Const(true), Token::Const(false)]);
        assert_eq!(
            evaluate(&program, &Assignment::new()),
            Err(EvaluationError::ResidualStack { size: 2 })
        );
        let program = Program::from_postfix(vec![]);
        assert_eq!(
            evaluate(&program, &Assignment::new()),
            Err(EvaluationError::ResidualStack { size: 0 })
        );
    }

    #[test]
    fn test_eval_rejects_infix_tokens() {
        let program = Program::from_postfix(vec![Token::LParen]);
        assert_eq!(
            evaluate(&program, &Assignment::new()),
            Err(EvaluationError::UnexpectedToken { token: Token::LParen })
        );
    }

    #[test]
    fn test_eval_bool() {
        assert!(true.eval(&Assignment::new()).unwrap());
    }
}
