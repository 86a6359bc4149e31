//! # truth-table: propositional logic expressions and their truth tables
//!
//! **`truth-table`** parses propositional expressions over single-letter variables,
//! evaluates them, and enumerates their complete truth tables.
//!
//! ## Pipeline
//!
//! 1. **Tokenizer** ([`token`]): accepts symbolic (`¬ ∧ ∨ → ↔`), ASCII (`! & | -> <->`)
//!    and word (`not and or`) operators, and rewrites `→`/`↔` into `¬`, `∧`, `∨`.
//! 2. **Parser** ([`parser`]): shunting-yard conversion to a postfix [`Program`].
//! 3. **Evaluator** ([`eval`]): stack evaluation of a program under an [`Assignment`].
//! 4. **Enumerator** ([`table`]): evaluates the program under all `2^n` assignments.
//!
//! A program is compiled once and reused for every row. The [`Engine`] additionally
//! caches programs by normalized expression and enforces a ceiling on the number of
//! variables, since the table size grows as `2^n`.
//!
//! ## Basic Usage
//!
//! ```rust
//! use truth_table::{parse, evaluate, truth_table, Assignment, Var};
//!
//! // 1. Compile an expression
//! let program = parse("A ∨ B ∧ C").unwrap();
//! assert_eq!(program.to_string(), "A B C ∧ ∨");
//!
//! // 2. Evaluate it under an assignment
//! let row = Assignment::new()
//!     .with(Var::new('A'), false)
//!     .with(Var::new('B'), true)
//!     .with(Var::new('C'), true);
//! assert!(evaluate(&program, &row).unwrap());
//!
//! // 3. Enumerate the whole table
//! let table = truth_table("A <-> B").unwrap();
//! assert_eq!(table.headers(), vec!["A", "B", "(A <-> B)"]);
//! assert_eq!(table.results().collect::<Vec<_>>(), vec![true, false, false, true]);
//! ```
//!
//! ## Errors
//!
//! Malformed input fails with [`MalformedExpressionError`]; a program that cannot be
//! reduced to a single value fails with [`EvaluationError`]. Neither is ever replaced
//! by a default truth value.

pub mod cache;
pub mod engine;
pub mod error;
pub mod eval;
pub mod parser;
pub mod table;
pub mod token;
pub mod types;

pub use engine::{Engine, EngineConfig};
pub use error::{Error, EvaluationError, MalformedExpressionError};
pub use eval::{evaluate, Eval};
pub use parser::{parse, Program};
pub use table::{assignments, truth_table, TruthRow, TruthTable};
pub use token::Token;
pub use types::{Assignment, Var};
