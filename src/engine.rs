//! The [`Engine`] manager: parsing with a program cache, evaluation, and
//! truth table generation under a configured variable ceiling.

use std::cell::RefCell;
use std::sync::Arc;

use log::debug;

use crate::cache::Cache;
use crate::error::{Error, MalformedExpressionError, Result};
use crate::eval::Eval;
use crate::parser::Program;
use crate::table::TruthTable;
use crate::token::{render, tokenize, variables, Token, MAX_TOKENS};
use crate::types::Assignment;

/// Configuration options for an [`Engine`].
///
/// # Examples
///
/// ```
/// use truth_table::engine::{Engine, EngineConfig};
///
/// let engine = Engine::new(EngineConfig {
///     max_variables: 8,
///     ..EngineConfig::default()
/// });
/// assert!(engine.truth_table("A ∧ B").is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Largest number of distinct variables a truth table may have (default: 20).
    ///
    /// A table over `n` variables has `2^n` rows.
    pub max_variables: usize,
    /// Evaluate rows concurrently (default: false).
    ///
    /// Only has an effect with the `parallel` feature. Row order is the same either way.
    pub parallel: bool,
    /// Largest number of tokens an expression may expand to once `→` and `↔`
    /// are rewritten (default: [`MAX_TOKENS`]).
    pub max_tokens: usize,
    /// Largest number of cached programs (default: 1024).
    ///
    /// A full cache is emptied before the next program is stored; `0` disables caching.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_variables: 20,
            parallel: false,
            max_tokens: MAX_TOKENS,
            cache_capacity: 1024,
        }
    }
}

/// Entry point for parsing, evaluating and tabulating expressions.
///
/// Programs are cached by normalized expression, so `A and B` and `A ∧ B`
/// share one compiled program. The cache holds at most
/// [`EngineConfig::cache_capacity`] programs.
///
/// ```
/// use truth_table::engine::Engine;
///
/// let engine = Engine::default();
/// let table = engine.truth_table("A -> B").unwrap();
/// assert_eq!(table.headers(), vec!["A", "B", "(A -> B)"]);
/// assert_eq!(table.results().collect::<Vec<_>>(), vec![true, true, false, true]);
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    cache: RefCell<Cache>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            cache: RefCell::new(Cache::with_capacity(config.cache_capacity)),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> std::cell::Ref<'_, Cache> {
        self.cache.borrow()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Parses an expression, reusing the cached program for its normal form.
    pub fn parse(&self, expression: &str) -> std::result::Result<Arc<Program>, MalformedExpressionError> {
        self.compile(expression, &tokenize(expression)?)
    }

    fn compile(
        &self,
        expression: &str,
        tokens: &[Token],
    ) -> std::result::Result<Arc<Program>, MalformedExpressionError> {
        let key = render(tokens);

        let cached = self.cache.borrow().get(&key);
        if let Some(program) = cached {
            debug!("parse({:?}): cached as {:?}", expression, key);
            return Ok(program);
        }

        let program = Arc::new(Program::from_tokens_with_limit(tokens, self.config.max_tokens)?);
        debug!("parse({:?}) -> [{}]", expression, program);
        self.cache.borrow_mut().insert(key, Arc::clone(&program));
        Ok(program)
    }

    /// Parses and evaluates an expression under a single assignment.
    pub fn evaluate(&self, expression: &str, assignment: &Assignment) -> Result<bool> {
        let program = self.parse(expression)?;
        Ok(program.eval(assignment)?)
    }

    /// Builds the full truth table of an expression.
    ///
    /// Fails with [`Error::TooManyVariables`] if the expression exceeds
    /// [`EngineConfig::max_variables`]. Variables are counted on the token
    /// stream, so such an expression is never compiled.
    pub fn truth_table(&self, expression: &str) -> Result<TruthTable> {
        let tokens = tokenize(expression)?;
        let count = variables(&tokens).len();
        if count > self.config.max_variables {
            return Err(Error::TooManyVariables {
                count,
                max: self.config.max_variables,
            });
        }
        let program = self.compile(expression, &tokens)?;
        let table = TruthTable::build(expression, &program, self.config.parallel)?;
        debug!(
            "truth_table({:?}): {} variables, {} rows",
            expression,
            count,
            table.len()
        );
        Ok(table)
    }
}
