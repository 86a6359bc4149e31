//! Truth table enumeration.
//!
//! For `n` variables `v[0] < v[1] < ... < v[n-1]`, row `i` (for `i` in `0..2^n`)
//! assigns bit `n - 1 - j` of `i` to `v[j]`:
//!
//! ```text
//! i | A B C
//! --+------
//! 0 | F F F
//! 1 | F F T
//! 2 | F T F
//! ...
//! 7 | T T T
//! ```
//!
//! Rows are independent of each other, so they may be evaluated in any order
//! (or concurrently, see the `parallel` feature), but the table always lists
//! them by increasing `i`.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::engine::Engine;
use crate::error::{EvaluationError, Result};
use crate::eval::evaluate;
use crate::parser::Program;
use crate::types::{Assignment, Var};

/// Iterator over all assignments of a set of variables, in row order.
///
/// Created by [`assignments`].
#[derive(Debug, Clone)]
pub struct Assignments<'a> {
    vars: &'a [Var],
    next: u64,
    total: u64,
}

/// All `2^n` assignments of `vars`, first variable most significant.
///
/// With no variables there is exactly one (empty) assignment.
///
/// # Panics
///
/// Panics if `vars` has 64 or more elements.
pub fn assignments(vars: &[Var]) -> Assignments<'_> {
    assert!(vars.len() < 64, "Too many variables to enumerate");
    Assignments {
        vars,
        next: 0,
        total: 1 << vars.len(),
    }
}

impl Iterator for Assignments<'_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let row = Assignment::from_index(self.vars, self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Assignments<'_> {}

/// One row of a truth table: an assignment and the value of the expression under it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TruthRow {
    assignment: Assignment,
    result: bool,
}

impl TruthRow {
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn result(&self) -> bool {
        self.result
    }

    /// The value of `var` in this row.
    pub fn get(&self, var: Var) -> Option<bool> {
        self.assignment.get(var)
    }
}

/// The complete truth table of an expression.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TruthTable {
    expression: String,
    variables: Vec<Var>,
    rows: Vec<TruthRow>,
}

/// Builds the truth table of an expression with a default [`Engine`].
///
/// ```
/// let table = truth_table::truth_table("¬A").unwrap();
/// assert_eq!(table.len(), 2);
/// assert!(table.rows()[0].result());
/// assert!(!table.rows()[1].result());
/// ```
pub fn truth_table(expression: &str) -> Result<TruthTable> {
    Engine::default().truth_table(expression)
}

impl TruthTable {
    /// Evaluates `program` under every assignment of its variables.
    ///
    /// `expression` is only used for the result column header.
    pub fn from_program(expression: &str, program: &Program) -> std::result::Result<Self, EvaluationError> {
        Self::build(expression, program, false)
    }

    pub(crate) fn build(
        expression: &str,
        program: &Program,
        parallel: bool,
    ) -> std::result::Result<Self, EvaluationError> {
        let rows = evaluate_rows(program, parallel)?;
        Ok(Self {
            expression: expression.to_string(),
            variables: program.variables().to_vec(),
            rows,
        })
    }

    /// The expression as given, without surrounding parentheses.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Header of the result column: the expression wrapped in parentheses, verbatim.
    pub fn expression_key(&self) -> String {
        format!("({})", self.expression)
    }

    /// Column headers: the variables in order, then the [expression key](Self::expression_key).
    pub fn headers(&self) -> Vec<String> {
        self.variables
            .iter()
            .map(|v| v.to_string())
            .chain(std::iter::once(self.expression_key()))
            .collect()
    }

    pub fn variables(&self) -> &[Var] {
        &self.variables
    }

    pub fn rows(&self) -> &[TruthRow] {
        &self.rows
    }

    /// Number of rows (`2^n` for `n` variables).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false: even a constant expression has one row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The result column, in row order.
    pub fn results(&self) -> impl Iterator<Item = bool> + '_ {
        self.rows.iter().map(|row| row.result)
    }

    pub fn is_tautology(&self) -> bool {
        self.results().all(|r| r)
    }

    pub fn is_contradiction(&self) -> bool {
        !self.is_satisfiable()
    }

    pub fn is_satisfiable(&self) -> bool {
        self.results().any(|r| r)
    }

    /// Number of rows where the expression is true.
    pub fn count_satisfying(&self) -> usize {
        self.results().filter(|&r| r).count()
    }

    /// Rows where the expression is true.
    pub fn satisfying_rows(&self) -> impl Iterator<Item = &TruthRow> + '_ {
        self.rows.iter().filter(|row| row.result)
    }
}

fn evaluate_row(program: &Program, assignment: Assignment) -> std::result::Result<TruthRow, EvaluationError> {
    let result = evaluate(program, &assignment)?;
    Ok(TruthRow { assignment, result })
}

#[cfg(feature = "parallel")]
fn evaluate_rows(program: &Program, parallel: bool) -> std::result::Result<Vec<TruthRow>, EvaluationError> {
    use rayon::prelude::*;

    if !parallel {
        return assignments(program.variables())
            .map(|assignment| evaluate_row(program, assignment))
            .collect();
    }

    let vars = program.variables();
    let total = assignments(vars).len();
    (0..total)
        .into_par_iter()
        .map(|i| evaluate_row(program, Assignment::from_index(vars, i as u64)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_rows(program: &Program, parallel: bool) -> std::result::Result<Vec<TruthRow>, EvaluationError> {
    if parallel {
        log::debug!("parallel evaluation requested, but the `parallel` feature is disabled");
    }
    assignments(program.variables())
        .map(|assignment| evaluate_row(program, assignment))
        .collect()
}

fn cell(value: bool) -> char {
    if value {
        'T'
    } else {
        'F'
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            write!(f, " | ")?;
        }
        write!(f, "{}", cell)?;
        if i + 1 < cells.len() {
            write!(f, "{:1$}", "", width - cell.chars().count())?;
        }
    }
    writeln!(f)
}

/// Aligned text rendering, one line per row, `T`/`F` cells.
impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self.headers();
        let widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

        write_line(f, &headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &self.rows {
            let cells: Vec<String> = self
                .variables
                .iter()
                .map(|&v| cell(row.get(v).unwrap_or(false)).to_string())
                .chain(std::iter::once(cell(row.result).to_string()))
                .collect();
            write_line(f, &cells, &widths)?;
        }
        Ok(())
    }
}

/// A row serialized as `{ "A": true, ..., "(expr)": true }`.
struct RowRef<'a> {
    row: &'a TruthRow,
    key: &'a str,
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.row.assignment.len() + 1))?;
        for (var, value) in self.row.assignment.iter() {
            map.serialize_entry(&var, &value)?;
        }
        map.serialize_entry(self.key, &self.row.result)?;
        map.end()
    }
}

struct RowsRef<'a>(&'a TruthTable, &'a str);

impl Serialize for RowsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
        for row in &self.0.rows {
            seq.serialize_element(&RowRef { row, key: self.1 })?;
        }
        seq.end()
    }
}

/// Serialized as `{ "headers": [...], "rows": [{ "A": bool, ..., "(expr)": bool }] }`.
impl Serialize for TruthTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let key = self.expression_key();
        let mut state = serializer.serialize_struct("TruthTable", 2)?;
        state.serialize_field("headers", &self.headers())?;
        state.serialize_field("rows", &RowsRef(self, &key))?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::parser::parse;

    #[test]
    fn test_assignments_order() {
        let vars = [Var::new('A'), Var::new('B')];
        let rows: Vec<String> = assignments(&vars).map(|a| a.to_string()).collect();
        assert_eq!(rows, vec!["{A=F, B=F}", "{A=F, B=T}", "{A=T, B=F}", "{A=T, B=T}"]);
    }

    #[test]
    fn test_assignments_len() {
        let vars: Vec<Var> = "ABCDE".chars().map(Var::new).collect();
        let iter = assignments(&vars);
        assert_eq!(iter.len(), 32);
        assert_eq!(iter.count(), 32);
        assert_eq!(assignments(&[]).len(), 1);
    }

    #[test]
    fn test_table_from_program() {
        let program = parse("A ∧ B").unwrap();
        let table = TruthTable::from_program("A ∧ B", &program).unwrap();
        assert_eq!(table.headers(), vec!["A", "B", "(A ∧ B)"]);
        assert_eq!(table.results().collect::<Vec<_>>(), vec![false, false, false, true]);
        assert_eq!(table.count_satisfying(), 1);
        assert!(table.is_satisfiable());
        assert!(!table.is_tautology());
    }

    #[test]
    fn test_table_constant() {
        let table = truth_table("T ∧ F").unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.variables().is_empty());
        assert!(table.rows()[0].assignment().is_empty());
        assert!(!table.rows()[0].result());
        assert!(table.is_contradiction());
        assert_eq!(table.headers(), vec!["(T ∧ F)"]);
    }

    #[test]
    fn test_table_tautology() {
        let table = truth_table("A ∨ ¬A").unwrap();
        assert!(table.is_tautology());
        assert_eq!(table.satisfying_rows().count(), 2);
    }

    #[test]
    fn test_table_display() {
        let table = truth_table("A ∧ B").unwrap();
        let expected = "\
A | B | (A ∧ B)
--+---+--------
F | F | F
F | T | F
T | F | F
T | T | T
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_table_display_constant() {
        let table = truth_table("T").unwrap();
        assert_eq!(table.to_string(), "(T)\n---\nT\n");
    }
}
