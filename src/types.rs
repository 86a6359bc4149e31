//! Propositional variables and their assignments.
//!
//! A variable is a single uppercase ASCII letter. The letters `T` and `F` are
//! reserved for the boolean literals and never name a variable.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A propositional variable (`A`..=`Z`, except `T` and `F`).
///
/// Variables are ordered alphabetically. This order fixes both the column
/// order of a truth table and the bit significance used for enumeration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u8);

impl Var {
    /// Creates a new variable named by the given letter.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not an uppercase ASCII letter, or is `T`/`F`.
    pub fn new(name: char) -> Self {
        Self::try_new(name).unwrap_or_else(|| panic!("Invalid variable name '{}'", name))
    }

    /// Creates a new variable, or returns `None` if `name` is not a valid variable name.
    pub fn try_new(name: char) -> Option<Self> {
        if name.is_ascii_uppercase() && name != 'T' && name != 'F' {
            Some(Var(name as u8))
        } else {
            None
        }
    }

    /// Returns the letter naming this variable.
    pub fn name(self) -> char {
        self.0 as char
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<Var> for char {
    fn from(var: Var) -> Self {
        var.name()
    }
}

impl Serialize for Var {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.name())
    }
}

/// A mapping from variables to truth values.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Assignment {
    values: BTreeMap<Var, bool>,
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the assignment for row `index` of a truth table over `vars`.
    ///
    /// Variable `vars[j]` gets bit `n - 1 - j` of `index`, so the first
    /// variable is the most significant one.
    pub fn from_index(vars: &[Var], index: u64) -> Self {
        let n = vars.len();
        vars.iter()
            .enumerate()
            .map(|(j, &v)| (v, (index >> (n - 1 - j)) & 1 == 1))
            .collect()
    }

    /// Returns the value of `var`, if assigned.
    pub fn get(&self, var: Var) -> Option<bool> {
        self.values.get(&var).copied()
    }

    /// Returns a copy of this assignment with `var` set to `value`.
    pub fn with(mut self, var: Var, value: bool) -> Self {
        self.values.insert(var, value);
        self
    }

    /// Number of assigned variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(variable, value)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (Var, bool)> + '_ {
        self.values.iter().map(|(&v, &b)| (v, b))
    }

    /// Packs the values back into a row index, given the variable order.
    ///
    /// Inverse of [`Assignment::from_index`]. Unassigned variables count as `false`.
    pub fn to_index(&self, vars: &[Var]) -> u64 {
        vars.iter()
            .fold(0, |acc, &v| (acc << 1) | self.get(v).unwrap_or(false) as u64)
    }
}

impl FromIterator<(Var, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Var, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = (&'a Var, &'a bool);
    type IntoIter = btree_map::Iter<'a, Var, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (v, b)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", v, if b { 'T' } else { 'F' })?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Assignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (v, b) in self.iter() {
            map.serialize_entry(&v, &b)?;
        }
        map.end()
    }
}
