//! Tokenizer and normalizer for propositional expressions.
//!
//! The accepted surface syntax mixes symbolic and word operators:
//!
//! | connective | accepted forms                     | canonical |
//! |------------|------------------------------------|-----------|
//! | negation   | `¬` `!` `not`                      | `¬`       |
//! | conjunction| `∧` `^` `&` `&&` `and`             | `∧`       |
//! | disjunction| `∨` `\|` `\|\|` `or` `v`           | `∨`       |
//! | implication| `->` `→` `⇒` `=>`                  | `→`       |
//! | equivalence| `<->` `↔` `⇔` `<=>`                | `↔`       |
//!
//! Word operators are case-insensitive, except for the lowercase `v`
//! (the uppercase `V` is a variable). `T` and `F` are the boolean literals.
//!
//! Implication and equivalence never reach the parser: [`eliminate_implications`]
//! rewrites them into negation, conjunction and disjunction first.

use std::collections::BTreeSet;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::MalformedExpressionError;
use crate::types::Var;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Token {
    Var(Var),
    Const(bool),
    Not,
    And,
    Or,
    Implies,
    Iff,
    LParen,
    RParen,
}

impl Token {
    /// Binding strength of an operator token, `0` for anything else.
    ///
    /// Only the connectives that survive [`eliminate_implications`] are ranked.
    pub fn precedence(self) -> u8 {
        match self {
            Token::Not => 3,
            Token::And => 2,
            Token::Or => 1,
            _ => 0,
        }
    }

    /// Whether this token is a variable or a literal.
    pub fn is_operand(self) -> bool {
        matches!(self, Token::Var(_) | Token::Const(_))
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Token::And | Token::Or | Token::Implies | Token::Iff)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Var(v) => write!(f, "{}", v),
            Token::Const(true) => write!(f, "T"),
            Token::Const(false) => write!(f, "F"),
            Token::Not => write!(f, "¬"),
            Token::And => write!(f, "∧"),
            Token::Or => write!(f, "∨"),
            Token::Implies => write!(f, "→"),
            Token::Iff => write!(f, "↔"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Splits an expression into tokens.
///
/// Multi-character operators are matched longest-first, so `<->` is never
/// read as `<` followed by `->`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, MalformedExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let unexpected = MalformedExpressionError::UnexpectedCharacter { ch: c, offset };
        let token = match c {
            c if c.is_whitespace() => continue,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '¬' | '!' => Token::Not,
            '∧' | '^' => Token::And,
            '∨' => Token::Or,
            '→' | '⇒' => Token::Implies,
            '↔' | '⇔' => Token::Iff,
            '&' => {
                eat(&mut chars, '&');
                Token::And
            }
            '|' => {
                eat(&mut chars, '|');
                Token::Or
            }
            '-' | '=' => {
                if !eat(&mut chars, '>') {
                    return Err(unexpected);
                }
                Token::Implies
            }
            '<' => {
                let arrow = (eat(&mut chars, '-') || eat(&mut chars, '=')) && eat(&mut chars, '>');
                if !arrow {
                    return Err(unexpected);
                }
                Token::Iff
            }
            c if c.is_ascii_alphabetic() => {
                let mut end = offset + c.len_utf8();
                while let Some((i, c)) = chars.next_if(|&(_, c)| c.is_ascii_alphanumeric() || c == '_') {
                    end = i + c.len_utf8();
                }
                let word = &input[offset..end];
                if let Some(token) = word_token(word) {
                    tokens.push(token);
                } else if let Some(run) = disjunction_run(word) {
                    tokens.extend(run);
                } else {
                    return Err(MalformedExpressionError::UnrecognizedWord {
                        word: word.to_string(),
                        offset,
                    });
                }
                continue;
            }
            _ => return Err(unexpected),
        };
        tokens.push(token);
    }

    if tokens.is_empty() {
        return Err(MalformedExpressionError::Empty);
    }
    Ok(tokens)
}

fn eat(chars: &mut Peekable<CharIndices>, expected: char) -> bool {
    chars.next_if(|&(_, c)| c == expected).is_some()
}

fn letter_token(c: char) -> Option<Token> {
    match c {
        'T' => Some(Token::Const(true)),
        'F' => Some(Token::Const(false)),
        _ => Var::try_new(c).map(Token::Var),
    }
}

fn word_token(word: &str) -> Option<Token> {
    let mut letters = word.chars();
    if let (Some(c), None) = (letters.next(), letters.next()) {
        return match c {
            'v' => Some(Token::Or),
            _ => letter_token(c),
        };
    }

    if word.eq_ignore_ascii_case("not") {
        Some(Token::Not)
    } else if word.eq_ignore_ascii_case("and") {
        Some(Token::And)
    } else if word.eq_ignore_ascii_case("or") {
        Some(Token::Or)
    } else {
        None
    }
}

/// Splits an unspaced disjunction such as `AvBvC` into `A ∨ B ∨ C`.
fn disjunction_run(word: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::with_capacity(word.len());
    for (i, c) in word.chars().enumerate() {
        let token = if i % 2 == 1 {
            (c == 'v').then_some(Token::Or)?
        } else {
            letter_token(c)?
        };
        tokens.push(token);
    }
    (tokens.len() % 2 == 1).then_some(tokens)
}

/// Renders tokens in canonical notation.
///
/// Binary operators are surrounded by single spaces, everything else is
/// written without separators: `not (A and B)` becomes `¬(A ∧ B)`.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        if token.is_binary() {
            out.push_str(&format!(" {} ", token));
        } else {
            out.push_str(&token.to_string());
        }
    }
    out
}

/// Tokenizes an expression and renders it back in canonical notation.
///
/// Two expressions with the same normal form parse to the same program.
pub fn normalize(input: &str) -> Result<String, MalformedExpressionError> {
    tokenize(input).map(|tokens| render(&tokens))
}

/// Deepest nesting of parentheses and arrows accepted by [`eliminate_implications`].
pub const MAX_NESTING: usize = 256;

/// Default bound on the length of the rewritten token stream.
///
/// Every `↔` writes both of its operands twice, so a chain of `k`
/// equivalences expands to about `2^k` tokens.
pub const MAX_TOKENS: usize = 1 << 20;

/// Rewrites implications and equivalences into `¬`, `∧` and `∨`:
///
/// ```text
/// p1 → p2  ≡  (¬(p1) ∨ (p2))
/// p1 ↔ p2  ≡  ((¬(p1) ∨ (p2)) ∧ (¬(p2) ∨ (p1)))
/// ```
///
/// Equivalence binds weakest, then implication; both associate to the right.
/// Operands are always wrapped in parentheses, so the surrounding context
/// keeps its meaning whatever the operands contain.
///
/// The result is limited to [`MAX_TOKENS`] tokens, see
/// [`eliminate_implications_with_limit`].
pub fn eliminate_implications(tokens: &[Token]) -> Result<Vec<Token>, MalformedExpressionError> {
    eliminate_implications_with_limit(tokens, MAX_TOKENS)
}

/// Same as [`eliminate_implications`], failing with
/// [`MalformedExpressionError::TooManyTokens`] as soon as the output would
/// exceed `max_tokens`.
///
/// Input nested deeper than [`MAX_NESTING`] levels fails with
/// [`MalformedExpressionError::TooDeeplyNested`].
pub fn eliminate_implications_with_limit(
    tokens: &[Token],
    max_tokens: usize,
) -> Result<Vec<Token>, MalformedExpressionError> {
    check_nesting(tokens)?;
    let rewriter = Rewriter { max_tokens };
    let mut out = Vec::with_capacity(tokens.len());
    rewriter.rewrite(tokens, 0, &mut out)?;
    Ok(out)
}

/// Checks that parentheses are balanced and at most [`MAX_NESTING`] deep.
fn check_nesting(tokens: &[Token]) -> Result<(), MalformedExpressionError> {
    let mut depth = 0usize;
    for &token in tokens {
        match token {
            Token::LParen => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(MalformedExpressionError::TooDeeplyNested { max: MAX_NESTING });
                }
            }
            Token::RParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(MalformedExpressionError::UnbalancedParentheses)?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(MalformedExpressionError::UnbalancedParentheses);
    }
    Ok(())
}

struct Rewriter {
    max_tokens: usize,
}

impl Rewriter {
    /// Fails if `out` cannot grow by `extra` tokens.
    fn reserve(&self, out: &[Token], extra: usize) -> Result<(), MalformedExpressionError> {
        if out.len() + extra > self.max_tokens {
            return Err(MalformedExpressionError::TooManyTokens { max: self.max_tokens });
        }
        Ok(())
    }

    /// `depth` counts enclosing groups and arrows, and never exceeds [`MAX_NESTING`].
    fn rewrite(&self, tokens: &[Token], depth: usize, out: &mut Vec<Token>) -> Result<(), MalformedExpressionError> {
        if depth > MAX_NESTING {
            return Err(MalformedExpressionError::TooDeeplyNested { max: MAX_NESTING });
        }

        if let Some(i) = find_top_level(tokens, Token::Iff)? {
            let p1 = self.rewrite_operand(&tokens[..i], depth + 1)?;
            let p2 = self.rewrite_operand(&tokens[i + 1..], depth + 1)?;
            self.reserve(out, 2 * (p1.len() + p2.len()) + 19)?;
            out.push(Token::LParen);
            emit_implication(&p1, &p2, out);
            out.push(Token::And);
            emit_implication(&p2, &p1, out);
            out.push(Token::RParen);
            return Ok(());
        }

        if let Some(i) = find_top_level(tokens, Token::Implies)? {
            let p1 = self.rewrite_operand(&tokens[..i], depth + 1)?;
            let p2 = self.rewrite_operand(&tokens[i + 1..], depth + 1)?;
            self.reserve(out, p1.len() + p2.len() + 8)?;
            emit_implication(&p1, &p2, out);
            return Ok(());
        }

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                Token::LParen => {
                    let close = matching_paren(tokens, i)?;
                    out.push(Token::LParen);
                    self.rewrite(&tokens[i + 1..close], depth + 1, out)?;
                    out.push(Token::RParen);
                    i = close + 1;
                }
                Token::RParen => return Err(MalformedExpressionError::UnbalancedParentheses),
                token => {
                    out.push(token);
                    i += 1;
                }
            }
        }
        self.reserve(out, 0)
    }

    fn rewrite_operand(&self, tokens: &[Token], depth: usize) -> Result<Vec<Token>, MalformedExpressionError> {
        if tokens.is_empty() {
            return Err(MalformedExpressionError::MissingOperand);
        }
        let mut out = Vec::new();
        self.rewrite(tokens, depth, &mut out)?;
        Ok(out)
    }
}

/// Distinct variables of a token stream, in ascending order.
pub fn variables(tokens: &[Token]) -> Vec<Var> {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Var(v) => Some(*v),
            _ => None,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Emits `(¬(p1) ∨ (p2))`.
fn emit_implication(p1: &[Token], p2: &[Token], out: &mut Vec<Token>) {
    out.extend([Token::LParen, Token::Not, Token::LParen]);
    out.extend_from_slice(p1);
    out.extend([Token::RParen, Token::Or, Token::LParen]);
    out.extend_from_slice(p2);
    out.extend([Token::RParen, Token::RParen]);
}

/// Position of the first `target` outside of any parentheses.
fn find_top_level(tokens: &[Token], target: Token) -> Result<Option<usize>, MalformedExpressionError> {
    let mut depth = 0usize;
    for (i, &token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(MalformedExpressionError::UnbalancedParentheses)?;
            }
            t if t == target && depth == 0 => return Ok(Some(i)),
            _ => {}
        }
    }
    if depth != 0 {
        return Err(MalformedExpressionError::UnbalancedParentheses);
    }
    Ok(None)
}

fn matching_paren(tokens: &[Token], open: usize) -> Result<usize, MalformedExpressionError> {
    let mut depth = 0usize;
    for (i, &token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(MalformedExpressionError::UnbalancedParentheses)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn var(name: char) -> Token {
        Token::Var(Var::new(name))
    }

    #[test]
    fn test_tokenize_symbols() {
        let tokens = tokenize("¬A ∧ (B ∨ C)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Not,
                var('A'),
                Token::And,
                Token::LParen,
                var('B'),
                Token::Or,
                var('C'),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_words() {
        assert_eq!(tokenize("not A and B or C").unwrap(), tokenize("¬A ∧ B ∨ C").unwrap());
        assert_eq!(tokenize("NOT A AND B OR C").unwrap(), tokenize("¬A ∧ B ∨ C").unwrap());
        assert_eq!(tokenize("A v B").unwrap(), vec![var('A'), Token::Or, var('B')]);
        assert_eq!(tokenize("A ^ B").unwrap(), vec![var('A'), Token::And, var('B')]);
        assert_eq!(tokenize("!A && B || C").unwrap(), tokenize("¬A ∧ B ∨ C").unwrap());
    }

    #[test]
    fn test_tokenize_arrows() {
        for input in ["A -> B", "A → B", "A ⇒ B", "A => B", "A->B"] {
            assert_eq!(tokenize(input).unwrap(), vec![var('A'), Token::Implies, var('B')], "{}", input);
        }
        for input in ["A <-> B", "A ↔ B", "A ⇔ B", "A <=> B", "A<->B"] {
            assert_eq!(tokenize(input).unwrap(), vec![var('A'), Token::Iff, var('B')], "{}", input);
        }
    }

    #[test]
    fn test_tokenize_constants() {
        assert_eq!(
            tokenize("T ∧ F").unwrap(),
            vec![Token::Const(true), Token::And, Token::Const(false)]
        );
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(tokenize(""), Err(MalformedExpressionError::Empty));
        assert_eq!(tokenize("   "), Err(MalformedExpressionError::Empty));
        assert_eq!(
            tokenize("A # B"),
            Err(MalformedExpressionError::UnexpectedCharacter { ch: '#', offset: 2 })
        );
        assert_eq!(
            tokenize("A <- B"),
            Err(MalformedExpressionError::UnexpectedCharacter { ch: '<', offset: 2 })
        );
        assert_eq!(
            tokenize("AB ∧ C"),
            Err(MalformedExpressionError::UnrecognizedWord {
                word: "AB".to_string(),
                offset: 0
            })
        );
        assert!(matches!(tokenize("x"), Err(MalformedExpressionError::UnrecognizedWord { .. })));
        assert!(matches!(tokenize("A1"), Err(MalformedExpressionError::UnrecognizedWord { .. })));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("not (A and B)").unwrap(), "¬(A ∧ B)");
        assert_eq!(normalize("A->B").unwrap(), "A → B");
        assert_eq!(normalize("  A  <->  T ").unwrap(), "A ↔ T");
    }

    #[test]
    fn test_eliminate_implication() {
        let tokens = tokenize("A -> B").unwrap();
        let rewritten = eliminate_implications(&tokens).unwrap();
        assert_eq!(render(&rewritten), "(¬(A) ∨ (B))");
    }

    #[test]
    fn test_eliminate_iff() {
        let tokens = tokenize("A <-> B").unwrap();
        let rewritten = eliminate_implications(&tokens).unwrap();
        assert_eq!(render(&rewritten), "((¬(A) ∨ (B)) ∧ (¬(B) ∨ (A)))");
    }

    #[test]
    fn test_eliminate_keeps_precedence() {
        // Implication binds weaker than conjunction and disjunction.
        let tokens = tokenize("A ∧ B -> C ∨ D").unwrap();
        let rewritten = eliminate_implications(&tokens).unwrap();
        assert_eq!(render(&rewritten), "(¬(A ∧ B) ∨ (C ∨ D))");
    }

    #[test]
    fn test_eliminate_right_associative() {
        let tokens = tokenize("A -> B -> C").unwrap();
        let rewritten = eliminate_implications(&tokens).unwrap();
        assert_eq!(render(&rewritten), "(¬(A) ∨ ((¬(B) ∨ (C))))");
    }

    #[test]
    fn test_eliminate_nested_groups() {
        let tokens = tokenize("¬(A -> B) ∧ C").unwrap();
        let rewritten = eliminate_implications(&tokens).unwrap();
        assert_eq!(render(&rewritten), "¬((¬(A) ∨ (B))) ∧ C");
    }

    #[test]
    fn test_eliminate_errors() {
        let missing = |s: &str| eliminate_implications(&tokenize(s).unwrap());
        assert_eq!(missing("A ->"), Err(MalformedExpressionError::MissingOperand));
        assert_eq!(missing("<-> B"), Err(MalformedExpressionError::MissingOperand));
        assert_eq!(missing("(A -> B"), Err(MalformedExpressionError::UnbalancedParentheses));
        assert_eq!(missing("A ∧ B)"), Err(MalformedExpressionError::UnbalancedParentheses));
    }

    #[test]
    fn test_tokenize_unspaced_disjunction() {
        assert_eq!(tokenize("AvB").unwrap(), vec![var('A'), Token::Or, var('B')]);
        assert_eq!(tokenize("AvBvC").unwrap(), tokenize("A ∨ B ∨ C").unwrap());
        assert_eq!(tokenize("¬(AvT)").unwrap(), tokenize("¬(A ∨ T)").unwrap());
        for input in ["Av", "vA", "AvBC", "AVB", "Avb"] {
            assert!(
                matches!(tokenize(input), Err(MalformedExpressionError::UnrecognizedWord { .. })),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_eliminate_deep_nesting() {
        let depth = 50_000;
        let tokens = tokenize(&format!("{}A{}", "(".repeat(depth), ")".repeat(depth))).unwrap();
        assert_eq!(
            eliminate_implications(&tokens),
            Err(MalformedExpressionError::TooDeeplyNested { max: MAX_NESTING })
        );

        let chain = vec!["A"; depth].join(" -> ");
        assert_eq!(
            eliminate_implications(&tokenize(&chain).unwrap()),
            Err(MalformedExpressionError::TooDeeplyNested { max: MAX_NESTING })
        );

        let tokens = tokenize(&format!("{}A{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING))).unwrap();
        assert_eq!(eliminate_implications(&tokens).unwrap(), tokens);
    }

    #[test]
    fn test_eliminate_token_limit() {
        let tokens = tokenize("A <-> B").unwrap();
        assert_eq!(eliminate_implications_with_limit(&tokens, 23).unwrap().len(), 23);
        assert_eq!(
            eliminate_implications_with_limit(&tokens, 22),
            Err(MalformedExpressionError::TooManyTokens { max: 22 })
        );

        // A single variable, but each `↔` doubles the output.
        let chain = vec!["A"; 30].join(" <-> ");
        assert_eq!(
            eliminate_implications(&tokenize(&chain).unwrap()),
            Err(MalformedExpressionError::TooManyTokens { max: MAX_TOKENS })
        );
    }

    #[test]
    fn test_variables() {
        let tokens = tokenize("C ∧ A -> B ∨ A ∧ T").unwrap();
        assert_eq!(variables(&tokens), vec![Var::new('A'), Var::new('B'), Var::new('C')]);
    }
}
