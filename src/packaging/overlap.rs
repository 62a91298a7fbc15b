//! Token-level fuzzy overlap between package labels.
//!
//! Labels are split into tokens and each token class (letters, digits,
//! other) is scored separately. The score for a class is the share of the
//! query's characters that can be explained by consuming alias tokens as
//! substrings of query tokens, searched exhaustively.

use std::collections::HashSet;

/// Class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Alphabetic characters only.
    Letters,
    /// ASCII digits only.
    Digits,
    /// Anything else (mixed, punctuation, embedded whitespace).
    Other,
}

impl TokenClass {
    fn of(token: &str) -> Self {
        if token.chars().all(char::is_alphabetic) {
            Self::Letters
        } else if token.chars().all(|c| c.is_ascii_digit()) {
            Self::Digits
        } else {
            Self::Other
        }
    }
}

/// A label split into token classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedLabel {
    /// All tokens in order.
    pub tokens: Vec<String>,
    /// Purely alphabetic tokens.
    pub letters: Vec<String>,
    /// Purely numeric tokens.
    pub digits: Vec<String>,
    /// Remaining tokens.
    pub other: Vec<String>,
}

impl TokenizedLabel {
    /// Tokens of one class.
    #[must_use]
    pub fn class(&self, class: TokenClass) -> &[String] {
        match class {
            TokenClass::Letters => &self.letters,
            TokenClass::Digits => &self.digits,
            TokenClass::Other => &self.other,
        }
    }
}

/// Splits a label on `-`, `_` and digit-run boundaries, trimming whitespace
/// and dropping empty tokens.
///
/// Whitespace is deliberately not a separator: database aliases like
/// "SomeName A" must keep their spaces.
#[must_use]
pub fn tokenize(label: &str) -> TokenizedLabel {
    let mut tokens = Vec::new();
    for part in label.split(['-', '_']) {
        let mut current = String::new();
        let mut in_digits = false;
        for c in part.chars() {
            let digit = c.is_ascii_digit();
            if digit != in_digits && !current.is_empty() {
                push_token(&mut tokens, &current);
                current.clear();
            }
            in_digits = digit;
            current.push(c);
        }
        push_token(&mut tokens, &current);
    }

    let mut out = TokenizedLabel::default();
    for token in &tokens {
        match TokenClass::of(token) {
            TokenClass::Letters => out.letters.push(token.clone()),
            TokenClass::Digits => out.digits.push(token.clone()),
            TokenClass::Other => out.other.push(token.clone()),
        }
    }
    out.tokens = tokens;
    out
}

fn push_token(tokens: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        tokens.push(trimmed.to_string());
    }
}

fn char_len(tokens: &[String]) -> usize {
    tokens.iter().map(|t| t.chars().count()).sum()
}

/// Share of the query's characters explained by the alias tokens.
///
/// Alias tokens are tried longest first, each at most once and never out of
/// that order. Consuming an alias token from a query token removes every
/// occurrence of it; the trimmed remainder goes back into the pool. Every
/// combination is explored and the smallest leftover wins.
///
/// Returns `None` if the query has no tokens (the class is not applicable).
#[must_use]
pub fn overlap(query: &[String], alias: &[String]) -> Option<f64> {
    let total = char_len(query);
    if total == 0 {
        return None;
    }

    let mut alias_sorted: Vec<&str> = alias.iter().map(String::as_str).collect();
    alias_sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

    let mut best = total;
    let mut seen: HashSet<(usize, Vec<String>)> = HashSet::new();
    let mut stack: Vec<(usize, Vec<String>)> = vec![(0, query.to_vec())];

    while let Some((next, pool)) = stack.pop() {
        let mut key_pool = pool.clone();
        key_pool.sort();
        if !seen.insert((next, key_pool)) {
            continue;
        }

        best = best.min(char_len(&pool));
        if best == 0 {
            break;
        }

        for (k, needle) in alias_sorted.iter().enumerate().skip(next) {
            for (i, hay) in pool.iter().enumerate() {
                if !hay.contains(needle) {
                    continue;
                }
                let remainder = hay.replace(needle, "");
                let remainder = remainder.trim();
                let mut child: Vec<String> = pool
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, t)| t.clone())
                    .collect();
                if !remainder.is_empty() {
                    child.push(remainder.to_string());
                }
                stack.push((k + 1, child));
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    Some(1.0 - best as f64 / total as f64)
}
