//! Package label → database alias resolution.
//!
//! A cascade of increasingly fuzzy strategies; the first one that finds
//! anything wins:
//!
//! 1. exact alias
//! 2. alias as a raw substring of the label
//! 3. alias as a substring after stripping `_`, `-` and whitespace
//! 4. (preprocessing) drop dimension tokens such as `1.0X2.0`
//! 5. weighted token overlap per token class

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::database::{PackageDatabase, PackageEntry, PackagingType};
use super::overlap::{overlap, tokenize, TokenClass, TokenizedLabel};
use crate::sizing::PackageSize;

/// Weights of the token classes in the overlap score.
pub const CLASS_WEIGHTS: [(TokenClass, f64); 3] = [
    (TokenClass::Letters, 0.75),
    (TokenClass::Digits, 0.15),
    (TokenClass::Other, 0.10),
];

/// Labels shorter than this after dimension stripping are not scored.
pub const MIN_SCORED_LEN: usize = 3;

/// How a label was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// The label is an alias.
    Exact,
    /// Several aliases are substrings; the longest was taken.
    LongestSubstring,
    /// Exactly one alias is a substring.
    OnlySubstring,
    /// As [`Self::LongestSubstring`], after normalization.
    LongestNormalizedSubstring,
    /// As [`Self::OnlySubstring`], after normalization.
    OnlyNormalizedSubstring,
    /// Best weighted token overlap.
    BestTokenOverlap,
}

impl MatchMethod {
    /// Human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Exact => "exact match",
            Self::LongestSubstring => "the longest matching substring",
            Self::OnlySubstring => "the only matching substring",
            Self::LongestNormalizedSubstring => "the longest matching normalized substring",
            Self::OnlyNormalizedSubstring => "the only matching normalized substring",
            Self::BestTokenOverlap => "the best matching substrings",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A successful match of a label against the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// The label that was matched.
    pub label: String,
    /// The database alias it matched.
    pub matched_alias: String,
    /// Confidence in `(0, 1]`; 1 for all but token overlap.
    pub score: f64,
    /// How the match was found.
    pub method: MatchMethod,
    /// Packaging family of the alias.
    pub packaging: PackagingType,
    /// Nominal size of the alias.
    pub size: PackageSize,
}

impl MatchResult {
    fn new(label: &str, alias: &str, entry: &PackageEntry, score: f64, method: MatchMethod) -> Self {
        Self {
            label: label.to_string(),
            matched_alias: alias.to_string(),
            score,
            method,
            packaging: entry.packaging,
            size: entry.size,
        }
    }
}

fn dimension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+\.)?\d+[Xx]\d+(\.\d+)?").expect("dimension pattern is a valid regex")
    })
}

/// Removes `_`, `-` and whitespace.
#[must_use]
pub fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .collect()
}

/// A purely numeric alias must not continue a number in the label
/// ("201" must not match "7201"); a leading '0' is allowed ("C0201").
fn numeric_alias_allowed(haystack: &str, alias: &str) -> bool {
    if alias.is_empty() || !alias.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    let Some(idx) = haystack.find(alias) else {
        return true;
    };
    !matches!(haystack[..idx].chars().next_back(), Some(c) if c.is_ascii_digit() && c != '0')
}

/// Picks the longest candidate; earlier candidates win ties.
fn longest<'a>(candidates: &[(&'a str, &'a PackageEntry, usize)]) -> Option<(&'a str, &'a PackageEntry)> {
    let mut best: Option<(&str, &PackageEntry, usize)> = None;
    for &(alias, entry, len) in candidates {
        if best.map_or(true, |(_, _, best_len)| len > best_len) {
            best = Some((alias, entry, len));
        }
    }
    best.map(|(a, e, _)| (a, e))
}

fn substring_match(label: &str, database: &PackageDatabase) -> Option<MatchResult> {
    let candidates: Vec<_> = database
        .iter()
        .filter(|(alias, _)| !alias.is_empty() && label.contains(alias))
        .filter(|(alias, _)| numeric_alias_allowed(label, alias))
        .map(|(alias, entry)| (alias, entry, alias.chars().count()))
        .collect();

    let method = match candidates.len() {
        0 => return None,
        1 => MatchMethod::OnlySubstring,
        _ => MatchMethod::LongestSubstring,
    };
    longest(&candidates).map(|(alias, entry)| MatchResult::new(label, alias, entry, 1.0, method))
}

fn normalized_substring_match(label: &str, database: &PackageDatabase) -> Option<MatchResult> {
    let normalized_label = normalize(label);
    let candidates: Vec<_> = database
        .iter()
        .filter_map(|(alias, entry)| {
            let normalized = normalize(alias);
            let hit = !normalized.is_empty()
                && normalized_label.contains(&normalized)
                && numeric_alias_allowed(&normalized_label, &normalized);
            hit.then(|| (alias, entry, normalized.chars().count()))
        })
        .collect();

    let method = match candidates.len() {
        0 => return None,
        1 => MatchMethod::OnlyNormalizedSubstring,
        _ => MatchMethod::LongestNormalizedSubstring,
    };
    longest(&candidates).map(|(alias, entry)| MatchResult::new(label, alias, entry, 1.0, method))
}

/// Weighted token overlap of a label against one alias.
///
/// Classes the label has no tokens of are left out of the weighting.
/// Returns `None` if no class applies.
#[must_use]
pub fn token_score(label: &TokenizedLabel, alias: &TokenizedLabel) -> Option<f64> {
    let mut weighted = 0.0;
    let mut normalization = 0.0;
    for (class, weight) in CLASS_WEIGHTS {
        if let Some(score) = overlap(label.class(class), alias.class(class)) {
            weighted += weight * score;
            normalization += weight;
        }
    }
    (normalization > 0.0).then(|| weighted / normalization)
}

fn token_overlap_match(label: &str, database: &PackageDatabase) -> Option<MatchResult> {
    let cleaned = dimension_pattern().replace_all(label, "");
    if cleaned.chars().count() < MIN_SCORED_LEN {
        tracing::trace!(label, "Label too short after removing dimensions");
        return None;
    }
    let query = tokenize(&cleaned);

    let mut best: Option<(&str, &PackageEntry, f64, usize)> = None;
    for (alias, entry) in database.iter() {
        let Some(score) = token_score(&query, &tokenize(alias)) else {
            continue;
        };
        if score <= 0.0 {
            continue;
        }
        let len = normalize(alias).chars().count();
        let better = best.map_or(true, |(_, _, best_score, best_len)| {
            score > best_score || (score == best_score && len < best_len)
        });
        if better {
            best = Some((alias, entry, score, len));
        }
    }

    best.map(|(alias, entry, score, _)| {
        MatchResult::new(label, alias, entry, score, MatchMethod::BestTokenOverlap)
    })
}

/// Resolves a package label against the database.
///
/// Returns `None` if no strategy finds a candidate. The score is not checked
/// against any threshold here; see [`super::resolve_packages`] for the
/// acceptance policy.
#[must_use]
pub fn match_package(label: &str, database: &PackageDatabase) -> Option<MatchResult> {
    if let Some(entry) = database.get(label) {
        return Some(MatchResult::new(label, label, entry, 1.0, MatchMethod::Exact));
    }

    let result = substring_match(label, database)
        .or_else(|| normalized_substring_match(label, database))
        .or_else(|| token_overlap_match(label, database));

    match &result {
        Some(m) => tracing::debug!(
            label,
            alias = %m.matched_alias,
            score = m.score,
            method = %m.method,
            "Matched package label"
        ),
        None => tracing::debug!(label, "No package alias matched"),
    }
    result
}
