//! Batch resolution of footprint package labels.

use indexmap::IndexMap;

use super::database::PackageDatabase;
use super::matcher::{match_package, MatchResult};
use crate::footprint::Footprint;

/// Default minimum score for a match to be accepted.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 0.75;

/// Match outcome for every distinct package label of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageResolution {
    /// Accepted match per package label, in first-seen order. When the
    /// package label itself failed and the value label succeeded, the
    /// result's `label` is the value label.
    pub matches: IndexMap<String, Option<MatchResult>>,
    /// Why a package label could not be resolved.
    pub failures: IndexMap<String, String>,
}

impl PackageResolution {
    /// The accepted match for a package label, if any.
    #[must_use]
    pub fn get(&self, package: &str) -> Option<&MatchResult> {
        self.matches.get(package).and_then(Option::as_ref)
    }
}

fn accepted(result: Option<&MatchResult>, threshold: f64) -> bool {
    result.is_some_and(|m| m.score >= threshold)
}

/// Resolves each distinct package label once.
///
/// A label is matched first by its package name. If that yields nothing or
/// scores below `threshold`, the footprint's value label is tried; a good
/// match there clears the failure.
#[must_use]
pub fn resolve_packages(
    footprints: &[Footprint],
    database: &PackageDatabase,
    threshold: f64,
) -> PackageResolution {
    let mut resolution = PackageResolution::default();

    for footprint in footprints {
        let package = footprint.package.as_str();
        if resolution.matches.contains_key(package) {
            continue;
        }

        let first = match_package(package, database);
        if accepted(first.as_ref(), threshold) {
            resolution.matches.insert(package.to_string(), first);
            continue;
        }

        let failure = first.map_or_else(
            || format!("Could not find a corresponding matching package for {package}"),
            |m| {
                format!(
                    "Found a possible match {} for {package}, however matching score was not large enough {:.3} (<{threshold:.3})",
                    m.matched_alias, m.score
                )
            },
        );

        let retry = Some(footprint.value.as_str())
            .filter(|v| !v.is_empty())
            .and_then(|value| match_package(value, database))
            .filter(|m| m.score >= threshold);

        if let Some(found) = retry {
            tracing::info!(
                package,
                value = %found.label,
                alias = %found.matched_alias,
                "Resolved package through its value label"
            );
            resolution.matches.insert(package.to_string(), Some(found));
        } else {
            tracing::warn!(package, "{failure}");
            resolution.matches.insert(package.to_string(), None);
            resolution.failures.insert(package.to_string(), failure);
        }
    }

    resolution
}
