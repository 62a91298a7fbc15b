//! Per-package size report for a batch of footprints.

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;

use crate::footprint::Footprint;
use crate::packaging::{resolve_packages, MatchResult, PackageDatabase, PackagingType};
use crate::sizing::{estimate_footprint_size, BoundarySource, PackageSize};

/// Where a reported size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeSource {
    /// Nominal size of the matched database entry.
    Database,
    /// Estimated from the footprint's drawings.
    Geometry,
    /// No size could be determined.
    Unknown,
}

/// Result for one distinct package label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageReport {
    /// Package label as found on the footprints.
    pub package: String,
    /// Accepted database match.
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<MatchResult>,
    /// Body size, longest side first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<PackageSize>,
    /// Where the size came from.
    pub size_source: SizeSource,
    /// Envelope used when the size was estimated from geometry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary: Option<BoundarySource>,
    /// Matching failures and sizing problems.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// Board-level figures over every sized footprint of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSummary {
    /// Footprints per packaging family. Every family is listed.
    pub packaging_count: IndexMap<PackagingType, usize>,
    /// Number of families with at least one footprint.
    pub distinct_packaging_types: usize,
    /// `[min, max]` body length over all footprints, `[0, 0]` if none.
    pub component_length: [f64; 2],
    /// `[min, max]` body width over all footprints, `[0, 0]` if none.
    pub component_width: [f64; 2],
}

impl Default for BoardSummary {
    fn default() -> Self {
        Self {
            packaging_count: PackagingType::ALL.iter().map(|&t| (t, 0)).collect(),
            distinct_packaging_types: 0,
            component_length: [0.0, 0.0],
            component_width: [0.0, 0.0],
        }
    }
}

/// Report for a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SizeReport {
    /// One entry per distinct package label, in first-seen order.
    pub packages: Vec<PackageReport>,
    /// Footprints ignored for lacking a package label or contacts.
    pub skipped_footprints: usize,
    /// Packaging and size figures per footprint.
    pub summary: BoardSummary,
    /// Problems outside any single package: skipped database rows,
    /// undecodable footprints.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl SizeReport {
    /// Looks up the entry of a package label.
    #[must_use]
    pub fn get(&self, package: &str) -> Option<&PackageReport> {
        self.packages.iter().find(|p| p.package == package)
    }

    /// Appends batch-level diagnostics, one line per item.
    pub fn add_diagnostics<I>(&mut self, diagnostics: I)
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        self.diagnostics
            .extend(diagnostics.into_iter().map(|d| d.to_string()));
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> [f64; 2] {
    values
        .fold(None, |range: Option<[f64; 2]>, v| {
            Some(range.map_or([v, v], |[lo, hi]| [lo.min(v), hi.max(v)]))
        })
        .unwrap_or([0.0, 0.0])
}

/// Summarises packaging families and body sizes, weighting each package by
/// the number of eligible footprints carrying its label.
fn summarise(packages: &[PackageReport], footprints_per_label: &IndexMap<&str, usize>) -> BoardSummary {
    let mut summary = BoardSummary::default();
    let mut sizes = Vec::new();

    for report in packages {
        let count = footprints_per_label
            .get(report.package.as_str())
            .copied()
            .unwrap_or(0);
        if count == 0 {
            continue;
        }
        if let Some(matched) = &report.matched {
            *summary.packaging_count.entry(matched.packaging).or_insert(0) += count;
        }
        if let Some(size) = report.size {
            sizes.push(size);
        }
    }

    summary.distinct_packaging_types = summary.packaging_count.values().filter(|&&n| n > 0).count();
    summary.component_length = min_max(sizes.iter().map(|s| s.length));
    summary.component_width = min_max(sizes.iter().map(|s| s.width));
    summary
}

/// Matches every package label against the database and fills in missing
/// sizes from geometry.
///
/// Only footprints with a non-empty package label and at least one contact
/// take part. The geometry estimate of a label is taken from its first
/// footprint; estimates run in parallel.
#[must_use]
pub fn build_report(footprints: &[Footprint], database: &PackageDatabase, threshold: f64) -> SizeReport {
    let eligible: Vec<Footprint> = footprints
        .iter()
        .filter(|f| !f.package.is_empty() && !f.contacts.is_empty())
        .cloned()
        .collect();
    let skipped_footprints = footprints.len() - eligible.len();
    if skipped_footprints > 0 {
        tracing::debug!(skipped_footprints, "Ignoring footprints without package label or contacts");
    }

    let resolution = resolve_packages(&eligible, database, threshold);

    let mut footprints_per_label: IndexMap<&str, usize> = IndexMap::new();
    for footprint in &eligible {
        *footprints_per_label.entry(footprint.package.as_str()).or_insert(0) += 1;
    }

    let representatives: Vec<(&str, &Footprint)> = resolution
        .matches
        .keys()
        .filter_map(|package| {
            eligible
                .iter()
                .find(|f| &f.package == package)
                .map(|f| (package.as_str(), f))
        })
        .collect();

    let packages: Vec<PackageReport> = representatives
        .par_iter()
        .map(|&(package, footprint)| {
            let matched = resolution.get(package).cloned();
            let mut diagnostics: Vec<String> =
                resolution.failures.get(package).cloned().into_iter().collect();

            let database_size = matched.as_ref().map(|m| m.size).filter(|s| !s.is_zero());
            if let Some(size) = database_size {
                return PackageReport {
                    package: package.to_string(),
                    matched,
                    size: Some(size),
                    size_source: SizeSource::Database,
                    boundary: None,
                    diagnostics,
                };
            }

            match estimate_footprint_size(footprint) {
                Ok(estimate) => PackageReport {
                    package: package.to_string(),
                    matched,
                    size: Some(estimate.size),
                    size_source: SizeSource::Geometry,
                    boundary: Some(estimate.source),
                    diagnostics,
                },
                Err(e) => {
                    tracing::warn!(package, error = %e, "Could not estimate footprint size");
                    diagnostics.push(format!("Could not estimate size: {e}"));
                    PackageReport {
                        package: package.to_string(),
                        matched,
                        size: None,
                        size_source: SizeSource::Unknown,
                        boundary: None,
                        diagnostics,
                    }
                }
            }
        })
        .collect();

    tracing::info!(
        packages = packages.len(),
        matched = packages.iter().filter(|p| p.matched.is_some()).count(),
        "Built package size report"
    );

    let summary = summarise(&packages, &footprints_per_label);

    SizeReport {
        packages,
        skipped_footprints,
        summary,
        diagnostics: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::{ContactItem, DrawingPrimitive};
    use crate::geometry::Point;
    use crate::packaging::{PackageEntry, PackagingType};

    fn body(package: &str, w: f64, h: f64) -> Footprint {
        let mut fp = Footprint::new(package);
        fp.add_drawing(DrawingPrimitive::rectangle(Point::new(0.0, 0.0), Point::new(w, h)));
        fp.add_contact(ContactItem::smd(Point::new(-1.0, h / 2.0), 0.5, 0.5));
        fp
    }

    #[test]
    fn database_size_preferred() {
        let mut db = PackageDatabase::new();
        db.insert("0603", PackageEntry::new(PackagingType::TwoTerminal, 1.6, 0.8));
        let report = build_report(&[body("C0603", 5.0, 2.0)], &db, 0.75);

        let entry = report.get("C0603").unwrap();
        assert_eq!(entry.size_source, SizeSource::Database);
        assert_eq!(entry.size, Some(PackageSize::new(1.6, 0.8)));
    }

    #[test]
    fn zero_sized_entry_falls_back_to_geometry() {
        let mut db = PackageDatabase::new();
        db.insert("SOP", PackageEntry::new(PackagingType::SmallOutlineIc, 0.0, 0.0));
        let report = build_report(&[body("SOP8", 5.0, 4.0)], &db, 0.75);

        let entry = report.get("SOP8").unwrap();
        assert!(entry.matched.is_some());
        assert_eq!(entry.size_source, SizeSource::Geometry);
        assert_eq!(entry.size, Some(PackageSize::new(5.0, 4.0)));
    }

    #[test]
    fn summary_counts_footprints_per_family() {
        let mut db = PackageDatabase::new();
        db.insert("0603", PackageEntry::new(PackagingType::TwoTerminal, 1.6, 0.8));
        db.insert("0805", PackageEntry::new(PackagingType::TwoTerminal, 2.0, 1.25));
        let footprints = [
            body("C0603", 5.0, 2.0),
            body("C0603", 5.0, 2.0),
            body("R0805", 5.0, 2.0),
            body("ODD", 7.0, 3.0),
        ];
        let summary = build_report(&footprints, &db, 0.75).summary;

        assert_eq!(summary.packaging_count.len(), PackagingType::ALL.len());
        assert_eq!(summary.packaging_count[&PackagingType::TwoTerminal], 3);
        assert_eq!(summary.distinct_packaging_types, 1);
        assert_eq!(summary.component_length, [1.6, 7.0]);
        assert_eq!(summary.component_width, [0.8, 3.0]);
    }

    #[test]
    fn empty_batch_has_zero_ranges() {
        let report = build_report(&[], &PackageDatabase::new(), 0.75);
        assert_eq!(report.summary.distinct_packaging_types, 0);
        assert_eq!(report.summary.component_length, [0.0, 0.0]);
        assert!(report.summary.packaging_count.values().all(|&n| n == 0));
    }

    #[test]
    fn footprints_without_contacts_are_skipped() {
        let mut bare = body("SOP8", 5.0, 4.0);
        bare.contacts.clear();
        let report = build_report(&[bare, Footprint::new("")], &PackageDatabase::new(), 0.75);
        assert!(report.packages.is_empty());
        assert_eq!(report.skipped_footprints, 2);
    }
}
