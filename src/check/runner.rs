//! Per-file check orchestration.

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use super::extract;
use super::resolve;
use super::rules::RuleCatalog;
use super::source::SourceUnit;
use super::types::{FactsSummary, FileReport};

/// Executes both analysis passes against a set of files.
///
/// Files are independent: the symbol pass and the style pass share nothing
/// across units, so the run fans out with rayon and collects in input order
/// to keep the merged report deterministic.
pub struct Runner<'a> {
    catalog: &'a RuleCatalog,
    collect_facts: bool,
}

impl<'a> Runner<'a> {
    pub fn new(catalog: &'a RuleCatalog) -> Self {
        Self {
            catalog,
            collect_facts: false,
        }
    }

    /// Carry the deduplicated extraction sets in each report (verbose mode).
    pub fn with_facts(mut self, collect: bool) -> Self {
        self.collect_facts = collect;
        self
    }

    /// Check one unit: symbol pass first, then the style pass, findings
    /// appended in that order.
    pub fn check_unit(&self, unit: &SourceUnit) -> FileReport {
        let mut report = FileReport::new(unit.path());

        let facts = extract::extract(unit);
        report.findings.extend(resolve::resolve(&facts, unit.path()));
        if self.collect_facts {
            report.facts = Some(FactsSummary::from_facts(&facts));
        }

        report
            .findings
            .extend(self.catalog.apply(unit, unit.path()));

        report
    }

    /// Check one file. A read failure is fatal for this file only and is
    /// reported in place of findings.
    pub fn check_file(&self, path: &Path) -> FileReport {
        match SourceUnit::read(path) {
            Ok(unit) => self.check_unit(&unit),
            Err(err) => FileReport::from_error(path.display().to_string(), err),
        }
    }

    /// Check all files in parallel, preserving input order in the result.
    pub fn run(&self, files: &[PathBuf]) -> Vec<FileReport> {
        files.par_iter().map(|path| self.check_file(path)).collect()
    }
}
