//! Output formatting for check results.
//!
//! Two formats:
//! - Text: the deterministic line-oriented stream, one block per file.
//!   A file header is emitted even when the file is clean.
//! - JSON: structured output for programmatic consumption, additive to the
//!   text contract.
//!
//! The text renderer returns plain strings so tests can compare output
//! byte for byte; color is applied only to the stderr summary line.

use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::check::{FactsSummary, FileReport};

/// Render one file's block of the text stream.
///
/// Layout: header, optional read error, symbol findings grouped by check
/// category (their construction order), then rule findings in line order.
pub fn render_text(report: &FileReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Checking {}", report.path);

    if let Some(err) = &report.error {
        let _ = writeln!(out, "Error: {}", err);
        return out;
    }

    if let Some(facts) = &report.facts {
        render_facts(&mut out, facts);
    }

    for finding in &report.findings {
        match finding.line {
            None => {
                let _ = writeln!(out, "{}: {}", finding.severity, finding.message);
            }
            Some(line) => {
                let _ = writeln!(
                    out,
                    "{}:{}: {}: {}",
                    finding.file, line, finding.severity, finding.message
                );
            }
        }
    }

    out
}

fn render_facts(out: &mut String, facts: &FactsSummary) {
    let list = |names: &[String]| names.join(", ");
    let _ = writeln!(out, "  Included in comments: [{}]", list(&facts.annotations));
    let _ = writeln!(
        out,
        "  Function definitions: [{}]",
        list(&facts.function_definitions)
    );
    let _ = writeln!(out, "  Function usage: [{}]", list(&facts.function_usages));
    let _ = writeln!(
        out,
        "  Type definitions: [{}]",
        list(&facts.type_definitions)
    );
    let _ = writeln!(out, "  Type usage: [{}]", list(&facts.type_usages));
}

/// Write the text stream for all files to stdout.
pub fn write_text(reports: &[FileReport]) {
    for report in reports {
        print!("{}", render_text(report));
    }
}

/// Write a colored one-line summary to stderr.
pub fn write_summary(reports: &[FileReport]) {
    let warnings: usize = reports.iter().map(|r| r.findings.len()).sum();
    let errors = reports.iter().filter(|r| r.error.is_some()).count();

    let mut parts: Vec<String> = Vec::new();
    if warnings == 0 && errors == 0 {
        parts.push("clean".green().to_string());
    }
    if warnings > 0 {
        let plural = if warnings != 1 { "s" } else { "" };
        parts.push(format!("{} warning{}", warnings, plural).yellow().to_string());
    }
    if errors > 0 {
        let plural = if errors != 1 { "s" } else { "" };
        parts.push(format!("{} file error{}", errors, plural).red().to_string());
    }

    let plural = if reports.len() != 1 { "s" } else { "" };
    eprintln!(
        "{} file{} checked: {}",
        reports.len(),
        plural,
        parts.join(", ")
    );
}

/// Top-level JSON report structure.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub files: Vec<FileReport>,
    pub total_findings: usize,
}

impl JsonReport {
    pub fn new(reports: Vec<FileReport>) -> Self {
        let total_findings = reports.iter().map(|r| r.findings.len()).sum();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            files: reports,
            total_findings,
        }
    }
}

/// Write results in JSON format to stdout.
pub fn write_json(reports: &[FileReport]) -> anyhow::Result<()> {
    let report = JsonReport::new(reports.to_vec());
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}
