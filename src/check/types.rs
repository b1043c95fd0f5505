//! Core types for check results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::extract::FileFacts;

/// Severity of a finding. The engine reports everything as a warning;
/// exit-code policy is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

/// Category of a finding: one of the five symbol-consistency checks, or a
/// style-rule violation (the catalog id travels in [`Finding::rule`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    #[serde(rename = "undefined_function")]
    UndefinedFunction,
    #[serde(rename = "undefined_type")]
    UndefinedType,
    #[serde(rename = "unused_annotation")]
    UnusedAnnotation,
    #[serde(rename = "unused_type")]
    UnusedType,
    #[serde(rename = "unused_function")]
    UnusedFunction,
    #[serde(rename = "style")]
    Style,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::UndefinedFunction => "undefined_function",
            FindingKind::UndefinedType => "undefined_type",
            FindingKind::UnusedAnnotation => "unused_annotation",
            FindingKind::UnusedType => "unused_type",
            FindingKind::UnusedFunction => "unused_function",
            FindingKind::Style => "style",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "undefined_function" => Some(FindingKind::UndefinedFunction),
            "undefined_type" => Some(FindingKind::UndefinedType),
            "unused_annotation" => Some(FindingKind::UnusedAnnotation),
            "unused_type" => Some(FindingKind::UnusedType),
            "unused_function" => Some(FindingKind::UnusedFunction),
            "style" => Some(FindingKind::Style),
            _ => None,
        }
    }

    /// Whether this kind comes out of the symbol pass (no line number).
    pub fn is_symbol(&self) -> bool {
        !matches!(self, FindingKind::Style)
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single reported warning.
///
/// Symbol-consistency findings describe the whole unit and carry no line;
/// rule-engine findings are anchored to one physical line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// Catalog id for style findings, absent for symbol findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub message: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub severity: Severity,
}

/// Deduplicated extraction sets, carried in verbose mode only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactsSummary {
    pub annotations: Vec<String>,
    pub function_definitions: Vec<String>,
    pub type_definitions: Vec<String>,
    pub function_usages: Vec<String>,
    pub type_usages: Vec<String>,
}

impl FactsSummary {
    pub fn from_facts(facts: &FileFacts) -> Self {
        let own = |names: Vec<&str>| names.into_iter().map(str::to_string).collect();
        Self {
            annotations: own(facts.annotation_names()),
            function_definitions: own(facts.defined_functions()),
            type_definitions: own(facts.defined_types()),
            function_usages: own(facts.used_functions()),
            type_usages: own(facts.used_types()),
        }
    }
}

/// Everything reported for one input file.
///
/// A read failure populates `error` and leaves `findings` empty; one file's
/// failure never affects the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<FactsSummary>,
}

impl FileReport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            findings: Vec::new(),
            error: None,
            facts: None,
        }
    }

    pub fn from_error(path: impl Into<String>, err: CheckError) -> Self {
        Self {
            path: path.into(),
            findings: Vec::new(),
            error: Some(err.to_string()),
            facts: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.error.is_none()
    }
}

/// Errors that can occur while checking a file.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid pattern for rule {id:?}: {source}")]
    Pattern {
        id: &'static str,
        #[source]
        source: regex::Error,
    },
}
