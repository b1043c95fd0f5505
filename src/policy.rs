//! Dialect policy configuration.
//!
//! A policy tunes the checker without changing its semantics: which catalog
//! rules run, the short-name threshold, which files count as dialect
//! sources, and which paths a directory walk skips. Everything has a
//! default; a missing policy file means "check everything".

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::check::rules::{known_rule_ids, DEFAULT_MIN_NAME_LEN};

/// Top-level policy definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Policy {
    #[serde(default)]
    pub version: String,
    /// Catalog rule ids to turn off.
    #[serde(default)]
    pub disabled_rules: Vec<String>,
    /// Minimum identifier length enforced by the short-name rule.
    #[serde(default)]
    pub min_identifier_length: Option<usize>,
    /// File extensions treated as dialect sources during directory walks.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Glob patterns for paths to exclude from directory walks.
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            disabled_rules: Vec::new(),
            min_identifier_length: None,
            extensions: vec!["c".to_string(), "h".to_string()],
            excluded_paths: Vec::new(),
        }
    }
}

impl Policy {
    /// Parse a policy from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut policy: Policy = serde_yaml::from_str(&content)?;
        if policy.extensions.is_empty() {
            policy.extensions = Policy::default().extensions;
        }
        Ok(policy)
    }

    pub fn is_rule_disabled(&self, id: &str) -> bool {
        self.disabled_rules.iter().any(|d| d == id)
    }

    pub fn min_identifier_length(&self) -> usize {
        self.min_identifier_length.unwrap_or(DEFAULT_MIN_NAME_LEN)
    }

    /// Whether a path carries one of the dialect extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.extensions.iter().any(|e| e == ext)
    }

    /// Check a path against the excluded_paths globs. Supports `**` for
    /// recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

/// Reject policies the run could not honor: unknown rule ids, a name-length
/// threshold the pattern cannot express, malformed globs.
pub fn validate(policy: &Policy) -> anyhow::Result<()> {
    let known = known_rule_ids();
    for id in &policy.disabled_rules {
        if !known.contains(&id.as_str()) {
            anyhow::bail!("unknown rule id {:?} in disabled_rules", id);
        }
    }

    if policy.min_identifier_length() < 2 {
        anyhow::bail!("min_identifier_length must be at least 2");
    }

    for pattern in &policy.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths glob {:?}: {}", pattern, e))?;
    }

    Ok(())
}
