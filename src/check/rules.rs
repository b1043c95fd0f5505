//! Line-level dialect rules.
//!
//! Each rule is a data record appended to an ordered catalog at startup,
//! not a hardcoded branch, so policy revisions add entries without touching
//! the engine control flow. Rules are evaluated per physical line with no
//! carried state; the one exception is the split-definition rule, which
//! looks at the immediately following line.
//!
//! Checks that need a real parse tree are out of scope for a line-supplier
//! front end and deliberately absent: unique struct names, tentative
//! definitions, freed-in-same-scope, implicit int. A token-stream front end
//! could feed this same catalog contract if more precision is ever needed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::policy::Policy;

use super::source::SourceUnit;
use super::types::{CheckError, Finding, FindingKind, Severity};

/// How a rule inspects the unit.
#[derive(Debug, Clone)]
pub enum RulePattern {
    /// Match anywhere in a single line.
    Line(Regex),
    /// Match a line together with the immediately following line.
    TwoLine { first: Regex, next: Regex },
}

/// One catalog entry: a single line-level style/safety check.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub id: &'static str,
    pub pattern: RulePattern,
    pub message: &'static str,
}

/// Default threshold for the short-name rule, in characters.
pub const DEFAULT_MIN_NAME_LEN: usize = 3;

fn line(pattern: &str) -> RulePattern {
    RulePattern::Line(Regex::new(pattern).expect("catalog pattern"))
}

fn short_name_pattern(min_len: usize) -> String {
    // Identifier of fewer than `min_len` characters on the left of an
    // initializing `=`. The leading class keeps struct designators
    // (`.a = 1`) and compound operators out.
    format!(r"(?:^|[^\w.])(\w{{1,{}}})\s*=\s", min_len - 1)
}

/// The full catalog, in evaluation order. Built once per process; policy
/// filtering happens in [`RuleCatalog::new`].
static DEFAULT_CATALOG: Lazy<Vec<RuleSpec>> = Lazy::new(|| {
    vec![
        RuleSpec {
            id: "goto",
            pattern: line(r"\bgoto\b"),
            message: "Found goto",
        },
        RuleSpec {
            id: "integer-types",
            pattern: line(r"\b(int|short|long)\b"),
            message: "Found built-in integer type",
        },
        RuleSpec {
            id: "size-keywords",
            pattern: line(r"\b(long|short)\b"),
            message: "Found long or short keyword",
        },
        RuleSpec {
            id: "short-name",
            pattern: line(&short_name_pattern(DEFAULT_MIN_NAME_LEN)),
            message: "Found short variable name",
        },
        RuleSpec {
            id: "flexible-array",
            pattern: line(r"\[\s*\]\s*;"),
            message: "Found flexible array member in struct",
        },
        RuleSpec {
            id: "no-parameters",
            pattern: line(r"\(\s*\)\s*\{"),
            message: "Found function declaration without parameters",
        },
        RuleSpec {
            id: "variable-length-array",
            pattern: line(r"\b\w+\s+\w+\s*\[\s*[a-z_]\w*\s*\]\s*;"),
            message: "Found variable-length array",
        },
        RuleSpec {
            id: "malloc",
            pattern: line(r"\bmalloc\b"),
            message: "Found use of malloc",
        },
        RuleSpec {
            id: "preprocessor",
            pattern: line(r"^\s*#\s*(if|ifdef|ifndef|elif|else|endif|define|undef|pragma|error)\b"),
            message: "Found use of preprocessor directive",
        },
        RuleSpec {
            id: "block-comment",
            pattern: line(r"/\*"),
            message: "Found block comment",
        },
        RuleSpec {
            id: "bare-aggregate",
            pattern: line(r"^\s*(struct|enum)\s+\w+\s*\{"),
            message: "Found struct or enum without typedef",
        },
        RuleSpec {
            id: "local-const",
            pattern: line(r"^\s+const\b"),
            message: "Found use of const in local scope",
        },
        RuleSpec {
            id: "split-definition",
            pattern: RulePattern::TwoLine {
                first: Regex::new(r"^\s*(?:static\s+)?\w+\s+\w+\s*\([^)]*\)\s*$")
                    .expect("catalog pattern"),
                next: Regex::new(r"^\s*\{").expect("catalog pattern"),
            },
            message: "Found function body brace on its own line",
        },
    ]
});

/// Ids of every rule the catalog knows, in catalog order.
pub fn known_rule_ids() -> Vec<&'static str> {
    DEFAULT_CATALOG.iter().map(|r| r.id).collect()
}

/// Ordered, policy-filtered view of the rule catalog.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<RuleSpec>,
}

impl RuleCatalog {
    /// Build the catalog for one run: drop disabled rules and rebuild the
    /// short-name pattern when the policy overrides the threshold.
    pub fn new(policy: &Policy) -> Result<Self, CheckError> {
        let mut rules: Vec<RuleSpec> = DEFAULT_CATALOG
            .iter()
            .filter(|rule| !policy.is_rule_disabled(rule.id))
            .cloned()
            .collect();

        let min_len = policy.min_identifier_length();
        if min_len != DEFAULT_MIN_NAME_LEN {
            for rule in rules.iter_mut().filter(|r| r.id == "short-name") {
                let regex = Regex::new(&short_name_pattern(min_len))
                    .map_err(|source| CheckError::Pattern {
                        id: "short-name",
                        source,
                    })?;
                rule.pattern = RulePattern::Line(regex);
            }
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[RuleSpec] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// One finding per line per violated rule: line order first, catalog
    /// order within a line. A rule that cannot be evaluated on a line
    /// (lookahead past the last line) is simply not triggered.
    pub fn apply(&self, unit: &SourceUnit, file: &str) -> Vec<Finding> {
        let lines: Vec<&str> = unit.lines().collect();
        let mut findings = Vec::new();

        for (idx, text) in lines.iter().enumerate() {
            for rule in &self.rules {
                let hit = match &rule.pattern {
                    RulePattern::Line(re) => re.is_match(text),
                    RulePattern::TwoLine { first, next } => {
                        first.is_match(text)
                            && lines.get(idx + 1).map_or(false, |n| next.is_match(n))
                    }
                };
                if hit {
                    findings.push(Finding {
                        kind: FindingKind::Style,
                        rule: Some(rule.id.to_string()),
                        message: rule.message.to_string(),
                        file: file.to_string(),
                        line: Some(idx + 1),
                        severity: Severity::Warning,
                    });
                }
            }
        }

        findings
    }
}
