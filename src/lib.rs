//! c9check - style and symbol-consistency checker for the C9 dialect.
//!
//! c9check analyzes C9 source files with two independent passes. The symbol
//! pass extracts lexical facts (include-comment annotations, function and
//! type definitions, call and type usages) and resolves them into
//! discrepancy warnings: undefined functions and types, unused annotations,
//! unused definitions. The style pass applies an ordered catalog of
//! line-level dialect rules (banned keywords, structural restrictions,
//! naming policy) to each physical line.
//!
//! Neither pass parses the dialect. Every check is a best-effort line or
//! paragraph pattern, which keeps the engine small and fast at the cost of
//! documented blind spots around multi-line constructs.
//!
//! # Architecture
//!
//! - `check`: source units, fact extraction, symbol resolution, rule engine
//! - `policy`: YAML policy (rule toggles, thresholds, file selection)
//! - `report`: output formatting (text, JSON)
//! - `cli`: command-line surface

pub mod check;
pub mod cli;
pub mod policy;
pub mod report;

pub use check::{
    extract, resolve, Definition, DefinitionKind, FileFacts, FileReport, Finding, FindingKind,
    RuleCatalog, RuleSpec, Runner, Severity, SourceUnit, Usage, UsageContext,
};
pub use policy::Policy;
