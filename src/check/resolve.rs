//! Symbol resolution over extracted facts.
//!
//! Resolution is purely per-unit: the defined and used sets come from one
//! file's text, with no cross-file lookup. Annotated names and builtins are
//! suppression sets consulted before anything is flagged.

use phf::phf_set;
use std::collections::HashSet;

use super::extract::FileFacts;
use super::types::{Finding, FindingKind, Severity};

/// Callables native to the dialect; never reported as undefined.
static BUILTIN_CALLABLES: phf::Set<&'static str> = phf_set! {
    "sizeof",
};

/// Primitive type names native to the dialect. The fixed-width `inttypes.h`
/// spellings are the blessed integer forms; `int`, `short` and `long`
/// appear here so the style pass owns their reporting instead of the
/// resolver double-flagging them as undefined.
static BUILTIN_TYPES: phf::Set<&'static str> = phf_set! {
    "void", "bool", "char", "float", "double", "size_t",
    "int8_t", "int16_t", "int32_t", "int64_t",
    "uint8_t", "uint16_t", "uint32_t", "uint64_t",
    "int", "short", "long", "unsigned", "signed",
};

/// Function name exempt from unused reporting.
const ENTRY_POINT: &str = "main";

/// Run the five symbol-consistency checks in their fixed order.
///
/// Within a check, iteration follows the deduplicated insertion order of
/// the underlying extraction, so identical input produces byte-identical
/// output ordering.
pub fn resolve(facts: &FileFacts, file: &str) -> Vec<Finding> {
    let annotations = facts.annotation_names();
    let defined_functions = facts.defined_functions();
    let defined_types = facts.defined_types();
    let used_functions = facts.used_functions();
    let used_types = facts.used_types();

    let annotated: HashSet<&str> = annotations.iter().copied().collect();
    let fn_defined: HashSet<&str> = defined_functions.iter().copied().collect();
    let ty_defined: HashSet<&str> = defined_types.iter().copied().collect();
    let fn_used: HashSet<&str> = used_functions.iter().copied().collect();
    let ty_used: HashSet<&str> = used_types.iter().copied().collect();

    let mut findings = Vec::new();
    let mut push = |kind: FindingKind, message: String| {
        findings.push(Finding {
            kind,
            rule: None,
            message,
            file: file.to_string(),
            line: None,
            severity: Severity::Warning,
        });
    };

    for &name in &used_functions {
        if !fn_defined.contains(name)
            && !annotated.contains(name)
            && !BUILTIN_CALLABLES.contains(name)
        {
            push(
                FindingKind::UndefinedFunction,
                format!("Function {name} is not defined or mentioned in #include comments"),
            );
        }
    }

    for &name in &used_types {
        if !ty_defined.contains(name)
            && !annotated.contains(name)
            && !BUILTIN_TYPES.contains(name)
        {
            push(
                FindingKind::UndefinedType,
                format!("Type {name} is not defined or mentioned in #include comments"),
            );
        }
    }

    for &name in &annotations {
        if !fn_used.contains(name) && !ty_used.contains(name) {
            push(
                FindingKind::UnusedAnnotation,
                format!("#include comment for {name} is not used"),
            );
        }
    }

    for &name in &defined_types {
        if !ty_used.contains(name) && !annotated.contains(name) {
            push(
                FindingKind::UnusedType,
                format!("Type {name} is defined but never used"),
            );
        }
    }

    for &name in &defined_functions {
        if !fn_used.contains(name) && !annotated.contains(name) && name != ENTRY_POINT {
            push(
                FindingKind::UnusedFunction,
                format!("Function {name} is defined but never used"),
            );
        }
    }

    findings
}
