//! Lexical fact extraction from C9 source text.
//!
//! There is no tokenizer here: every extraction rule is a best-effort
//! line- or paragraph-level pattern. Definitions favor precision (a missed
//! definition produces a dismissible "undefined" warning); usages favor
//! recall (an over-detected usage merely suppresses an "unused" warning,
//! the safer failure direction).

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;
use std::collections::HashSet;

use super::source::SourceUnit;

/// Kind of symbol introduced by a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Function,
    Struct,
    Enum,
}

/// A symbol introduced in the unit.
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    pub kind: DefinitionKind,
}

/// Where a usage was consumed. Resolution pools all contexts of a given
/// symbol kind; the context is kept for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageContext {
    Call,
    VariableType,
    MemberType,
    ReturnType,
    ParameterType,
}

/// An occurrence of a symbol name being consumed.
#[derive(Debug, Clone)]
pub struct Usage {
    pub name: String,
    pub context: UsageContext,
}

/// Everything the extractor learned about one source unit, in discovery
/// order. Duplicates are kept; consumers deduplicate.
#[derive(Debug, Clone, Default)]
pub struct FileFacts {
    pub annotations: Vec<String>,
    pub definitions: Vec<Definition>,
    pub function_usages: Vec<Usage>,
    pub type_usages: Vec<Usage>,
}

impl FileFacts {
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
            && self.definitions.is_empty()
            && self.function_usages.is_empty()
            && self.type_usages.is_empty()
    }

    /// Annotation names, deduplicated in insertion order.
    pub fn annotation_names(&self) -> Vec<&str> {
        dedup_preserving(self.annotations.iter().map(String::as_str))
    }

    pub fn defined_functions(&self) -> Vec<&str> {
        dedup_preserving(
            self.definitions
                .iter()
                .filter(|d| d.kind == DefinitionKind::Function)
                .map(|d| d.name.as_str()),
        )
    }

    pub fn defined_types(&self) -> Vec<&str> {
        dedup_preserving(
            self.definitions
                .iter()
                .filter(|d| matches!(d.kind, DefinitionKind::Struct | DefinitionKind::Enum))
                .map(|d| d.name.as_str()),
        )
    }

    pub fn used_functions(&self) -> Vec<&str> {
        dedup_preserving(self.function_usages.iter().map(|u| u.name.as_str()))
    }

    pub fn used_types(&self) -> Vec<&str> {
        dedup_preserving(self.type_usages.iter().map(|u| u.name.as_str()))
    }
}

fn dedup_preserving<'a, I>(items: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|name| seen.insert(*name)).collect()
}

/// Statement keywords that sit in front of a parenthesized expression and
/// must never be recorded as call usages.
static STATEMENT_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "if", "else", "for", "while", "do", "switch", "return",
    "case", "break", "continue", "goto", "typedef", "struct", "enum", "union",
};

lazy_static! {
    /// Include directive with a trailing structured comment:
    /// `#include "x.h" // name, name`.
    static ref ANNOTATION_RE: Regex =
        Regex::new(r#"^\s*#\s*include\s+[<"][^<>"]+[>"]\s*//\s*(.+)$"#).unwrap();

    /// Function signature ending in an open block:
    /// `static type name(params) {`. Requires both a type token and a name
    /// token so control-flow headers never match.
    static ref FUNCTION_DEF_RE: Regex =
        Regex::new(r"^\s*(?:static\s+)?(\w+)\s+(\w+)\s*\(([^)]*)\)\s*\{").unwrap();

    /// Bracketed aggregate bound to a trailing alias:
    /// `typedef struct { ... } Name;`. Tolerates one level of nested braces
    /// so a union inside a struct does not defeat the match.
    static ref TYPEDEF_RE: Regex =
        Regex::new(r"typedef\s+(struct|enum)\s*\{((?:[^{}]|\{[^{}]*\})*)\}\s*(\w+)\s*;").unwrap();

    /// Statement-level call: the leftmost name owning an argument list that
    /// closes before the terminator. Attributes the usage to the outermost
    /// call on the line.
    static ref CALL_RE: Regex = Regex::new(r"\b(\w+)\s*\(.+\)\s*;").unwrap();

    /// Inner call with a single word argument, nested inside another call's
    /// arguments; keeps inner calls from being swallowed by CALL_RE.
    static ref NESTED_CALL_RE: Regex = Regex::new(r"[(\s,]\s*(\w+)\s*\(\w+\)").unwrap();

    /// Variable declaration with an initializer: `type name = ...`,
    /// pointer form included.
    static ref VAR_DECL_RE: Regex = Regex::new(r"\b(\w+)\s+\*?\s*\w+\s*=\s").unwrap();

    /// Aggregate member line: leading type token before a member name and
    /// terminator. Applied to typedef-struct bodies only.
    static ref MEMBER_RE: Regex = Regex::new(r"(?m)^\s*(\w+)\s+\*?\s*\w+\s*;").unwrap();

    /// Leading type token of one parameter-list segment.
    static ref PARAM_TYPE_RE: Regex = Regex::new(r"^\s*(\w+)").unwrap();
}

/// Run all extraction passes over one unit.
///
/// A unit with no matches for a category yields an empty set for that
/// category; extraction itself never fails.
pub fn extract(unit: &SourceUnit) -> FileFacts {
    let mut facts = FileFacts::default();

    for line in unit.lines() {
        extract_annotations(line, &mut facts);
        extract_function_definition(line, &mut facts);
        extract_call_usages(line, &mut facts);
        extract_variable_declarations(line, &mut facts);
    }

    // Aggregate typedefs span lines; matched against the whole buffer.
    extract_type_definitions(unit.text(), &mut facts);

    facts
}

fn extract_annotations(line: &str, facts: &mut FileFacts) {
    if let Some(caps) = ANNOTATION_RE.captures(line) {
        for segment in caps[1].split(',') {
            let name = segment.trim();
            if !name.is_empty() {
                facts.annotations.push(name.to_string());
            }
        }
    }
}

fn extract_function_definition(line: &str, facts: &mut FileFacts) {
    let Some(caps) = FUNCTION_DEF_RE.captures(line) else {
        return;
    };

    facts.type_usages.push(Usage {
        name: caps[1].to_string(),
        context: UsageContext::ReturnType,
    });
    facts.definitions.push(Definition {
        name: caps[2].to_string(),
        kind: DefinitionKind::Function,
    });
    for segment in caps[3].split(',') {
        if let Some(param) = PARAM_TYPE_RE.captures(segment) {
            facts.type_usages.push(Usage {
                name: param[1].to_string(),
                context: UsageContext::ParameterType,
            });
        }
    }
}

fn extract_call_usages(line: &str, facts: &mut FileFacts) {
    if let Some(caps) = CALL_RE.captures(line) {
        let name = &caps[1];
        if !STATEMENT_KEYWORDS.contains(name) {
            facts.function_usages.push(Usage {
                name: name.to_string(),
                context: UsageContext::Call,
            });
        }
    }
    for caps in NESTED_CALL_RE.captures_iter(line) {
        let name = &caps[1];
        if !STATEMENT_KEYWORDS.contains(name) {
            facts.function_usages.push(Usage {
                name: name.to_string(),
                context: UsageContext::Call,
            });
        }
    }
}

fn extract_variable_declarations(line: &str, facts: &mut FileFacts) {
    // Declaration lines start with the type; skip lines a definition or
    // directive already claimed.
    if FUNCTION_DEF_RE.is_match(line) || line.trim_start().starts_with('#') {
        return;
    }
    for caps in VAR_DECL_RE.captures_iter(line) {
        facts.type_usages.push(Usage {
            name: caps[1].to_string(),
            context: UsageContext::VariableType,
        });
    }
}

fn extract_type_definitions(text: &str, facts: &mut FileFacts) {
    for caps in TYPEDEF_RE.captures_iter(text) {
        let kind = match &caps[1] {
            "struct" => DefinitionKind::Struct,
            _ => DefinitionKind::Enum,
        };
        facts.definitions.push(Definition {
            name: caps[3].to_string(),
            kind,
        });
        // Enum bodies hold values, not member types.
        if kind == DefinitionKind::Struct {
            for member in MEMBER_RE.captures_iter(&caps[2]) {
                facts.type_usages.push(Usage {
                    name: member[1].to_string(),
                    context: UsageContext::MemberType,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts_of(text: &str) -> FileFacts {
        extract(&SourceUnit::from_text("test.c", text))
    }

    #[test]
    fn test_annotations_split_on_commas() {
        let facts = facts_of("#include \"util.h\" // helper, Widget\n");
        assert_eq!(facts.annotations, vec!["helper", "Widget"]);
    }

    #[test]
    fn test_annotation_requires_directive() {
        // A stray comment is not an annotation.
        let facts = facts_of("// helper, Widget\n");
        assert!(facts.annotations.is_empty());
    }

    #[test]
    fn test_function_definition_with_return_and_param_types() {
        let facts = facts_of("static ReturnDataType divide(TestStruct props) {\n");
        assert_eq!(facts.definitions.len(), 1);
        assert_eq!(facts.definitions[0].name, "divide");
        assert_eq!(facts.definitions[0].kind, DefinitionKind::Function);

        let types: Vec<(&str, UsageContext)> = facts
            .type_usages
            .iter()
            .map(|u| (u.name.as_str(), u.context))
            .collect();
        assert!(types.contains(&("ReturnDataType", UsageContext::ReturnType)));
        assert!(types.contains(&("TestStruct", UsageContext::ParameterType)));
    }

    #[test]
    fn test_definition_line_is_not_a_usage() {
        let facts = facts_of("static int32_t helper(int32_t value) { return value; }\n");
        assert_eq!(facts.defined_functions(), vec!["helper"]);
        assert!(facts.used_functions().is_empty());
    }

    #[test]
    fn test_control_flow_headers_are_not_definitions() {
        let facts = facts_of("  if (props.b == 0) {\n  while (s[len] != 0) {\n");
        assert!(facts.definitions.is_empty());
    }

    #[test]
    fn test_outer_and_nested_calls() {
        let facts = facts_of("  TestStruct *slot = a_fill(arena, sizeof(TestStruct));\n");
        let used = facts.used_functions();
        assert!(used.contains(&"a_fill"));
        assert!(used.contains(&"sizeof"));
    }

    #[test]
    fn test_return_keyword_is_not_a_call() {
        let facts = facts_of("  return (f32)props.a / (f32)props.b;\n");
        assert!(facts.used_functions().is_empty());
    }

    #[test]
    fn test_call_in_initializer() {
        let facts = facts_of("  i32 sum = add(test_struct);\n");
        assert_eq!(facts.used_functions(), vec!["add"]);
        assert_eq!(facts.used_types(), vec!["i32"]);
    }

    #[test]
    fn test_typedef_struct_with_nested_union() {
        let facts = facts_of(
            "typedef struct {\n  ReturnType type;\n  union {\n    f32 result;\n    ErrorType error;\n  };\n} ReturnDataType;\n",
        );
        assert_eq!(facts.defined_types(), vec!["ReturnDataType"]);
        let used = facts.used_types();
        assert!(used.contains(&"ReturnType"));
        assert!(used.contains(&"f32"));
        assert!(used.contains(&"ErrorType"));
    }

    #[test]
    fn test_typedef_enum_members_are_not_types() {
        let facts = facts_of("typedef enum { DATA,\n               ERROR } ReturnType;\n");
        assert_eq!(facts.defined_types(), vec!["ReturnType"]);
        assert!(facts.used_types().is_empty());
    }

    #[test]
    fn test_pointer_declaration_and_member() {
        let facts = facts_of("typedef struct {\n  uint8_t *data;\n  size_t len;\n} s8;\n  Arena *arena = a_open(12);\n");
        let used = facts.used_types();
        assert!(used.contains(&"uint8_t"));
        assert!(used.contains(&"size_t"));
        assert!(used.contains(&"Arena"));
    }

    #[test]
    fn test_plain_reassignment_is_not_a_declaration() {
        let facts = facts_of("  sum = add(test_struct);\n  props.a = props.b;\n");
        assert!(facts.used_types().is_empty());
    }

    #[test]
    fn test_duplicates_kept_then_deduplicated() {
        let facts = facts_of("  add(a_value);\n  add(b_value);\n");
        assert_eq!(facts.function_usages.len(), 4); // outer + nested per line
        assert_eq!(facts.used_functions(), vec!["add"]);
    }

    #[test]
    fn test_empty_unit_yields_empty_facts() {
        assert!(facts_of("").is_empty());
    }
}
