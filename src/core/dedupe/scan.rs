//! Key-declaration scanning and occurrence counting.
//!
//! A key declaration is a line of the form `<indent><identifier>: {`. The scan
//! is purely lexical: nested objects, strings and comments are not understood,
//! so every line that looks like a declaration counts.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

// Identifier, colon and brace must share a line; only the indent may span
// blank lines.
static OPTIONAL_INDENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*)([A-Za-z_][A-Za-z0-9_]*)[ \t]*:[ \t]*\{").unwrap()
});

static REQUIRED_INDENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s+)([A-Za-z_][A-Za-z0-9_]*)[ \t]*:[ \t]*\{").unwrap()
});

/// Which lines qualify as key declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentRule {
    /// Any line, including column-zero keys.
    #[default]
    Optional,
    /// Only lines with at least one leading whitespace character.
    Required,
}

impl IndentRule {
    pub fn from_flag(require_indent: bool) -> Self {
        if require_indent {
            IndentRule::Required
        } else {
            IndentRule::Optional
        }
    }

    fn leading(self) -> &'static str {
        match self {
            IndentRule::Optional => r"\s*",
            IndentRule::Required => r"\s+",
        }
    }

    fn declaration_pattern(self) -> &'static Regex {
        match self {
            IndentRule::Optional => &*OPTIONAL_INDENT_PATTERN,
            IndentRule::Required => &*REQUIRED_INDENT_PATTERN,
        }
    }
}

/// Build the pattern matching declarations of one specific identifier.
///
/// Capture group 1 is the leading whitespace.
pub(crate) fn name_pattern(name: &str, rule: IndentRule) -> Result<Regex> {
    let pattern = format!(
        r"(?m)^({}){}[ \t]*:[ \t]*\{{",
        rule.leading(),
        regex::escape(name)
    );

    Regex::new(&pattern).map_err(|e| {
        Error::internal_unexpected(format!(
            "Invalid declaration pattern for '{}': {}",
            name, e
        ))
    })
}

/// Byte offsets where each line starts, for offset → line lookups.
pub(crate) struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(content: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    /// 1-indexed line number of a byte offset.
    pub(crate) fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

/// A single key declaration found in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Key name.
    pub name: String,
    /// Leading whitespace exactly as written.
    pub indent: String,
    /// Line of the identifier (1-indexed).
    pub line: usize,
}

/// Find every key declaration in `content`, in order of appearance.
pub fn scan_declarations(content: &str, rule: IndentRule) -> Vec<Declaration> {
    let lines = LineIndex::new(content);
    rule.declaration_pattern()
        .captures_iter(content)
        .filter_map(|caps| {
            let indent = caps.get(1)?;
            let name = caps.get(2)?;
            Some(Declaration {
                name: name.as_str().to_string(),
                indent: indent.as_str().to_string(),
                line: lines.line_of(name.start()),
            })
        })
        .collect()
}

/// A key name declared more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub name: String,
    pub occurrences: usize,
}

/// Occurrence counts per key name, iterated in order of first discovery.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceTable {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl OccurrenceTable {
    pub fn from_declarations(declarations: &[Declaration]) -> Self {
        let mut table = Self::default();
        for decl in declarations {
            table.record(&decl.name);
        }
        table
    }

    fn record(&mut self, name: &str) {
        match self.counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.order.push(name.to_string());
                self.counts.insert(name.to_string(), 1);
            }
        }
    }

    /// Number of declarations of `name` (0 when never declared).
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Number of distinct key names.
    pub fn distinct_names(&self) -> usize {
        self.order.len()
    }

    /// `(name, count)` pairs in order of first discovery.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.count(name)))
    }

    /// Names with more than one declaration, in order of first discovery.
    pub fn duplicates(&self) -> Vec<Duplicate> {
        self.iter()
            .filter(|&(_, count)| count > 1)
            .map(|(name, count)| Duplicate {
                name: name.to_string(),
                occurrences: count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(decls: &[Declaration]) -> Vec<&str> {
        decls.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn scan_finds_indented_declarations() {
        let content = "const styles = StyleSheet.create({\n  button: {\n    flex: 1,\n  },\n  header: {\n  },\n});\n";
        let decls = scan_declarations(content, IndentRule::Optional);

        assert_eq!(names(&decls), vec!["button", "header"]);
        assert_eq!(decls[0].indent, "  ");
        assert_eq!(decls[0].line, 2);
        assert_eq!(decls[1].line, 5);
    }

    #[test]
    fn scan_ignores_keys_without_brace() {
        let content = "  button: {\n    flex: 1,\n    color: 'red',\n  },\n";
        let decls = scan_declarations(content, IndentRule::Optional);

        assert_eq!(names(&decls), vec!["button"]);
    }

    #[test]
    fn scan_tolerates_whitespace_around_colon() {
        let content = "  button :  {\n\tcard\t:{\n";
        let decls = scan_declarations(content, IndentRule::Optional);

        assert_eq!(names(&decls), vec!["button", "card"]);
        assert_eq!(decls[1].indent, "\t");
    }

    #[test]
    fn scan_rejects_brace_on_next_line() {
        let content = "  button:\n  {\n  },\n";
        assert!(scan_declarations(content, IndentRule::Optional).is_empty());
    }

    #[test]
    fn scan_rejects_non_identifier_keys() {
        let content = "  'quoted': {\n  2col: {\n  my-key: {\n";
        assert!(scan_declarations(content, IndentRule::Optional).is_empty());
    }

    #[test]
    fn optional_indent_matches_column_zero() {
        let content = "button: {\n}\n";
        assert_eq!(
            names(&scan_declarations(content, IndentRule::Optional)),
            vec!["button"]
        );
    }

    #[test]
    fn required_indent_skips_column_zero_on_first_line() {
        let content = "button: {\n}\n  card: {\n";
        assert_eq!(
            names(&scan_declarations(content, IndentRule::Required)),
            vec!["card"]
        );
    }

    #[test]
    fn indent_may_span_blank_lines() {
        let content = "x\n\n  button: {\n";
        let decls = scan_declarations(content, IndentRule::Optional);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].indent, "\n  ");
        assert_eq!(decls[0].line, 3);
    }

    #[test]
    fn table_preserves_discovery_order() {
        let content = "  b: {\n  a: {\n  b: {\n  c: {\n  a: {\n  b: {\n";
        let decls = scan_declarations(content, IndentRule::Optional);
        let table = OccurrenceTable::from_declarations(&decls);

        let order: Vec<(&str, usize)> = table.iter().collect();
        assert_eq!(order, vec![("b", 3), ("a", 2), ("c", 1)]);
        assert_eq!(table.distinct_names(), 3);
        assert_eq!(table.count("missing"), 0);
    }

    #[test]
    fn duplicates_excludes_single_occurrences() {
        let content = "  b: {\n  a: {\n  b: {\n";
        let decls = scan_declarations(content, IndentRule::Optional);
        let duplicates = OccurrenceTable::from_declarations(&decls).duplicates();

        assert_eq!(
            duplicates,
            vec![Duplicate {
                name: "b".to_string(),
                occurrences: 2
            }]
        );
    }

    #[test]
    fn name_pattern_does_not_match_longer_identifiers() {
        let re = name_pattern("button", IndentRule::Optional).unwrap();
        assert!(re.is_match("  button: {"));
        assert!(!re.is_match("  button2: {"));
        assert!(!re.is_match("  buttonText: {"));
    }

    #[test]
    fn line_index_maps_offsets_to_lines() {
        let lines = LineIndex::new("a\nb\n\nc");
        assert_eq!(lines.line_of(0), 1);
        assert_eq!(lines.line_of(1), 1);
        assert_eq!(lines.line_of(2), 2);
        assert_eq!(lines.line_of(4), 3);
        assert_eq!(lines.line_of(5), 4);
    }

    #[test]
    fn line_index_without_newlines_is_single_line() {
        let lines = LineIndex::new("  button: {");
        assert_eq!(lines.line_of(0), 1);
        assert_eq!(lines.line_of(10), 1);
    }

    #[test]
    fn declaration_lines_are_exact_in_long_buffers() {
        let mut content = String::new();
        for i in 0..500 {
            content.push_str(&format!("  key{}: {{\n    flex: 1,\n  }},\n", i));
        }
        let decls = scan_declarations(&content, IndentRule::Optional);

        assert_eq!(decls.len(), 500);
        assert_eq!(decls[0].line, 1);
        assert_eq!(decls[499].line, 499 * 3 + 1);
    }
}
