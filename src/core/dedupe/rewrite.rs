//! Rename passes — suffix every non-first declaration of a duplicated key.
//!
//! One pass runs per duplicated name, in order of first discovery. Each pass
//! operates on the buffer produced by the previous one, so a name generated
//! by an earlier pass is visible to later passes.

use super::scan::{self, Duplicate, IndentRule, LineIndex, OccurrenceTable};
use crate::error::Result;
use regex::Captures;
use serde::Serialize;
use std::collections::HashMap;

/// One declaration that was renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRename {
    /// Line of the identifier (1-indexed).
    pub line: usize,
    pub from: String,
    pub to: String,
}

/// A generated name that clashes with another declaration.
#[derive(Debug, Clone, Serialize)]
pub struct DedupeWarning {
    /// Warning category.
    pub kind: String,
    /// The generated name.
    pub name: String,
    /// Line of the renamed declaration.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

/// Outcome of deduplicating one buffer.
#[derive(Debug, Clone, Serialize)]
pub struct DedupeResult {
    /// Total key declarations in the source.
    pub total_declarations: usize,
    /// Distinct key names in the source.
    pub distinct_names: usize,
    /// Duplicated names in order of first discovery.
    pub duplicates: Vec<Duplicate>,
    /// Renamed declarations, ordered by line.
    pub renames: Vec<KeyRename>,
    pub warnings: Vec<DedupeWarning>,
    /// Rewritten buffer.
    #[serde(skip)]
    pub new_content: String,
}

impl DedupeResult {
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

/// Rename duplicated key declarations in `content`.
///
/// The first declaration of each name is left byte-for-byte untouched. The
/// n-th (n >= 2) becomes `<indent><name><n>: {`, keeping its leading
/// whitespace and everything after the brace.
pub fn dedupe_keys(content: &str, rule: IndentRule) -> Result<DedupeResult> {
    let declarations = scan::scan_declarations(content, rule);
    let table = OccurrenceTable::from_declarations(&declarations);
    let duplicates = table.duplicates();

    let mut buffer = content.to_string();
    let mut renames = Vec::new();

    for duplicate in &duplicates {
        let (next, pass_renames) = rename_pass(&buffer, &duplicate.name, rule)?;
        buffer = next;
        renames.extend(pass_renames);
    }

    renames.sort_by_key(|r| r.line);
    let warnings = detect_collisions(&renames, &table);

    Ok(DedupeResult {
        total_declarations: declarations.len(),
        distinct_names: table.distinct_names(),
        duplicates,
        renames,
        warnings,
        new_content: buffer,
    })
}

/// Rewrite the second and later declarations of `name`.
fn rename_pass(content: &str, name: &str, rule: IndentRule) -> Result<(String, Vec<KeyRename>)> {
    let pattern = scan::name_pattern(name, rule)?;
    let lines = LineIndex::new(content);
    let mut occurrence = 0;
    let mut renames = Vec::new();

    let rewritten = pattern.replace_all(content, |caps: &Captures<'_>| {
        occurrence += 1;
        let whole = &caps[0];
        if occurrence == 1 {
            return whole.to_string();
        }

        let indent = &caps[1];
        let renamed = format!("{}{}", name, occurrence);
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        renames.push(KeyRename {
            line: lines.line_of(start + indent.len()),
            from: name.to_string(),
            to: renamed.clone(),
        });

        format!("{}{}: {{", indent, renamed)
    });

    Ok((rewritten.into_owned(), renames))
}

/// Flag generated names that are already declared in the source, or that
/// two different passes produced.
fn detect_collisions(renames: &[KeyRename], table: &OccurrenceTable) -> Vec<DedupeWarning> {
    let mut warnings = Vec::new();
    let mut generated: HashMap<&str, &KeyRename> = HashMap::new();

    for rename in renames {
        if table.count(&rename.to) > 0 {
            warnings.push(DedupeWarning {
                kind: "name_collision".to_string(),
                name: rename.to.clone(),
                line: rename.line,
                message: format!(
                    "Renamed '{}' to '{}' at line {}, but '{}' is already declared",
                    rename.from, rename.to, rename.line, rename.to
                ),
            });
        }

        if let Some(first) = generated.get(rename.to.as_str()) {
            warnings.push(DedupeWarning {
                kind: "name_collision".to_string(),
                name: rename.to.clone(),
                line: rename.line,
                message: format!(
                    "Renamed '{}' to '{}' at line {}, same as the rename of '{}' at line {}",
                    rename.from, rename.to, rename.line, first.from, first.line
                ),
            });
        } else {
            generated.insert(rename.to.as_str(), rename);
        }
    }

    warnings
}
