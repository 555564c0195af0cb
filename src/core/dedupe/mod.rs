//! Duplicate style-key renaming.
//!
//! Scans a source buffer for object-literal key declarations (`name: {`),
//! counts each name, and suffixes every declaration after the first with its
//! occurrence number (`name2`, `name3`, ...).

mod rewrite;
mod scan;

pub use rewrite::{dedupe_keys, DedupeResult, DedupeWarning, KeyRename};
pub use scan::{scan_declarations, Declaration, Duplicate, IndentRule, OccurrenceTable};
