// Public modules
pub mod dedupe;
pub mod error;
pub mod fix;

// Public modules for CLI access
pub mod defaults;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use fix::{apply_fix, fix_file, plan_fix, FixOptions, FixReport};
