//! Process-level run ID stamped on response envelopes and log rows.
//!
//! Every process gets one ULID on first access, so all match and
//! recommendation responses produced by the same process can be grouped
//! when the caller persists them.
//!
//! # Example
//! ```
//! use mk_common::run_id;
//!
//! let id = run_id::get();
//! assert_eq!(id, run_id::get());
//!
//! // Fresh id for a sub-task, e.g. a single batch inside the run.
//! let batch = run_id::generate();
//! assert_ne!(id, batch);
//! ```

use once_cell::sync::Lazy;
use ulid::Ulid;

static RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

/// Returns the process-level run ID (26 chars, time-ordered).
#[inline]
pub fn get() -> &'static str {
    &RUN_ID
}

#[inline]
pub fn generate() -> String {
    Ulid::new().to_string()
}
