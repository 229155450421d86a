// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The training workflow programs against DatasetSource rather
// than a concrete CSV reader, so tests (or a future database
// source) can feed it frames directly.

use anyhow::Result;

use crate::domain::frame::Frame;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Any component that can produce the labelled training table.
///
/// Implementations:
///   - CsvLoader → reads a CSV file and types each column
pub trait DatasetSource {
    /// Load the whole table. A source that does not exist must
    /// fail with `TrainError::DatasetNotFound`.
    fn load(&self) -> Result<Frame>;

    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;
}
