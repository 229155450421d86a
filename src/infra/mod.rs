// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem:
//
//   artifact_store.rs — Writes the artifact (pipeline + class
//                       names) atomically and reads it back,
//                       checking version and consistency.
//
//   metrics.rs        — Held-out evaluation: accuracy and a
//                       per-class report, logged and optionally
//                       written to CSV.

/// Artifact persistence
pub mod artifact_store;

/// Held-out evaluation report
pub mod metrics;
