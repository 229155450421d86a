// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal each: produce an artifact, or answer predictions from
// one.
//
// Rules for this layer:
//   - No ML math here (that's Layer 5)
//   - No argument parsing or HTTP here (that's Layer 1)
//   - No direct file formats here (that's Layer 4 and 6)
//   - Only workflow coordination

// The training workflow: dataset → artifact
pub mod train_use_case;

// The inference workflow: artifact → predictions
pub mod predict_use_case;
