// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one.
//
// What's in this layer:
//
//   transform.rs — Per-column preprocessing
//                  • Numeric: mean imputation + standard scaling
//                  • Categorical: "missing" fill + one-hot with
//                    unknown categories encoded as all zeros
//
//   model.rs     — Multinomial logistic regression
//                  A single Linear layer trained with Burn, then
//                  frozen into plain f64 weights for inference
//
//   trainer.rs   — The fitting loop
//                  Full-batch Adam on cross-entropy + L2 penalty,
//                  stops on tolerance or the iteration cap
//
//   pipeline.rs  — Transforms + classifier as one persisted unit

pub mod model;
pub mod pipeline;
pub mod trainer;
pub mod transform;
