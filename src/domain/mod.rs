// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define what the
// system talks about: penguin observations, tabular frames,
// the feature schema, class names and the error taxonomy.
//
// Rules for this layer:
//   - NO burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Both the trainer and the inference service depend on these
// types, so they are the contract between the two stages.

// A tabular frame of typed cells (training data or one request)
pub mod frame;

// One penguin observation as received over HTTP
pub mod feature_record;

// Declared feature columns and their kinds
pub mod schema;

// Label factorization and the index → species mapping
pub mod labels;

// Closed error enums shared across layers
pub mod errors;

// Core abstractions (traits) that other layers implement
pub mod traits;
