// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the CSV file on disk and the labelled,
// split training table.
//
//   penguins.csv
//       │
//       ▼
//   CsvLoader         → reads the file, types every column
//       │
//       ▼
//   Preprocessor      → drops index columns and unlabelled rows
//       │
//       ▼
//   LabelledDataset   → factorizes labels, separates features
//       │
//       ▼
//   stratified_split  → seeded 80/20 split per class
//
// Fitting the feature transforms happens in Layer 5 (ml),
// because those transforms are part of the persisted pipeline.

/// Reads a CSV file into a typed Frame
pub mod loader;

/// Cleans the raw table before labels are extracted
pub mod preprocessor;

/// Features + encoded labels + class names
pub mod dataset;

/// Seeded stratified train/test split
pub mod splitter;

#[cfg(test)]
pub mod fixtures;
