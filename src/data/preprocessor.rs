// ============================================================
// Layer 4 — Table Preprocessor
// ============================================================
// Cleans the loaded table before labels are extracted.
//
// Cleaning steps (applied in order):
//   1. Drop leftover index columns. A dataframe written with
//      its index produces a first column with an empty header,
//      which readers then call "Unnamed: 0".
//   2. Require the target column.
//   3. Drop rows whose label is missing. Labels are never
//      imputed.
//
// Missing *feature* values are left alone here: imputing them
// is part of the fitted pipeline so the same rule is applied
// at request time.

use crate::domain::errors::TrainError;
use crate::domain::frame::Frame;

/// True for column names that are an artefact of a previous export.
pub fn is_index_column(name: &str) -> bool {
    name.is_empty() || name.starts_with("Unnamed:")
}

pub struct Preprocessor {
    target: String,
}

impl Preprocessor {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }

    /// Clean a loaded table. Consumes the frame and returns the
    /// cleaned one.
    pub fn clean(&self, mut frame: Frame) -> Result<Frame, TrainError> {
        // ── Step 1: spurious index columns ────────────────────────────────────
        let index_columns: Vec<String> = frame
            .columns()
            .iter()
            .filter(|c| is_index_column(c))
            .cloned()
            .collect();
        for name in &index_columns {
            frame.drop_column(name);
            tracing::debug!("Dropped index column '{}'", name);
        }

        // ── Step 2: target must exist ─────────────────────────────────────────
        let target_idx = frame
            .column_index(&self.target)
            .ok_or_else(|| TrainError::MissingTarget(self.target.clone()))?;

        // ── Step 3: unlabelled rows ───────────────────────────────────────────
        let before = frame.len();
        frame.retain_rows(|row| !row[target_idx].is_missing());
        let dropped = before - frame.len();
        if dropped > 0 {
            tracing::info!("Dropped {} row(s) with no '{}' label", dropped, self.target);
        }

        if frame.is_empty() {
            return Err(TrainError::NoLabelledRows(self.target.clone()));
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    #[test]
    fn test_drops_unnamed_columns() {
        let frame = parse_csv(",Unnamed: 3,species,mass\n0,9,Adelie,3700\n".as_bytes()).unwrap();
        let clean = Preprocessor::new("species").clean(frame).unwrap();
        assert_eq!(clean.columns(), &["species".to_string(), "mass".to_string()]);
    }

    #[test]
    fn test_drops_rows_without_label() {
        let frame = parse_csv("species,mass\nAdelie,3700\nNA,4000\n,4100\nGentoo,5000\n".as_bytes()).unwrap();
        let clean = Preprocessor::new("species").clean(frame).unwrap();
        assert_eq!(clean.len(), 2);
    }

    #[test]
    fn test_missing_target_column() {
        let frame = parse_csv("island,mass\nDream,3700\n".as_bytes()).unwrap();
        let err   = Preprocessor::new("species").clean(frame).unwrap_err();
        assert!(matches!(err, TrainError::MissingTarget(t) if t == "species"));
    }

    #[test]
    fn test_all_labels_missing() {
        let frame = parse_csv("species,mass\nNA,3700\n".as_bytes()).unwrap();
        let err   = Preprocessor::new("species").clean(frame).unwrap_err();
        assert!(matches!(err, TrainError::NoLabelledRows(_)));
    }
}
