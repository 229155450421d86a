// ============================================================
// Layer 4 — Labelled Dataset
// ============================================================
// Splits a cleaned frame into feature columns and integer
// labels. Labels are factorized in first-seen order and the
// resulting name table travels with the data from here on.

use crate::domain::errors::TrainError;
use crate::domain::frame::Frame;
use crate::domain::labels::ClassNames;

#[derive(Debug, Clone)]
pub struct LabelledDataset {
    pub features:    Frame,
    pub labels:      Vec<usize>,
    pub class_names: ClassNames,
}

impl LabelledDataset {
    /// Separate `target` from the feature columns. The frame is
    /// expected to have been cleaned (no missing labels).
    pub fn from_frame(mut frame: Frame, target: &str) -> Result<Self, TrainError> {
        let raw_labels: Vec<String> = frame
            .column(target)
            .ok_or_else(|| TrainError::MissingTarget(target.to_string()))?
            .map(|cell| cell.as_label().unwrap_or_default())
            .collect();

        let (labels, class_names) = ClassNames::factorize(&raw_labels);
        frame.drop_column(target);

        Ok(Self { features: frame, labels, class_names })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of rows per class, indexed by class code.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.class_names.len()];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }

    /// Rows at `indices`, keeping the full class-name table.
    pub fn subset(&self, indices: &[usize]) -> LabelledDataset {
        LabelledDataset {
            features:    self.features.select_rows(indices),
            labels:      indices.iter().map(|&i| self.labels[i]).collect(),
            class_names: self.class_names.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    fn dataset() -> LabelledDataset {
        let frame = parse_csv("species,mass\nGentoo,5000\nAdelie,3700\nGentoo,5200\n".as_bytes()).unwrap();
        LabelledDataset::from_frame(frame, "species").unwrap()
    }

    #[test]
    fn test_target_is_removed_from_features() {
        let ds = dataset();
        assert_eq!(ds.features.columns(), &["mass".to_string()]);
        assert_eq!(ds.labels, vec![0, 1, 0]);
        assert_eq!(ds.class_names.as_slice(), &["Gentoo", "Adelie"]);
    }

    #[test]
    fn test_class_counts() {
        assert_eq!(dataset().class_counts(), vec![2, 1]);
    }

    #[test]
    fn test_subset_keeps_all_class_names() {
        let sub = dataset().subset(&[1]);
        assert_eq!(sub.labels, vec![1]);
        assert_eq!(sub.class_names.len(), 2);
        assert_eq!(sub.features.len(), 1);
    }
}
