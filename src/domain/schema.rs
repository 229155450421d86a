// ============================================================
// Layer 3 — Feature Schema
// ============================================================
// The numeric/categorical split is derived from the dataset on
// every training run, then frozen into the artifact. At request
// time the same schema decides which columns a frame must have
// and how each one is encoded.

use serde::{Deserialize, Serialize};

use crate::domain::errors::TransformError;
use crate::domain::frame::{Cell, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered feature columns plus the name of the label column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub target:  String,
    pub columns: Vec<ColumnSpec>,
}

impl FeatureSchema {
    /// Derive the schema from a typed frame. Every column except
    /// `target` becomes a feature; a column holding any text cell
    /// is categorical, everything else (including an all-missing
    /// column) is numeric.
    pub fn infer(frame: &Frame, target: &str) -> Self {
        let columns = frame
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, name)| name.as_str() != target)
            .map(|(idx, name)| {
                let has_text = frame
                    .rows()
                    .iter()
                    .any(|row| matches!(row[idx], Cell::Text(_)));
                let kind = if has_text { ColumnKind::Categorical } else { ColumnKind::Numeric };
                ColumnSpec { name: name.clone(), kind }
            })
            .collect();

        Self { target: target.to_string(), columns }
    }

    pub fn numeric(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.kind == ColumnKind::Numeric)
    }

    pub fn categorical(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.kind == ColumnKind::Categorical)
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// A frame must carry every feature column and nothing else
    /// (the target column is tolerated so training frames pass).
    pub fn check_columns(&self, frame: &Frame) -> Result<(), TransformError> {
        for col in &self.columns {
            if frame.column_index(&col.name).is_none() {
                return Err(TransformError::MissingColumn(col.name.clone()));
            }
        }
        for name in frame.columns() {
            let known = name == &self.target || self.columns.iter().any(|c| &c.name == name);
            if !known {
                return Err(TransformError::UnexpectedColumn(name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        let mut f = Frame::new(vec!["species".into(), "island".into(), "mass".into(), "empty".into()]);
        f.push_row(vec![Cell::Text("Adelie".into()), Cell::Text("Dream".into()), Cell::Number(3700.0), Cell::Missing]);
        f.push_row(vec![Cell::Text("Gentoo".into()), Cell::Missing, Cell::Missing, Cell::Missing]);
        f
    }

    #[test]
    fn test_infer_splits_by_cell_type() {
        let schema = FeatureSchema::infer(&frame(), "species");

        assert_eq!(schema.feature_names(), vec!["island", "mass", "empty"]);
        assert_eq!(schema.categorical().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["island"]);
        assert_eq!(schema.numeric().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["mass", "empty"]);
    }

    #[test]
    fn test_infer_follows_added_columns() {
        let base = frame();
        let mut f = Frame::new(base.columns().iter().cloned().chain(["year".to_string()]).collect());
        for row in base.rows() {
            let mut r = row.clone();
            r.push(Cell::Number(2008.0));
            f.push_row(r);
        }
        let schema = FeatureSchema::infer(&f, "species");
        assert!(schema.numeric().any(|c| c.name == "year"));
    }

    #[test]
    fn test_check_columns_reports_missing_and_extra() {
        let schema = FeatureSchema::infer(&frame(), "species");

        let missing = Frame::new(vec!["island".into(), "mass".into()]);
        assert_eq!(
            schema.check_columns(&missing),
            Err(TransformError::MissingColumn("empty".into()))
        );

        let extra = Frame::new(vec!["island".into(), "mass".into(), "empty".into(), "colour".into()]);
        assert_eq!(
            schema.check_columns(&extra),
            Err(TransformError::UnexpectedColumn("colour".into()))
        );

        assert!(schema.check_columns(&frame()).is_ok());
    }
}
