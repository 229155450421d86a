// ============================================================
// Layer 5 — Feature Transforms
// ============================================================
// The preprocessing half of the persisted pipeline.
//
//   numeric columns      → impute with the training mean
//                          → standardise (x - mean) / std
//   categorical columns  → impute with the literal "missing"
//                          → one-hot over the sorted training
//                            categories; an unseen value encodes
//                            to all zeros and is reported, never
//                            rejected
//
// Output layout: all numeric columns first, in schema order,
// then the one-hot blocks of the categorical columns.
// Statistics are learned from the training partition only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::errors::TransformError;
use crate::domain::frame::{Cell, Frame};
use crate::domain::schema::FeatureSchema;

/// Fill value for missing categorical cells.
pub const MISSING_CATEGORY: &str = "missing";

// Scales below this are treated as a constant column.
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

// ─── Numeric ──────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTransform {
    pub column: String,
    /// Imputed value for missing cells (the observed mean).
    pub fill:   f64,
    /// Mean of the imputed column.
    pub mean:   f64,
    /// Population standard deviation of the imputed column, or 1.0.
    pub scale:  f64,
}

impl NumericTransform {
    pub fn fit<'a, I>(column: &str, cells: I) -> Result<Self, TransformError>
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut observed = Vec::new();
        let mut missing  = 0usize;
        for cell in cells {
            match cell {
                Cell::Number(x) if x.is_finite() => observed.push(*x),
                Cell::Number(_) => return Err(TransformError::NonFiniteValue(column.to_string())),
                Cell::Missing   => missing += 1,
                Cell::Text(s)   => {
                    return Err(TransformError::TypeMismatch {
                        column: column.to_string(),
                        value:  s.clone(),
                    })
                }
            }
        }

        // An all-missing column has nothing to learn from.
        let fill = if observed.is_empty() {
            0.0
        } else {
            observed.iter().sum::<f64>() / observed.len() as f64
        };

        let n = (observed.len() + missing) as f64;
        let (mean, scale) = if n == 0.0 {
            (0.0, 1.0)
        } else {
            let sum: f64 = observed.iter().sum::<f64>() + fill * missing as f64;
            let mean     = sum / n;
            let sq: f64  = observed.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
                + (fill - mean).powi(2) * missing as f64;
            let std = (sq / n).sqrt();
            (mean, if std < MIN_SCALE { 1.0 } else { std })
        };

        Ok(Self { column: column.to_string(), fill, mean, scale })
    }

    pub fn transform(&self, cell: &Cell) -> Result<f64, TransformError> {
        let x = match cell {
            Cell::Number(x) if x.is_finite() => *x,
            Cell::Number(_) => return Err(TransformError::NonFiniteValue(self.column.clone())),
            Cell::Missing   => self.fill,
            Cell::Text(s)   => {
                return Err(TransformError::TypeMismatch {
                    column: self.column.clone(),
                    value:  s.clone(),
                })
            }
        };
        Ok((x - self.mean) / self.scale)
    }
}

// ─── Categorical ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTransform {
    pub column:     String,
    /// Sorted training categories, one output slot each.
    pub categories: Vec<String>,
}

fn category_of(cell: &Cell) -> String {
    match cell {
        Cell::Text(s)   => s.clone(),
        Cell::Number(n) => n.to_string(),
        Cell::Missing   => MISSING_CATEGORY.to_string(),
    }
}

impl CategoricalTransform {
    pub fn fit<'a, I>(column: &str, cells: I) -> Self
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let categories: BTreeSet<String> = cells.into_iter().map(category_of).collect();
        Self {
            column:     column.to_string(),
            categories: categories.into_iter().collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Append this column's one-hot block to `out`. Returns the
    /// value if it was never seen during training.
    pub fn transform_into(&self, cell: &Cell, out: &mut Vec<f64>) -> Option<String> {
        let value = category_of(cell);
        let hit   = self.categories.binary_search(&value).ok();

        out.extend((0..self.width()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));

        match hit {
            Some(_) => None,
            None    => Some(value),
        }
    }
}

// ─── Column transformer ───────────────────────────────────────────────────────
/// A categorical value that had no slot in the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory {
    pub row:    usize,
    pub column: String,
    pub value:  String,
}

/// Encoded feature matrix for a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub rows:    Vec<Vec<f64>>,
    pub unknown: Vec<UnknownCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformer {
    pub numeric:     Vec<NumericTransform>,
    pub categorical: Vec<CategoricalTransform>,
}

fn column_cells<'a>(frame: &'a Frame, name: &str) -> Result<impl Iterator<Item = &'a Cell> + 'a, TransformError> {
    frame
        .column(name)
        .ok_or_else(|| TransformError::MissingColumn(name.to_string()))
}

impl ColumnTransformer {
    /// Learn imputation, scaling and category tables from `frame`.
    pub fn fit(schema: &FeatureSchema, frame: &Frame) -> Result<Self, TransformError> {
        let numeric = schema
            .numeric()
            .map(|col| NumericTransform::fit(&col.name, column_cells(frame, &col.name)?))
            .collect::<Result<Vec<_>, _>>()?;

        let categorical = schema
            .categorical()
            .map(|col| Ok(CategoricalTransform::fit(&col.name, column_cells(frame, &col.name)?)))
            .collect::<Result<Vec<_>, TransformError>>()?;

        Ok(Self { numeric, categorical })
    }

    /// Width of one encoded row.
    pub fn output_width(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.width()).sum::<usize>()
    }

    /// Names of the encoded features, e.g. `body_mass_g`, `island_Dream`.
    pub fn feature_names(&self) -> Vec<String> {
        self.numeric
            .iter()
            .map(|n| n.column.clone())
            .chain(self.categorical.iter().flat_map(|c| {
                c.categories.iter().map(move |cat| format!("{}_{}", c.column, cat))
            }))
            .collect()
    }

    pub fn transform(&self, frame: &Frame) -> Result<Encoded, TransformError> {
        let lookup = |name: &str| {
            frame
                .column_index(name)
                .ok_or_else(|| TransformError::MissingColumn(name.to_string()))
        };
        let numeric_idx = self
            .numeric
            .iter()
            .map(|n| lookup(&n.column))
            .collect::<Result<Vec<_>, _>>()?;
        let categorical_idx = self
            .categorical
            .iter()
            .map(|c| lookup(&c.column))
            .collect::<Result<Vec<_>, _>>()?;

        let width       = self.output_width();
        let mut rows    = Vec::with_capacity(frame.len());
        let mut unknown = Vec::new();

        for (r, row) in frame.rows().iter().enumerate() {
            let mut out = Vec::with_capacity(width);
            for (t, &idx) in self.numeric.iter().zip(&numeric_idx) {
                out.push(t.transform(&row[idx])?);
            }
            for (t, &idx) in self.categorical.iter().zip(&categorical_idx) {
                if let Some(value) = t.transform_into(&row[idx], &mut out) {
                    unknown.push(UnknownCategory { row: r, column: t.column.clone(), value });
                }
            }
            rows.push(out);
        }

        Ok(Encoded { rows, unknown })
    }
}
