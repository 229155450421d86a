// ============================================================
// Layer 3 — Frame Domain Type
// ============================================================
// A small row-major table of typed cells. The trainer builds
// one from the CSV dataset, the inference service wraps a
// single FeatureRecord into a one-row frame, and the fitted
// pipeline consumes both through the same code path.

use std::fmt;

/// One value in a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Label representation of a cell, `None` when missing.
    /// Numeric labels are rendered the way they were parsed.
    pub fn as_label(&self) -> Option<String> {
        match self {
            Cell::Number(n) => Some(n.to_string()),
            Cell::Text(s)   => Some(s.clone()),
            Cell::Missing   => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s)   => write!(f, "{s}"),
            Cell::Missing   => write!(f, "<missing>"),
        }
    }
}

/// Named columns over rows of cells. Every row has exactly
/// `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows:    Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Append a row. Short rows are padded with `Missing`,
    /// long rows are truncated, so the frame stays rectangular.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Missing);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate over every cell of one column.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Cell> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Remove a column by name. Returns false if it was absent.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        true
    }

    /// Keep only the rows for which `keep` returns true.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Build a new frame holding the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Frame {
        Frame {
            columns: self.columns.clone(),
            rows:    indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        let mut f = Frame::new(vec!["a".into(), "b".into()]);
        f.push_row(vec![Cell::Number(1.0), Cell::Text("x".into())]);
        f.push_row(vec![Cell::Number(2.0), Cell::Missing]);
        f.push_row(vec![Cell::Missing, Cell::Text("y".into())]);
        f
    }

    #[test]
    fn test_drop_column_removes_cells() {
        let mut f = sample();
        assert!(f.drop_column("a"));
        assert_eq!(f.columns(), &["b".to_string()]);
        assert!(f.rows().iter().all(|r| r.len() == 1));
        assert!(!f.drop_column("a"));
    }

    #[test]
    fn test_push_row_keeps_frame_rectangular() {
        let mut f = Frame::new(vec!["a".into(), "b".into()]);
        f.push_row(vec![Cell::Number(1.0)]);
        assert_eq!(f.rows()[0], vec![Cell::Number(1.0), Cell::Missing]);
    }

    #[test]
    fn test_retain_and_select_rows() {
        let mut f = sample();
        f.retain_rows(|row| !row[1].is_missing());
        assert_eq!(f.len(), 2);

        let picked = f.select_rows(&[1, 0]);
        assert_eq!(picked.rows()[0][1], Cell::Text("y".into()));
        assert_eq!(picked.rows()[1][1], Cell::Text("x".into()));
    }

    #[test]
    fn test_column_iterates_in_row_order() {
        let f = sample();
        let col: Vec<_> = f.column("a").unwrap().cloned().collect();
        assert_eq!(col, vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Missing]);
        assert!(f.column("zzz").is_none());
    }
}
