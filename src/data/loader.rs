// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Loads the labelled dataset with the csv crate and decides,
// column by column, whether it is numeric or categorical.
//
// A column is numeric when every non-missing cell parses as a
// finite f64; otherwise all of its non-missing cells are kept
// as text. A column with no values at all is numeric.
//
// Missing-value tokens follow the usual dataframe conventions
// (empty, NA, NaN, null, ...). Anything else, including the
// "." some penguin exports use for sex, is a real value.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use std::{fs::File, io::Read, path::PathBuf};

use crate::domain::errors::TrainError;
use crate::domain::frame::{Cell, Frame};
use crate::domain::traits::DatasetSource;

const MISSING_TOKENS: [&str; 9] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "#N/A", "None"];

fn is_missing(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Loads a CSV file from disk.
/// Implements the DatasetSource trait from Layer 3.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for CsvLoader {
    fn load(&self) -> Result<Frame> {
        // Checked up front so the caller gets the typed condition
        // rather than a generic I/O error.
        if !self.path.is_file() {
            return Err(TrainError::DatasetNotFound(self.path.clone()).into());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open '{}'", self.path.display()))?;
        let frame = parse_csv(file)
            .with_context(|| format!("Cannot parse '{}'", self.path.display()))?;

        tracing::debug!(
            "Read {} rows x {} columns from '{}'",
            frame.len(),
            frame.columns().len(),
            self.path.display()
        );
        Ok(frame)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse CSV text into a typed frame.
pub fn parse_csv<R: Read>(reader: R) -> Result<Frame> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Cannot read CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();
    let width = headers.len();

    // ── Pass 1: raw strings, padded to the header width ───────────────────────
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record {}", line + 1))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        raw_rows.push(row);
    }

    // ── Pass 2: decide each column's type ─────────────────────────────────────
    let numeric: Vec<bool> = (0..width)
        .map(|col| {
            raw_rows
                .iter()
                .map(|row| row[col].as_str())
                .all(|v| is_missing(v) || parse_number(v).is_some())
        })
        .collect();

    // ── Pass 3: build typed cells ─────────────────────────────────────────────
    let mut frame = Frame::new(headers);
    for row in raw_rows {
        let cells = row
            .into_iter()
            .enumerate()
            .map(|(col, v)| {
                if is_missing(&v) {
                    Cell::Missing
                } else if numeric[col] {
                    parse_number(&v).map_or(Cell::Missing, Cell::Number)
                } else {
                    Cell::Text(v)
                }
            })
            .collect();
        frame.push_row(cells);
    }

    Ok(frame)
}
