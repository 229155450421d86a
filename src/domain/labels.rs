// ============================================================
// Layer 3 — Class Names
// ============================================================
// Labels are factorized into 0..K-1 in first-seen order. The
// ordered name sequence is persisted next to the fitted model;
// an index is only ever reported together with its name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered species names, index-aligned with classifier outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Assign every distinct label a code in first-seen order.
    ///
    /// Returns the code for each input label plus the name table.
    pub fn factorize<I, S>(labels: I) -> (Vec<usize>, ClassNames)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String>           = Vec::new();
        let mut seen:  HashMap<String, usize> = HashMap::new();
        let mut codes = Vec::new();

        for label in labels {
            let label = label.as_ref();
            let code  = match seen.get(label) {
                Some(&code) => code,
                None => {
                    let code = names.len();
                    names.push(label.to_string());
                    seen.insert(label.to_string(), code);
                    code
                }
            };
            codes.push(code);
        }

        (codes, ClassNames::new(names))
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
