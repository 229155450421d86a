// ============================================================
// Layer 3 — FeatureRecord Domain Type
// ============================================================
// One penguin observation as sent by the UI client.
//
// Every field must be present as a JSON key, but any value may
// be null: the fitted pipeline imputes missing numbers with the
// training mean and missing categories with "missing".
// `deserialize_with = "Option::deserialize"` is what makes an
// absent key an error while still accepting an explicit null.

use serde::{Deserialize, Serialize};

use crate::domain::frame::{Cell, Frame};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(deserialize_with = "Option::deserialize")]
    pub bill_length_mm: Option<f64>,

    #[serde(deserialize_with = "Option::deserialize")]
    pub bill_depth_mm: Option<f64>,

    #[serde(deserialize_with = "Option::deserialize")]
    pub flipper_length_mm: Option<f64>,

    #[serde(deserialize_with = "Option::deserialize")]
    pub body_mass_g: Option<f64>,

    /// Torgersen, Biscoe, Dream at training time; anything else
    /// encodes to all zeros.
    #[serde(deserialize_with = "Option::deserialize")]
    pub island: Option<String>,

    /// Male, Female, or whatever sentinel the dataset used.
    #[serde(deserialize_with = "Option::deserialize")]
    pub sex: Option<String>,
}

impl FeatureRecord {
    /// Column names, in the order the record is laid out as a frame.
    pub const COLUMNS: [&'static str; 6] = [
        "bill_length_mm",
        "bill_depth_mm",
        "flipper_length_mm",
        "body_mass_g",
        "island",
        "sex",
    ];

    /// Wrap this record as a one-row frame.
    pub fn to_frame(&self) -> Frame {
        let number = |v: Option<f64>| v.map_or(Cell::Missing, Cell::Number);
        let text   = |v: &Option<String>| v.clone().map_or(Cell::Missing, Cell::Text);

        let mut frame = Frame::new(Self::COLUMNS.iter().map(|c| c.to_string()).collect());
        frame.push_row(vec![
            number(self.bill_length_mm),
            number(self.bill_depth_mm),
            number(self.flipper_length_mm),
            number(self.body_mass_g),
            text(&self.island),
            text(&self.sex),
        ]);
        frame
    }
}
