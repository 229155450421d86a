// Small penguin table shared by unit tests. It mirrors the shape
// of the real export: a leading unnamed index column, "NA" for
// missing values, one unlabelled row and a "." sex sentinel.

use std::path::{Path, PathBuf};

/// Data rows in `PENGUINS_CSV` (including the unlabelled one).
pub const PENGUIN_ROWS: usize = 34;

/// Rows left after unlabelled rows are dropped.
pub const LABELLED_ROWS: usize = 33;

pub const PENGUINS_CSV: &str = "\
,species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex
0,Adelie,Torgersen,39.1,18.7,181,3750,Male
1,Adelie,Torgersen,39.5,17.4,186,3800,Female
2,Adelie,Torgersen,40.3,18.0,195,3250,Female
3,Adelie,Torgersen,NA,NA,NA,NA,NA
4,Adelie,Torgersen,36.7,19.3,193,3450,Female
5,Adelie,Torgersen,39.3,20.6,190,3650,Male
6,Adelie,Biscoe,37.8,18.3,174,3400,Female
7,Adelie,Biscoe,37.7,18.7,180,3600,Male
8,Adelie,Dream,39.5,16.7,178,3250,Female
9,Adelie,Dream,37.2,18.1,178,3900,Male
10,Adelie,Dream,39.5,17.8,188,3300,Female
11,Adelie,Dream,40.9,18.9,184,3900,Male
12,Chinstrap,Dream,46.5,17.9,192,3500,Female
13,Chinstrap,Dream,50.0,19.5,196,3900,Male
14,Chinstrap,Dream,51.3,19.2,193,3650,Male
15,Chinstrap,Dream,45.4,18.7,188,3525,Female
16,Chinstrap,Dream,52.7,19.8,197,3725,Male
17,Chinstrap,Dream,45.2,17.8,198,3950,Female
18,Chinstrap,Dream,46.1,18.2,178,3250,Female
19,Chinstrap,Dream,51.3,18.2,197,3750,Male
20,Chinstrap,Dream,46.0,18.9,195,4150,Female
21,Chinstrap,Dream,51.3,19.9,198,3700,Male
22,Gentoo,Biscoe,46.1,13.2,211,4500,Female
23,Gentoo,Biscoe,50.0,16.3,230,5700,Male
24,Gentoo,Biscoe,48.7,14.1,210,4450,Female
25,Gentoo,Biscoe,50.0,15.2,218,5700,Male
26,Gentoo,Biscoe,47.6,14.5,215,5400,Male
27,Gentoo,Biscoe,46.5,13.5,210,4550,Female
28,Gentoo,Biscoe,45.4,14.6,211,4800,Female
29,Gentoo,Biscoe,46.7,15.3,219,5200,Male
30,Gentoo,Biscoe,43.3,13.4,209,4400,Female
31,Gentoo,Biscoe,44.5,15.7,217,4875,.
32,Gentoo,Biscoe,46.8,15.4,215,5150,Male
33,NA,Biscoe,45.0,15.0,210,4500,Male
";

/// Write the fixture into `dir` and return its path.
pub fn write_penguins_csv(dir: &Path) -> PathBuf {
    let path = dir.join("penguins.csv");
    std::fs::write(&path, PENGUINS_CSV).unwrap();
    path
}

/// Write the fixture with one extra column set to `value` on every row.
pub fn write_penguins_csv_with_column(dir: &Path, name: &str, value: &str) -> PathBuf {
    let mut lines = PENGUINS_CSV.lines();
    let mut text  = String::new();
    if let Some(header) = lines.next() {
        text.push_str(&format!("{header},{name}\n"));
    }
    for line in lines {
        text.push_str(&format!("{line},{value}\n"));
    }

    let path = dir.join("penguins.csv");
    std::fs::write(&path, text).unwrap();
    path
}
