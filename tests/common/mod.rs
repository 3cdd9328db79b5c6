#![allow(dead_code)]

use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Semicolon-separated sample matching the bank telemarketing layout:
/// ten rows, six `y = no` and four `y = yes`.
pub const SAMPLE_CSV: &str = "\
age;job;marital;default;housing;loan;contact;month;day_of_week;y
25;admin.;single;no;yes;no;cellular;may;mon;no
31;technician;married;no;no;no;telephone;jun;tue;no
35;blue-collar;married;unknown;yes;yes;cellular;may;wed;no
38;admin.;divorced;no;yes;no;cellular;jul;thu;yes
40;services;married;no;no;no;telephone;aug;fri;no
45;management;single;no;yes;yes;cellular;may;mon;yes
52;retired;married;unknown;no;no;telephone;nov;tue;no
29;technician;single;no;yes;no;cellular;jun;wed;yes
33;admin.;married;no;no;yes;cellular;jul;thu;no
61;retired;divorced;no;yes;no;telephone;may;fri;yes
";

/// The same ten rows as [`SAMPLE_CSV`], built in memory.
pub fn sample_bank_df() -> DataFrame {
    df!(
        "age" => &[25i64, 31, 35, 38, 40, 45, 52, 29, 33, 61],
        "job" => &[
            "admin.", "technician", "blue-collar", "admin.", "services",
            "management", "retired", "technician", "admin.", "retired",
        ],
        "marital" => &[
            "single", "married", "married", "divorced", "married",
            "single", "married", "single", "married", "divorced",
        ],
        "default" => &["no", "no", "unknown", "no", "no", "no", "unknown", "no", "no", "no"],
        "housing" => &["yes", "no", "yes", "yes", "no", "yes", "no", "yes", "no", "yes"],
        "loan" => &["no", "no", "yes", "no", "no", "yes", "no", "no", "yes", "no"],
        "contact" => &[
            "cellular", "telephone", "cellular", "cellular", "telephone",
            "cellular", "telephone", "cellular", "cellular", "telephone",
        ],
        "month" => &["may", "jun", "may", "jul", "aug", "may", "nov", "jun", "jul", "may"],
        "day_of_week" => &["mon", "tue", "wed", "thu", "fri", "mon", "tue", "wed", "thu", "fri"],
        "y" => &["no", "no", "no", "yes", "no", "yes", "no", "yes", "no", "yes"]
    )
    .expect("sample frame")
}

/// Write [`SAMPLE_CSV`] into `dir` and return its path.
pub fn write_sample_csv(dir: &Path) -> PathBuf {
    let path = dir.join("bank.csv");
    fs::write(&path, SAMPLE_CSV).expect("write sample csv");
    path
}
