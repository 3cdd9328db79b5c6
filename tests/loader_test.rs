mod common;

use std::io::Write;

use teledash::loader::{from_csv, load_table, LoadOptions};

#[test]
fn loads_semicolon_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_sample_csv(dir.path());

    let df = load_table(&path, &LoadOptions::new()).unwrap();
    assert_eq!(df.height(), 10);
    assert_eq!(df.width(), 10);
    assert!(df.column("age").unwrap().i64().is_ok());
    assert!(df.column("y").is_ok());
}

#[test]
fn loaded_table_matches_in_memory_sample() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_sample_csv(dir.path());
    let df = load_table(&path, &LoadOptions::new()).unwrap();
    assert!(df.equals(&common::sample_bank_df()));
}

#[test]
fn delimiter_can_be_overridden() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank_commas.csv");
    std::fs::write(&path, common::SAMPLE_CSV.replace(';', ",")).unwrap();

    let df = load_table(&path, &LoadOptions::new().with_delimiter(b',')).unwrap();
    assert_eq!(df.height(), 10);
    assert_eq!(df.width(), 10);
}

#[test]
fn padded_header_names_are_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("padded.csv");
    std::fs::write(&path, "age ; job \n25;admin.\n31;retired\n").unwrap();

    let df = from_csv(&path, &LoadOptions::new()).unwrap();
    assert!(df.column("age").is_ok());
    assert!(df.column("job").is_ok());
}

#[test]
fn csv_content_with_spreadsheet_extension_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.xlsx");
    std::fs::write(&path, common::SAMPLE_CSV).unwrap();

    // Excel parse fails on plain text; the CSV strategy recovers it.
    let df = load_table(&path, &LoadOptions::new()).unwrap();
    assert_eq!(df.height(), 10);
}

#[test]
fn gzip_compressed_csv_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.csv.gz");
    let file = std::fs::File::create(&path).unwrap();
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    encoder.write_all(common::SAMPLE_CSV.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let df = load_table(&path, &LoadOptions::new()).unwrap();
    assert_eq!(df.height(), 10);
    assert_eq!(df.width(), 10);
}

#[test]
fn unparseable_input_reports_both_strategies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.csv");
    std::fs::write(&path, [0x00u8, 0xff, 0xfe, 0x00, 0xff, 0xfe]).unwrap();

    let err = load_table(&path, &LoadOptions::new()).unwrap_err();
    assert!(err.to_string().contains("could not parse"));
}
