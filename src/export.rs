//! Write the raw dataset back out as delimited text.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use color_eyre::Result;
use polars::prelude::*;

use teledash_cli::CompressionFormat;

/// Default export file name for the unfiltered dataset.
pub const RAW_EXPORT_FILENAME: &str = "bank_raw.csv";

/// Options for the raw CSV export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub delimiter: u8,
    pub include_header: bool,
    pub compression: Option<CompressionFormat>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
            compression: None,
        }
    }
}

/// Write `df` to `path` as delimited text, optionally compressed.
pub fn write_csv(df: &DataFrame, path: &Path, options: &ExportOptions) -> Result<()> {
    let mut df = df.clone();
    let file = File::create(path)?;
    match options.compression {
        Some(compression) => {
            let writer: Box<dyn Write> = match compression {
                CompressionFormat::Gzip => Box::new(flate2::write::GzEncoder::new(
                    file,
                    flate2::Compression::default(),
                )),
                CompressionFormat::Zstd => Box::new(zstd::Encoder::new(file, 0)?.auto_finish()),
                CompressionFormat::Bzip2 => Box::new(bzip2::write::BzEncoder::new(
                    file,
                    bzip2::Compression::default(),
                )),
                CompressionFormat::Xz => Box::new(xz2::write::XzEncoder::new(file, 6)),
            };
            CsvWriter::new(writer)
                .with_separator(options.delimiter)
                .include_header(options.include_header)
                .finish(&mut df)?;
        }
        None => {
            CsvWriter::new(file)
                .with_separator(options.delimiter)
                .include_header(options.include_header)
                .finish(&mut df)?;
        }
    }
    Ok(())
}
