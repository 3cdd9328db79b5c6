//! Shared CLI definitions for teledash.
//!
//! Used by the main application and by the build script (manpage).

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Compression format for data files
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Gzip compression (.gz)
    Gzip,
    /// Zstandard compression (.zst)
    Zstd,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// XZ compression (.xz)
    Xz,
}

impl CompressionFormat {
    /// Detect compression from the file extension. Returns None when the
    /// extension is missing or not a known compressed format.
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => match ext.to_lowercase().as_str() {
                "gz" | "gzip" => Some(Self::Gzip),
                "zst" | "zstd" => Some(Self::Zstd),
                "bz2" | "bzip2" => Some(Self::Bzip2),
                "xz" => Some(Self::Xz),
                _ => None,
            },
            None => None,
        }
    }
}

/// File format for the input dataset (used to bypass extension-based
/// detection). When `--format` is not specified, format is auto-detected
/// from the file extension and unknown extensions are treated as CSV.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimited text (default separator `;`, the bank dataset convention)
    Csv,
    /// Excel (.xls, .xlsx, .xlsm, .xlsb)
    Excel,
}

impl FileFormat {
    /// Detect file format from path extension, looking through a trailing
    /// compression extension (e.g. `bank.csv.gz` is CSV).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = if CompressionFormat::from_extension(path).is_some() {
            path.file_stem()
                .map(Path::new)
                .and_then(|stem| stem.extension())
                .and_then(|e| e.to_str())
        } else {
            path.extension().and_then(|e| e.to_str())
        };
        ext.and_then(Self::from_extension)
    }

    /// Parse format from an extension string (e.g. "csv", "xlsx").
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" | "tsv" | "psv" | "txt" => Some(Self::Csv),
            "xls" | "xlsx" | "xlsm" | "xlsb" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Output format for the comparison chart
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ChartFormat {
    /// PNG bitmap (plotters)
    Png,
    /// Encapsulated PostScript
    Eps,
}

impl ChartFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Eps => "eps",
        }
    }

    /// Detect chart format from a path extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => Some(Self::Png),
            Some(ext) if ext.eq_ignore_ascii_case("eps") => Some(Self::Eps),
            _ => None,
        }
    }
}

/// Command-line arguments for teledash
#[derive(Parser, Debug)]
#[command(version, about = "teledash - bank telemarketing campaign analysis")]
pub struct Args {
    /// Path to the bank telemarketing dataset (CSV or Excel)
    pub path: Option<PathBuf>,

    /// Field delimiter byte for CSV input (default `;`)
    #[arg(long = "delimiter")]
    pub delimiter: Option<u8>,

    /// Specify that the file has no header row
    #[arg(long = "no-header", action)]
    pub no_header: bool,

    /// Excel worksheet to read, by name or 0-based index
    #[arg(long = "sheet")]
    pub sheet: Option<String>,

    /// Specify the input format explicitly (csv, excel)
    /// If not specified, format is auto-detected from the file extension.
    #[arg(long = "format", value_enum)]
    pub format: Option<FileFormat>,

    /// Specify the compression format explicitly (gzip, zstd, bzip2, xz)
    /// If not specified, compression is auto-detected from the file extension.
    #[arg(long = "compression", value_enum)]
    pub compression: Option<CompressionFormat>,

    /// Inclusive age range, e.g. 30:40
    #[arg(long = "ages", value_name = "MIN:MAX")]
    pub ages: Option<String>,

    /// Allowed job values, comma separated ("all" for no restriction)
    #[arg(long = "job", value_name = "VALUES", default_value = "all")]
    pub job: String,

    /// Allowed marital-status values, comma separated
    #[arg(long = "marital", value_name = "VALUES", default_value = "all")]
    pub marital: String,

    /// Allowed credit-default values, comma separated
    #[arg(long = "default", value_name = "VALUES", default_value = "all")]
    pub default_flag: String,

    /// Allowed housing-loan values, comma separated
    #[arg(long = "housing", value_name = "VALUES", default_value = "all")]
    pub housing: String,

    /// Allowed personal-loan values, comma separated
    #[arg(long = "loan", value_name = "VALUES", default_value = "all")]
    pub loan: String,

    /// Allowed contact-method values, comma separated
    #[arg(long = "contact", value_name = "VALUES", default_value = "all")]
    pub contact: String,

    /// Allowed contact-month values, comma separated
    #[arg(long = "month", value_name = "VALUES", default_value = "all")]
    pub month: String,

    /// Allowed day-of-week values, comma separated
    #[arg(long = "day-of-week", value_name = "VALUES", default_value = "all")]
    pub day_of_week: String,

    /// Target column whose distribution is compared
    #[arg(long = "target")]
    pub target: Option<String>,

    /// Write the unfiltered dataset to a CSV file (default: bank_raw.csv)
    #[arg(
        long = "export-raw",
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "bank_raw.csv"
    )]
    pub export_raw: Option<PathBuf>,

    /// Render the raw/filtered comparison chart to this path
    #[arg(long = "chart", value_name = "PATH")]
    pub chart: Option<PathBuf>,

    /// Chart output format (png, eps)
    /// If not specified, format is auto-detected from the chart path extension.
    #[arg(long = "chart-format", value_enum)]
    pub chart_format: Option<ChartFormat>,

    /// Apply a saved filter template by name
    #[arg(long = "template")]
    pub template: Option<String>,

    /// Save the filters given on the command line under this template name
    #[arg(long = "save-template", value_name = "NAME")]
    pub save_template: Option<String>,

    /// List saved filter templates and exit
    #[arg(long = "list-templates", action)]
    pub list_templates: bool,

    /// Remove all filter templates and exit
    #[arg(long = "remove-templates", action)]
    pub remove_templates: bool,

    /// Write a default config file and exit
    #[arg(long = "init-config", action)]
    pub init_config: bool,

    /// Overwrite an existing config file (with --init-config)
    #[arg(long = "force", action)]
    pub force: bool,

    /// Enable debug logging
    #[arg(long = "debug", action)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_from_extension() {
        assert_eq!(
            CompressionFormat::from_extension(Path::new("bank.csv.gz")),
            Some(CompressionFormat::Gzip)
        );
        assert_eq!(
            CompressionFormat::from_extension(Path::new("bank.csv.zst")),
            Some(CompressionFormat::Zstd)
        );
        assert_eq!(
            CompressionFormat::from_extension(Path::new("bank.csv.bz2")),
            Some(CompressionFormat::Bzip2)
        );
        assert_eq!(
            CompressionFormat::from_extension(Path::new("bank.csv.xz")),
            Some(CompressionFormat::Xz)
        );
        assert_eq!(CompressionFormat::from_extension(Path::new("bank.csv")), None);
    }

    #[test]
    fn file_format_detection() {
        assert_eq!(
            FileFormat::from_path(Path::new("bank.csv")),
            Some(FileFormat::Csv)
        );
        assert_eq!(
            FileFormat::from_path(Path::new("bank.xlsx")),
            Some(FileFormat::Excel)
        );
        assert_eq!(FileFormat::from_path(Path::new("bank")), None);
    }

    #[test]
    fn file_format_sees_through_compression() {
        assert_eq!(
            FileFormat::from_path(Path::new("bank.csv.gz")),
            Some(FileFormat::Csv)
        );
        assert_eq!(
            FileFormat::from_path(Path::new("bank.csv.xz")),
            Some(FileFormat::Csv)
        );
    }

    #[test]
    fn chart_format_from_path() {
        assert_eq!(
            ChartFormat::from_path(Path::new("out.png")),
            Some(ChartFormat::Png)
        );
        assert_eq!(
            ChartFormat::from_path(Path::new("out.EPS")),
            Some(ChartFormat::Eps)
        );
        assert_eq!(ChartFormat::from_path(Path::new("out.svg")), None);
    }
}
