//! Load the bank telemarketing dataset into a polars `DataFrame`.
//!
//! CSV (default separator `;`, the bank dataset convention) and Excel are
//! the two parse strategies. The strategy suggested by the file extension
//! is tried first; when it fails the other is tried, and only if both fail
//! does the error propagate.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto, Data, Reader};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use log::{debug, info};
use polars::prelude::*;

use teledash_cli::{CompressionFormat, FileFormat};

/// Field separator used by the UCI bank telemarketing CSV distribution.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Options controlling how the dataset file is read.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub has_header: Option<bool>,
    pub compression: Option<CompressionFormat>,
    pub format: Option<FileFormat>,
    pub sheet: Option<String>,
    pub infer_schema_length: Option<usize>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = Some(has_header);
        self
    }

    pub fn with_compression(mut self, compression: CompressionFormat) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = Some(n);
        self
    }
}

/// Load `path`, trying the extension-suggested parse strategy first and
/// falling back to the other on failure.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let started = Instant::now();
    let primary = options
        .format
        .or_else(|| FileFormat::from_path(path))
        .unwrap_or(FileFormat::Csv);

    let df = match primary {
        FileFormat::Csv => from_csv(path, options).or_else(|csv_err| {
            debug!("CSV parse failed, trying Excel: {}", csv_err);
            from_excel(path, options.sheet.as_deref()).map_err(|excel_err| {
                eyre!(
                    "could not parse {}: CSV: {}; Excel: {}",
                    path.display(),
                    csv_err,
                    excel_err
                )
            })
        })?,
        FileFormat::Excel => from_excel(path, options.sheet.as_deref()).or_else(|excel_err| {
            debug!("Excel parse failed, trying CSV: {}", excel_err);
            from_csv(path, options).map_err(|csv_err| {
                eyre!(
                    "could not parse {}: Excel: {}; CSV: {}",
                    path.display(),
                    excel_err,
                    csv_err
                )
            })
        })?,
    };

    info!(
        "loaded {} rows x {} columns from {} in {:.3}s",
        df.height(),
        df.width(),
        path.display(),
        started.elapsed().as_secs_f64()
    );
    Ok(df)
}

/// Read a delimited text file. Gzip and zstd inputs go straight through
/// polars' own decompression; bzip2 and xz are decoded in memory first.
pub fn from_csv(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let compression = options
        .compression
        .or_else(|| CompressionFormat::from_extension(path));
    let read_options = csv_read_options(options);

    let df = match compression {
        Some(CompressionFormat::Bzip2) => {
            let file = File::open(path)?;
            let mut decoder = bzip2::read::BzDecoder::new(BufReader::new(file));
            let mut decompressed = Vec::new();
            decoder.read_to_end(&mut decompressed)?;
            CsvReader::new(Cursor::new(decompressed))
                .with_options(read_options)
                .finish()?
        }
        Some(CompressionFormat::Xz) => {
            let file = File::open(path)?;
            let mut decoder = xz2::read::XzDecoder::new(BufReader::new(file));
            let mut decompressed = Vec::new();
            decoder.read_to_end(&mut decompressed)?;
            CsvReader::new(Cursor::new(decompressed))
                .with_options(read_options)
                .finish()?
        }
        _ => read_options
            .try_into_reader_with_file_path(Some(path.into()))?
            .finish()?,
    };

    trim_column_names(df)
}

fn csv_read_options(options: &LoadOptions) -> CsvReadOptions {
    let mut read_options = CsvReadOptions::default();
    if let Some(has_header) = options.has_header {
        read_options.has_header = has_header;
    }
    if let Some(n) = options.infer_schema_length {
        read_options.infer_schema_length = Some(n);
    }
    let delimiter = options.delimiter.unwrap_or(DEFAULT_DELIMITER);
    read_options.map_parse_options(|opts| opts.with_separator(delimiter))
}

/// Strip whitespace padding from header names.
fn trim_column_names(df: DataFrame) -> Result<DataFrame> {
    let mut lf = df.lazy();
    let schema = lf.collect_schema()?;
    let names: Vec<String> = schema.iter_names().map(|s| s.to_string()).collect();
    let trimmed: Vec<String> = names.iter().map(|s| s.trim().to_string()).collect();
    if names != trimmed {
        lf = lf.rename(
            names.iter().map(|s| s.as_str()),
            trimmed.iter().map(|s| s.as_str()),
            false,
        );
    }
    Ok(lf.collect()?)
}

/// Read one worksheet of an Excel workbook (xls, xlsx, xlsm, xlsb) using
/// calamine. The sheet is selected by 0-based index or name; default is the
/// first sheet.
pub fn from_excel(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path).map_err(|e| eyre!("Excel: {}", e))?;
    let range = match sheet {
        Some(selector) => {
            if let Ok(idx) = selector.parse::<usize>() {
                workbook
                    .worksheet_range_at(idx)
                    .ok_or_else(|| eyre!("Excel: no sheet at index {}", idx))?
                    .map_err(|e| eyre!("Excel: {}", e))?
            } else {
                workbook
                    .worksheet_range(selector)
                    .map_err(|e| eyre!("Excel: {}", e))?
            }
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| eyre!("Excel: no first sheet"))?
            .map_err(|e| eyre!("Excel: {}", e))?,
    };

    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    if rows.is_empty() {
        return Err(eyre!("Excel: worksheet is empty"));
    }

    let headers: Vec<String> = rows[0]
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = calamine::DataType::as_string(cell).unwrap_or_else(|| cell.to_string());
            let name = name.trim().to_string();
            if name.is_empty() {
                format!("column_{}", i + 1)
            } else {
                name
            }
        })
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        let cells: Vec<Option<&Data>> = rows[1..].iter().map(|row| row.get(col_idx)).collect();
        columns.push(excel_column_to_series(header, &cells).into());
    }
    Ok(DataFrame::new(columns)?)
}

enum ExcelColType {
    Utf8,
    Int64,
    Float64,
    Boolean,
}

/// Infers column type: prefers Int64 for whole-number floats; any string
/// or datetime cell makes the column Utf8.
fn excel_infer_column_type(cells: &[Option<&Data>]) -> ExcelColType {
    use calamine::DataType as CalamineTrait;
    let mut has_float = false;
    let mut has_int = false;
    let mut has_bool = false;
    for cell in cells.iter().flatten() {
        if CalamineTrait::is_string(*cell)
            || CalamineTrait::is_datetime(*cell)
            || CalamineTrait::is_datetime_iso(*cell)
        {
            return ExcelColType::Utf8;
        }
        if CalamineTrait::is_float(*cell) {
            has_float = true;
        }
        if CalamineTrait::is_int(*cell) {
            has_int = true;
        }
        if CalamineTrait::is_bool(*cell) {
            has_bool = true;
        }
    }
    if has_int && !has_float {
        ExcelColType::Int64
    } else if has_float {
        let all_whole = cells.iter().flatten().all(|cell| {
            calamine::DataType::as_f64(*cell)
                .is_none_or(|f| f.is_finite() && (f - f.trunc()).abs() < 1e-10)
        });
        if all_whole {
            ExcelColType::Int64
        } else {
            ExcelColType::Float64
        }
    } else if has_bool {
        ExcelColType::Boolean
    } else {
        ExcelColType::Utf8
    }
}

fn excel_column_to_series(name: &str, cells: &[Option<&Data>]) -> Series {
    use calamine::DataType as CalamineTrait;
    match excel_infer_column_type(cells) {
        ExcelColType::Int64 => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| {
                    cell.and_then(|c| c.as_i64().or_else(|| c.as_f64().map(|f| f as i64)))
                })
                .collect();
            Series::new(name.into(), values)
        }
        ExcelColType::Float64 => {
            let values: Vec<Option<f64>> =
                cells.iter().map(|cell| cell.and_then(|c| c.as_f64())).collect();
            Series::new(name.into(), values)
        }
        ExcelColType::Boolean => {
            let values: Vec<Option<bool>> =
                cells.iter().map(|cell| cell.and_then(|c| c.get_bool())).collect();
            Series::new(name.into(), values)
        }
        ExcelColType::Utf8 => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| {
                    cell.and_then(|c| {
                        if CalamineTrait::is_empty(c) {
                            None
                        } else {
                            CalamineTrait::as_string(c).or_else(|| Some(c.to_string()))
                        }
                    })
                })
                .collect();
            Series::new(name.into(), values)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excel_int_column() {
        let cells = vec![Data::Int(25), Data::Float(31.0), Data::Int(47)];
        let refs: Vec<Option<&Data>> = cells.iter().map(Some).collect();
        let series = excel_column_to_series("age", &refs);
        assert_eq!(series.dtype(), &DataType::Int64);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn excel_mixed_column_becomes_string() {
        let cells = vec![Data::String("admin.".to_string()), Data::Int(3)];
        let refs: Vec<Option<&Data>> = cells.iter().map(Some).collect();
        let series = excel_column_to_series("job", &refs);
        assert_eq!(series.dtype(), &DataType::String);
    }

    #[test]
    fn excel_fractional_column_stays_float() {
        let cells = vec![Data::Float(1.5), Data::Float(2.0)];
        let refs: Vec<Option<&Data>> = cells.iter().map(Some).collect();
        let series = excel_column_to_series("rate", &refs);
        assert_eq!(series.dtype(), &DataType::Float64);
    }

    #[test]
    fn excel_empty_cells_become_nulls() {
        let cells = vec![Data::String("yes".to_string()), Data::Empty];
        let refs: Vec<Option<&Data>> = cells.iter().map(Some).collect();
        let series = excel_column_to_series("housing", &refs);
        assert_eq!(series.null_count(), 1);
    }
}
