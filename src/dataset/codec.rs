//! CSV encoding for [`Dataset`].
//!
//! A column is numeric when every non-empty cell parses as `f64` and at
//! least one cell is non-empty; empty cells in numeric columns become `NaN`.

use std::io::{Read, Write};
use std::path::Path;

use super::table::{Column, Dataset};
use crate::error::{Error, Result};

/// Load a dataset from a CSV file with a header row.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| Error::io(format!("opening {}", path.display()), e))?;
    from_reader(file, path)
}

/// Parse CSV from any reader; `origin` is only used in error messages.
pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Dataset {
            path: origin.to_path_buf(),
            message: format!("Failed to read headers: {e}"),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    let mut line_num = 2; // Start after header
    for record in reader.records() {
        let record = record.map_err(|e| Error::Dataset {
            path: origin.to_path_buf(),
            message: format!("Failed to read row {line_num}: {e}"),
        })?;
        for (i, col) in cells.iter_mut().enumerate() {
            col.push(record.get(i).unwrap_or_default().to_string());
        }
        line_num += 1;
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| (name, infer_column(raw)))
        .collect();
    Dataset::new(columns).map_err(|e| Error::Dataset {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })
}

fn infer_column(raw: Vec<String>) -> Column {
    let mut values = Vec::with_capacity(raw.len());
    let mut any_value = false;
    for cell in &raw {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            values.push(f64::NAN);
            continue;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => {
                any_value = true;
                values.push(v);
            }
            Err(_) => return Column::Text(raw),
        }
    }
    if any_value {
        Column::Numeric(values)
    } else {
        Column::Text(raw)
    }
}

/// Write a dataset as CSV, replacing any existing file.
///
/// Data goes to a sibling temp file first and is renamed into place, so a
/// reader never sees a half-written dataset.
pub fn write_csv<P: AsRef<Path>>(path: P, data: &Dataset) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
    }
    let tmp = path.with_extension("csv.tmp");
    let file = std::fs::File::create(&tmp)
        .map_err(|e| Error::io(format!("creating {}", tmp.display()), e))?;
    to_writer(file, data, path)?;
    std::fs::rename(&tmp, path)
        .map_err(|e| Error::io(format!("replacing {}", path.display()), e))
}

/// Serialize CSV to any writer; `origin` is only used in error messages.
pub fn to_writer<W: Write>(writer: W, data: &Dataset, origin: &Path) -> Result<()> {
    let wrap = |e: csv::Error| Error::Dataset {
        path: origin.to_path_buf(),
        message: format!("Failed to write CSV: {e}"),
    };
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(data.column_names()).map_err(wrap)?;
    for i in 0..data.n_rows() {
        writer.write_record(data.row(i)).map_err(wrap)?;
    }
    writer
        .flush()
        .map_err(|e| Error::io(format!("flushing {}", origin.display()), e))
}
