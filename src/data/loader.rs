use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use calamine::{Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::citations::parse_citation_history;
use super::model::{
    AuthorSet, CellValue, CitationHistory, LoadOutcome, Notice, PublicationSet, Table,
    AUTHOR_COLUMNS, PUBLICATION_COLUMNS,
};

const CITATION_HISTORY_COLUMN: &str = "Citations Per Year";

/// Everything that can go wrong while reading a dataset file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("{0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("{0}")]
    Workbook(#[from] calamine::Error),

    #[error("{0}")]
    Format(String),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the publications table.
///
/// Never fails: a read error becomes a single error notice and an empty set.
/// Absent required columns are added and filled with the placeholder.
pub fn load_publications(path: &Path) -> LoadOutcome<PublicationSet> {
    let mut table = match read_table(path) {
        Ok(table) => table,
        Err(e) => return failed(path, e),
    };

    let added = table.ensure_columns(&PUBLICATION_COLUMNS);
    if !added.is_empty() {
        log::info!("{}: filled missing columns {added:?}", path.display());
    }

    log::info!("Loaded {} publications from {}", table.len(), path.display());
    LoadOutcome {
        data: PublicationSet::from_table(table),
        notices: Vec::new(),
    }
}

/// Load the author table and normalize its citation histories.
///
/// Same contract as [`load_publications`]. A malformed history never aborts the
/// load; it is kept as [`CitationHistory::Malformed`] and reported once.
pub fn load_authors(path: &Path) -> LoadOutcome<AuthorSet> {
    let mut table = match read_table(path) {
        Ok(table) => table,
        Err(e) => return failed(path, e),
    };

    let mut notices = Vec::new();
    let had_history_column = table.column_index(CITATION_HISTORY_COLUMN).is_some();

    let added = table.ensure_columns(&AUTHOR_COLUMNS);
    if !added.is_empty() {
        log::info!("{}: filled missing columns {added:?}", path.display());
    }

    let histories: Vec<CitationHistory> = (0..table.len())
        .map(|row| {
            table
                .cell(row, CITATION_HISTORY_COLUMN)
                .map(normalize_citation_history)
                .unwrap_or(CitationHistory::Missing)
        })
        .collect();

    if had_history_column {
        if let Some(notice) = citation_history_warning(&histories) {
            log::warn!("{}: {}", path.display(), notice.message);
            notices.push(notice);
        }
    }

    log::info!("Loaded {} authors from {}", table.len(), path.display());
    LoadOutcome {
        data: AuthorSet::from_table(table, histories),
        notices,
    }
}

/// Interpret one `Citations Per Year` cell.
pub fn normalize_citation_history(cell: &CellValue) -> CitationHistory {
    if cell.is_missing() {
        return CitationHistory::Missing;
    }
    let raw = cell.to_string();
    match parse_citation_history(&raw) {
        Ok(map) => CitationHistory::Parsed(map),
        Err(error) => CitationHistory::Malformed { raw, error },
    }
}

/// A single warning when the first history is not a mapping or any history is malformed.
fn citation_history_warning(histories: &[CitationHistory]) -> Option<Notice> {
    let first_not_mapping = histories
        .first()
        .is_some_and(|h| h.as_mapping().is_none());

    let mut malformed = histories.iter().enumerate().filter_map(|(row, h)| match h {
        CitationHistory::Malformed { error, .. } => Some((row, error)),
        _ => None,
    });
    let first_malformed = malformed.next();
    let n_malformed = first_malformed.map_or(0, |_| 1 + malformed.count());

    if !first_not_mapping && n_malformed == 0 {
        return None;
    }

    let detail = match first_malformed {
        Some((row, error)) => format!(
            " ({n_malformed} of {} rows unreadable; row {}: {error})",
            histories.len(),
            row + 1
        ),
        None => " (the first row has no citation history)".to_string(),
    };
    Some(Notice::warning(format!(
        "Citations Per Year data format may not be correct. Please check the Excel file.{detail}"
    )))
}

fn failed<T: Default>(path: &Path, err: LoadError) -> LoadOutcome<T> {
    let name = display_name(path);
    let message = match &err {
        LoadError::NotFound(_) => {
            format!("Error: '{name}' not found. Please place the file in the same folder.")
        }
        other => format!("Error loading '{name}': {other}"),
    };
    log::error!("{message}");
    LoadOutcome {
        data: T::default(),
        notices: vec![Notice::error(message)],
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, cell types inferred
/// * `.json`    – `[{ "Title": ..., "Year": ... }, ...]`
/// * `.parquet` – flat columns of strings, numbers and booleans
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, header row first
pub fn read_table(path: &Path) -> Result<Table, LoadError> {
    if let Err(e) = std::fs::metadata(path) {
        return Err(match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
            _ => LoadError::Io(e),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut table = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };
    table.pad_rows();
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns = header_names(reader.headers()?.iter().map(str::to_string));

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(CellValue::infer).collect());
    }
    Ok(Table::new(columns, rows))
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Title": "...", "Year": 2019, "Citations": 12 },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<Table, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Format("expected a top-level JSON array".into()))?;

    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Format(format!("row {i} is not a JSON object")))?;

        let mut row = vec![CellValue::Null; columns.len()];
        for (key, val) in obj {
            let col = *index.entry(key.clone()).or_insert_with(|| {
                columns.push(key.clone());
                columns.len() - 1
            });
            if col >= row.len() {
                row.resize(col + 1, CellValue::Null);
            }
            row[col] = json_to_cell(val);
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.is_empty() => CellValue::Null,
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<Table, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
    }

    Ok(Table::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue, LoadError> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(CellValue::Integer)
                .unwrap_or(CellValue::Float(v as f64))
        }
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row).into())
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        // Dates, dictionaries, lists: keep their printed form.
        _ => CellValue::String(array_value_to_string(col, row)?),
    };
    Ok(cell)
}

// ---------------------------------------------------------------------------
// Workbook reader
// ---------------------------------------------------------------------------

fn read_workbook(path: &Path) -> Result<Table, LoadError> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Format("workbook has no worksheets".into()))??;

    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        return Ok(Table::default());
    };
    let columns = header_names(header.iter().map(|d| d.to_string()));

    let rows = sheet_rows
        .map(|r| r.iter().map(workbook_cell).collect::<Vec<_>>())
        .filter(|r| r.iter().any(|c| *c != CellValue::Null))
        .collect();

    Ok(Table::new(columns, rows))
}

fn workbook_cell(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty | Data::Error(_) => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

/// Trim header names and label blank ones the way pandas does.
fn header_names(raw: impl Iterator<Item = String>) -> Vec<String> {
    raw.enumerate()
        .map(|(i, h)| {
            let h = h.trim();
            if h.is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.to_string()
            }
        })
        .collect()
}
