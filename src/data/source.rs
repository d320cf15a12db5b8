use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader, Sheets};
use chrono::NaiveTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataSourceError;
use super::model::{CellValue, SheetTable};

// ---------------------------------------------------------------------------
// SheetSource – anything that can hand out named raw sheets
// ---------------------------------------------------------------------------

/// A spreadsheet-like resource holding named tables.
pub trait SheetSource {
    /// Human-readable description for log lines.
    fn describe(&self) -> String;

    /// Read one sheet by exact name.
    fn read_sheet(&mut self, sheet: &str) -> Result<SheetTable, DataSourceError>;
}

/// Open a sheet source.  Dispatch by extension.
///
/// Supported layouts:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – a workbook, one worksheet per table
/// * `.json` – `{ "Teachers": [ {...}, ... ], "Courses": [...], "Transactions": [...] }`
/// * a directory – one `<Sheet>.parquet` (or `.pq`) or `<Sheet>.csv` file per table
pub fn open_source(path: &Path) -> Result<Box<dyn SheetSource>, DataSourceError> {
    if !path.exists() {
        return Err(DataSourceError::NotFound {
            path: path.to_path_buf(),
        });
    }
    if path.is_dir() {
        return Ok(Box::new(DirectorySource {
            root: path.to_path_buf(),
        }));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
            Ok(Box::new(WorkbookSource::open(path)?) as Box<dyn SheetSource>)
        }
        "json" => Ok(Box::new(JsonSource::open(path)?)),
        _ => Err(DataSourceError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Workbook source (calamine)
// ---------------------------------------------------------------------------

pub struct WorkbookSource {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookSource {
    pub fn open(path: &Path) -> Result<Self, DataSourceError> {
        let workbook = open_workbook_auto(path).map_err(|e| DataSourceError::unreadable(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }
}

impl SheetSource for WorkbookSource {
    fn describe(&self) -> String {
        format!("workbook {}", self.path.display())
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetTable, DataSourceError> {
        if !self.workbook.sheet_names().iter().any(|n| n == sheet) {
            return Err(DataSourceError::MissingSheet {
                sheet: sheet.to_string(),
            });
        }
        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|e| DataSourceError::unreadable(&self.path, e))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.iter().map(|c| c.to_string().trim().to_string()).collect(),
            None => Vec::new(),
        };

        let mut table = SheetTable::new(sheet, headers);
        for row in rows {
            table.rows.push(row.iter().map(workbook_cell).collect());
        }
        Ok(table)
    }
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => excel_datetime_cell(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Date(s.clone()),
        other => CellValue::String(other.to_string()),
    }
}

/// Date-formatted cells become ISO text; durations and out-of-range serials
/// stay numeric.
fn excel_datetime_cell(dt: &ExcelDateTime) -> CellValue {
    if !dt.is_datetime() {
        return CellValue::Float(dt.as_f64());
    }
    match dt.as_datetime() {
        Some(ts) if ts.time() == NaiveTime::MIN => CellValue::Date(ts.format("%Y-%m-%d").to_string()),
        Some(ts) => CellValue::Date(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
        None => CellValue::Float(dt.as_f64()),
    }
}

// ---------------------------------------------------------------------------
// JSON source
// ---------------------------------------------------------------------------

/// Expected JSON layout (records orientation per sheet, what
/// `df.to_json(orient='records')` writes for each table):
///
/// ```json
/// {
///   "Teachers": [ { "TeacherID": "T01", "TeacherName": "Ann", ... }, ... ],
///   "Courses": [ ... ],
///   "Transactions": [ ... ]
/// }
/// ```
pub struct JsonSource {
    path: PathBuf,
    sheets: serde_json::Map<String, JsonValue>,
}

impl JsonSource {
    pub fn open(path: &Path) -> Result<Self, DataSourceError> {
        let text = std::fs::read_to_string(path).map_err(|e| DataSourceError::unreadable(path, e))?;
        let root: JsonValue =
            serde_json::from_str(&text).map_err(|e| DataSourceError::unreadable(path, e))?;
        let JsonValue::Object(sheets) = root else {
            return Err(DataSourceError::unreadable(path, "expected a top-level JSON object"));
        };
        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }
}

impl SheetSource for JsonSource {
    fn describe(&self) -> String {
        format!("JSON document {}", self.path.display())
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetTable, DataSourceError> {
        let records = self
            .sheets
            .get(sheet)
            .ok_or_else(|| DataSourceError::MissingSheet {
                sheet: sheet.to_string(),
            })?
            .as_array()
            .ok_or_else(|| {
                DataSourceError::unreadable(&self.path, format!("sheet '{sheet}' is not an array"))
            })?;

        // Header order: first appearance across records.
        let mut headers: Vec<String> = Vec::new();
        for (i, rec) in records.iter().enumerate() {
            let obj = rec.as_object().ok_or_else(|| {
                DataSourceError::unreadable(&self.path, format!("{sheet}[{i}] is not a JSON object"))
            })?;
            for key in obj.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let mut table = SheetTable::new(sheet, headers);
        for rec in records {
            let row = table
                .headers
                .iter()
                .map(|h| rec.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect();
            table.rows.push(row);
        }
        Ok(table)
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
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
// Directory source: one CSV or Parquet file per sheet
// ---------------------------------------------------------------------------

pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    fn sheet_file(&self, sheet: &str) -> Option<PathBuf> {
        ["parquet", "pq", "csv"]
            .iter()
            .map(|ext| self.root.join(format!("{sheet}.{ext}")))
            .find(|p| p.is_file())
    }
}

impl SheetSource for DirectorySource {
    fn describe(&self) -> String {
        format!("sheet directory {}", self.root.display())
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetTable, DataSourceError> {
        let path = self.sheet_file(sheet).ok_or_else(|| DataSourceError::MissingSheet {
            sheet: sheet.to_string(),
        })?;
        log::debug!("reading sheet '{sheet}' from {}", path.display());
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => read_csv(&path, sheet),
            _ => read_parquet(&path, sheet),
        }
    }
}

// -- CSV --

fn read_csv(path: &Path, sheet: &str) -> Result<SheetTable, DataSourceError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| DataSourceError::unreadable(path, e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataSourceError::unreadable(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = SheetTable::new(sheet, headers);
    for (row_no, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| DataSourceError::unreadable(path, format!("CSV row {row_no}: {e}")))?;
        table.rows.push(record.iter().map(guess_cell_type).collect());
    }
    Ok(table)
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// -- Parquet --

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path, sheet: &str) -> Result<SheetTable, DataSourceError> {
    let file = File::open(path).map_err(|e| DataSourceError::unreadable(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| DataSourceError::unreadable(path, e))?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(|e| DataSourceError::unreadable(path, e))?;

    let mut table = SheetTable::new(sheet, headers);
    for batch_result in reader {
        let batch = batch_result.map_err(|e| DataSourceError::unreadable(path, e))?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect();
            table.rows.push(cells);
        }
    }
    Ok(table)
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => match col.as_any().downcast_ref::<StringArray>() {
            Some(s) => CellValue::String(s.value(row).to_string()),
            None => CellValue::Null,
        },
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row))),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map_or(CellValue::Null, |a| CellValue::Bool(a.value(row))),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            array_value_to_string(col.as_ref(), row).map_or(CellValue::Null, CellValue::Date)
        }
        _ => array_value_to_string(col.as_ref(), row).map_or(CellValue::Null, CellValue::String),
    }
}

/// Sheets keyed by name, for building sources in memory.
#[cfg(test)]
pub type SheetMap = std::collections::BTreeMap<String, SheetTable>;

/// An in-memory source, used when tables are already materialised.
#[cfg(test)]
pub struct MemorySource {
    pub sheets: SheetMap,
}

#[cfg(test)]
impl SheetSource for MemorySource {
    fn describe(&self) -> String {
        format!("in-memory source with {} sheets", self.sheets.len())
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetTable, DataSourceError> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| DataSourceError::MissingSheet {
                sheet: sheet.to_string(),
            })
    }
}
