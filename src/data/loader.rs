use std::io::Read;
use std::path::Path;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{Dataset, Record, ScheduleCode};

/// Columns every source table must carry.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "full_address",
    "mailing_neighborhood",
    "zip_code",
    "pwd_district",
    "recollect",
    "trashday",
    "x_coord",
    "y_coord",
];

/// Substituted for rows without a postal code.
pub const ZIP_SENTINEL: &str = "00000";

type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a trash schedule table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the columns in [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "full_address": "...", "zip_code": 2116, ... }, ...]`
/// * `.parquet` – one column per field, any type castable to text
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?),
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            load_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }?;

    log::info!(
        "Loaded {} records across {} neighborhoods from {}",
        dataset.len(),
        dataset.neighborhoods.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw rows and normalisation
// ---------------------------------------------------------------------------

/// One source row before postal-code repair and colour lookup.
#[derive(Debug, Default, Deserialize)]
pub struct RawRecord {
    pub full_address: Option<String>,
    pub mailing_neighborhood: Option<String>,
    pub zip_code: Option<String>,
    pub pwd_district: Option<String>,
    pub recollect: Option<String>,
    pub trashday: Option<String>,
    pub x_coord: Option<String>,
    pub y_coord: Option<String>,
}

impl RawRecord {
    /// `row` is the 1-based data row reported in errors.
    pub fn normalize(self, row: usize) -> Result<Record> {
        let zip_code = normalize_zip(self.zip_code.as_deref(), row)?;
        let x_coord = parse_coord(self.x_coord.as_deref(), row, "x_coord")?;
        let y_coord = parse_coord(self.y_coord.as_deref(), row, "y_coord")?;

        let trashday = self.trashday.unwrap_or_default().trim().to_string();
        let schedule = ScheduleCode::parse(&trashday);

        Ok(Record {
            full_address: self.full_address.unwrap_or_default().trim().to_string(),
            mailing_neighborhood: self
                .mailing_neighborhood
                .unwrap_or_default()
                .trim()
                .to_string(),
            zip_code,
            pwd_district: non_blank(self.pwd_district),
            recollect: non_blank(self.recollect),
            trashday,
            schedule,
            x_coord,
            y_coord,
            color: schedule.map(ScheduleCode::rgb),
        })
    }
}

/// Format a postal code as five zero-padded digits.
///
/// Blank values become [`ZIP_SENTINEL`]. Spreadsheet exports often store the
/// code as a float (`2116.0`), which is accepted when it has no fraction.
pub fn normalize_zip(value: Option<&str>, row: usize) -> Result<String> {
    let raw = value.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Ok(ZIP_SENTINEL.to_string());
    }

    let invalid = || LoadError::InvalidZip {
        row,
        value: raw.to_string(),
    };

    let number = match raw.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let f = raw.parse::<f64>().map_err(|_| invalid())?;
            if !f.is_finite() || f.fract() != 0.0 {
                return Err(invalid());
            }
            f as i64
        }
    };

    if !(0..=99_999).contains(&number) {
        return Err(invalid());
    }
    Ok(format!("{number:05}"))
}

fn parse_coord(value: Option<&str>, row: usize, column: &'static str) -> Result<f64> {
    let raw = value.map(str::trim).unwrap_or("");
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::InvalidCoordinate {
            row,
            column,
            value: raw.to_string(),
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a CSV table with a header row. Extra columns are ignored.
pub fn load_csv<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = result?;
        records.push(raw.normalize(idx + 1)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as `df.to_json(orient='records')`
/// writes it):
///
/// ```json
/// [
///   {
///     "full_address": "10 Beacon St",
///     "mailing_neighborhood": "Back Bay",
///     "zip_code": 2116,
///     "pwd_district": "1C",
///     "recollect": "FA",
///     "trashday": "MF",
///     "x_coord": -71.07,
///     "y_coord": 42.35
///   }
/// ]
/// ```
pub fn load_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root.as_array().ok_or(LoadError::NotARecordArray)?;

    let mut records = Vec::with_capacity(rows.len());
    for (idx, value) in rows.iter().enumerate() {
        let row = idx + 1;
        let obj = value.as_object().ok_or_else(|| LoadError::MalformedRow {
            row,
            reason: "not a JSON object".to_string(),
        })?;
        for column in REQUIRED_COLUMNS {
            if !obj.contains_key(column) {
                return Err(LoadError::MissingColumn(column));
            }
        }

        let raw = RawRecord {
            full_address: json_text(obj, "full_address"),
            mailing_neighborhood: json_text(obj, "mailing_neighborhood"),
            zip_code: json_text(obj, "zip_code"),
            pwd_district: json_text(obj, "pwd_district"),
            recollect: json_text(obj, "recollect"),
            trashday: json_text(obj, "trashday"),
            x_coord: json_text(obj, "x_coord"),
            y_coord: json_text(obj, "y_coord"),
        };
        records.push(raw.normalize(row)?);
    }

    Ok(Dataset::from_records(records))
}

fn json_text(obj: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match obj.get(key)? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Every column is cast to text before normalisation, so zip codes written
/// as Int64 or Float64 by Pandas/Polars are handled the same way as strings.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    // Checked on the schema: a file without row groups yields no batches.
    for column in REQUIRED_COLUMNS {
        if builder.schema().index_of(column).is_err() {
            return Err(LoadError::MissingColumn(column));
        }
    }
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for column in REQUIRED_COLUMNS {
            let array = batch
                .column_by_name(column)
                .ok_or(LoadError::MissingColumn(column))?;
            columns.push(cast(array.as_ref(), &DataType::Utf8)?);
        }
        let text: Vec<_> = columns.iter().map(|c| c.as_string::<i32>()).collect();
        let cell = |col: usize, row: usize| -> Option<String> {
            let arr = text[col];
            (!arr.is_null(row)).then(|| arr.value(row).to_string())
        };

        for row in 0..batch.num_rows() {
            let raw = RawRecord {
                full_address: cell(0, row),
                mailing_neighborhood: cell(1, row),
                zip_code: cell(2, row),
                pwd_district: cell(3, row),
                recollect: cell(4, row),
                trashday: cell(5, row),
                x_coord: cell(6, row),
                y_coord: cell(7, row),
            };
            let row_no = records.len() + 1;
            records.push(raw.normalize(row_no)?);
        }
    }

    Ok(Dataset::from_records(records))
}
