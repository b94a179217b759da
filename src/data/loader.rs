use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{COLUMNS, Employee, EmployeeDataset, parse_join_date, parse_optional_attrition};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an employee table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header `EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition`
/// * `.json`    – `[{ "EmployeeID": ..., "Name": ..., ... }, ...]`
/// * `.parquet` – same column names, any castable column types
pub fn load_file(path: &Path) -> Result<EmployeeDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    };
    dataset.with_context(|| format!("loading {}", path.display()))
}

/// Like [`load_file`] but goes through the process-wide cache, and never
/// fails: an unreadable file yields an empty dataset plus the message to show.
pub fn load_or_empty(cache: &DatasetCache, path: &Path) -> (Arc<EmployeeDataset>, Option<String>) {
    match cache.get_or_load(path) {
        Ok(dataset) => (dataset, None),
        Err(e) => {
            log::error!("Could not load {}: {e:#}", path.display());
            (
                Arc::new(EmployeeDataset::default()),
                Some(format!("Could not load CSV: {e:#}")),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Load cache
// ---------------------------------------------------------------------------

/// Memoized reads keyed by path.  Entries live until the process exits and
/// only successful loads are stored.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, Arc<EmployeeDataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by the whole application.
    pub fn global() -> &'static DatasetCache {
        static CACHE: OnceLock<DatasetCache> = OnceLock::new();
        CACHE.get_or_init(DatasetCache::new)
    }

    pub fn get_or_load(&self, path: &Path) -> Result<Arc<EmployeeDataset>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(dataset) = entries.get(path) {
            log::debug!("Cache hit for {}", path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_file(path)?);
        log::info!(
            "Loaded {} employees from {}",
            dataset.len(),
            path.display()
        );
        entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a CSV table from any reader (file on disk or an uploaded file).
/// Column order is irrelevant and extra columns are ignored.
pub fn read_csv<R: Read>(source: R) -> Result<EmployeeDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for column in COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn(column).into());
        }
    }

    let mut employees = Vec::new();
    for (i, result) in reader.deserialize::<Employee>().enumerate() {
        let employee = result.with_context(|| format!("CSV data row {}", i + 1))?;
        employees.push(employee);
    }

    Ok(EmployeeDataset::from_employees(employees))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "EmployeeID": "E001", "Name": "Ada", "Department": "Sales",
///     "Salary": 52000, "Age": 31, "JoinDate": "2019-04-01", "Attrition": "No" },
///   ...
/// ]
/// ```
///
/// Numeric `EmployeeID`s are accepted and kept as text.
pub fn read_json(text: &str) -> Result<EmployeeDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = match root {
        JsonValue::Array(records) => records,
        _ => bail!("Expected top-level JSON array"),
    };

    let mut employees = Vec::with_capacity(records.len());
    for (i, mut rec) in records.into_iter().enumerate() {
        let obj = rec
            .as_object_mut()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let numeric_id = match obj.get("EmployeeID") {
            Some(JsonValue::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        if let Some(id) = numeric_id {
            obj.insert("EmployeeID".to_string(), JsonValue::String(id));
        }
        let employee: Employee =
            serde_json::from_value(rec).with_context(|| format!("JSON row {i}"))?;
        employees.push(employee);
    }

    Ok(EmployeeDataset::from_employees(employees))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// Each column is cast to the record's type: text for ids, names,
/// departments and attrition; `Float64` for salary; `Int64` for age;
/// `Date32` for the join date (text dates go through the CSV date parser).
fn load_parquet(path: &Path) -> Result<EmployeeDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut employees = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = employees.len();
        read_batch(&batch, offset, &mut employees)?;
    }

    Ok(EmployeeDataset::from_employees(employees))
}

fn read_batch(batch: &RecordBatch, offset: usize, out: &mut Vec<Employee>) -> Result<()> {
    let ids = column_as(batch, "EmployeeID", &DataType::Utf8)?;
    let names = column_as(batch, "Name", &DataType::Utf8)?;
    let departments = column_as(batch, "Department", &DataType::Utf8)?;
    let salaries = column_as(batch, "Salary", &DataType::Float64)?;
    let ages = column_as(batch, "Age", &DataType::Int64)?;
    let attrition = column_as(batch, "Attrition", &DataType::Utf8)?;
    let join_dates = raw_column(batch, "JoinDate")?;
    let join_dates = match join_dates.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => cast(join_dates.as_ref(), &DataType::Utf8)?,
        _ => cast(join_dates.as_ref(), &DataType::Date32).context("casting 'JoinDate'")?,
    };

    let ids = ids.as_string::<i32>();
    let names = names.as_string::<i32>();
    let departments = departments.as_string::<i32>();
    let salaries = salaries.as_primitive::<Float64Type>();
    let ages = ages.as_primitive::<Int64Type>();
    let attrition = attrition.as_string::<i32>();

    for row in 0..batch.num_rows() {
        let row_no = offset + row;
        ensure_present(ids, row, row_no, "EmployeeID")?;
        ensure_present(names, row, row_no, "Name")?;
        ensure_present(salaries, row, row_no, "Salary")?;
        ensure_present(ages, row, row_no, "Age")?;
        ensure_present(join_dates.as_ref(), row, row_no, "JoinDate")?;

        let join_date = match join_dates.data_type() {
            DataType::Date32 => join_dates
                .as_primitive::<Date32Type>()
                .value_as_date(row)
                .ok_or(DataError::NullCell { row: row_no, column: "JoinDate" })?,
            _ => parse_join_date(join_dates.as_string::<i32>().value(row))?,
        };

        out.push(Employee {
            employee_id: ids.value(row).to_string(),
            name: names.value(row).to_string(),
            department: optional_text(departments, row),
            salary: salaries.value(row),
            age: ages.value(row),
            join_date,
            attrition: match optional_text(attrition, row) {
                Some(value) => {
                    parse_optional_attrition(&value).with_context(|| format!("Row {row_no}"))?
                }
                None => None,
            },
        });
    }
    Ok(())
}

// -- Arrow helpers --

fn ensure_present(arr: &dyn Array, row: usize, row_no: usize, column: &'static str) -> Result<()> {
    if arr.is_null(row) {
        bail!(DataError::NullCell { row: row_no, column });
    }
    Ok(())
}

/// Null and blank cells both read as `None`.
fn optional_text(arr: &StringArray, row: usize) -> Option<String> {
    if arr.is_null(row) {
        return None;
    }
    let value = arr.value(row);
    (!value.trim().is_empty()).then(|| value.to_string())
}

fn raw_column(batch: &RecordBatch, name: &'static str) -> Result<ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DataError::MissingColumn(name))?;
    Ok(Arc::clone(batch.column(idx)))
}

fn column_as(batch: &RecordBatch, name: &'static str, to: &DataType) -> Result<ArrayRef> {
    let col = raw_column(batch, name)?;
    cast(col.as_ref(), to).with_context(|| format!("casting '{name}' to {to:?}"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use arrow::array::{Date32Array, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use chrono::NaiveDate;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::Attrition;

    const SAMPLE: &str = "\
EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition
E001,Ada Byron,Engineering,95000,36,2018-07-02,No
E002,Grace Hopper,Sales,50000,30,2020-01-15,Yes
E003,Alan Turing,Engineering,88000.5,41,2016-11-30 00:00:00,No
";

    fn temp_path(ext: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "hr-dashboard-loader-{}-{n}.{ext}",
            std::process::id()
        ))
    }

    #[test]
    fn reads_csv_rows() {
        let ds = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        let ada = &ds.employees[0];
        assert_eq!(ada.employee_id, "E001");
        assert_eq!(ada.department.as_deref(), Some("Engineering"));
        assert_eq!(ada.salary, 95_000.0);
        assert_eq!(ada.age, 36);
        assert_eq!(ada.join_date, NaiveDate::from_ymd_opt(2018, 7, 2).unwrap());
        assert_eq!(ds.employees[1].attrition, Some(Attrition::Yes));
        assert_eq!(
            ds.employees[2].join_date,
            NaiveDate::from_ymd_opt(2016, 11, 30).unwrap()
        );
    }

    #[test]
    fn column_order_and_extra_columns_do_not_matter() {
        let csv = "\
Attrition,Age,Team,Salary,Department,Name,EmployeeID,JoinDate
No,29,Blue,61000,Marketing,Linus,7,2022-05-01
";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.employees[0].employee_id, "7");
        assert_eq!(ds.employees[0].department.as_deref(), Some("Marketing"));
    }

    #[test]
    fn header_only_csv_is_empty_dataset() {
        let ds = read_csv("EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition\n".as_bytes())
            .unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_csv("EmployeeID,Name,Department,Salary,Age,JoinDate\n".as_bytes())
            .unwrap_err();
        assert!(format!("{err:#}").contains("Attrition"));
    }

    #[test]
    fn malformed_values_name_the_row() {
        let csv = "\
EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition
E001,Ada,Engineering,lots,36,2018-07-02,No
";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV data row 1"));

        let csv = "\
EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition
E001,Ada,Engineering,1000,36,2018-07-02,Maybe
";
        assert!(read_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn blank_department_and_attrition_cells_load_as_missing() {
        let csv = "\
EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition
E001,Ada,Engineering,95000,36,2018-07-02,
E002,Grace,,50000,30,2020-01-15,Yes
E003,Alan,Sales,61000,41,2016-11-30,No
";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.employees[0].attrition, None);
        assert_eq!(ds.employees[1].department, None);
        assert_eq!(
            ds.departments.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Engineering", "Sales"]
        );
        assert_eq!(
            ds.attrition_values.iter().copied().collect::<Vec<_>>(),
            vec![Attrition::No, Attrition::Yes]
        );
    }

    #[test]
    fn reads_json_records_with_numeric_ids() {
        let json = r#"[
            {"EmployeeID": 101, "Name": "Ada", "Department": "Engineering",
             "Salary": 95000, "Age": 36, "JoinDate": "2018-07-02", "Attrition": "No"},
            {"EmployeeID": "E2", "Name": "Grace", "Department": "Sales",
             "Salary": 50000.0, "Age": 30, "JoinDate": "2020-01-15", "Attrition": "yes"}
        ]"#;
        let ds = read_json(json).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.employees[0].employee_id, "101");
        assert_eq!(ds.employees[1].attrition, Some(Attrition::Yes));
        assert!(read_json("{}").is_err());

        let json = r#"[
            {"EmployeeID": "E3", "Name": "Alan", "Department": null,
             "Salary": 61000, "Age": 41, "JoinDate": "2016-11-30"}
        ]"#;
        let ds = read_json(json).unwrap();
        assert_eq!(ds.employees[0].department, None);
        assert_eq!(ds.employees[0].attrition, None);
    }

    #[test]
    fn unsupported_extension_fails() {
        let err = load_file(Path::new("staff.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported file extension"));
    }

    #[test]
    fn reads_parquet_with_casts() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("EmployeeID", DataType::Int64, false),
            Field::new("Name", DataType::Utf8, false),
            Field::new("Department", DataType::Utf8, false),
            Field::new("Salary", DataType::Int64, false),
            Field::new("Age", DataType::Int64, false),
            Field::new("JoinDate", DataType::Date32, false),
            Field::new("Attrition", DataType::Utf8, false),
        ]));
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let joined = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
        let days = (joined - epoch).num_days() as i32;
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(StringArray::from(vec!["Ada", "Grace"])),
                Arc::new(StringArray::from(vec!["Engineering", "Sales"])),
                Arc::new(Int64Array::from(vec![95_000, 50_000])),
                Arc::new(Int64Array::from(vec![36, 30])),
                Arc::new(Date32Array::from(vec![days, days])),
                Arc::new(StringArray::from(vec!["No", "Yes"])),
            ],
        )
        .unwrap();

        let path = temp_path("parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.employees[0].employee_id, "1");
        assert_eq!(ds.employees[1].salary, 50_000.0);
        assert_eq!(ds.employees[1].join_date, joined);
        assert_eq!(ds.employees[1].attrition, Some(Attrition::Yes));
    }

    #[test]
    fn parquet_nulls_in_department_and_attrition_are_missing() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("EmployeeID", DataType::Utf8, false),
            Field::new("Name", DataType::Utf8, false),
            Field::new("Department", DataType::Utf8, true),
            Field::new("Salary", DataType::Float64, false),
            Field::new("Age", DataType::Int64, false),
            Field::new("JoinDate", DataType::Utf8, false),
            Field::new("Attrition", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["E1", "E2"])),
                Arc::new(StringArray::from(vec!["Ada", "Grace"])),
                Arc::new(StringArray::from(vec![None, Some("Sales")])),
                Arc::new(arrow::array::Float64Array::from(vec![95_000.0, 50_000.0])),
                Arc::new(Int64Array::from(vec![36, 30])),
                Arc::new(StringArray::from(vec!["2018-07-02", "2020-01-15"])),
                Arc::new(StringArray::from(vec![Some("No"), Some("")])),
            ],
        )
        .unwrap();

        let path = temp_path("parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.employees[0].department, None);
        assert_eq!(ds.employees[0].attrition, Some(Attrition::No));
        assert_eq!(ds.employees[1].attrition, None);
        assert_eq!(ds.departments.len(), 1);
    }

    #[test]
    fn cache_keeps_first_successful_load() {
        let path = temp_path("csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let cache = DatasetCache::new();
        let first = cache.get_or_load(&path).unwrap();
        assert_eq!(first.len(), 3);

        std::fs::write(
            &path,
            "EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition\n",
        )
        .unwrap();
        let second = cache.get_or_load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_load_is_not_cached_and_yields_empty_dataset() {
        let path = temp_path("csv");
        let cache = DatasetCache::new();

        let (dataset, message) = load_or_empty(&cache, &path);
        assert!(dataset.is_empty());
        let message = message.unwrap();
        assert!(message.starts_with("Could not load CSV:"));
        assert_eq!(cache.len(), 0);

        std::fs::write(&path, SAMPLE).unwrap();
        let (dataset, message) = load_or_empty(&cache, &path);
        std::fs::remove_file(&path).ok();
        assert_eq!(dataset.len(), 3);
        assert!(message.is_none());
    }
}
