use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use super::model::Employee;

/// Suggested name for the exported file.
pub const DEFAULT_EXPORT_NAME: &str = "filtered_hr_data.csv";

/// Largest salary that still converts to `i64` without losing precision.
const MAX_EXACT_SALARY: f64 = 9_007_199_254_740_992.0;

/// Salary cell: integers when the whole column is integral (`98500`),
/// otherwise every value keeps its decimal point (`98500.0`, `88000.5`).
#[derive(Serialize)]
#[serde(untagged)]
enum SalaryCell {
    Whole(i64),
    Fractional(f64),
}

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "EmployeeID")]
    employee_id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Department")]
    department: Option<&'a str>,
    #[serde(rename = "Salary")]
    salary: SalaryCell,
    #[serde(rename = "Age")]
    age: i64,
    #[serde(rename = "JoinDate")]
    join_date: NaiveDate,
    #[serde(rename = "Attrition")]
    attrition: Option<&'static str>,
}

impl<'a> ExportRow<'a> {
    fn new(emp: &'a Employee, whole_salaries: bool) -> Self {
        Self {
            employee_id: &emp.employee_id,
            name: &emp.name,
            department: emp.department.as_deref(),
            salary: if whole_salaries {
                SalaryCell::Whole(emp.salary as i64)
            } else {
                SalaryCell::Fractional(emp.salary)
            },
            age: emp.age,
            join_date: emp.join_date,
            attrition: emp.attrition.map(|a| a.as_str()),
        }
    }
}

fn is_whole(salary: f64) -> bool {
    salary.fract() == 0.0 && salary.abs() <= MAX_EXACT_SALARY
}

/// Write rows as CSV with the source schema (header first, no index column).
/// Blank departments and attrition values are written as empty cells.
pub fn write_csv<'a, W, I>(sink: W, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Employee>,
{
    let rows: Vec<&Employee> = rows.into_iter().collect();
    let whole_salaries = rows.iter().all(|e| is_whole(e.salary));

    let mut writer = csv::Writer::from_writer(sink);
    for emp in &rows {
        writer
            .serialize(ExportRow::new(emp, whole_salaries))
            .context("writing CSV row")?;
    }
    if rows.is_empty() {
        // serde only emits the header alongside the first record
        writer
            .write_record(super::model::COLUMNS)
            .context("writing CSV header")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// The filtered rows as UTF-8 CSV bytes.
pub fn to_csv_bytes<'a, I>(rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a Employee>,
{
    let mut buf = Vec::new();
    write_csv(&mut buf, rows)?;
    Ok(buf)
}

pub fn export_to_path<'a, I>(path: &Path, rows: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Employee>,
{
    let bytes = to_csv_bytes(rows)?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("writing export to {}", path.display()))?;
    log::info!("Exported {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;
    use crate::data::model::Attrition;
    use crate::data::model::tests::employee;

    const HR_DATA: &str = include_str!("../../hr_data.csv");

    #[test]
    fn exporting_the_bundled_dataset_reproduces_it() {
        let ds = read_csv(HR_DATA.as_bytes()).unwrap();
        let bytes = to_csv_bytes(&ds.employees).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), HR_DATA);
    }

    #[test]
    fn integral_salaries_are_written_without_decimals() {
        let rows = vec![
            employee("E1", "Sales", 50_000.0, 30, Attrition::Yes),
            employee("E2", "Engineering", 98_500.0, 41, Attrition::No),
        ];
        let text = String::from_utf8(to_csv_bytes(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "E1,Employee E1,Sales,50000,30,2020-01-15,Yes");
        assert_eq!(lines[2], "E2,Employee E2,Engineering,98500,41,2020-01-15,No");
    }

    #[test]
    fn missing_values_export_as_empty_cells() {
        let mut row = employee("E1", "Sales", 50_000.0, 30, Attrition::Yes);
        row.attrition = None;
        row.department = None;
        let text = String::from_utf8(to_csv_bytes([&row]).unwrap()).unwrap();
        assert_eq!(text.lines().nth(1), Some("E1,Employee E1,,50000,30,2020-01-15,"));

        let reloaded = read_csv(text.as_bytes()).unwrap();
        assert_eq!(reloaded.employees, vec![row]);
    }

    #[test]
    fn exports_source_schema() {
        // One fractional salary keeps the decimal point on the whole column.
        let rows = vec![
            employee("E1", "Sales", 50_000.0, 30, Attrition::Yes),
            employee("E2", "Engineering", 88_000.5, 41, Attrition::No),
        ];
        let text = String::from_utf8(to_csv_bytes(&rows).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition")
        );
        assert_eq!(
            lines.next(),
            Some("E1,Employee E1,Sales,50000.0,30,2020-01-15,Yes")
        );
        assert_eq!(
            lines.next(),
            Some("E2,Employee E2,Engineering,88000.5,41,2020-01-15,No")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_export_still_has_header() {
        let text = String::from_utf8(to_csv_bytes(std::iter::empty()).unwrap()).unwrap();
        assert_eq!(
            text,
            "EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition\n"
        );
    }

    #[test]
    fn export_then_load_yields_same_records() {
        let rows = vec![
            employee("E1", "Sales", 50_000.0, 30, Attrition::Yes),
            employee("E2", "Engineering, R&D", 88_000.5, 41, Attrition::No),
        ];
        let bytes = to_csv_bytes(&rows).unwrap();
        let reloaded = read_csv(bytes.as_slice()).unwrap();
        assert_eq!(reloaded.employees, rows);
    }

    #[test]
    fn writes_file() {
        let path = std::env::temp_dir().join(format!(
            "hr-dashboard-export-{}.csv",
            std::process::id()
        ));
        let rows = vec![employee("E1", "Sales", 50_000.0, 30, Attrition::Yes)];
        let written = export_to_path(&path, &rows).unwrap();
        let on_disk = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(written, on_disk.len());
    }
}
