use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use super::error::DataError;

/// Header order used for both reading and exporting.
pub const COLUMNS: [&str; 7] = [
    "EmployeeID",
    "Name",
    "Department",
    "Salary",
    "Age",
    "JoinDate",
    "Attrition",
];

// ---------------------------------------------------------------------------
// Attrition – whether the employee has left
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attrition {
    No,
    Yes,
}

impl Attrition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attrition::No => "No",
            Attrition::Yes => "Yes",
        }
    }
}

impl fmt::Display for Attrition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attrition {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("yes") {
            Ok(Attrition::Yes)
        } else if trimmed.eq_ignore_ascii_case("no") {
            Ok(Attrition::No)
        } else {
            Err(DataError::InvalidAttrition(s.to_string()))
        }
    }
}

/// Parse an attrition cell where a blank cell means "unknown".
pub fn parse_optional_attrition(s: &str) -> Result<Option<Attrition>, DataError> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

// ---------------------------------------------------------------------------
// JoinDate parsing
// ---------------------------------------------------------------------------

/// Parse a join date, accepting plain dates, timestamps and US-style dates.
pub fn parse_join_date(s: &str) -> Result<NaiveDate, DataError> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts.date());
        }
    }
    NaiveDate::parse_from_str(s, "%m/%d/%Y").map_err(|_| DataError::InvalidDate(s.to_string()))
}

fn deserialize_join_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_join_date(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

fn deserialize_optional_attrition<'de, D>(deserializer: D) -> Result<Option<Attrition>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_optional_attrition(&raw).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Employee – one row of the source table
// ---------------------------------------------------------------------------

/// Blank `Department` and `Attrition` cells load as `None`; such rows are
/// kept but never match a department or a specific attrition value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Employee {
    #[serde(rename = "EmployeeID")]
    pub employee_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Department", default, deserialize_with = "deserialize_optional_text")]
    pub department: Option<String>,
    #[serde(rename = "Salary")]
    pub salary: f64,
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "JoinDate", deserialize_with = "deserialize_join_date")]
    pub join_date: NaiveDate,
    #[serde(rename = "Attrition", default, deserialize_with = "deserialize_optional_attrition")]
    pub attrition: Option<Attrition>,
}

// ---------------------------------------------------------------------------
// EmployeeDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with the indices the filter widgets are seeded from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeDataset {
    pub employees: Vec<Employee>,
    /// Sorted distinct departments, blanks excluded.
    pub departments: BTreeSet<String>,
    /// Sorted distinct attrition values present in the data, blanks excluded.
    pub attrition_values: BTreeSet<Attrition>,
    /// `(min, max)` age, `None` when empty.
    pub age_bounds: Option<(i64, i64)>,
    /// `(min, max)` salary, `None` when empty.
    pub salary_bounds: Option<(f64, f64)>,
}

impl EmployeeDataset {
    pub fn from_employees(employees: Vec<Employee>) -> Self {
        let mut departments = BTreeSet::new();
        let mut attrition_values = BTreeSet::new();
        let mut age_bounds: Option<(i64, i64)> = None;
        let mut salary_bounds: Option<(f64, f64)> = None;

        for emp in &employees {
            if let Some(department) = &emp.department {
                departments.insert(department.clone());
            }
            if let Some(attrition) = emp.attrition {
                attrition_values.insert(attrition);
            }
            age_bounds = Some(match age_bounds {
                Some((lo, hi)) => (lo.min(emp.age), hi.max(emp.age)),
                None => (emp.age, emp.age),
            });
            salary_bounds = Some(match salary_bounds {
                Some((lo, hi)) => (lo.min(emp.salary), hi.max(emp.salary)),
                None => (emp.salary, emp.salary),
            });
        }

        EmployeeDataset {
            employees,
            departments,
            attrition_values,
            age_bounds,
            salary_bounds,
        }
    }

    /// A new dataset holding copies of the rows at `indices`.
    #[cfg(test)]
    pub fn subset(&self, indices: &[usize]) -> Self {
        let employees = indices
            .iter()
            .filter_map(|&i| self.employees.get(i).cloned())
            .collect();
        Self::from_employees(employees)
    }

    /// Borrow the rows at `indices`, in order.
    pub fn rows<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a Employee> + 'a {
        indices.iter().filter_map(|&i| self.employees.get(i))
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn employee(
        id: &str,
        department: &str,
        salary: f64,
        age: i64,
        attrition: Attrition,
    ) -> Employee {
        Employee {
            employee_id: id.to_string(),
            name: format!("Employee {id}"),
            department: Some(department.to_string()),
            salary,
            age,
            join_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            attrition: Some(attrition),
        }
    }

    #[test]
    fn attrition_parses_case_insensitively() {
        assert_eq!("Yes".parse::<Attrition>().unwrap(), Attrition::Yes);
        assert_eq!(" no ".parse::<Attrition>().unwrap(), Attrition::No);
        assert!("maybe".parse::<Attrition>().is_err());
    }

    #[test]
    fn join_date_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 9).unwrap();
        assert_eq!(parse_join_date("2021-03-09").unwrap(), expected);
        assert_eq!(parse_join_date("2021-03-09 00:00:00").unwrap(), expected);
        assert_eq!(parse_join_date("2021-03-09T08:30:00").unwrap(), expected);
        assert_eq!(parse_join_date("03/09/2021").unwrap(), expected);
        assert!(parse_join_date("yesterday").is_err());
    }

    #[test]
    fn dataset_indices_cover_all_rows() {
        let ds = EmployeeDataset::from_employees(vec![
            employee("1", "Sales", 50_000.0, 30, Attrition::Yes),
            employee("2", "Engineering", 90_000.5, 41, Attrition::No),
            employee("3", "Sales", 42_000.0, 24, Attrition::No),
        ]);
        assert_eq!(
            ds.departments.iter().cloned().collect::<Vec<_>>(),
            vec!["Engineering".to_string(), "Sales".to_string()]
        );
        assert_eq!(ds.age_bounds, Some((24, 41)));
        assert_eq!(ds.salary_bounds, Some((42_000.0, 90_000.5)));
        assert_eq!(ds.attrition_values.len(), 2);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = EmployeeDataset::default();
        assert!(ds.is_empty());
        assert_eq!(ds.age_bounds, None);
        assert_eq!(ds.salary_bounds, None);
    }

    #[test]
    fn subset_copies_selected_rows_in_order() {
        let ds = EmployeeDataset::from_employees(vec![
            employee("1", "Sales", 50_000.0, 30, Attrition::Yes),
            employee("2", "Engineering", 90_000.0, 41, Attrition::No),
            employee("3", "Sales", 42_000.0, 24, Attrition::No),
        ]);
        let sub = ds.subset(&[2, 0]);
        let ids: Vec<&str> = sub.employees.iter().map(|e| e.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
        assert_eq!(sub.departments.len(), 1);
    }
}
