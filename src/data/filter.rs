use std::collections::BTreeSet;
use std::fmt;

use super::model::{Attrition, Employee, EmployeeDataset};

// ---------------------------------------------------------------------------
// Filter criteria: one constraint per sidebar widget
// ---------------------------------------------------------------------------

/// The attrition selector: either every value or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttritionFilter {
    #[default]
    All,
    Only(Attrition),
}

impl AttritionFilter {
    /// A missing attrition value only passes `All`.
    pub fn matches(&self, value: Option<Attrition>) -> bool {
        match self {
            AttritionFilter::All => true,
            AttritionFilter::Only(selected) => value == Some(*selected),
        }
    }

    /// Selector options for a dataset: "All" followed by the values present.
    pub fn options(dataset: &EmployeeDataset) -> Vec<AttritionFilter> {
        std::iter::once(AttritionFilter::All)
            .chain(dataset.attrition_values.iter().copied().map(AttritionFilter::Only))
            .collect()
    }
}

impl fmt::Display for AttritionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttritionFilter::All => f.write_str("All"),
            AttritionFilter::Only(a) => write!(f, "{a}"),
        }
    }
}

/// All active constraints.  Rows must satisfy every one of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// Selected departments.  An empty set matches nothing, and rows with
    /// no department never match.
    pub departments: BTreeSet<String>,
    /// Inclusive `(min, max)` age.
    pub age: (i64, i64),
    /// Inclusive `(min, max)` salary.
    pub salary: (f64, f64),
    pub attrition: AttritionFilter,
}

impl FilterCriteria {
    /// Criteria that let every row of `dataset` through.
    ///
    /// Salary bounds are widened to whole numbers (floor/ceil) for the
    /// sliders, which never excludes a row.
    pub fn full(dataset: &EmployeeDataset) -> Self {
        let age = dataset.age_bounds.unwrap_or((0, 0));
        let salary = dataset
            .salary_bounds
            .map(|(lo, hi)| (lo.floor(), hi.ceil()))
            .unwrap_or((0.0, 0.0));
        Self {
            departments: dataset.departments.clone(),
            age,
            salary,
            attrition: AttritionFilter::All,
        }
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        employee
            .department
            .as_ref()
            .is_some_and(|d| self.departments.contains(d))
            && (self.age.0..=self.age.1).contains(&employee.age)
            && employee.salary >= self.salary.0
            && employee.salary <= self.salary.1
            && self.attrition.matches(employee.attrition)
    }
}

/// Return indices of employees that pass all criteria, in input order.
pub fn filtered_indices(dataset: &EmployeeDataset, criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.departments.is_empty() {
        // Nothing selected → hide everything
        return Vec::new();
    }
    dataset
        .employees
        .iter()
        .enumerate()
        .filter(|(_, emp)| criteria.matches(emp))
        .map(|(i, _)| i)
        .collect()
}
