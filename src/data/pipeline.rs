use std::collections::BTreeMap;

use super::aggregate::{
    DepartmentAttritionCount, DepartmentCount, HistogramBin, age_salary_points,
    attrition_by_department, department_counts, salary_histogram,
};
use super::filter::{FilterCriteria, filtered_indices};
use super::metrics::KpiSummary;
use super::model::EmployeeDataset;

/// Everything the dashboard renders for one set of criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// Rows passing the criteria, as indices into the dataset.
    pub indices: Vec<usize>,
    pub summary: KpiSummary,
    pub department_counts: Vec<DepartmentCount>,
    pub attrition_by_department: Vec<DepartmentAttritionCount>,
    pub salary_histogram: Vec<HistogramBin>,
    pub age_salary: BTreeMap<String, Vec<[f64; 2]>>,
}

impl DashboardView {
    /// Filter `dataset` and derive the KPIs and chart tables from the result.
    pub fn compute(dataset: &EmployeeDataset, criteria: &FilterCriteria, bins: usize) -> Self {
        let indices = filtered_indices(dataset, criteria);
        let summary = KpiSummary::compute(dataset.rows(&indices));
        let department_counts = department_counts(dataset.rows(&indices));
        let attrition_by_department = attrition_by_department(dataset.rows(&indices));
        let salary_histogram = salary_histogram(dataset.rows(&indices), bins);
        let age_salary = age_salary_points(dataset.rows(&indices));

        Self {
            indices,
            summary,
            department_counts,
            attrition_by_department,
            salary_histogram,
            age_salary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
