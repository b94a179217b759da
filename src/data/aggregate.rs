use std::collections::BTreeMap;

use super::model::{Attrition, Employee};

/// Default number of salary histogram bins.
pub const DEFAULT_SALARY_BINS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentCount {
    pub department: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentAttritionCount {
    pub department: String,
    pub attrition: Attrition,
    pub count: usize,
}

/// One equal-width salary bucket `[start, end)`; the last one is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Employees per department, largest first (ties by name).  Rows without a
/// department are not counted.
pub fn department_counts<'a, I>(rows: I) -> Vec<DepartmentCount>
where
    I: IntoIterator<Item = &'a Employee>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for department in rows.into_iter().filter_map(|e| e.department.as_deref()) {
        *counts.entry(department).or_default() += 1;
    }
    let mut out: Vec<DepartmentCount> = counts
        .into_iter()
        .map(|(department, count)| DepartmentCount {
            department: department.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the alphabetical order among equal counts.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Employees per `(department, attrition)` pair, ordered by both keys.
pub fn attrition_by_department<'a, I>(rows: I) -> Vec<DepartmentAttritionCount>
where
    I: IntoIterator<Item = &'a Employee>,
{
    let mut counts: BTreeMap<(&str, Attrition), usize> = BTreeMap::new();
    for emp in rows {
        let (Some(department), Some(attrition)) = (emp.department.as_deref(), emp.attrition) else {
            continue;
        };
        *counts.entry((department, attrition)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((department, attrition), count)| DepartmentAttritionCount {
            department: department.to_string(),
            attrition,
            count,
        })
        .collect()
}

/// Bucket salaries into `bins` equal-width bins spanning the observed range.
///
/// A degenerate range (all salaries equal) becomes a single bin of width 1
/// centred on the value.  Zero rows or zero bins give an empty histogram.
pub fn salary_histogram<'a, I>(rows: I, bins: usize) -> Vec<HistogramBin>
where
    I: IntoIterator<Item = &'a Employee>,
{
    let salaries: Vec<f64> = rows.into_iter().map(|e| e.salary).collect();
    if salaries.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = salaries.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = salaries.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range.abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min - 0.5,
            end: min + 0.5,
            count: salaries.len(),
        }];
    }

    let width = range / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: if i + 1 == bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for s in salaries {
        let idx = (((s - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// `(age, salary)` points per department, departments in sorted order.
pub fn age_salary_points<'a, I>(rows: I) -> BTreeMap<String, Vec<[f64; 2]>>
where
    I: IntoIterator<Item = &'a Employee>,
{
    let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for emp in rows {
        let Some(department) = &emp.department else {
            continue;
        };
        series
            .entry(department.clone())
            .or_default()
            .push([emp.age as f64, emp.salary]);
    }
    series
}
