use super::model::{Attrition, Employee};

// ---------------------------------------------------------------------------
// KPI summary – the four cards above the charts
// ---------------------------------------------------------------------------

/// Summary metrics of a filtered view.  Every field is zero for an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KpiSummary {
    pub total_employees: usize,
    pub average_salary: f64,
    pub median_age: f64,
    /// Percentage of rows with `Attrition == Yes`, rounded to one decimal
    /// with ties to even.  Rows with no attrition value count as non-leavers.
    pub attrition_rate: f64,
}

impl KpiSummary {
    pub fn compute<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Employee>,
    {
        let mut count = 0usize;
        let mut salary_sum = 0.0;
        let mut leavers = 0usize;
        let mut ages = Vec::new();

        for emp in rows {
            count += 1;
            salary_sum += emp.salary;
            ages.push(emp.age);
            if emp.attrition == Some(Attrition::Yes) {
                leavers += 1;
            }
        }

        if count == 0 {
            return Self::default();
        }

        let rate = 100.0 * leavers as f64 / count as f64;
        Self {
            total_employees: count,
            average_salary: salary_sum / count as f64,
            median_age: median(&mut ages),
            attrition_rate: (rate * 10.0).round_ties_even() / 10.0,
        }
    }

    /// Average salary as shown on its card (truncated).
    pub fn average_salary_label(&self) -> String {
        format!("{}", self.average_salary.trunc() as i64)
    }

    /// Median age as shown on its card (truncated).
    pub fn median_age_label(&self) -> String {
        format!("{}", self.median_age.trunc() as i64)
    }

    /// One decimal place, or a bare `0%` when there are no rows.
    pub fn attrition_rate_label(&self) -> String {
        if self.total_employees == 0 {
            return "0%".to_string();
        }
        format!("{:.1}%", self.attrition_rate)
    }
}

/// Median of a non-empty slice; mean of the middle pair for even lengths.
fn median(values: &mut [i64]) -> f64 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] as f64 + values[mid] as f64) / 2.0
    } else {
        values[mid] as f64
    }
}
