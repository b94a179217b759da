use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::DepartmentColors;
use crate::data::aggregate::DEFAULT_SALARY_BINS;
use crate::data::export;
use crate::data::filter::{AttritionFilter, FilterCriteria};
use crate::data::loader::{self, DatasetCache};
use crate::data::model::EmployeeDataset;
use crate::data::pipeline::DashboardView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (empty until a file loads).
    pub dataset: Arc<EmployeeDataset>,

    /// Where the dataset came from, if anywhere.
    pub source: Option<PathBuf>,

    /// Current sidebar selections.
    pub criteria: FilterCriteria,

    /// Filtered rows, KPIs and chart tables for `criteria` (cached).
    pub view: DashboardView,

    /// Stable department colours for the charts.
    pub colors: DepartmentColors,

    /// Number of salary histogram bins.
    pub salary_bins: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: Arc::new(EmployeeDataset::default()),
            source: None,
            criteria: FilterCriteria::default(),
            view: DashboardView::default(),
            colors: DepartmentColors::default(),
            salary_bins: DEFAULT_SALARY_BINS,
            status_message: None,
        }
    }
}

impl AppState {
    pub fn new(salary_bins: usize) -> Self {
        Self {
            salary_bins: salary_bins.max(1),
            ..Self::default()
        }
    }

    /// Initial load through the cache.  A failure leaves an empty dataset and
    /// the error in `status_message`, which brings up the upload prompt.
    pub fn load_initial(&mut self, cache: &DatasetCache, path: &Path) {
        let (dataset, error) = loader::load_or_empty(cache, path);
        self.set_dataset(dataset, Some(path.to_path_buf()));
        self.status_message = error;
    }

    /// Load a user-chosen file.  Uploads bypass the cache.
    pub fn upload(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Uploaded {} employees from {}",
                    dataset.len(),
                    path.display()
                );
                self.set_dataset(Arc::new(dataset), Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a dataset, reset criteria to "show everything" and recompute.
    pub fn set_dataset(&mut self, dataset: Arc<EmployeeDataset>, source: Option<PathBuf>) {
        self.criteria = FilterCriteria::full(&dataset);
        self.colors = DepartmentColors::new(&dataset.departments);
        self.dataset = dataset;
        self.source = source;
        self.status_message = None;
        self.refilter();
    }

    pub fn has_data(&self) -> bool {
        !self.dataset.is_empty()
    }

    /// Recompute the view after any criteria change.
    pub fn refilter(&mut self) {
        self.view = DashboardView::compute(&self.dataset, &self.criteria, self.salary_bins);
        log::debug!(
            "{} of {} employees match",
            self.view.indices.len(),
            self.dataset.len()
        );
    }

    /// Toggle a single department in the selection.
    pub fn toggle_department(&mut self, department: &str) {
        if !self.criteria.departments.remove(department) {
            self.criteria.departments.insert(department.to_string());
        }
        self.refilter();
    }

    pub fn select_all_departments(&mut self) {
        self.criteria.departments = self.dataset.departments.clone();
        self.refilter();
    }

    pub fn select_no_departments(&mut self) {
        self.criteria.departments.clear();
        self.refilter();
    }

    /// Set the age range, keeping `min <= max`.
    pub fn set_age_range(&mut self, min: i64, max: i64) {
        self.criteria.age = (min.min(max), min.max(max));
        self.refilter();
    }

    /// Set the salary range, keeping `min <= max`.
    pub fn set_salary_range(&mut self, min: f64, max: f64) {
        self.criteria.salary = (min.min(max), min.max(max));
        self.refilter();
    }

    pub fn set_attrition(&mut self, attrition: AttritionFilter) {
        self.criteria.attrition = attrition;
        self.refilter();
    }

    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::full(&self.dataset);
        self.refilter();
    }

    /// Write the filtered rows to `path`, reporting the outcome in the status.
    pub fn export_filtered(&mut self, path: &Path) {
        let rows = self.dataset.rows(&self.view.indices);
        match export::export_to_path(path, rows) {
            Ok(_) => {
                self.status_message = Some(format!(
                    "Exported {} rows to {}",
                    self.view.indices.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
