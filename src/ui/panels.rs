use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::export::DEFAULT_EXPORT_NAME;
use crate::data::filter::AttritionFilter;
use crate::data::model::EmployeeDataset;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if !state.has_data() {
        ui.label("No dataset loaded.");
        return;
    }

    // Cheap handle so widgets can read the dataset while mutating state.
    let dataset = Arc::clone(&state.dataset);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            department_filter(ui, state, &dataset);
            ui.separator();
            age_filter(ui, state, &dataset);
            ui.separator();
            salary_filter(ui, state, &dataset);
            ui.separator();
            attrition_filter(ui, state, &dataset);
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

fn department_filter(ui: &mut Ui, state: &mut AppState, dataset: &EmployeeDataset) {
    let n_selected = state.criteria.departments.len();
    let n_total = dataset.departments.len();
    let header_text = format!("Department  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("department_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_departments();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_departments();
                }
            });

            let mut toggled: Option<&str> = None;
            for department in &dataset.departments {
                let mut checked = state.criteria.departments.contains(department);
                let text = RichText::new(department).color(state.colors.color_for(department));
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(department.as_str());
                }
            }
            if let Some(department) = toggled {
                state.toggle_department(department);
            }
        });
}

fn age_filter(ui: &mut Ui, state: &mut AppState, dataset: &EmployeeDataset) {
    let Some((lo, hi)) = dataset.age_bounds else {
        return;
    };
    ui.strong("Age range");

    let (mut min, mut max) = state.criteria.age;
    let min_changed = ui.add(Slider::new(&mut min, lo..=hi).text("min")).changed();
    let max_changed = ui.add(Slider::new(&mut max, lo..=hi).text("max")).changed();

    if min_changed || max_changed {
        // Dragging one handle past the other pushes it along.
        if min > max {
            if min_changed {
                max = min;
            } else {
                min = max;
            }
        }
        state.set_age_range(min, max);
    }
}

fn salary_filter(ui: &mut Ui, state: &mut AppState, dataset: &EmployeeDataset) {
    let Some((lo, hi)) = dataset.salary_bounds else {
        return;
    };
    let (lo, hi) = (lo.floor(), hi.ceil());
    ui.strong("Salary range");

    let (mut min, mut max) = state.criteria.salary;
    let min_changed = ui
        .add(
            Slider::new(&mut min, lo..=hi)
                .text("min")
                .step_by(1.0)
                .fixed_decimals(0),
        )
        .changed();
    let max_changed = ui
        .add(
            Slider::new(&mut max, lo..=hi)
                .text("max")
                .step_by(1.0)
                .fixed_decimals(0),
        )
        .changed();

    if min_changed || max_changed {
        if min > max {
            if min_changed {
                max = min;
            } else {
                min = max;
            }
        }
        state.set_salary_range(min, max);
    }
}

fn attrition_filter(ui: &mut Ui, state: &mut AppState, dataset: &EmployeeDataset) {
    ui.strong("Attrition");

    let mut selected = state.criteria.attrition;
    egui::ComboBox::from_id_salt("attrition_filter")
        .selected_text(selected.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for option in AttritionFilter::options(dataset) {
                ui.selectable_value(&mut selected, option, option.to_string());
            }
        });

    if selected != state.criteria.attrition {
        state.set_attrition(selected);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.has_data(), egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.has_data() {
            let source = state
                .source
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{source}: {} employees loaded, {} match",
                state.dataset.len(),
                state.view.indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Fallback upload path: pick a file and load it without the cache.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload HR CSV file (EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition)")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.upload(&path);
    }
}

pub fn save_export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_filtered(&path);
    }
}
