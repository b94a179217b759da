use eframe::egui::{self, RichText, Ui};

use crate::state::AppState;

/// The four KPI cards in one row.
pub fn kpi_row(ui: &mut Ui, state: &AppState) {
    let summary = &state.view.summary;
    let cards = [
        ("Total Employees", summary.total_employees.to_string()),
        ("Average Salary", summary.average_salary_label()),
        ("Median Age", summary.median_age_label()),
        ("Attrition Rate", summary.attrition_rate_label()),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (title, value)) in cols.iter_mut().zip(cards) {
            kpi_card(col, title, &value);
        }
    });
}

fn kpi_card(ui: &mut Ui, title: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(title);
            ui.label(RichText::new(value).size(26.0).strong());
        });
    });
}
