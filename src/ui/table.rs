use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::COLUMNS;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// The filtered employees, re-indexed from zero.
pub fn employee_table(ui: &mut Ui, state: &AppState) {
    let indices = &state.view.indices;
    let employees = &state.dataset.employees;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .column(Column::auto().at_least(32.0))
        .columns(Column::auto().at_least(70.0), COLUMNS.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for name in COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                let i = row.index();
                let Some(emp) = indices.get(i).and_then(|&idx| employees.get(idx)) else {
                    return;
                };
                row.col(|ui| {
                    ui.label(i.to_string());
                });
                row.col(|ui| {
                    ui.label(&emp.employee_id);
                });
                row.col(|ui| {
                    ui.label(&emp.name);
                });
                row.col(|ui| {
                    ui.label(emp.department.as_deref().unwrap_or_default());
                });
                row.col(|ui| {
                    ui.label(format!("{}", emp.salary));
                });
                row.col(|ui| {
                    ui.label(emp.age.to_string());
                });
                row.col(|ui| {
                    ui.label(emp.join_date.to_string());
                });
                row.col(|ui| {
                    ui.label(emp.attrition.map(|a| a.as_str()).unwrap_or_default());
                });
            });
        });
}
