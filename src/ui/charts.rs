use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, Points};

use crate::color::attrition_color;
use crate::data::model::Attrition;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;
const NO_DATA: &str = "No data for selected filters.";

// ---------------------------------------------------------------------------
// Charts section (central panel)
// ---------------------------------------------------------------------------

/// Render the collapsible two-column chart grid.
pub fn charts(ui: &mut Ui, state: &AppState) {
    egui::CollapsingHeader::new(RichText::new("Charts").strong())
        .id_salt("charts")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                department_chart(&mut cols[0], state);
                salary_histogram_chart(&mut cols[0], state);
                age_salary_chart(&mut cols[1], state);
                attrition_chart(&mut cols[1], state);
            });
        });
}

fn department_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Employees by Department");
    if state.view.department_counts.is_empty() {
        ui.label(NO_DATA);
        return;
    }

    Plot::new("department_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Department")
        .y_axis_label("Employees")
        .show_axes([false, true])
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, entry) in state.view.department_counts.iter().enumerate() {
                let bar = Bar::new(i as f64, entry.count as f64)
                    .name(&entry.department)
                    .width(0.7);
                let chart = BarChart::new(vec![bar])
                    .name(&entry.department)
                    .color(state.colors.color_for(&entry.department));
                plot_ui.bar_chart(chart);
            }
        });
}

fn salary_histogram_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Salary Distribution");
    if state.view.is_empty() {
        ui.label(NO_DATA);
        return;
    }

    let bars: Vec<Bar> = state
        .view
        .salary_histogram
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.0} – {:.0}", bin.start, bin.end))
        })
        .collect();

    Plot::new("salary_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Salary")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Salary")
                    .color(Color32::LIGHT_BLUE),
            );
        });
}

fn age_salary_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Age vs Salary");
    if state.view.age_salary.is_empty() {
        ui.label(NO_DATA);
        return;
    }

    Plot::new("age_salary_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Age")
        .y_axis_label("Salary")
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("Age: {:.0}\nSalary: {:.0}", value.x, value.y)
            } else {
                format!("{name}\nAge: {:.0}\nSalary: {:.0}", value.x, value.y)
            }
        })
        .show(ui, |plot_ui| {
            for (department, points) in &state.view.age_salary {
                plot_ui.points(
                    Points::new(points.clone())
                        .name(department)
                        .color(state.colors.color_for(department))
                        .radius(3.0),
                );
            }
        });
}

fn attrition_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Attrition by Department");
    let counts = &state.view.attrition_by_department;
    if counts.is_empty() {
        ui.label(NO_DATA);
        return;
    }

    // x position per department, in the order they appear (already sorted).
    let mut departments: Vec<&str> = counts.iter().map(|c| c.department.as_str()).collect();
    departments.dedup();

    Plot::new("attrition_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Department")
        .y_axis_label("Count")
        .show_axes([false, true])
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (attrition, offset) in [(Attrition::No, -0.2), (Attrition::Yes, 0.2)] {
                let bars: Vec<Bar> = counts
                    .iter()
                    .filter(|c| c.attrition == attrition)
                    .filter_map(|c| {
                        let x = departments.iter().position(|d| *d == c.department)?;
                        Some(
                            Bar::new(x as f64 + offset, c.count as f64)
                                .width(0.4)
                                .name(format!("{} – {}", c.department, attrition)),
                        )
                    })
                    .collect();
                if bars.is_empty() {
                    continue;
                }
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(attrition.as_str())
                        .color(attrition_color(attrition)),
                );
            }
        });
}
