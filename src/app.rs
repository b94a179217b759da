use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, kpi, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HrDashboardApp {
    pub state: AppState,
}

impl HrDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for HrDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, charts, table, export ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.has_data() {
                dashboard(ui, &mut self.state);
            } else {
                upload_prompt(ui, &mut self.state);
            }
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("HR Dashboard");
            ui.add_space(6.0);
            kpi::kpi_row(ui, state);
            ui.add_space(8.0);

            charts::charts(ui, state);

            ui.separator();
            ui.heading("Employee Table");
            table::employee_table(ui, state);

            ui.add_space(8.0);
            ui.strong("Export filtered data");
            if ui.button("Download CSV of filtered data").clicked() {
                panels::save_export_dialog(state);
            }
        });
}

fn upload_prompt(ui: &mut Ui, state: &mut AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading("No data loaded. Upload a CSV or add 'hr_data.csv' to the repo.");
            ui.add_space(8.0);
            if ui
                .button("Upload HR CSV file (EmployeeID,Name,Department,Salary,Age,JoinDate,Attrition)")
                .clicked()
            {
                panels::open_file_dialog(state);
            }
        });
    });
}
