use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub enum DashboardApp {
    Ready(Box<AppState>),
    /// The dataset could not be loaded; only the error is shown.
    Failed(String),
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = match self {
            DashboardApp::Ready(state) => state,
            DashboardApp::Failed(message) => {
                egui::CentralPanel::default().show(ctx, |ui: &mut Ui| {
                    ui.centered_and_justified(|ui: &mut Ui| {
                        let text = format!("Cannot load platform data\n\n{message}");
                        ui.heading(RichText::new(text).color(egui::Color32::RED));
                    });
                });
                return;
            }
        };

        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, state);
            });

        // ---- Central panel: KPIs, leaderboard, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("Key Performance Indicators");
                    panels::kpi_cards(ui, state);
                    ui.add_space(12.0);

                    ui.heading("Instructor Performance Leaderboard");
                    panels::leaderboard_table(ui, state);
                    ui.add_space(12.0);

                    let report = &state.report;
                    ui.columns(2, |cols: &mut [Ui]| {
                        plot::experience_scatter(&mut cols[0], report);
                        plot::rating_regression(&mut cols[1], report);
                    });
                    ui.add_space(12.0);
                    ui.columns(2, |cols: &mut [Ui]| {
                        plot::category_level_heatmap(&mut cols[0], report);
                        plot::expertise_bars(&mut cols[1], report);
                    });
                    ui.add_space(12.0);
                    plot::tier_bars(ui, report);
                });
        });
    }
}
