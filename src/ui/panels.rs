use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use egui_extras::{Column, TableBuilder};

use crate::analytics::aggregate::LeaderboardColumn;
use crate::analytics::report::format_rating;
use crate::data::filter::RatingRange;
use crate::data::schema::{RATING_MAX, RATING_MIN};
use crate::state::{AppState, SelectColumn};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            multi_select(ui, state, SelectColumn::Expertise, "Select Expertise");
            multi_select(ui, state, SelectColumn::Category, "Select Course Category");
            ui.separator();
            rating_slider(ui, state);
            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

/// Checkbox list with All / None buttons, collapsible like a multiselect.
fn multi_select(ui: &mut Ui, state: &mut AppState, column: SelectColumn, title: &str) {
    let options = state.options(column);
    let n_selected = state.selection(column).len();
    let header_text = format!("{title}  ({n_selected}/{})", options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(column);
                }
            });

            for value in &options {
                let mut checked = state.selection(column).contains(value.as_deref());
                let label = match value {
                    Some(v) => RichText::new(v),
                    None => RichText::new("<missing>").italics(),
                };
                if ui.checkbox(&mut checked, label).changed() {
                    state.toggle_value(column, value.as_deref());
                }
            }
        });
}

/// Two linked handles over `[0, 5]`; dragging one past the other pushes it.
fn rating_slider(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Instructor Rating Range");
    let current = state.filters.rating_range;
    let mut lo = current.lo();
    let mut hi = current.hi();

    let lo_changed = ui
        .add(Slider::new(&mut lo, RATING_MIN..=RATING_MAX).step_by(0.05).text("min"))
        .changed();
    let hi_changed = ui
        .add(Slider::new(&mut hi, RATING_MIN..=RATING_MAX).step_by(0.05).text("max"))
        .changed();

    if lo_changed && lo > hi {
        hi = lo;
    }
    if hi_changed && hi < lo {
        lo = hi;
    }
    if lo_changed || hi_changed {
        state.set_rating_range(RatingRange::new(lo, hi));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the page title and record counts.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(super::PAGE_TITLE);
        ui.separator();
        ui.label(format!(
            "{} enrollments loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));
        if let Some(warning) = &state.report.warning {
            ui.separator();
            ui.label(RichText::new(warning.to_string()).color(Color32::YELLOW));
        }
    });
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

pub fn kpi_cards(ui: &mut Ui, state: &AppState) {
    let kpis = &state.report.kpis;
    let cards = [
        ("Avg Teacher Rating", format_rating(kpis.mean_instructor_rating)),
        ("Avg Course Rating", format_rating(kpis.mean_course_rating)),
        ("Total Instructors", kpis.distinct_instructors.to_string()),
        ("Total Enrollments", kpis.total_enrollments.to_string()),
    ];

    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(cards.iter()) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.label(*label);
                ui.label(RichText::new(value).size(26.0).strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Leaderboard table
// ---------------------------------------------------------------------------

/// Sortable table: clicking a header sorts by it, clicking again reverses.
pub fn leaderboard_table(ui: &mut Ui, state: &mut AppState) {
    let rows = state.leaderboard_sort.apply(&state.report.leaderboard);
    let sort = state.leaderboard_sort;
    let mut clicked: Option<LeaderboardColumn> = None;

    let header_label = |column: LeaderboardColumn, text: &str| {
        if sort.column == column {
            format!("{text} {}", if sort.descending { "⏷" } else { "⏶" })
        } else {
            text.to_string()
        }
    };

    ui.push_id("leaderboard", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(260.0)
            .column(Column::exact(40.0))
            .column(Column::remainder().at_least(160.0))
            .column(Column::auto().at_least(120.0))
            .column(Column::auto().at_least(80.0))
            .header(22.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for (column, text) in [
                    (LeaderboardColumn::Name, "TeacherName"),
                    (LeaderboardColumn::Rating, "TeacherRating"),
                    (LeaderboardColumn::Records, "Enrollments"),
                ] {
                    header.col(|ui: &mut Ui| {
                        if ui.button(header_label(column, text)).clicked() {
                            clicked = Some(column);
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, rows.len(), |mut row| {
                    let entry = &rows[row.index()];
                    let rank = row.index() + 1;
                    row.col(|ui: &mut Ui| {
                        ui.label(rank.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&entry.name);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format_rating(entry.mean_rating));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(entry.records.to_string());
                    });
                });
            });
    });

    if rows.is_empty() {
        ui.label(RichText::new("no data").italics());
    }
    if let Some(column) = clicked {
        state.sort_leaderboard_by(column);
    }
}
