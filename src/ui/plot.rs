use std::ops::RangeInclusive;

use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::analytics::report::DashboardReport;
use crate::analytics::tier::InstructorTier;
use crate::color::{contrast_text, coolwarm, normalize, ColorMap};

const CHART_HEIGHT: f32 = 280.0;

/// Shown inside a chart frame when the view has nothing to draw.
fn empty_note(ui: &mut Ui) {
    ui.label(RichText::new("no data for the current filters").italics());
}

/// Axis formatter that prints `labels[i]` at integer positions only.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let i = mark.value.round();
        if (mark.value - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Scatter: experience vs instructor rating
// ---------------------------------------------------------------------------

pub fn experience_scatter(ui: &mut Ui, report: &DashboardReport) {
    ui.strong("Experience vs Instructor Rating");
    if report.experience_vs_rating.is_empty() {
        empty_note(ui);
    }
    Plot::new("experience_scatter")
        .height(CHART_HEIGHT)
        .x_axis_label("YearsOfExperience")
        .y_axis_label("TeacherRating")
        .include_y(0.0)
        .include_y(5.0)
        .show(ui, |plot_ui| {
            let points = Points::new(PlotPoints::from(report.experience_vs_rating.clone()))
                .radius(3.0)
                .color(Color32::LIGHT_BLUE)
                .name("enrollment");
            plot_ui.points(points);
        });
}

// ---------------------------------------------------------------------------
// Scatter + least-squares line: instructor vs course rating
// ---------------------------------------------------------------------------

pub fn rating_regression(ui: &mut Ui, report: &DashboardReport) {
    ui.strong("Instructor Rating vs Course Rating");
    if report.rating_pairs.is_empty() {
        empty_note(ui);
    }
    let x_range = report
        .rating_pairs
        .iter()
        .map(|p| p[0])
        .fold(None, |acc: Option<(f64, f64)>, x| match acc {
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            None => Some((x, x)),
        });

    Plot::new("rating_regression")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("TeacherRating")
        .y_axis_label("CourseRating")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::from(report.rating_pairs.clone()))
                    .radius(3.0)
                    .color(Color32::LIGHT_BLUE)
                    .name("enrollment"),
            );
            if let (Some(fit), Some((lo, hi))) = (report.rating_fit, x_range) {
                let line = Line::new(PlotPoints::from(vec![[lo, fit.predict(lo)], [hi, fit.predict(hi)]]))
                    .color(Color32::from_rgb(255, 140, 0))
                    .width(2.0)
                    .name(format!("fit: y = {:.2}x + {:.2}", fit.slope, fit.intercept));
                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Annotated heatmap: category × level → mean course rating
// ---------------------------------------------------------------------------

pub fn category_level_heatmap(ui: &mut Ui, report: &DashboardReport) {
    ui.strong("Average Course Rating by Category & Level");
    let pivot = &report.category_level_means;
    let Some((lo, hi)) = pivot.value_range() else {
        empty_note(ui);
        return;
    };

    let n_rows = pivot.rows.len() as f64;
    Plot::new("category_level_heatmap")
        .height(CHART_HEIGHT)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.2)
        .include_x(pivot.columns.len() as f64)
        .include_y(-0.6)
        .include_y(n_rows)
        .show(ui, |plot_ui| {
            for (i, category) in pivot.rows.iter().enumerate() {
                // First category on top.
                let y = n_rows - 1.0 - i as f64;
                for (j, level) in pivot.columns.iter().enumerate() {
                    let x = j as f64;
                    let Some(value) = pivot.get(category, level) else {
                        continue;
                    };
                    let fill = coolwarm(normalize(value, lo, hi));
                    let cell = Polygon::new(PlotPoints::from(vec![
                        [x, y],
                        [x + 1.0, y],
                        [x + 1.0, y + 1.0],
                        [x, y + 1.0],
                    ]))
                    .fill_color(fill)
                    .stroke(Stroke::new(1.0, Color32::WHITE))
                    .name(format!("{category} / {level}"));
                    plot_ui.polygon(cell);
                    plot_ui.text(Text::new(
                        PlotPoint::new(x + 0.5, y + 0.5),
                        RichText::new(format!("{value:.2}")).color(contrast_text(fill)),
                    ));
                }
                plot_ui.text(
                    Text::new(PlotPoint::new(-0.05, y + 0.5), category.as_str())
                        .anchor(Align2::RIGHT_CENTER),
                );
            }
            for (j, level) in pivot.columns.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(j as f64 + 0.5, -0.05), level.as_str())
                        .anchor(Align2::CENTER_TOP),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Bars: expertise → mean course rating (± one standard deviation)
// ---------------------------------------------------------------------------

pub fn expertise_bars(ui: &mut Ui, report: &DashboardReport) {
    ui.strong("Expertise vs Course Rating");
    let groups = &report.expertise_means;
    if groups.is_empty() {
        empty_note(ui);
    }
    let labels: Vec<String> = groups.iter().map(|g| g.key.clone()).collect();
    let colors = ColorMap::new(labels.iter().map(String::as_str));

    Plot::new("expertise_bars")
        .height(CHART_HEIGHT)
        .x_axis_label("Expertise")
        .y_axis_label("CourseRating")
        .x_axis_formatter(category_axis(labels.clone()))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            let bars: Vec<Bar> = groups
                .iter()
                .enumerate()
                .map(|(i, g)| {
                    Bar::new(i as f64, g.mean)
                        .name(format!("{} (n = {})", g.key, g.count))
                        .fill(colors.color_for(&g.key))
                        .width(0.6)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name("mean CourseRating"));

            for (i, g) in groups.iter().enumerate() {
                if let Some(sd) = g.std_dev {
                    let x = i as f64;
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[x, g.mean - sd], [x, g.mean + sd]]))
                            .color(Color32::DARK_GRAY)
                            .width(2.0),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Bars: enrollments per instructor tier
// ---------------------------------------------------------------------------

pub fn tier_bars(ui: &mut Ui, report: &DashboardReport) {
    ui.strong("Enrollments by Instructor Rating Tier");
    let distribution = report.tiers.distribution();
    ui.label(format!("total: {}", report.tiers.total()));

    let labels: Vec<String> = distribution.iter().map(|(t, _)| t.to_string()).collect();
    Plot::new("tier_bars")
        .height(CHART_HEIGHT)
        .x_axis_label("InstructorTier")
        .y_axis_label("Enrollments")
        .x_axis_formatter(category_axis(labels))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            let bars: Vec<Bar> = distribution
                .iter()
                .enumerate()
                .map(|(i, &(tier, n))| {
                    Bar::new(i as f64, n as f64)
                        .name(tier.to_string())
                        .fill(tier_color(tier))
                        .width(0.6)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name("enrollments"));
        });
}

fn tier_color(tier: InstructorTier) -> Color32 {
    match tier {
        InstructorTier::Low => coolwarm(0.0),
        InstructorTier::Mid => coolwarm(0.5),
        InstructorTier::High => coolwarm(1.0),
    }
}
