use thiserror::Error;

use crate::data::filter::FilteredView;

use super::aggregate::{expertise_means, leaderboard, GroupMean, KpiSummary, LeaderboardEntry, PivotTable};
use super::stats::{fit_linear, round2, LinearFit};
use super::tier::TierCounts;

/// Non-fatal conditions surfaced next to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DashboardWarning {
    #[error("no records match the current filters")]
    EmptySelection,
}

/// Every aggregate the dashboard renders for one filter state. Owned, so the
/// UI can keep it between frames without borrowing the dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardReport {
    pub kpis: KpiSummary,
    pub leaderboard: Vec<LeaderboardEntry>,
    /// `[years of experience, instructor rating]`.
    pub experience_vs_rating: Vec<[f64; 2]>,
    /// `[instructor rating, course rating]`.
    pub rating_pairs: Vec<[f64; 2]>,
    pub rating_fit: Option<LinearFit>,
    pub category_level_means: PivotTable,
    pub expertise_means: Vec<GroupMean>,
    pub tiers: TierCounts,
    pub warning: Option<DashboardWarning>,
}

impl DashboardReport {
    /// Aggregate → derive over one filtered view.
    pub fn build(view: &FilteredView<'_>) -> Self {
        let experience_vs_rating: Vec<[f64; 2]> = view
            .iter()
            .filter_map(|r| Some([r.years_of_experience()?, r.teacher_rating()?]))
            .collect();
        let rating_pairs: Vec<[f64; 2]> = view
            .iter()
            .filter_map(|r| Some([r.teacher_rating()?, r.course_rating()?]))
            .collect();
        let rating_fit = fit_linear(&rating_pairs);

        let warning = view.is_empty().then_some(DashboardWarning::EmptySelection);
        if let Some(w) = &warning {
            log::warn!("{w}");
        }

        DashboardReport {
            kpis: KpiSummary::compute(view),
            leaderboard: leaderboard(view),
            experience_vs_rating,
            rating_pairs,
            rating_fit,
            category_level_means: PivotTable::category_level_means(view),
            expertise_means: expertise_means(view),
            tiers: TierCounts::count(view),
            warning,
        }
    }
}

/// KPI text for a mean: two decimals, or "no data" when undefined.
pub fn format_rating(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", round2(v)),
        _ => "no data".to_string(),
    }
}
