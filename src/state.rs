use std::sync::Arc;

use crate::analytics::aggregate::{LeaderboardColumn, LeaderboardSort};
use crate::analytics::report::DashboardReport;
use crate::data::filter::{
    filtered_indices, init_filter_state, FilterState, FilteredView, RatingRange, ValueSelection,
};
use crate::data::model::EnrollmentDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The two multi-select controls in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectColumn {
    Expertise,
    Category,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Joined dataset, shared with the process-wide cache.
    pub dataset: Arc<EnrollmentDataset>,

    /// Current sidebar selections.
    pub filters: FilterState,

    /// Selections the "Reset" button restores.
    initial_filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates of the visible records, rebuilt on every filter change.
    pub report: DashboardReport,

    /// Leaderboard table sort.
    pub leaderboard_sort: LeaderboardSort,
}

impl AppState {
    /// Ingest the loaded dataset, initialise filters, and compute the first report.
    pub fn new(dataset: Arc<EnrollmentDataset>, rating_range: RatingRange) -> Self {
        let filters = init_filter_state(&dataset, rating_range);
        let mut state = Self {
            dataset,
            initial_filters: filters.clone(),
            filters,
            visible_indices: Vec::new(),
            report: DashboardReport::default(),
            leaderboard_sort: LeaderboardSort::default(),
        };
        state.refilter();
        state
    }

    /// Filter → aggregate → derive. Called after every control change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.filters);
        let view = FilteredView::from_indices(&self.dataset, &self.visible_indices);
        self.report = DashboardReport::build(&view);
        log::debug!(
            "{} of {} records visible",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    fn selection_mut(&mut self, column: SelectColumn) -> &mut ValueSelection {
        match column {
            SelectColumn::Expertise => &mut self.filters.expertise,
            SelectColumn::Category => &mut self.filters.categories,
        }
    }

    pub fn selection(&self, column: SelectColumn) -> &ValueSelection {
        match column {
            SelectColumn::Expertise => &self.filters.expertise,
            SelectColumn::Category => &self.filters.categories,
        }
    }

    /// Every value a control offers, `None` last when some records lack one.
    pub fn options(&self, column: SelectColumn) -> Vec<Option<String>> {
        let (values, has_missing) = match column {
            SelectColumn::Expertise => (&self.dataset.expertise_values, self.dataset.has_missing_expertise),
            SelectColumn::Category => (&self.dataset.category_values, self.dataset.has_missing_category),
        };
        let mut options: Vec<Option<String>> = values.iter().cloned().map(Some).collect();
        if has_missing {
            options.push(None);
        }
        options
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_value(&mut self, column: SelectColumn, value: Option<&str>) {
        self.selection_mut(column).toggle(value);
        self.refilter();
    }

    /// Select all present values in a column. Missing values stay as they were.
    pub fn select_all(&mut self, column: SelectColumn) {
        let dataset = Arc::clone(&self.dataset);
        let values = match column {
            SelectColumn::Expertise => &dataset.expertise_values,
            SelectColumn::Category => &dataset.category_values,
        };
        self.selection_mut(column).select_present(values.iter().cloned());
        self.refilter();
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: SelectColumn) {
        self.selection_mut(column).clear();
        self.refilter();
    }

    pub fn set_rating_range(&mut self, range: RatingRange) {
        if range != self.filters.rating_range {
            self.filters.rating_range = range;
            self.refilter();
        }
    }

    pub fn reset_filters(&mut self) {
        self.filters = self.initial_filters.clone();
        self.refilter();
    }

    pub fn sort_leaderboard_by(&mut self, column: LeaderboardColumn) {
        self.leaderboard_sort = self.leaderboard_sort.toggled(column);
    }
}
