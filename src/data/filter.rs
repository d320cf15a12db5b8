use std::collections::BTreeSet;

use super::model::{EnrollmentDataset, JoinedRecord};
use super::schema::{RATING_MAX, RATING_MIN};

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Accepted values for one categorical column. A missing value (blank cell
/// or unmatched join) is tracked apart from the present ones and only
/// matches when selected explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValueSelection {
    values: BTreeSet<String>,
    missing: bool,
}

impl ValueSelection {
    /// Select every value in `values`, leaving missing deselected.
    pub fn of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            missing: false,
        }
    }

    pub fn contains(&self, value: Option<&str>) -> bool {
        match value {
            Some(v) => self.values.contains(v),
            None => self.missing,
        }
    }

    /// Flip one value in or out of the selection.
    pub fn toggle(&mut self, value: Option<&str>) {
        match value {
            Some(v) => {
                if !self.values.remove(v) {
                    self.values.insert(v.to_string());
                }
            }
            None => self.missing = !self.missing,
        }
    }

    /// Add every value in `values`; whether missing is selected is unchanged.
    pub fn select_present<I: IntoIterator<Item = String>>(&mut self, values: I) {
        self.values.extend(values);
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.missing = false;
    }

    /// Number of selected options, missing included.
    pub fn len(&self) -> usize {
        self.values.len() + usize::from(self.missing)
    }
}

/// Closed instructor-rating interval `[lo, hi]` within `[0, 5]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRange {
    lo: f64,
    hi: f64,
}

impl RatingRange {
    #[cfg(test)]
    pub const FULL: RatingRange = RatingRange {
        lo: RATING_MIN,
        hi: RATING_MAX,
    };

    /// Clamp both ends into `[0, 5]` and order them so `lo <= hi`.
    pub fn new(a: f64, b: f64) -> Self {
        let clamp = |v: f64| {
            if v.is_nan() {
                RATING_MIN
            } else {
                v.clamp(RATING_MIN, RATING_MAX)
            }
        };
        let (a, b) = (clamp(a), clamp(b));
        RatingRange {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Inclusive on both ends.
    pub fn contains(&self, rating: f64) -> bool {
        self.lo <= rating && rating <= self.hi
    }
}

impl Default for RatingRange {
    fn default() -> Self {
        RatingRange { lo: 2.5, hi: 5.0 }
    }
}

/// The three sidebar controls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    pub expertise: ValueSelection,
    pub categories: ValueSelection,
    pub rating_range: RatingRange,
}

/// Initialise a [`FilterState`] with every present value selected and the
/// given rating range. Missing values start deselected.
pub fn init_filter_state(dataset: &EnrollmentDataset, rating_range: RatingRange) -> FilterState {
    FilterState {
        expertise: ValueSelection::of(dataset.expertise_values.iter().cloned()),
        categories: ValueSelection::of(dataset.category_values.iter().cloned()),
        rating_range,
    }
}

/// Whether one record passes all three predicates.
///
/// * expertise ∈ `filters.expertise` (empty selection → nothing passes)
/// * category ∈ `filters.categories`
/// * instructor rating within the range; a missing rating never passes
pub fn matches(record: &JoinedRecord, filters: &FilterState) -> bool {
    filters.expertise.contains(record.expertise())
        && filters.categories.contains(record.category())
        && record
            .teacher_rating()
            .is_some_and(|r| filters.rating_range.contains(r))
}

/// Return indices of records that pass all filters.
pub fn filtered_indices(dataset: &EnrollmentDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| matches(rec, filters))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView – borrowed subset of the base dataset
// ---------------------------------------------------------------------------

/// Records passing the current filters. Borrows from the dataset; the base
/// records are never copied or mutated.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    records: Vec<&'a JoinedRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn from_indices(dataset: &'a EnrollmentDataset, indices: &[usize]) -> Self {
        Self {
            records: indices
                .iter()
                .filter_map(|&i| dataset.records.get(i))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a JoinedRecord> + '_ {
        self.records.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::{dataset, filtered, record};

    fn sample() -> EnrollmentDataset {
        dataset(vec![
            record("X1", "T1", Some(("Ann", "Data", 4.6)), Some(("Tech", "Beginner", 4.0))),
            record("X2", "T2", Some(("Bo", "Design", 2.8)), Some(("Art", "Advanced", 3.1))),
            record("X3", "T3", Some(("Cy", "Data", 3.5)), Some(("Art", "Beginner", 3.9))),
            record("X4", "T9", None, Some(("Tech", "Beginner", 4.4))),
            record("X5", "T1", Some(("Ann", "Data", 4.6)), None),
        ])
    }

    #[test]
    fn test_defaults_select_present_values_only() {
        let ds = sample();
        let filters = init_filter_state(&ds, RatingRange::default());
        assert_eq!(filters.expertise.len(), 2);
        assert!(!filters.expertise.contains(None));
        assert!(filters.expertise.contains(Some("Design")));
        assert_eq!(filters.rating_range, RatingRange::new(2.5, 5.0));
    }

    #[test]
    fn test_default_filters_drop_unmatched_and_low_rated() {
        let ds = sample();
        let filters = init_filter_state(&ds, RatingRange::default());
        // X2 passes (2.8 >= 2.5); X4 has no instructor; X5 has no course.
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn test_full_range_keeps_every_matched_record() {
        let ds = sample();
        let mut filters = init_filter_state(&ds, RatingRange::FULL);
        filters.categories.toggle(None);
        let view = filtered(&ds, &filters);
        assert_eq!(view.len(), 4);
        assert!(view.len() <= ds.len());
    }

    #[test]
    fn test_missing_expertise_matches_only_when_selected() {
        let ds = sample();
        let mut filters = init_filter_state(&ds, RatingRange::FULL);
        filters.expertise.toggle(None);
        // X4 has no instructor, so it also has no rating and still fails the range.
        assert!(!filtered_indices(&ds, &filters).contains(&3));
    }

    #[test]
    fn test_empty_selection_yields_empty_view() {
        let ds = sample();
        let mut filters = init_filter_state(&ds, RatingRange::FULL);
        filters.expertise.clear();
        assert!(filtered(&ds, &filters).is_empty());

        let mut filters = init_filter_state(&ds, RatingRange::FULL);
        filters.categories.clear();
        assert!(filtered_indices(&ds, &filters).is_empty());
    }

    #[test]
    fn test_rating_range_is_inclusive() {
        let ds = sample();
        let filters = init_filter_state(&ds, RatingRange::new(3.5, 4.6));
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 2]);
    }

    #[test]
    fn test_rating_range_clamps_and_orders() {
        let r = RatingRange::new(7.0, -1.0);
        assert_eq!((r.lo(), r.hi()), (0.0, 5.0));
        let r = RatingRange::new(4.0, 3.0);
        assert_eq!((r.lo(), r.hi()), (3.0, 4.0));
        assert!(r.contains(3.0) && r.contains(4.0));
        assert!(!r.contains(4.01));
    }

    #[test]
    fn test_filtering_leaves_base_untouched() {
        let ds = sample();
        let before = ds.records.clone();
        let filters = init_filter_state(&ds, RatingRange::new(4.9, 5.0));
        let view = filtered(&ds, &filters);
        assert!(view.is_empty());
        assert_eq!(ds.records, before);
    }

    #[test]
    fn test_view_from_indices_borrows_base_records() {
        let ds = sample();
        let view = FilteredView::from_indices(&ds, &[2, 0, 99]);
        let ids: Vec<Option<&str>> = view.iter().map(|r| r.transaction.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("X3"), Some("X1")]);
        assert!(std::ptr::eq(view.iter().next().unwrap(), &ds.records[2]));
    }

    #[test]
    fn test_selection_toggles_present_and_missing_values() {
        let mut selection = ValueSelection::of(["Data", "Design"]);
        assert_eq!(selection.len(), 2);

        selection.toggle(Some("Data"));
        assert!(!selection.contains(Some("Data")));
        selection.toggle(None);
        assert!(selection.contains(None));
        assert_eq!(selection.len(), 2);

        selection.toggle(Some("Data"));
        selection.toggle(None);
        assert_eq!(selection, ValueSelection::of(["Design", "Data"]));

        selection.clear();
        assert_eq!(selection.len(), 0);
    }
}
