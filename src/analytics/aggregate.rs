use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::data::filter::FilteredView;

use super::stats::{mean, std_dev};

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

/// Scalar summary of a filtered view. Means are `None` over zero values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KpiSummary {
    pub mean_instructor_rating: Option<f64>,
    pub mean_course_rating: Option<f64>,
    pub distinct_instructors: usize,
    pub total_enrollments: usize,
}

impl KpiSummary {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        // A blank TeacherID is not an instructor.
        let distinct: HashSet<&str> = view.iter().filter_map(|r| r.teacher_id()).collect();
        KpiSummary {
            mean_instructor_rating: mean(view.iter().filter_map(|r| r.teacher_rating())),
            mean_course_rating: mean(view.iter().filter_map(|r| r.course_rating())),
            distinct_instructors: distinct.len(),
            total_enrollments: view.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub mean_rating: Option<f64>,
    /// Records of this instructor in the view.
    pub records: usize,
}

/// Instructors present in the view, ranked by mean instructor rating,
/// highest first. Ties keep first-encounter order.
pub fn leaderboard(view: &FilteredView<'_>) -> Vec<LeaderboardEntry> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, (Vec<f64>, usize)> = HashMap::new();

    for rec in view.iter() {
        let Some(name) = rec.teacher_name() else {
            continue;
        };
        let group = groups.entry(name).or_insert_with(|| {
            order.push(name);
            (Vec::new(), 0)
        });
        if let Some(r) = rec.teacher_rating() {
            group.0.push(r);
        }
        group.1 += 1;
    }

    let mut entries: Vec<LeaderboardEntry> = order
        .into_iter()
        .filter_map(|name| {
            let (ratings, records) = groups.remove(name)?;
            Some(LeaderboardEntry {
                name: name.to_string(),
                mean_rating: mean(ratings),
                records,
            })
        })
        .collect();

    // `sort_by` is stable.
    entries.sort_by(|a, b| cmp_rating_desc(a.mean_rating, b.mean_rating));
    entries
}

/// Descending, with undefined means last.
fn cmp_rating_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Column the leaderboard table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardColumn {
    Name,
    #[default]
    Rating,
    Records,
}

/// Table sort state: column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardSort {
    pub column: LeaderboardColumn,
    pub descending: bool,
}

impl Default for LeaderboardSort {
    fn default() -> Self {
        Self {
            column: LeaderboardColumn::Rating,
            descending: true,
        }
    }
}

impl LeaderboardSort {
    /// Clicking the active column flips direction; another column starts
    /// descending for numbers and ascending for names.
    pub fn toggled(self, column: LeaderboardColumn) -> Self {
        if self.column == column {
            Self {
                column,
                descending: !self.descending,
            }
        } else {
            Self {
                column,
                descending: column != LeaderboardColumn::Name,
            }
        }
    }

    /// Stable re-sort of a ranked leaderboard for display.
    pub fn apply(&self, entries: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
        let mut rows = entries.to_vec();
        match (self.column, self.descending) {
            (LeaderboardColumn::Rating, true) => {
                rows.sort_by(|a, b| cmp_rating_desc(a.mean_rating, b.mean_rating))
            }
            (LeaderboardColumn::Rating, false) => {
                rows.sort_by(|a, b| cmp_rating_desc(b.mean_rating, a.mean_rating))
            }
            (LeaderboardColumn::Name, desc) => rows.sort_by(|a, b| {
                let o = a.name.cmp(&b.name);
                if desc {
                    o.reverse()
                } else {
                    o
                }
            }),
            (LeaderboardColumn::Records, desc) => rows.sort_by(|a, b| {
                let o = a.records.cmp(&b.records);
                if desc {
                    o.reverse()
                } else {
                    o
                }
            }),
        }
        rows
    }
}

// ---------------------------------------------------------------------------
// Pivot: course category × level → mean course rating
// ---------------------------------------------------------------------------

/// Two-dimensional mean table. A cell exists only for pairs observed in the
/// view with at least one course rating.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PivotTable {
    /// Sorted row labels (course categories).
    pub rows: Vec<String>,
    /// Sorted column labels (course levels).
    pub columns: Vec<String>,
    cells: BTreeMap<(String, String), f64>,
}

impl PivotTable {
    pub fn category_level_means(view: &FilteredView<'_>) -> Self {
        let mut sums: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
        for rec in view.iter() {
            let (Some(category), Some(level), Some(rating)) =
                (rec.category(), rec.level(), rec.course_rating())
            else {
                continue;
            };
            sums.entry((category.to_string(), level.to_string()))
                .or_default()
                .push(rating);
        }

        let mut rows = BTreeSet::new();
        let mut columns = BTreeSet::new();
        let mut cells = BTreeMap::new();
        for ((category, level), ratings) in sums {
            if let Some(m) = mean(ratings) {
                rows.insert(category.clone());
                columns.insert(level.clone());
                cells.insert((category, level), m);
            }
        }

        PivotTable {
            rows: rows.into_iter().collect(),
            columns: columns.into_iter().collect(),
            cells,
        }
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        self.cells.get(&(row.to_string(), column.to_string())).copied()
    }

    /// Smallest and largest cell value, for the colour scale.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.cells.values().copied();
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

// ---------------------------------------------------------------------------
// Expertise → mean course rating
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub key: String,
    pub mean: f64,
    pub count: usize,
    /// Sample standard deviation; `None` below two values.
    pub std_dev: Option<f64>,
}

/// Mean course rating per instructor expertise, in first-encounter order.
/// Groups without a single course rating are omitted.
pub fn expertise_means(view: &FilteredView<'_>) -> Vec<GroupMean> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for rec in view.iter() {
        let (Some(expertise), Some(rating)) = (rec.expertise(), rec.course_rating()) else {
            continue;
        };
        groups
            .entry(expertise)
            .or_insert_with(|| {
                order.push(expertise);
                Vec::new()
            })
            .push(rating);
    }

    order
        .into_iter()
        .filter_map(|key| {
            let values = groups.remove(key)?;
            Some(GroupMean {
                key: key.to_string(),
                mean: mean(values.iter().copied())?,
                count: values.len(),
                std_dev: std_dev(&values),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{init_filter_state, RatingRange};
    use crate::data::model::EnrollmentDataset;
    use crate::data::test_fixtures::{dataset, filtered, record, whole};

    fn full_view(ds: &EnrollmentDataset) -> FilteredView<'_> {
        filtered(ds, &init_filter_state(ds, RatingRange::FULL))
    }

    /// 10 instructors × 10 records, instructor k rated k/2.
    fn hundred_records() -> EnrollmentDataset {
        let mut records = Vec::new();
        for k in 1..=10 {
            let name = format!("Teacher {k:02}");
            let teacher_id = format!("T{k}");
            for j in 0..10 {
                records.push(record(
                    &format!("X{k}-{j}"),
                    &teacher_id,
                    Some((name.as_str(), if k % 2 == 0 { "Data" } else { "Design" }, k as f64 / 2.0)),
                    Some((if j % 2 == 0 { "Tech" } else { "Art" }, "Beginner", 3.0)),
                ));
            }
        }
        dataset(records)
    }

    #[test]
    fn test_hundred_record_scenario() {
        let ds = hundred_records();
        let view = full_view(&ds);
        assert_eq!(view.len(), 100);

        let board = leaderboard(&view);
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].name, "Teacher 10");
        assert_eq!(board[9].name, "Teacher 01");
        assert!(board
            .windows(2)
            .all(|w| w[0].mean_rating >= w[1].mean_rating));
        assert_eq!(board.iter().map(|e| e.records).sum::<usize>(), view.len());

        let kpi = KpiSummary::compute(&view);
        assert_eq!(kpi.total_enrollments, 100);
        assert_eq!(kpi.distinct_instructors, 10);
        assert_eq!(kpi.mean_instructor_rating, Some(2.75));
        assert_eq!(kpi.mean_course_rating, Some(3.0));
    }

    #[test]
    fn test_empty_view_reports_undefined_means() {
        let ds = hundred_records();
        let view = filtered(&ds, &init_filter_state(&ds, RatingRange::new(4.9, 4.95)));
        assert!(view.is_empty());

        let kpi = KpiSummary::compute(&view);
        assert_eq!(kpi.mean_instructor_rating, None);
        assert_eq!(kpi.mean_course_rating, None);
        assert_eq!(kpi.total_enrollments, 0);
        assert!(leaderboard(&view).is_empty());
        assert_eq!(PivotTable::category_level_means(&view).value_range(), None);
        assert!(expertise_means(&view).is_empty());
    }

    #[test]
    fn test_blank_teacher_id_is_not_a_distinct_instructor() {
        let mut blank = record("X2", "T1", None, Some(("Tech", "Beginner", 3.0)));
        blank.transaction.teacher_id = None;
        let ds = dataset(vec![
            record("X1", "T1", Some(("Ann", "Data", 4.0)), Some(("Tech", "Beginner", 4.0))),
            blank,
        ]);
        let kpi = KpiSummary::compute(&whole(&ds));
        assert_eq!(kpi.total_enrollments, 2);
        assert_eq!(kpi.distinct_instructors, 1);
        assert_eq!(kpi.mean_course_rating, Some(3.5));
    }

    #[test]
    fn test_leaderboard_ties_keep_encounter_order() {
        let ds = dataset(vec![
            record("X1", "T1", Some(("Zed", "Data", 4.0)), Some(("Tech", "Beginner", 3.0))),
            record("X2", "T2", Some(("Amy", "Data", 4.0)), Some(("Tech", "Beginner", 3.0))),
            record("X3", "T3", Some(("Max", "Data", 4.5)), Some(("Tech", "Beginner", 3.0))),
            record("X4", "T1", Some(("Zed", "Data", 4.0)), Some(("Tech", "Beginner", 3.0))),
        ]);
        let board = leaderboard(&full_view(&ds));
        let names: Vec<&str> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Max", "Zed", "Amy"]);
        assert_eq!(board[1].records, 2);
    }

    #[test]
    fn test_leaderboard_sort_toggles() {
        let entries = vec![
            LeaderboardEntry { name: "Bo".into(), mean_rating: Some(4.5), records: 1 },
            LeaderboardEntry { name: "Ann".into(), mean_rating: Some(3.0), records: 7 },
            LeaderboardEntry { name: "Cy".into(), mean_rating: None, records: 2 },
        ];
        let sort = LeaderboardSort::default();
        let names = |rows: Vec<LeaderboardEntry>| rows.into_iter().map(|e| e.name).collect::<Vec<_>>();

        assert_eq!(names(sort.apply(&entries)), vec!["Bo", "Ann", "Cy"]);

        let asc = sort.toggled(LeaderboardColumn::Rating);
        assert!(!asc.descending);
        assert_eq!(names(asc.apply(&entries)), vec!["Cy", "Ann", "Bo"]);

        let by_name = asc.toggled(LeaderboardColumn::Name);
        assert!(!by_name.descending);
        assert_eq!(names(by_name.apply(&entries)), vec!["Ann", "Bo", "Cy"]);

        let by_records = by_name.toggled(LeaderboardColumn::Records);
        assert_eq!(names(by_records.apply(&entries)), vec!["Ann", "Cy", "Bo"]);
    }

    #[test]
    fn test_pivot_has_no_cell_for_absent_pairs() {
        let ds = dataset(vec![
            record("X1", "T1", Some(("Ann", "Data", 4.0)), Some(("Tech", "Beginner", 4.0))),
            record("X2", "T1", Some(("Ann", "Data", 4.0)), Some(("Tech", "Beginner", 3.0))),
            record("X3", "T2", Some(("Bo", "Art", 3.0)), Some(("Art", "Advanced", 2.5))),
        ]);
        let pivot = PivotTable::category_level_means(&full_view(&ds));
        assert_eq!(pivot.rows, vec!["Art", "Tech"]);
        assert_eq!(pivot.columns, vec!["Advanced", "Beginner"]);
        assert_eq!(pivot.get("Tech", "Beginner"), Some(3.5));
        assert_eq!(pivot.get("Art", "Advanced"), Some(2.5));
        assert_eq!(pivot.get("Tech", "Advanced"), None);
        assert_eq!(pivot.get("Art", "Beginner"), None);
        assert_eq!(pivot.cells.len(), 2);
        assert_eq!(pivot.value_range(), Some((2.5, 3.5)));
    }

    #[test]
    fn test_expertise_means_in_encounter_order() {
        let ds = dataset(vec![
            record("X1", "T1", Some(("Ann", "Design", 4.0)), Some(("Tech", "Beginner", 4.0))),
            record("X2", "T2", Some(("Bo", "Data", 4.0)), Some(("Tech", "Beginner", 3.0))),
            record("X3", "T1", Some(("Ann", "Design", 4.0)), Some(("Art", "Advanced", 2.0))),
        ]);
        let groups = expertise_means(&full_view(&ds));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Design");
        assert_eq!(groups[0].mean, 3.0);
        assert_eq!(groups[0].count, 2);
        assert!(groups[0].std_dev.is_some());
        assert_eq!(groups[1].key, "Data");
        assert_eq!(groups[1].std_dev, None);
    }
}
