//! Record builders shared by unit tests across the crate.

use std::collections::BTreeMap;

use super::filter::{filtered_indices, FilterState, FilteredView};
use super::model::{Course, EnrollmentDataset, Instructor, JoinedRecord, Transaction};

/// Build one joined record. `instructor` is `(name, expertise, rating)`,
/// `course` is `(category, level, rating)`; `None` models a left-join miss.
pub fn record(
    transaction_id: &str,
    teacher_id: &str,
    instructor: Option<(&str, &str, f64)>,
    course: Option<(&str, &str, f64)>,
) -> JoinedRecord {
    let course_id = course
        .map(|(category, level, _)| format!("{category}-{level}"))
        .unwrap_or_else(|| "C?".to_string());
    JoinedRecord {
        transaction: Transaction {
            id: Some(transaction_id.to_string()),
            teacher_id: Some(teacher_id.to_string()),
            course_id: Some(course_id.clone()),
            metadata: BTreeMap::new(),
        },
        instructor: instructor.map(|(name, expertise, rating)| Instructor {
            id: teacher_id.to_string(),
            name: name.to_string(),
            years_of_experience: None,
            expertise: Some(expertise.to_string()),
            rating: Some(rating),
        }),
        course: course.map(|(category, level, rating)| Course {
            id: course_id,
            category: Some(category.to_string()),
            level: Some(level.to_string()),
            rating: Some(rating),
        }),
    }
}

/// Same as [`record`] with a years-of-experience value on the instructor.
pub fn record_with_experience(
    transaction_id: &str,
    teacher_id: &str,
    instructor: (&str, &str, f64),
    years: f64,
    course: (&str, &str, f64),
) -> JoinedRecord {
    let mut rec = record(transaction_id, teacher_id, Some(instructor), Some(course));
    if let Some(i) = rec.instructor.as_mut() {
        i.years_of_experience = Some(years);
    }
    rec
}

pub fn dataset(records: Vec<JoinedRecord>) -> EnrollmentDataset {
    EnrollmentDataset::from_records(records)
}

/// The records of `dataset` passing `filters`, the way the dashboard builds its view.
pub fn filtered<'a>(dataset: &'a EnrollmentDataset, filters: &FilterState) -> FilteredView<'a> {
    FilteredView::from_indices(dataset, &filtered_indices(dataset, filters))
}

/// Every record of `dataset`, unfiltered.
pub fn whole(dataset: &EnrollmentDataset) -> FilteredView<'_> {
    let indices: Vec<usize> = (0..dataset.len()).collect();
    FilteredView::from_indices(dataset, &indices)
}
