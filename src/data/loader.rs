use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::error::DataSourceError;
use super::model::{CellValue, Course, EnrollmentDataset, Instructor, JoinedRecord, SheetTable, Transaction};
use super::schema::*;
use super::source::{open_source, SheetSource};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the platform workbook at `path` and join it into one record per
/// transaction.
pub fn load_dataset(path: &Path) -> Result<EnrollmentDataset, DataSourceError> {
    let mut source = open_source(path)?;
    load_from_source(source.as_mut())
}

/// Read the three sheets from `source`, validate them, and perform
/// `Transactions ⟕ Teachers ON TeacherID ⟕ Courses ON CourseID`.
pub fn load_from_source(source: &mut dyn SheetSource) -> Result<EnrollmentDataset, DataSourceError> {
    log::info!("loading platform data from {}", source.describe());

    let instructors = parse_instructors(&source.read_sheet(TEACHERS_SHEET)?)?;
    let courses = parse_courses(&source.read_sheet(COURSES_SHEET)?)?;
    let transactions = parse_transactions(&source.read_sheet(TRANSACTIONS_SHEET)?)?;

    let instructor_index = index_by_key(&instructors, TEACHERS_SHEET, |i| &i.id)?;
    let course_index = index_by_key(&courses, COURSES_SHEET, |c| &c.id)?;

    let mut unmatched_instructors = 0usize;
    let mut unmatched_courses = 0usize;

    let records: Vec<JoinedRecord> = transactions
        .into_iter()
        .map(|transaction| {
            let instructor = transaction
                .teacher_id
                .as_deref()
                .and_then(|id| instructor_index.get(id))
                .map(|i| (*i).clone());
            let course = transaction
                .course_id
                .as_deref()
                .and_then(|id| course_index.get(id))
                .map(|c| (*c).clone());
            if instructor.is_none() {
                unmatched_instructors += 1;
            }
            if course.is_none() {
                unmatched_courses += 1;
            }
            JoinedRecord {
                transaction,
                instructor,
                course,
            }
        })
        .collect();

    if unmatched_instructors > 0 {
        log::warn!("{unmatched_instructors} transactions have a blank or unknown {TEACHER_ID}");
    }
    if unmatched_courses > 0 {
        log::warn!("{unmatched_courses} transactions have a blank or unknown {COURSE_ID}");
    }

    let dataset = EnrollmentDataset::from_records(records);
    log::info!(
        "joined {} transactions against {} instructors and {} courses",
        dataset.len(),
        instructors.len(),
        courses.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Join index
// ---------------------------------------------------------------------------

/// Map key → row, rejecting duplicates so the left join is one-to-one.
fn index_by_key<'a, T>(
    rows: &'a [T],
    sheet: &str,
    key: impl Fn(&T) -> &String,
) -> Result<HashMap<&'a str, &'a T>, DataSourceError> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        let k = key(row).as_str();
        if index.insert(k, row).is_some() {
            return Err(DataSourceError::DuplicateKey {
                sheet: sheet.to_string(),
                key: k.to_string(),
            });
        }
    }
    Ok(index)
}

// ---------------------------------------------------------------------------
// Sheet → typed records
// ---------------------------------------------------------------------------

fn parse_instructors(table: &SheetTable) -> Result<Vec<Instructor>, DataSourceError> {
    let cols = SheetColumns::resolve(table, &TEACHER_COLUMNS)?;
    cols.data_rows()
        .map(|row| {
            Ok(Instructor {
                id: cols.key(row, TEACHER_ID)?,
                name: cols.required_text(row, TEACHER_NAME)?,
                years_of_experience: cols.number(row, YEARS_OF_EXPERIENCE)?,
                expertise: cols.text(row, EXPERTISE),
                rating: cols.rating(row, TEACHER_RATING)?,
            })
        })
        .collect()
}

fn parse_courses(table: &SheetTable) -> Result<Vec<Course>, DataSourceError> {
    let cols = SheetColumns::resolve(table, &COURSE_COLUMNS)?;
    cols.data_rows()
        .map(|row| {
            Ok(Course {
                id: cols.key(row, COURSE_ID)?,
                category: cols.text(row, COURSE_CATEGORY),
                level: cols.text(row, COURSE_LEVEL),
                rating: cols.rating(row, COURSE_RATING)?,
            })
        })
        .collect()
}

fn parse_transactions(table: &SheetTable) -> Result<Vec<Transaction>, DataSourceError> {
    let cols = SheetColumns::resolve(table, &TRANSACTION_COLUMNS)?;
    let metadata_cols: Vec<(usize, &String)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty() && !TRANSACTION_COLUMNS.iter().any(|c| *c == h.as_str()))
        .collect();

    let transactions = cols
        .data_rows()
        .map(|row| {
            let metadata: BTreeMap<String, CellValue> = metadata_cols
                .iter()
                .map(|(idx, name)| ((*name).clone(), table.cell(row, *idx).clone()))
                .collect();
            Transaction {
                id: cols.optional_key(row, TRANSACTION_ID),
                teacher_id: cols.optional_key(row, TEACHER_ID),
                course_id: cols.optional_key(row, COURSE_ID),
                metadata,
            }
        })
        .collect();
    Ok(transactions)
}

/// Resolved column positions for one sheet plus typed cell accessors.
struct SheetColumns<'a> {
    table: &'a SheetTable,
    positions: HashMap<&'static str, usize>,
}

impl<'a> SheetColumns<'a> {
    fn resolve(table: &'a SheetTable, required: &[&'static str]) -> Result<Self, DataSourceError> {
        let mut positions = HashMap::with_capacity(required.len());
        for &column in required {
            let idx = table
                .column_index(column)
                .ok_or_else(|| DataSourceError::MissingColumn {
                    sheet: table.name.clone(),
                    column: column.to_string(),
                })?;
            positions.insert(column, idx);
        }
        Ok(Self { table, positions })
    }

    /// Row indices, skipping rows where every cell is blank.
    fn data_rows(&self) -> impl Iterator<Item = usize> + 'a {
        let table = self.table;
        (0..table.rows.len()).filter(move |&r| !table.rows[r].iter().all(CellValue::is_null))
    }

    fn cell(&self, row: usize, column: &'static str) -> &'a CellValue {
        let idx = self.positions.get(column).copied().unwrap_or(usize::MAX);
        self.table.cell(row, idx)
    }

    fn invalid(&self, row: usize, column: &str, expected: &'static str, found: &CellValue) -> DataSourceError {
        DataSourceError::InvalidCell {
            sheet: self.table.name.clone(),
            // 1-based, counting the header line, to match what a spreadsheet shows.
            row: row + 2,
            column: column.to_string(),
            expected,
            found: found.to_string(),
        }
    }

    fn key(&self, row: usize, column: &'static str) -> Result<String, DataSourceError> {
        let cell = self.cell(row, column);
        cell.as_key()
            .ok_or_else(|| self.invalid(row, column, "a non-empty identifier", cell))
    }

    /// Transaction-side identifiers are optional: a blank foreign key joins to nothing.
    fn optional_key(&self, row: usize, column: &'static str) -> Option<String> {
        self.cell(row, column).as_key()
    }

    fn required_text(&self, row: usize, column: &'static str) -> Result<String, DataSourceError> {
        let cell = self.cell(row, column);
        cell.as_text()
            .ok_or_else(|| self.invalid(row, column, "non-empty text", cell))
    }

    fn text(&self, row: usize, column: &'static str) -> Option<String> {
        self.cell(row, column).as_text()
    }

    fn number(&self, row: usize, column: &'static str) -> Result<Option<f64>, DataSourceError> {
        let cell = self.cell(row, column);
        if cell.is_null() {
            return Ok(None);
        }
        match cell.as_f64() {
            Some(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.invalid(row, column, "a number", cell)),
        }
    }

    fn rating(&self, row: usize, column: &'static str) -> Result<Option<f64>, DataSourceError> {
        let value = self.number(row, column)?;
        match value {
            Some(v) if !(RATING_MIN..=RATING_MAX).contains(&v) => Err(DataSourceError::RatingOutOfRange {
                sheet: self.table.name.clone(),
                row: row + 2,
                column: column.to_string(),
                value: v,
            }),
            _ => Ok(value),
        }
    }
}
