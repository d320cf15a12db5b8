use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single raw cell read from any sheet source
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell, before schema validation.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date or date-time, kept as text.
    Date(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Whether the cell carries no value (blank cell, JSON null, empty CSV field).
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Try to interpret the value as an `f64`. Numeric text is accepted
    /// because CSV and hand-edited sheets often store numbers as strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Render the cell as a join key. Spreadsheets store integers as floats,
    /// so `7.0` and `7` both become `"7"`.
    pub fn as_key(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self {
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => {
                Some(format!("{}", *v as i64))
            }
            CellValue::String(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Render the cell as free text, `None` when blank.
    pub fn as_text(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self {
            CellValue::String(s) => Some(s.trim().to_string()),
            other => other.as_key(),
        }
    }
}

// ---------------------------------------------------------------------------
// SheetTable – one raw sheet, as read by a source
// ---------------------------------------------------------------------------

/// A raw sheet: header names plus rows of cells, in file order.
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Position of an exact-match, case-sensitive column name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Cell at `(row, col)`, `Null` when the row is shorter than the header.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// Typed records – one per validated sheet row
// ---------------------------------------------------------------------------

/// A row of the `Teachers` sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Instructor {
    pub id: String,
    pub name: String,
    pub years_of_experience: Option<f64>,
    pub expertise: Option<String>,
    /// In `[0.0, 5.0]` when present.
    pub rating: Option<f64>,
}

/// A row of the `Courses` sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: String,
    pub category: Option<String>,
    pub level: Option<String>,
    /// In `[0.0, 5.0]` when present.
    pub rating: Option<f64>,
}

/// A row of the `Transactions` sheet: one enrollment event. Blank cells
/// stay `None`; a blank foreign key simply matches nothing in the join.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<String>,
    pub teacher_id: Option<String>,
    pub course_id: Option<String>,
    /// Enrollment metadata columns beyond the join keys: column_name → value.
    pub metadata: BTreeMap<String, CellValue>,
}

// ---------------------------------------------------------------------------
// JoinedRecord – one transaction enriched with its instructor and course
// ---------------------------------------------------------------------------

/// `transaction ⟕ instructor ⟕ course`. Either side is `None` when the
/// foreign key has no match.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub transaction: Transaction,
    pub instructor: Option<Instructor>,
    pub course: Option<Course>,
}

impl JoinedRecord {
    pub fn teacher_id(&self) -> Option<&str> {
        self.transaction.teacher_id.as_deref()
    }

    pub fn teacher_name(&self) -> Option<&str> {
        self.instructor.as_ref().map(|i| i.name.as_str())
    }

    pub fn expertise(&self) -> Option<&str> {
        self.instructor.as_ref()?.expertise.as_deref()
    }

    pub fn years_of_experience(&self) -> Option<f64> {
        self.instructor.as_ref()?.years_of_experience
    }

    pub fn teacher_rating(&self) -> Option<f64> {
        self.instructor.as_ref()?.rating
    }

    pub fn category(&self) -> Option<&str> {
        self.course.as_ref()?.category.as_deref()
    }

    pub fn level(&self) -> Option<&str> {
        self.course.as_ref()?.level.as_deref()
    }

    pub fn course_rating(&self) -> Option<f64> {
        self.course.as_ref()?.rating
    }
}

// ---------------------------------------------------------------------------
// EnrollmentDataset – the complete joined dataset
// ---------------------------------------------------------------------------

/// The full joined dataset with pre-computed filter option indices.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentDataset {
    /// One record per transaction row, in sheet order.
    pub records: Vec<JoinedRecord>,
    /// Sorted distinct expertise values (missing values excluded).
    pub expertise_values: BTreeSet<String>,
    /// Sorted distinct course categories (missing values excluded).
    pub category_values: BTreeSet<String>,
    /// Whether any record lacks an expertise (unmatched instructor or blank cell).
    pub has_missing_expertise: bool,
    /// Whether any record lacks a course category.
    pub has_missing_category: bool,
}

impl EnrollmentDataset {
    /// Build the option indices from the joined records.
    pub fn from_records(records: Vec<JoinedRecord>) -> Self {
        let mut expertise_values = BTreeSet::new();
        let mut category_values = BTreeSet::new();
        let mut has_missing_expertise = false;
        let mut has_missing_category = false;

        for rec in &records {
            match rec.expertise() {
                Some(e) => {
                    expertise_values.insert(e.to_string());
                }
                None => has_missing_expertise = true,
            }
            match rec.category() {
                Some(c) => {
                    category_values.insert(c.to_string());
                }
                None => has_missing_category = true,
            }
        }

        EnrollmentDataset {
            records,
            expertise_values,
            category_values,
            has_missing_expertise,
            has_missing_category,
        }
    }

    /// Number of joined records (equals the transaction row count).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_float_key_matches_integer_key() {
        assert_eq!(CellValue::Float(7.0).as_key(), Some("7".to_string()));
        assert_eq!(CellValue::Integer(7).as_key(), Some("7".to_string()));
        assert_eq!(CellValue::String(" T07 ".into()).as_key(), Some("T07".to_string()));
        assert_eq!(CellValue::Float(7.5).as_key(), Some("7.5".to_string()));
    }

    #[test]
    fn test_blank_cells_are_null() {
        assert!(CellValue::Null.is_null());
        assert!(CellValue::String("   ".into()).is_null());
        assert_eq!(CellValue::String("".into()).as_key(), None);
        assert_eq!(CellValue::Null.as_text(), None);
    }

    #[test]
    fn test_numeric_text_parses_as_f64() {
        assert_eq!(CellValue::String("4.25".into()).as_f64(), Some(4.25));
        assert_eq!(CellValue::String("high".into()).as_f64(), None);
        assert_eq!(CellValue::Bool(true).as_f64(), None);
    }

    #[test]
    fn test_missing_cell_reads_as_null() {
        let mut table = SheetTable::new("Teachers", vec!["A".into(), "B".into()]);
        table.rows.push(vec![CellValue::Integer(1)]);
        assert_eq!(table.cell(0, 0), &CellValue::Integer(1));
        assert_eq!(table.cell(0, 1), &CellValue::Null);
        assert_eq!(table.column_index("B"), Some(1));
        assert_eq!(table.column_index("b"), None);
    }

    #[test]
    fn test_dataset_indexes_distinct_options() {
        let rec = |expertise: Option<&str>, category: Option<&str>| JoinedRecord {
            transaction: Transaction {
                id: Some("X".into()),
                teacher_id: Some("T".into()),
                course_id: Some("C".into()),
                metadata: BTreeMap::new(),
            },
            instructor: Some(Instructor {
                id: "T".into(),
                name: "Ann".into(),
                years_of_experience: None,
                expertise: expertise.map(str::to_string),
                rating: Some(4.0),
            }),
            course: Some(Course {
                id: "C".into(),
                category: category.map(str::to_string),
                level: None,
                rating: None,
            }),
        };
        let ds = EnrollmentDataset::from_records(vec![
            rec(Some("Data"), Some("Tech")),
            rec(Some("Art"), None),
            rec(None, Some("Tech")),
        ]);
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.expertise_values.iter().collect::<Vec<_>>(),
            vec!["Art", "Data"]
        );
        assert_eq!(ds.category_values.len(), 1);
        assert!(ds.has_missing_expertise);
        assert!(ds.has_missing_category);
    }
}
