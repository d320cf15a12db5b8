//! Sheet and column names of the platform workbook.
//!
//! Names are exact-match and case-sensitive.

pub const TEACHERS_SHEET: &str = "Teachers";
pub const COURSES_SHEET: &str = "Courses";
pub const TRANSACTIONS_SHEET: &str = "Transactions";

pub const TEACHER_ID: &str = "TeacherID";
pub const TEACHER_NAME: &str = "TeacherName";
pub const EXPERTISE: &str = "Expertise";
pub const YEARS_OF_EXPERIENCE: &str = "YearsOfExperience";
pub const TEACHER_RATING: &str = "TeacherRating";

pub const COURSE_ID: &str = "CourseID";
pub const COURSE_CATEGORY: &str = "CourseCategory";
pub const COURSE_LEVEL: &str = "CourseLevel";
pub const COURSE_RATING: &str = "CourseRating";

pub const TRANSACTION_ID: &str = "TransactionID";

pub const TEACHER_COLUMNS: [&str; 5] = [
    TEACHER_ID,
    TEACHER_NAME,
    EXPERTISE,
    YEARS_OF_EXPERIENCE,
    TEACHER_RATING,
];

pub const COURSE_COLUMNS: [&str; 4] = [COURSE_ID, COURSE_CATEGORY, COURSE_LEVEL, COURSE_RATING];

pub const TRANSACTION_COLUMNS: [&str; 3] = [TRANSACTION_ID, TEACHER_ID, COURSE_ID];

/// Inclusive bounds of every rating column.
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;
