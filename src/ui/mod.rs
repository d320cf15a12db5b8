//! egui rendering. Panels read [`crate::state::AppState`] and call back into
//! it on control changes; charts only read the current report.

pub mod panels;
pub mod plot;

pub const WINDOW_TITLE: &str = "EduPro Instructor Analytics";
pub const PAGE_TITLE: &str = "EduPro Instructor Performance & Course Quality Dashboard";
