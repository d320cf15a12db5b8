/// Data layer: sources, typed records, the join, caching, and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .json / dir of .csv|.parquet
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  read named sheets → SheetTable (raw cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  validate columns, Transactions ⟕ Teachers ⟕ Courses
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ EnrollmentDataset │  Vec<JoinedRecord>, option indices (cached once)
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  expertise / category / rating → FilteredView
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
pub mod source;

#[cfg(test)]
pub(crate) mod test_fixtures;
