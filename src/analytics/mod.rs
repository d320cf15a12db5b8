//! Aggregation and derivation over a filtered view: KPI scalars, the
//! leaderboard, the category × level pivot, expertise means, rating tiers,
//! and the bundled [`report::DashboardReport`].

pub mod aggregate;
pub mod report;
pub mod stats;
pub mod tier;
