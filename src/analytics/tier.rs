use std::fmt;

use crate::data::filter::FilteredView;

/// Ordinal bucket of an instructor rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstructorTier {
    Low,
    Mid,
    High,
}

impl InstructorTier {
    /// Canonical display order.
    pub const ALL: [InstructorTier; 3] = [InstructorTier::Low, InstructorTier::Mid, InstructorTier::High];

    /// Bin a rating into `(0, 3]`, `(3, 4]`, `(4, 5]`.
    ///
    /// A rating of exactly 0 falls in no bin and yields `None`, as does
    /// anything outside `(0, 5]`. Callers count those as unclassified rather
    /// than folding them into `Low`.
    pub fn from_rating(rating: f64) -> Option<Self> {
        if rating > 0.0 && rating <= 3.0 {
            Some(InstructorTier::Low)
        } else if rating > 3.0 && rating <= 4.0 {
            Some(InstructorTier::Mid)
        } else if rating > 4.0 && rating <= 5.0 {
            Some(InstructorTier::High)
        } else {
            None
        }
    }

    fn index(self) -> usize {
        match self {
            InstructorTier::Low => 0,
            InstructorTier::Mid => 1,
            InstructorTier::High => 2,
        }
    }
}

impl fmt::Display for InstructorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstructorTier::Low => "Low",
            InstructorTier::Mid => "Mid",
            InstructorTier::High => "High",
        };
        write!(f, "{label}")
    }
}

/// Enrollment counts per tier for one filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TierCounts {
    counts: [usize; 3],
    /// Records whose rating is missing or falls in no bin.
    pub unclassified: usize,
}

impl TierCounts {
    pub fn count(view: &FilteredView<'_>) -> Self {
        let mut tiers = TierCounts::default();
        for rec in view.iter() {
            match rec.teacher_rating().and_then(InstructorTier::from_rating) {
                Some(tier) => tiers.counts[tier.index()] += 1,
                None => tiers.unclassified += 1,
            }
        }
        if tiers.unclassified > 0 {
            log::debug!("{} records fall outside every rating tier", tiers.unclassified);
        }
        tiers
    }

    pub fn get(&self, tier: InstructorTier) -> usize {
        self.counts[tier.index()]
    }

    /// Sum over the three tiers (unclassified excluded).
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Non-empty tiers in canonical order Low, Mid, High.
    pub fn distribution(&self) -> Vec<(InstructorTier, usize)> {
        InstructorTier::ALL
            .iter()
            .map(|&t| (t, self.get(t)))
            .filter(|&(_, n)| n > 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::{dataset, record, whole};

    #[test]
    fn test_bins_are_upper_closed() {
        assert_eq!(InstructorTier::from_rating(0.01), Some(InstructorTier::Low));
        assert_eq!(InstructorTier::from_rating(3.0), Some(InstructorTier::Low));
        assert_eq!(InstructorTier::from_rating(3.01), Some(InstructorTier::Mid));
        assert_eq!(InstructorTier::from_rating(4.0), Some(InstructorTier::Mid));
        assert_eq!(InstructorTier::from_rating(4.5), Some(InstructorTier::High));
        assert_eq!(InstructorTier::from_rating(5.0), Some(InstructorTier::High));
    }

    #[test]
    fn test_zero_rating_is_unclassified() {
        assert_eq!(InstructorTier::from_rating(0.0), None);
        assert_eq!(InstructorTier::from_rating(5.5), None);
    }

    #[test]
    fn test_counts_partition_the_view() {
        let ds = dataset(vec![
            record("X1", "T1", Some(("Ann", "Data", 0.0)), None),
            record("X2", "T2", Some(("Bo", "Data", 2.0)), None),
            record("X3", "T3", Some(("Cy", "Data", 3.5)), None),
            record("X4", "T3", Some(("Cy", "Data", 3.5)), None),
            record("X5", "T4", Some(("Di", "Data", 4.8)), None),
        ]);
        let view = whole(&ds);
        let tiers = TierCounts::count(&view);

        assert_eq!(tiers.get(InstructorTier::Low), 1);
        assert_eq!(tiers.get(InstructorTier::Mid), 2);
        assert_eq!(tiers.get(InstructorTier::High), 1);
        assert_eq!(tiers.unclassified, 1);
        assert_eq!(tiers.total() + tiers.unclassified, view.len());
    }

    #[test]
    fn test_distribution_skips_empty_tiers() {
        let ds = dataset(vec![
            record("X1", "T1", Some(("Ann", "Data", 4.2)), None),
            record("X2", "T2", Some(("Bo", "Data", 1.0)), None),
        ]);
        let view = whole(&ds);
        let dist = TierCounts::count(&view).distribution();
        assert_eq!(dist, vec![(InstructorTier::Low, 1), (InstructorTier::High, 1)]);

        let none = dataset(Vec::new());
        let empty = whole(&none);
        let tiers = TierCounts::count(&empty);
        assert_eq!(tiers.total(), 0);
        assert!(tiers.distribution().is_empty());
    }
}
