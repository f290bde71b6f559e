//! Association resolution strategy.

use std::ops::BitOr;

/// Bitset deciding how association fields are resolved during a merge.
///
/// `FIND` replaces the relation with an instance fetched from the store by
/// its pivot value. `MERGE` recursively merges the nested data into the
/// current related instance (constructing one if the slot is empty). Both
/// may be active at once; for a single-valued association `FIND` runs
/// first, so `MERGE` then operates on the freshly fetched instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssociationStrategy(u8);

impl AssociationStrategy {
    /// Recursively merge nested data into the related instance.
    pub const MERGE: Self = Self(0b01);

    /// Replace the relation with a store lookup by pivot value.
    pub const FIND: Self = Self(0b10);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for AssociationStrategy {
    fn default() -> Self {
        Self(Self::MERGE.0 | Self::FIND.0)
    }
}

impl BitOr for AssociationStrategy {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_both_strategies() {
        let strategy = AssociationStrategy::default();
        assert!(strategy.contains(AssociationStrategy::MERGE));
        assert!(strategy.contains(AssociationStrategy::FIND));
    }

    #[test]
    fn bitset_composition() {
        let merge_only = AssociationStrategy::MERGE;
        assert!(merge_only.contains(AssociationStrategy::MERGE));
        assert!(!merge_only.contains(AssociationStrategy::FIND));

        let both = AssociationStrategy::MERGE | AssociationStrategy::FIND;
        assert_eq!(both, AssociationStrategy::default());

        assert!(!AssociationStrategy::empty().contains(AssociationStrategy::MERGE));
        // The empty set is a subset of anything.
        assert!(merge_only.contains(AssociationStrategy::empty()));
    }
}
