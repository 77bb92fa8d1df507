//! Owner keys for grouping widgets under a game-side object.

use std::fmt;

use orrery_core::alloc::sparse_set::IndexSlot;

/// Opaque, generation-checked key identifying the object that owns a group of widgets.
///
/// Owner keys are usually minted from the [`IndexSlot`] an entity got when it
/// was pushed into a `SparseSet`. When that slot is recycled the generation
/// changes, so widgets grouped under a destroyed entity can never be found
/// through the key of the entity that replaced it.
///
/// Ownership is a back-reference for lookup only: the widget subsystem never
/// keeps the owner alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerKey(IndexSlot);

impl OwnerKey {
    pub const fn new(slot: IndexSlot) -> Self {
        Self(slot)
    }

    pub const fn slot(&self) -> IndexSlot {
        self.0
    }
}

impl From<IndexSlot> for OwnerKey {
    fn from(slot: IndexSlot) -> Self {
        Self(slot)
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerKey({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::alloc::sparse_set::SparseSet;

    #[test]
    fn test_recycled_slot_yields_distinct_key() {
        let mut entities = SparseSet::new();
        let first = OwnerKey::from(entities.push("coin"));
        entities.remove(first.slot());
        let second = OwnerKey::from(entities.push("player"));

        assert_eq!(first.slot().index(), second.slot().index());
        assert_ne!(first, second);
    }
}
