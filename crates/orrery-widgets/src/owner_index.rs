//! Owner key to widget bucket mapping.

use orrery_core::alloc::HashMap;

use crate::owner::OwnerKey;
use crate::widget::{Widget, WidgetRef, same_widget};

/// Denormalized view of the registry grouped by owner.
///
/// Invariant: no bucket is empty once a public method returns.
pub struct OwnerIndex {
    buckets: HashMap<OwnerKey, Vec<WidgetRef>>,
}

impl OwnerIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity(capacity),
        }
    }

    /// Append `widget` to the bucket for `owner`, creating it if needed.
    pub fn insert(&mut self, owner: OwnerKey, widget: WidgetRef) {
        self.buckets.entry(owner).or_default().push(widget);
    }

    /// Remove the first occurrence of `widget` from `owner`'s bucket, deleting
    /// the bucket if that leaves it empty. Returns whether the widget was found.
    pub fn remove(&mut self, owner: OwnerKey, widget: &WidgetRef) -> bool {
        let Some(bucket) = self.buckets.get_mut(&owner) else {
            return false;
        };
        let found = match bucket.iter().position(|w| same_widget(w, widget)) {
            Some(idx) => {
                bucket.remove(idx);
                true
            }
            None => false,
        };
        if bucket.is_empty() {
            self.buckets.remove(&owner);
        }
        found
    }

    /// Detach the whole bucket for `owner`.
    pub fn take(&mut self, owner: OwnerKey) -> Option<Vec<WidgetRef>> {
        self.buckets.remove(&owner)
    }

    pub fn get(&self, owner: OwnerKey) -> Option<&[WidgetRef]> {
        self.buckets.get(&owner).map(Vec::as_slice)
    }

    pub fn contains_owner(&self, owner: OwnerKey) -> bool {
        self.buckets.contains_key(&owner)
    }

    /// Drop garbage from every bucket, then prune buckets left empty.
    /// Returns how many entries were removed.
    pub fn sweep_garbage(&mut self) -> usize {
        let mut removed = 0;
        for bucket in self.buckets.values_mut() {
            let before = bucket.len();
            bucket.retain(|w| !w.read().is_garbage());
            removed += before - bucket.len();
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());
        removed
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    pub fn owner_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn owners(&self) -> impl Iterator<Item = OwnerKey> + '_ {
        self.buckets.keys().copied()
    }
}
