//! The authoritative, render-ordered widget list.

use orrery_core::profiling::profile_function;

use crate::widget::{Widget, WidgetRef, same_widget};

/// Ordered collection of every registered widget.
///
/// Order only matters for dispatch: after [`sort_if_dirty`](Self::sort_if_dirty)
/// it is ascending by z-order, so earlier entries are drawn first.
pub struct WidgetRegistry {
    widgets: Vec<WidgetRef>,
    needs_sort: bool,
}

impl WidgetRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            widgets: Vec::with_capacity(capacity),
            needs_sort: false,
        }
    }

    /// Append without deduplication and mark the order stale.
    pub fn push(&mut self, widget: WidgetRef) {
        self.widgets.push(widget);
        self.needs_sort = true;
    }

    /// Remove the first entry that is `widget`. Returns whether one was found.
    pub fn remove(&mut self, widget: &WidgetRef) -> bool {
        match self.position(widget) {
            Some(idx) => {
                self.widgets.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn position(&self, widget: &WidgetRef) -> Option<usize> {
        self.widgets.iter().position(|w| same_widget(w, widget))
    }

    pub fn contains(&self, widget: &WidgetRef) -> bool {
        self.position(widget).is_some()
    }

    /// First widget whose name matches, in current order.
    pub fn find_by_name(&self, name: &str) -> Option<WidgetRef> {
        self.widgets
            .iter()
            .find(|w| w.read().name() == name)
            .cloned()
    }

    pub fn mark_dirty(&mut self) {
        self.needs_sort = true;
    }

    pub fn needs_sort(&self) -> bool {
        self.needs_sort
    }

    /// Sort ascending by z-order if anything invalidated the order since the
    /// last sort. Equal z-orders keep their relative order.
    ///
    /// Returns whether a sort pass ran.
    pub fn sort_if_dirty(&mut self) -> bool {
        if !self.needs_sort {
            return false;
        }
        profile_function!();
        if !self.widgets.is_empty() {
            self.widgets.sort_by_cached_key(|w| w.read().z_order());
        }
        self.needs_sort = false;
        true
    }

    /// Drop every entry flagged garbage. Returns how many were removed.
    pub fn sweep_garbage(&mut self) -> usize {
        let before = self.widgets.len();
        self.widgets.retain(|w| !w.read().is_garbage());
        before - self.widgets.len()
    }

    pub fn clear(&mut self) {
        self.widgets.clear();
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WidgetRef> {
        self.widgets.iter()
    }

    pub fn snapshot(&self) -> Vec<WidgetRef> {
        self.widgets.clone()
    }

    pub(crate) fn reset(&mut self) {
        self.widgets.clear();
        self.needs_sort = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{Widget, WidgetState, widget_ref};

    struct Tag {
        state: WidgetState,
    }

    impl Widget for Tag {
        fn state(&self) -> &WidgetState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut WidgetState {
            &mut self.state
        }
    }

    fn tag(name: &str, z: i32) -> WidgetRef {
        let mut state = WidgetState::new(name);
        state.set_z_order(z);
        widget_ref(Tag { state })
    }

    fn names(registry: &WidgetRegistry) -> Vec<String> {
        registry.iter().map(|w| w.read().name().to_string()).collect()
    }

    #[test]
    fn test_sort_only_when_dirty() {
        let mut registry = WidgetRegistry::with_capacity(4);
        assert!(!registry.sort_if_dirty());

        registry.push(tag("high", 9));
        registry.push(tag("low", -2));
        assert!(registry.needs_sort());
        assert!(registry.sort_if_dirty());
        assert_eq!(names(&registry), ["low", "high"]);

        assert!(!registry.needs_sort());
        assert!(!registry.sort_if_dirty());
    }

    #[test]
    fn test_sort_is_stable_for_equal_z() {
        let mut registry = WidgetRegistry::with_capacity(4);
        registry.push(tag("b", 1));
        registry.push(tag("first", 0));
        registry.push(tag("second", 0));
        registry.push(tag("third", 0));
        registry.sort_if_dirty();
        assert_eq!(names(&registry), ["first", "second", "third", "b"]);
    }

    #[test]
    fn test_remove_only_first_duplicate() {
        let mut registry = WidgetRegistry::with_capacity(2);
        let w = tag("dup", 0);
        registry.push(w.clone());
        registry.push(w.clone());

        assert!(registry.remove(&w));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove(&w));
        assert!(!registry.remove(&w));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sweep_garbage_counts_removed() {
        let mut registry = WidgetRegistry::with_capacity(3);
        let dead = tag("dead", 0);
        registry.push(tag("alive", 0));
        registry.push(dead.clone());
        dead.write().mark_as_garbage();

        assert_eq!(registry.sweep_garbage(), 1);
        assert_eq!(names(&registry), ["alive"]);
        assert!(!registry.contains(&dead));
    }
}
