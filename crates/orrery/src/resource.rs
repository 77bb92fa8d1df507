//! Type-keyed storage for engine-wide state.
//!
//! Plugins put their long-lived objects here (the widget subsystem, the task
//! pool, game-side tables) and fetch them back by type from frame hooks.

use std::any::{Any, TypeId, type_name};

use orrery_core::alloc::HashMap;

/// Marker trait for types that can be stored as engine resources.
///
/// `Send + Sync` so the engine can be moved to, or shared with, other threads.
pub trait Resource: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Resource for T {}

struct ResourceEntry {
    data: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl ResourceEntry {
    fn new<R: Resource>(resource: R) -> Self {
        Self {
            data: Box::new(resource),
            type_name: type_name::<R>(),
        }
    }

    fn into_inner<R: Resource>(self) -> Option<R> {
        self.data.downcast::<R>().ok().map(|b| *b)
    }
}

/// One instance per resource type.
///
/// # Example
///
/// ```
/// use orrery::Resources;
/// use orrery::widgets::{WidgetSubsystem, WidgetSubsystemConfig};
///
/// let mut resources = Resources::new();
/// resources.insert(WidgetSubsystem::new(
///     WidgetSubsystemConfig::default().with_widget_capacity(8),
/// ));
///
/// let widgets = resources.get::<WidgetSubsystem>().unwrap();
/// assert_eq!(widgets.config().initial_widget_capacity, 8);
/// ```
#[derive(Default)]
pub struct Resources {
    storage: HashMap<TypeId, ResourceEntry>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource, returning the one it replaced.
    pub fn insert<R: Resource>(&mut self, resource: R) -> Option<R> {
        self.storage
            .insert(TypeId::of::<R>(), ResourceEntry::new(resource))
            .and_then(ResourceEntry::into_inner)
    }

    pub fn get<R: Resource>(&self) -> Option<&R> {
        self.storage
            .get(&TypeId::of::<R>())
            .and_then(|entry| entry.data.downcast_ref())
    }

    pub fn get_mut<R: Resource>(&mut self) -> Option<&mut R> {
        self.storage
            .get_mut(&TypeId::of::<R>())
            .and_then(|entry| entry.data.downcast_mut())
    }

    pub fn remove<R: Resource>(&mut self) -> Option<R> {
        self.storage
            .remove(&TypeId::of::<R>())
            .and_then(ResourceEntry::into_inner)
    }

    pub fn contains<R: Resource>(&self) -> bool {
        self.storage.contains_key(&TypeId::of::<R>())
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Get the resource of type `R`, inserting `f()` first if there is none.
    pub fn get_or_insert_with<R: Resource>(&mut self, f: impl FnOnce() -> R) -> &mut R {
        let entry = self
            .storage
            .entry(TypeId::of::<R>())
            .or_insert_with(|| ResourceEntry::new(f()));
        // Entries are keyed by their own TypeId.
        entry
            .data
            .downcast_mut()
            .expect("resource stored under a foreign TypeId")
    }

    pub fn get_or_default<R: Resource + Default>(&mut self) -> &mut R {
        self.get_or_insert_with(R::default)
    }

    /// Names of every stored resource type (for debugging).
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.storage.values().map(|entry| entry.type_name)
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("count", &self.storage.len())
            .field("types", &self.type_names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Score(u32);

    #[test]
    fn test_insert_and_get() {
        let mut resources = Resources::new();
        resources.insert(Score(3));
        resources.insert("hello".to_string());

        assert_eq!(resources.get::<Score>(), Some(&Score(3)));
        assert_eq!(resources.get::<String>().unwrap(), "hello");
        assert_eq!(resources.len(), 2);
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut resources = Resources::new();
        assert_eq!(resources.insert(Score(1)), None);
        assert_eq!(resources.insert(Score(2)), Some(Score(1)));
        assert_eq!(resources.get::<Score>(), Some(&Score(2)));
    }

    #[test]
    fn test_get_mut_and_remove() {
        let mut resources = Resources::new();
        resources.insert(Score(10));
        resources.get_mut::<Score>().unwrap().0 += 5;

        assert_eq!(resources.remove::<Score>(), Some(Score(15)));
        assert!(!resources.contains::<Score>());
        assert!(resources.remove::<Score>().is_none());
    }

    #[test]
    fn test_get_or_insert_with_runs_once() {
        let mut resources = Resources::new();
        let mut calls = 0;

        resources.get_or_insert_with(|| {
            calls += 1;
            Score(7)
        });
        resources.get_or_insert_with(|| {
            calls += 1;
            Score(100)
        });

        assert_eq!(calls, 1);
        assert_eq!(resources.get_or_default::<Score>().0, 7);
    }

    #[test]
    fn test_type_names() {
        let mut resources = Resources::new();
        resources.insert(Score(0));
        let names: Vec<_> = resources.type_names().collect();
        assert_eq!(names, [type_name::<Score>()]);
    }
}
