//! The widget layer manager.

use std::sync::mpsc::{self, Receiver};

use orrery_core::profiling::{profile_function, profile_scope};
use parking_lot::Mutex;

use crate::command::{WidgetCommand, WidgetCommands};
use crate::config::WidgetSubsystemConfig;
use crate::owner::OwnerKey;
use crate::owner_index::OwnerIndex;
use crate::phase::{FramePhase, PhaseTracker};
use crate::registry::WidgetRegistry;
use crate::widget::{Widget, WidgetRef};

/// Owns every on-screen widget, groups them by owner, orders them by z-order
/// and reclaims the ones flagged garbage.
///
/// One instance per application, created explicitly (usually by
/// `WidgetPlugin`, which stores it as an engine resource) and driven once per
/// frame through [`begin_frame`](Self::begin_frame), [`update`](Self::update),
/// [`render`](Self::render) and [`end_frame`](Self::end_frame), or all four
/// at once with [`run_frame`](Self::run_frame).
///
/// Malformed calls never fail: removing an unknown widget or owner, or
/// looking up a missing name, is a no-op or an empty result.
///
/// # Example
///
/// ```
/// use orrery_widgets::{Widget, WidgetRef, WidgetState, WidgetSubsystem, widget_ref};
///
/// struct Panel(WidgetState);
///
/// impl Widget for Panel {
///     fn state(&self) -> &WidgetState { &self.0 }
///     fn state_mut(&mut self) -> &mut WidgetState { &mut self.0 }
/// }
///
/// let mut widgets = WidgetSubsystem::default();
/// widgets.start_up();
///
/// let top: WidgetRef = widget_ref(Panel(WidgetState::new("top")));
/// let bottom: WidgetRef = widget_ref(Panel(WidgetState::new("bottom")));
/// widgets.add_widget(top, 10);
/// widgets.add_widget(bottom, -1);
///
/// widgets.run_frame();
///
/// let order: Vec<_> = widgets
///     .all_widgets()
///     .iter()
///     .map(|w| w.read().name().to_string())
///     .collect();
/// assert_eq!(order, ["bottom", "top"]);
/// ```
pub struct WidgetSubsystem {
    config: WidgetSubsystemConfig,
    registry: WidgetRegistry,
    owners: OwnerIndex,
    viewport: Option<WidgetRef>,
    phase: PhaseTracker,
    commands: WidgetCommands,
    pending: Mutex<Receiver<WidgetCommand>>,
}

impl WidgetSubsystem {
    pub fn new(config: WidgetSubsystemConfig) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            config,
            registry: WidgetRegistry::with_capacity(config.initial_widget_capacity),
            owners: OwnerIndex::with_capacity(config.initial_owner_capacity),
            viewport: None,
            phase: PhaseTracker::new(),
            commands: WidgetCommands::new(sender),
            pending: Mutex::new(receiver),
        }
    }

    pub fn config(&self) -> &WidgetSubsystemConfig {
        &self.config
    }

    // Lifecycle

    /// Reset to an empty subsystem: no widgets, no owners, no viewport,
    /// nothing queued, no pending sort.
    pub fn start_up(&mut self) {
        self.registry.reset();
        self.owners.clear();
        self.viewport = None;
        self.phase.reset();
        let dropped = self.pending.get_mut().try_iter().count();
        tracing::debug!(
            capacity = self.config.initial_widget_capacity,
            dropped_commands = dropped,
            "widget subsystem started"
        );
    }

    /// Release every widget reference the subsystem holds, including those
    /// in commands that were queued but never applied.
    pub fn shut_down(&mut self) {
        let count = self.registry.len();
        self.remove_all_widgets();
        self.viewport = None;
        let dropped = self.pending.get_mut().try_iter().count();
        tracing::debug!(
            released = count,
            dropped_commands = dropped,
            "widget subsystem shut down"
        );
    }

    // Registry

    /// Register `widget` at `z_order`. Adding the same widget twice registers
    /// it twice.
    pub fn add_widget(&mut self, widget: WidgetRef, z_order: i32) {
        {
            let mut w = widget.write();
            w.set_z_order(z_order);
            tracing::trace!(widget = w.name(), z_order, "add widget");
        }
        self.registry.push(widget);
    }

    /// Register `widget` at `z_order` and group it under `owner`.
    pub fn add_widget_to_entity(&mut self, widget: WidgetRef, owner: OwnerKey, z_order: i32) {
        {
            let mut w = widget.write();
            w.set_owner(Some(owner));
            w.set_z_order(z_order);
            tracing::trace!(widget = w.name(), %owner, z_order, "add owned widget");
        }
        self.owners.insert(owner, widget.clone());
        self.registry.push(widget);
    }

    /// Unregister the first registry entry that is `widget`, and drop it from
    /// its owner's bucket. Unknown widgets are ignored.
    pub fn remove_widget(&mut self, widget: &WidgetRef) {
        let owner = widget.read().owner();
        let removed = self.registry.remove(widget);
        if let Some(owner) = owner {
            self.owners.remove(owner, widget);
        }
        if removed {
            tracing::trace!(widget = widget.read().name(), "removed widget");
        }
    }

    /// Unregister every widget grouped under `owner` and forget the owner.
    ///
    /// Call this when the owning entity is destroyed.
    pub fn remove_all_widgets_from_entity(&mut self, owner: OwnerKey) {
        let Some(bucket) = self.owners.take(owner) else {
            return;
        };
        for widget in &bucket {
            self.registry.remove(widget);
        }
        tracing::debug!(%owner, count = bucket.len(), "removed widgets for owner");
    }

    /// Drop every registered widget and owner bucket. The viewport anchor is kept.
    pub fn remove_all_widgets(&mut self) {
        self.registry.clear();
        self.owners.clear();
    }

    /// First registered widget named `name`, in current render order.
    pub fn find_widget_by_name(&self, name: &str) -> Option<WidgetRef> {
        self.registry.find_by_name(name)
    }

    /// Snapshot of the widgets grouped under `owner`; empty if the owner is unknown.
    pub fn widgets_by_owner(&self, owner: OwnerKey) -> Vec<WidgetRef> {
        self.owners
            .get(owner)
            .map(<[WidgetRef]>::to_vec)
            .unwrap_or_default()
    }

    /// Snapshot of the registry in its current order.
    pub fn all_widgets(&self) -> Vec<WidgetRef> {
        self.registry.snapshot()
    }

    pub fn contains_widget(&self, widget: &WidgetRef) -> bool {
        self.registry.contains(widget)
    }

    pub fn widget_count(&self) -> usize {
        self.registry.len()
    }

    pub fn has_owner(&self, owner: OwnerKey) -> bool {
        self.owners.contains_owner(owner)
    }

    pub fn owner_count(&self) -> usize {
        self.owners.owner_count()
    }

    /// Change a widget's z-order and schedule a resort for the next update.
    pub fn set_widget_z_order(&mut self, widget: &WidgetRef, z_order: i32) {
        widget.write().set_z_order(z_order);
        self.registry.mark_dirty();
    }

    /// Whether the next update will resort the registry.
    pub fn is_sort_pending(&self) -> bool {
        self.registry.needs_sort()
    }

    // Viewport anchor

    /// Designate the main-surface widget. It does not need to be registered.
    pub fn set_viewport_widget(&mut self, widget: WidgetRef) {
        self.viewport = Some(widget);
    }

    pub fn viewport_widget(&self) -> Option<WidgetRef> {
        self.viewport.clone()
    }

    pub fn clear_viewport_widget(&mut self) {
        self.viewport = None;
    }

    // Deferred commands

    /// Producer handle for queuing mutations from other threads or from
    /// inside widget callbacks.
    pub fn commands(&self) -> WidgetCommands {
        self.commands.clone()
    }

    /// Apply every queued command in send order. Returns how many were applied.
    pub fn apply_pending_commands(&mut self) -> usize {
        let queued: Vec<WidgetCommand> = self.pending.get_mut().try_iter().collect();
        let count = queued.len();
        for command in queued {
            self.apply_command(command);
        }
        count
    }

    fn apply_command(&mut self, command: WidgetCommand) {
        match command {
            WidgetCommand::Add { widget, z_order } => self.add_widget(widget, z_order),
            WidgetCommand::AddToEntity {
                widget,
                owner,
                z_order,
            } => self.add_widget_to_entity(widget, owner, z_order),
            WidgetCommand::Remove(widget) => self.remove_widget(&widget),
            WidgetCommand::RemoveAllFromEntity(owner) => {
                self.remove_all_widgets_from_entity(owner)
            }
            WidgetCommand::SetZOrder { widget, z_order } => {
                self.set_widget_z_order(&widget, z_order)
            }
            WidgetCommand::SetViewport(widget) => self.set_viewport_widget(widget),
        }
    }

    // Garbage collection and ordering

    /// Drop garbage from the registry and every owner bucket, pruning buckets
    /// left empty. Returns how many registry entries were reclaimed.
    pub fn collect_garbage(&mut self) -> usize {
        profile_function!();
        let reclaimed = self.registry.sweep_garbage();
        let unowned = self.owners.sweep_garbage();
        if reclaimed > 0 || unowned > 0 {
            tracing::trace!(reclaimed, owner_entries = unowned, "collected garbage widgets");
        }
        reclaimed
    }

    /// Resort by ascending z-order if the order is stale. Returns whether a
    /// sort pass ran.
    pub fn sort_widgets(&mut self) -> bool {
        self.registry.sort_if_dirty()
    }

    // Frame phases

    fn enter_phase(&self, phase: FramePhase) {
        if let Err(err) = self.phase.enter(phase) {
            tracing::warn!("{err}");
        }
    }

    /// The phase most recently dispatched since start-up.
    pub fn last_phase(&self) -> Option<FramePhase> {
        self.phase.last()
    }

    /// Apply queued commands, then run `begin_frame` on every live widget.
    pub fn begin_frame(&mut self) {
        profile_function!();
        self.enter_phase(FramePhase::BeginFrame);
        self.apply_pending_commands();
        for widget in self.registry.iter() {
            let mut w = widget.write();
            if !w.is_garbage() {
                w.begin_frame();
            }
        }
    }

    /// Collect garbage, resort if needed, then tick every live widget that
    /// wants it, in render order.
    pub fn update(&mut self) {
        profile_function!();
        self.enter_phase(FramePhase::Update);
        self.collect_garbage();
        self.sort_widgets();

        profile_scope!("tick widgets");
        for widget in self.registry.iter() {
            let mut w = widget.write();
            if w.wants_tick() && !w.is_garbage() {
                w.update();
            }
        }
    }

    /// Render every live, visible widget in ascending z-order.
    pub fn render(&self) {
        profile_function!();
        self.enter_phase(FramePhase::Render);
        for widget in self.registry.iter() {
            let w = widget.read();
            if w.is_visible() && !w.is_garbage() {
                w.render();
            }
        }
    }

    /// Run `end_frame` on every live widget.
    pub fn end_frame(&mut self) {
        profile_function!();
        self.enter_phase(FramePhase::EndFrame);
        for widget in self.registry.iter() {
            let mut w = widget.write();
            if !w.is_garbage() {
                w.end_frame();
            }
        }
    }

    /// Run all four phases in order.
    pub fn run_frame(&mut self) {
        self.begin_frame();
        self.update();
        self.render();
        self.end_frame();
    }
}

impl Default for WidgetSubsystem {
    fn default() -> Self {
        Self::new(WidgetSubsystemConfig::default())
    }
}

impl std::fmt::Debug for WidgetSubsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetSubsystem")
            .field("widgets", &self.registry.len())
            .field("owners", &self.owners.owner_count())
            .field("has_viewport", &self.viewport.is_some())
            .field("needs_sort", &self.registry.needs_sort())
            .field("last_phase", &self.phase.last())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{WidgetState, widget_ref};
    use orrery_core::alloc::sparse_set::SparseSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        state: WidgetState,
        ticks: Arc<AtomicUsize>,
    }

    impl Widget for Counter {
        fn state(&self) -> &WidgetState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut WidgetState {
            &mut self.state
        }

        fn update(&mut self) {
            self.ticks.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn counter(name: &str) -> (WidgetRef, Arc<AtomicUsize>) {
        let ticks = Arc::new(AtomicUsize::new(0));
        let widget: WidgetRef = widget_ref(Counter {
            state: WidgetState::new(name),
            ticks: ticks.clone(),
        });
        (widget, ticks)
    }

    #[test]
    fn test_subsystem_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WidgetSubsystem>();
        assert_send_sync::<WidgetCommands>();
    }

    #[test]
    fn test_add_marks_sort_pending_until_update() {
        let mut widgets = WidgetSubsystem::default();
        let (w, _) = counter("a");
        widgets.add_widget(w, 3);
        assert!(widgets.is_sort_pending());

        widgets.update();
        assert!(!widgets.is_sort_pending());
    }

    #[test]
    fn test_set_widget_z_order_resorts() {
        let mut widgets = WidgetSubsystem::default();
        let (a, _) = counter("a");
        let (b, _) = counter("b");
        widgets.add_widget(a.clone(), 0);
        widgets.add_widget(b, 1);
        widgets.update();

        widgets.set_widget_z_order(&a, 5);
        assert!(widgets.is_sort_pending());
        widgets.update();
        let last = widgets.all_widgets().pop().unwrap();
        assert!(crate::widget::same_widget(&last, &a));
    }

    #[test]
    fn test_remove_widget_prunes_owner_bucket() {
        let mut entities = SparseSet::new();
        let owner = OwnerKey::from(entities.push("coin"));
        let mut widgets = WidgetSubsystem::default();
        let (w, _) = counter("label");
        widgets.add_widget_to_entity(w.clone(), owner, 0);
        assert!(widgets.has_owner(owner));

        widgets.remove_widget(&w);
        assert!(!widgets.has_owner(owner));
        assert_eq!(widgets.widget_count(), 0);
    }

    #[test]
    fn test_garbage_widget_is_not_ticked() {
        let mut widgets = WidgetSubsystem::default();
        let (w, ticks) = counter("doomed");
        widgets.add_widget(w.clone(), 0);
        w.write().mark_as_garbage();

        widgets.update();
        assert_eq!(ticks.load(Ordering::Relaxed), 0);
        assert!(!widgets.contains_widget(&w));
    }

    #[test]
    fn test_start_up_discards_queued_commands() {
        let mut widgets = WidgetSubsystem::default();
        let (w, _) = counter("late");
        widgets.commands().add_widget(w, 0);

        widgets.start_up();
        assert_eq!(widgets.apply_pending_commands(), 0);
        assert_eq!(widgets.widget_count(), 0);
    }

    #[test]
    fn test_shut_down_drops_queued_commands() {
        let mut widgets = WidgetSubsystem::default();
        let (w, ticks) = counter("queued");
        widgets.commands().add_widget(w.clone(), 0);

        widgets.shut_down();
        assert_eq!(Arc::strong_count(&w), 1);

        widgets.begin_frame();
        widgets.update();
        assert_eq!(widgets.widget_count(), 0);
        assert_eq!(ticks.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_shut_down_clears_viewport() {
        let mut widgets = WidgetSubsystem::default();
        let (w, _) = counter("root");
        widgets.set_viewport_widget(w);
        widgets.shut_down();
        assert!(widgets.viewport_widget().is_none());
    }
}
