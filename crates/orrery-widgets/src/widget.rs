//! The widget capability contract.
//!
//! The subsystem never looks inside a widget beyond this trait. Implementors
//! embed a [`WidgetState`] and expose it through [`Widget::state`] /
//! [`Widget::state_mut`]; every flag and ordering accessor has a default that
//! reads or writes that state, so a concrete widget usually only overrides the
//! frame callbacks it cares about.
//!
//! # Example
//!
//! ```
//! use orrery_widgets::{Widget, WidgetState, widget_ref};
//!
//! struct ScoreLabel {
//!     state: WidgetState,
//!     score: u32,
//! }
//!
//! impl Widget for ScoreLabel {
//!     fn state(&self) -> &WidgetState {
//!         &self.state
//!     }
//!
//!     fn state_mut(&mut self) -> &mut WidgetState {
//!         &mut self.state
//!     }
//!
//!     fn update(&mut self) {
//!         self.score += 1;
//!     }
//! }
//!
//! let label = widget_ref(ScoreLabel {
//!     state: WidgetState::new("score"),
//!     score: 0,
//! });
//! assert_eq!(label.read().name(), "score");
//! ```

use std::sync::Arc;

use bitflags::bitflags;
use parking_lot::RwLock;

use crate::owner::OwnerKey;

bitflags! {
    /// Status flags a widget exposes to the frame dispatcher.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// Pending removal on the next garbage-collection sweep.
        const GARBAGE = 0b0000_0001;
        /// Eligible for the render pass.
        const VISIBLE = 0b0000_0010;
        /// Eligible for the per-frame update callback.
        const TICK    = 0b0000_0100;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::TICK
    }
}

/// Bookkeeping every widget carries: name, z-order, owner and status flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    name: String,
    z_order: i32,
    owner: Option<OwnerKey>,
    flags: WidgetFlags,
}

impl WidgetState {
    /// New visible, ticking, unowned state at z-order 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            z_order: 0,
            owner: None,
            flags: WidgetFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: WidgetFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    pub fn set_z_order(&mut self, z_order: i32) {
        self.z_order = z_order;
    }

    pub fn owner(&self) -> Option<OwnerKey> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<OwnerKey>) {
        self.owner = owner;
    }

    pub fn flags(&self) -> WidgetFlags {
        self.flags
    }

    pub fn set_flag(&mut self, flag: WidgetFlags, value: bool) {
        self.flags.set(flag, value);
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new("Widget")
    }
}

/// Base trait for everything the widget subsystem manages.
///
/// `render` takes `&self`: the render pass is read-only with respect to both
/// the widget and the subsystem.
pub trait Widget: Send + Sync + 'static {
    fn state(&self) -> &WidgetState;

    fn state_mut(&mut self) -> &mut WidgetState;

    fn begin_frame(&mut self) {}

    fn update(&mut self) {}

    fn render(&self) {}

    fn end_frame(&mut self) {}

    fn name(&self) -> &str {
        self.state().name()
    }

    fn z_order(&self) -> i32 {
        self.state().z_order()
    }

    fn set_z_order(&mut self, z_order: i32) {
        self.state_mut().set_z_order(z_order);
    }

    fn owner(&self) -> Option<OwnerKey> {
        self.state().owner()
    }

    fn set_owner(&mut self, owner: Option<OwnerKey>) {
        self.state_mut().set_owner(owner);
    }

    fn is_garbage(&self) -> bool {
        self.state().flags().contains(WidgetFlags::GARBAGE)
    }

    fn is_visible(&self) -> bool {
        self.state().flags().contains(WidgetFlags::VISIBLE)
    }

    fn wants_tick(&self) -> bool {
        self.state().flags().contains(WidgetFlags::TICK)
    }

    /// Flag the widget for removal. It stays registered until the next sweep.
    fn mark_as_garbage(&mut self) {
        self.state_mut().set_flag(WidgetFlags::GARBAGE, true);
    }

    fn set_visible(&mut self, visible: bool) {
        self.state_mut().set_flag(WidgetFlags::VISIBLE, visible);
    }

    fn set_tick(&mut self, tick: bool) {
        self.state_mut().set_flag(WidgetFlags::TICK, tick);
    }
}

/// Shared handle to a registered widget.
///
/// The caller, the registry and the owner index may all hold clones; the
/// widget lives as long as the longest holder.
pub type WidgetRef = Arc<RwLock<dyn Widget>>;

/// Wrap a widget for registration.
///
/// Returns the concrete type so the caller keeps typed access; the handle
/// coerces to [`WidgetRef`] when passed to the subsystem.
pub fn widget_ref<W: Widget>(widget: W) -> Arc<RwLock<W>> {
    Arc::new(RwLock::new(widget))
}

/// Identity comparison. Two handles are the same widget iff they share an allocation.
#[inline]
pub fn same_widget(a: &WidgetRef, b: &WidgetRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
