//! Orrery Widgets - retained-mode widget layer manager
//!
//! This crate owns the on-screen widgets of a frame-based application:
//! - A render-ordered registry, lazily resorted by z-order
//! - Grouping of widgets under the game object that owns them
//! - Garbage collection of widgets flagged dead, once per update
//! - A viewport anchor for the main surface widget
//! - Fixed-order frame dispatch (begin frame, update, render, end frame)
//! - A thread-safe command queue for mutations requested off the frame thread
//!
//! The subsystem only orders and dispatches; layout and drawing belong to the
//! widgets themselves.
//!
//! ## Quick Start
//!
//! ```
//! use orrery_core::alloc::sparse_set::SparseSet;
//! use orrery_widgets::{OwnerKey, Widget, WidgetRef, WidgetState, WidgetSubsystem, widget_ref};
//!
//! struct HealthBar {
//!     state: WidgetState,
//!     health: i32,
//! }
//!
//! impl Widget for HealthBar {
//!     fn state(&self) -> &WidgetState { &self.state }
//!     fn state_mut(&mut self) -> &mut WidgetState { &mut self.state }
//! }
//!
//! let mut entities = SparseSet::new();
//! let player = OwnerKey::from(entities.push("player"));
//!
//! let mut widgets = WidgetSubsystem::default();
//! widgets.start_up();
//!
//! let bar: WidgetRef = widget_ref(HealthBar { state: WidgetState::new("health"), health: 3 });
//! widgets.add_widget_to_entity(bar, player, 5);
//! assert_eq!(widgets.widgets_by_owner(player).len(), 1);
//!
//! // Entity destroyed: drop its widgets with it.
//! widgets.remove_all_widgets_from_entity(player);
//! assert!(widgets.find_widget_by_name("health").is_none());
//! ```

pub mod command;
pub mod config;
pub mod owner;
pub mod owner_index;
pub mod phase;
pub mod registry;
pub mod subsystem;
pub mod widget;

pub use command::{WidgetCommand, WidgetCommands};
pub use config::WidgetSubsystemConfig;
pub use owner::OwnerKey;
pub use owner_index::OwnerIndex;
pub use phase::{FramePhase, PhaseError, PhaseTracker};
pub use registry::WidgetRegistry;
pub use subsystem::WidgetSubsystem;
pub use widget::{Widget, WidgetFlags, WidgetRef, WidgetState, same_widget, widget_ref};
