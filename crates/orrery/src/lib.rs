//! Orrery - a plugin-driven frame loop with a retained-mode widget layer
//!
//! - **Plugin System**: resources registered at build time, four frame hooks per frame
//! - **Widgets**: the [`WidgetSubsystem`](orrery_widgets::WidgetSubsystem), installed by [`WidgetPlugin`]
//! - **Tasks**: a background [`TaskPool`] for work whose results come back as widget commands
//!
//! # Quick Start
//!
//! ```
//! use orrery::prelude::*;
//!
//! struct Crosshair(WidgetState);
//!
//! impl Widget for Crosshair {
//!     fn state(&self) -> &WidgetState { &self.0 }
//!     fn state_mut(&mut self) -> &mut WidgetState { &mut self.0 }
//! }
//!
//! let mut engine = Engine::builder()
//!     .add_plugin(WidgetPlugin::default())
//!     .build();
//!
//! let crosshair: WidgetRef = widget_ref(Crosshair(WidgetState::new("crosshair")));
//! engine
//!     .get_mut::<WidgetSubsystem>()
//!     .unwrap()
//!     .add_widget(crosshair, 100);
//!
//! engine.run_frame();
//! engine.shutdown();
//! ```

pub mod engine;
pub mod plugin;
pub mod plugins;
pub mod resource;
pub mod task_pool;

pub use orrery_core as core;
pub use orrery_widgets as widgets;

pub use engine::{Engine, EngineBuilder, EngineError};
pub use plugin::{FnPlugin, Plugin, PluginGroup};
pub use plugins::{AsyncRuntimePlugin, DefaultPlugins, WidgetPlugin};
pub use resource::{Resource, Resources};
pub use task_pool::TaskPool;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::engine::{Engine, EngineBuilder, EngineError};
    pub use crate::plugin::{FnPlugin, Plugin, PluginGroup};
    pub use crate::plugins::{AsyncRuntimePlugin, DefaultPlugins, WidgetPlugin};
    pub use crate::resource::{Resource, Resources};
    pub use crate::task_pool::TaskPool;

    pub use orrery_core::alloc::sparse_set::{IndexSlot, SparseSet};
    pub use orrery_core::config::{BenchmarkMode, Config};

    pub use orrery_widgets::{
        OwnerKey, Widget, WidgetCommands, WidgetFlags, WidgetRef, WidgetState, WidgetSubsystem,
        WidgetSubsystemConfig, same_widget, widget_ref,
    };
}
