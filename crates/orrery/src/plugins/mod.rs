//! Built-in plugins.

mod async_runtime_plugin;
mod widget_plugin;

pub use async_runtime_plugin::AsyncRuntimePlugin;
pub use widget_plugin::WidgetPlugin;

use crate::plugin::{PluginDyn, PluginGroup};

/// Widgets plus a background task pool for loading them.
///
/// # Example
///
/// ```
/// use orrery::{DefaultPlugins, Engine, TaskPool};
/// use orrery::widgets::WidgetSubsystem;
///
/// let engine = Engine::builder().add_plugins(DefaultPlugins).build();
/// assert!(engine.get::<WidgetSubsystem>().is_some());
/// assert!(engine.get::<TaskPool>().is_some());
/// ```
pub struct DefaultPlugins;

impl PluginGroup for DefaultPlugins {
    fn plugins(&self) -> Vec<Box<dyn PluginDyn>> {
        vec![
            Box::new(WidgetPlugin::default()),
            Box::new(AsyncRuntimePlugin::default()),
        ]
    }

    fn name(&self) -> &'static str {
        "DefaultPlugins"
    }
}
