//! Plugin system for extending engine functionality.
//!
//! Plugins register resources when the engine is built and hook into the
//! four frame phases every time [`Engine::run_frame`](crate::Engine::run_frame)
//! runs.

use crate::resource::Resources;
use std::any::type_name;

/// Trait for compile-time type-safe plugin dependency specification.
///
/// Implemented for plugin types and tuples of plugin types, so dependencies
/// are spelled as types and checked by the compiler.
///
/// # Example
///
/// ```ignore
/// impl Plugin for HudPlugin {
///     type Dependencies = (WidgetPlugin, AsyncRuntimePlugin);
///     // ...
/// }
/// ```
pub trait PluginSet {
    /// Returns the type names of all plugins in this set.
    fn names() -> Vec<&'static str>;
}

/// Empty dependency set (no dependencies).
impl PluginSet for () {
    fn names() -> Vec<&'static str> {
        vec![]
    }
}

/// Single plugin dependency.
impl<P: Plugin> PluginSet for P {
    fn names() -> Vec<&'static str> {
        vec![type_name::<P>()]
    }
}

/// Two plugin dependencies.
impl<P1: Plugin, P2: Plugin> PluginSet for (P1, P2) {
    fn names() -> Vec<&'static str> {
        vec![type_name::<P1>(), type_name::<P2>()]
    }
}

/// Three plugin dependencies.
impl<P1: Plugin, P2: Plugin, P3: Plugin> PluginSet for (P1, P2, P3) {
    fn names() -> Vec<&'static str> {
        vec![type_name::<P1>(), type_name::<P2>(), type_name::<P3>()]
    }
}

/// Four plugin dependencies.
impl<P1: Plugin, P2: Plugin, P3: Plugin, P4: Plugin> PluginSet for (P1, P2, P3, P4) {
    fn names() -> Vec<&'static str> {
        vec![
            type_name::<P1>(),
            type_name::<P2>(),
            type_name::<P3>(),
            type_name::<P4>(),
        ]
    }
}

/// Object-safe plugin trait for runtime plugin management.
///
/// Automatically implemented for every `Plugin`, so plugins can be stored as
/// `Box<dyn PluginDyn>`.
pub trait PluginDyn: Send + Sync {
    fn name(&self) -> &'static str;

    /// Type names of the plugins this one depends on.
    fn dependencies(&self) -> Vec<&'static str>;

    fn build(&self, resources: &mut Resources);

    fn finish(&self, resources: &mut Resources);

    fn begin_frame(&self, resources: &mut Resources);

    fn update(&self, resources: &mut Resources);

    fn render(&self, resources: &Resources);

    fn end_frame(&self, resources: &mut Resources);

    fn cleanup(&self, resources: &mut Resources);
}

/// Trait for engine plugins with compile-time type-safe dependencies.
///
/// Only `build` is required. Every lifecycle and frame hook defaults to a
/// no-op.
///
/// # Example
///
/// ```
/// use orrery::{EngineBuilder, Plugin, Resources};
///
/// struct FrameCounter(u64);
///
/// struct FrameCounterPlugin;
///
/// impl Plugin for FrameCounterPlugin {
///     type Dependencies = ();
///
///     fn build(&self, resources: &mut Resources) {
///         resources.insert(FrameCounter(0));
///     }
///
///     fn end_frame(&self, resources: &mut Resources) {
///         if let Some(counter) = resources.get_mut::<FrameCounter>() {
///             counter.0 += 1;
///         }
///     }
/// }
///
/// let mut engine = EngineBuilder::new().add_plugin(FrameCounterPlugin).build();
/// engine.run_frame();
/// engine.run_frame();
/// assert_eq!(engine.get::<FrameCounter>().unwrap().0, 2);
/// ```
pub trait Plugin: Send + Sync + 'static {
    /// Type-safe plugin dependencies.
    ///
    /// - `()` for no dependencies
    /// - `P` for a single dependency
    /// - `(P1, P2)` for two dependencies, and so on up to four
    type Dependencies: PluginSet;

    /// Unique name of this plugin. Defaults to the type name, which is also
    /// what dependency resolution matches against.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Called when the engine is built. Register resources here.
    fn build(&self, resources: &mut Resources);

    /// Called after every plugin has been built.
    #[allow(unused_variables)]
    fn finish(&self, resources: &mut Resources) {}

    #[allow(unused_variables)]
    fn begin_frame(&self, resources: &mut Resources) {}

    #[allow(unused_variables)]
    fn update(&self, resources: &mut Resources) {}

    /// The render hook only gets shared access to resources.
    #[allow(unused_variables)]
    fn render(&self, resources: &Resources) {}

    #[allow(unused_variables)]
    fn end_frame(&self, resources: &mut Resources) {}

    /// Called on engine shutdown, in reverse build order.
    #[allow(unused_variables)]
    fn cleanup(&self, resources: &mut Resources) {}
}

// Blanket implementation of PluginDyn for all Plugin types
impl<P: Plugin> PluginDyn for P {
    fn name(&self) -> &'static str {
        <Self as Plugin>::name(self)
    }

    fn dependencies(&self) -> Vec<&'static str> {
        P::Dependencies::names()
    }

    fn build(&self, resources: &mut Resources) {
        <Self as Plugin>::build(self, resources)
    }

    fn finish(&self, resources: &mut Resources) {
        <Self as Plugin>::finish(self, resources)
    }

    fn begin_frame(&self, resources: &mut Resources) {
        <Self as Plugin>::begin_frame(self, resources)
    }

    fn update(&self, resources: &mut Resources) {
        <Self as Plugin>::update(self, resources)
    }

    fn render(&self, resources: &Resources) {
        <Self as Plugin>::render(self, resources)
    }

    fn end_frame(&self, resources: &mut Resources) {
        <Self as Plugin>::end_frame(self, resources)
    }

    fn cleanup(&self, resources: &mut Resources) {
        <Self as Plugin>::cleanup(self, resources)
    }
}

/// A bundle of plugins added together.
///
/// # Example
///
/// ```
/// use orrery::{EngineBuilder, PluginGroup, WidgetPlugin, AsyncRuntimePlugin};
/// use orrery::plugin::PluginDyn;
///
/// struct HudPlugins;
///
/// impl PluginGroup for HudPlugins {
///     fn plugins(&self) -> Vec<Box<dyn PluginDyn>> {
///         vec![
///             Box::new(WidgetPlugin::default()),
///             Box::new(AsyncRuntimePlugin::new().with_threads(1)),
///         ]
///     }
/// }
///
/// let engine = EngineBuilder::new().add_plugins(HudPlugins).build();
/// assert_eq!(engine.plugin_names().count(), 2);
/// ```
pub trait PluginGroup {
    fn plugins(&self) -> Vec<Box<dyn PluginDyn>>;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Unpacks a [`PluginGroup`] into the builder's plugin list.
pub(crate) struct PluginGroupAdapter {
    name: &'static str,
    plugins: Vec<Box<dyn PluginDyn>>,
}

impl PluginGroupAdapter {
    pub fn new(group: impl PluginGroup) -> Self {
        Self {
            name: group.name(),
            plugins: group.plugins(),
        }
    }

    pub fn into_plugins(self) -> Vec<Box<dyn PluginDyn>> {
        tracing::debug!(group = self.name, count = self.plugins.len(), "adding plugin group");
        self.plugins
    }
}

/// A function-based plugin for simple use cases.
///
/// # Example
///
/// ```
/// use orrery::{FnPlugin, Resources, EngineBuilder};
///
/// let engine = EngineBuilder::new()
///     .add_plugin(FnPlugin::new("setup", |resources| {
///         resources.insert(42i32);
///     }))
///     .build();
/// assert!(engine.has_plugin("setup"));
/// ```
pub struct FnPlugin<F>
where
    F: Fn(&mut Resources) + Send + Sync + 'static,
{
    name: &'static str,
    build_fn: F,
}

impl<F> FnPlugin<F>
where
    F: Fn(&mut Resources) + Send + Sync + 'static,
{
    pub fn new(name: &'static str, build_fn: F) -> Self {
        Self { name, build_fn }
    }
}

impl<F> Plugin for FnPlugin<F>
where
    F: Fn(&mut Resources) + Send + Sync + 'static,
{
    type Dependencies = ();

    fn name(&self) -> &'static str {
        self.name
    }

    fn build(&self, resources: &mut Resources) {
        (self.build_fn)(resources);
    }
}
