//! Engine core - manages plugins, resources and the frame loop.

use std::fmt;

use orrery_core::alloc::{HashMap, HashSet};
use orrery_core::config::Config;
use orrery_core::profiling::{self, profile_function, profile_scope};

use crate::plugin::{Plugin, PluginDyn, PluginGroup, PluginGroupAdapter};
use crate::resource::{Resource, Resources};

/// Errors raised while assembling an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A plugin declared a dependency that was never added.
    MissingDependency {
        plugin: &'static str,
        dependency: &'static str,
    },
    /// Plugins depend on each other in a cycle.
    CircularDependency(&'static str),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::MissingDependency { plugin, dependency } => {
                write!(f, "plugin {plugin} depends on {dependency}, which was not added")
            }
            EngineError::CircularDependency(name) => {
                write!(f, "circular plugin dependency involving {name}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Holds all resources and drives plugins through the frame loop.
///
/// # Example
///
/// ```
/// use orrery::{EngineBuilder, WidgetPlugin};
/// use orrery::widgets::WidgetSubsystem;
///
/// let mut engine = EngineBuilder::new()
///     .add_plugin(WidgetPlugin::default())
///     .build();
///
/// engine.run_frame();
/// assert!(engine.get::<WidgetSubsystem>().is_some());
///
/// engine.shutdown();
/// assert!(engine.get::<WidgetSubsystem>().is_none());
/// ```
pub struct Engine {
    resources: Resources,
    /// Dependency order.
    plugins: Vec<Box<dyn PluginDyn>>,
    frame: u64,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn get<R: Resource>(&self) -> Option<&R> {
        self.resources.get::<R>()
    }

    pub fn get_mut<R: Resource>(&mut self) -> Option<&mut R> {
        self.resources.get_mut::<R>()
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    /// Plugin names in dependency order.
    pub fn plugin_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.plugins.iter().map(|p| p.name())
    }

    /// Number of frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Run one frame: every plugin's `begin_frame`, then every `update`, then
    /// every `render`, then every `end_frame`, each phase in dependency order.
    pub fn run_frame(&mut self) {
        profiling::new_frame();
        profile_function!();

        {
            profile_scope!("begin_frame");
            for plugin in &self.plugins {
                plugin.begin_frame(&mut self.resources);
            }
        }
        {
            profile_scope!("update");
            for plugin in &self.plugins {
                plugin.update(&mut self.resources);
            }
        }
        {
            profile_scope!("render");
            for plugin in &self.plugins {
                plugin.render(&self.resources);
            }
        }
        {
            profile_scope!("end_frame");
            for plugin in &self.plugins {
                plugin.end_frame(&mut self.resources);
            }
        }

        self.frame += 1;
    }

    /// Run every plugin's `cleanup` in reverse dependency order and drop the
    /// plugins. Later calls and frames do nothing.
    pub fn shutdown(&mut self) {
        let plugins = std::mem::take(&mut self.plugins);
        if plugins.is_empty() {
            return;
        }
        for plugin in plugins.iter().rev() {
            tracing::debug!("Cleaning up plugin: {}", plugin.name());
            plugin.cleanup(&mut self.resources);
        }
        tracing::info!(frames = self.frame, "Engine shut down");
    }
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::new().build()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("plugins", &self.plugin_names().collect::<Vec<_>>())
            .field("resources", &self.resources)
            .field("frame", &self.frame)
            .finish()
    }
}

/// Builder for constructing an Engine with plugins.
///
/// # Example
///
/// ```
/// use orrery::{EngineBuilder, FnPlugin};
/// use orrery::core::config::{BenchmarkMode, Config};
///
/// let engine = EngineBuilder::new()
///     .with_config(Config::default().with_benchmark(BenchmarkMode::Off))
///     .add_plugin(FnPlugin::new("title", |resources| {
///         resources.insert("game_title".to_string());
///     }))
///     .build();
/// assert_eq!(engine.get::<String>().unwrap(), "game_title");
/// ```
pub struct EngineBuilder {
    plugins: Vec<Box<dyn PluginDyn>>,
    resources: Resources,
    config: Config,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            resources: Resources::new(),
            config: Config::default(),
        }
    }

    /// Engine-wide configuration. Profiling starts at build time if the
    /// benchmark mode asks for it.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Add a plugin. Build order follows declared dependencies, then insertion order.
    pub fn add_plugin(mut self, plugin: impl Plugin) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Add a plugin group (multiple plugins) to the engine.
    pub fn add_plugins(mut self, group: impl PluginGroup) -> Self {
        let adapter = PluginGroupAdapter::new(group);
        self.plugins.extend(adapter.into_plugins());
        self
    }

    /// Insert a resource that plugins can rely on during `build`.
    pub fn insert_resource<R: Resource>(mut self, resource: R) -> Self {
        self.resources.insert(resource);
        self
    }

    /// Build the engine, skipping unresolvable dependencies with a warning.
    pub fn build(self) -> Engine {
        let (order, errors) = self.sort_plugins_by_dependency_indices();
        for err in &errors {
            tracing::warn!("{err}");
        }
        self.assemble(order)
    }

    /// Build the engine, failing on the first missing or circular dependency.
    pub fn try_build(self) -> Result<Engine, EngineError> {
        let (order, mut errors) = self.sort_plugins_by_dependency_indices();
        if !errors.is_empty() {
            return Err(errors.swap_remove(0));
        }
        Ok(self.assemble(order))
    }

    /// Build every plugin, then finish every plugin, in `order`.
    fn assemble(mut self, order: Vec<usize>) -> Engine {
        self.config.apply_profiling();

        let mut slots: Vec<Option<Box<dyn PluginDyn>>> =
            self.plugins.into_iter().map(Some).collect();
        let plugins: Vec<Box<dyn PluginDyn>> =
            order.into_iter().filter_map(|idx| slots[idx].take()).collect();

        for plugin in &plugins {
            tracing::debug!("Building plugin: {}", plugin.name());
            plugin.build(&mut self.resources);
        }
        for plugin in &plugins {
            plugin.finish(&mut self.resources);
        }

        tracing::info!(
            "Engine built with {} plugins: {:?}",
            plugins.len(),
            plugins.iter().map(|p| p.name()).collect::<Vec<_>>()
        );

        Engine {
            resources: self.resources,
            plugins,
            frame: 0,
        }
    }

    /// Depth-first topological sort. Returns plugin indices in build order
    /// and every problem found along the way.
    fn sort_plugins_by_dependency_indices(&self) -> (Vec<usize>, Vec<EngineError>) {
        struct Walk<'a> {
            plugins: &'a [Box<dyn PluginDyn>],
            by_name: HashMap<&'static str, usize>,
            visited: HashSet<&'static str>,
            visiting: HashSet<&'static str>,
            sorted: Vec<usize>,
            errors: Vec<EngineError>,
        }

        impl Walk<'_> {
            fn visit(&mut self, name: &'static str) {
                if self.visited.contains(name) {
                    return;
                }
                if self.visiting.contains(name) {
                    self.errors.push(EngineError::CircularDependency(name));
                    return;
                }
                let Some(&idx) = self.by_name.get(name) else {
                    return;
                };

                self.visiting.insert(name);
                let plugins = self.plugins;
                for dep in plugins[idx].dependencies() {
                    if !self.by_name.contains_key(dep) {
                        self.errors.push(EngineError::MissingDependency {
                            plugin: name,
                            dependency: dep,
                        });
                        continue;
                    }
                    self.visit(dep);
                }
                self.visiting.remove(name);
                self.visited.insert(name);
                self.sorted.push(idx);
            }
        }

        let mut walk = Walk {
            plugins: &self.plugins,
            by_name: self
                .plugins
                .iter()
                .enumerate()
                .map(|(i, p)| (p.name(), i))
                .collect(),
            visited: HashSet::default(),
            visiting: HashSet::default(),
            sorted: Vec::with_capacity(self.plugins.len()),
            errors: Vec::new(),
        };

        for plugin in &self.plugins {
            walk.visit(plugin.name());
        }

        (walk.sorted, walk.errors)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
