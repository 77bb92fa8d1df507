//! Installs the background [`TaskPool`].

use crate::plugin::Plugin;
use crate::resource::Resources;
use crate::task_pool::TaskPool;

/// Provides a `TaskPool` resource for widget loads and other background work.
///
/// The pool is joined on engine shutdown. In [`DefaultPlugins`](crate::DefaultPlugins)
/// it sits next to [`WidgetPlugin`](crate::WidgetPlugin), so loads can hand
/// widgets back through the subsystem's commands.
///
/// # Example
///
/// ```
/// use orrery::{AsyncRuntimePlugin, Engine, TaskPool};
///
/// let engine = Engine::builder()
///     .add_plugin(AsyncRuntimePlugin::new().with_threads(1))
///     .build();
///
/// let pool = engine.get::<TaskPool>().unwrap();
/// assert_eq!(pool.thread_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AsyncRuntimePlugin {
    /// `None` picks one worker per core minus the frame thread.
    threads: Option<usize>,
}

impl AsyncRuntimePlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threads(self, threads: usize) -> Self {
        Self {
            threads: Some(threads),
        }
    }

    fn create_pool(&self) -> TaskPool {
        self.threads
            .map_or_else(TaskPool::default_threads, TaskPool::new)
    }
}

impl Plugin for AsyncRuntimePlugin {
    type Dependencies = ();

    fn name(&self) -> &'static str {
        "AsyncRuntimePlugin"
    }

    fn build(&self, resources: &mut Resources) {
        resources.insert(self.create_pool());
    }

    fn cleanup(&self, resources: &mut Resources) {
        match resources.remove::<TaskPool>() {
            Some(pool) => pool.shutdown(),
            None => tracing::warn!("TaskPool resource was removed before cleanup"),
        }
    }
}
