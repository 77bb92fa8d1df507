//! Worker threads for loading widgets off the frame thread.
//!
//! A widget subsystem is only mutated from the frame loop, so a load running
//! here never touches it. It finishes by sending the widget through a
//! [`WidgetCommands`] handle, and the subsystem registers it at the next
//! `begin_frame`.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use async_executor::{Executor, Task};
use orrery_widgets::{OwnerKey, WidgetCommands, WidgetRef};

/// How long an idle worker sleeps before polling the executor again.
const IDLE_BACKOFF: Duration = Duration::from_millis(1);

struct Worker {
    name: String,
    handle: JoinHandle<()>,
}

fn run_worker(executor: Arc<Executor<'static>>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Acquire) {
        if !executor.try_tick() {
            thread::sleep(IDLE_BACKOFF);
        }
    }
}

/// A fixed set of worker threads sharing one async executor.
///
/// # Example
///
/// ```
/// use orrery::TaskPool;
/// use orrery::widgets::{Widget, WidgetRef, WidgetState, WidgetSubsystem, widget_ref};
///
/// struct Banner(WidgetState);
///
/// impl Widget for Banner {
///     fn state(&self) -> &WidgetState { &self.0 }
///     fn state_mut(&mut self) -> &mut WidgetState { &mut self.0 }
/// }
///
/// let pool = TaskPool::new(2);
/// let mut widgets = WidgetSubsystem::default();
///
/// let load = pool.spawn_widget(&widgets.commands(), 1, async {
///     let banner: WidgetRef = widget_ref(Banner(WidgetState::new("banner")));
///     banner
/// });
/// pollster::block_on(load);
///
/// widgets.begin_frame();
/// assert!(widgets.find_widget_by_name("banner").is_some());
/// ```
pub struct TaskPool {
    executor: Arc<Executor<'static>>,
    workers: Vec<Worker>,
    stop: Arc<AtomicBool>,
}

impl TaskPool {
    /// Start `num_threads` workers.
    ///
    /// # Panics
    ///
    /// Panics if `num_threads` is 0.
    pub fn new(num_threads: usize) -> Self {
        assert!(num_threads > 0, "task pool needs at least one worker");

        let executor = Arc::new(Executor::new());
        let stop = Arc::new(AtomicBool::new(false));

        let workers: Vec<Worker> = (0..num_threads)
            .filter_map(|i| {
                let name = format!("orrery-task-{i}");
                let (executor, stop) = (executor.clone(), stop.clone());
                match thread::Builder::new()
                    .name(name.clone())
                    .spawn(move || run_worker(executor, stop))
                {
                    Ok(handle) => Some(Worker { name, handle }),
                    Err(e) => {
                        tracing::error!("Failed to start {name}: {e}");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(workers = workers.len(), "task pool started");

        Self {
            executor,
            workers,
            stop,
        }
    }

    /// One worker per core, minus one for the frame thread (never fewer than one).
    pub fn default_threads() -> Self {
        Self::new(num_cpus::get().saturating_sub(1).max(1))
    }

    /// Run `future` on the pool. Dropping the returned `Task` cancels it.
    pub fn spawn<T>(&self, future: impl Future<Output = T> + Send + 'static) -> Task<T>
    where
        T: Send + 'static,
    {
        self.executor.spawn(future)
    }

    /// Build a widget on the pool and queue it for registration at `z_order`.
    ///
    /// The widget is added at the first `begin_frame` after `load` resolves.
    /// Dropping the returned `Task` before then cancels the load; use
    /// `Task::detach` to let it finish unobserved.
    pub fn spawn_widget(
        &self,
        commands: &WidgetCommands,
        z_order: i32,
        load: impl Future<Output = WidgetRef> + Send + 'static,
    ) -> Task<()> {
        let commands = commands.clone();
        self.spawn(async move {
            commands.add_widget(load.await, z_order);
        })
    }

    /// Like [`spawn_widget`](Self::spawn_widget), grouping the widget under `owner`.
    pub fn spawn_entity_widget(
        &self,
        commands: &WidgetCommands,
        owner: OwnerKey,
        z_order: i32,
        load: impl Future<Output = WidgetRef> + Send + 'static,
    ) -> Task<()> {
        let commands = commands.clone();
        self.spawn(async move {
            commands.add_widget_to_entity(load.await, owner, z_order);
        })
    }

    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    pub fn thread_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.workers.iter().map(|w| w.name.as_str())
    }

    /// Stop every worker and join it. Work that has not been polled yet is dropped.
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::Release);
        for worker in self.workers.drain(..) {
            if worker.handle.join().is_err() {
                tracing::error!("{} panicked", worker.name);
            }
        }
        tracing::debug!("task pool stopped");
    }
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::default_threads()
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}

impl std::fmt::Debug for TaskPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskPool")
            .field("workers", &self.thread_names().collect::<Vec<_>>())
            .finish()
    }
}
