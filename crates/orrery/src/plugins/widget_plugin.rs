//! Plugin that installs and drives the widget subsystem.

use orrery_widgets::{WidgetSubsystem, WidgetSubsystemConfig};

use crate::plugin::Plugin;
use crate::resource::Resources;

/// Inserts a started [`WidgetSubsystem`] resource and runs its frame phases
/// from the engine's frame hooks.
///
/// # Resources Provided
///
/// - `WidgetSubsystem`
///
/// # Example
///
/// ```
/// use orrery::{Engine, WidgetPlugin};
/// use orrery::widgets::{WidgetSubsystem, WidgetSubsystemConfig};
///
/// let engine = Engine::builder()
///     .add_plugin(WidgetPlugin::new(
///         WidgetSubsystemConfig::default().with_owner_capacity(256),
///     ))
///     .build();
///
/// let widgets = engine.get::<WidgetSubsystem>().unwrap();
/// assert_eq!(widgets.config().initial_owner_capacity, 256);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetPlugin {
    pub config: WidgetSubsystemConfig,
}

impl WidgetPlugin {
    pub fn new(config: WidgetSubsystemConfig) -> Self {
        Self { config }
    }
}

impl Plugin for WidgetPlugin {
    type Dependencies = ();

    fn name(&self) -> &'static str {
        "WidgetPlugin"
    }

    fn build(&self, resources: &mut Resources) {
        let mut widgets = WidgetSubsystem::new(self.config);
        widgets.start_up();
        resources.insert(widgets);
    }

    fn begin_frame(&self, resources: &mut Resources) {
        if let Some(widgets) = resources.get_mut::<WidgetSubsystem>() {
            widgets.begin_frame();
        }
    }

    fn update(&self, resources: &mut Resources) {
        if let Some(widgets) = resources.get_mut::<WidgetSubsystem>() {
            widgets.update();
        }
    }

    fn render(&self, resources: &Resources) {
        if let Some(widgets) = resources.get::<WidgetSubsystem>() {
            widgets.render();
        }
    }

    fn end_frame(&self, resources: &mut Resources) {
        if let Some(widgets) = resources.get_mut::<WidgetSubsystem>() {
            widgets.end_frame();
        }
    }

    fn cleanup(&self, resources: &mut Resources) {
        if let Some(mut widgets) = resources.remove::<WidgetSubsystem>() {
            widgets.shut_down();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineBuilder;
    use orrery_widgets::{FramePhase, Widget, WidgetRef, WidgetState, widget_ref};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Ticker {
        state: WidgetState,
        renders: Arc<AtomicUsize>,
    }

    impl Widget for Ticker {
        fn state(&self) -> &WidgetState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut WidgetState {
            &mut self.state
        }

        fn render(&self) {
            self.renders.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_engine_frames_drive_widgets() {
        let renders = Arc::new(AtomicUsize::new(0));
        let mut engine = EngineBuilder::new()
            .add_plugin(WidgetPlugin::default())
            .build();

        let ticker: WidgetRef = widget_ref(Ticker {
            state: WidgetState::new("ticker"),
            renders: renders.clone(),
        });
        engine
            .get_mut::<WidgetSubsystem>()
            .unwrap()
            .add_widget(ticker, 0);

        engine.run_frame();
        engine.run_frame();

        assert_eq!(renders.load(Ordering::Relaxed), 2);
        let widgets = engine.get::<WidgetSubsystem>().unwrap();
        assert_eq!(widgets.last_phase(), Some(FramePhase::EndFrame));
    }

    #[test]
    fn test_cleanup_releases_widgets() {
        let renders = Arc::new(AtomicUsize::new(0));
        let ticker: WidgetRef = widget_ref(Ticker {
            state: WidgetState::new("ticker"),
            renders,
        });
        let mut engine = EngineBuilder::new()
            .add_plugin(WidgetPlugin::default())
            .build();
        engine
            .get_mut::<WidgetSubsystem>()
            .unwrap()
            .add_widget(ticker.clone(), 0);

        engine.shutdown();

        assert!(engine.get::<WidgetSubsystem>().is_none());
        assert_eq!(Arc::strong_count(&ticker), 1);
    }
}
