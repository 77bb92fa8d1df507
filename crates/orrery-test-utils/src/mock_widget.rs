//! Mock widget that records every callback the subsystem makes.

use std::sync::Arc;

use orrery_widgets::{FramePhase, Widget, WidgetFlags, WidgetRef, WidgetState, widget_ref};
use parking_lot::Mutex;

/// Records a widget callback for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub widget: String,
    pub phase: FramePhase,
}

/// Shared, ordered log of callbacks across any number of mock widgets.
///
/// # Borrow Checking Pattern: Interior Mutability
///
/// `Widget::render` takes `&self` but still needs to record the call, so the
/// log sits behind a `parking_lot::Mutex`, which keeps it `Send + Sync` as
/// the `Widget` trait requires.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, widget: &str, phase: FramePhase) {
        self.calls.lock().push(RecordedCall {
            widget: widget.to_string(),
            phase,
        });
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Phases that ran on `widget`, in order.
    pub fn phases_for(&self, widget: &str) -> Vec<FramePhase> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.widget == widget)
            .map(|call| call.phase)
            .collect()
    }

    /// Widgets that received `phase`, in dispatch order.
    pub fn widgets_in(&self, phase: FramePhase) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.phase == phase)
            .map(|call| call.widget.clone())
            .collect()
    }

    pub fn count(&self, phase: FramePhase) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.phase == phase)
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

type UpdateHook = Box<dyn FnMut(&mut WidgetState) + Send + Sync>;

/// Widget double that logs each callback into a [`CallLog`].
///
/// # Example
///
/// ```rust
/// use orrery_test_utils::{CallLog, MockWidget};
/// use orrery_widgets::{FramePhase, WidgetSubsystem};
///
/// let log = CallLog::new();
/// let mut widgets = WidgetSubsystem::default();
/// widgets.add_widget(MockWidget::new("tooltip", &log).hidden().into_ref(), 0);
///
/// widgets.run_frame();
/// assert_eq!(log.count(FramePhase::Render), 0);
/// assert_eq!(log.count(FramePhase::Update), 1);
/// ```
pub struct MockWidget {
    state: WidgetState,
    log: CallLog,
    on_update: Option<UpdateHook>,
}

impl MockWidget {
    /// A visible, ticking mock named `name`.
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            state: WidgetState::new(name),
            log: log.clone(),
            on_update: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.state.set_flag(WidgetFlags::VISIBLE, false);
        self
    }

    pub fn without_tick(mut self) -> Self {
        self.state.set_flag(WidgetFlags::TICK, false);
        self
    }

    /// Run `hook` after recording each update callback.
    pub fn on_update(mut self, hook: impl FnMut(&mut WidgetState) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Box::new(hook));
        self
    }

    pub fn into_ref(self) -> WidgetRef {
        widget_ref(self)
    }
}

impl Widget for MockWidget {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn begin_frame(&mut self) {
        self.log.record(self.state.name(), FramePhase::BeginFrame);
    }

    fn update(&mut self) {
        self.log.record(self.state.name(), FramePhase::Update);
        if let Some(hook) = self.on_update.as_mut() {
            hook(&mut self.state);
        }
    }

    fn render(&self) {
        self.log.record(self.state.name(), FramePhase::Render);
    }

    fn end_frame(&mut self) {
        self.log.record(self.state.name(), FramePhase::EndFrame);
    }
}

/// Name of every widget in `widgets`, in order.
pub fn names(widgets: &[WidgetRef]) -> Vec<String> {
    widgets
        .iter()
        .map(|w| w.read().name().to_string())
        .collect()
}

/// Z-order of every widget in `widgets`, in order.
pub fn z_orders(widgets: &[WidgetRef]) -> Vec<i32> {
    widgets.iter().map(|w| w.read().z_order()).collect()
}
