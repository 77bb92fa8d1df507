//! Test utilities for the Orrery engine.
//!
//! This crate provides recording doubles for the widget subsystem, so tests
//! can assert which callbacks ran, on which widget, and in what order.
//!
//! # Example
//!
//! ```rust
//! use orrery_test_utils::{CallLog, MockWidget};
//! use orrery_widgets::{FramePhase, WidgetSubsystem};
//!
//! let log = CallLog::new();
//! let mut widgets = WidgetSubsystem::default();
//!
//! widgets.add_widget(MockWidget::new("hud", &log).into_ref(), 0);
//! widgets.run_frame();
//!
//! assert_eq!(log.phases_for("hud"), FramePhase::ALL.to_vec());
//! ```

pub mod mock_widget;

pub use mock_widget::*;
