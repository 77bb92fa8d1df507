//! Engine-level tests: plugins driving the widget subsystem.

use orrery::prelude::*;
use orrery::widgets::FramePhase;
use orrery_test_utils::{CallLog, MockWidget, names};

#[test]
fn test_run_frame_dispatches_widget_phases() {
    let log = CallLog::new();
    let mut engine = Engine::builder()
        .add_plugin(WidgetPlugin::default())
        .build();
    engine
        .get_mut::<WidgetSubsystem>()
        .unwrap()
        .add_widget(MockWidget::new("hud", &log).into_ref(), 0);

    engine.run_frame();

    assert_eq!(log.phases_for("hud"), FramePhase::ALL.to_vec());
    assert_eq!(engine.frame_count(), 1);
}

#[test]
fn test_widgets_loaded_on_task_pool_appear_next_frame() {
    let log = CallLog::new();
    let mut engine = Engine::builder().add_plugins(DefaultPlugins).build();

    let commands = engine.get::<WidgetSubsystem>().unwrap().commands();
    let pool = engine.get::<TaskPool>().unwrap();
    let tasks: Vec<_> = (0..3)
        .map(|i| {
            let log = log.clone();
            pool.spawn_widget(&commands, 10 - i, async move {
                MockWidget::new(&format!("loaded{i}"), &log).into_ref()
            })
        })
        .collect();
    for task in tasks {
        pollster::block_on(task);
    }

    engine.run_frame();

    let widgets = engine.get::<WidgetSubsystem>().unwrap();
    assert_eq!(names(&widgets.all_widgets()), ["loaded2", "loaded1", "loaded0"]);
    assert_eq!(
        log.widgets_in(FramePhase::Render),
        ["loaded2", "loaded1", "loaded0"]
    );
}

#[test]
fn test_entity_owned_widgets_through_engine() {
    let log = CallLog::new();
    let mut entities = SparseSet::new();
    let player = OwnerKey::from(entities.push("player"));
    let mut engine = Engine::builder()
        .add_plugin(WidgetPlugin::default())
        .build();

    {
        let widgets = engine.get_mut::<WidgetSubsystem>().unwrap();
        widgets.add_widget_to_entity(MockWidget::new("health", &log).into_ref(), player, 1);
        widgets.add_widget_to_entity(MockWidget::new("name", &log).into_ref(), player, 2);
    }
    engine.run_frame();

    engine
        .get::<WidgetSubsystem>()
        .unwrap()
        .commands()
        .remove_all_widgets_from_entity(player);
    log.clear();
    engine.run_frame();

    let widgets = engine.get::<WidgetSubsystem>().unwrap();
    assert_eq!(widgets.widget_count(), 0);
    assert!(!widgets.has_owner(player));
    assert!(log.calls().is_empty());
}

#[test]
fn test_shutdown_releases_widgets_and_pool() {
    let log = CallLog::new();
    let widget = MockWidget::new("held", &log).into_ref();
    let mut engine = Engine::builder().add_plugins(DefaultPlugins).build();
    engine
        .get_mut::<WidgetSubsystem>()
        .unwrap()
        .add_widget(widget.clone(), 0);

    engine.shutdown();

    assert!(engine.get::<WidgetSubsystem>().is_none());
    assert!(engine.get::<TaskPool>().is_none());
    assert_eq!(std::sync::Arc::strong_count(&widget), 1);
}

#[test]
fn test_benchmark_mode_off_builds() {
    let engine = Engine::builder()
        .with_config(Config::default().with_benchmark(BenchmarkMode::Off))
        .add_plugin(WidgetPlugin::new(
            WidgetSubsystemConfig::default().with_widget_capacity(4),
        ))
        .build();
    let widgets = engine.get::<WidgetSubsystem>().unwrap();
    assert_eq!(widgets.config().initial_widget_capacity, 4);
}
