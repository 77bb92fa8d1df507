//! Frame phase dispatch and deferred command tests.
//!
//! These use the recording `MockWidget` to verify which callbacks run, in
//! which order, and on which widgets.

use std::thread;

use orrery_core::alloc::sparse_set::SparseSet;
use orrery_test_utils::{CallLog, MockWidget, names};
use orrery_widgets::{FramePhase, OwnerKey, WidgetRef, WidgetSubsystem, same_widget};

fn subsystem() -> WidgetSubsystem {
    let mut widgets = WidgetSubsystem::default();
    widgets.start_up();
    widgets
}

#[test]
fn test_run_frame_calls_every_phase_in_order() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    widgets.add_widget(MockWidget::new("hud", &log).into_ref(), 0);

    widgets.run_frame();
    widgets.run_frame();

    let mut expected = FramePhase::ALL.to_vec();
    expected.extend(FramePhase::ALL);
    assert_eq!(log.phases_for("hud"), expected);
    assert_eq!(widgets.last_phase(), Some(FramePhase::EndFrame));
}

#[test]
fn test_render_runs_bottom_to_top() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    widgets.add_widget(MockWidget::new("popup", &log).into_ref(), 20);
    widgets.add_widget(MockWidget::new("background", &log).into_ref(), -5);
    widgets.add_widget(MockWidget::new("panel", &log).into_ref(), 3);

    widgets.run_frame();

    assert_eq!(
        log.widgets_in(FramePhase::Render),
        ["background", "panel", "popup"]
    );
    assert_eq!(
        log.widgets_in(FramePhase::Update),
        ["background", "panel", "popup"]
    );
}

#[test]
fn test_hidden_widget_ticks_but_does_not_render() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    widgets.add_widget(MockWidget::new("tooltip", &log).hidden().into_ref(), 0);

    widgets.run_frame();

    assert_eq!(
        log.phases_for("tooltip"),
        [
            FramePhase::BeginFrame,
            FramePhase::Update,
            FramePhase::EndFrame
        ]
    );
}

#[test]
fn test_non_ticking_widget_renders_but_is_not_updated() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    widgets.add_widget(MockWidget::new("static", &log).without_tick().into_ref(), 0);

    widgets.run_frame();

    assert_eq!(log.count(FramePhase::Update), 0);
    assert_eq!(log.count(FramePhase::Render), 1);
}

#[test]
fn test_visibility_toggle_takes_effect_next_render() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    let w = MockWidget::new("blink", &log).into_ref();
    widgets.add_widget(w.clone(), 0);

    widgets.run_frame();
    w.write().set_visible(false);
    widgets.run_frame();
    w.write().set_visible(true);
    widgets.run_frame();

    assert_eq!(log.count(FramePhase::Render), 2);
    assert_eq!(log.count(FramePhase::Update), 3);
}

#[test]
fn test_garbage_flagged_mid_frame_never_renders() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    let w = MockWidget::new("doomed", &log).into_ref();
    widgets.add_widget(w.clone(), 0);

    widgets.begin_frame();
    w.write().mark_as_garbage();
    widgets.update();
    widgets.render();
    widgets.end_frame();

    assert_eq!(log.phases_for("doomed"), [FramePhase::BeginFrame]);
    assert!(!widgets.contains_widget(&w));
}

#[test]
fn test_widget_flagging_itself_is_swept_next_frame() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    let w = MockWidget::new("one-shot", &log)
        .on_update(|state| state.set_flag(orrery_widgets::WidgetFlags::GARBAGE, true))
        .into_ref();
    widgets.add_widget(w.clone(), 0);

    widgets.run_frame();
    // Flagged during its own update: skipped by render, still registered.
    assert_eq!(log.count(FramePhase::Render), 0);
    assert!(widgets.contains_widget(&w));

    widgets.run_frame();
    assert!(!widgets.contains_widget(&w));
    assert_eq!(log.count(FramePhase::Update), 1);
}

#[test]
fn test_z_order_change_applies_on_next_update() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    let a = MockWidget::new("a", &log).into_ref();
    widgets.add_widget(a.clone(), 0);
    widgets.add_widget(MockWidget::new("b", &log).into_ref(), 1);
    widgets.run_frame();
    log.clear();

    widgets.set_widget_z_order(&a, 2);
    widgets.run_frame();

    assert_eq!(log.widgets_in(FramePhase::Render), ["b", "a"]);
}

#[test]
fn test_phases_called_directly_still_dispatch() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    widgets.add_widget(MockWidget::new("w", &log).into_ref(), 0);

    // Skipping begin_frame is reported, not refused.
    widgets.update();
    widgets.end_frame();

    assert_eq!(
        log.phases_for("w"),
        [FramePhase::Update, FramePhase::EndFrame]
    );
    assert_eq!(widgets.last_phase(), Some(FramePhase::EndFrame));
}

#[test]
fn test_commands_apply_at_begin_frame() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    let commands = widgets.commands();
    commands.add_widget(MockWidget::new("queued", &log).into_ref(), 0);

    assert_eq!(widgets.widget_count(), 0);
    widgets.run_frame();

    assert_eq!(widgets.widget_count(), 1);
    assert_eq!(log.phases_for("queued"), FramePhase::ALL.to_vec());
}

#[test]
fn test_commands_apply_in_send_order() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    let commands = widgets.commands();
    let w = MockWidget::new("flicker", &log).into_ref();
    commands.add_widget(w.clone(), 0);
    commands.remove_widget(w.clone());
    commands.add_widget(MockWidget::new("stays", &log).into_ref(), 0);

    assert_eq!(widgets.apply_pending_commands(), 3);
    assert!(!widgets.contains_widget(&w));
    assert_eq!(names(&widgets.all_widgets()), ["stays"]);
}

#[test]
fn test_commands_from_another_thread() {
    let log = CallLog::new();
    let mut entities = SparseSet::new();
    let owner = OwnerKey::from(entities.push("coin"));
    let mut widgets = subsystem();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let commands = widgets.commands();
            let log = log.clone();
            thread::spawn(move || {
                let w = MockWidget::new(&format!("loaded{i}"), &log).into_ref();
                commands.add_widget_to_entity(w, owner, i);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    widgets.run_frame();

    assert_eq!(widgets.widgets_by_owner(owner).len(), 4);
    assert_eq!(
        names(&widgets.all_widgets()),
        ["loaded0", "loaded1", "loaded2", "loaded3"]
    );

    widgets.commands().remove_all_widgets_from_entity(owner);
    widgets.run_frame();
    assert_eq!(widgets.widget_count(), 0);
}

#[test]
fn test_widget_can_spawn_widget_from_callback() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    let commands = widgets.commands();
    let spawn_log = log.clone();
    let mut spawned = false;
    let spawner = MockWidget::new("spawner", &log)
        .on_update(move |_| {
            if !spawned {
                commands.add_widget(MockWidget::new("child", &spawn_log).into_ref(), 1);
                spawned = true;
            }
        })
        .into_ref();
    widgets.add_widget(spawner, 0);

    widgets.run_frame();
    assert_eq!(widgets.widget_count(), 1);
    assert!(log.phases_for("child").is_empty());

    widgets.run_frame();
    assert_eq!(names(&widgets.all_widgets()), ["spawner", "child"]);
    assert_eq!(log.phases_for("child"), FramePhase::ALL.to_vec());
}

#[test]
fn test_z_order_command_resorts_same_frame() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    let a = MockWidget::new("a", &log).into_ref();
    widgets.add_widget(a.clone(), 0);
    widgets.add_widget(MockWidget::new("b", &log).into_ref(), 1);
    widgets.run_frame();
    log.clear();

    let commands = widgets.commands();
    thread::spawn(move || commands.set_widget_z_order(a, 5))
        .join()
        .unwrap();
    widgets.run_frame();

    assert_eq!(log.widgets_in(FramePhase::Render), ["b", "a"]);
    assert!(!widgets.is_sort_pending());
}

#[test]
fn test_viewport_command() {
    let log = CallLog::new();
    let mut widgets = subsystem();
    let v: WidgetRef = MockWidget::new("viewport", &log).into_ref();
    widgets.commands().set_viewport_widget(v.clone());

    widgets.begin_frame();

    assert!(same_widget(&widgets.viewport_widget().unwrap(), &v));
    // The viewport anchor is not dispatched.
    assert!(log.phases_for("viewport").is_empty());
}

#[test]
fn test_commands_outliving_subsystem_are_dropped() {
    let log = CallLog::new();
    let commands = subsystem().commands();
    commands.add_widget(MockWidget::new("orphan", &log).into_ref(), 0);
    assert!(log.calls().is_empty());
}
