//! Building widgets on the task pool.
//!
//! This example shows how to:
//! - Install widgets and a task pool with `DefaultPlugins`
//! - Produce widgets off the frame thread
//! - Hand them back through `WidgetCommands`, applied at the next begin frame
//!
//! Run with: cargo run -p orrery --example async_widgets

use std::time::Duration;

use orrery::prelude::*;

struct Toast {
    state: WidgetState,
    message: String,
    frames_left: u32,
}

impl Widget for Toast {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn update(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
        if self.frames_left == 0 {
            self.mark_as_garbage();
        }
    }

    fn render(&self) {
        println!("  [z={:>2}] {}", self.z_order(), self.message);
    }
}

/// Stand-in for slow work such as decoding an icon or fetching text.
async fn load_message(i: u32) -> String {
    for _ in 0..i {
        futures_lite::future::yield_now().await;
    }
    format!("toast #{i} loaded on {:?}", std::thread::current().name())
}

fn main() {
    orrery::core::logging::init();

    let mut engine = Engine::builder()
        .with_config(Config::default().with_benchmark(BenchmarkMode::Off))
        .add_plugins(DefaultPlugins)
        .build();

    let commands = engine.get::<WidgetSubsystem>().unwrap().commands();
    let pool = engine.get::<TaskPool>().unwrap();

    let tasks: Vec<_> = (0..4u32)
        .map(|i| {
            pool.spawn_widget(&commands, i as i32, async move {
                let message = load_message(i).await;
                let toast: WidgetRef = widget_ref(Toast {
                    state: WidgetState::new(format!("toast{i}")),
                    message,
                    frames_left: i + 1,
                });
                toast
            })
        })
        .collect();

    for task in tasks {
        pollster::block_on(task);
    }

    for frame in 1..=5 {
        println!("=== Frame {frame} ===");
        engine.run_frame();
        let count = engine.get::<WidgetSubsystem>().unwrap().widget_count();
        println!("  {count} widgets registered");
        std::thread::sleep(Duration::from_millis(16));
    }

    engine.shutdown();
}
