//! Widgets owned by game entities.
//!
//! This example shows how to:
//! - Key widgets to entities through generation-checked owner keys
//! - Drop every widget of an entity when it is destroyed
//! - Let a widget retire itself by flagging garbage
//! - Reorder widgets by changing their z-order
//!
//! Run with: cargo run -p orrery --example coin_hud

use std::sync::Arc;

use orrery::prelude::*;
use parking_lot::Mutex;

#[derive(Default)]
struct Score {
    collected: u32,
}

struct Coin {
    value: u32,
}

/// Floating label above a coin.
struct CoinLabel {
    state: WidgetState,
    value: u32,
}

impl Widget for CoinLabel {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn render(&self) {
        println!("  [z={:>3}] {} (+{})", self.z_order(), self.name(), self.value);
    }
}

/// Score counter that disappears once the player has enough coins.
struct ScoreCounter {
    state: WidgetState,
    score: Arc<Mutex<Score>>,
    goal: u32,
}

impl Widget for ScoreCounter {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn update(&mut self) {
        if self.score.lock().collected >= self.goal {
            println!("  goal reached, retiring {}", self.name());
            self.mark_as_garbage();
        }
    }

    fn render(&self) {
        println!(
            "  [z={:>3}] {}: {}/{}",
            self.z_order(),
            self.name(),
            self.score.lock().collected,
            self.goal
        );
    }
}

fn main() {
    orrery::core::logging::init();

    let mut engine = Engine::builder()
        .add_plugin(WidgetPlugin::default())
        .build();

    let score = Arc::new(Mutex::new(Score::default()));
    let mut coins: SparseSet<Coin> = SparseSet::new();

    let counter: WidgetRef = widget_ref(ScoreCounter {
        state: WidgetState::new("score"),
        score: score.clone(),
        goal: 15,
    });

    {
        let widgets = engine.get_mut::<WidgetSubsystem>().unwrap();
        widgets.add_widget(counter.clone(), 100);

        for (i, value) in [5, 10, 25].into_iter().enumerate() {
            let slot = coins.push(Coin { value });
            let label = widget_ref(CoinLabel {
                state: WidgetState::new(format!("coin{i}")),
                value,
            });
            widgets.add_widget_to_entity(label, OwnerKey::from(slot), i as i32);
        }
    }

    println!("=== Frame 1: three coins ===");
    engine.run_frame();

    println!("\n=== Frame 2: collect the first two coins ===");
    let collected: Vec<IndexSlot> = coins.iter_with_slots().take(2).map(|(s, _)| s).collect();
    for slot in collected {
        let coin = coins.remove(slot);
        score.lock().collected += coin.value;

        let widgets = engine.get_mut::<WidgetSubsystem>().unwrap();
        widgets.remove_all_widgets_from_entity(OwnerKey::from(slot));
    }
    engine.run_frame();

    println!("\n=== Frame 3: sweep the counter, raise the last label to the top ===");
    {
        let widgets = engine.get_mut::<WidgetSubsystem>().unwrap();
        if let Some(label) = widgets.find_widget_by_name("coin2") {
            widgets.set_widget_z_order(&label, 200);
        }
    }
    engine.run_frame();
    let widgets = engine.get::<WidgetSubsystem>().unwrap();
    println!("  counter registered: {}", widgets.contains_widget(&counter));

    // A new coin reuses a freed slot, but the old key no longer matches.
    let reused = OwnerKey::from(coins.push(Coin { value: 1 }));
    println!(
        "\nWidgets left: {}, widgets on recycled slot: {}",
        widgets.widget_count(),
        widgets.widgets_by_owner(reused).len()
    );

    engine.shutdown();
}
