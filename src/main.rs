//! Headless runner: plays a simulated stream and prints the result

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;
    use live_brawl::consts::SIM_DT;
    use live_brawl::sim::GamePhase;
    use live_brawl::{Session, Settings};

    env_logger::init();
    log::info!("Live Brawl (native) starting...");

    let settings = Settings::load();

    let clock_seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = Session::new(settings, clock_seed);
    session.start();

    // Five minutes of stream at 60 fps
    let frames = 5 * 60 * 60;
    for frame in 0..frames {
        // Sway up and down the platform, always pressing forward and firing
        let sway = ((frame as f32) * 0.02).sin();
        session.set_input(Vec2::new(0.6, sway), true, frame % 180 == 0);
        session.update(SIM_DT);

        match session.phase() {
            GamePhase::GameOver => break,
            GamePhase::Victory => session.next_wave(),
            _ => {}
        }
    }

    let state = session.snapshot();
    println!("\n=== Live Brawl ===");
    println!("Outcome:    {:?}", state.phase);
    println!("Wave:       {}", state.wave);
    println!("Score:      {}", state.score);
    println!("Kills:      {} (best combo {})", state.kills, state.best_combo);
    println!(
        "Gifts:      {} received, {} applied",
        session.dispatcher().received(),
        session.dispatcher().applied()
    );
    println!("\nTop gifters:");
    for (rank, gifter) in session.leaderboard().top(5).iter().enumerate() {
        println!(
            "  {}. {:<14} {:>7} diamonds ({} gifts)",
            rank + 1,
            gifter.username,
            gifter.diamonds,
            gifter.gift_count
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
