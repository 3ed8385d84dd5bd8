//! Duel Pong headless driver
//!
//! Runs an auto-played rally against the physics core with jittery frame
//! times and a mid-rally resize, logging what happens. No rendering.
//!
//! Optional first argument: path to a JSON physics settings file.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use duel_pong::PhysicsSettings;
    use duel_pong::sim::{GamePhase, Match, PhysicsEvent, Side, Viewport};

    env_logger::init();
    log::info!("Duel Pong (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path).map(|json| PhysicsSettings::from_json(&json)) {
            Ok(Ok(settings)) => settings,
            Ok(Err(e)) => {
                log::warn!("invalid settings in {path}: {e}; using defaults");
                PhysicsSettings::default()
            }
            Err(e) => {
                log::warn!("cannot read {path}: {e}; using defaults");
                PhysicsSettings::default()
            }
        },
        None => PhysicsSettings::default(),
    };

    let seed = 20_241_019;
    let mut game = Match::new(seed, Viewport::new(960.0, 540.0), settings);
    game.set_phase(GamePhase::Playing);
    game.serve(Side::Right);

    // Uneven frame pacing, plus one long stall
    let pacing = [1.0 / 60.0, 1.0 / 58.0, 1.0 / 144.0, 1.0 / 30.0, 1.0 / 60.0];
    let mut scores = [0u32; 2];
    let mut events: Vec<PhysicsEvent> = Vec::new();
    let mut elapsed = 0.0f32;

    for frame in 0..60 * 60 {
        let delta = if frame == 900 { 1.5 } else { pacing[frame % pacing.len()] };
        elapsed += delta;

        if frame == 1800 {
            game.resize(Viewport::new(1280.0, 720.0));
        }

        track_ball(&mut game, Side::Left, 0.9);
        track_ball(&mut game, Side::Right, 0.75);

        let report = game.frame(delta, &mut events);
        if let Some(side) = report.exited {
            let scorer = side.opponent();
            scores[scorer.index()] += 1;
            log::info!(
                "point to {:?} at {:.1}s (left {} - right {})",
                scorer,
                elapsed,
                scores[0],
                scores[1]
            );
            game.restart_ball();
            game.serve(side);
        }
    }

    let paddle_hits = events
        .iter()
        .filter(|e| matches!(e, PhysicsEvent::PaddleHit { .. }))
        .count();
    let wall_hits = events
        .iter()
        .filter(|e| matches!(e, PhysicsEvent::WallHit(_)))
        .count();

    println!("Final score: left {} - right {}", scores[0], scores[1]);
    println!("Paddle hits: {paddle_hits}, wall hits: {wall_hits}");
}

/// Simple tracker: move a fraction of the way toward the ball each frame
#[cfg(not(target_arch = "wasm32"))]
fn track_ball(game: &mut duel_pong::sim::Match, side: duel_pong::sim::Side, gain: f32) {
    let viewport = game.viewport;
    let target = game.ball.position().y;
    let paddle = game.paddle_mut(side);
    let dy = (target - paddle.center_y()) * gain;
    let max_step = viewport.height * 0.02;
    paddle.move_by(dy.clamp(-max_step, max_step), &viewport);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the host page drives `Match::frame`
}
