//! Typefall entry point
//!
//! Headless demo: runs a full autopilot game at the fixed sim rate and
//! narrates it through the log. Useful for smoke-testing balance changes
//! and word lists without a frontend.
//!
//! Usage: typefall [WORD_FILE] [SEED]

use std::env;
use std::process::ExitCode;

use typefall::consts::SIM_DT;
use typefall::sim::{GameEvent, SceneKind, TickInput};
use typefall::{Game, GameConfig, WordBank};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let word_file = args.next();
    let seed = match args.next() {
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("seed must be an unsigned integer, got {:?}", raw);
                return ExitCode::FAILURE;
            }
        },
        None => 0xD1CE,
    };

    let config = GameConfig::default();
    let bank = match word_file.as_deref() {
        Some(path) => WordBank::load_or_fallback(path, config.repeat_window),
        None => WordBank::fallback(config.repeat_window),
    };
    log::info!("word bank ready ({} words)", bank.len());

    let mut game = Game::new(config, bank, seed);

    // Kick off the run, then let the autopilot type
    game.tick(
        &TickInput {
            start: true,
            ..TickInput::default()
        },
        SIM_DT,
    );
    let input = TickInput {
        autoplay: true,
        ..TickInput::default()
    };

    let mut ticks: u64 = 0;
    // Five stock waves at demo pace finish well inside this
    let max_ticks = 60 * 60 * 30;
    while !game.is_over() && ticks < max_ticks {
        let report = game.tick(&input, SIM_DT);
        ticks += 1;
        for event in &report.events {
            narrate(*event, &game);
        }
    }

    let snap = game.snapshot();
    println!(
        "{} after {:.1}s (wave {}, {} lives left)",
        match snap.scene {
            SceneKind::Win => "cleared",
            SceneKind::Lose => "defeated",
            _ => "gave up",
        },
        ticks as f32 * SIM_DT,
        snap.wave_index + 1,
        snap.lives,
    );

    if game.is_over() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn narrate(event: GameEvent, game: &Game) {
    match event {
        GameEvent::WaveStarted { index } => println!("-- wave {} --", index + 1),
        GameEvent::WordCompleted { id } => {
            if let Some(word) = game.play_state().and_then(|p| p.pool.word(id)) {
                println!("typed {:?}", word.text);
            }
        }
        GameEvent::LifeLost { remaining } => println!("ouch! {} lives left", remaining),
        GameEvent::Victory => println!("all waves cleared"),
        GameEvent::Defeat => println!("overrun"),
        _ => {}
    }
}
