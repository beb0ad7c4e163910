//! Slide 2048 headless driver
//!
//! Runs the fixed-tick game loop without a window. The bot plays unless
//! autoplay is disabled, in which case moves are read from stdin
//! (`up`/`down`/`left`/`right`, `restart`, `quit`).
//!
//! Usage: `slide-2048 [settings.json] [seed]`

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use slide_2048::Settings;
use slide_2048::consts::TICKS_PER_SECOND;
use slide_2048::sim::{Direction, GameEvent, GamePhase, GameState, TickInput, tick};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let mut settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    if let Some(seed) = args.next() {
        match seed.parse::<u64>() {
            Ok(seed) => settings.seed = Some(seed),
            Err(e) => {
                log::error!("Invalid seed {:?}: {}", seed, e);
                return ExitCode::FAILURE;
            }
        }
    }

    let mut state = match GameState::from_settings(&settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to start game: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Slide 2048 starting (seed {})", state.seed);

    if settings.autoplay {
        run_autoplay(&mut state, settings.max_ticks);
    } else if let Err(e) = run_interactive(&mut state) {
        log::error!("Input error: {}", e);
        return ExitCode::FAILURE;
    }

    println!("{}", state.board());
    println!(
        "Score: {}  Moves: {}  Best tile: {}  Time: {:.1}s",
        state.score,
        state.moves,
        state.best_tile().unwrap_or(0),
        state.time_ticks as f64 / f64::from(TICKS_PER_SECOND)
    );
    ExitCode::SUCCESS
}

fn run_autoplay(state: &mut GameState, max_ticks: u64) {
    let input = TickInput {
        autoplay: true,
        ..Default::default()
    };

    while !state.is_game_over() && (max_ticks == 0 || state.time_ticks < max_ticks) {
        for event in tick(state, &input) {
            log_event(&event);
        }
    }
}

fn run_interactive(state: &mut GameState) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        // Drain animation so the prompt always shows a settled board
        while state.phase == GamePhase::Animating {
            for event in tick(state, &TickInput::default()) {
                log_event(&event);
            }
        }
        if state.is_game_over() {
            return Ok(());
        }

        print!("{}\nscore {} > ", state.board(), state.score);
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };
        let command = line.trim();
        let input = match command {
            "" => continue,
            "quit" | "q" => return Ok(()),
            "restart" => TickInput {
                restart: true,
                ..Default::default()
            },
            other => match other.parse::<Direction>() {
                Ok(direction) => TickInput {
                    direction: Some(direction),
                    ..Default::default()
                },
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            },
        };

        for event in tick(state, &input) {
            log_event(&event);
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Moved {
            direction,
            score_delta,
        } => log::debug!("move {} (+{})", direction, score_delta),
        GameEvent::Spawned { row, col, value } => {
            log::debug!("spawn {} at ({}, {})", value, row, col)
        }
        GameEvent::Won { value } => log::info!("Reached {}!", value),
        GameEvent::GameOver { score } => log::info!("Game over, final score {}", score),
        GameEvent::Restarted { seed } => log::info!("Restarted with seed {}", seed),
    }
}
