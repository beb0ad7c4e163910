//! Fixed timestep game tick
//!
//! Each tick, in order:
//! 1. advance every tile animation once
//! 2. spawn the pending tile if the board has settled
//! 3. accept at most one move, applied to the whole board at once

use super::autoplay;
use super::direction::Direction;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::WINNING_VALUE;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Player move, ignored while the board is animating
    pub direction: Option<Direction>,
    /// Start a new run
    pub restart: bool,
    /// Idle/demo mode - the bot picks the move
    pub autoplay: bool,
}

/// Advance the game by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.restart {
        match state.restart() {
            Ok(()) => events.push(GameEvent::Restarted { seed: state.seed }),
            Err(e) => log::error!("Restart failed: {}", e),
        }
        return events;
    }

    if state.phase == GamePhase::GameOver {
        return events;
    }

    state.time_ticks += 1;
    state.board_mut().update();

    if state.pending_spawn && state.board().is_settled() {
        state.pending_spawn = false;
        match state.spawn_tile() {
            Ok((row, col)) => {
                let value = state
                    .board()
                    .get(row, col)
                    .ok()
                    .flatten()
                    .map_or(0, |tile| tile.value());
                events.push(GameEvent::Spawned { row, col, value });
            }
            Err(e) => log::warn!("Spawn skipped: {}", e),
        }
    }

    update_phase(state, &mut events);

    if state.accepts_input() {
        let direction = if input.autoplay {
            autoplay::choose_move(state.board())
        } else {
            input.direction
        };
        if let Some(direction) = direction {
            apply_move(state, direction, &mut events);
        }
    }

    events
}

/// Settle gate: input only once nothing animates and no spawn is owed
fn update_phase(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.pending_spawn || !state.board().is_settled() {
        state.phase = GamePhase::Animating;
        return;
    }

    if state.board().available_moves() {
        state.phase = GamePhase::Ready;
    } else {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over after {} moves: score {}, best tile {}",
            state.moves,
            state.score,
            state.best_tile().unwrap_or(0)
        );
        events.push(GameEvent::GameOver { score: state.score });
    }
}

fn apply_move(state: &mut GameState, direction: Direction, events: &mut Vec<GameEvent>) {
    let before = state.board().snapshot();
    let outcome = state.board_mut().play(direction);
    if !outcome.moved {
        return;
    }

    state.previous_board = Some(before);
    state.score += outcome.score_delta;
    state.moves += 1;
    state.pending_spawn = true;
    state.phase = GamePhase::Animating;
    events.push(GameEvent::Moved {
        direction,
        score_delta: outcome.score_delta,
    });

    if !state.won {
        if let Some(value) = state.best_tile().filter(|&v| v >= WINNING_VALUE) {
            state.won = true;
            log::info!("Reached {} after {} moves", value, state.moves);
            events.push(GameEvent::Won { value });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::BoardSnapshot;
    use crate::tuning::Tuning;

    fn run_until_ready(state: &mut GameState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..1000 {
            events.extend(tick(state, &TickInput::default()));
            if state.phase != GamePhase::Animating {
                break;
            }
        }
        events
    }

    fn game(rows: Vec<Vec<Option<u32>>>) -> GameState {
        let snapshot = BoardSnapshot { cells: rows };
        GameState::from_snapshot(7, &snapshot, Tuning::default(), 0).unwrap()
    }

    #[test]
    fn test_new_game_becomes_ready_after_pop_in() {
        let mut state = GameState::new(12345).unwrap();
        assert!(!state.accepts_input());
        run_until_ready(&mut state);
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.board().is_settled());
    }

    #[test]
    fn test_move_spawns_exactly_one_tile_after_settling() {
        let mut state = game(vec![
            vec![Some(2), Some(2), None, None],
            vec![None; 4],
            vec![None; 4],
            vec![None; 4],
        ]);
        run_until_ready(&mut state);

        let input = TickInput {
            direction: Some(Direction::Left),
            ..Default::default()
        };
        let events = tick(&mut state, &input);
        assert_eq!(
            events,
            vec![GameEvent::Moved {
                direction: Direction::Left,
                score_delta: 4
            }]
        );
        assert_eq!(state.score, 4);
        assert!(state.pending_spawn);
        assert_eq!(state.board().tiles().count(), 1);

        // Input is ignored while the merge animates
        let ignored = TickInput {
            direction: Some(Direction::Right),
            ..Default::default()
        };
        tick(&mut state, &ignored);
        assert_eq!(state.moves, 1);
        assert_eq!(state.board().tiles().count(), 1);

        let events = run_until_ready(&mut state);
        let spawns = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawns, 1);
        assert_eq!(state.board().tiles().count(), 2);
        assert_eq!(state.phase, GamePhase::Ready);

        let previous = state.previous_board.as_ref().unwrap();
        assert_eq!(previous.cells[0], vec![Some(2), Some(2), None, None]);
    }

    #[test]
    fn test_blocked_move_does_not_spawn() {
        let mut state = game(vec![vec![Some(2), None], vec![None, None]]);
        run_until_ready(&mut state);

        let input = TickInput {
            direction: Some(Direction::Left),
            ..Default::default()
        };
        let events = tick(&mut state, &input);
        assert!(events.is_empty());
        assert!(!state.pending_spawn);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.moves, 0);
    }

    #[test]
    fn test_game_over_only_once_settled() {
        let mut state = game(vec![vec![Some(2), Some(4)], vec![Some(4), Some(2)]]);
        let events = run_until_ready(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(events, vec![GameEvent::GameOver { score: 0 }]);

        // Frozen until restart
        let before = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, before);

        let events = tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert!(matches!(events.as_slice(), [GameEvent::Restarted { .. }]));
        assert_eq!(state.phase, GamePhase::Animating);
        assert_eq!(state.board().size(), 2);
    }

    #[test]
    fn test_game_over_waits_for_spawn_to_pop_in() {
        let mut state = game(vec![vec![Some(8), None], vec![Some(16), Some(32)]]);
        run_until_ready(&mut state);

        let events = tick(
            &mut state,
            &TickInput {
                direction: Some(Direction::Right),
                ..Default::default()
            },
        );
        assert!(matches!(events.as_slice(), [GameEvent::Moved { .. }]));

        // Slide, then spawn into the last empty cell
        let mut spawned = false;
        for _ in 0..100 {
            let events = tick(&mut state, &TickInput::default());
            assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
            if events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })) {
                spawned = true;
                break;
            }
        }
        assert!(spawned);

        // Occupancy is already terminal but the new tile is still popping in
        assert!(!state.board().available_moves());
        assert!(state.board().is_new());
        assert_eq!(state.phase, GamePhase::Animating);

        let events = run_until_ready(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_reaching_winning_value_fires_once() {
        let mut state = game(vec![
            vec![Some(1024), Some(1024), None, None],
            vec![None; 4],
            vec![None; 4],
            vec![None; 4],
        ]);
        run_until_ready(&mut state);

        let events = tick(
            &mut state,
            &TickInput {
                direction: Some(Direction::Left),
                ..Default::default()
            },
        );
        assert!(events.contains(&GameEvent::Won { value: 2048 }));
        assert!(state.won);

        run_until_ready(&mut state);
        let events = tick(
            &mut state,
            &TickInput {
                direction: Some(Direction::Right),
                ..Default::default()
            },
        );
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Won { .. })));
    }

    #[test]
    fn test_autoplay_runs_to_game_over() {
        let mut state = GameState::new(2024).unwrap();
        let input = TickInput {
            autoplay: true,
            ..Default::default()
        };

        let mut ticks = 0;
        while !state.is_game_over() && ticks < 500_000 {
            tick(&mut state, &input);
            ticks += 1;
        }

        assert!(state.is_game_over());
        assert!(state.moves > 20);
        assert!(!state.board().available_moves());
        assert!(state.score > 0);
    }
}
