//! Integration tests for quoridor-rust
//!
//! These drive the public API end to end: rules, snapshots, the action log and
//! the search.

use fastrand::Rng;

use quoridor_rust::Error;
use quoridor_rust::action::Action;
use quoridor_rust::board::{Board, Coord};
use quoridor_rust::config::SearchConfig;
use quoridor_rust::game::{GameState, Outcome, PlayerId};
use quoridor_rust::history::ActionLog;
use quoridor_rust::mcts::search_with_rng;
use quoridor_rust::moves::find_valid_moves;
use quoridor_rust::path::shortest_route;

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

fn mv(from: Coord, to: Coord) -> Action {
    Action::Move { from, to }
}

/// Play a sequence of pawn moves, checking each one.
fn setup_game(size: usize, moves: &[(Coord, Coord)]) -> GameState {
    let mut game = GameState::with_size(size).unwrap();
    for &(from, to) in moves {
        game.try_action(&mv(from, to)).unwrap();
    }
    game
}

/// Play up to `turns` random legal actions, stopping early if someone wins.
/// Returns every action played, in order.
fn random_play(game: &mut GameState, turns: usize, rng: &mut Rng) -> Vec<Action> {
    let mut played = Vec::new();
    for _ in 0..turns {
        if game.check_winner(false).is_some() {
            break;
        }
        let actions = game.valid_actions();
        if actions.is_empty() {
            break;
        }
        let action = actions[rng.usize(..actions.len())];
        game.do_action(&action);
        played.push(action);
    }
    played
}

/// Both pawns still have some way to their goal, ignoring each other.
fn both_can_reach_goal(game: &GameState) -> bool {
    [PlayerId::P1, PlayerId::P2].iter().all(|&id| {
        let player = game.player(id);
        shortest_route(game.board(), player.position(), player.goal_line(), None).is_some()
    })
}

// =============================================================================
// Opening scenario on a 3x3 board
// =============================================================================

#[test]
fn test_initial_3x3_layout() {
    let game = GameState::with_size(3).unwrap();
    assert_eq!(game.player(PlayerId::P1).position(), (2, 4));
    assert_eq!(game.player(PlayerId::P2).position(), (2, 0));
    assert_eq!(game.player(PlayerId::P1).goal_line(), 0);
    assert_eq!(game.player(PlayerId::P2).goal_line(), 4);
    assert_eq!(game.check_winner(false), None);
    assert_eq!(game.outcome(), Outcome::InProgress);
}

#[test]
fn test_cannot_move_onto_opponent() {
    let mut game = setup_game(3, &[((2, 4), (2, 2))]);
    assert_eq!(game.current_turn(), PlayerId::P2);

    let moves = game.valid_moves(true);
    assert!(!moves.contains(&(2, 2)));
    // Jumping over P1 lands on the now empty bottom platform.
    assert!(moves.contains(&(2, 4)));

    let result = game.try_action(&mv((2, 0), (2, 2)));
    assert!(matches!(result, Err(Error::IllegalAction { .. })));
    assert_eq!(game.turn_count(), 2);
}

// =============================================================================
// Winner prediction
// =============================================================================

/// P1 on (0,2), one step from goal, with P1 to move.
fn p1_near_goal(p2_final: Coord) -> GameState {
    setup_game(
        3,
        &[
            ((2, 4), (0, 4)),
            ((2, 0), (4, 0)),
            ((0, 4), (0, 2)),
            ((4, 0), p2_final),
        ],
    )
}

fn without_p2_walls(game: &GameState) -> GameState {
    let mut snapshot = game.snapshot();
    snapshot.p2.remaining_walls = 0;
    GameState::from_snapshot(&snapshot).unwrap()
}

#[test]
fn test_future_winner_needs_opponent_out_of_walls() {
    let game = p1_near_goal((2, 0));
    assert_eq!(game.current_turn(), PlayerId::P1);
    assert_eq!(game.player(PlayerId::P1).distance_to_goal(), Some(1));
    assert_eq!(game.player(PlayerId::P2).distance_to_goal(), Some(2));

    // P2 can still wall P1 in.
    assert_eq!(game.check_winner(true), None);

    let game = without_p2_walls(&game);
    assert_eq!(game.check_winner(true), Some(PlayerId::P1));
    // A prediction is not a rules outcome.
    assert_eq!(game.check_winner(false), None);
}

#[test]
fn test_future_winner_needs_strictly_shorter_route() {
    let game = without_p2_walls(&p1_near_goal((4, 2)));
    assert_eq!(game.player(PlayerId::P2).distance_to_goal(), Some(1));
    assert_eq!(game.check_winner(true), None);
}

// =============================================================================
// Move generation and routes
// =============================================================================

#[test]
fn test_jump_replaces_adjacent_cell() {
    let board = Board::new(5).unwrap();
    let moves = find_valid_moves(&board, (4, 4), Some((4, 2)));
    assert!(moves.contains(&(4, 0)));
    assert!(!moves.contains(&(4, 2)));
    assert!(!moves.contains(&(4, 4)));

    let game = setup_game(5, &[((4, 8), (4, 6)), ((4, 0), (4, 2)), ((4, 6), (4, 4))]);
    let moves = game.valid_moves(true);
    assert!(moves.contains(&(4, 6)));
    assert!(!moves.contains(&(4, 4)));
}

#[test]
fn test_jump_never_lands_on_opponent_in_random_play() {
    let mut rng = Rng::with_seed(31);
    for _ in 0..5 {
        let mut game = GameState::with_size(5).unwrap();
        for action in random_play(&mut game.clone(), 40, &mut rng) {
            let opponent = game.opponent().position();
            let me = game.current_player().position();
            let moves = game.valid_moves(true);
            assert!(!moves.contains(&opponent));
            assert!(!moves.contains(&me));
            game.do_action(&action);
        }
    }
}

#[test]
fn test_shortest_route_is_deterministic() {
    let mut rng = Rng::with_seed(8);
    let mut game = GameState::with_size(5).unwrap();
    random_play(&mut game, 12, &mut rng);
    let first = game.shortest_route(true);
    let second = game.shortest_route(true);
    assert_eq!(first, second);
    if let Some(route) = first {
        assert_eq!(route[0], game.current_player().position());
    }
}

// =============================================================================
// Wall legality
// =============================================================================

#[test]
fn test_valid_blocks_never_seal_a_player() {
    let mut rng = Rng::with_seed(99);
    for _ in 0..3 {
        let mut game = GameState::with_size(5).unwrap();
        for _ in 0..30 {
            if game.check_winner(false).is_some() {
                break;
            }
            for wall in game.valid_blocks() {
                let mut probe = game.clone();
                probe.do_action(&Action::Block(wall));
                assert!(both_can_reach_goal(&probe), "{wall} seals a player");
            }
            let actions = game.valid_actions();
            let action = actions[rng.usize(..actions.len())];
            game.do_action(&action);
        }
    }
}

// =============================================================================
// Do / undo and the action log
// =============================================================================

#[test]
fn test_do_then_undo_restores_state() {
    let mut rng = Rng::with_seed(5);
    let mut game = GameState::with_size(5).unwrap();
    random_play(&mut game, 10, &mut rng);
    let before = game.clone();
    for action in game.clone().valid_actions() {
        game.do_action(&action);
        game.undo_action(&action);
        assert_eq!(game, before, "{action} was not undone cleanly");
    }
}

#[test]
fn test_action_log_replays_game() {
    let mut rng = Rng::with_seed(12);
    let start = GameState::with_size(4).unwrap();
    let mut game = start.clone();
    let mut log = ActionLog::new();
    for action in random_play(&mut start.clone(), 20, &mut rng) {
        game.do_action(&action);
        log.record(action);
    }
    let end = game.clone();

    while let Some(action) = log.previous() {
        game.undo_action(&action);
    }
    assert_eq!(game, start);

    while let Some(action) = log.next() {
        game.do_action(&action);
    }
    assert_eq!(game, end);

    // The exported record replays through the checked entry point.
    let replayed = ActionLog::from_json(&log.to_json().unwrap()).unwrap();
    let mut fresh = start.clone();
    for action in replayed.export_record() {
        fresh.try_action(&action).unwrap();
    }
    assert_eq!(fresh, end);
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn test_snapshot_roundtrip_behaves_identically() {
    let mut rng = Rng::with_seed(44);
    let mut game = GameState::with_size(5).unwrap();
    random_play(&mut game, 15, &mut rng);

    let restored = GameState::from_json(&game.to_json().unwrap()).unwrap();
    assert_eq!(restored.valid_actions(), game.valid_actions());
    assert_eq!(restored.check_winner(false), game.check_winner(false));
    assert_eq!(restored.check_winner(true), game.check_winner(true));
    assert_eq!(restored.to_string(), game.to_string());
}

#[test]
fn test_snapshot_is_independent_copy() {
    let game = GameState::with_size(3).unwrap();
    let mut copy = GameState::from_snapshot(&game.snapshot()).unwrap();
    copy.do_action(&mv((2, 4), (2, 2)));
    assert_eq!(game.player(PlayerId::P1).position(), (2, 4));
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_3x3_picks_valid_action() {
    let game = GameState::with_size(3).unwrap();
    let config = SearchConfig::with_iterations(1000);
    let mut rng = Rng::with_seed(2024);
    let result = search_with_rng(&game, &config, &mut rng, |_| {}).unwrap();
    assert!(game.valid_actions().contains(&result.action));
    assert_eq!(result.state.turn_count(), game.turn_count() + 1);
}

#[test]
fn test_search_rejects_finished_game() {
    // P1 walks straight up the middle while P2 sidesteps.
    let game = setup_game(
        3,
        &[((2, 4), (2, 2)), ((2, 0), (0, 0)), ((2, 2), (2, 0))],
    );
    assert_eq!(game.outcome(), Outcome::Terminal(PlayerId::P1));
    let mut rng = Rng::with_seed(1);
    let result = search_with_rng(&game, &SearchConfig::with_iterations(10), &mut rng, |_| {});
    assert!(matches!(result, Err(Error::GameOver { winner: PlayerId::P1 })));
}

#[test]
fn test_search_does_not_modify_root() {
    let game = GameState::with_size(3).unwrap();
    let before = game.clone();
    let mut rng = Rng::with_seed(3);
    search_with_rng(&game, &SearchConfig::with_iterations(100), &mut rng, |_| {}).unwrap();
    assert_eq!(game, before);
}
