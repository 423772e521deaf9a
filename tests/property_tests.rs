//! Property-based tests for the board engine and session rules.
//!
//! These tests use proptest to verify invariants hold across many
//! randomly generated boards and play sequences.

use proptest::prelude::*;
use slide48::checkpoint::{MemoryStore, SavedSession, SessionStore};
use slide48::core::{apply_move, resolve_line, Board, Cell, Direction, BOARD_SIZE};
use slide48::history::{History, Snapshot, HISTORY_CAP};
use slide48::session::{Session, UNDO_BUDGET};

fn arbitrary_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        3 => Just(None),
        // Powers of two from 2 up to 2048.
        2 => (1u32..=11).prop_map(|exp| Some(1 << exp)),
    ]
}

fn arbitrary_line() -> impl Strategy<Value = [Cell; BOARD_SIZE]> {
    [
        arbitrary_cell(),
        arbitrary_cell(),
        arbitrary_cell(),
        arbitrary_cell(),
    ]
}

fn arbitrary_board() -> impl Strategy<Value = Board> {
    [
        arbitrary_line(),
        arbitrary_line(),
        arbitrary_line(),
        arbitrary_line(),
    ]
    .prop_map(Board::from_rows)
}

fn arbitrary_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn line_sum(line: &[Cell; BOARD_SIZE]) -> u64 {
    line.iter().flatten().map(|&v| u64::from(v)).sum()
}

fn board_sum(board: &Board) -> u64 {
    board.cells().flatten().map(u64::from).sum()
}

proptest! {
    #[test]
    fn resolving_a_resolved_line_changes_nothing(line in arbitrary_line()) {
        let once = resolve_line(line);
        let twice = resolve_line(once.line);
        prop_assert_eq!(twice.line, once.line);
        prop_assert_eq!(twice.score_delta, 0);
        prop_assert!(twice.merges.is_empty());
    }

    #[test]
    fn resolve_preserves_total_tile_value(line in arbitrary_line()) {
        let resolved = resolve_line(line);
        prop_assert_eq!(line_sum(&resolved.line), line_sum(&line));
    }

    #[test]
    fn each_merge_consumes_exactly_two_tiles(line in arbitrary_line()) {
        let resolved = resolve_line(line);
        let tiles_in = line.iter().flatten().count();
        let tiles_out = resolved.line.iter().flatten().count();
        prop_assert_eq!(tiles_in - tiles_out, resolved.merges.len());
        // No tile merges twice, so at most two merges fit in four cells.
        prop_assert!(resolved.merges.len() <= 2);
    }

    #[test]
    fn score_delta_is_the_sum_of_merge_results(line in arbitrary_line()) {
        let resolved = resolve_line(line);
        let merged: u32 = resolved.merges.iter().map(|m| m.value).sum();
        prop_assert_eq!(resolved.score_delta, merged);
    }

    #[test]
    fn resolved_lines_are_densely_packed(line in arbitrary_line()) {
        let resolved = resolve_line(line);
        let mut seen_empty = false;
        for cell in resolved.line {
            if cell.is_none() {
                seen_empty = true;
            } else {
                prop_assert!(!seen_empty, "tile after a gap in {:?}", resolved.line);
            }
        }
    }

    #[test]
    fn moves_preserve_total_tile_value(board in arbitrary_board(), dir in arbitrary_direction()) {
        let outcome = apply_move(&board, dir);
        prop_assert_eq!(board_sum(&outcome.board), board_sum(&board));
    }

    #[test]
    fn repeating_a_move_without_a_spawn_changes_nothing(
        board in arbitrary_board(),
        dir in arbitrary_direction(),
    ) {
        let once = apply_move(&board, dir);
        let twice = apply_move(&once.board, dir);
        prop_assert!(!twice.changed);
        prop_assert_eq!(twice.board, once.board);
    }

    #[test]
    fn unchanged_outcome_means_identical_board(
        board in arbitrary_board(),
        dir in arbitrary_direction(),
    ) {
        let outcome = apply_move(&board, dir);
        prop_assert_eq!(outcome.changed, outcome.board != board);
    }

    #[test]
    fn boards_with_an_empty_cell_are_never_terminal(board in arbitrary_board()) {
        if board.count_empty() > 0 {
            prop_assert!(!board.is_terminal());
        }
    }

    #[test]
    fn history_never_exceeds_its_cap(scores in prop::collection::vec(any::<u32>(), 0..12)) {
        let mut history = History::new();
        for score in scores {
            history.push(Snapshot {
                board: Board::empty(),
                score,
                time_remaining: 0,
                timed: false,
            });
            prop_assert!(history.len() <= HISTORY_CAP);
        }
    }

    #[test]
    fn board_survives_json_round_trip(board in arbitrary_board()) {
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, board);
    }

    #[test]
    fn random_play_upholds_session_invariants(
        seed in any::<u64>(),
        inputs in prop::collection::vec((arbitrary_direction(), any::<bool>()), 1..40),
    ) {
        let mut session = Session::start_seeded(false, None, 0, seed);
        let mut undos_used = 0u8;

        for (direction, try_undo) in inputs {
            if try_undo {
                let could = session.can_undo();
                let before = session.undos_remaining();
                let events = session.undo();
                if could {
                    prop_assert!(!events.is_empty());
                    prop_assert_eq!(session.undos_remaining(), before - 1);
                    undos_used += 1;
                } else {
                    prop_assert!(events.is_empty());
                    prop_assert_eq!(session.undos_remaining(), before);
                }
            } else {
                let before = session.score();
                session.apply_direction(direction);
                // Score never decreases on a move, only via undo.
                prop_assert!(session.score() >= before);
            }

            prop_assert!(session.history().len() <= HISTORY_CAP);
            prop_assert!(session.undos_remaining() <= UNDO_BUDGET);
            prop_assert_eq!(session.undos_remaining(), UNDO_BUDGET - undos_used);
            prop_assert!(session.best_score() >= session.score());
            for cell in session.board().cells().flatten() {
                prop_assert!(cell >= 2 && cell.is_power_of_two());
            }
        }
    }

    #[test]
    fn save_load_round_trip_reproduces_the_session(
        seed in any::<u64>(),
        directions in prop::collection::vec(arbitrary_direction(), 1..25),
        timed in any::<bool>(),
    ) {
        let mut session = Session::start_seeded(timed, Some(120), 10, seed);
        for direction in directions {
            session.apply_direction(direction);
            if session.is_ended() {
                break;
            }
        }

        let mut store = MemoryStore::new();
        store.save(&SavedSession::from_session(&session)).unwrap();
        let resumed = store.load().unwrap().into_session();

        prop_assert_eq!(resumed.board(), session.board());
        prop_assert_eq!(resumed.score(), session.score());
        prop_assert_eq!(resumed.best_score(), session.best_score());
        prop_assert_eq!(resumed.won(), session.won());
        prop_assert_eq!(resumed.is_timed(), session.is_timed());
        prop_assert_eq!(resumed.time_remaining(), session.time_remaining());
        prop_assert_eq!(resumed.undos_remaining(), session.undos_remaining());
        let stored: Vec<_> = resumed.history().snapshots().collect();
        let live: Vec<_> = session.history().snapshots().collect();
        prop_assert_eq!(stored, live);
    }
}
