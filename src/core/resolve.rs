//! Move resolution: sliding, merging, and scoring a board.
//!
//! All functions here are pure. A move is resolved one line (row or
//! column) at a time; lines are pre-reversed for Right/Down so the
//! algorithm always slides toward index 0, and the reversal is undone
//! before writing back.

use super::board::{Board, Cell, Direction, BOARD_SIZE};

/// The tile value that marks a win the first time it is produced.
pub const WIN_TILE: u32 = 2048;

/// A single merge produced while resolving one line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Merge {
    /// The doubled value the merge produced.
    pub value: u32,
    /// Output slot of the merged tile, counted from the slide target end.
    pub index: usize,
}

/// Result of resolving a single line toward index 0.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LineResolution {
    /// The line after compacting, merging, and re-padding to length 4.
    pub line: [Cell; BOARD_SIZE],
    /// Sum of all merged values in this line.
    pub score_delta: u32,
    /// Every merge that occurred, in slide order.
    pub merges: Vec<Merge>,
}

/// Outcome of applying one directional move to a whole board.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MoveOutcome {
    /// The board after the move, before any tile spawn.
    pub board: Board,
    /// Whether any cell differs from the input board. Only a changed
    /// board counts as a legal move; a slide with no merge still counts
    /// when positions shifted.
    pub changed: bool,
    /// Total points earned from merges across all four lines.
    pub score_delta: u32,
    /// Whether some merge produced [`WIN_TILE`] during this move.
    pub won: bool,
}

/// Slide and merge one line toward index 0.
///
/// The line is compacted, then merged in a single sweep, then compacted
/// again. A tile produced by a merge is marked consumed and never merges
/// a second time in the same sweep, so `[2, 2, 2, 2]` resolves to
/// `[4, 4, _, _]` rather than collapsing further.
///
/// # Example
///
/// ```rust
/// use slide48::core::resolve_line;
///
/// let resolved = resolve_line([Some(2), Some(2), Some(2), Some(2)]);
/// assert_eq!(resolved.line, [Some(4), Some(4), None, None]);
/// assert_eq!(resolved.score_delta, 8);
/// assert_eq!(resolved.merges.len(), 2);
/// ```
pub fn resolve_line(line: [Cell; BOARD_SIZE]) -> LineResolution {
    let mut out: [Cell; BOARD_SIZE] = [None; BOARD_SIZE];
    // A slot that already received a merge this sweep is consumed and
    // cannot absorb another tile.
    let mut consumed = [false; BOARD_SIZE];
    let mut merges = Vec::new();
    let mut score_delta = 0;
    let mut write = 0;

    for value in line.into_iter().flatten() {
        if write > 0 && out[write - 1] == Some(value) && !consumed[write - 1] {
            let doubled = value * 2;
            out[write - 1] = Some(doubled);
            consumed[write - 1] = true;
            score_delta += doubled;
            merges.push(Merge {
                value: doubled,
                index: write - 1,
            });
        } else {
            out[write] = Some(value);
            write += 1;
        }
    }

    LineResolution {
        line: out,
        score_delta,
        merges,
    }
}

/// Apply one directional move to `board`, returning the slid-and-merged
/// board together with the score delta and win/changed flags. The input
/// board is untouched; no tile is spawned here.
///
/// # Example
///
/// ```rust
/// use slide48::core::{apply_move, Board, Direction};
///
/// let mut board = Board::empty();
/// board.set(0, 2, Some(2));
/// board.set(0, 3, Some(2));
///
/// let outcome = apply_move(&board, Direction::Left);
/// assert!(outcome.changed);
/// assert_eq!(outcome.score_delta, 4);
/// assert_eq!(outcome.board.get(0, 0), Some(4));
/// ```
pub fn apply_move(board: &Board, direction: Direction) -> MoveOutcome {
    let mut next = *board;
    let mut score_delta = 0;
    let mut won = false;

    for index in 0..BOARD_SIZE {
        let line = match direction {
            Direction::Left | Direction::Right => next.row(index),
            Direction::Up | Direction::Down => next.col(index),
        };
        let toward_zero = matches!(direction, Direction::Left | Direction::Up);

        let input = if toward_zero { line } else { reversed(line) };
        let resolved = resolve_line(input);
        let output = if toward_zero {
            resolved.line
        } else {
            reversed(resolved.line)
        };

        score_delta += resolved.score_delta;
        if resolved.merges.iter().any(|m| m.value >= WIN_TILE) {
            won = true;
        }

        match direction {
            Direction::Left | Direction::Right => next.set_row(index, output),
            Direction::Up | Direction::Down => next.set_col(index, output),
        }
    }

    MoveOutcome {
        changed: next != *board,
        board: next,
        score_delta,
        won,
    }
}

fn reversed(line: [Cell; BOARD_SIZE]) -> [Cell; BOARD_SIZE] {
    let mut out = line;
    out.reverse();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(values: [[u32; 4]; 4]) -> Board {
        let mut board = Board::empty();
        for (row, cells) in values.into_iter().enumerate() {
            for (col, value) in cells.into_iter().enumerate() {
                if value != 0 {
                    board.set(row, col, Some(value));
                }
            }
        }
        board
    }

    #[test]
    fn compacts_without_merging() {
        let resolved = resolve_line([None, Some(2), None, Some(4)]);
        assert_eq!(resolved.line, [Some(2), Some(4), None, None]);
        assert_eq!(resolved.score_delta, 0);
        assert!(resolved.merges.is_empty());
    }

    #[test]
    fn merges_adjacent_pair_across_gap() {
        let resolved = resolve_line([Some(2), None, Some(2), None]);
        assert_eq!(resolved.line, [Some(4), None, None, None]);
        assert_eq!(resolved.score_delta, 4);
        assert_eq!(resolved.merges, vec![Merge { value: 4, index: 0 }]);
    }

    #[test]
    fn merges_two_pairs_independently() {
        let resolved = resolve_line([Some(2), Some(2), Some(4), Some(4)]);
        assert_eq!(resolved.line, [Some(4), Some(8), None, None]);
        assert_eq!(resolved.score_delta, 12);
    }

    #[test]
    fn merged_tile_never_merges_again_in_same_sweep() {
        // [4, 2, 2] must not cascade into [8].
        let resolved = resolve_line([Some(4), Some(2), Some(2), None]);
        assert_eq!(resolved.line, [Some(4), Some(4), None, None]);
        assert_eq!(resolved.score_delta, 4);
    }

    #[test]
    fn four_equal_tiles_yield_two_merges_not_one() {
        let resolved = resolve_line([Some(2), Some(2), Some(2), Some(2)]);
        assert_eq!(resolved.line, [Some(4), Some(4), None, None]);
        assert_eq!(resolved.score_delta, 8);
        assert_eq!(
            resolved.merges,
            vec![Merge { value: 4, index: 0 }, Merge { value: 4, index: 1 }]
        );
    }

    #[test]
    fn resolve_is_idempotent_on_its_own_output() {
        let once = resolve_line([Some(2), Some(2), Some(4), None]);
        let twice = resolve_line(once.line);
        assert_eq!(twice.line, once.line);
        assert_eq!(twice.score_delta, 0);
    }

    #[test]
    fn move_left_resolves_every_row() {
        let board = board_from([[2, 2, 0, 0], [0, 4, 4, 0], [2, 0, 2, 0], [8, 8, 8, 8]]);
        let outcome = apply_move(&board, Direction::Left);
        assert!(outcome.changed);
        assert_eq!(
            outcome.board,
            board_from([[4, 0, 0, 0], [8, 0, 0, 0], [4, 0, 0, 0], [16, 16, 0, 0]])
        );
        assert_eq!(outcome.score_delta, 4 + 8 + 4 + 32);
    }

    #[test]
    fn move_right_slides_toward_high_indices() {
        let board = board_from([[2, 2, 0, 0], [0, 4, 4, 0], [2, 0, 2, 0], [8, 8, 8, 8]]);
        let outcome = apply_move(&board, Direction::Right);
        assert_eq!(
            outcome.board,
            board_from([[0, 0, 0, 4], [0, 0, 0, 8], [0, 0, 0, 4], [0, 0, 16, 16]])
        );
        assert_eq!(outcome.score_delta, 4 + 8 + 4 + 32);
    }

    #[test]
    fn move_up_resolves_every_column() {
        let board = board_from([[2, 0, 2, 8], [2, 4, 0, 8], [0, 4, 2, 8], [0, 0, 0, 8]]);
        let outcome = apply_move(&board, Direction::Up);
        assert_eq!(
            outcome.board,
            board_from([[4, 8, 4, 16], [0, 0, 0, 16], [0, 0, 0, 0], [0, 0, 0, 0]])
        );
        assert_eq!(outcome.score_delta, 4 + 8 + 4 + 32);
    }

    #[test]
    fn move_down_slides_toward_bottom() {
        let board = board_from([[2, 0, 2, 8], [2, 4, 0, 8], [0, 4, 2, 8], [0, 0, 0, 8]]);
        let outcome = apply_move(&board, Direction::Down);
        assert_eq!(
            outcome.board,
            board_from([[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 16], [4, 8, 4, 16]])
        );
        assert_eq!(outcome.score_delta, 4 + 8 + 4 + 32);
    }

    #[test]
    fn pure_slide_without_merge_still_counts_as_changed() {
        let board = board_from([[0, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let outcome = apply_move(&board, Direction::Left);
        assert!(outcome.changed);
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(outcome.board.get(0, 0), Some(2));
    }

    #[test]
    fn blocked_move_reports_unchanged() {
        let board = board_from([[2, 0, 0, 0], [4, 0, 0, 0], [8, 0, 0, 0], [16, 0, 0, 0]]);
        let outcome = apply_move(&board, Direction::Left);
        assert!(!outcome.changed);
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(outcome.board, board);
    }

    #[test]
    fn merging_two_1024_tiles_flags_a_win() {
        let board = board_from([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = apply_move(&board, Direction::Left);
        assert!(outcome.won);
        assert_eq!(outcome.board.get(0, 0), Some(WIN_TILE));
        assert_eq!(outcome.score_delta, 2048);
    }

    #[test]
    fn smaller_merges_do_not_flag_a_win() {
        let board = board_from([[512, 512, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = apply_move(&board, Direction::Left);
        assert!(!outcome.won);
    }
}
