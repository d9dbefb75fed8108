//! Move ordering (component I, spec.md §4.I): PV move first, then
//! MVV-LVA captures, then killer moves, then history-scored quiets.
//! The MVV-LVA table below is the reference's `mvv_lva[12][12]`
//! transcribed directly, independent of attacker color.

use crate::board::{piece_index, Board, Piece};
use crate::moves::types::Move;
use crate::search::context::HistoryTable;

const PV_SCORE: i32 = 20_000;
const CAPTURE_BASE: i32 = 10_000;
const KILLER1_SCORE: i32 = 9_000;
const KILLER2_SCORE: i32 = 8_000;

#[inline]
fn piece_rank(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 0,
        Piece::Knight => 1,
        Piece::Bishop => 2,
        Piece::Rook => 3,
        Piece::Queen => 4,
        Piece::King => 5,
    }
}

/// `mvv_lva[attacker][victim]` from the reference, collapsed to one
/// color-independent 6x6 table since the original's two color blocks are
/// identical.
pub fn mvv_lva_score(attacker: Piece, victim: Piece) -> i32 {
    (piece_rank(victim) + 1) * 100 + (5 - piece_rank(attacker))
}

fn capture_score(mv: Move, board: &Board) -> Option<i32> {
    if let Some((_, victim)) = board.piece_at(mv.to) {
        return Some(mvv_lva_score(mv.piece, victim));
    }
    if mv.is_en_passant() {
        return Some(mvv_lva_score(Piece::Pawn, Piece::Pawn));
    }
    None
}

#[allow(clippy::too_many_arguments)]
pub fn order_moves(
    moves: &mut [Move],
    board: &Board,
    pv_move: Option<Move>,
    killers: [Option<Move>; 2],
    history: &HistoryTable,
) {
    let side = board.side_to_move;
    moves.sort_by_cached_key(|&mv| {
        if Some(mv) == pv_move {
            return -(PV_SCORE * 10);
        }
        if let Some(cs) = capture_score(mv, board) {
            return -(CAPTURE_BASE + cs);
        }
        if Some(mv) == killers[0] {
            return -KILLER1_SCORE;
        }
        if Some(mv) == killers[1] {
            return -KILLER2_SCORE;
        }
        let piece_idx = piece_index(side, mv.piece);
        -(history[piece_idx][mv.to.index() as usize] + mv.piece.value())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queen_takes_pawn_outranks_pawn_takes_queen() {
        let queen_takes_pawn = mvv_lva_score(Piece::Queen, Piece::Pawn);
        let pawn_takes_queen = mvv_lva_score(Piece::Pawn, Piece::Queen);
        assert!(pawn_takes_queen > queen_takes_pawn);
    }

    #[test]
    fn pv_move_sorts_first() {
        use crate::board::Board;
        use crate::moves::execute::generate_legal;
        use crate::moves::magic::attack_tables;

        let mut board = Board::new();
        let tables = attack_tables();
        let mut moves = generate_legal(&mut board, tables);
        let pv = moves[5];
        order_moves(&mut moves, &board, Some(pv), [None, None], &[[0; 64]; 12]);
        assert_eq!(moves[0], pv);
    }
}
