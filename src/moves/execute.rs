//! Make/unmake (component G). Snapshot-based per spec.md §4.G and §9: a
//! full `Board` clone is taken before mutating, and illegal or rejected
//! moves are undone by restoring that clone wholesale rather than by
//! reversing individual field writes.
//!
//! Fixes relative to the reference this spec was distilled from (spec.md
//! §9 design notes): a single XOR-update path per capture/ep/promotion
//! instead of duplicated blocks, the black rook's own zobrist key on a
//! black castle (not a fallthrough to white's), and the en-passant key
//! XORed out before it is cleared on a null move.

use crate::board::{piece_index, Board, Color, Piece, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::hash::zobrist::zobrist_keys;
use crate::moves::magic::MagicTables;
use crate::moves::square_control::{in_check, is_legal_castling};
use crate::moves::types::Move;
use crate::square::Square;

#[inline]
fn rook_castle_squares(king_to_idx: u8) -> (Square, Square) {
    match king_to_idx {
        62 => (Square::from_index(63), Square::from_index(61)), // white O-O
        58 => (Square::from_index(56), Square::from_index(59)), // white O-O-O
        6 => (Square::from_index(7), Square::from_index(5)),    // black O-O
        2 => (Square::from_index(0), Square::from_index(3)),    // black O-O-O
        _ => unreachable!("castle move with unexpected king destination {king_to_idx}"),
    }
}

#[inline]
fn rook_corner_right(color: Color, rook_sq: u8) -> u8 {
    match (color, rook_sq) {
        (Color::White, 63) => CASTLE_WK,
        (Color::White, 56) => CASTLE_WQ,
        (Color::Black, 7) => CASTLE_BK,
        (Color::Black, 0) => CASTLE_BQ,
        _ => 0,
    }
}

/// Mutates `board` in place to reflect `mv`, maintaining the incremental
/// hash and castling/ep/clock bookkeeping. Does not check legality.
fn apply_move(board: &mut Board, mv: Move) {
    let keys = zobrist_keys();
    let color = board.side_to_move;
    let from = mv.from.index();
    let to = mv.to.index();

    if let Some(ep) = board.en_passant {
        board.hash ^= keys.ep[ep.index() as usize];
    }
    board.en_passant = None;

    let mut captured: Option<(Color, Piece, u8)> = None;
    if mv.is_en_passant() {
        let cap_sq = if color == Color::White { to + 8 } else { to - 8 };
        captured = Some((color.opposite(), Piece::Pawn, cap_sq));
    } else if let Some((cap_color, cap_piece)) = board.piece_at(mv.to) {
        captured = Some((cap_color, cap_piece, to));
    }
    if let Some((cap_color, cap_piece, cap_sq)) = captured {
        board.hash ^= keys.piece[piece_index(cap_color, cap_piece)][cap_sq as usize];
        board.clear_square(cap_sq);
    }

    let old_rights = board.castling_rights;
    let mut clear_mask = 0u8;
    if mv.piece == Piece::King {
        clear_mask |= match color {
            Color::White => CASTLE_WK | CASTLE_WQ,
            Color::Black => CASTLE_BK | CASTLE_BQ,
        };
    }
    if mv.piece == Piece::Rook {
        clear_mask |= rook_corner_right(color, from);
    }
    if let Some((cap_color, cap_piece, cap_sq)) = captured {
        if cap_piece == Piece::Rook {
            clear_mask |= rook_corner_right(cap_color, cap_sq);
        }
    }
    let new_rights = old_rights & !clear_mask;
    if new_rights != old_rights {
        board.hash ^= keys.castle[old_rights as usize] ^ keys.castle[new_rights as usize];
        board.castling_rights = new_rights;
    }

    board.hash ^= keys.piece[piece_index(color, mv.piece)][from as usize];
    board.clear_square(from);

    let placed_piece = mv.promotion.unwrap_or(mv.piece);
    board.hash ^= keys.piece[piece_index(color, placed_piece)][to as usize];
    board.place_piece_at_sq(color, placed_piece, to);

    if mv.is_castle() {
        let (rook_from, rook_to) = rook_castle_squares(to);
        board.hash ^= keys.piece[piece_index(color, Piece::Rook)][rook_from.index() as usize];
        board.clear_square(rook_from.index());
        board.hash ^= keys.piece[piece_index(color, Piece::Rook)][rook_to.index() as usize];
        board.place_piece_at_sq(color, Piece::Rook, rook_to.index());
    }

    if mv.is_double_pawn_push() {
        let ep_sq = if color == Color::White { from - 8 } else { from + 8 };
        board.en_passant = Some(Square::from_index(ep_sq));
        board.hash ^= keys.ep[ep_sq as usize];
    }

    if captured.is_some() || mv.piece == Piece::Pawn {
        board.halfmove_clock = 0;
    } else {
        board.halfmove_clock += 1;
    }
    if color == Color::Black {
        board.fullmove_number += 1;
    }

    board.side_to_move = color.opposite();
    board.hash ^= keys.side;
}

/// Applies `mv` and validates legality (own king must not be left in check;
/// castling additionally requires the king not be in, or pass through,
/// check). On success returns the pre-move snapshot to hand back to
/// `unmake_move`; on illegality the board is restored in place and `None`
/// is returned.
pub fn make_move(board: &mut Board, mv: Move, tables: &MagicTables) -> Option<Board> {
    let snapshot = board.clone();
    let mover = board.side_to_move;

    if mv.is_castle() && !is_legal_castling(board, tables, mv) {
        return None;
    }

    apply_move(board, mv);

    if in_check(board, tables, mover) {
        *board = snapshot;
        return None;
    }

    #[cfg(debug_assertions)]
    board.assert_hash();

    Some(snapshot)
}

/// Restores `board` to the state captured by `make_move`'s returned
/// snapshot.
#[inline]
pub fn unmake_move(board: &mut Board, snapshot: Board) {
    *board = snapshot;
}

pub struct NullMoveUndo {
    hash: u64,
    en_passant: Option<Square>,
    halfmove_clock: u32,
}

/// Passes the move without changing material, for null-move pruning
/// (spec.md §4.K). Bug fix #3: the en-passant key must be XORed out
/// before the square is cleared, not silently dropped.
pub fn make_null_move(board: &mut Board) -> NullMoveUndo {
    let keys = zobrist_keys();
    let undo = NullMoveUndo {
        hash: board.hash,
        en_passant: board.en_passant,
        halfmove_clock: board.halfmove_clock,
    };

    if let Some(ep) = board.en_passant {
        board.hash ^= keys.ep[ep.index() as usize];
    }
    board.en_passant = None;
    board.halfmove_clock += 1;
    board.side_to_move = board.side_to_move.opposite();
    board.hash ^= keys.side;

    undo
}

pub fn unmake_null_move(board: &mut Board, undo: NullMoveUndo) {
    board.side_to_move = board.side_to_move.opposite();
    board.en_passant = undo.en_passant;
    board.halfmove_clock = undo.halfmove_clock;
    board.hash = undo.hash;
}

/// Generates every fully legal move from the current position by making
/// and immediately unmaking each pseudo-legal candidate.
pub fn generate_legal(board: &mut Board, tables: &MagicTables) -> crate::moves::types::MoveList {
    use crate::moves::movegen::generate_pseudo_legal;
    let mut pseudo = crate::moves::types::MoveList::new();
    generate_pseudo_legal(board, tables, &mut pseudo);

    let mut legal = crate::moves::types::MoveList::new();
    for mv in pseudo {
        if let Some(snapshot) = make_move(board, mv, tables) {
            unmake_move(board, snapshot);
            legal.push(mv);
        }
    }
    legal
}

/// Same as [`generate_legal`] but restricted to captures, en-passant, and
/// promotions, for quiescence search (spec.md §4.K).
pub fn generate_legal_captures(board: &mut Board, tables: &MagicTables) -> crate::moves::types::MoveList {
    use crate::moves::movegen::generate_pseudo_legal;
    let mut pseudo = crate::moves::types::MoveList::new();
    generate_pseudo_legal(board, tables, &mut pseudo);

    let mut legal = crate::moves::types::MoveList::new();
    for mv in pseudo {
        if !mv.is_capture() && !mv.is_en_passant() && !mv.is_promotion() {
            continue;
        }
        if let Some(snapshot) = make_move(board, mv, tables) {
            unmake_move(board, snapshot);
            legal.push(mv);
        }
    }
    legal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::magic::attack_tables;

    #[test]
    fn pawn_double_push_sets_en_passant_and_restores_on_unmake() {
        let mut board = Board::new();
        let tables = attack_tables();
        let from: Square = "e2".parse().unwrap();
        let to: Square = "e4".parse().unwrap();
        let mv = Move::new(from, to, Piece::Pawn, None, crate::moves::types::FLAG_DOUBLE_PUSH);
        let before = board.clone();
        let snapshot = make_move(&mut board, mv, tables).expect("legal push");
        assert_eq!(board.en_passant.unwrap().to_string(), "e3");
        unmake_move(&mut board, snapshot);
        assert_eq!(board.hash, before.hash);
        assert!(board.bb(Color::White, Piece::Pawn) == before.bb(Color::White, Piece::Pawn));
    }

    #[test]
    fn generate_legal_from_startpos_has_twenty_moves() {
        let mut board = Board::new();
        let tables = attack_tables();
        let moves = generate_legal(&mut board, tables);
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn null_move_flips_side_and_restores_exactly() {
        let mut board = Board::new();
        let before_hash = board.hash;
        let undo = make_null_move(&mut board);
        assert_eq!(board.side_to_move, Color::Black);
        unmake_null_move(&mut board, undo);
        assert_eq!(board.side_to_move, Color::White);
        assert_eq!(board.hash, before_hash);
    }
}
