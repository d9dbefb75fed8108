//! Move generator (component F, spec.md §4.F). Emits pseudo-legal moves in
//! a fixed order: pawns, king (castling), knights, bishops, rooks, queens,
//! king (normal). Legality (own king not left in check) is filtered by
//! make/unmake (component G), not here.

use crate::bitboard::BitboardExt;
use crate::board::{Board, Color, Piece};
use crate::moves::magic::MagicTables;
use crate::moves::types::{Move, MoveList, FLAG_CAPTURE, FLAG_DOUBLE_PUSH, FLAG_EN_PASSANT};
use crate::square::Square;

const PROMOTION_PIECES: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

pub fn generate_pseudo_legal(board: &Board, tables: &MagicTables, list: &mut MoveList) {
    let side = board.side_to_move;
    generate_pawn_moves(board, side, list);
    generate_castling_moves(board, tables, side, list);
    generate_knight_moves(board, tables, side, list);
    generate_bishop_moves(board, tables, side, list);
    generate_rook_moves(board, tables, side, list);
    generate_queen_moves(board, tables, side, list);
    generate_king_moves(board, tables, side, list);
}

fn push_quiet_or_capture(list: &mut MoveList, board: &Board, from: Square, to: Square, piece: Piece) {
    let capture = board.piece_at(to).is_some();
    let flags = if capture { FLAG_CAPTURE } else { 0 };
    list.push(Move::new(from, to, piece, None, flags));
}

fn generate_pawn_moves(board: &Board, side: Color, list: &mut MoveList) {
    let own_occ = board.occupancy(side);
    let opp_occ = board.occupancy(side.opposite());
    let all_occ = board.occupied();
    let (push_dir, start_rank, promo_rank): (i32, u8, u8) = match side {
        Color::White => (-8, 6, 0),
        Color::Black => (8, 1, 7),
    };

    let mut pawns = board.bb(side, Piece::Pawn);
    while pawns != 0 {
        let from_idx = pawns.pop_lsb();
        let from = Square::from_index(from_idx);

        // Single push.
        let one_idx = from_idx as i32 + push_dir;
        if (0..64).contains(&one_idx) {
            let one = Square::from_index(one_idx as u8);
            if !all_occ.get_bit(one.index()) {
                if one.rank() == promo_rank {
                    for promo in PROMOTION_PIECES {
                        list.push(Move::new(from, one, Piece::Pawn, Some(promo), 0));
                    }
                } else {
                    list.push(Move::new(from, one, Piece::Pawn, None, 0));
                }

                // Double push from the start rank.
                if from.rank() == start_rank {
                    let two_idx = one_idx + push_dir;
                    let two = Square::from_index(two_idx as u8);
                    if !all_occ.get_bit(two.index()) {
                        list.push(Move::new(from, two, Piece::Pawn, None, FLAG_DOUBLE_PUSH));
                    }
                }
            }
        }

        // Captures, including en passant.
        let attacks = crate::moves::magic::attacks::pawn_attacks_mask(side, from_idx);
        let mut captures = attacks & opp_occ;
        while captures != 0 {
            let to_idx = captures.pop_lsb();
            let to = Square::from_index(to_idx);
            if to.rank() == promo_rank {
                for promo in PROMOTION_PIECES {
                    list.push(Move::new(from, to, Piece::Pawn, Some(promo), FLAG_CAPTURE));
                }
            } else {
                list.push(Move::new(from, to, Piece::Pawn, None, FLAG_CAPTURE));
            }
        }

        if let Some(ep) = board.en_passant {
            if attacks.get_bit(ep.index()) {
                list.push(Move::new(from, ep, Piece::Pawn, None, FLAG_EN_PASSANT | FLAG_CAPTURE));
            }
        }
        let _ = own_occ;
    }
}

fn generate_knight_moves(board: &Board, tables: &MagicTables, side: Color, list: &mut MoveList) {
    let own_occ = board.occupancy(side);
    let mut knights = board.bb(side, Piece::Knight);
    while knights != 0 {
        let from_idx = knights.pop_lsb();
        let from = Square::from_index(from_idx);
        let mut targets = tables.knight_attacks[from_idx as usize] & !own_occ;
        while targets != 0 {
            let to_idx = targets.pop_lsb();
            push_quiet_or_capture(list, board, from, Square::from_index(to_idx), Piece::Knight);
        }
    }
}

fn generate_bishop_moves(board: &Board, tables: &MagicTables, side: Color, list: &mut MoveList) {
    let own_occ = board.occupancy(side);
    let occ = board.occupied();
    let mut bishops = board.bb(side, Piece::Bishop);
    while bishops != 0 {
        let from_idx = bishops.pop_lsb();
        let from = Square::from_index(from_idx);
        let mut targets = tables.bishop.get_attacks(from_idx as usize, occ) & !own_occ;
        while targets != 0 {
            let to_idx = targets.pop_lsb();
            push_quiet_or_capture(list, board, from, Square::from_index(to_idx), Piece::Bishop);
        }
    }
}

fn generate_rook_moves(board: &Board, tables: &MagicTables, side: Color, list: &mut MoveList) {
    let own_occ = board.occupancy(side);
    let occ = board.occupied();
    let mut rooks = board.bb(side, Piece::Rook);
    while rooks != 0 {
        let from_idx = rooks.pop_lsb();
        let from = Square::from_index(from_idx);
        let mut targets = tables.rook.get_attacks(from_idx as usize, occ) & !own_occ;
        while targets != 0 {
            let to_idx = targets.pop_lsb();
            push_quiet_or_capture(list, board, from, Square::from_index(to_idx), Piece::Rook);
        }
    }
}

fn generate_queen_moves(board: &Board, tables: &MagicTables, side: Color, list: &mut MoveList) {
    let own_occ = board.occupancy(side);
    let occ = board.occupied();
    let mut queens = board.bb(side, Piece::Queen);
    while queens != 0 {
        let from_idx = queens.pop_lsb();
        let from = Square::from_index(from_idx);
        let mut targets = tables.queen_attacks(from_idx as usize, occ) & !own_occ;
        while targets != 0 {
            let to_idx = targets.pop_lsb();
            push_quiet_or_capture(list, board, from, Square::from_index(to_idx), Piece::Queen);
        }
    }
}

fn generate_king_moves(board: &Board, tables: &MagicTables, side: Color, list: &mut MoveList) {
    let own_occ = board.occupancy(side);
    let from = board.king_square(side);
    let mut targets = tables.king_attacks[from.index() as usize] & !own_occ;
    while targets != 0 {
        let to_idx = targets.pop_lsb();
        push_quiet_or_capture(list, board, from, Square::from_index(to_idx), Piece::King);
    }
}

fn generate_castling_moves(board: &Board, tables: &MagicTables, side: Color, list: &mut MoveList) {
    use crate::board::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
    use crate::moves::square_control::is_square_attacked;

    let occ = board.occupied();
    let opp = side.opposite();

    let (king_start, rights_k, rights_q, rank): (u8, u8, u8, u8) = match side {
        Color::White => (60, CASTLE_WK, CASTLE_WQ, 7),
        Color::Black => (4, CASTLE_BK, CASTLE_BQ, 0),
    };
    let king_sq = Square::from_index(king_start);
    let f_file = Square::from_file_rank(5, rank);
    let g_file = Square::from_file_rank(6, rank);
    let d_file = Square::from_file_rank(3, rank);
    let c_file = Square::from_file_rank(2, rank);
    let b_file = Square::from_file_rank(1, rank);

    if board.has_castling(rights_k)
        && !occ.get_bit(f_file.index())
        && !occ.get_bit(g_file.index())
        && !is_square_attacked(board, tables, king_sq, opp)
        && !is_square_attacked(board, tables, f_file, opp)
    {
        list.push(Move::new(
            king_sq,
            g_file,
            Piece::King,
            None,
            crate::moves::types::FLAG_CASTLE,
        ));
    }

    if board.has_castling(rights_q)
        && !occ.get_bit(d_file.index())
        && !occ.get_bit(c_file.index())
        && !occ.get_bit(b_file.index())
        && !is_square_attacked(board, tables, king_sq, opp)
        && !is_square_attacked(board, tables, d_file, opp)
    {
        list.push(Move::new(
            king_sq,
            c_file,
            Piece::King,
            None,
            crate::moves::types::FLAG_CASTLE,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::magic::attack_tables;

    #[test]
    fn startpos_has_twenty_pseudo_legal_moves() {
        let board = Board::new();
        let tables = attack_tables();
        let mut list = MoveList::new();
        generate_pseudo_legal(&board, tables, &mut list);
        assert_eq!(list.len(), 20);
    }

    #[test]
    fn no_castling_available_from_start_position_blocked_by_pieces() {
        let board = Board::new();
        let tables = attack_tables();
        let mut list = MoveList::new();
        generate_castling_moves(&board, tables, Color::White, &mut list);
        assert!(list.is_empty());
    }
}
