//! Static evaluation (component H): material plus piece-square tables,
//! mirrored for black, returned from the side-to-move's perspective.

use crate::board::{Board, Color, Piece};
use crate::search::pst::table_for;

pub fn static_eval(board: &Board) -> i32 {
    let mut score = 0i32;
    for piece in Piece::ALL {
        let table = table_for(piece);

        let mut white = board.bb(Color::White, piece);
        while white != 0 {
            let sq = white.trailing_zeros() as u8;
            white &= white - 1;
            score += piece.value();
            if let Some(t) = table {
                score += t[sq as usize];
            }
        }

        let mut black = board.bb(Color::Black, piece);
        while black != 0 {
            let sq = black.trailing_zeros() as u8;
            black &= black - 1;
            score -= piece.value();
            if let Some(t) = table {
                let mirrored = crate::square::Square::from_index(sq).mirror().index();
                score -= t[mirrored as usize];
            }
        }
    }

    if board.side_to_move == Color::White {
        score
    } else {
        -score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced() {
        let board = Board::new();
        assert_eq!(static_eval(&board), 0);
    }

    #[test]
    fn extra_white_queen_favors_white() {
        let mut board = Board::new_empty();
        board.place_piece_at_sq(Color::White, Piece::King, 60);
        board.place_piece_at_sq(Color::Black, Piece::King, 4);
        board.place_piece_at_sq(Color::White, Piece::Queen, 59);
        assert!(static_eval(&board) > 0);
    }

    #[test]
    fn eval_is_antisymmetric_under_side_to_move_flip() {
        let mut board = Board::new();
        let white_score = static_eval(&board);
        board.side_to_move = Color::Black;
        let black_score = static_eval(&board);
        assert_eq!(white_score, -black_score);
    }
}
