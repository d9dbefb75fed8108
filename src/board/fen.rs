//! FEN <-> Board conversion (collaborator N, spec.md out-of-scope-for-the-core
//! but required for a working UCI binary). Thin: parses the six FEN fields
//! and calls only public Board operations.

use super::{fen_tables::CHAR_TO_PC, Board, Color, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::square::Square;
use std::fmt;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenError(pub String);

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid FEN: {}", self.0)
    }
}

impl std::error::Error for FenError {}

pub fn parse_fen(fen: &str) -> Result<Board, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(FenError(format!("expected at least 4 fields, got {}", fields.len())));
    }

    let mut board = Board::new_empty();

    let mut rank = 0u8;
    let mut file = 0u8;
    for c in fields[0].chars() {
        match c {
            '/' => {
                if file != 8 {
                    return Err(FenError(format!("rank {rank} did not fill 8 files")));
                }
                rank += 1;
                file = 0;
            }
            d if d.is_ascii_digit() => {
                let skip = d.to_digit(10).unwrap() as u8;
                file += skip;
            }
            c => {
                let (piece, color) = CHAR_TO_PC[c as usize]
                    .ok_or_else(|| FenError(format!("unknown piece glyph '{c}'")))?;
                if rank > 7 || file > 7 {
                    return Err(FenError("piece placement out of bounds".into()));
                }
                let sq = Square::from_file_rank(file, rank).index();
                board.place_piece_at_sq(color, piece, sq);
                file += 1;
            }
        }
    }
    if file != 8 || rank != 7 {
        return Err(FenError(format!("rank {rank} did not fill 8 files")));
    }

    board.side_to_move = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError(format!("bad side to move '{other}'"))),
    };

    let mut castle = 0u8;
    if fields[2] != "-" {
        for c in fields[2].chars() {
            castle |= match c {
                'K' => CASTLE_WK,
                'Q' => CASTLE_WQ,
                'k' => CASTLE_BK,
                'q' => CASTLE_BQ,
                other => return Err(FenError(format!("bad castling glyph '{other}'"))),
            };
        }
    }
    board.castling_rights = castle;

    board.en_passant = if fields[3] == "-" {
        None
    } else {
        Some(
            fields[3]
                .parse::<Square>()
                .map_err(|e| FenError(format!("bad en passant square: {e}")))?,
        )
    };

    board.halfmove_clock = fields.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
    board.fullmove_number = fields.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

    board.hash = board.compute_zobrist_full();
    if !board.validate() {
        return Err(FenError("overlapping piece bitboards".into()));
    }
    Ok(board)
}

/// Serialize a Board back to FEN text.
pub fn to_fen(board: &Board) -> String {
    let mut out = String::new();
    for rank in 0..8u8 {
        let mut empty_run = 0u8;
        for file in 0..8u8 {
            let sq = Square::from_file_rank(file, rank);
            match board.piece_at(sq) {
                Some((color, piece)) => {
                    if empty_run > 0 {
                        out.push(char::from_digit(empty_run as u32, 10).unwrap());
                        empty_run = 0;
                    }
                    out.push(super::fen_tables::piece_char(piece, color));
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            out.push(char::from_digit(empty_run as u32, 10).unwrap());
        }
        if rank != 7 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(if board.side_to_move == Color::White { 'w' } else { 'b' });

    out.push(' ');
    if board.castling_rights == 0 {
        out.push('-');
    } else {
        if board.has_castling(CASTLE_WK) {
            out.push('K');
        }
        if board.has_castling(CASTLE_WQ) {
            out.push('Q');
        }
        if board.has_castling(CASTLE_BK) {
            out.push('k');
        }
        if board.has_castling(CASTLE_BQ) {
            out.push('q');
        }
    }

    out.push(' ');
    match board.en_passant {
        Some(sq) => out.push_str(&sq.to_string()),
        None => out.push('-'),
    }

    out.push_str(&format!(" {} {}", board.halfmove_clock, board.fullmove_number));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_round_trips() {
        let board = parse_fen(STARTPOS_FEN).unwrap();
        assert_eq!(to_fen(&board), STARTPOS_FEN);
    }

    #[test]
    fn kiwipete_parses_and_round_trips() {
        let kiwipete = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let board = parse_fen(kiwipete).unwrap();
        assert_eq!(to_fen(&board), kiwipete);
        assert!(board.validate());
    }

    #[test]
    fn rejects_bad_glyph() {
        assert!(parse_fen("8/8/8/8/8/8/8/Z7 w - - 0 1").is_err());
    }
}
