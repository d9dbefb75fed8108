// O(1) FEN glyph <-> (piece,color) maps.

use super::{piece_index, Color, Piece};

pub(super) const CHAR_TO_PC: [Option<(Piece, Color)>; 128] = {
    let mut table: [Option<(Piece, Color)>; 128] = [None; 128];

    table[b'P' as usize] = Some((Piece::Pawn, Color::White));
    table[b'N' as usize] = Some((Piece::Knight, Color::White));
    table[b'B' as usize] = Some((Piece::Bishop, Color::White));
    table[b'R' as usize] = Some((Piece::Rook, Color::White));
    table[b'Q' as usize] = Some((Piece::Queen, Color::White));
    table[b'K' as usize] = Some((Piece::King, Color::White));

    table[b'p' as usize] = Some((Piece::Pawn, Color::Black));
    table[b'n' as usize] = Some((Piece::Knight, Color::Black));
    table[b'b' as usize] = Some((Piece::Bishop, Color::Black));
    table[b'r' as usize] = Some((Piece::Rook, Color::Black));
    table[b'q' as usize] = Some((Piece::Queen, Color::Black));
    table[b'k' as usize] = Some((Piece::King, Color::Black));

    table
};

pub(super) const PC_TO_CHAR: [char; 12] = {
    let mut t = ['\0'; 12];
    t[piece_index(Color::White, Piece::Pawn)] = 'P';
    t[piece_index(Color::White, Piece::Knight)] = 'N';
    t[piece_index(Color::White, Piece::Bishop)] = 'B';
    t[piece_index(Color::White, Piece::Rook)] = 'R';
    t[piece_index(Color::White, Piece::Queen)] = 'Q';
    t[piece_index(Color::White, Piece::King)] = 'K';
    t[piece_index(Color::Black, Piece::Pawn)] = 'p';
    t[piece_index(Color::Black, Piece::Knight)] = 'n';
    t[piece_index(Color::Black, Piece::Bishop)] = 'b';
    t[piece_index(Color::Black, Piece::Rook)] = 'r';
    t[piece_index(Color::Black, Piece::Queen)] = 'q';
    t[piece_index(Color::Black, Piece::King)] = 'k';
    t
};

pub(super) fn piece_char(piece: Piece, color: Color) -> char {
    PC_TO_CHAR[piece_index(color, piece)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_round_trip() {
        const GLYPHS: [char; 12] = ['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'];
        for &g in &GLYPHS {
            let (piece, color) = CHAR_TO_PC[g as usize].expect("glyph missing from CHAR_TO_PC");
            assert_eq!(piece_char(piece, color), g);
        }
    }
}
