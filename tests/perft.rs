//! Perft node-count scenarios from the starting position and from
//! "Kiwipete", a position chosen for exercising castling, en passant, and
//! promotions together.

use chess_core::board::Board;
use chess_core::moves::magic::attack_tables;
use chess_core::moves::perft::perft;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

#[test]
fn startpos_perft_matches_reference_counts() {
    let tables = attack_tables();
    let cases: [(u32, u64); 5] =
        [(1, 20), (2, 400), (3, 8_902), (4, 197_281), (5, 4_865_609)];
    for (depth, expected) in cases {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, tables, depth), expected, "startpos depth {depth}");
    }
}

#[test]
fn kiwipete_perft_matches_reference_counts() {
    let tables = attack_tables();
    let cases: [(u32, u64); 3] = [(1, 48), (2, 2_039), (3, 97_862)];
    for (depth, expected) in cases {
        let mut board: Board = KIWIPETE.parse().expect("kiwipete fen parses");
        assert_eq!(perft(&mut board, tables, depth), expected, "kiwipete depth {depth}");
    }
}
