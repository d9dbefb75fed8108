//! Perft harness (collaborator P): leaf-counting move generator tester,
//! used both by the engine's own test suite and by the UCI `go perft`
//! command during manual debugging.

use crate::board::Board;
use crate::moves::execute::{make_move, unmake_move, generate_legal};
use crate::moves::magic::MagicTables;
use crate::moves::types::Move;
use tracing::debug;

/// Counts leaf nodes at `depth` plies from `board`.
pub fn perft(board: &mut Board, tables: &MagicTables, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_legal(board, tables);
    let mut nodes = 0u64;
    for mv in moves {
        let snapshot = make_move(board, mv, tables).expect("legal move rejected during perft");
        nodes += perft(board, tables, depth - 1);
        unmake_move(board, snapshot);
    }
    nodes
}

/// Per-root-move leaf counts, for diffing against a reference perft tool
/// when a node count mismatch needs to be localized to one branch.
pub fn perft_divide(board: &mut Board, tables: &MagicTables, depth: u32) -> Vec<(Move, u64)> {
    let moves = generate_legal(board, tables);
    let mut out = Vec::with_capacity(moves.len());
    for mv in moves {
        let snapshot = make_move(board, mv, tables).expect("legal move rejected during divide");
        let count = if depth == 0 { 1 } else { perft(board, tables, depth - 1) };
        unmake_move(board, snapshot);
        debug!(%mv, count, "perft divide");
        out.push((mv, count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::magic::attack_tables;

    #[test]
    fn perft_depth_one_from_startpos_is_twenty() {
        let mut board = Board::new();
        let tables = attack_tables();
        assert_eq!(perft(&mut board, tables, 1), 20);
    }

    #[test]
    fn perft_depth_two_from_startpos_is_four_hundred() {
        let mut board = Board::new();
        let tables = attack_tables();
        assert_eq!(perft(&mut board, tables, 2), 400);
    }

    #[test]
    fn perft_depth_three_from_startpos_is_8902() {
        let mut board = Board::new();
        let tables = attack_tables();
        assert_eq!(perft(&mut board, tables, 3), 8_902);
    }

    #[test]
    fn kiwipete_perft_depth_one_is_forty_eight() {
        const KIWIPETE: &str =
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let mut board: Board = KIWIPETE.parse().unwrap();
        let tables = attack_tables();
        assert_eq!(perft(&mut board, tables, 1), 48);
    }
}
