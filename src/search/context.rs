//! Per-search mutable state (component K/L support): killer moves, history
//! heuristic, and the triangular PV table (spec.md §3/§4.L): `pv[ply][k]`
//! with `pv_length[ply]` marking the row's logical end, refreshed from the
//! deeper ply upward on every improving move.

use crate::board::{piece_index, Color};
use crate::moves::types::Move;

pub const MAX_PLY: usize = 64;

/// `history[piece][target]`, 12 piece-color combos by 64 squares (spec.md §3).
pub type HistoryTable = [[i32; 64]; 12];

pub struct SearchContext {
    pub killer_moves: Vec<[Option<Move>; 2]>,
    pub history: HistoryTable,
    pv: Vec<Vec<Option<Move>>>,
    pv_length: [usize; MAX_PLY],
    previous_pv: Vec<Option<Move>>,
    pub pv_follow: bool,
    pub pv_scoring: bool,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchContext {
    pub fn new() -> Self {
        Self {
            killer_moves: vec![[None; 2]; MAX_PLY],
            history: [[0; 64]; 12],
            pv: vec![vec![None; MAX_PLY]; MAX_PLY],
            pv_length: [0; MAX_PLY],
            previous_pv: Vec::new(),
            pv_follow: false,
            pv_scoring: false,
        }
    }

    /// Zeroes all per-search working state (spec.md §3): called at the top
    /// of every `search_position`, since killers/history/PV are scoped to a
    /// single search and must not leak across unrelated positions.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn update_killer(&mut self, ply: usize, mv: Move) {
        if self.killer_moves[ply][0] != Some(mv) {
            self.killer_moves[ply][1] = self.killer_moves[ply][0];
            self.killer_moves[ply][0] = Some(mv);
        }
    }

    pub fn update_history(&mut self, color: Color, mv: Move, bonus: i32) {
        let entry = &mut self.history[piece_index(color, mv.piece)][mv.to.index() as usize];
        *entry += bonus;
    }

    pub fn history_score(&self, color: Color, mv: Move) -> i32 {
        self.history[piece_index(color, mv.piece)][mv.to.index() as usize]
    }

    pub fn decay_history(&mut self) {
        for row in self.history.iter_mut() {
            for v in row.iter_mut() {
                *v /= 8;
            }
        }
    }

    #[inline]
    pub fn reset_pv_length(&mut self, ply: usize) {
        self.pv_length[ply] = ply;
    }

    /// Installs `mv` as the best move at `ply` and splices in the child's
    /// PV tail (`pv[ply+1]`, already populated by the recursive call).
    pub fn record_pv(&mut self, ply: usize, mv: Move) {
        self.pv[ply][ply] = Some(mv);
        let child_length = self.pv_length[ply + 1];
        for k in (ply + 1)..child_length {
            self.pv[ply][k] = self.pv[ply + 1][k];
        }
        self.pv_length[ply] = child_length;
    }

    /// Arms PV-following for a new iterative-deepening iteration, seeded
    /// from the previous iteration's root line.
    pub fn begin_iteration(&mut self) {
        self.pv_follow = !self.previous_pv.is_empty();
        self.pv_scoring = false;
    }

    /// The PV move to prioritize at `ply` if we're still following last
    /// iteration's line, or `None` once it has diverged.
    pub fn pv_follow_move(&mut self, ply: usize, candidates: &[Move]) -> Option<Move> {
        if !self.pv_follow {
            return None;
        }
        self.pv_scoring = false;
        let target = self.previous_pv.get(ply).copied().flatten()?;
        if candidates.contains(&target) {
            self.pv_scoring = true;
            Some(target)
        } else {
            self.pv_follow = false;
            None
        }
    }

    pub fn commit_root_pv(&mut self) {
        self.previous_pv = self.pv[0][..self.pv_length[0]].to_vec();
    }

    pub fn root_pv(&self) -> Vec<Move> {
        self.pv[0][..self.pv_length[0]].iter().filter_map(|m| *m).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn mv(from: &str, to: &str) -> Move {
        Move::new(from.parse().unwrap(), to.parse().unwrap(), Piece::Pawn, None, 0)
    }

    #[test]
    fn pv_propagates_from_deeper_ply() {
        let mut ctx = SearchContext::new();
        let leaf = mv("e7", "e8");
        ctx.reset_pv_length(1);
        ctx.record_pv(1, leaf);
        ctx.reset_pv_length(0);
        let root = mv("e2", "e4");
        ctx.record_pv(0, root);
        assert_eq!(ctx.root_pv(), vec![root, leaf]);
    }

    #[test]
    fn pv_follow_disarms_on_divergence() {
        let mut ctx = SearchContext::new();
        let root = mv("e2", "e4");
        ctx.reset_pv_length(0);
        ctx.record_pv(0, root);
        ctx.commit_root_pv();

        ctx.begin_iteration();
        assert!(ctx.pv_follow);
        let other = mv("d2", "d4");
        assert_eq!(ctx.pv_follow_move(0, &[other]), None);
        assert!(!ctx.pv_follow);
    }
}
