//! Negamax search (components K/L/M): quiescence search, the main
//! negamax tree with null-move pruning, late-move reduction, and
//! principal-variation re-search, and the iterative-deepening driver with
//! aspiration windows. Every 2048 nodes the search polls its time/input
//! collaborator (spec.md §4.M); an iteration that completes after the stop
//! signal fires is discarded and the previous iteration's line is kept
//! (spec.md §9 bug fix).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::time::Instant;

use crate::board::Board;
use crate::moves::execute::{
    generate_legal, generate_legal_captures, make_move, make_null_move, unmake_move, unmake_null_move,
};
use crate::moves::magic::MagicTables;
use crate::moves::square_control::in_check;
use crate::moves::types::Move;
use crate::search::context::{SearchContext, MAX_PLY};
use crate::search::eval::static_eval;
use crate::search::ordering::order_moves;
use crate::search::tt::{score_from_tt, score_to_tt, Bound, TranspositionTable};

pub const MATE_SCORE: i32 = 49_000;
pub const INFINITY: i32 = 60_000;
const ASPIRATION_WINDOW: i32 = 50;

const EMPTY_HISTORY: crate::search::context::HistoryTable = [[0; 64]; 12];

/// Cooperative time/input control shared between the negamax tree and the
/// iterative-deepening driver. Polled, never pushed: a stop can come from
/// the wall clock, from an externally-set `stop` flag, or — when wired to
/// the UCI dispatcher's stdin-reader channel via [`TimeControl::with_input`]
/// — from a `stop`/`quit` line arriving while the search is running.
pub struct TimeControl<'a> {
    deadline: Option<Instant>,
    stop: &'a AtomicBool,
    input: Option<&'a Receiver<String>>,
    quit: Option<&'a AtomicBool>,
    stopped: bool,
}

impl<'a> TimeControl<'a> {
    pub fn new(deadline: Option<Instant>, stop: &'a AtomicBool) -> Self {
        TimeControl { deadline, stop, input: None, quit: None, stopped: false }
    }

    pub fn with_input(mut self, input: &'a Receiver<String>, quit: &'a AtomicBool) -> Self {
        self.input = Some(input);
        self.quit = Some(quit);
        self
    }

    #[inline]
    fn poll(&mut self) {
        if self.stopped {
            return;
        }
        if let Some(rx) = self.input {
            while let Ok(line) = rx.try_recv() {
                match line.trim() {
                    "stop" => self.stopped = true,
                    "quit" => {
                        self.stopped = true;
                        if let Some(quit) = self.quit {
                            quit.store(true, Ordering::Relaxed);
                        }
                    }
                    _ => {}
                }
            }
        }
        if self.stop.load(Ordering::Relaxed) {
            self.stopped = true;
            return;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.stopped = true;
            }
        }
    }

    #[inline]
    pub fn stopped(&self) -> bool {
        self.stopped
    }
}

pub struct SearchLimits {
    pub max_depth: i32,
}

#[derive(Clone, Debug, Default)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: i32,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

/// Captures-only search extending the leaf of the main tree until the
/// position is "quiet" (spec.md §4.K).
fn quiescence(
    board: &mut Board,
    tables: &MagicTables,
    time: &mut TimeControl,
    nodes: &mut u64,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    *nodes += 1;
    if *nodes % 2048 == 0 {
        time.poll();
    }
    if time.stopped() {
        return 0;
    }

    let stand_pat = static_eval(board);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut moves = generate_legal_captures(board, tables);
    order_moves(&mut moves, board, None, [None, None], &EMPTY_HISTORY);

    for mv in moves {
        let snapshot = match make_move(board, mv, tables) {
            Some(s) => s,
            None => continue,
        };
        let score = -quiescence(board, tables, time, nodes, -beta, -alpha);
        unmake_move(board, snapshot);

        if time.stopped() {
            return 0;
        }
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

#[allow(clippy::too_many_arguments)]
fn negamax(
    board: &mut Board,
    tables: &MagicTables,
    ctx: &mut SearchContext,
    tt: &mut TranspositionTable,
    time: &mut TimeControl,
    nodes: &mut u64,
    mut depth: i32,
    ply: usize,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    ctx.reset_pv_length(ply);

    if time.stopped() {
        return 0;
    }

    *nodes += 1;
    if *nodes % 2048 == 0 {
        time.poll();
        if time.stopped() {
            return 0;
        }
    }

    let side = board.side_to_move;
    let checked = in_check(board, tables, side);
    if checked {
        depth += 1;
    }

    if depth <= 0 {
        return quiescence(board, tables, time, nodes, alpha, beta);
    }
    if ply >= MAX_PLY - 1 {
        return static_eval(board);
    }

    let is_pv_node = beta - alpha > 1;
    let root = ply == 0;
    let original_alpha = alpha;

    let mut tt_move = None;
    if let Some((stored_move, score, tt_depth, bound)) = tt.probe(board.hash) {
        tt_move = stored_move;
        if !is_pv_node && tt_depth as i32 >= depth {
            let adjusted = score_from_tt(score, ply as i32);
            match bound {
                Bound::Exact => return adjusted,
                Bound::Lower if adjusted >= beta => return adjusted,
                Bound::Upper if adjusted <= alpha => return adjusted,
                _ => {}
            }
        }
    }

    if !root && !checked && depth >= 3 && board.has_major_pieces(side) {
        let reduction = if depth > 6 { 3 } else { 2 };
        let undo = make_null_move(board);
        let score = -negamax(
            board, tables, ctx, tt, time, nodes, depth - 1 - reduction, ply + 1, -beta, -beta + 1,
        );
        unmake_null_move(board, undo);
        if time.stopped() {
            return 0;
        }
        if score >= beta {
            return beta;
        }
    }

    let mut candidates = crate::moves::types::MoveList::new();
    crate::moves::movegen::generate_pseudo_legal(board, tables, &mut candidates);

    let pv_move = ctx.pv_follow_move(ply, &candidates).or(tt_move);
    let killers = ctx.killer_moves[ply];
    order_moves(&mut candidates, board, pv_move, killers, &ctx.history);

    let mut best_score = -INFINITY;
    let mut best_move: Option<Move> = None;
    let mut moves_searched = 0usize;

    for mv in candidates {
        let snapshot = match make_move(board, mv, tables) {
            Some(s) => s,
            None => continue,
        };

        let score = if moves_searched == 0 {
            -negamax(board, tables, ctx, tt, time, nodes, depth - 1, ply + 1, -beta, -alpha)
        } else {
            let reduce = moves_searched >= 4 && depth >= 3 && !checked && mv.is_quiet();
            let reduced_depth = if reduce { depth - 2 } else { depth - 1 };
            let mut s = -negamax(
                board, tables, ctx, tt, time, nodes, reduced_depth, ply + 1, -alpha - 1, -alpha,
            );
            if s > alpha && reduce {
                s = -negamax(board, tables, ctx, tt, time, nodes, depth - 1, ply + 1, -alpha - 1, -alpha);
            }
            if s > alpha && s < beta {
                s = -negamax(board, tables, ctx, tt, time, nodes, depth - 1, ply + 1, -beta, -alpha);
            }
            s
        };

        unmake_move(board, snapshot);
        moves_searched += 1;

        if time.stopped() {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
        if score > alpha {
            alpha = score;
            ctx.record_pv(ply, mv);
            if alpha >= beta {
                if mv.is_quiet() {
                    ctx.update_killer(ply, mv);
                    ctx.update_history(side, mv, depth);
                }
                break;
            }
        }
    }

    if moves_searched == 0 {
        return if checked { -MATE_SCORE + ply as i32 } else { 0 };
    }

    let bound = if best_score >= beta {
        Bound::Lower
    } else if best_score > original_alpha {
        Bound::Exact
    } else {
        Bound::Upper
    };
    tt.store(board.hash, best_move, score_to_tt(best_score, ply as i32), depth.max(0) as u8, bound);

    best_score
}

/// Iterative deepening with aspiration windows (spec.md §4.M). Returns the
/// last iteration that completed before the clock or `stop` fired, calling
/// `on_iteration` once per completed depth so the caller can emit `info`
/// lines as they happen.
pub fn search_position(
    board: &mut Board,
    tables: &MagicTables,
    ctx: &mut SearchContext,
    tt: &mut TranspositionTable,
    limits: SearchLimits,
    mut time: TimeControl,
    mut on_iteration: impl FnMut(&SearchOutcome),
) -> SearchOutcome {
    ctx.reset();
    let mut nodes = 0u64;

    let root_moves = generate_legal(board, tables);
    let mut outcome = SearchOutcome::default();
    if root_moves.is_empty() {
        return outcome;
    }
    outcome.best_move = Some(root_moves[0]);

    let mut depth = 1;
    let mut alpha = -INFINITY;
    let mut beta = INFINITY;

    while depth <= limits.max_depth {
        ctx.begin_iteration();

        let score = loop {
            let s = negamax(board, tables, ctx, tt, &mut time, &mut nodes, depth, 0, alpha, beta);
            if time.stopped() {
                break s;
            }
            if s <= alpha || s >= beta {
                alpha = -INFINITY;
                beta = INFINITY;
                continue;
            }
            break s;
        };

        if time.stopped() {
            break;
        }

        ctx.commit_root_pv();
        let pv = ctx.root_pv();
        outcome = SearchOutcome {
            best_move: pv.first().copied().or(outcome.best_move),
            score,
            depth,
            nodes,
            pv,
        };
        on_iteration(&outcome);

        alpha = score - ASPIRATION_WINDOW;
        beta = score + ASPIRATION_WINDOW;
        depth += 1;
        ctx.decay_history();
    }

    outcome
}
