//! UCI dispatcher (collaborator O, spec.md §6): parses stdin lines, drives
//! the engine, and prints `info`/`bestmove`. Runs a background thread that
//! only reads stdin and forwards lines through a channel, so `go` can poll
//! for `stop`/`quit` without blocking the search (spec.md §4.M) — the
//! search loop is still single-threaded (spec.md §5); the reader thread
//! never touches engine state.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::moves::execute::generate_legal;
use crate::moves::magic::{attack_tables, MagicTables};
use crate::moves::perft::perft_divide;
use crate::moves::types::Move;
use crate::output::engine_println;
use crate::search::context::SearchContext;
use crate::search::search::{search_position, SearchLimits, SearchOutcome, TimeControl};
use crate::search::tt::TranspositionTable;

const DEFAULT_MOVES_TO_GO: u64 = 30;
const SAFETY_MARGIN_MS: u64 = 50;

struct Engine {
    board: Board,
    tables: &'static MagicTables,
    ctx: SearchContext,
    tt: TranspositionTable,
}

impl Engine {
    fn new(tt_size_bytes: usize) -> Self {
        Engine {
            board: Board::new(),
            tables: attack_tables(),
            ctx: SearchContext::new(),
            tt: TranspositionTable::with_size_bytes(tt_size_bytes),
        }
    }
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match std::io::BufRead::read_line(&mut stdin.lock(), &mut line) {
                Ok(0) | Err(_) => {
                    let _ = tx.send("quit".to_string());
                    break;
                }
                Ok(_) => {
                    if tx.send(line.trim().to_string()).is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

/// Runs the UCI main loop until `quit` (or EOF on stdin). `tt_size_bytes`
/// sizes the transposition table for the lifetime of the process.
pub fn run(tt_size_bytes: usize) {
    let mut engine = Engine::new(tt_size_bytes);
    let input = spawn_stdin_reader();
    let quit = AtomicBool::new(false);

    while !quit.load(Ordering::Relaxed) {
        let line = match input.recv() {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }
        dispatch(&mut engine, &line, &input, &quit);
    }
}

fn dispatch(engine: &mut Engine, line: &str, input: &Receiver<String>, quit: &AtomicBool) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&command) = parts.first() else { return };

    match command {
        "uci" => {
            engine_println!("id name chess_core");
            engine_println!("id author the chess_core authors");
            engine_println!("uciok");
        }
        "isready" => engine_println!("readyok"),
        "ucinewgame" => {
            engine.board = Board::new();
            engine.ctx = SearchContext::new();
            engine.tt.clear();
        }
        "position" => handle_position(engine, &parts),
        "go" => handle_go(engine, &parts, input, quit),
        "d" | "display" => {
            engine_println!("{}", engine.board);
            engine_println!("fen {}", engine.board.to_fen());
        }
        "stop" => {}
        "quit" => quit.store(true, Ordering::Relaxed),
        _ => {}
    }
}

fn handle_position(engine: &mut Engine, parts: &[&str]) {
    let mut idx = 1;
    let mut board = match parts.get(idx) {
        Some(&"startpos") => {
            idx += 1;
            Board::new()
        }
        Some(&"fen") => {
            idx += 1;
            let fen_start = idx;
            while idx < parts.len() && parts[idx] != "moves" {
                idx += 1;
            }
            match Board::from_str(&parts[fen_start..idx].join(" ")) {
                Ok(b) => b,
                Err(_) => return,
            }
        }
        _ => return,
    };

    if parts.get(idx) == Some(&"moves") {
        idx += 1;
        for mv_str in &parts[idx..] {
            match parse_uci_move(&mut board, mv_str, engine.tables) {
                Some(mv) => {
                    crate::moves::execute::make_move(&mut board, mv, engine.tables);
                }
                None => break,
            }
        }
    }

    engine.board = board;
}

fn parse_uci_move(board: &mut Board, text: &str, tables: &MagicTables) -> Option<Move> {
    let moves = generate_legal(board, tables);
    moves.into_iter().find(|m| m.to_uci() == text)
}

fn handle_go(engine: &mut Engine, parts: &[&str], input: &Receiver<String>, quit: &AtomicBool) {
    if parts.get(1) == Some(&"perft") {
        if let Some(depth) = parts.get(2).and_then(|d| d.parse::<u32>().ok()) {
            run_go_perft(engine, depth);
        }
        return;
    }

    let limits = parse_go_limits(parts, engine.board.side_to_move);
    let start = Instant::now();
    let stop_flag = AtomicBool::new(false);
    let time = TimeControl::new(limits.deadline, &stop_flag).with_input(input, quit);
    let search_limits = SearchLimits { max_depth: limits.depth };

    let outcome = search_position(
        &mut engine.board,
        engine.tables,
        &mut engine.ctx,
        &mut engine.tt,
        search_limits,
        time,
        |report: &SearchOutcome| emit_info(report, start),
    );

    print_bestmove(&outcome);
}

fn emit_info(report: &SearchOutcome, start: Instant) {
    let pv = report
        .pv
        .iter()
        .map(|m| m.to_uci())
        .collect::<Vec<_>>()
        .join(" ");
    engine_println!(
        "info score cp {} depth {} nodes {} time {} pv {}",
        report.score,
        report.depth,
        report.nodes,
        start.elapsed().as_millis(),
        pv
    );
}

fn print_bestmove(outcome: &SearchOutcome) {
    match outcome.best_move {
        Some(mv) => engine_println!("bestmove {}", mv.to_uci()),
        None => engine_println!("bestmove 0000"),
    }
}

fn run_go_perft(engine: &mut Engine, depth: u32) {
    let mut total = 0u64;
    for (mv, count) in perft_divide(&mut engine.board, engine.tables, depth) {
        engine_println!("{}: {}", mv.to_uci(), count);
        total += count;
    }
    engine_println!("nodes {}", total);
}

struct GoLimits {
    depth: i32,
    deadline: Option<Instant>,
}

fn parse_go_limits(parts: &[&str], side: crate::board::Color) -> GoLimits {
    let mut depth = i32::MAX;
    let mut movetime: Option<u64> = None;
    let mut wtime: Option<u64> = None;
    let mut btime: Option<u64> = None;
    let mut winc: u64 = 0;
    let mut binc: u64 = 0;
    let mut movestogo: Option<u64> = None;
    let mut infinite = false;

    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                depth = parts.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(depth);
                i += 2;
            }
            "movetime" => {
                movetime = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "wtime" => {
                wtime = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "btime" => {
                btime = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "winc" => {
                winc = parts.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(0);
                i += 2;
            }
            "binc" => {
                binc = parts.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(0);
                i += 2;
            }
            "movestogo" => {
                movestogo = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "infinite" => {
                infinite = true;
                i += 1;
            }
            _ => i += 1,
        }
    }

    if infinite {
        return GoLimits { depth: if depth == i32::MAX { 64 } else { depth }, deadline: None };
    }

    let deadline = if let Some(ms) = movetime {
        Some(Instant::now() + Duration::from_millis(ms))
    } else {
        let (time_remaining, increment) = match side {
            crate::board::Color::White => (wtime, winc),
            crate::board::Color::Black => (btime, binc),
        };
        time_remaining.map(|remaining| {
            let moves_to_go = movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
            let per_move = remaining / moves_to_go;
            let allocated = per_move.saturating_sub(SAFETY_MARGIN_MS) + increment;
            Instant::now() + Duration::from_millis(allocated.max(1))
        })
    };

    GoLimits { depth: if depth == i32::MAX { 64 } else { depth }, deadline }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_movetime_into_a_near_term_deadline() {
        let limits = parse_go_limits(&["go", "movetime", "100"], crate::board::Color::White);
        let deadline = limits.deadline.expect("movetime should set a deadline");
        assert!(deadline <= Instant::now() + Duration::from_millis(150));
    }

    #[test]
    fn infinite_search_has_no_deadline() {
        let limits = parse_go_limits(&["go", "infinite"], crate::board::Color::White);
        assert!(limits.deadline.is_none());
    }

    #[test]
    fn bare_depth_has_no_deadline() {
        let limits = parse_go_limits(&["go", "depth", "4"], crate::board::Color::White);
        assert_eq!(limits.depth, 4);
        assert!(limits.deadline.is_none());
    }
}
