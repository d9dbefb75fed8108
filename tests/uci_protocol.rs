//! End-to-end UCI scenarios (spec.md §8): drives the compiled binary over
//! its real stdin/stdout pipes, the way a GUI would.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

struct Session {
    child: Child,
    lines: Receiver<String>,
}

impl Session {
    fn spawn() -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_chess_core"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn engine binary");

        let stdout = child.stdout.take().expect("piped stdout");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines().map_while(Result::ok) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Session { child, lines: rx }
    }

    fn send(&mut self, line: &str) {
        let stdin = self.child.stdin.as_mut().expect("piped stdin");
        writeln!(stdin, "{line}").expect("write to engine stdin");
    }

    /// Reads lines until one satisfies `pred`, or `timeout` elapses.
    fn wait_for(&self, timeout: Duration, mut pred: impl FnMut(&str) -> bool) -> Option<String> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            match self.lines.recv_timeout(remaining) {
                Ok(line) => {
                    if pred(&line) {
                        return Some(line);
                    }
                }
                Err(_) => return None,
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.send("quit");
        let _ = self.child.wait();
    }
}

#[test]
fn uci_handshake_reports_identity_and_uciok() {
    let mut session = Session::spawn();
    session.send("uci");

    let id_name = session.wait_for(Duration::from_secs(5), |l| l.starts_with("id name"));
    assert!(id_name.is_some(), "expected an `id name ...` line");

    let id_author = session.wait_for(Duration::from_secs(5), |l| l.starts_with("id author"));
    assert!(id_author.is_some(), "expected an `id author ...` line");

    let uciok = session.wait_for(Duration::from_secs(5), |l| l == "uciok");
    assert!(uciok.is_some(), "expected a `uciok` line");
}

fn is_legal_board_square_pair(mv: &str) -> bool {
    let bytes = mv.as_bytes();
    if mv.len() < 4 {
        return false;
    }
    let file_ok = |b: u8| (b'a'..=b'h').contains(&b);
    let rank_ok = |b: u8| (b'1'..=b'8').contains(&b);
    file_ok(bytes[0]) && rank_ok(bytes[1]) && file_ok(bytes[2]) && rank_ok(bytes[3])
}

#[test]
fn search_from_a_midgame_position_returns_one_legal_bestmove() {
    let mut session = Session::spawn();
    session.send("uci");
    session.wait_for(Duration::from_secs(5), |l| l == "uciok");

    session.send("position startpos moves e2e4 e7e5");
    session.send("go depth 4");

    let bestmove = session
        .wait_for(Duration::from_secs(30), |l| l.starts_with("bestmove"))
        .expect("expected a bestmove line");

    let mv = bestmove.split_whitespace().nth(1).expect("bestmove has a move token");
    assert!(is_legal_board_square_pair(mv), "bestmove {mv} is not a well-formed square pair");
}

#[test]
fn movetime_search_returns_bestmove_promptly() {
    let mut session = Session::spawn();
    session.send("uci");
    session.wait_for(Duration::from_secs(5), |l| l == "uciok");

    session.send("position startpos");
    let start = Instant::now();
    session.send("go movetime 100");

    let bestmove = session.wait_for(Duration::from_millis(600), |l| l.starts_with("bestmove"));
    assert!(bestmove.is_some(), "expected bestmove within the movetime budget");
    assert!(start.elapsed() < Duration::from_millis(600), "search overran its movetime budget");
}

#[test]
fn mate_in_one_position_finds_the_mating_move() {
    let mut session = Session::spawn();
    session.send("uci");
    session.wait_for(Duration::from_secs(5), |l| l == "uciok");

    // White mates with Ra8#.
    session.send("position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1 moves");
    session.send("go depth 2");

    let bestmove = session
        .wait_for(Duration::from_secs(10), |l| l.starts_with("bestmove"))
        .expect("expected a bestmove line");
    let mv = bestmove.split_whitespace().nth(1).expect("bestmove has a move token");
    assert_eq!(mv, "a1a8");
}
