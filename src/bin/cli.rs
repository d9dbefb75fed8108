//! Process entry point: wires environment configuration to the UCI
//! dispatcher. All protocol logic lives in `chess_core::uci`; this file
//! only reads the process's knobs and hands off.

#[cfg(feature = "cli")]
fn init_logging() {
    if let Ok(path) = std::env::var("CHESS_LOG_PATH") {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        chess_core::logger::init_logging(path, &filter);
    }
}

#[cfg(not(feature = "cli"))]
fn init_logging() {}

fn tt_size_bytes() -> usize {
    std::env::var("CHESS_TT_MB")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .map(|mb| mb * 1024 * 1024)
        .unwrap_or(chess_core::search::tt::DEFAULT_SIZE_BYTES)
}

fn main() {
    init_logging();
    chess_core::uci::run(tt_size_bytes());
}
