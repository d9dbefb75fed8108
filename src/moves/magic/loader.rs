//! Optional persistence for the magic attack tables, behind the
//! `load_magic` feature (spec.md's `bincode`/`serde` ambient stack:
//! `MagicEntry`/`SliderTables`/`MagicTables` already derive both).
//!
//! Regenerating the tables at boot is cheap, but persisting them lets a
//! deployment skip that work by shipping a precomputed blob next to the
//! binary. This is deliberately separate from the transposition table,
//! which is never persisted.

use std::path::PathBuf;

use tracing::{debug, warn};

use super::structs::{build_tables, MagicTables};

const ENV_PATH: &str = "CHESS_MAGIC_TABLE_PATH";
const DEFAULT_FILENAME: &str = "magic_tables.bin";

fn table_path() -> PathBuf {
    std::env::var_os(ENV_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILENAME))
}

/// Serializes `tables` to the configured path, for precomputing a blob to
/// bundle with a deployment.
pub fn save(tables: &MagicTables) -> std::io::Result<()> {
    let bytes = bincode::serialize(tables)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(table_path(), bytes)
}

/// Loads tables from the configured path if present and well-formed,
/// otherwise falls back to recomputing them from scratch.
pub fn load_or_build() -> MagicTables {
    let path = table_path();
    match std::fs::read(&path) {
        Ok(bytes) => match bincode::deserialize::<MagicTables>(&bytes) {
            Ok(tables) => {
                debug!(?path, "loaded magic tables from disk");
                tables
            }
            Err(err) => {
                warn!(?path, %err, "magic table blob failed to deserialize, recomputing");
                build_tables()
            }
        },
        Err(_) => {
            debug!(?path, "no magic table blob found, recomputing");
            build_tables()
        }
    }
}
