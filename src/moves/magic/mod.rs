//! Attack tables (component B): precomputed leaper tables plus magic-indexed
//! slider lookups for bishop/rook/queen.

pub mod attacks;
#[cfg(feature = "load_magic")]
pub mod loader;
pub mod search;
mod structs;
mod tables;

pub use structs::{MagicEntry, MagicTables};

use once_cell::sync::OnceCell;
#[cfg(not(feature = "load_magic"))]
use tracing::debug;

static TABLES: OnceCell<MagicTables> = OnceCell::new();

/// Process-wide attack tables: leaper tables plus magic-indexed slider
/// tables, built once and read-only afterward (spec.md §4.B, §5). With the
/// `load_magic` feature this tries a bundled blob first and falls back to
/// building from scratch.
pub fn attack_tables() -> &'static MagicTables {
    TABLES.get_or_init(|| {
        #[cfg(feature = "load_magic")]
        {
            loader::load_or_build()
        }
        #[cfg(not(feature = "load_magic"))]
        {
            debug!("building magic attack tables");
            structs::build_tables()
        }
    })
}
