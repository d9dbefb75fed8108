//! Zobrist keys (component D): 12x64 piece keys, 64 ep keys, 16 castle
//! keys, 1 side key. Deterministically generated from xorshift32 seeded
//! `1804289383` under `deterministic_zobrist`; OS-seeded otherwise.

use crate::utils::XorShift32;
use once_cell::sync::OnceCell;

pub struct ZobristKeys {
    pub piece: [[u64; 64]; 12],
    pub side: u64,
    pub castle: [u64; 16],
    pub ep: [u64; 64],
}

fn generate_zobrist_keys(rng: &mut XorShift32) -> ZobristKeys {
    let mut piece = [[0u64; 64]; 12];
    for pc in piece.iter_mut() {
        for key in pc.iter_mut() {
            *key = rng.next_u64();
        }
    }

    let mut ep = [0u64; 64];
    for key in ep.iter_mut() {
        *key = rng.next_u64();
    }

    let side = rng.next_u64();

    let mut castle = [0u64; 16];
    for key in castle.iter_mut() {
        *key = rng.next_u64();
    }

    ZobristKeys { piece, side, castle, ep }
}

static KEYS: OnceCell<ZobristKeys> = OnceCell::new();

pub fn zobrist_keys() -> &'static ZobristKeys {
    KEYS.get_or_init(|| {
        #[cfg(feature = "deterministic_zobrist")]
        {
            let mut rng = XorShift32::new(XorShift32::DEFAULT_SEED);
            generate_zobrist_keys(&mut rng)
        }
        #[cfg(not(feature = "deterministic_zobrist"))]
        {
            let seed = rand::random::<u32>().max(1);
            let mut rng = XorShift32::new(seed);
            generate_zobrist_keys(&mut rng)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct() {
        let mut rng = XorShift32::new(XorShift32::DEFAULT_SEED);
        let keys = generate_zobrist_keys(&mut rng);
        assert_ne!(keys.piece[0][0], keys.piece[0][1]);
        assert_ne!(keys.side, 0);
    }

    #[test]
    fn deterministic_generation_is_reproducible() {
        let mut rng_a = XorShift32::new(42);
        let mut rng_b = XorShift32::new(42);
        let a = generate_zobrist_keys(&mut rng_a);
        let b = generate_zobrist_keys(&mut rng_b);
        assert_eq!(a.piece[5][10], b.piece[5][10]);
        assert_eq!(a.side, b.side);
    }
}
