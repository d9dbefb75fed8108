//! Magic-number search (spec.md §4.B "Magic generation (tool mode)"):
//! xorshift32-seeded candidates formed as the AND of three random 64-bit
//! draws, kept if the resulting table is collision-free. Not on the runtime
//! path — the engine always uses the hard-coded tables in `tables.rs`; this
//! exists so those tables are reproducible rather than asserted.

use crate::utils::XorShift32;
use std::collections::HashMap;

pub fn random_sparse_u64(rng: &mut XorShift32) -> u64 {
    rng.next_sparse_u64()
}

pub fn is_magic_candidate_valid(blockers: &[u64], attacks: &[u64], magic: u64, shift: u32) -> bool {
    let mut seen: HashMap<u64, u64> = HashMap::new();
    for i in 0..blockers.len() {
        let index = blockers[i].wrapping_mul(magic) >> shift;
        match seen.entry(index) {
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(attacks[i]);
            }
            std::collections::hash_map::Entry::Occupied(e) => {
                if *e.get() != attacks[i] {
                    return false;
                }
            }
        }
    }
    true
}

/// Tries up to 10^8 candidates, as spec.md's tool-mode generator does.
pub fn find_magic_number(
    blockers: &[u64],
    attacks: &[u64],
    shift: u32,
    rng: &mut XorShift32,
) -> Result<u64, String> {
    const MAX_TRIALS: u64 = 100_000_000;
    for _ in 0..MAX_TRIALS {
        let magic = random_sparse_u64(rng);
        // A magic with too few high bits set rarely produces a good spread.
        if ((magic.wrapping_mul(0x0101_0101_0101_0101)) >> 56).count_ones() < 6 {
            continue;
        }
        if is_magic_candidate_valid(blockers, attacks, magic, shift) {
            return Ok(magic);
        }
    }
    Err(format!("no collision-free magic found after {MAX_TRIALS} trials"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::magic::attacks::{rook_attacks_on_the_fly, rook_relevant_mask, set_occupancy};

    #[test]
    fn finds_a_valid_magic_for_a_single_square() {
        let sq = 0u8; // a8, relevant_bits = 12
        let bits = 12u32;
        let mask = rook_relevant_mask(sq);
        let size = 1usize << bits;
        let mut blockers = Vec::with_capacity(size);
        let mut attacks = Vec::with_capacity(size);
        for index in 0..size {
            let occ = set_occupancy(index, bits, mask);
            blockers.push(occ);
            attacks.push(rook_attacks_on_the_fly(sq, occ));
        }
        let mut rng = XorShift32::new(XorShift32::DEFAULT_SEED);
        let magic = find_magic_number(&blockers, &attacks, 64 - bits, &mut rng)
            .expect("should find a magic for a8 rook within the trial budget");
        assert!(is_magic_candidate_valid(&blockers, &attacks, magic, 64 - bits));
    }
}
