use crate::lookup3::{hash64, BLOCK_BYTES};

// Two blocks, so a key goes through one `mix()` and then the tail plus
// `final_mix()`.
pub const IN_SIZE_BYTES: usize = BLOCK_BYTES * 2;
pub const OUT_SIZE_BYTES: usize = 64 / 8;
pub const DIGEST_SIZE_BYTES: usize = 64 / 8;

/// The complete zero-seeded hash over a fixed-length key.
pub fn mix_input(in_bytes: &[u8], out_bytes: &mut [u8]) {
    assert!(in_bytes.len() == IN_SIZE_BYTES);
    assert!(out_bytes.len() == OUT_SIZE_BYTES);

    out_bytes.copy_from_slice(&u64::to_le_bytes(hash64(in_bytes)));
}
