use crate::lookup3::{final_mix, BLOCK_BYTES};

pub const IN_SIZE_BYTES: usize = BLOCK_BYTES;
pub const OUT_SIZE_BYTES: usize = 64 / 8;
pub const DIGEST_SIZE_BYTES: usize = 64 / 8;

/// The lookup3 final mix.
///
/// Only `c` and `b` survive into the 64-bit digest, so `a` is left out of the
/// output.
pub fn mix_input(in_bytes: &[u8], out_bytes: &mut [u8]) {
    assert!(in_bytes.len() == IN_SIZE_BYTES);
    assert!(out_bytes.len() == OUT_SIZE_BYTES);

    let [mut a, mut b, mut c] = super::load_words(in_bytes);
    final_mix(&mut a, &mut b, &mut c);

    out_bytes[0..4].copy_from_slice(&u32::to_le_bytes(b));
    out_bytes[4..8].copy_from_slice(&u32::to_le_bytes(c));
}
