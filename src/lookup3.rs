//! Bob Jenkins' lookup3 `hashlittle`, widened to 64 bits.
//!
//! The 32-bit `hashlittle` throws away two of its three accumulators.  The
//! `hashlittle2` variant keeps `b` alongside `c`, which gives a 64-bit digest
//! whose upper half is still bit-for-bit the classic 32-bit hash.  This is the
//! hash the systemd journal format uses to index its entries.
//!
//! Everything here reads the key one byte at a time.  That's the slow path of
//! lookup3.c, but it has no alignment or endianness special cases.
//!
//! The hash depends on the length of the whole key, so it can't be fed
//! incrementally.  Always pass the complete key in one call.

/// Initial value of all three accumulators, before length and seed are added.
pub const INIT: u32 = 0xdeadbeef;

/// Bytes consumed by one round of `mix()`.
pub const BLOCK_BYTES: usize = 12;

/// Hashes `key` with zero seeds and packs the result as `(c << 32) | b`.
///
/// The upper 32 bits equal `hashlittle(key, 0)`.
#[inline]
pub fn hash64(key: &[u8]) -> u64 {
    let (c, b) = hashlittle2(key, 0, 0);
    pack(c, b)
}

/// The classic 32-bit lookup3 hash.
#[inline]
pub fn hashlittle(key: &[u8], init: u32) -> u32 {
    hashlittle2(key, init, 0).0
}

/// Hashes `key` into two 32-bit values, returned as `(c, b)`.
///
/// `pc` and `pb` are the primary and secondary seeds.  With both at zero
/// this is the plain unseeded hash.  Feeding a previous result back in as
/// `(pc, pb)` chains hashes, which is *not* the same as hashing the
/// concatenated keys.
pub fn hashlittle2(key: &[u8], pc: u32, pb: u32) -> (u32, u32) {
    let mut a = INIT.wrapping_add(key.len() as u32).wrapping_add(pc);
    let mut b = a;
    let mut c = a.wrapping_add(pb);

    // All but the last block.  Note the strict `>`: a key that is an exact
    // multiple of 12 bytes leaves a full block for the tail.
    let mut k = key;
    while k.len() > BLOCK_BYTES {
        a = a.wrapping_add(le_u32(&k[0..4]));
        b = b.wrapping_add(le_u32(&k[4..8]));
        c = c.wrapping_add(le_u32(&k[8..12]));
        mix(&mut a, &mut b, &mut c);
        k = &k[BLOCK_BYTES..];
    }

    // Only reachable for the empty key.
    if k.is_empty() {
        return (c, b);
    }

    let len = k.len();
    if len >= 12 {
        c = c.wrapping_add((k[11] as u32) << 24);
    }
    if len >= 11 {
        c = c.wrapping_add((k[10] as u32) << 16);
    }
    if len >= 10 {
        c = c.wrapping_add((k[9] as u32) << 8);
    }
    if len >= 9 {
        c = c.wrapping_add(k[8] as u32);
    }
    if len >= 8 {
        b = b.wrapping_add((k[7] as u32) << 24);
    }
    if len >= 7 {
        b = b.wrapping_add((k[6] as u32) << 16);
    }
    if len >= 6 {
        b = b.wrapping_add((k[5] as u32) << 8);
    }
    if len >= 5 {
        b = b.wrapping_add(k[4] as u32);
    }
    if len >= 4 {
        a = a.wrapping_add((k[3] as u32) << 24);
    }
    if len >= 3 {
        a = a.wrapping_add((k[2] as u32) << 16);
    }
    if len >= 2 {
        a = a.wrapping_add((k[1] as u32) << 8);
    }
    a = a.wrapping_add(k[0] as u32);

    final_mix(&mut a, &mut b, &mut c);

    (c, b)
}

/// Packs the two halves of a `hashlittle2` result into one 64-bit value.
#[inline(always)]
pub fn pack(c: u32, b: u32) -> u64 {
    ((c as u64) << 32) | b as u64
}

/// Reversible block mix, applied once per 12 bytes of key (except the last
/// block).
#[inline(always)]
pub fn mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(4);
    *c = c.wrapping_add(*b);

    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(6);
    *a = a.wrapping_add(*c);

    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(8);
    *b = b.wrapping_add(*a);

    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(16);
    *c = c.wrapping_add(*b);

    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(19);
    *a = a.wrapping_add(*c);

    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(4);
    *b = b.wrapping_add(*a);
}

/// Final mixing of the three accumulators into `c` (and `b`).
#[inline(always)]
pub fn final_mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(14));
    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(11));
    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(25));
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(16));
    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(4));
    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(14));
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(24));
}

#[inline(always)]
fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_skips_final_mix() {
        assert_eq!(hashlittle2(b"", 0, 0), (0xdeadbeef, 0xdeadbeef));
        assert_eq!(hash64(b""), 0xdeadbeefdeadbeef);
    }

    #[test]
    fn short_keys() {
        assert_eq!(hashlittle(b"a", 0), 0x58d68708);
        assert_eq!(hashlittle(b"ab", 0), 0xfbb3a8df);
        assert_eq!(hashlittle(b"abc", 0), 0x0e397631);
        assert_eq!(hashlittle(b"C", 0), 0xaabe02cb);
        assert_eq!(hashlittle(b"67", 0), 0x33eac7d8);
    }

    #[test]
    fn full_64_bits() {
        assert_eq!(hash64(b"a"), 0x58d68708582647ac);
        assert_eq!(hash64(b"abc"), 0x0e3976313c03be9e);
        assert_eq!(hash64(b"qE4P"), 0xd9c5bef77071233b);
    }

    #[test]
    fn block_boundaries() {
        // Exactly one block goes through the tail, one byte more goes through
        // `mix()` first.
        assert_eq!(hash64(b"abcdefghijkl"), 0x4012f87b75b50ec0);
        assert_eq!(hash64(b"abcdefghijklm"), 0x928128f90f04ab68);
    }

    // Values printed by the `driver5()` self-test in lookup3.c.
    #[test]
    fn seeded() {
        let key = b"Four score and seven years ago";
        assert_eq!(hashlittle2(key, 0, 0), (0x17770551, 0xce7226e6));
        assert_eq!(hashlittle2(key, 0, 1), (0xe3607cae, 0xbd371de4));
        assert_eq!(hashlittle2(key, 1, 0), (0xcd628161, 0x6cbea4b3));
        assert_eq!(hashlittle(b"", 0xdeadbeef), 0xbd5b7dde);
    }

    #[test]
    fn chaining_is_not_concatenation() {
        let (c, b) = hashlittle2(b"ab", 0, 0);
        assert_eq!(hashlittle2(b"cd", c, b), (0x560515fb, 0x46ac04ab));
        assert_eq!(hashlittle2(b"abcd", 0, 0), (0xb5f4889c, 0xe20dd3fa));
    }

    #[test]
    fn pack_order() {
        assert_eq!(pack(0x01234567, 0x89abcdef), 0x0123456789abcdef);
    }
}
