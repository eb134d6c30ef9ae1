//! A write-then-read hasher object around `lookup3::hashlittle2()`.
//!
//! Prefer `lookup3::hash64()` when you have the whole key at hand.  This type
//! exists for code that wants a hasher object it can reset and query, and it
//! enforces the one-write-per-reset rule that the algorithm needs.

use log::{trace, warn};

use crate::{
    error::{Error, Result},
    lookup3,
};

pub const DIGEST_SIZE: usize = 8;
pub const BLOCK_SIZE: usize = 1;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum State {
    /// Fresh or reset.  The next `write()` is accepted.
    #[default]
    Idle,
    /// A key has been hashed.  Further writes are rejected until `reset()`.
    Computed,
}

#[derive(Clone, Debug, Default)]
pub struct HashLittle2 {
    c: u32,
    b: u32,
    state: State,
}

impl HashLittle2 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the carried-over accumulators, so the next write starts from
    /// the zero seed.
    pub fn reset(&mut self) {
        trace!("hashlittle2: reset");
        self.c = 0;
        self.b = 0;
        self.state = State::Idle;
    }

    /// Hashes the complete key and returns the number of bytes consumed.
    ///
    /// The previous `c` and `b` seed the computation, which is why a fresh
    /// or reset hasher is needed to reproduce the plain hash.  A second write
    /// without a reset fails with `Error::MultipleWrites` and leaves the
    /// digest untouched.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.state == State::Computed {
            warn!(
                "hashlittle2: rejected a second write of {} bytes without reset",
                data.len()
            );
            return Err(Error::MultipleWrites);
        }

        let (c, b) = lookup3::hashlittle2(data, self.c, self.b);
        self.c = c;
        self.b = b;
        self.state = State::Computed;
        trace!("hashlittle2: hashed {} bytes -> {:016x}", data.len(), self.digest64());

        Ok(data.len())
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The digest as big-endian bytes: `c` first, then `b`.
    pub fn digest(&self) -> [u8; DIGEST_SIZE] {
        self.digest64().to_be_bytes()
    }

    /// Returns `existing` with the digest appended if `append` is set, or
    /// just the digest otherwise.
    pub fn sum(&self, existing: Vec<u8>, append: bool) -> Vec<u8> {
        let mut out = if append { existing } else { Vec::with_capacity(DIGEST_SIZE) };
        out.extend_from_slice(&self.digest());
        out
    }

    /// `(c << 32) | b`.  The upper half is the legacy 32-bit `hashlittle`.
    pub fn digest64(&self) -> u64 {
        lookup3::pack(self.c, self.b)
    }

    pub fn digest_size(&self) -> usize {
        DIGEST_SIZE
    }

    pub fn block_size(&self) -> usize {
        BLOCK_SIZE
    }
}
