//! Bob Jenkins' lookup3 `hashlittle`, extended to a 64-bit digest by keeping
//! both surviving accumulators (`hashlittle2`).
//!
//! Not a cryptographic hash.  The whole key must be hashed in one call:
//! the key length seeds the computation.
//!
//! ```
//! use hashlittle2::{hash64, hashlittle};
//!
//! let h = hash64(b"abc");
//! assert_eq!((h >> 32) as u32, hashlittle(b"abc", 0));
//! ```

pub mod error;
pub mod hasher;
pub mod lookup3;
pub mod mixers;
pub mod stats;

pub use error::{Error, Result};
pub use hasher::{HashLittle2, State};
pub use lookup3::{hash64, hashlittle, hashlittle2};
