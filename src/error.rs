use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    /// A second `write()` without a `reset()` in between.  The hash is seeded
    /// with the key length, so splitting a key across writes would silently
    /// produce a different digest.
    #[error("multiple writes not supported; reset the hasher first")]
    MultipleWrites,
}
