//! Error types for the lrudict library.
//!
//! Every failure a public operation can report is a variant of [`Error`].
//! `Busy` is the concurrency contract: a mutating call that finds another
//! mutation in progress is refused before any state change, never queued
//! behind it (see the crate docs on conflict detection).

use std::fmt;

/// Error returned by [`LruDict`](crate::dict::LruDict) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The key is not present where presence is required.
    NotFound,
    /// The container is empty where an entry is required.
    Empty,
    /// A mutating operation was attempted while another mutation was in
    /// progress and conflict detection is enabled.
    Busy,
    /// A capacity of zero was supplied; the capacity bound must be at
    /// least 1.
    InvalidCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => f.write_str("key not found"),
            Error::Empty => f.write_str("container is empty"),
            Error::Busy => {
                f.write_str("attempted entry into critical section while busy")
            }
            Error::InvalidCapacity => f.write_str("capacity must be positive"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(Error::NotFound.to_string(), "key not found");
        assert_eq!(Error::Empty.to_string(), "container is empty");
        assert_eq!(
            Error::Busy.to_string(),
            "attempted entry into critical section while busy"
        );
        assert_eq!(Error::InvalidCapacity.to_string(), "capacity must be positive");
    }

    #[test]
    fn debug_names_variant() {
        assert!(format!("{:?}", Error::Busy).contains("Busy"));
    }

    #[test]
    fn implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<Error>();
    }

    #[test]
    fn copy_and_eq() {
        let a = Error::Empty;
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, Error::NotFound);
    }
}
