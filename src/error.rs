//! Error types for bijection-map

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised by id-addressed access.
///
/// Duplicate inserts and lookup misses are not errors; they are reported
/// through `Option` / `bool` return values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The slot id was never allocated by this container.
    #[error("slot id {id} out of bounds (allocated slots: {len})")]
    SlotOutOfBounds {
        id: usize,
        len: usize,
    },
}

impl Error {
    #[inline]
    pub(crate) const fn out_of_bounds(id: usize, len: usize) -> Self {
        Self::SlotOutOfBounds { id, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display_names_id_and_len() {
        let err = Error::out_of_bounds(7, 3);
        assert_eq!(err.to_string(), "slot id 7 out of bounds (allocated slots: 3)");
        assert_eq!(err, Error::SlotOutOfBounds { id: 7, len: 3 });
    }
}
