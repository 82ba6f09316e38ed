use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Memory access out of range: {address:#x} + {size} exceeds capacity {capacity:#x}")]
    InvalidAddress {
        address: u64,
        size: usize,
        capacity: usize,
    },

    #[error("Value matches allocator fill pattern: {0:#010x}")]
    SentinelValue(u32),

    #[error("Implausible {name}: {value} exceeds maximum {max}")]
    ImplausibleValue {
        name: &'static str,
        value: u32,
        max: u32,
    },

    #[error("Allocation of {requested} bytes could not be satisfied")]
    AllocationFailure { requested: usize },

    #[error("No backing memory buffer this call")]
    NullSource,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check whether this error is absorbed by the keep-last-good policy.
    ///
    /// Everything that stems from the external buffer being unreadable or
    /// untrustworthy this call is retainable: the caller keeps its last
    /// committed value and moves on. IO and JSON errors come from file
    /// handling outside the poll path and are not.
    pub fn is_retainable(&self) -> bool {
        matches!(
            self,
            Error::InvalidAddress { .. }
                | Error::SentinelValue(_)
                | Error::ImplausibleValue { .. }
                | Error::NullSource
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_errors_are_retainable() {
        assert!(Error::NullSource.is_retainable());
        assert!(Error::SentinelValue(0xFFFF_FFFF).is_retainable());
        assert!(
            Error::InvalidAddress {
                address: 0x80_0000,
                size: 4,
                capacity: 0x80_0000,
            }
            .is_retainable()
        );
        assert!(
            Error::ImplausibleValue {
                name: "entity_count",
                value: 70_000,
                max: 1024,
            }
            .is_retainable()
        );
    }

    #[test]
    fn test_io_errors_are_not_retainable() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing dump");
        assert!(!Error::Io(io_err).is_retainable());
    }
}
