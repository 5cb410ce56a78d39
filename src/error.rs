//! Error types for the Madgwick filter

/// Configuration rejected when constructing a filter
///
/// Every variant is a caller programming error. They are only reported by
/// the constructors; a filter that exists is always usable.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterError {
    #[error("sample rate must be finite and positive, got {0} Hz")]
    InvalidSampleRate(f64),

    #[error("filter gain must be finite and non-negative, got {0}")]
    InvalidGain(f64),

    #[error("gravity magnitude must be finite and positive, got {0}")]
    InvalidGravity(f64),
}
