use thiserror::Error;

/// Errors that can occur while reading wire data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeError {
    /// The reader ran out of bytes before the value was complete
    #[error("buffer exhausted: needed {needed} more byte(s), {remaining} remaining")]
    BufferExhausted { needed: usize, remaining: usize },

    /// A string field did not contain valid UTF-8
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// A tag byte did not correspond to any known variant
    #[error("unknown variant tag {tag}")]
    UnknownVariant { tag: u8 },
}
