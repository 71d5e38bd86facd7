use thiserror::Error;

/// Errors surfaced by the simulated transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The packet exceeds the maximum payload; the protocol never
    /// fragments, so oversize packets are rejected outright
    #[error("packet of {size} byte(s) exceeds the maximum of {max}")]
    PayloadTooLarge { size: usize, max: usize },
}
