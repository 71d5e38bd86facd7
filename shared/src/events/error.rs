use thiserror::Error;

use crate::types::LevelObjectId;

/// Recoverable failures raised by event handlers during dispatch.
///
/// An event that fails to resolve is dropped with a warning; it never stalls
/// or aborts the queue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    /// The animation asset reference could not be loaded
    #[error("animation reference {anim_ref:?} could not be resolved")]
    UnresolvedAnimRef { anim_ref: String },

    /// The event referenced an object this host does not know
    #[error("object {object_id:?} could not be resolved")]
    UnresolvedObject { object_id: LevelObjectId },
}
