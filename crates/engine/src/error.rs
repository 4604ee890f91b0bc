use navmenu_types::TargetId;
use thiserror::Error;

/// Rejected focus operations. A rejected operation never changes state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FocusRingError {
    #[error("index {index} is out of range for a ring of {len} targets")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no target with id '{0}' is registered")]
    UnknownTarget(TargetId),
}
