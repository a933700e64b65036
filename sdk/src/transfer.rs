use crate::container::ContainerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Moves `quantity` units of the entry at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub index: usize,
    pub quantity: u32,
}

impl TransferRequest {
    pub fn new(index: usize, quantity: u32) -> Self {
        Self { index, quantity }
    }
}

/// Receives one notification per transfer that changed a container.
pub trait ContentsObserver {
    fn contents_changed(&mut self, container: ContainerId);
}

impl ContentsObserver for () {
    fn contents_changed(&mut self, _container: ContainerId) {}
}

impl ContentsObserver for Vec<ContainerId> {
    fn contents_changed(&mut self, container: ContainerId) {
        self.push(container);
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("request index {index} is out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("omni bags hold no items of their own")]
    OmniHoldsNoItems,
}

/// Rejects the whole batch when one request points past the end of the list.
pub(crate) fn check_indices(requests: &[TransferRequest], len: usize) -> Result<(), TransferError> {
    match requests.iter().find(|r| r.index >= len) {
        Some(r) => Err(TransferError::IndexOutOfRange {
            index: r.index,
            len,
        }),
        None => Ok(()),
    }
}
