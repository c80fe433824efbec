use alloc::vec::Vec;

use crate::error::InternalError;

/// The kind of an open container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// `[ ... ]`
    Array,
    /// `{ ... }`
    Object,
}

impl CollectionKind {
    pub(crate) fn from_close(b: u8) -> Option<Self> {
        match b {
            b']' => Some(Self::Array),
            b'}' => Some(Self::Object),
            _ => None,
        }
    }
}

/// Pushing past the configured maximum depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DepthExceeded;

/// Bounded record of currently open containers, standing in for call-stack
/// recursion.
#[derive(Debug)]
pub(crate) struct DepthStack {
    kinds: Vec<CollectionKind>,
    max_depth: usize,
}

impl DepthStack {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            kinds: Vec::with_capacity(max_depth.min(16)),
            max_depth,
        }
    }

    pub(crate) fn push(&mut self, kind: CollectionKind) -> Result<(), DepthExceeded> {
        if self.kinds.len() >= self.max_depth {
            return Err(DepthExceeded);
        }
        self.kinds.push(kind);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Result<CollectionKind, InternalError> {
        self.kinds.pop().ok_or(InternalError::DepthUnderflow)
    }

    #[inline]
    pub(crate) fn current(&self) -> Option<CollectionKind> {
        self.kinds.last().copied()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
