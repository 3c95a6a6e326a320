//! Diff operations and the per-container diff tree.
//!
//! `DiffOp` is a closed sum matched exhaustively everywhere, so every
//! consumer handles every state. The payload is always the post-state
//! object except for `Del`, where it is the pre-state object.

pub mod frame;
pub mod optimize;

pub use frame::diff;
pub use optimize::optimize;

use crate::tree::{Block, Decoration, Token};

// =============================================================================
// DiffOp
// =============================================================================

/// One operation on one item between two consecutive frames.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOp<T> {
    /// Item appears in the post frame only
    Add(T),
    /// Item appears in the pre frame only (payload is the pre-state)
    Del(T),
    /// Item survives but its placement changed
    Mov { item: T, from: T },
    /// Item survives unchanged
    Nop(T),
}

impl<T> DiffOp<T> {
    /// The op's primary payload: post-state for Add/Mov/Nop, pre-state
    /// for Del.
    #[inline]
    pub fn item(&self) -> &T {
        match self {
            Self::Add(item) | Self::Del(item) | Self::Nop(item) => item,
            Self::Mov { item, .. } => item,
        }
    }

    #[inline]
    pub fn is_add(&self) -> bool {
        matches!(self, Self::Add(_))
    }

    #[inline]
    pub fn is_del(&self) -> bool {
        matches!(self, Self::Del(_))
    }

    #[inline]
    pub fn is_mov(&self) -> bool {
        matches!(self, Self::Mov { .. })
    }

    #[inline]
    pub fn is_nop(&self) -> bool {
        matches!(self, Self::Nop(_))
    }
}

// =============================================================================
// DiffTree
// =============================================================================

/// Entry in a diff tree's content list: a token op or a nested tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentEntry {
    Token(DiffOp<Token>),
    Block(DiffTree),
}

/// The diff of one container level between two frames.
///
/// Content and decoration lists carry only Add/Del/Mov: unchanged items
/// emit nothing, so diffing a container against an identical copy
/// yields a root Nop with empty lists.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffTree {
    /// The container's own operation
    pub root: DiffOp<Block>,
    /// Token ops and nested container trees
    pub content: Vec<ContentEntry>,
    /// Decoration ops
    pub decorations: Vec<DiffOp<Decoration>>,
}

impl DiffTree {
    /// Direct token operations at this level.
    pub fn token_ops(&self) -> impl Iterator<Item = &DiffOp<Token>> {
        self.content.iter().filter_map(|e| match e {
            ContentEntry::Token(op) => Some(op),
            ContentEntry::Block(_) => None,
        })
    }

    /// Nested container trees at this level.
    pub fn nested(&self) -> impl Iterator<Item = &DiffTree> {
        self.content.iter().filter_map(|e| match e {
            ContentEntry::Block(t) => Some(t),
            ContentEntry::Token(_) => None,
        })
    }

    /// True when nothing changed anywhere at this level or below.
    pub fn is_identity(&self) -> bool {
        self.root.is_nop()
            && self.decorations.is_empty()
            && self.content.iter().all(|e| match e {
                ContentEntry::Token(_) => false,
                ContentEntry::Block(t) => t.is_identity(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_item() {
        let add = DiffOp::Add(1);
        let del = DiffOp::Del(2);
        let mov = DiffOp::Mov { item: 3, from: 4 };
        assert_eq!(*add.item(), 1);
        assert_eq!(*del.item(), 2);
        assert_eq!(*mov.item(), 3);
        assert!(add.is_add() && del.is_del() && mov.is_mov());
    }
}
