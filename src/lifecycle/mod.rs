//! Per-entity timelines spanning the whole frame sequence.
//!
//! A `Timeline` is the ordered record of one persistent entity's
//! operations across all frames of a run; a `BlockLifecycle` mirrors
//! the container nesting, holding the container's own timeline plus
//! one timeline per surviving position-lineage of its content.

pub mod builder;
pub mod expand;

pub use builder::build;
pub use expand::expand;

use std::collections::BTreeMap;

use crate::diff::DiffOp;
use crate::tree::{Block, Decoration, Token};

// =============================================================================
// ExtOp
// =============================================================================

/// A diff operation extended with the two synthetic invisible states
/// the expander inserts: `BecomeAdd` ("about to appear", placed one
/// frame before a real add at the add's position) and `BecomeDel`
/// ("fading out", bridging a delete's last position toward either
/// itself or a near-simultaneous add's position).
#[derive(Debug, Clone, PartialEq)]
pub enum ExtOp<T> {
    Add(T),
    Del(T),
    Mov { item: T, from: T },
    Nop(T),
    BecomeAdd(T),
    BecomeDel { from: T, item: T },
}

impl<T> ExtOp<T> {
    /// The op's primary payload.
    #[inline]
    pub fn item(&self) -> &T {
        match self {
            Self::Add(item) | Self::Del(item) | Self::Nop(item) | Self::BecomeAdd(item) => item,
            Self::Mov { item, .. } | Self::BecomeDel { item, .. } => item,
        }
    }

    /// Whether the entity is visibly present in this state.
    #[inline]
    pub fn visible(&self) -> bool {
        matches!(self, Self::Add(_) | Self::Mov { .. } | Self::Nop(_))
    }

    #[inline]
    pub fn is_del(&self) -> bool {
        matches!(self, Self::Del(_))
    }

    #[inline]
    pub fn is_add(&self) -> bool {
        matches!(self, Self::Add(_))
    }
}

impl<T> From<DiffOp<T>> for ExtOp<T> {
    fn from(op: DiffOp<T>) -> Self {
        match op {
            DiffOp::Add(item) => Self::Add(item),
            DiffOp::Del(item) => Self::Del(item),
            DiffOp::Mov { item, from } => Self::Mov { item, from },
            DiffOp::Nop(item) => Self::Nop(item),
        }
    }
}

// =============================================================================
// Timeline
// =============================================================================

/// Sparse ordered map from frame index to the entity's operation at
/// that frame. Frames without an op are steady state: the entity keeps
/// its last placement and visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<T> {
    pub ops: BTreeMap<usize, ExtOp<T>>,
}

impl<T> Timeline<T> {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self {
            ops: BTreeMap::new(),
        }
    }

    /// Open a timeline with its first operation.
    pub fn starting(frame: usize, op: ExtOp<T>) -> Self {
        let mut ops = BTreeMap::new();
        ops.insert(frame, op);
        Self { ops }
    }

    /// First frame carrying an op.
    pub fn first_frame(&self) -> Option<usize> {
        self.ops.keys().next().copied()
    }

    /// Last frame carrying an op.
    pub fn last_frame(&self) -> Option<usize> {
        self.ops.keys().next_back().copied()
    }

    #[inline]
    pub fn get(&self, frame: usize) -> Option<&ExtOp<T>> {
        self.ops.get(&frame)
    }

    #[inline]
    pub fn insert(&mut self, frame: usize, op: ExtOp<T>) {
        self.ops.insert(frame, op);
    }

    /// Whether any frame holds a literal delete.
    pub fn has_del(&self) -> bool {
        self.ops.values().any(ExtOp::is_del)
    }

    /// The visible placements in frame order, for conservation checks.
    pub fn visible_ops(&self) -> impl Iterator<Item = (usize, &ExtOp<T>)> {
        self.ops
            .iter()
            .filter(|(_, op)| op.visible())
            .map(|(f, op)| (*f, op))
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// BlockLifecycle
// =============================================================================

/// One container's lifecycle: its own per-frame root ops, the
/// timelines of its direct tokens and decorations, and the lifecycles
/// of its nested containers. Frame indices are absolute throughout.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLifecycle {
    /// The container's own root op per frame of its life
    pub self_ops: Timeline<Block>,
    /// One timeline per surviving token position-lineage
    pub tokens: Vec<Timeline<Token>>,
    /// One timeline per surviving decoration lineage
    pub decorations: Vec<Timeline<Decoration>>,
    /// Nested container lifecycles
    pub children: Vec<BlockLifecycle>,
}

impl BlockLifecycle {
    /// The container's first active frame.
    pub fn min_frame(&self) -> usize {
        self.self_ops.first_frame().unwrap_or(0)
    }

    /// The container's last active frame.
    pub fn max_frame(&self) -> usize {
        self.self_ops.last_frame().unwrap_or(0)
    }
}
