//! The immutable per-frame token tree model.
//!
//! One `Block` tree is produced per frame by the external typing layer
//! and never mutated afterwards; diffing always consumes two immutable
//! snapshots. Parent back-references are not stored: the core never
//! walks upward, ownership stays acyclic, and the serialization boundary
//! drops them anyway.

mod block;
mod decoration;
mod token;

pub use block::Block;
pub use decoration::Decoration;
pub use token::Token;

use smallvec::SmallVec;

/// Child of a block: either a leaf content unit or a nested block.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Token(Token),
    Block(Box<Block>),
}

impl Node {
    /// Check if this is a token node.
    #[inline]
    pub fn is_token(&self) -> bool {
        matches!(self, Node::Token(_))
    }

    /// Get as token reference.
    #[inline]
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Node::Token(t) => Some(t),
            _ => None,
        }
    }

    /// Get as block reference.
    #[inline]
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(b) => Some(b),
            _ => None,
        }
    }
}

/// Type alias for children collections.
pub type Children = SmallVec<[Node; 8]>;

// =============================================================================
// Placed - grid rectangle access
// =============================================================================

/// Integer grid placement shared by tokens, decorations and blocks.
///
/// The matcher and the lifecycle builder only ever look at placements
/// through this trait, so they stay pure functions over value types.
pub trait Placed {
    fn x(&self) -> i32;
    fn y(&self) -> i32;
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Grid position `(x, y)`, the lifecycle keying unit.
    #[inline]
    fn pos(&self) -> (i32, i32) {
        (self.x(), self.y())
    }

    /// Right edge `x + width`.
    #[inline]
    fn right(&self) -> i32 {
        self.x() + self.width() as i32
    }

    /// Bottom edge `y + height`.
    #[inline]
    fn bottom(&self) -> i32 {
        self.y() + self.height() as i32
    }
}

impl<T: Placed> Placed for &T {
    #[inline]
    fn x(&self) -> i32 {
        (**self).x()
    }
    #[inline]
    fn y(&self) -> i32 {
        (**self).y()
    }
    #[inline]
    fn width(&self) -> u32 {
        (**self).width()
    }
    #[inline]
    fn height(&self) -> u32 {
        (**self).height()
    }
}
