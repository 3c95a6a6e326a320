//! Recursive container nodes.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::hash::{IdGen, hash_parts};
use crate::tree::{Children, Decoration, Node, Placed, Token};

/// Realm used when minting run-unique block ids.
const BLOCK_REALM: &str = "block";

/// A recursive grouping node: same positional fields as a token, an
/// ordered child list (tokens and nested blocks), its own decorations,
/// an opaque payload, an optional language tag, and a run-unique `id`
/// (payload hash plus a disambiguating counter).
///
/// # Example
///
/// ```
/// use kinetext::tree::{Block, Token};
///
/// let frame = Block::new("root")
///     .sized(10, 2)
///     .token(Token::new("let", "keyword", 0, 0))
///     .token(Token::new("x", "ident", 4, 0));
/// assert_eq!(frame.tokens().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub hash: u32,
    pub id: CompactString,
    pub payload: CompactString,
    pub lang: Option<CompactString>,
    pub children: Children,
    pub decorations: SmallVec<[Decoration; 4]>,
}

impl Block {
    /// Create an empty block at the origin. The hash derives from the
    /// payload only; `id` starts as the bare hash and is disambiguated
    /// by [`Block::assign_ids`] once the frame is assembled.
    pub fn new(payload: impl AsRef<str>) -> Self {
        let payload = payload.as_ref();
        let hash = hash_parts([payload]);
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            hash,
            id: compact_str::format_compact!("{hash}"),
            payload: CompactString::from(payload),
            lang: None,
            children: Children::new(),
            decorations: SmallVec::new(),
        }
    }

    /// Place the block at a grid position.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the block's extent.
    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Tag the block with a language identifier.
    pub fn lang(mut self, lang: impl AsRef<str>) -> Self {
        self.lang = Some(CompactString::from(lang.as_ref()));
        self
    }

    /// Append a token child.
    pub fn token(mut self, token: Token) -> Self {
        self.children.push(Node::Token(token));
        self
    }

    /// Append a nested block child.
    pub fn block(mut self, block: Block) -> Self {
        self.children.push(Node::Block(Box::new(block)));
        self
    }

    /// Append a decoration.
    pub fn decoration(mut self, deco: Decoration) -> Self {
        self.decorations.push(deco);
        self
    }

    /// Disambiguate ids across the whole tree with a run-scoped
    /// generator, so two same-payload blocks in one frame get distinct
    /// ids (`hash` vs `hash-1`).
    pub fn assign_ids(&mut self, idgen: &mut IdGen) {
        self.id = idgen.mint(BLOCK_REALM, self.hash);
        for child in &mut self.children {
            if let Node::Block(b) = child {
                b.assign_ids(idgen);
            }
        }
    }

    /// Direct token children, in document order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(Node::as_token)
    }

    /// Direct nested-block children, in document order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.children.iter().filter_map(Node::as_block)
    }

    /// Same position and extent as another block.
    #[inline]
    pub fn same_rect(&self, other: &Block) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
    }
}

impl Placed for Block {
    #[inline]
    fn x(&self) -> i32 {
        self.x
    }
    #[inline]
    fn y(&self) -> i32 {
        self.y
    }
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }
    #[inline]
    fn height(&self) -> u32 {
        self.height
    }
}
