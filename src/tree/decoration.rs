//! Annotations: childless leaves with their own rectangular extent.

use compact_str::CompactString;

use crate::hash::hash_parts;
use crate::tree::Placed;

/// An annotation overlaying a rectangular region (highlight metadata,
/// focus markers and the like). The payload is opaque to the core; the
/// hash derives from the payload only, so a decoration keeps its
/// identity class when it moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub hash: u32,
    pub data: CompactString,
}

impl Decoration {
    /// Create a decoration covering `width x height` cells at `(x, y)`.
    pub fn new(data: impl AsRef<str>, x: i32, y: i32, width: u32, height: u32) -> Self {
        let data = data.as_ref();
        Self {
            x,
            y,
            width,
            height,
            hash: hash_parts([data]),
            data: CompactString::from(data),
        }
    }

    /// Same payload class, same placement and extent.
    #[inline]
    pub fn same_placement(&self, other: &Decoration) -> bool {
        self.hash == other.hash
            && self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
    }
}

impl Placed for Decoration {
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
