//! Leaf content units.

use compact_str::CompactString;

use crate::hash::hash_parts;
use crate::tree::Placed;

/// A single visible unit of content on the grid.
///
/// `hash` is a content-equivalence class derived from `text` and `kind`,
/// NOT a unique identifier: two tokens spelling the same text with the
/// same kind share a hash by design. `text` and `kind` are opaque
/// payloads assigned by the typing layer; the core never interprets
/// them beyond the structure-pass delimiter scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub hash: u32,
    pub text: CompactString,
    pub kind: CompactString,
}

impl Token {
    /// Create a token at a grid position. Width defaults to the text's
    /// character count, height to one row.
    pub fn new(text: impl AsRef<str>, kind: impl AsRef<str>, x: i32, y: i32) -> Self {
        let text = text.as_ref();
        let kind = kind.as_ref();
        Self {
            x,
            y,
            width: text.chars().count() as u32,
            height: 1,
            hash: hash_parts([text, kind]),
            text: CompactString::from(text),
            kind: CompactString::from(kind),
        }
    }

    /// Override the extent assigned by the typing layer.
    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Same content class and same placement.
    #[inline]
    pub fn same_placement(&self, other: &Token) -> bool {
        self.hash == other.hash && self.x == other.x && self.y == other.y
    }
}

impl Placed for Token {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_from_text_and_kind() {
        let a = Token::new("x", "ident", 0, 0);
        let b = Token::new("x", "ident", 9, 3);
        let c = Token::new("x", "keyword", 0, 0);
        // position never enters the hash
        assert_eq!(a.hash, b.hash);
        assert_ne!(a.hash, c.hash);
    }

    #[test]
    fn test_default_extent() {
        let t = Token::new("abc", "ident", 0, 0);
        assert_eq!((t.width, t.height), (3, 1));
        let t = t.sized(5, 2);
        assert_eq!((t.width, t.height), (5, 2));
    }

    #[test]
    fn test_same_placement() {
        let a = Token::new("x", "ident", 1, 1);
        let b = Token::new("x", "ident", 1, 1);
        let c = Token::new("x", "ident", 2, 1);
        assert!(a.same_placement(&b));
        assert!(!a.same_placement(&c));
    }
}
