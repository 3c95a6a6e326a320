//! Deterministic content hashing for token trees.
//!
//! Hashes are content-equivalence fingerprints, not unique identifiers:
//! collisions across distinct entities are expected and meaningful (two
//! tokens with the same text and kind share a hash on purpose). The
//! matcher and the render pool both rely on that.
//!
//! The algorithm is 32-bit FNV-1a over the UTF-8 bytes of the input
//! parts, joined by a reserved separator codepoint that does not occur
//! in source text.

use compact_str::{CompactString, format_compact};
use rustc_hash::FxHashMap;

/// Reserved part separator. Chosen to never collide with source text.
const SEPARATOR: char = '\u{03FE}';

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

// =============================================================================
// ContentHasher - Builder Pattern
// =============================================================================

/// A deterministic 32-bit FNV-1a hasher over separator-joined parts.
///
/// Unlike `std::hash::Hasher`, this produces the same output across
/// process restarts for the same input.
///
/// # Example
///
/// ```
/// use kinetext::hash::ContentHasher;
///
/// let h = ContentHasher::new().part_str("a").finish();
/// assert_eq!(h, 3826002220);
/// ```
#[derive(Debug, Clone)]
pub struct ContentHasher {
    state: u32,
    started: bool,
}

impl ContentHasher {
    /// Create a new ContentHasher.
    #[inline]
    pub fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
            started: false,
        }
    }

    /// Feed a string part.
    #[inline]
    pub fn part_str(mut self, s: &str) -> Self {
        self.separate();
        self.absorb(s.as_bytes());
        self
    }

    /// Feed a numeric part. Numbers hash as their decimal text so that
    /// `part_num(1)` and `part_str("1")` agree.
    #[inline]
    pub fn part_num(mut self, v: i64) -> Self {
        self.separate();
        let mut buf = [0u8; 20];
        let digits = write_decimal(&mut buf, v);
        self.absorb(digits);
        self
    }

    /// Finish and return the 32-bit hash.
    #[inline]
    pub fn finish(self) -> u32 {
        self.state
    }

    fn separate(&mut self) {
        if self.started {
            let mut buf = [0u8; 4];
            let len = SEPARATOR.encode_utf8(&mut buf).len();
            self.absorb(&buf[..len]);
        }
        self.started = true;
    }

    fn absorb(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= u32::from(b);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a signed integer into `buf` without allocating.
fn write_decimal(buf: &mut [u8; 20], v: i64) -> &[u8] {
    let mut n = v.unsigned_abs();
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    if v < 0 {
        i -= 1;
        buf[i] = b'-';
    }
    &buf[i..]
}

// =============================================================================
// Free functions
// =============================================================================

/// Hash a sequence of string parts.
pub fn hash_parts<'a, I>(parts: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    let mut h = ContentHasher::new();
    for p in parts {
        h = h.part_str(p);
    }
    h.finish()
}

/// Hash a sequence by chaining each item's own hash.
pub fn hash_chain<I>(hashes: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let mut h = ContentHasher::new();
    for item in hashes {
        h = h.part_num(i64::from(item));
    }
    h.finish()
}

/// Hash a positioned sequence translation-invariantly.
///
/// Each item contributes `(hash, dx, dy)` relative to the previous item;
/// the first item's delta is `(0, 0)`. Two sequences with identical shape
/// therefore hash identically regardless of absolute position.
pub fn offset_hash_chain<I>(items: I) -> u32
where
    I: IntoIterator<Item = (u32, i32, i32)>,
{
    let mut h = ContentHasher::new();
    let mut prev: Option<(i32, i32)> = None;
    for (hash, x, y) in items {
        let (dx, dy) = match prev {
            Some((px, py)) => (x - px, y - py),
            None => (0, 0),
        };
        h = h
            .part_num(i64::from(hash))
            .part_num(i64::from(dx))
            .part_num(i64::from(dy));
        prev = Some((x, y));
    }
    h.finish()
}

// =============================================================================
// IdGen - collision-aware unique ids
// =============================================================================

/// Realm-scoped unique-id generator.
///
/// Maps `(realm, hash)` to `hash` on first occurrence and `hash-n` on
/// the nth repeat, so no two calls with the same realm and hash ever
/// produce the same id.
///
/// Counter state lives in the generator value itself, never in a
/// module-level singleton, so independent pipeline runs cannot
/// interfere with each other.
#[derive(Debug, Default)]
pub struct IdGen {
    seen: FxHashMap<(CompactString, u32), u32>,
}

impl IdGen {
    /// Create an empty generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next unique id for `hash` within `realm`.
    pub fn mint(&mut self, realm: &str, hash: u32) -> CompactString {
        let count = self
            .seen
            .entry((CompactString::from(realm), hash))
            .or_insert(0);
        let id = if *count == 0 {
            format_compact!("{hash}")
        } else {
            format_compact!("{hash}-{count}")
        };
        *count += 1;
        id
    }
}

// =============================================================================
// Tests
// =============================================================================
