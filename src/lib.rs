//! kinetext - Animatable Timelines for Tokenized Text
//!
//! Turns a sequence of tokenized text frames into an animation plan:
//! which token moves where, which fades in or out, and which render
//! identity plays each part.
//!
//! ## Pipeline
//!
//! 1. **Diff**: consecutive frames diff hierarchically; self-contained
//!    substructures (bracket spans, strings, operator triples) and
//!    whole lines match translation-invariantly, so indenting a block
//!    reads as movement rather than churn.
//! 2. **Optimize**: leftover add/delete pairs of equal content fold
//!    into moves via a spatial matcher.
//! 3. **Lifecycle**: per-frame diffs thread into per-entity timelines
//!    keyed by grid position.
//! 4. **Expand**: timelines grow invisible bridging states around every
//!    appearance and disappearance, including across the loop seam.
//! 5. **Render**: timelines bind to pooled render identities and emit
//!    serializable per-frame snapshots.
//!
//! ## Usage
//!
//! ```
//! use kinetext::prelude::*;
//!
//! let before = Block::new("example")
//!     .sized(20, 2)
//!     .token(Token::new("let", "keyword", 0, 0))
//!     .token(Token::new("x", "ident", 4, 0));
//! let after = Block::new("example")
//!     .sized(20, 2)
//!     .token(Token::new("let", "keyword", 0, 1))
//!     .token(Token::new("x", "ident", 4, 1));
//!
//! let anim = animate(&[before, after]).unwrap();
//! assert_eq!(anim.frames.len(), 2);
//! ```

// =============================================================================
// Modules
// =============================================================================

/// Content hashing and unique-id minting
pub mod hash;

/// Frame trees: Block, Token, Decoration
pub mod tree;

/// Algorithms: Myers LCS, spatial matcher
pub mod algo;

/// Frame diffing and move folding
pub mod diff;

/// Timeline threading and expansion
pub mod lifecycle;

/// Render identities and snapshot output
pub mod render;

/// End-to-end orchestration
pub mod pipeline;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Frame trees
pub use tree::{Block, Children, Decoration, Node, Placed, Token};

// Diffing
pub use diff::{ContentEntry, DiffOp, DiffTree, diff, optimize};

// Lifecycle
pub use lifecycle::{BlockLifecycle, ExtOp, Timeline};

// Render output
pub use render::{Animation, FrameSnapshot, Placement, Template};

// Pipeline
pub use pipeline::{PipelineStats, animate, animate_with_stats};

// Hashing
pub use hash::{ContentHasher, IdGen, hash_parts};

// Error types
pub use error::{MotionError, MotionResult};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tokens: &[(&str, i32, i32)]) -> Block {
        let mut b = Block::new("root").sized(40, 10);
        for &(text, x, y) in tokens {
            b = b.token(Token::new(text, "t", x, y));
        }
        b
    }

    #[test]
    fn test_expansion_only_adds_invisible_states() {
        // the expanded run renders the same visible placements per
        // frame as the raw timelines would
        let frames = [
            frame(&[("a", 0, 0)]),
            frame(&[("a", 0, 0), ("b", 2, 0)]),
            frame(&[("b", 2, 0)]),
        ];
        let anim = animate(&frames).unwrap();

        let visible_at = |f: usize| -> usize {
            anim.frames[f].items.values().filter(|p| p.visible).count()
        };
        assert_eq!(visible_at(0), 1);
        assert_eq!(visible_at(1), 2);
        assert_eq!(visible_at(2), 1);
    }

    #[test]
    fn test_wraparound_entity_fades_at_the_seam() {
        // "late" appears at frame 2 and survives to the end: frame 1
        // holds its invisible lead-in, and frame 0 the wrap bridge so
        // looping playback sees it fade out where it will appear
        let frames = [
            frame(&[("a", 0, 0)]),
            frame(&[("a", 0, 0)]),
            frame(&[("a", 0, 0), ("late", 5, 0)]),
        ];
        let anim = animate(&frames).unwrap();

        for f in 0..2 {
            let invisible: Vec<_> = anim.frames[f]
                .items
                .values()
                .filter(|p| !p.visible)
                .collect();
            assert_eq!(invisible.len(), 1, "frame {f}");
            assert_eq!((invisible[0].x, invisible[0].y), (5, 0));
        }
        assert!(anim.frames[2].items.values().all(|p| p.visible));
    }

    #[test]
    fn test_render_ids_never_alias_within_a_frame() {
        // two same-content tokens alive simultaneously must hold
        // distinct ids in every frame
        let frames = [
            frame(&[("x", 0, 0), ("x", 5, 0)]),
            frame(&[("x", 0, 1), ("x", 5, 1)]),
        ];
        let anim = animate(&frames).unwrap();
        for snap in &anim.frames {
            assert_eq!(snap.items.len(), 2);
        }
    }

    #[test]
    fn test_animation_json_round_trip() {
        let frames = [
            frame(&[("fn", 0, 0), ("main", 3, 0)]),
            frame(&[("fn", 0, 1), ("main", 3, 1)]),
        ];
        let anim = animate(&frames).unwrap();

        let json = serde_json::to_string(&anim).unwrap();
        let back: Animation = serde_json::from_str(&json).unwrap();
        assert_eq!(anim, back);
    }

    #[test]
    fn test_nested_blocks_animate_independently() {
        let inner = |x: i32| {
            Block::new("scope")
                .at(x, 1)
                .sized(6, 1)
                .token(Token::new("y", "ident", x + 1, 1))
        };
        let frames = [
            Block::new("root").sized(20, 4).block(inner(0)),
            Block::new("root").sized(20, 4).block(inner(8)),
        ];
        let anim = animate(&frames).unwrap();

        assert_eq!(anim.frames[0].children.len(), 1);
        let child0 = anim.frames[0].children.values().next().unwrap();
        let child1 = anim.frames[1].children.values().next().unwrap();
        assert_eq!(child0.rect.x, 0);
        assert_eq!(child1.rect.x, 8);
        assert_eq!(child1.items.len(), 1);
    }
}
