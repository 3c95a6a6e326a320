//! The end-to-end pipeline: frames in, animation out.
//!
//! Stage order is fixed: diff every consecutive frame pair (the first
//! frame diffs against nothing), fold add/delete pairs into moves,
//! thread the per-frame diffs into timelines, expand the timelines
//! with bridging states, then project render identities and
//! snapshots. Diffing and folding are per-pair independent and run in
//! parallel under the `parallel` feature; everything downstream is a
//! sequential fold over frames.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::diff::{self, DiffTree};
use crate::error::MotionResult;
use crate::lifecycle;
use crate::render::{self, Animation};
use crate::tree::Block;

/// Per-run counters, mostly useful for logging and tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    /// Input frames
    pub frames: usize,
    /// Add/delete pairs folded into moves
    pub moves_folded: usize,
    /// Token timelines threaded at the root level
    pub token_timelines: usize,
    /// Render ids minted across all classes
    pub render_ids: usize,
}

/// Run the full pipeline over a frame sequence.
///
/// An empty input yields an empty animation. Frame `i` of the output
/// corresponds to `frames[i]`.
///
/// # Example
///
/// ```
/// use kinetext::pipeline::animate;
/// use kinetext::tree::{Block, Token};
///
/// let a = Block::new("root").sized(10, 1).token(Token::new("x", "ident", 0, 0));
/// let b = Block::new("root").sized(10, 1).token(Token::new("x", "ident", 4, 0));
/// let anim = animate(&[a, b]).unwrap();
/// assert_eq!(anim.frames.len(), 2);
/// ```
pub fn animate(frames: &[Block]) -> MotionResult<Animation> {
    animate_with_stats(frames).map(|(anim, _)| anim)
}

/// Like [`animate`], also returning per-run counters.
pub fn animate_with_stats(frames: &[Block]) -> MotionResult<(Animation, PipelineStats)> {
    if frames.is_empty() {
        return Ok((
            Animation {
                templates: Default::default(),
                frames: Vec::new(),
            },
            PipelineStats::default(),
        ));
    }

    let (diffs, moves_folded) = diff_stage(frames)?;
    tracing::debug!(
        frames = frames.len(),
        moves_folded,
        "diffed frame sequence"
    );

    let mut root = lifecycle::build(&diffs)?;
    let token_timelines = root.tokens.len();
    lifecycle::expand(&mut root);
    tracing::debug!(
        token_timelines,
        children = root.children.len(),
        "threaded and expanded lifecycles"
    );

    let anim = render::project(&root);
    let stats = PipelineStats {
        frames: frames.len(),
        moves_folded,
        token_timelines,
        render_ids: anim.templates.len(),
    };
    tracing::debug!(render_ids = stats.render_ids, "projected render identities");

    Ok((anim, stats))
}

fn diff_pair(frames: &[Block], i: usize) -> MotionResult<(DiffTree, usize)> {
    let prev = if i == 0 { None } else { Some(&frames[i - 1]) };
    let mut tree = diff::diff(prev, Some(&frames[i]))?;
    let folded = diff::optimize(&mut tree);
    Ok((tree, folded))
}

#[cfg(feature = "parallel")]
fn diff_stage(frames: &[Block]) -> MotionResult<(Vec<DiffTree>, usize)> {
    let pairs: Vec<(DiffTree, usize)> = (0..frames.len())
        .into_par_iter()
        .map(|i| diff_pair(frames, i))
        .collect::<MotionResult<_>>()?;
    let folded = pairs.iter().map(|(_, f)| *f).sum();
    Ok((pairs.into_iter().map(|(t, _)| t).collect(), folded))
}

#[cfg(not(feature = "parallel"))]
fn diff_stage(frames: &[Block]) -> MotionResult<(Vec<DiffTree>, usize)> {
    let mut diffs = Vec::with_capacity(frames.len());
    let mut folded = 0;
    for i in 0..frames.len() {
        let (tree, f) = diff_pair(frames, i)?;
        diffs.push(tree);
        folded += f;
    }
    Ok((diffs, folded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Token;

    fn frame(tokens: &[(&str, i32, i32)]) -> Block {
        let mut b = Block::new("root").sized(40, 10);
        for &(text, x, y) in tokens {
            b = b.token(Token::new(text, "t", x, y));
        }
        b
    }

    #[test]
    fn test_empty_input() {
        let (anim, stats) = animate_with_stats(&[]).unwrap();
        assert!(anim.frames.is_empty());
        assert_eq!(stats, PipelineStats::default());
    }

    #[test]
    fn test_single_frame() {
        let anim = animate(&[frame(&[("fn", 0, 0), ("main", 3, 0)])]).unwrap();
        assert_eq!(anim.frames.len(), 1);
        assert_eq!(anim.frames[0].items.len(), 2);
        assert!(anim.frames[0].items.values().all(|p| p.visible));
    }

    #[test]
    fn test_move_folds_and_counts() {
        // "x" leaves a row it shared with a stationary anchor, so no
        // line or structure hash survives and the move comes from the
        // optimizer folding the token pass's add/delete pair
        let a = frame(&[("x", 0, 0), ("anchor", 5, 0)]);
        let b = frame(&[("anchor", 5, 0), ("x", 9, 3)]);
        let (_, stats) = animate_with_stats(&[a, b]).unwrap();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.moves_folded, 1);
    }

    #[test]
    fn test_stable_output() {
        let frames = [
            frame(&[("a", 0, 0), ("b", 2, 0)]),
            frame(&[("b", 2, 0), ("c", 4, 1)]),
            frame(&[("c", 0, 0)]),
        ];
        let first = animate(&frames).unwrap();
        let second = animate(&frames).unwrap();
        assert_eq!(first, second);
    }
}
