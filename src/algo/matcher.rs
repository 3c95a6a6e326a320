//! Positional matching of same-hash candidates.
//!
//! Given a target item and a pool of candidates sharing its hash, pick
//! the single best positional counterpart. Hash equality alone never
//! decides correspondence: a `{` deleted on line 2 should pair with
//! the `{` added on line 2 after a reflow, not with an arbitrary one.
//!
//! All offsets are measured from the four edges of the bounding box
//! spanning target and pool together, so they stay comparable between
//! the two frames. The rules form a tagged cascade; the first rule that
//! yields a unique result wins. Returning `None` is a normal outcome
//! ("leave as separate add + delete"), not a fault.

use smallvec::SmallVec;

use crate::tree::Placed;

/// Edge offsets of one item inside the shared bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeOffsets {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

/// Pick the best positional counterpart for `target` out of `pool`.
///
/// Returns an index into `pool`, or `None` when no rule singled out a
/// candidate. A pool of size one short-circuits to that candidate.
pub fn pick_alternative<T: Placed>(target: &T, pool: &[T]) -> Option<usize> {
    match pool.len() {
        0 => return None,
        1 => return Some(0),
        _ => {}
    }

    let (t, offsets) = edge_offsets(target, pool);

    let same_row: SmallVec<[usize; 8]> = offsets
        .iter()
        .enumerate()
        .filter(|(_, o)| o.top == t.top)
        .map(|(i, _)| i)
        .collect();

    // 1. A single candidate on the target's row decides immediately.
    if same_row.len() == 1 {
        return Some(same_row[0]);
    }

    // 2. Among same-row candidates, a unique equal right offset keeps
    //    trailing punctuation (closing brackets) aligned.
    if let Some(i) = unique(same_row.iter().copied(), |i| offsets[i].right == t.right) {
        return Some(i);
    }

    // 3. Among all candidates, a unique equal right+bottom offset keeps
    //    list-terminators aligned across a reflow.
    if let Some(i) = unique(0..pool.len(), |i| {
        offsets[i].right == t.right && offsets[i].bottom == t.bottom
    }) {
        return Some(i);
    }

    // 4. Among same-row candidates, minimal horizontal drift.
    if !same_row.is_empty() {
        return same_row
            .iter()
            .copied()
            .min_by_key(|&i| (offsets[i].left - t.left).abs());
    }

    // 5. Minimal Manhattan distance in (left, top) over all candidates.
    (0..pool.len()).min_by_key(|&i| {
        (offsets[i].left - t.left).abs() + (offsets[i].top - t.top).abs()
    })
}

/// First index satisfying `pred` if it is the only one.
fn unique<I, F>(candidates: I, pred: F) -> Option<usize>
where
    I: Iterator<Item = usize>,
    F: Fn(usize) -> bool,
{
    let mut found = None;
    for i in candidates {
        if pred(i) {
            if found.is_some() {
                return None;
            }
            found = Some(i);
        }
    }
    found
}

/// Offsets of the target and of every pool item from the edges of the
/// bounding box spanning all of them.
fn edge_offsets<T: Placed>(target: &T, pool: &[T]) -> (EdgeOffsets, SmallVec<[EdgeOffsets; 8]>) {
    let mut min_x = target.x();
    let mut min_y = target.y();
    let mut max_right = target.right();
    let mut max_bottom = target.bottom();

    for item in pool {
        min_x = min_x.min(item.x());
        min_y = min_y.min(item.y());
        max_right = max_right.max(item.right());
        max_bottom = max_bottom.max(item.bottom());
    }

    let of = |item: &T| EdgeOffsets {
        left: item.x() - min_x,
        top: item.y() - min_y,
        right: max_right - item.right(),
        bottom: max_bottom - item.bottom(),
    };

    (of(target), pool.iter().map(of).collect())
}

// =============================================================================
// Tests
// =============================================================================
