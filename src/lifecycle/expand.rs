//! Lifecycle expansion: inserting the invisible bridging states.
//!
//! A raw timeline jumps straight from present to absent. Animation
//! needs one invisible frame on each side of an appearance or
//! disappearance so renderers can fade and slide entities instead of
//! popping them. Three rewrite rules run per timeline, in order:
//!
//! 1. every literal delete grows a `BecomeDel` at its own frame and
//!    shifts the delete one frame later (or fuses with an add already
//!    sitting there),
//! 2. every add grows a `BecomeAdd` one frame earlier (or fuses into
//!    the bridging op already there),
//! 3. an entity alive at the container's last frame but absent at its
//!    first gets a bridge at the first frame, so looping playback
//!    carries it across the wrap seam.
//!
//! All insertions clamp to the enclosing container's active frame
//! range, and none of them touch a frame that already holds a visible
//! op, so the visible projection of every timeline is unchanged.

use crate::lifecycle::{BlockLifecycle, ExtOp, Timeline};

/// Expand a whole lifecycle in place, bottom-up through nested
/// containers. The root container bounds itself.
pub fn expand(lc: &mut BlockLifecycle) {
    let (min, max) = (lc.min_frame(), lc.max_frame());
    expand_block(lc, min, max);
}

fn expand_block(lc: &mut BlockLifecycle, enclosing_min: usize, enclosing_max: usize) {
    let (min, max) = (lc.min_frame(), lc.max_frame());

    for child in &mut lc.children {
        expand_block(child, min, max);
    }
    for tl in &mut lc.tokens {
        expand_timeline(tl, min, max);
    }
    for tl in &mut lc.decorations {
        expand_timeline(tl, min, max);
    }
    expand_timeline(&mut lc.self_ops, enclosing_min, enclosing_max);
}

/// Apply the three rewrite rules to one timeline, bounded by the
/// enclosing container's `[min, max]` active range.
pub fn expand_timeline<T: Clone>(tl: &mut Timeline<T>, min: usize, max: usize) {
    bridge_deletes(tl, max);
    bridge_adds(tl, min);
    bridge_wraparound(tl, min, max);
}

/// Rule 1: a delete at `f` becomes `BecomeDel` there, with the literal
/// delete pushed to `f + 1` when that frame is free and in range. When
/// `f + 1` already holds an add (the position was recycled), the
/// bridge targets the incoming item and no literal delete survives.
fn bridge_deletes<T: Clone>(tl: &mut Timeline<T>, max: usize) {
    let del_frames: Vec<usize> = tl
        .ops
        .iter()
        .filter(|(_, op)| op.is_del())
        .map(|(f, _)| *f)
        .collect();

    for f in del_frames {
        if f + 1 > max {
            // dies on the container's last frame, nowhere to shift
            continue;
        }
        let item = match tl.get(f) {
            Some(ExtOp::Del(item)) => item.clone(),
            _ => continue,
        };
        match tl.get(f + 1) {
            None => {
                tl.insert(
                    f,
                    ExtOp::BecomeDel {
                        from: item.clone(),
                        item: item.clone(),
                    },
                );
                tl.insert(f + 1, ExtOp::Del(item));
            }
            Some(ExtOp::Add(next)) => {
                let next = next.clone();
                tl.insert(
                    f,
                    ExtOp::BecomeDel {
                        from: item,
                        item: next,
                    },
                );
            }
            _ => {}
        }
    }
}

/// Rule 2: an add at `f` grows a `BecomeAdd` at `f - 1` when that
/// frame is free and inside the container. A bridging op already
/// sitting at `f - 1` is retargeted at the incoming item instead.
fn bridge_adds<T: Clone>(tl: &mut Timeline<T>, min: usize) {
    let add_frames: Vec<usize> = tl
        .ops
        .iter()
        .filter(|(_, op)| op.is_add())
        .map(|(f, _)| *f)
        .collect();

    for f in add_frames {
        if f <= min {
            // appears together with its container, no lead-in frame
            continue;
        }
        let item = match tl.get(f) {
            Some(ExtOp::Add(item)) => item.clone(),
            _ => continue,
        };
        match tl.get(f - 1) {
            None => {
                tl.insert(f - 1, ExtOp::BecomeAdd(item));
            }
            Some(ExtOp::BecomeDel { from, .. }) => {
                let from = from.clone();
                tl.insert(f - 1, ExtOp::BecomeDel { from, item });
            }
            Some(ExtOp::Del(prev)) => {
                let from = prev.clone();
                tl.insert(f - 1, ExtOp::BecomeDel { from, item });
            }
            _ => {}
        }
    }
}

/// Rule 3: an entity still present at the container's last frame but
/// absent at its first gets a `BecomeDel` bridge at the first frame,
/// plus a literal delete right after if that frame is free too. Looping
/// playback then sees the entity fade out where it will later appear.
fn bridge_wraparound<T: Clone>(tl: &mut Timeline<T>, min: usize, max: usize) {
    let last = match tl.ops.range(..=max).next_back() {
        Some((_, op)) if !op.is_del() => op.item().clone(),
        _ => return,
    };
    if tl.get(min).is_some() {
        return;
    }
    tl.insert(
        min,
        ExtOp::BecomeDel {
            from: last.clone(),
            item: last.clone(),
        },
    );
    if min + 1 <= max && tl.get(min + 1).is_none() {
        tl.insert(min + 1, ExtOp::Del(last));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tl(ops: &[(usize, ExtOp<u32>)]) -> Timeline<u32> {
        let mut t = Timeline::new();
        for (f, op) in ops {
            t.insert(*f, op.clone());
        }
        t
    }

    fn visible_snapshot(t: &Timeline<u32>) -> Vec<(usize, u32)> {
        t.visible_ops().map(|(f, op)| (f, *op.item())).collect()
    }

    #[test]
    fn test_delete_grows_bridge_and_shifts() {
        let mut t = tl(&[(0, ExtOp::Add(7)), (2, ExtOp::Del(7))]);
        expand_timeline(&mut t, 0, 4);

        assert!(matches!(t.get(2), Some(ExtOp::BecomeDel { from: 7, item: 7 })));
        assert!(matches!(t.get(3), Some(ExtOp::Del(7))));
    }

    #[test]
    fn test_delete_on_last_frame_stays() {
        let mut t = tl(&[(0, ExtOp::Add(7)), (4, ExtOp::Del(7))]);
        expand_timeline(&mut t, 0, 4);
        assert!(matches!(t.get(4), Some(ExtOp::Del(7))));
    }

    #[test]
    fn test_delete_fuses_with_following_add() {
        // position recycled the very next frame: one bridge morphing
        // the old item into the new, no literal delete left
        let mut t = tl(&[(0, ExtOp::Add(7)), (2, ExtOp::Del(7)), (3, ExtOp::Add(9))]);
        expand_timeline(&mut t, 0, 4);

        assert!(matches!(t.get(2), Some(ExtOp::BecomeDel { from: 7, item: 9 })));
        assert!(matches!(t.get(3), Some(ExtOp::Add(9))));
        assert!(!t.has_del());
    }

    #[test]
    fn test_add_grows_lead_in() {
        let mut t = tl(&[(2, ExtOp::Add(7))]);
        expand_timeline(&mut t, 0, 4);
        assert!(matches!(t.get(1), Some(ExtOp::BecomeAdd(7))));
    }

    #[test]
    fn test_add_at_container_start_has_no_lead_in() {
        let mut t = tl(&[(0, ExtOp::Add(7))]);
        expand_timeline(&mut t, 0, 4);
        assert_eq!(t.get(0), Some(&ExtOp::Add(7)));
        // rule 3 inserts nothing either: frame 0 is occupied
        assert_eq!(t.ops.len(), 1);
    }

    #[test]
    fn test_adjacent_del_add_fuse_into_one_bridge() {
        // delete at 1, add at 2: rule 1 shifts the delete onto the
        // add's previous frame, rule 2 then retargets the bridge
        let mut t = tl(&[(0, ExtOp::Add(7)), (1, ExtOp::Del(7)), (2, ExtOp::Add(9))]);
        expand_timeline(&mut t, 0, 4);

        assert!(matches!(t.get(1), Some(ExtOp::BecomeDel { from: 7, item: 9 })));
        assert!(matches!(t.get(2), Some(ExtOp::Add(9))));
    }

    #[test]
    fn test_wraparound_bridge() {
        // appears at frame 2 and survives to the end: looping playback
        // needs it fading out at the start
        let mut t = tl(&[(2, ExtOp::Add(7))]);
        expand_timeline(&mut t, 0, 4);

        assert!(matches!(t.get(0), Some(ExtOp::BecomeDel { from: 7, item: 7 })));
        assert!(matches!(t.get(1), Some(ExtOp::BecomeAdd(7))));
        assert!(matches!(t.get(2), Some(ExtOp::Add(7))));
    }

    #[test]
    fn test_wraparound_inserts_literal_delete_when_gap_is_wide() {
        let mut t = tl(&[(3, ExtOp::Add(7))]);
        expand_timeline(&mut t, 0, 5);

        assert!(matches!(t.get(0), Some(ExtOp::BecomeDel { .. })));
        assert!(matches!(t.get(1), Some(ExtOp::Del(7))));
        assert!(matches!(t.get(2), Some(ExtOp::BecomeAdd(7))));
    }

    #[test]
    fn test_visible_projection_is_preserved() {
        let mut t = tl(&[
            (1, ExtOp::Add(7)),
            (2, ExtOp::Mov { item: 7, from: 7 }),
            (3, ExtOp::Del(7)),
        ]);
        let before = visible_snapshot(&t);
        expand_timeline(&mut t, 0, 5);
        assert_eq!(visible_snapshot(&t), before);
    }

    #[test]
    fn test_nested_container_self_timeline_uses_parent_bounds() {
        use crate::diff::{DiffOp, DiffTree};
        use crate::lifecycle::BlockLifecycle;
        use crate::tree::Block;

        let child_block = Block::new("inner").at(0, 1).sized(4, 1);
        let child = BlockLifecycle {
            self_ops: Timeline::starting(2, ExtOp::Add(child_block.clone())),
            tokens: vec![],
            decorations: vec![],
            children: vec![],
        };
        let root_tree = DiffTree {
            root: DiffOp::Nop(Block::new("outer").sized(10, 4)),
            content: vec![],
            decorations: vec![],
        };
        let mut root = BlockLifecycle {
            self_ops: {
                let mut t = Timeline::new();
                for f in 0..4 {
                    t.insert(f, root_tree.root.clone().into());
                }
                t
            },
            tokens: vec![],
            decorations: vec![],
            children: vec![child],
        };

        expand(&mut root);
        // the child appears mid-run, so it gets a lead-in frame inside
        // the parent's range
        assert!(matches!(
            root.children[0].self_ops.get(1),
            Some(ExtOp::BecomeAdd(_))
        ));
    }
}
