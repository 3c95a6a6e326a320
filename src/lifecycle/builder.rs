//! Threads per-frame diff trees into per-entity timelines.
//!
//! # Algorithm
//!
//! Entities are keyed by grid position. Each level keeps a table of
//! open timelines; every frame is applied in three phases so that a
//! delete can vacate a position in the same frame an add or move
//! claims it:
//!
//! 1. deletes archive their timeline,
//! 2. moves vacate all their source positions, then occupy targets,
//! 3. adds open fresh timelines.
//!
//! Any phase finding the position table in an impossible state (an
//! add or move landing on an occupied key, a delete or move keyed to
//! nothing) aborts the run with a [`MotionError::PositionCollision`].
//! Nested containers are threaded the same way on their root ops and
//! their collected runs recurse, keeping frame indices absolute.

use rustc_hash::FxHashMap;

use crate::diff::optimize::HasHash;
use crate::diff::{DiffOp, DiffTree};
use crate::error::{CollisionKind, MotionError, MotionResult};
use crate::lifecycle::{BlockLifecycle, ExtOp, Timeline};
use crate::tree::Placed;

/// Thread a frame sequence of diff trees into the root lifecycle.
///
/// `diffs[i]` must be the diff arriving at frame `i`; the first entry
/// is expected to carry the root container's appearance.
pub fn build(diffs: &[DiffTree]) -> MotionResult<BlockLifecycle> {
    let level: Vec<(usize, &DiffTree)> = diffs.iter().enumerate().collect();
    build_level(&level)
}

/// Build one container's lifecycle from its (absolute frame, tree) run.
fn build_level(trees: &[(usize, &DiffTree)]) -> MotionResult<BlockLifecycle> {
    let mut self_ops = Timeline::new();
    for &(frame, tree) in trees {
        self_ops.insert(frame, tree.root.clone().into());
    }

    Ok(BlockLifecycle {
        self_ops,
        tokens: thread_items(trees, |t| t.token_ops())?,
        decorations: thread_items(trees, |t| t.decorations.iter())?,
        children: thread_children(trees)?,
    })
}

fn collision(frame: usize, kind: CollisionKind, hash: u32, pos: (i32, i32)) -> MotionError {
    MotionError::PositionCollision {
        frame,
        kind,
        hash,
        x: pos.0,
        y: pos.1,
    }
}

/// Thread one class of leaf items (tokens or decorations) through the
/// position table.
fn thread_items<'a, T, I, F>(
    trees: &[(usize, &'a DiffTree)],
    select: F,
) -> MotionResult<Vec<Timeline<T>>>
where
    T: Placed + HasHash + Clone + 'a,
    I: Iterator<Item = &'a DiffOp<T>>,
    F: Fn(&'a DiffTree) -> I,
{
    let mut open: FxHashMap<(i32, i32), Timeline<T>> = FxHashMap::default();
    let mut done: Vec<Timeline<T>> = Vec::new();

    for &(frame, tree) in trees {
        for op in select(tree) {
            if let DiffOp::Del(item) = op {
                let mut tl = open.remove(&item.pos()).ok_or_else(|| {
                    collision(frame, CollisionKind::MissingTimeline, item.item_hash(), item.pos())
                })?;
                tl.insert(frame, ExtOp::Del(item.clone()));
                done.push(tl);
            }
        }

        let mut moved: Vec<(T, Timeline<T>)> = Vec::new();
        for op in select(tree) {
            if let DiffOp::Mov { item, from } = op {
                let mut tl = open.remove(&from.pos()).ok_or_else(|| {
                    collision(frame, CollisionKind::MissingTimeline, from.item_hash(), from.pos())
                })?;
                tl.insert(
                    frame,
                    ExtOp::Mov {
                        item: item.clone(),
                        from: from.clone(),
                    },
                );
                moved.push((item.clone(), tl));
            }
        }
        for (item, tl) in moved {
            if open.insert(item.pos(), tl).is_some() {
                return Err(collision(
                    frame,
                    CollisionKind::MovOccupied,
                    item.item_hash(),
                    item.pos(),
                ));
            }
        }

        for op in select(tree) {
            if let DiffOp::Add(item) = op {
                let tl = Timeline::starting(frame, ExtOp::Add(item.clone()));
                if open.insert(item.pos(), tl).is_some() {
                    return Err(collision(
                        frame,
                        CollisionKind::AddOccupied,
                        item.item_hash(),
                        item.pos(),
                    ));
                }
            }
        }
    }

    // Survivors archive in position order for deterministic output.
    let mut rest: Vec<_> = open.into_iter().collect();
    rest.sort_by_key(|(pos, _)| *pos);
    done.extend(rest.into_iter().map(|(_, tl)| tl));
    Ok(done)
}

/// Thread nested containers by root op, collecting each child's run of
/// (absolute frame, tree) pairs, then recurse per run.
fn thread_children(trees: &[(usize, &DiffTree)]) -> MotionResult<Vec<BlockLifecycle>> {
    type Run<'a> = Vec<(usize, &'a DiffTree)>;

    let mut open: FxHashMap<(i32, i32), Run<'_>> = FxHashMap::default();
    let mut done: Vec<Run<'_>> = Vec::new();

    for &(frame, tree) in trees {
        for sub in tree.nested() {
            if let DiffOp::Del(block) = &sub.root {
                let mut run = open.remove(&block.pos()).ok_or_else(|| {
                    collision(frame, CollisionKind::MissingTimeline, block.hash, block.pos())
                })?;
                run.push((frame, sub));
                done.push(run);
            }
        }

        let mut moved: Vec<((i32, i32), u32, Run<'_>)> = Vec::new();
        for sub in tree.nested() {
            if let DiffOp::Mov { item, from } = &sub.root {
                let mut run = open.remove(&from.pos()).ok_or_else(|| {
                    collision(frame, CollisionKind::MissingTimeline, from.hash, from.pos())
                })?;
                run.push((frame, sub));
                moved.push((item.pos(), item.hash, run));
            }
        }
        for (pos, hash, run) in moved {
            if open.insert(pos, run).is_some() {
                return Err(collision(frame, CollisionKind::MovOccupied, hash, pos));
            }
        }

        for sub in tree.nested() {
            if let DiffOp::Add(block) = &sub.root {
                if open.insert(block.pos(), vec![(frame, sub)]).is_some() {
                    return Err(collision(
                        frame,
                        CollisionKind::AddOccupied,
                        block.hash,
                        block.pos(),
                    ));
                }
            }
        }

        for sub in tree.nested() {
            if let DiffOp::Nop(block) = &sub.root {
                let run = open.get_mut(&block.pos()).ok_or_else(|| {
                    collision(frame, CollisionKind::MissingTimeline, block.hash, block.pos())
                })?;
                run.push((frame, sub));
            }
        }
    }

    let mut rest: Vec<_> = open.into_iter().collect();
    rest.sort_by_key(|(pos, _)| *pos);
    done.extend(rest.into_iter().map(|(_, run)| run));

    done.iter().map(|run| build_level(run)).collect()
}
