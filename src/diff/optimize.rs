//! Diff optimization: folding same-hash add+delete pairs into moves.
//!
//! The token pass of the differ deliberately emits only adds and
//! deletes; this pass buckets those by item hash and asks the matcher
//! which pairs are really the same entity at a new position. It never
//! crosses hash buckets and never crosses tree levels (nested trees
//! are optimized independently), and existing moves pass through
//! untouched, which makes the pass idempotent.

use rustc_hash::FxHashMap;

use crate::algo::pick_alternative;
use crate::tree::Placed;

use super::{ContentEntry, DiffOp, DiffTree};

/// Optimize a diff tree in place. Returns the number of add+delete
/// pairs folded into moves, summed over nested trees.
pub fn optimize(tree: &mut DiffTree) -> usize {
    let mut folded = 0;

    for entry in &mut tree.content {
        if let ContentEntry::Block(nested) = entry {
            folded += optimize(nested);
        }
    }

    folded += fold_token_ops(tree);
    folded += fold_ops(&mut tree.decorations);
    folded
}

/// Split the content list, fold the token ops, and reassemble with
/// token ops first. The content list is a set as far as downstream
/// passes care; only op payloads are contractual.
fn fold_token_ops(tree: &mut DiffTree) -> usize {
    let mut token_ops: Vec<DiffOp<crate::tree::Token>> = Vec::new();
    let mut nested: Vec<ContentEntry> = Vec::new();
    for entry in tree.content.drain(..) {
        match entry {
            ContentEntry::Token(op) => token_ops.push(op),
            block => nested.push(block),
        }
    }

    let folded = fold_ops(&mut token_ops);

    tree.content = token_ops.into_iter().map(ContentEntry::Token).collect();
    tree.content.extend(nested);
    folded
}

/// Same folding for a flat op list (decorations).
fn fold_ops<T: Placed + Clone + HasHash>(ops: &mut Vec<DiffOp<T>>) -> usize {
    let mut adds: FxHashMap<u32, Vec<usize>> = FxHashMap::default();
    let mut dels: FxHashMap<u32, Vec<usize>> = FxHashMap::default();

    for (i, op) in ops.iter().enumerate() {
        match op {
            DiffOp::Add(t) => adds.entry(t.item_hash()).or_default().push(i),
            DiffOp::Del(t) => dels.entry(t.item_hash()).or_default().push(i),
            DiffOp::Mov { .. } | DiffOp::Nop(_) => {}
        }
    }

    let mut hashes: Vec<u32> = dels.keys().copied().collect();
    hashes.sort_unstable();

    let mut removed: Vec<usize> = Vec::new();
    let mut folded = 0;

    for hash in hashes {
        let Some(add_slots) = adds.get_mut(&hash) else {
            continue;
        };
        for &del_slot in &dels[&hash] {
            if add_slots.is_empty() {
                break;
            }
            let DiffOp::Del(del_item) = ops[del_slot].clone() else {
                continue;
            };
            let pool: Vec<T> = add_slots
                .iter()
                .filter_map(|&slot| match &ops[slot] {
                    DiffOp::Add(t) => Some(t.clone()),
                    _ => None,
                })
                .collect();

            if let Some(pick) = pick_alternative(&del_item, &pool) {
                let add_slot = add_slots.remove(pick);
                ops[add_slot] = DiffOp::Mov {
                    item: pool[pick].clone(),
                    from: del_item,
                };
                removed.push(del_slot);
                folded += 1;
            }
        }
    }

    remove_slots(ops, &removed);
    folded
}

/// Item hash access shared by the foldable payload types.
pub trait HasHash {
    fn item_hash(&self) -> u32;
}

impl HasHash for crate::tree::Token {
    fn item_hash(&self) -> u32 {
        self.hash
    }
}

impl HasHash for crate::tree::Decoration {
    fn item_hash(&self) -> u32 {
        self.hash
    }
}

/// Remove the given indices from a vec, preserving the rest's order.
fn remove_slots<T>(items: &mut Vec<T>, removed: &[usize]) {
    if removed.is_empty() {
        return;
    }
    let to_remove: rustc_hash::FxHashSet<usize> = removed.iter().copied().collect();
    let mut idx = 0;
    items.retain(|_| {
        let keep = !to_remove.contains(&idx);
        idx += 1;
        keep
    });
}

// =============================================================================
// Tests
// =============================================================================
