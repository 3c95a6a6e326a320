//! The frame differ.
//!
//! Diffs two (possibly absent) container trees into one `DiffTree`.
//! Content diffing runs three passes over the direct token children,
//! each pass removing matched tokens from consideration by the next:
//!
//! 1. **Structure pass**: collapse self-contained substructures
//!    (matched delimiter pairs, quoted strings, operator triples) into
//!    pseudo-items hashed translation-invariantly, and LCS those. A
//!    matched pair that moved becomes per-member moves instead of a
//!    recursive re-diff, so a single-character edit elsewhere cannot
//!    fragment a whole bracketed expression into add/delete noise.
//! 2. **Line pass**: group leftovers by row into pseudo-lines (hashes
//!    are indentation-invariant) and LCS those; moved lines become
//!    per-member moves.
//! 3. **Token pass**: LCS the individual leftovers with equality on
//!    `(hash, x, y)`, emitting only adds and deletes. Folding those
//!    into moves is the optimizer's job.
//!
//! Nested containers pair by hash via the matcher and recurse;
//! decorations diff per hash group.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::algo::{diff_sequences, pick_alternative};
use crate::error::{MotionError, MotionResult};
use crate::hash::offset_hash_chain;
use crate::tree::{Block, Decoration, Node, Token};

use super::{ContentEntry, DiffOp, DiffTree};

// =============================================================================
// Public API
// =============================================================================

/// Diff two frame containers. Exactly one side may be absent (a pure
/// add or a pure delete of the whole container); both absent is a
/// contract violation.
pub fn diff(from: Option<&Block>, to: Option<&Block>) -> MotionResult<DiffTree> {
    match (from, to) {
        (None, None) => Err(MotionError::EmptyDiff),
        (Some(f), None) => Ok(whole_subtree(f, Side::Del)),
        (None, Some(t)) => Ok(whole_subtree(t, Side::Add)),
        (Some(f), Some(t)) => {
            let root = if f.same_rect(t) {
                DiffOp::Nop(t.clone())
            } else {
                DiffOp::Mov {
                    item: t.clone(),
                    from: f.clone(),
                }
            };

            let mut tree = DiffTree {
                root,
                content: Vec::new(),
                decorations: Vec::new(),
            };

            diff_tokens(f, t, &mut tree);
            diff_blocks(f, t, &mut tree)?;
            diff_decorations(f, t, &mut tree);
            Ok(tree)
        }
    }
}

// =============================================================================
// Whole-subtree add / delete
// =============================================================================

#[derive(Clone, Copy, PartialEq)]
enum Side {
    Add,
    Del,
}

fn whole_subtree(block: &Block, side: Side) -> DiffTree {
    let root = match side {
        Side::Add => DiffOp::Add(block.clone()),
        Side::Del => DiffOp::Del(block.clone()),
    };

    let content = block
        .children
        .iter()
        .map(|child| match (child, side) {
            (Node::Token(t), Side::Add) => ContentEntry::Token(DiffOp::Add(t.clone())),
            (Node::Token(t), Side::Del) => ContentEntry::Token(DiffOp::Del(t.clone())),
            (Node::Block(b), _) => ContentEntry::Block(whole_subtree(b, side)),
        })
        .collect();

    let decorations = block
        .decorations
        .iter()
        .map(|d| match side {
            Side::Add => DiffOp::Add(d.clone()),
            Side::Del => DiffOp::Del(d.clone()),
        })
        .collect();

    DiffTree {
        root,
        content,
        decorations,
    }
}

// =============================================================================
// Token diffing: structure pass, line pass, token pass
// =============================================================================

fn diff_tokens(from: &Block, to: &Block, tree: &mut DiffTree) {
    let from_tokens: Vec<&Token> = from.tokens().collect();
    let to_tokens: Vec<&Token> = to.tokens().collect();

    let mut from_live: Vec<bool> = vec![true; from_tokens.len()];
    let mut to_live: Vec<bool> = vec![true; to_tokens.len()];

    structure_pass(&from_tokens, &to_tokens, &mut from_live, &mut to_live, tree);
    line_pass(&from_tokens, &to_tokens, &mut from_live, &mut to_live, tree);
    token_pass(&from_tokens, &to_tokens, &from_live, &to_live, tree);
}

fn live_indices(live: &[bool]) -> Vec<usize> {
    live.iter()
        .enumerate()
        .filter(|(_, l)| **l)
        .map(|(i, _)| i)
        .collect()
}

/// Emit per-member moves for two index-paired member lists, or nothing
/// when every placement is already identical.
fn emit_member_moves(
    from_tokens: &[&Token],
    to_tokens: &[&Token],
    from_members: &[usize],
    to_members: &[usize],
    tree: &mut DiffTree,
) {
    for (&fi, &ti) in from_members.iter().zip(to_members) {
        let (f, t) = (from_tokens[fi], to_tokens[ti]);
        if !f.same_placement(t) {
            tree.content.push(ContentEntry::Token(DiffOp::Mov {
                item: t.clone(),
                from: f.clone(),
            }));
        }
    }
}

fn consume(live: &mut [bool], members: &[usize]) {
    for &i in members {
        live[i] = false;
    }
}

// -----------------------------------------------------------------------------
// Structure pass
// -----------------------------------------------------------------------------

/// A collapsed self-contained substructure: its member token indices
/// and its translation-invariant hash.
struct Group {
    members: Vec<usize>,
    hash: u32,
}

fn structure_pass(
    from_tokens: &[&Token],
    to_tokens: &[&Token],
    from_live: &mut [bool],
    to_live: &mut [bool],
    tree: &mut DiffTree,
) {
    let from_groups = find_groups(from_tokens, &live_indices(from_live));
    let to_groups = find_groups(to_tokens, &live_indices(to_live));

    let from_keys: Vec<u32> = from_groups.iter().map(|g| g.hash).collect();
    let to_keys: Vec<u32> = to_groups.iter().map(|g| g.hash).collect();

    for (fi, ti) in diff_sequences(&from_keys, &to_keys).keeps() {
        let (fg, tg) = (&from_groups[fi], &to_groups[ti]);
        // equal hashes imply equal member counts; guard regardless
        if fg.members.len() != tg.members.len() {
            continue;
        }
        emit_member_moves(from_tokens, to_tokens, &fg.members, &tg.members, tree);
        consume(from_live, &fg.members);
        consume(to_live, &tg.members);
    }
    // unmatched groups dissolve: their members fall through to the
    // line and token passes
}

fn opener(text: &str) -> Option<char> {
    match text {
        "(" => Some('('),
        "[" => Some('['),
        "{" => Some('{'),
        _ => None,
    }
}

fn closer(text: &str) -> Option<char> {
    match text {
        ")" => Some('('),
        "]" => Some('['),
        "}" => Some('{'),
        _ => None,
    }
}

fn quote(text: &str) -> Option<char> {
    match text {
        "\"" => Some('"'),
        "'" => Some('\''),
        "`" => Some('`'),
        _ => None,
    }
}

const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "=", "==", "===", "!=", "!==", "<", ">", "<=", ">=", "&&", "||",
    "=>", "->",
];

fn is_operator(text: &str) -> bool {
    OPERATORS.contains(&text)
}

/// True when the token before a quote ends in an odd run of
/// backslashes, i.e. the quote itself is escaped string content.
fn escaped_by_prev(tokens: &[&Token], seq: &[usize], pos: usize) -> bool {
    if pos == 0 {
        return false;
    }
    let prev = &tokens[seq[pos - 1]].text;
    let trailing = prev.chars().rev().take_while(|&c| c == '\\').count();
    trailing % 2 == 1
}

/// Scan the live token sequence for self-contained substructures:
/// outermost matched delimiter spans, quoted strings, and
/// operand-operator-operand triples.
fn find_groups(tokens: &[&Token], seq: &[usize]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut grouped = vec![false; seq.len()];

    // Delimiter spans and strings. Only spans that close back to depth
    // zero collapse; nested spans travel inside the outer span's hash.
    let mut stack: SmallVec<[(char, usize); 8]> = SmallVec::new();
    let mut in_string: Option<(char, usize)> = None;

    for (pos, &idx) in seq.iter().enumerate() {
        let text = tokens[idx].text.as_str();

        if let Some((q, start)) = in_string {
            if quote(text) == Some(q) && !escaped_by_prev(tokens, seq, pos) {
                in_string = None;
                if stack.is_empty() {
                    mark_span(&mut grouped, start, pos);
                }
            }
            // bracket chars inside a string are content, not structure
            continue;
        }

        if let Some(q) = quote(text) {
            in_string = Some((q, pos));
        } else if let Some(o) = opener(text) {
            stack.push((o, pos));
        } else if let Some(expected) = closer(text) {
            match stack.last() {
                Some((o, _)) if *o == expected => {
                    let (_, start) = stack.pop().unwrap_or((expected, pos));
                    if stack.is_empty() {
                        mark_span(&mut grouped, start, pos);
                    }
                }
                // unbalanced closer: not a self-contained span
                _ => {}
            }
        }
    }

    // collect marked spans in order
    let mut pos = 0;
    while pos < seq.len() {
        if grouped[pos] {
            let start = pos;
            while pos < seq.len() && grouped[pos] {
                pos += 1;
            }
            groups.push(make_group(tokens, &seq[start..pos]));
        } else {
            pos += 1;
        }
    }

    // Operator triples over the still-ungrouped leftovers.
    let mut pos = 0;
    while pos + 2 < seq.len() {
        if grouped[pos] || grouped[pos + 1] || grouped[pos + 2] {
            pos += 1;
            continue;
        }
        let (a, op, b) = (tokens[seq[pos]], tokens[seq[pos + 1]], tokens[seq[pos + 2]]);
        let plain = |t: &Token| {
            !is_operator(&t.text)
                && opener(&t.text).is_none()
                && closer(&t.text).is_none()
                && quote(&t.text).is_none()
        };
        if is_operator(&op.text) && plain(a) && plain(b) && a.y == op.y && op.y == b.y {
            grouped[pos] = true;
            grouped[pos + 1] = true;
            grouped[pos + 2] = true;
            groups.push(make_group(tokens, &seq[pos..pos + 3]));
            pos += 3;
        } else {
            pos += 1;
        }
    }

    groups
}

fn mark_span(grouped: &mut [bool], start: usize, end: usize) {
    for g in &mut grouped[start..=end] {
        *g = true;
    }
}

fn make_group(tokens: &[&Token], members: &[usize]) -> Group {
    let hash = offset_hash_chain(members.iter().map(|&i| {
        let t = tokens[i];
        (t.hash, t.x, t.y)
    }));
    Group {
        members: members.to_vec(),
        hash,
    }
}

// -----------------------------------------------------------------------------
// Line pass
// -----------------------------------------------------------------------------

fn line_pass(
    from_tokens: &[&Token],
    to_tokens: &[&Token],
    from_live: &mut [bool],
    to_live: &mut [bool],
    tree: &mut DiffTree,
) {
    let from_lines = find_lines(from_tokens, &live_indices(from_live));
    let to_lines = find_lines(to_tokens, &live_indices(to_live));

    let from_keys: Vec<u32> = from_lines.iter().map(|l| l.hash).collect();
    let to_keys: Vec<u32> = to_lines.iter().map(|l| l.hash).collect();

    for (fi, ti) in diff_sequences(&from_keys, &to_keys).keeps() {
        let (fl, tl) = (&from_lines[fi], &to_lines[ti]);
        if fl.members.len() != tl.members.len() {
            continue;
        }
        emit_member_moves(from_tokens, to_tokens, &fl.members, &tl.members, tree);
        consume(from_live, &fl.members);
        consume(to_live, &tl.members);
    }
}

/// Group live tokens into per-row pseudo-lines, ordered by row. The
/// hash is an offset chain, so indentation and vertical position do not
/// enter it.
fn find_lines(tokens: &[&Token], seq: &[usize]) -> Vec<Group> {
    let mut rows: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for &idx in seq {
        rows.entry(tokens[idx].y).or_default().push(idx);
    }
    rows.into_values()
        .map(|members| make_group(tokens, &members))
        .collect()
}

// -----------------------------------------------------------------------------
// Token pass
// -----------------------------------------------------------------------------

fn token_pass(
    from_tokens: &[&Token],
    to_tokens: &[&Token],
    from_live: &[bool],
    to_live: &[bool],
    tree: &mut DiffTree,
) {
    let from_idx = live_indices(from_live);
    let to_idx = live_indices(to_live);

    let from_keys: Vec<(u32, i32, i32)> = from_idx
        .iter()
        .map(|&i| (from_tokens[i].hash, from_tokens[i].x, from_tokens[i].y))
        .collect();
    let to_keys: Vec<(u32, i32, i32)> = to_idx
        .iter()
        .map(|&i| (to_tokens[i].hash, to_tokens[i].x, to_tokens[i].y))
        .collect();

    let result = diff_sequences(&from_keys, &to_keys);

    // keeps are placement-identical, they emit nothing
    for old_idx in result.deletes() {
        tree.content.push(ContentEntry::Token(DiffOp::Del(
            from_tokens[from_idx[old_idx]].clone(),
        )));
    }
    for new_idx in result.inserts() {
        tree.content.push(ContentEntry::Token(DiffOp::Add(
            to_tokens[to_idx[new_idx]].clone(),
        )));
    }
}

// =============================================================================
// Nested containers
// =============================================================================

fn diff_blocks(from: &Block, to: &Block, tree: &mut DiffTree) -> MotionResult<()> {
    let from_blocks: Vec<&Block> = from.blocks().collect();
    let to_blocks: Vec<&Block> = to.blocks().collect();

    let mut from_by_hash: FxHashMap<u32, Vec<&Block>> = FxHashMap::default();
    for b in &from_blocks {
        from_by_hash.entry(b.hash).or_default().push(b);
    }

    // to-side document order keeps the output deterministic
    for t in &to_blocks {
        let pool = from_by_hash.entry(t.hash).or_default();
        match pick_alternative(t, pool) {
            Some(i) => {
                let f = pool.remove(i);
                tree.content
                    .push(ContentEntry::Block(diff(Some(f), Some(t))?));
            }
            None => {
                tree.content.push(ContentEntry::Block(diff(None, Some(t))?));
            }
        }
    }

    // leftovers on the from side are whole-subtree deletes
    for f in &from_blocks {
        let pool = &from_by_hash[&f.hash];
        if pool.iter().any(|b| std::ptr::eq(*b, *f)) {
            tree.content.push(ContentEntry::Block(diff(Some(f), None)?));
        }
    }

    Ok(())
}

// =============================================================================
// Decorations
// =============================================================================

fn diff_decorations(from: &Block, to: &Block, tree: &mut DiffTree) {
    let mut from_by_hash: FxHashMap<u32, Vec<&Decoration>> = FxHashMap::default();
    for d in &from.decorations {
        from_by_hash.entry(d.hash).or_default().push(d);
    }
    let mut to_by_hash: FxHashMap<u32, Vec<&Decoration>> = FxHashMap::default();
    let mut hash_order: Vec<u32> = Vec::new();
    for d in &to.decorations {
        let bucket = to_by_hash.entry(d.hash).or_default();
        if bucket.is_empty() {
            hash_order.push(d.hash);
        }
        bucket.push(d);
    }

    for hash in hash_order {
        let to_group = &to_by_hash[&hash];
        match from_by_hash.remove(&hash) {
            Some(from_group) if from_group.len() == to_group.len() => {
                // equal-length groups compare index-by-index
                for (f, t) in from_group.iter().zip(to_group) {
                    if !f.same_placement(t) {
                        tree.decorations.push(DiffOp::Mov {
                            item: (*t).clone(),
                            from: (*f).clone(),
                        });
                    }
                }
            }
            Some(from_group) => {
                // unequal lengths: LCS on placement, adds/deletes only
                let from_keys: Vec<(i32, i32, u32, u32)> = from_group
                    .iter()
                    .map(|d| (d.x, d.y, d.width, d.height))
                    .collect();
                let to_keys: Vec<(i32, i32, u32, u32)> = to_group
                    .iter()
                    .map(|d| (d.x, d.y, d.width, d.height))
                    .collect();
                let result = diff_sequences(&from_keys, &to_keys);
                for old_idx in result.deletes() {
                    tree.decorations.push(DiffOp::Del(from_group[old_idx].clone()));
                }
                for new_idx in result.inserts() {
                    tree.decorations.push(DiffOp::Add(to_group[new_idx].clone()));
                }
            }
            None => {
                for d in to_group {
                    tree.decorations.push(DiffOp::Add((*d).clone()));
                }
            }
        }
    }

    // hashes present only on the from side
    let mut leftover: Vec<(u32, Vec<&Decoration>)> = from_by_hash.into_iter().collect();
    leftover.sort_by_key(|(h, _)| *h);
    for (_, group) in leftover {
        for d in group {
            tree.decorations.push(DiffOp::Del(d.clone()));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn block_with(tokens: &[(&str, i32, i32)]) -> Block {
        let mut b = Block::new("root").sized(40, 10);
        for &(text, x, y) in tokens {
            b = b.token(Token::new(text, "t", x, y));
        }
        b
    }

    /// All `(hash, x, y)` placements a frame's direct tokens occupy.
    fn placements(b: &Block) -> FxHashSet<(u32, i32, i32)> {
        b.tokens().map(|t| (t.hash, t.x, t.y)).collect()
    }

    #[test]
    fn test_both_absent_is_fault() {
        assert_eq!(diff(None, None), Err(MotionError::EmptyDiff));
    }

    #[test]
    fn test_identity_diff() {
        let a = block_with(&[("fn", 0, 0), ("main", 3, 0)]);
        let b = a.clone();
        let tree = diff(Some(&a), Some(&b)).unwrap();
        assert!(tree.root.is_nop());
        assert!(tree.content.is_empty());
        assert!(tree.decorations.is_empty());
        assert!(tree.is_identity());
    }

    #[test]
    fn test_whole_subtree_add() {
        let b = Block::new("root")
            .token(Token::new("x", "t", 0, 0))
            .block(Block::new("inner").token(Token::new("y", "t", 1, 1)));
        let tree = diff(None, Some(&b)).unwrap();
        assert!(tree.root.is_add());
        assert_eq!(tree.token_ops().filter(|o| o.is_add()).count(), 1);
        let nested: Vec<_> = tree.nested().collect();
        assert_eq!(nested.len(), 1);
        assert!(nested[0].root.is_add());
        assert_eq!(nested[0].token_ops().filter(|o| o.is_add()).count(), 1);
    }

    #[test]
    fn test_root_mov_on_resize() {
        let a = block_with(&[]).at(0, 0);
        let b = block_with(&[]).at(2, 0);
        let tree = diff(Some(&a), Some(&b)).unwrap();
        assert!(tree.root.is_mov());
    }

    #[test]
    fn test_indent_invariance_two_movs() {
        // `{}` at (0,0),(1,0) shifted to (2,0),(3,0): line hashing is
        // offset-invariant, so both tokens move instead of add+delete
        let a = block_with(&[("{", 0, 0), ("}", 1, 0)]);
        let b = block_with(&[("{", 2, 0), ("}", 3, 0)]);
        let tree = diff(Some(&a), Some(&b)).unwrap();

        let movs: Vec<_> = tree.token_ops().filter(|o| o.is_mov()).collect();
        assert_eq!(movs.len(), 2);
        assert_eq!(tree.token_ops().count(), 2);
    }

    #[test]
    fn test_bracket_group_survives_unrelated_edit() {
        // the bracketed expression moves as one unit; the edit besides
        // it becomes one delete + one add
        let a = block_with(&[("a", 0, 0), ("(", 2, 0), ("x", 3, 0), (")", 4, 0)]);
        let b = block_with(&[("b", 0, 0), ("(", 3, 0), ("x", 4, 0), (")", 5, 0)]);
        let tree = diff(Some(&a), Some(&b)).unwrap();

        let movs = tree.token_ops().filter(|o| o.is_mov()).count();
        let adds = tree.token_ops().filter(|o| o.is_add()).count();
        let dels = tree.token_ops().filter(|o| o.is_del()).count();
        assert_eq!(movs, 3, "bracket span should move member-wise");
        assert_eq!((adds, dels), (1, 1));
    }

    #[test]
    fn test_unchanged_line_emits_nothing() {
        let a = block_with(&[("let", 0, 0), ("x", 4, 0), ("y", 0, 1)]);
        let b = block_with(&[("let", 0, 0), ("x", 4, 0), ("z", 0, 1)]);
        let tree = diff(Some(&a), Some(&b)).unwrap();

        // row 0 is untouched; only y -> z shows up
        assert_eq!(tree.token_ops().filter(|o| o.is_del()).count(), 1);
        assert_eq!(tree.token_ops().filter(|o| o.is_add()).count(), 1);
        assert_eq!(tree.token_ops().count(), 2);
    }

    #[test]
    fn test_reconstruction_residue() {
        let a = block_with(&[("a", 0, 0), ("b", 2, 0), ("c", 0, 1)]);
        let b = block_with(&[("a", 0, 0), ("c", 4, 2), ("d", 1, 1)]);
        let tree = diff(Some(&a), Some(&b)).unwrap();

        let mut to_covered: FxHashSet<(u32, i32, i32)> = FxHashSet::default();
        let mut from_covered: FxHashSet<(u32, i32, i32)> = FxHashSet::default();
        for op in tree.token_ops() {
            match op {
                DiffOp::Add(t) => {
                    to_covered.insert((t.hash, t.x, t.y));
                }
                DiffOp::Del(t) => {
                    from_covered.insert((t.hash, t.x, t.y));
                }
                DiffOp::Mov { item, from } => {
                    to_covered.insert((item.hash, item.x, item.y));
                    from_covered.insert((from.hash, from.x, from.y));
                }
                DiffOp::Nop(_) => unreachable!("content lists never carry Nop"),
            }
        }

        // covered placements are subsets of their frames, and the
        // uncovered residue (unchanged tokens) matches on both sides
        let to_set = placements(&b);
        let from_set = placements(&a);
        assert!(to_covered.is_subset(&to_set));
        assert!(from_covered.is_subset(&from_set));
        let to_rest: FxHashSet<_> = to_set.difference(&to_covered).copied().collect();
        let from_rest: FxHashSet<_> = from_set.difference(&from_covered).copied().collect();
        assert_eq!(to_rest, from_rest);
    }

    #[test]
    fn test_nested_block_pairing_by_position() {
        let inner = |x: i32| Block::new("scope").at(x, 1).sized(4, 1);
        let a = Block::new("root").sized(20, 4).block(inner(0)).block(inner(10));
        let b = Block::new("root").sized(20, 4).block(inner(0)).block(inner(12));
        let tree = diff(Some(&a), Some(&b)).unwrap();

        let nested: Vec<_> = tree.nested().collect();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested.iter().filter(|t| t.root.is_nop()).count(), 1);
        assert_eq!(nested.iter().filter(|t| t.root.is_mov()).count(), 1);
    }

    #[test]
    fn test_nested_block_add_and_del() {
        let a = Block::new("root").block(Block::new("old").at(0, 0));
        let b = Block::new("root").block(Block::new("new").at(0, 0));
        let tree = diff(Some(&a), Some(&b)).unwrap();

        assert_eq!(tree.nested().filter(|t| t.root.is_add()).count(), 1);
        assert_eq!(tree.nested().filter(|t| t.root.is_del()).count(), 1);
    }

    #[test]
    fn test_decoration_equal_length_moves() {
        let a = Block::new("root").decoration(Decoration::new("hl", 0, 0, 3, 1));
        let b = Block::new("root").decoration(Decoration::new("hl", 0, 2, 3, 1));
        let tree = diff(Some(&a), Some(&b)).unwrap();

        assert_eq!(tree.decorations.len(), 1);
        assert!(tree.decorations[0].is_mov());
    }

    #[test]
    fn test_decoration_unequal_length_adds_deletes() {
        let a = Block::new("root").decoration(Decoration::new("hl", 0, 0, 3, 1));
        let b = Block::new("root")
            .decoration(Decoration::new("hl", 0, 0, 3, 1))
            .decoration(Decoration::new("hl", 0, 2, 3, 1));
        let tree = diff(Some(&a), Some(&b)).unwrap();

        assert_eq!(tree.decorations.iter().filter(|o| o.is_add()).count(), 1);
        assert_eq!(tree.decorations.iter().filter(|o| o.is_mov()).count(), 0);
    }

    #[test]
    fn test_string_span_groups() {
        // a quoted string moves as one unit when text after it changes
        let a = block_with(&[("\"", 0, 0), ("hi", 1, 0), ("\"", 3, 0), ("x", 5, 0)]);
        let b = block_with(&[("\"", 2, 0), ("hi", 3, 0), ("\"", 5, 0), ("y", 7, 0)]);
        let tree = diff(Some(&a), Some(&b)).unwrap();

        let movs = tree.token_ops().filter(|o| o.is_mov()).count();
        assert_eq!(movs, 3);
    }
}
