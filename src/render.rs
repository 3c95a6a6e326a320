//! Render-identity assignment and snapshot output.
//!
//! Timelines are projected onto a small set of reusable render
//! identities: every entity needs an id for the renderer to animate,
//! but two same-content entities that never overlap in time can share
//! one, so a steady stream of edits does not grow the id space without
//! bound. Each container keeps one pool per content class (tokens,
//! decorations, nested blocks), keyed by content hash. Within a frame
//! all releases happen before any acquisition, so an id freed by a
//! delete is available to an add in the same frame but never to a
//! concurrent holder.
//!
//! The output is a serializable [`Animation`]: a template per render
//! id (emitted once, on first mint) plus per-frame placement
//! snapshots. Frames without an op for an entity carry its last
//! placement forward.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::hash::IdGen;
use crate::lifecycle::{BlockLifecycle, ExtOp, Timeline};
use crate::tree::{Block, Decoration, Placed, Token};

// =============================================================================
// Output model
// =============================================================================

/// One entity's state in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Bridging states render the entity in place but hidden
    pub visible: bool,
}

/// The per-id static content, emitted once per render id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Template {
    Token {
        text: String,
        kind: String,
    },
    Decoration {
        data: String,
    },
    Block {
        payload: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },
}

/// One container's state in one frame: its own rect, its direct
/// tokens and decorations by render id, and its nested containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub rect: Placement,
    pub items: BTreeMap<String, Placement>,
    pub children: BTreeMap<String, FrameSnapshot>,
}

/// A complete rendered run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub templates: BTreeMap<String, Template>,
    pub frames: Vec<FrameSnapshot>,
}

// =============================================================================
// Render identity pool
// =============================================================================

/// Items that can be bound to a pooled render identity.
trait Renderable: Placed {
    /// Realm tag, doubling as the id prefix keeping classes disjoint
    const REALM: &'static str;
    fn render_hash(&self) -> u32;
    fn template(&self) -> Template;
}

impl Renderable for Token {
    const REALM: &'static str = "tok";
    fn render_hash(&self) -> u32 {
        self.hash
    }
    fn template(&self) -> Template {
        Template::Token {
            text: self.text.to_string(),
            kind: self.kind.to_string(),
        }
    }
}

impl Renderable for Decoration {
    const REALM: &'static str = "deco";
    fn render_hash(&self) -> u32 {
        self.hash
    }
    fn template(&self) -> Template {
        Template::Decoration {
            data: self.data.to_string(),
        }
    }
}

impl Renderable for Block {
    const REALM: &'static str = "blk";
    fn render_hash(&self) -> u32 {
        self.hash
    }
    fn template(&self) -> Template {
        Template::Block {
            payload: self.payload.to_string(),
            lang: self.lang.as_ref().map(|l| l.to_string()),
        }
    }
}

/// Per-class pool of released render ids, keyed by content hash.
#[derive(Default)]
struct Pool {
    free: FxHashMap<u32, Vec<String>>,
}

impl Pool {
    fn acquire<T: Renderable>(
        &mut self,
        item: &T,
        idgen: &mut IdGen,
        templates: &mut BTreeMap<String, Template>,
    ) -> String {
        let hash = item.render_hash();
        if let Some(id) = self.free.get_mut(&hash).and_then(Vec::pop) {
            return id;
        }
        let id = format!("{}-{}", T::REALM, idgen.mint(T::REALM, hash));
        templates.insert(id.clone(), item.template());
        id
    }

    fn release(&mut self, hash: u32, id: String) {
        self.free.entry(hash).or_default().push(id);
    }
}

/// One timeline's current binding to a render id.
#[derive(Default)]
struct Binding {
    id: Option<String>,
    hash: u32,
    last: Option<Placement>,
}

fn place<T: Placed>(item: &T, visible: bool) -> Placement {
    Placement {
        x: item.x(),
        y: item.y(),
        width: item.width(),
        height: item.height(),
        visible,
    }
}

/// Release phase: a literal delete at this frame unbinds the timeline
/// and returns its id. Releasing an unbound timeline is a no-op, which
/// covers deletes synthesized at the wrap seam.
fn release_step<T: Renderable>(tl: &Timeline<T>, frame: usize, b: &mut Binding, pool: &mut Pool) {
    if let Some(ExtOp::Del(_)) = tl.get(frame) {
        if let Some(id) = b.id.take() {
            pool.release(b.hash, id);
        }
        b.last = None;
    }
}

/// Bind phase: any non-delete op at this frame updates the placement,
/// acquiring an id first if the timeline is unbound.
fn bind_step<T: Renderable + Clone>(
    tl: &Timeline<T>,
    frame: usize,
    b: &mut Binding,
    pool: &mut Pool,
    idgen: &mut IdGen,
    templates: &mut BTreeMap<String, Template>,
) {
    let op = match tl.get(frame) {
        Some(op) if !op.is_del() => op,
        _ => return,
    };
    let item = op.item();
    if b.id.is_none() {
        b.hash = item.render_hash();
        b.id = Some(pool.acquire(item, idgen, templates));
    }
    b.last = Some(place(item, op.visible()));
}

// =============================================================================
// Projection
// =============================================================================

/// Project an expanded lifecycle into its serializable animation.
/// Frame `i` of the output corresponds to input frame `i`.
pub fn project(root: &BlockLifecycle) -> Animation {
    let mut idgen = IdGen::new();
    let mut templates = BTreeMap::new();

    let snaps = project_block(root, &mut idgen, &mut templates);
    let frames = snaps.into_iter().map(|(_, s)| s).collect();
    Animation { templates, frames }
}

/// Project one container's active range. Returns `(absolute frame,
/// snapshot)` pairs; frames where the container is absent (the gap a
/// wrap bridge leaves) produce no snapshot.
fn project_block(
    lc: &BlockLifecycle,
    idgen: &mut IdGen,
    templates: &mut BTreeMap<String, Template>,
) -> Vec<(usize, FrameSnapshot)> {
    let (min, max) = (lc.min_frame(), lc.max_frame());

    let child_snaps: Vec<FxHashMap<usize, FrameSnapshot>> = lc
        .children
        .iter()
        .map(|c| project_block(c, idgen, templates).into_iter().collect())
        .collect();

    let mut token_pool = Pool::default();
    let mut deco_pool = Pool::default();
    let mut block_pool = Pool::default();

    let mut token_bind: Vec<Binding> = lc.tokens.iter().map(|_| Binding::default()).collect();
    let mut deco_bind: Vec<Binding> = lc.decorations.iter().map(|_| Binding::default()).collect();
    let mut child_bind: Vec<Binding> = lc.children.iter().map(|_| Binding::default()).collect();

    // own rect carry; None while the container is absent
    let mut own: Option<Placement> = None;

    let mut out = Vec::new();
    for frame in min..=max {
        if let Some(op) = lc.self_ops.get(frame) {
            own = if op.is_del() {
                None
            } else {
                Some(place(op.item(), op.visible()))
            };
        }

        for (tl, b) in lc.tokens.iter().zip(&mut token_bind) {
            release_step(tl, frame, b, &mut token_pool);
        }
        for (tl, b) in lc.decorations.iter().zip(&mut deco_bind) {
            release_step(tl, frame, b, &mut deco_pool);
        }
        for (c, b) in lc.children.iter().zip(&mut child_bind) {
            release_step(&c.self_ops, frame, b, &mut block_pool);
        }

        for (tl, b) in lc.tokens.iter().zip(&mut token_bind) {
            bind_step(tl, frame, b, &mut token_pool, idgen, templates);
        }
        for (tl, b) in lc.decorations.iter().zip(&mut deco_bind) {
            bind_step(tl, frame, b, &mut deco_pool, idgen, templates);
        }
        for (c, b) in lc.children.iter().zip(&mut child_bind) {
            bind_step(&c.self_ops, frame, b, &mut block_pool, idgen, templates);
        }

        let rect = match own {
            Some(r) => r,
            None => continue,
        };

        let mut items = BTreeMap::new();
        for b in token_bind.iter().chain(deco_bind.iter()) {
            if let (Some(id), Some(p)) = (&b.id, b.last) {
                items.insert(id.clone(), p);
            }
        }

        let mut children = BTreeMap::new();
        for (ci, b) in child_bind.iter().enumerate() {
            if let (Some(id), Some(snap)) = (&b.id, child_snaps[ci].get(&frame)) {
                children.insert(id.clone(), snap.clone());
            }
        }

        out.push((frame, FrameSnapshot { rect, items, children }));
    }

    out
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn token_timeline(ops: &[(usize, ExtOp<Token>)]) -> Timeline<Token> {
        let mut t = Timeline::new();
        for (f, op) in ops {
            t.insert(*f, op.clone());
        }
        t
    }

    fn lifecycle(frames: usize, tokens: Vec<Timeline<Token>>) -> BlockLifecycle {
        let block = Block::new("root").sized(20, 5);
        let mut self_ops = Timeline::new();
        self_ops.insert(0, ExtOp::Add(block.clone()));
        for f in 1..frames {
            self_ops.insert(f, ExtOp::Nop(block.clone()));
        }
        BlockLifecycle {
            self_ops,
            tokens,
            decorations: vec![],
            children: vec![],
        }
    }

    #[test]
    fn test_steady_state_carries_placement() {
        let tok = Token::new("x", "ident", 3, 1);
        let lc = lifecycle(3, vec![token_timeline(&[(0, ExtOp::Add(tok))])]);

        let anim = project(&lc);
        assert_eq!(anim.frames.len(), 3);
        for frame in &anim.frames {
            assert_eq!(frame.items.len(), 1);
            let p = frame.items.values().next().unwrap();
            assert_eq!((p.x, p.y, p.visible), (3, 1, true));
        }
    }

    #[test]
    fn test_bridge_states_render_invisible() {
        let tok = Token::new("x", "ident", 3, 1);
        let lc = lifecycle(
            3,
            vec![token_timeline(&[
                (0, ExtOp::BecomeAdd(tok.clone())),
                (1, ExtOp::Add(tok.clone())),
                (2, ExtOp::BecomeDel {
                    from: tok.clone(),
                    item: tok,
                }),
            ])],
        );

        let anim = project(&lc);
        let vis: Vec<bool> = anim
            .frames
            .iter()
            .map(|f| f.items.values().next().unwrap().visible)
            .collect();
        assert_eq!(vis, [false, true, false]);
    }

    #[test]
    fn test_delete_removes_item_from_snapshots() {
        let tok = Token::new("x", "ident", 3, 1);
        let lc = lifecycle(
            3,
            vec![token_timeline(&[
                (0, ExtOp::Add(tok.clone())),
                (1, ExtOp::Del(tok)),
            ])],
        );

        let anim = project(&lc);
        assert_eq!(anim.frames[0].items.len(), 1);
        assert_eq!(anim.frames[1].items.len(), 0);
        assert_eq!(anim.frames[2].items.len(), 0);
    }

    #[test]
    fn test_same_frame_recycling_shares_one_id() {
        // one "x" dies the same frame another "x" appears elsewhere:
        // the delete's release makes its id available to the add
        let a = Token::new("x", "ident", 0, 0);
        let b = Token::new("x", "ident", 9, 2);
        let lc = lifecycle(
            2,
            vec![
                token_timeline(&[(0, ExtOp::Add(a.clone())), (1, ExtOp::Del(a))]),
                token_timeline(&[(1, ExtOp::Add(b))]),
            ],
        );

        let anim = project(&lc);
        assert_eq!(anim.templates.len(), 1, "recycled id needs only one template");
        let id0: Vec<&String> = anim.frames[0].items.keys().collect();
        let id1: Vec<&String> = anim.frames[1].items.keys().collect();
        assert_eq!(id0, id1);
    }

    #[test]
    fn test_concurrent_same_hash_tokens_get_distinct_ids() {
        let a = Token::new("x", "ident", 0, 0);
        let b = Token::new("x", "ident", 5, 0);
        let lc = lifecycle(
            1,
            vec![
                token_timeline(&[(0, ExtOp::Add(a))]),
                token_timeline(&[(0, ExtOp::Add(b))]),
            ],
        );

        let anim = project(&lc);
        assert_eq!(anim.frames[0].items.len(), 2);
    }

    #[test]
    fn test_absent_container_emits_no_snapshot() {
        let block = Block::new("root").sized(20, 5);
        let child_block = Block::new("inner").at(0, 1).sized(4, 1);
        let mut self_ops = Timeline::new();
        for f in 0..4 {
            self_ops.insert(f, ExtOp::Nop(block.clone()));
        }
        let child = BlockLifecycle {
            self_ops: {
                let mut t = Timeline::new();
                t.insert(0, ExtOp::Add(child_block.clone()));
                t.insert(1, ExtOp::Del(child_block));
                t
            },
            tokens: vec![],
            decorations: vec![],
            children: vec![],
        };
        let lc = BlockLifecycle {
            self_ops,
            tokens: vec![],
            decorations: vec![],
            children: vec![child],
        };

        let anim = project(&lc);
        assert_eq!(anim.frames[0].children.len(), 1);
        assert_eq!(anim.frames[1].children.len(), 0);
        assert_eq!(anim.frames[3].children.len(), 0);
    }

    #[test]
    fn test_json_shape() {
        let tok = Token::new("x", "ident", 3, 1);
        let lc = lifecycle(1, vec![token_timeline(&[(0, ExtOp::Add(tok))])]);

        let anim = project(&lc);
        let json = serde_json::to_value(&anim).unwrap();
        assert!(json["templates"].is_object());
        assert_eq!(json["frames"].as_array().unwrap().len(), 1);
        let frame = &json["frames"][0];
        assert_eq!(frame["rect"]["visible"], serde_json::Value::Bool(true));
    }
}
