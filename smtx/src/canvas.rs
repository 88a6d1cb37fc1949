//! The canvas tree: a slab of rectangles laid out recursively.
//!
//! Each node can own up to two children: one appended "below" (child 0,
//! created by the horizontal-split key) and one appended "to the right"
//! (child 1, created by the vertical-split key). A node's own rectangle is
//! `split[0]` of its height and `split[1]` of its width; the remainder in
//! each dimension is handed to the corresponding child. Chaining repeated
//! splits in the same direction grows a column or a row of canvases rather
//! than subdividing the focused leaf directly.

use crate::pty::PtyId;

pub type CanvasId = usize;

/// Which edge a split grows toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDir {
    /// Child 0: appended below, full width.
    Horizontal,
    /// Child 1: appended to the right, full height.
    Vertical,
}

impl SplitDir {
    fn slot(self) -> usize {
        match self {
            SplitDir::Horizontal => 0,
            SplitDir::Vertical => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub y: u16,
    pub x: u16,
    pub h: u16,
    pub w: u16,
}

#[derive(Debug)]
pub struct Canvas {
    pub rect: Rect,
    /// Scroll offset into the bound pty's pad.
    pub offset: (u16, u16),
    pub pty: Option<PtyId>,
    pub parent: Option<CanvasId>,
    pub children: [Option<CanvasId>; 2],
    /// Fraction of height (`split[0]`) / width (`split[1]`) this node keeps
    /// for itself; the remainder goes to `children[0]` / `children[1]`.
    pub split: [f64; 2],
    /// Direction this node was created along, used by `balance` to find the
    /// chain of siblings to equalize.
    pub chain_dir: Option<SplitDir>,
    pub manual_scroll: bool,
}

impl Canvas {
    fn leaf(parent: Option<CanvasId>, chain_dir: Option<SplitDir>) -> Self {
        Self {
            rect: Rect { y: 0, x: 0, h: 0, w: 0 },
            offset: (0, 0),
            pty: None,
            parent,
            children: [None, None],
            split: [1.0, 1.0],
            chain_dir,
            manual_scroll: false,
        }
    }
}

/// A slab-backed tree of canvases. Freed slots are never reused mid-session
/// (ids stay stable for the life of the process), matching the spec's
/// "stable indices" guidance for an arena in an ownership-strict language.
#[derive(Debug, Default)]
pub struct CanvasTree {
    nodes: Vec<Option<Canvas>>,
    pub root: Option<CanvasId>,
    pub focused: Option<CanvasId>,
    /// Depth at which the tree is truncated for display (`v` key). `None`
    /// means unlimited: the whole tree is drawn.
    pub display_level: Option<usize>,
}

impl CanvasTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: CanvasId) -> Option<&Canvas> {
        self.nodes.get(id).and_then(|c| c.as_ref())
    }

    pub fn get_mut(&mut self, id: CanvasId) -> Option<&mut Canvas> {
        self.nodes.get_mut(id).and_then(|c| c.as_mut())
    }

    fn insert(&mut self, canvas: Canvas) -> CanvasId {
        self.nodes.push(Some(canvas));
        self.nodes.len() - 1
    }

    /// Create the very first canvas. No-op if the tree already has a root.
    pub fn init_root(&mut self) -> CanvasId {
        if let Some(root) = self.root {
            return root;
        }
        let id = self.insert(Canvas::leaf(None, None));
        self.root = Some(id);
        self.focused = Some(id);
        id
    }

    /// `create`: walk to the end of the chain along `dir` starting at `from`
    /// (or the root if `from` is `None`), append `count` new leaves, and
    /// return the id of the last one created.
    pub fn create(&mut self, from: Option<CanvasId>, dir: SplitDir, count: usize) -> Option<CanvasId> {
        let mut n = from.or(self.root)?;
        let slot = dir.slot();
        while let Some(child) = self.get(n).unwrap().children[slot] {
            n = child;
        }

        let mut last = n;
        for _ in 0..count.max(1) {
            let leaf = Canvas::leaf(Some(last), Some(dir));
            let id = self.insert(leaf);
            self.get_mut(last).unwrap().children[slot] = Some(id);
            last = id;
        }
        self.balance(last);
        Some(last)
    }

    /// `balance`: walk from `n` back toward the root while the chain stays
    /// in the same direction and child slot, setting each node's split
    /// fraction for that dimension to `1/k`, `k` increasing per step away
    /// from `n`. The deepest node ends up keeping all of the remainder
    /// (`1.0`); each ancestor divides progressively, yielding equal shares
    /// across the whole chain.
    pub fn balance(&mut self, n: CanvasId) {
        let dir = match self.get(n).and_then(|c| c.chain_dir) {
            Some(dir) => dir,
            None => return,
        };
        let slot = dir.slot();

        let mut chain = vec![n];
        let mut cur = n;
        while let Some(parent) = self.get(cur).and_then(|c| c.parent) {
            let is_chain_link = self.get(parent).unwrap().children[slot] == Some(cur)
                && self.get(cur).unwrap().chain_dir == Some(dir);
            if !is_chain_link {
                break;
            }
            chain.push(parent);
            cur = parent;
        }

        for (i, id) in chain.into_iter().enumerate() {
            // Node closest to `n` (i == 0) is the deepest: split = 1/1.
            let fraction = 1.0 / (i + 1) as f64;
            self.get_mut(id).unwrap().split[slot] = fraction;
        }
    }

    /// Recursively assign rectangles, starting at depth 0.
    pub fn reshape(&mut self, id: CanvasId, y: u16, x: u16, h: u16, w: u16) {
        self.reshape_at(id, y, x, h, w, 0);
    }

    /// Assign `id`'s rectangle, then recurse into its children one level
    /// deeper — unless `level` has already reached `display_level`, in
    /// which case `id` keeps the whole rect and its children are left
    /// untouched (and so unreachable from `draw`, which walks the same cap).
    fn reshape_at(&mut self, id: CanvasId, y: u16, x: u16, h: u16, w: u16, level: usize) {
        if self.display_level.is_some_and(|cap| level >= cap) {
            self.get_mut(id).unwrap().rect = Rect { y, x, h, w };
            return;
        }

        let (children, split) = {
            let c = self.get_mut(id).unwrap();
            c.rect = Rect { y, x, h, w };
            (c.children, c.split)
        };

        let h1 = (f64::from(h) * split[0]).round() as u16;
        let h1 = h1.min(h);
        if let Some(c0) = children[0] {
            let ch = h.saturating_sub(h1);
            self.reshape_at(c0, y + h1, x, ch, w, level + 1);
        }

        let has_right = children[1].is_some();
        let divider = u16::from(has_right);
        let w1 = (f64::from(w) * split[1]).round() as u16;
        let w1 = w1.min(w.saturating_sub(divider));
        if let Some(c1) = children[1] {
            let cw = w.saturating_sub(w1 + divider);
            self.reshape_at(c1, y, x + w1 + divider, h, cw, level + 1);
        }

        // This node's own rect shrinks to the part it kept for itself.
        self.get_mut(id).unwrap().rect = Rect { y, x, h: h1.max(1).min(h.max(1)), w: w1.max(1).min(w.max(1)) };
    }

    /// Depth-first pre-order search for the canvas whose bound pty has `id`.
    pub fn find_by_pty(&self, pty: PtyId) -> Option<CanvasId> {
        fn walk(tree: &CanvasTree, id: CanvasId, pty: PtyId) -> Option<CanvasId> {
            let c = tree.get(id)?;
            if c.pty == Some(pty) {
                return Some(id);
            }
            for child in c.children.into_iter().flatten() {
                if let Some(found) = walk(tree, child, pty) {
                    return Some(found);
                }
            }
            None
        }
        self.root.and_then(|root| walk(self, root, pty))
    }

    /// Find the leaf whose rectangle contains `(y, x)`.
    pub fn find_by_coord(&self, y: u16, x: u16) -> Option<CanvasId> {
        fn walk(tree: &CanvasTree, id: CanvasId, y: u16, x: u16) -> Option<CanvasId> {
            let c = tree.get(id)?;
            let r = c.rect;
            if y < r.y || y >= r.y + r.h || x < r.x || x >= r.x + r.w {
                return None;
            }
            for child in c.children.into_iter().flatten() {
                if let Some(found) = walk(tree, child, y, x) {
                    return Some(found);
                }
            }
            Some(id)
        }
        self.root.and_then(|root| walk(self, root, y, x))
    }

    /// `prune`: remove leaf `x`. Splices a single surviving child into the
    /// parent slot, or clears the slot (and resets the parent's split for
    /// that dimension to 1.0) if `x` has no children. Returns the id that
    /// should receive focus afterward.
    pub fn prune(&mut self, id: CanvasId) -> Option<CanvasId> {
        let parent = self.get(id).and_then(|c| c.parent);
        let children = self.get(id).map(|c| c.children).unwrap_or([None, None]);
        let survivor = children[0].or(children[1]);

        let Some(parent_id) = parent else {
            // Pruning the root: promote a surviving child to root, if any.
            self.root = survivor;
            if let Some(s) = survivor {
                self.get_mut(s).unwrap().parent = None;
            }
            self.remove(id);
            self.focused = self.root;
            return self.root;
        };

        let slot = self.get(parent_id).unwrap().children.iter().position(|c| *c == Some(id)).unwrap();
        self.get_mut(parent_id).unwrap().children[slot] = survivor;
        if let Some(s) = survivor {
            self.get_mut(s).unwrap().parent = Some(parent_id);
        } else {
            self.get_mut(parent_id).unwrap().split[slot] = 1.0;
        }
        self.remove(id);

        let new_focus = survivor.unwrap_or(parent_id);
        self.focused = Some(new_focus);
        Some(new_focus)
    }

    fn remove(&mut self, id: CanvasId) {
        if let Some(slot) = self.nodes.get_mut(id) {
            *slot = None;
        }
    }

    /// `swap`: exchange the bound ptys of two canvases.
    pub fn swap(&mut self, a: CanvasId, b: CanvasId) {
        let pa = self.get(a).and_then(|c| c.pty);
        let pb = self.get(b).and_then(|c| c.pty);
        self.get_mut(a).unwrap().pty = pb;
        self.get_mut(b).unwrap().pty = pa;
    }

    /// Move focus one step in `dir` from the currently focused canvas: the
    /// first leaf whose rectangle lies just beyond the current canvas's
    /// edge in that direction.
    pub fn mov(&mut self, dir: Direction) -> Option<CanvasId> {
        let cur = self.focused?;
        let r = self.get(cur)?.rect;
        let probe = match dir {
            Direction::Up => (r.y.checked_sub(1)?, r.x),
            Direction::Down => (r.y + r.h, r.x),
            Direction::Left => (r.y, r.x.checked_sub(1)?),
            Direction::Right => (r.y, r.x + r.w),
        };
        let found = self.find_by_coord(probe.0, probe.1)?;
        self.focused = Some(found);
        Some(found)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}
