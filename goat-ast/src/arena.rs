use goat_codegen::Config;

use crate::node::{Node, NodeKind};

/// The position of a [`Node`] within its owning [`Arena`].
///
/// Indices replace the raw pointers a non-arena-based tree would use:
/// because every node lives in the arena for the arena's entire lifetime,
/// an index is just as stable as a pointer would be, without the unsafe
/// aliasing concerns a pointer-based tree would carry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw zero-based value, for diagnostics.
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Owns every [`Node`] produced while building one AST.
///
/// Nodes are appended to a sequence of fixed-capacity chunks rather than one
/// contiguously-reallocated `Vec`: growing the arena never moves a
/// previously-allocated node, which matters once callers start handing out
/// [`NodeId`]s mid-build (the code builder and this arena are filled
/// concurrently during emission of function bodies). The whole tree is
/// released in one shot when the `Arena` is dropped; there is no per-node
/// destructor to run, so cycles and diamond-shaped sharing (the `Null`/
/// `True`/`False` singletons) are safe by construction.
pub struct Arena {
    chunks: Vec<Vec<Node>>,
    chunk_starts: Vec<u32>,
    chunk_capacity: usize,
    len: u32,
    null_id: NodeId,
    true_id: NodeId,
    false_id: NodeId,
}

impl Arena {
    /// Build an empty arena, pre-seeded with the per-arena `Null`/`True`/
    /// `False` singletons.
    ///
    /// Exactly one instance of each is required per process; inside safe
    /// Rust without global mutable state that collapses to one instance per
    /// `Arena`, which is what every node in a given compilation actually
    /// observes (see `DESIGN.md`).
    pub fn new(config: &Config) -> Self {
        let mut arena = Self {
            chunks: Vec::new(),
            chunk_starts: Vec::new(),
            chunk_capacity: config.arena_chunk_size.max(1),
            len: 0,
            null_id: NodeId::new(0),
            true_id: NodeId::new(0),
            false_id: NodeId::new(0),
        };
        arena.null_id = arena.alloc(NodeKind::Null);
        arena.true_id = arena.alloc(NodeKind::True);
        arena.false_id = arena.alloc(NodeKind::False);
        arena
    }

    /// The shared `Null` singleton for this arena.
    pub fn null(&self) -> NodeId {
        self.null_id
    }

    /// The shared `True` singleton for this arena.
    pub fn truth(&self) -> NodeId {
        self.true_id
    }

    /// The shared `False` singleton for this arena.
    pub fn falsity(&self) -> NodeId {
        self.false_id
    }

    /// Allocate a new node, returning a stable [`NodeId`] for it.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        if self
            .chunks
            .last()
            .map_or(true, |chunk| chunk.len() == self.chunk_capacity)
        {
            self.chunk_starts.push(self.len);
            self.chunks.push(Vec::with_capacity(self.chunk_capacity));
        }

        let id = NodeId::new(self.len);
        self.chunks.last_mut().expect("just pushed a chunk").push(Node::new(kind));
        self.len += 1;
        id
    }

    /// Number of nodes allocated so far, including the three singletons.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the arena holds only its three singletons.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn locate(&self, id: NodeId) -> (usize, usize) {
        let chunk = self.chunk_starts.partition_point(|&start| start <= id.0) - 1;
        (chunk, (id.0 - self.chunk_starts[chunk]) as usize)
    }

    /// Borrow a node by id.
    ///
    /// Panics if `id` was not produced by this arena; that can only happen
    /// through caller error (e.g. mixing ids from two compilations), never
    /// from user-supplied source text.
    pub fn get(&self, id: NodeId) -> &Node {
        let (chunk, offset) = self.locate(id);
        &self.chunks[chunk][offset]
    }

    /// The [`NodeKind`] a node holds, a shorthand for `self.get(id).kind()`.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        self.get(id).kind()
    }
}
