//! Assembling the flat sequence of blocks into a tree. Start blocks open a
//! level that lasts until the matching end block; extended blocks claim the
//! unsigned blocks following them.

use tracing::debug;

use crate::language::{Block, NodeId, Tree};
use crate::translation::Context;

/// How deep start blocks may nest. The phases walk the tree recursively, so
/// starts beyond this are kept at the deepest level instead.
pub(crate) const MAX_NESTING: usize = 128;

/// The stack of open parents, above the root which is never closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Nesting {
    root: NodeId,
    stack: Vec<NodeId>,
    /// Starts refused for being too deep, still awaiting their ends.
    excess: usize,
}

impl Nesting {
    pub(crate) fn new(root: NodeId) -> Nesting {
        Nesting {
            root,
            stack: Vec::new(),
            excess: 0,
        }
    }

    pub(crate) fn current(&self) -> NodeId {
        match self
            .stack
            .last()
        {
            Some(id) => *id,
            None => self.root,
        }
    }

    /// Open a level under `id`, returning false if nesting is already at
    /// its limit.
    pub(crate) fn push(&mut self, id: NodeId) -> bool {
        if self.stack.len() >= MAX_NESTING {
            self.excess += 1;
            return false;
        }
        self.stack
            .push(id);
        true
    }

    /// Close the innermost level, returning false if only the root is open.
    pub(crate) fn pop(&mut self) -> bool {
        if self.excess > 0 {
            self.excess -= 1;
            return true;
        }
        self.stack
            .pop()
            .is_some()
    }

    /// Levels opened but not yet closed.
    pub(crate) fn open(&self) -> usize {
        self.stack
            .len()
            + self.excess
    }
}

pub fn assemble(ctx: &mut Context, blocks: Vec<Block>) -> Tree {
    let mut tree = Tree::new();
    let mut nesting = Nesting::new(tree.root());
    let mut blocks = blocks
        .into_iter()
        .peekable();
    let mut deep = false;

    while let Some(block) = blocks.next() {
        if block.end {
            if !nesting.pop() {
                ctx.warning(block.number, "end block without matching startblock");
            }
            continue;
        }

        let start = block.start;
        let number = block.number;
        let extended = block.extended && !start;
        let signature = block
            .signature
            .clone();

        let id = tree.add(block);
        tree.attach(nesting.current(), id);

        if start {
            if !nesting.push(id) && !deep {
                deep = true;
                ctx.error(
                    number,
                    format!("blocks nested more than {} levels deep", MAX_NESTING),
                );
            }
        } else if extended {
            while let Some(mut next) = blocks.next_if(|next| !next.signed && !next.start && !next.end) {
                next.signature = signature.clone();
                let child = tree.add(next);
                tree.attach(id, child);
            }
        }
    }

    let open = nesting.open();
    if open > 0 {
        ctx.warning(0, format!("{} more start blocks than end blocks", open));
    }

    debug!("Assembled {} blocks", tree.len() - 1);
    tree
}
