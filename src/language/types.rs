//! Blocks and the parse tree they are assembled into

use std::path::Path;
use std::sync::Arc;

use crate::signatures::Signature;

/// One source line, with its original line number for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

impl Line {
    pub fn new(number: usize, text: impl Into<String>) -> Line {
        Line {
            number,
            text: text.into(),
        }
    }
}

/// Index of a block within its Tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Block {
    pub number: usize,
    pub lines: Vec<Line>,
    pub children: Option<Vec<NodeId>>,
    pub signature: Signature,
    pub signed: bool,
    pub extended: bool,
    pub start: bool,
    pub end: bool,
    pub write_children: bool,
    pub trailing: usize,
    pub translated: bool,
    pub translation: Option<String>,
    /// Set for blocks read from an included file.
    pub file: Option<Arc<Path>>,
}

impl Block {
    pub fn new(number: usize, signature: Signature) -> Block {
        Block {
            number,
            lines: Vec::new(),
            children: None,
            signature,
            signed: false,
            extended: false,
            start: false,
            end: false,
            write_children: true,
            trailing: 0,
            translated: false,
            translation: None,
            file: None,
        }
    }

    /// A marker closing the current nesting level.
    pub fn end(number: usize) -> Block {
        let mut block = Block::new(number, Signature::raw());
        block.signed = true;
        block.end = true;
        block
    }

    /// A block whose output is fixed text, used to frame the children of
    /// wrapping signatures.
    pub fn fixed(text: impl Into<String>) -> Block {
        let mut block = Block::new(0, Signature::raw());
        block.signed = true;
        block.translated = true;
        block.translation = Some(text.into());
        block
    }

    pub fn push(&mut self, number: usize, text: impl Into<String>) {
        self.lines
            .push(Line::new(number, text));
    }

    pub fn is_parent(&self) -> bool {
        self.children
            .is_some()
    }

    pub fn first(&self) -> &str {
        self.lines
            .first()
            .map(|line| line.text.as_str())
            .unwrap_or("")
    }

    /// The lines joined with newlines, without a trailing newline.
    pub fn text(&self) -> String {
        self.text_from(0)
    }

    pub fn text_from(&self, start: usize) -> String {
        self.lines
            .iter()
            .skip(start)
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// As text() but with each line trimmed.
    pub fn trimmed(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.text
                    .trim()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Line number of the first line with the given text, falling back to
    /// the block's starting line.
    pub fn number_of(&self, text: &str) -> usize {
        self.lines
            .iter()
            .find(|line| line.text == text)
            .map(|line| line.number)
            .unwrap_or(self.number)
    }

    /// The lines, each folded at a space so as to be no wider than `wrap`
    /// columns, newline terminated. Zero means no folding.
    pub fn wrapped(&self, wrap: usize, trailing: bool) -> String {
        let mut result = String::new();
        for line in &self.lines {
            fold(wrap, &line.text, &mut result);
        }
        if trailing {
            for _ in 0..self.trailing {
                result.push('\n');
            }
        }
        result
    }
}

fn fold(wrap: usize, line: &str, result: &mut String) {
    if wrap < 1 {
        result.push_str(line);
        result.push('\n');
        return;
    }

    let mut rest = line;
    loop {
        if wrap > rest.len() {
            result.push_str(rest);
            result.push('\n');
            return;
        }
        let limit = (0..=wrap)
            .rev()
            .find(|i| rest.is_char_boundary(*i))
            .unwrap_or(0);
        match rest[..limit]
            .rfind(' ')
            .or_else(|| {
                if rest[limit..].starts_with(' ') {
                    Some(limit)
                } else {
                    None
                }
            }) {
            Some(n) => {
                result.push_str(&rest[..n]);
                result.push('\n');
                rest = &rest[n + 1..];
                if rest.is_empty() {
                    return;
                }
            }
            None => {
                result.push_str(rest);
                result.push('\n');
                return;
            }
        }
    }
}

/// Arena of blocks. Node zero is the synthetic root.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Block>,
}

impl Tree {
    pub fn new() -> Tree {
        let mut root = Block::new(0, Signature::raw());
        root.signed = true;
        root.children = Some(Vec::new());
        Tree { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add(&mut self, block: Block) -> NodeId {
        self.nodes
            .push(block);
        NodeId(
            self.nodes
                .len()
                - 1,
        )
    }

    pub fn block(&self, id: NodeId) -> &Block {
        &self.nodes[id.0]
    }

    pub fn block_mut(&mut self, id: NodeId) -> &mut Block {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].children {
            Some(children) => children,
            None => &[],
        }
    }

    /// Append a child, turning a leaf into a parent if need be.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0]
            .children
            .get_or_insert_with(Vec::new)
            .push(child);
    }

    pub fn set_children(&mut self, id: NodeId, children: Option<Vec<NodeId>>) {
        self.nodes[id.0].children = children;
    }

    pub fn take_children(&mut self, id: NodeId) -> Option<Vec<NodeId>> {
        self.nodes[id.0]
            .children
            .take()
    }

    /// Surround the children of a block with two fixed blocks.
    pub fn wrap_children(&mut self, id: NodeId, prelude: &str, coda: &str) {
        let mut children = self
            .take_children(id)
            .unwrap_or_default();
        if !prelude.is_empty() {
            let first = self.add(Block::fixed(prelude));
            children.insert(0, first);
        }
        if !coda.is_empty() {
            let last = self.add(Block::fixed(coda));
            children.push(last);
        }
        self.set_children(id, Some(children));
    }

    /// The lines of a block followed by those of its immediate children,
    /// blank lines between them preserved.
    pub fn wrapped(&self, id: NodeId, wrap: usize) -> String {
        let block = self.block(id);
        let children = self.children(id);
        if !block.is_parent() {
            return block.wrapped(wrap, false);
        }

        let mut result = block.wrapped(wrap, true);
        if let Some((last, rest)) = children.split_last() {
            for child in rest {
                result.push_str(
                    &self
                        .block(*child)
                        .wrapped(wrap, true),
                );
            }
            result.push_str(
                &self
                    .block(*last)
                    .wrapped(wrap, false),
            );
        }
        result
    }

    pub fn len(&self) -> usize {
        self.nodes
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes
            .len()
            == 1
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}
