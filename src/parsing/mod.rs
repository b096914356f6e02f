//! Reading Xilize source into blocks and assembling them into a tree

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::language::{Block, TranslationError};
use crate::translation::Context;

mod assembler;
mod reader;
mod signing;

pub use assembler::assemble;
pub use reader::{Markers, RawBlock, Reader};
pub use signing::{is_abbreviation, sign, unsigned, Signed};

/// Deepest nesting of include directives followed.
const MAX_INCLUDE_DEPTH: usize = 16;

/// Read a file and return an owned String.
pub fn load(filename: &Path) -> Result<String, TranslationError> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            Err(TranslationError::Io(filename.to_path_buf(), error))
        }
    }
}

/// The reader markers as currently configured.
pub fn markers(ctx: &Context) -> Markers {
    Markers {
        comment: ctx.value("_LineCommentString_"),
        start: ctx.value("_BlockStartString_"),
        end: ctx.value("_BlockEndString_"),
        spaces_per_tab: ctx.number("_SpacesPerTab_", 1),
    }
}

/// Read text into signed blocks. Immediate directives are carried out as
/// they are met, and included files read in their place.
pub fn read(ctx: &mut Context, content: &str) -> Vec<Block> {
    let reader = Reader::new(content, markers(ctx));
    let mut blocks = Vec::new();

    for raw in reader {
        let block = make(ctx, raw);
        if block.end {
            blocks.push(block);
            continue;
        }
        if ctx.is_true("_DebugReportRawBlocks_") {
            ctx.report(block.number, synopsis(&block));
        }
        if block
            .signature
            .is_immediate()
        {
            let mut signature = block
                .signature
                .clone();
            blocks.extend(signature.run(ctx, &block));
        } else {
            blocks.push(block);
        }
    }

    debug!("Read {} blocks from {}", blocks.len(), ctx.path.display());
    blocks
}

/// Read a file's blocks for inclusion. Diagnostics raised while reading
/// name the included file.
pub fn read_file(ctx: &mut Context, path: &Path) -> Result<Vec<Block>, TranslationError> {
    if ctx.depth >= MAX_INCLUDE_DEPTH {
        return Err(TranslationError::Recursion(path.to_path_buf()));
    }
    let content = load(path)?;

    ctx.depth += 1;
    let mut blocks = ctx.within(Some(path), |ctx| read(ctx, &content));
    ctx.depth -= 1;

    let file: Arc<Path> = Arc::from(path);
    for block in &mut blocks {
        if block
            .file
            .is_none()
        {
            block.file = Some(file.clone());
        }
    }
    Ok(blocks)
}

/// Turn a raw block into a block, signing its first line.
fn make(ctx: &mut Context, raw: RawBlock) -> Block {
    if raw.end {
        return Block::end(raw.number);
    }

    let mut lines = raw
        .lines
        .into_iter();
    let Some(first) = lines.next() else {
        return Block::new(raw.number, unsigned(ctx, "").signature);
    };

    let signed = sign(ctx, first.number, &first.text);
    let mut block = Block::new(raw.number, signed.signature);
    block.signed = signed.signed;
    block.extended = signed.extended;
    block.start = raw.start;
    block.trailing = raw.trailing;
    if let Some(text) = signed.text {
        block.push(first.number, text);
    }
    block
        .lines
        .extend(lines);
    block
}

/// One line describing a block, for debugging.
fn synopsis(block: &Block) -> String {
    let mut first: String = block
        .first()
        .chars()
        .take(40)
        .collect();
    if first.len()
        < block
            .first()
            .len()
    {
        first.push_str("...");
    }
    format!(
        "{}{}{} [lines={}:{}] {}",
        block
            .signature
            .name,
        block
            .signature
            .modifiers
            .source(),
        if block.extended { ".." } else { "." },
        block
            .lines
            .len(),
        block.trailing,
        first
    )
}
