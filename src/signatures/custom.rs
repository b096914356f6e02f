use std::path::PathBuf;

use tracing::debug;

use crate::inline;
use crate::language::{Block, NodeId, Tree};
use crate::script::ScriptError;
use crate::translation::Context;

/// A signature defined in a document by a `signature.` directive: a name
/// made of letters, then code run for each block carrying it.
#[derive(Debug)]
pub struct Custom {
    pub name: String,
    pub code: String,
    /// Source line of the first line of code.
    pub line: usize,
    pub file: PathBuf,
}

impl Custom {
    pub fn define(ctx: &mut Context, block: &Block) -> Result<Custom, String> {
        let name = inline::keys_and_macros(ctx, block.number, block.first());
        let name = name.trim();
        if name.is_empty() {
            return Err("custom signature name missing".to_string());
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphabetic())
        {
            return Err("custom signature name may contain only letters".to_string());
        }

        let code = block
            .lines
            .iter()
            .skip(1)
            .map(|line| {
                line.text
                    .trim()
            })
            .collect::<Vec<_>>()
            .join("\n");
        let line = block
            .lines
            .get(1)
            .map(|line| line.number)
            .unwrap_or(block.number);

        debug!("Custom signature {} defined at line {}", name, line);
        Ok(Custom {
            name: name.to_string(),
            code,
            line,
            file: ctx
                .path
                .clone(),
        })
    }
}

/// Run a custom signature's code with `text`, `html`, `name` and `line`
/// bound.
pub fn run_custom(
    ctx: &mut Context,
    custom: &Custom,
    line: usize,
    text: &str,
    html: &str,
) -> Result<String, ScriptError> {
    ctx.bind("text", text);
    ctx.bind("html", html);
    ctx.bind("name", &custom.name);
    ctx.bind("line", &line.to_string());
    ctx.within(Some(&custom.file), |ctx| ctx.evaluate(custom.line, &custom.code))
}

pub(super) fn translate(custom: &Custom, ctx: &mut Context, tree: &Tree, id: NodeId) -> Option<String> {
    let block = tree.block(id);
    let number = block.number;
    let text = block.text();
    let html = inline::markup(ctx, number, &text);

    match run_custom(ctx, custom, number, &text, &html) {
        Ok(result) => Some(result),
        Err(error) => {
            // the failure belongs to the code, the consequence to the block
            ctx.within(Some(&custom.file), |ctx| {
                ctx.error(
                    custom.line + error.line.saturating_sub(1),
                    error
                        .message
                        .clone(),
                )
            });
            ctx.error(number, "custom signature translation failed");
            None
        }
    }
}
