//! Tables of contents. On translation a listener is attached to the scope
//! so that headings translated afterwards are collected; the list itself is
//! rendered in the last phase.

use tracing::debug;

use super::{render_list, Signature};
use crate::catalog::Toc;
use crate::language::{Line, NodeId, Tree};
use crate::translation::Context;

/// `toc. [min [max [*|#]]]`
pub(super) fn translate(
    sig: &mut Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
) -> Option<String> {
    let block = tree.block(id);
    let number = block.number;
    let text = block.text();

    let mut min = 1;
    let mut max = 6;
    let mut marker = '*';

    match regex!(r"^ *(?:(\d)(?: +(\d)(?: +([*#]))?)?)? *$").captures(&text) {
        Some(captures) => {
            if let Some(m) = captures.get(1) {
                min = m
                    .as_str()
                    .parse()
                    .unwrap_or(min);
            }
            if let Some(m) = captures.get(2) {
                max = m
                    .as_str()
                    .parse()
                    .unwrap_or(max);
            }
            if let Some(m) = captures.get(3) {
                marker = m
                    .as_str()
                    .chars()
                    .next()
                    .unwrap_or(marker);
            }
        }
        None => ctx.error(number, "invalid TOC specification, using defaults"),
    }

    debug!("Table of contents for levels {} to {}", min, max);
    let handle = ctx
        .catalog
        .add(Toc::new(min, max, marker));
    ctx.scopes
        .listen(ctx.scope, handle);
    sig.listener = Some(handle);
    None
}

pub(super) fn translate_last(
    sig: &mut Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
) -> Option<String> {
    let number = tree
        .block(id)
        .number;
    let lines: Vec<Line> = sig
        .listener
        .and_then(|handle| {
            ctx.catalog
                .listener(handle)
        })
        .map(|toc| toc.lines())
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, text)| Line::new(number + i, text))
        .collect();

    if lines.is_empty() {
        ctx.warning(number, "TOC is empty");
        return Some(String::new());
    }

    let list = render_list(ctx, &lines);
    sig.modifiers
        .set_default_class("toc");
    Some(sig.insert(&list))
}
