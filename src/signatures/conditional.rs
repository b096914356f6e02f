//! `if.`, `ifdef.` and `ifndef.` prune their children during the exec
//! phase, before anything is translated.

use tracing::debug;

use super::{Kind, Signature};
use crate::inline;
use crate::language::{NodeId, Tree};
use crate::parsing;
use crate::scope::is_truthy;
use crate::translation::Context;

/// Keep the children up to a trailing `else.` block when the condition
/// holds; otherwise keep only the children of that `else.` block.
fn prune(tree: &mut Tree, id: NodeId, condition: bool) {
    let children = tree
        .children(id)
        .to_vec();
    let otherwise = children
        .last()
        .copied()
        .filter(|last| {
            matches!(
                tree.block(*last)
                    .signature
                    .kind,
                Kind::Else
            )
        });

    match (condition, otherwise) {
        (true, Some(_)) => {
            let mut kept = children;
            kept.pop();
            tree.set_children(id, Some(kept));
        }
        (true, None) => {}
        (false, Some(last)) => {
            let replacement = tree.take_children(last);
            tree.set_children(id, replacement);
        }
        (false, None) => tree.set_children(id, None),
    }
}

pub(super) fn exec_if(ctx: &mut Context, tree: &mut Tree, id: NodeId) {
    let block = tree.block(id);
    let number = block.number;
    if !block.is_parent() {
        ctx.error(number, "child blocks required (used when condition is true)");
        return;
    }

    let code = inline::keys_and_macros(ctx, number, &block.text());
    let condition = match ctx.evaluate(number, &code) {
        Ok(result) => is_truthy(&result),
        Err(error) => {
            ctx.error(
                number + error.line.saturating_sub(1),
                format!("if. condition failed: {}", error.message),
            );
            false
        }
    };
    debug!("if. at line {} is {}", number, condition);
    prune(tree, id, condition);
}

/// With children, keep them (or the `else.` children) by whether the key
/// named is defined. Without, `ifdef. key text` re-signs the block from
/// `text` when the condition holds.
pub(super) fn exec_defined(
    sig: &mut Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
    negate: bool,
) {
    let block = tree.block(id);
    let number = block.number;

    if block.is_parent() {
        let key = block.trimmed();
        let condition = ctx.is_defined(&key) != negate;
        prune(tree, id, condition);
        return;
    }

    let first = block
        .first()
        .to_string();
    let Some(captures) = regex!(r"^ *(\S+) +(.*)$").captures(&first) else {
        ctx.error(number, "must have key and text for true condition");
        return;
    };
    if ctx.is_defined(&captures[1]) == negate {
        return;
    }

    let signed = parsing::sign(ctx, number, &captures[2]);
    *sig = signed.signature;
    let block = tree.block_mut(id);
    block.signed = signed.signed;
    match signed.text {
        Some(text) if !block
            .lines
            .is_empty() =>
        {
            block.lines[0].text = text
        }
        Some(text) => block.push(number, text),
        None => {
            if !block
                .lines
                .is_empty()
            {
                block
                    .lines
                    .remove(0);
            }
        }
    }
    sig.exec(ctx, tree, id);
}
