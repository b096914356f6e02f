//! Signatures framing their content, or the translations of their child
//! blocks, in fixed tags.

use super::{translate_children, Kind, Signature, Template};
use crate::inline;
use crate::language::{NodeId, Tree};
use crate::translation::{translate_node, Context};

/// With children, translate them and put the tags around them. Without,
/// mark up the block's own lines, unless children are required.
pub(super) fn parent(
    sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
    open: &str,
    close: &str,
    required: bool,
) -> Option<String> {
    let block = tree.block(id);
    let number = block.number;

    if !block.is_parent() {
        if required {
            ctx.error(number, format!("'{}' requires child blocks", sig.name));
            return None;
        }
        let text = block.text();
        return Some(format!(
            "{}{}{}",
            sig.insert(open),
            inline::markup(ctx, number, &text),
            close
        ));
    }

    translate_children(ctx, tree, id);
    tree.wrap_children(id, &sig.insert(open), close);
    None
}

/// As a parent, except childless content is put in a paragraph.
pub(super) fn blockquote(
    sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
) -> Option<String> {
    let first = sig.insert("<blockquote>");
    let block = tree.block(id);
    let number = block.number;

    if !block.is_parent() {
        let text = block.trimmed();
        return Some(format!(
            "{}<p>{}</p></blockquote>",
            first,
            inline::markup(ctx, number, &text)
        ));
    }

    translate_children(ctx, tree, id);
    tree.wrap_children(id, &first, "</blockquote>");
    None
}

/// Preformatted text keeps its line breaks and leading whitespace. Child
/// blocks are taken as more lines of the same text, blank lines between
/// them kept.
pub(super) fn preformatted(
    sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
    open: &str,
    close: &str,
    escape_only: bool,
) -> Option<String> {
    tree.block_mut(id)
        .write_children = false;
    let number = tree
        .block(id)
        .number;

    let mut wrap = 0;
    if ctx.is_defined("_PreStringWrap_") {
        match ctx
            .value("_PreStringWrap_")
            .trim()
            .parse::<usize>()
        {
            Ok(n) => wrap = n,
            Err(_) => ctx.warning(
                number,
                "_PreStringWrap_ key is set to something that is not a number",
            ),
        }
    }

    let text = tree.wrapped(id, wrap);
    let body = if escape_only {
        inline::escape(&text)
    } else {
        inline::markup_keep(ctx, number, &text)
    };
    Some(format!("{}{}{}", sig.insert(open), body, close))
}

/// Re-sign each child and translate it; the block's own lines get the
/// given treatment.
fn resign_children(ctx: &mut Context, tree: &mut Tree, id: NodeId, template: &Template) {
    let children = tree
        .children(id)
        .to_vec();
    for child in children {
        tree.block_mut(child)
            .signature = template.configure("");
        translate_node(ctx, tree, child);
    }
}

pub(super) fn keys_and_macros(
    _sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
) -> Option<String> {
    if tree
        .block(id)
        .is_parent()
    {
        resign_children(ctx, tree, id, &Template::new("km", Kind::KeysMacros));
    }
    let block = tree.block(id);
    let number = block.number;
    let text = block.text();
    Some(inline::keys_and_macros(ctx, number, &text))
}

pub(super) fn inline_only(
    _sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
) -> Option<String> {
    if tree
        .block(id)
        .is_parent()
    {
        resign_children(ctx, tree, id, &Template::new("imo", Kind::InlineOnly));
    }
    let block = tree.block(id);
    let number = block.number;
    let text = block.trimmed();
    Some(inline::markup(ctx, number, &text))
}
