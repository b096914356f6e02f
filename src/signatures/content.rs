//! Signatures whose block translates directly into one element.

use tracing::debug;

use super::{translate_children, Kind, Signature};
use crate::catalog::Entry;
use crate::inline;
use crate::language::{NodeId, Tree};
use crate::templating::{self, Epilog, Page, Prolog};
use crate::translation::Context;

pub(super) fn anonymous(
    sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
) -> Option<String> {
    let number = tree
        .block(id)
        .number;
    let substitute = ctx.value("_UnsignedBlockSigSubstitute_");
    if !substitute.is_empty() {
        match ctx.signature(&substitute) {
            Some(template) if !matches!(template.kind, Kind::Anonymous) => {
                let mut replacement = template.configure(
                    sig.modifiers
                        .source(),
                );
                return replacement.translate(ctx, tree, id);
            }
            _ => ctx.warning(number, "_UnsignedBlockSigSubstitute_ is not defined"),
        }
    }
    Some(format!(
        "<p>{}</p>",
        tree.block(id)
            .text()
    ))
}

pub(super) fn paragraph(
    sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
) -> Option<String> {
    let block = tree.block(id);
    let number = block.number;
    let text = block.trimmed();
    if block.is_parent() {
        ctx.error(number, "'p' signature should not have child blocks");
        translate_children(ctx, tree, id);
    }
    Some(format!(
        "<p{}>{}</p>",
        sig.attributes(),
        inline::markup(ctx, number, &text)
    ))
}

pub(super) fn markup_comment(ctx: &mut Context, tree: &mut Tree, id: NodeId) -> Option<String> {
    tree.block_mut(id)
        .write_children = false;
    let number = tree
        .block(id)
        .number;
    let text = inline::keys_and_macros(ctx, number, &tree.wrapped(id, 0));
    Some(format!("<!-- {} -->", inline::escape(&text)))
}

pub(super) fn heading(
    sig: &mut Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
    level: usize,
) -> Option<String> {
    let block = tree.block(id);
    let number = block.number;
    let mut text = block.text();
    if block.is_parent() {
        ctx.error(number, "child blocks not allowed here, ignoring them");
        tree.block_mut(id)
            .write_children = false;
    }

    let listeners = ctx
        .scopes
        .listeners(ctx.scope);
    if ctx
        .catalog
        .interested(&listeners, level)
        && !sig
            .modifiers
            .has_id()
    {
        let unique = ctx
            .scopes
            .unique_id(ctx.scope);
        sig.modifiers
            .set_id(unique);
    }

    // `&{toc:text}` keeps the text in the heading, `&{tocEntry:text}`
    // removes it; either way it becomes the catalog entry.
    let found = regex!(r"&\{toc(Entry)?:([^}]+)\}")
        .captures(&text)
        .map(|captures| {
            let whole = captures
                .get(0)
                .map(|m| m.range())
                .unwrap_or(0..0);
            (
                whole,
                captures
                    .get(1)
                    .is_some(),
                captures[2].to_string(),
            )
        });

    let (translation, entry) = match found {
        Some((range, removed, content)) => {
            let entry = inline::markup(ctx, number, &content);
            let replacement = if removed { "" } else { content.as_str() };
            text.replace_range(range, replacement);
            (inline::markup(ctx, number, &text), entry)
        }
        None => {
            let translation = inline::markup(ctx, number, &text);
            (translation.clone(), translation)
        }
    };

    ctx.catalog
        .register(
            &listeners,
            Entry {
                id: sig
                    .modifiers
                    .id
                    .clone(),
                text: entry,
                level,
                extra: String::new(),
            },
        );

    Some(format!(
        "<h{level}{}>{}</h{level}>",
        sig.attributes(),
        translation
    ))
}

pub(super) fn clear(sig: &Signature, ctx: &mut Context, tree: &Tree, id: NodeId) -> Option<String> {
    let side = match sig
        .modifiers
        .source()
    {
        "" => "both",
        ">" => "right",
        "<" => "left",
        _ => {
            ctx.error(
                tree.block(id)
                    .number,
                "only '>' and '<' are valid signature modifiers here",
            );
            return Some(String::new());
        }
    };
    Some(format!("<div style=\"clear:{}\" ></div>", side))
}

/// The anchor a footnote's text starts with, linking back to its mark.
fn anchor(ctx: &Context, number: &str) -> String {
    let tag = format!(
        "<a class=\"fn_anchor\" href=\"#fnmk{}\">{}</a> ",
        number, number
    );
    if ctx.value("_FootnoteStyle_") == "modern" {
        tag
    } else {
        format!("<sup>{}</sup>", tag)
    }
}

/// A footnote becomes a paragraph with the footnote's id and class. With
/// child blocks, the first child becomes that paragraph.
pub(super) fn footnote(
    sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
    number: &str,
) -> Option<String> {
    let tag = anchor(ctx, number);
    let mut modifiers = sig
        .modifiers
        .clone();
    modifiers.set_id(format!("fn{}", number));
    modifiers.add_class("fn_note");
    let mut paragraph = Signature {
        name: "p".to_string(),
        kind: Kind::Paragraph,
        modifiers,
        listener: None,
    };

    let target = match tree
        .children(id)
        .first()
    {
        Some(first) => *first,
        None => id,
    };

    let block = tree.block_mut(target);
    if block
        .lines
        .is_empty()
    {
        let start = block.number;
        block.push(start, tag);
    } else {
        block.lines[0]
            .text
            .insert_str(0, &tag);
    }

    if target == id {
        return paragraph.translate(ctx, tree, id);
    }

    tree.block_mut(target)
        .signature = paragraph;
    translate_children(ctx, tree, id);
    None
}

pub(super) fn prolog(ctx: &mut Context, tree: &Tree, id: NodeId) -> Option<String> {
    let number = tree
        .block(id)
        .number;
    if ctx.is_defined("customProlog") {
        return Some(format!("{}\n", ctx.value("customProlog")));
    }
    if !ctx.is_true("prolog") {
        return Some(String::new());
    }

    let doctype = ctx.value("doctype");
    if Page::doctype(&doctype).is_none() {
        ctx.warning(number, format!("unknown doctype {}", doctype));
    }

    let page = Page::from_keys(|key| ctx.value(key));
    match templating::fill(&Prolog, &page) {
        Ok(text) => Some(text),
        Err(error) => {
            ctx.error(number, error.to_string());
            None
        }
    }
}

pub(super) fn epilog(ctx: &mut Context) -> Option<String> {
    if ctx.is_defined("customEpilog") {
        return Some(format!("{}\n", ctx.value("customEpilog")));
    }
    if !ctx.is_true("epilog") {
        return Some(String::new());
    }

    let page = Page::from_keys(|key| ctx.value(key));
    match templating::fill(&Epilog, &page) {
        Ok(text) => Some(text),
        Err(error) => {
            debug!("Epilog failed: {}", error);
            ctx.error(0, error.to_string());
            None
        }
    }
}
