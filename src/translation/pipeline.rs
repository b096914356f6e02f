//! The four phases run over an assembled tree: exec, translate,
//! translateLast and write. Each completes over the whole tree before the
//! next begins.

use tracing::debug;

use crate::language::{NodeId, Tree};

use super::Context;

/// Run directives, pre-order, visiting whatever children a block is left
/// with once its own directive has acted.
pub fn exec(ctx: &mut Context, tree: &mut Tree) {
    let children = tree
        .children(tree.root())
        .to_vec();
    for child in children {
        exec_node(ctx, tree, child);
    }
}

fn exec_node(ctx: &mut Context, tree: &mut Tree, id: NodeId) {
    let file = tree
        .block(id)
        .file
        .clone();
    ctx.within(file.as_deref(), |ctx| {
        let mut signature = tree
            .block(id)
            .signature
            .clone();
        signature.exec(ctx, tree, id);
        tree.block_mut(id)
            .signature = signature;
    });

    let children = tree
        .children(id)
        .to_vec();
    for child in children {
        exec_node(ctx, tree, child);
    }
}

pub fn translate(ctx: &mut Context, tree: &mut Tree) {
    let children = tree
        .children(tree.root())
        .to_vec();
    for child in children {
        translate_node(ctx, tree, child);
    }
}

/// Translate one block, once. The blocks an extended block claimed are
/// translated after it, each on its own.
pub fn translate_node(ctx: &mut Context, tree: &mut Tree, id: NodeId) {
    if tree
        .block(id)
        .translated
    {
        return;
    }

    let block = tree.block(id);
    let file = block
        .file
        .clone();
    let extended = block.extended;

    let claimed = ctx.within(file.as_deref(), |ctx| {
        let claimed = if extended {
            tree.take_children(id)
        } else {
            None
        };

        let mut signature = tree
            .block(id)
            .signature
            .clone();
        let translation = signature.translate(ctx, tree, id);

        let block = tree.block_mut(id);
        block.signature = signature;
        block.translation = translation;
        block.translated = true;
        claimed
    });

    if let Some(claimed) = claimed {
        tree.set_children(id, Some(claimed.clone()));
        for child in claimed {
            translate_node(ctx, tree, child);
        }
        return;
    }

    let block = tree.block(id);
    if block.write_children && block.is_parent() {
        let children = tree
            .children(id)
            .to_vec();
        for child in children {
            translate_node(ctx, tree, child);
        }
    }
}

/// For the top level blocks with no translation yet, a last chance to
/// produce one from state gathered over the whole document.
pub fn translate_last(ctx: &mut Context, tree: &mut Tree) {
    let children = tree
        .children(tree.root())
        .to_vec();
    for id in children {
        if tree
            .block(id)
            .translation
            .is_some()
        {
            continue;
        }
        let file = tree
            .block(id)
            .file
            .clone();
        ctx.within(file.as_deref(), |ctx| {
            let mut signature = tree
                .block(id)
                .signature
                .clone();
            let translation = signature.translate_last(ctx, tree, id);
            let block = tree.block_mut(id);
            block.signature = signature;
            if translation.is_some() {
                block.translation = translation;
            }
        });
    }
}

/// Serialize the tree, one top level block after another, each followed by
/// a blank line.
pub fn write(tree: &Tree) -> String {
    let mut out = String::new();
    let children = tree.children(tree.root());
    debug!("Writing {} top level blocks", children.len());
    for child in children {
        write_node(tree, *child, &mut out);
        out.push('\n');
    }
    out
}

/// Write a block: its children if they are to be written, else its own
/// translation. Signatures that fold their children into the translation
/// turn `write_children` off.
pub fn write_node(tree: &Tree, id: NodeId, out: &mut String) {
    let block = tree.block(id);
    if block.extended {
        if let Some(translation) = &block.translation {
            out.push_str(translation);
            out.push('\n');
        }
        for child in tree.children(id) {
            write_node(tree, *child, out);
        }
        return;
    }

    if block.write_children && block.is_parent() {
        for child in tree.children(id) {
            write_node(tree, *child, out);
        }
    } else if let Some(translation) = &block.translation {
        out.push_str(translation);
        out.push('\n');
    }
}
