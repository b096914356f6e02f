//! Directives change the environment later blocks are translated in. All
//! but `includeRaw.` act as soon as their block is read.

use std::sync::Arc;

use tracing::debug;

use super::{local_path, Custom, Kind, Signature, Template};
use crate::config;
use crate::inline;
use crate::language::{Block, NodeId, Tree};
use crate::parsing;
use crate::translation::Context;

fn put(ctx: &mut Context, line: usize, key: &str, value: &str, append: bool) {
    if append {
        let combined = format!("{}{}", ctx.value(key), value);
        ctx.define(line, key, &combined);
    } else {
        ctx.define(line, key, value);
    }
}

/// `define.` either names a key on its first line with the remaining lines
/// as the value, or has a key and value on each line.
pub(super) fn define(ctx: &mut Context, block: &Block, append: bool) {
    let first = block.first();
    if regex!(r"^\S+$").is_match(first) {
        if block
            .lines
            .len()
            > 1
        {
            let value = block.text_from(1);
            put(ctx, block.number, first, &value, append);
        } else {
            ctx.warning(block.number, "key without value");
        }
        return;
    }

    for line in &block.lines {
        let mut parts = regex!(r"\s+").splitn(
            line.text
                .trim_start(),
            2,
        );
        match (parts.next(), parts.next()) {
            (Some(key), Some(value)) if !key.is_empty() => {
                put(ctx, line.number, key, value, append)
            }
            _ => ctx.warning(line.number, "key and value required"),
        }
    }
}

pub(super) fn undefine(ctx: &mut Context, block: &Block) {
    let text = block.trimmed();
    let keys: Vec<&str> = text
        .split_whitespace()
        .collect();
    if keys.is_empty() {
        ctx.warning(block.number, "nothing to undefine");
        return;
    }
    for key in keys {
        ctx.undefine(key);
    }
}

/// Read the named files, relative to the current one, returning their
/// blocks to be read in place of this one.
pub(super) fn include(ctx: &mut Context, block: &Block) -> Vec<Block> {
    let names = inline::keys_and_macros(ctx, block.number, &block.trimmed());
    let names: Vec<&str> = names
        .split_whitespace()
        .collect();
    if names.is_empty() {
        ctx.warning(block.number, "nothing to include");
        return Vec::new();
    }

    let mut result = Vec::new();
    for name in names {
        let path = local_path(ctx, name);
        match parsing::read_file(ctx, &path) {
            Ok(blocks) => result.extend(blocks),
            Err(error) => ctx.error(
                block.number,
                format!("error reading include file: {}", error),
            ),
        }
    }
    result
}

/// The contents of the named files, verbatim.
pub(super) fn include_raw(ctx: &mut Context, tree: &Tree, id: NodeId) -> Option<String> {
    let block = tree.block(id);
    let number = block.number;
    let text = block.trimmed();
    let names: Vec<&str> = text
        .split_whitespace()
        .collect();
    if names.is_empty() {
        ctx.warning(number, "nothing to include");
        return Some(String::new());
    }

    let mut result = String::new();
    for name in names {
        let path = local_path(ctx, name);
        match parsing::load(&path) {
            Ok(content) => result.push_str(&content),
            Err(error) => {
                debug!("{}", error);
                ctx.error(number, "file read failed");
            }
        }
    }
    Some(result)
}

pub(super) fn property_file(ctx: &mut Context, block: &Block) {
    if block.is_parent() {
        ctx.warning(block.number, "this directive may not have child blocks");
        return;
    }

    let path = local_path(
        ctx,
        block
            .first()
            .trim(),
    );
    match config::load(&path) {
        Ok(definitions) => {
            for (key, value) in definitions {
                ctx.define(block.number, &key, &value);
            }
        }
        Err(error) => {
            debug!("{}", error);
            ctx.error(
                block.number,
                format!("loading property file {}", path.display()),
            );
        }
    }
}

/// Register a custom signature in the current scope.
pub(super) fn signature(ctx: &mut Context, block: &Block) {
    if block
        .lines
        .len()
        < 2
    {
        ctx.error(block.number, "signature must have at least two lines");
        return;
    }

    let custom = match Custom::define(ctx, block) {
        Ok(custom) => custom,
        Err(message) => {
            ctx.error(block.number, message);
            ctx.error(block.number, "custom signature ignored");
            return;
        }
    };

    let template = Template::new(
        custom
            .name
            .clone(),
        Kind::Custom(Arc::new(custom)),
    );
    match ctx
        .scopes
        .register(ctx.scope, template)
    {
        Ok(Some(replaced)) => {
            if ctx.is_true("_WarnOnSigOverride_") {
                ctx.warning(block.number, replaced.to_string());
            }
        }
        Ok(None) => {}
        Err(error) => ctx.error(block.number, error.to_string()),
    }
}

/// Attributes for the `<body>` tag, from the signature's modifiers.
pub(super) fn body(sig: &Signature, ctx: &mut Context) {
    ctx.scopes
        .define(ctx.scope, "_BodyTagAttributes_", &sig.attributes());
}

/// Lines of `[name] url`.
pub(super) fn abbreviation(ctx: &mut Context, block: &Block) {
    for line in &block.lines {
        match regex!(r"^ *\[(\w[a-zA-Z0-9_.-]+)\] *(\S+)$").captures(&line.text) {
            Some(captures) => ctx
                .scopes
                .abbreviate(ctx.scope, &captures[1], &captures[2]),
            None => ctx.warning(block.number, "skipping malformed URL abbreviation"),
        }
    }
}
