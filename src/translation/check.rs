//! Helpers for unit tests that need a translation context.

use std::path::Path;

use super::*;
use crate::language::Tree;
use crate::parsing;
use crate::scope::{install, Scopes};
use crate::script::Expressions;

/// A context for a file scope below a root seeded with the defaults.
pub(crate) fn context() -> Context {
    let mut scopes = Scopes::new();
    let root = scopes.root("root");
    install(&mut scopes, root);
    let file = scopes.child(root, "test.xil");
    Context::new(scopes, file, Path::new("test.xil"), Box::new(Expressions::new()))
}

/// Run text through every phase, without prolog or epilog.
pub(crate) fn run(ctx: &mut Context, text: &str) -> String {
    let blocks = parsing::read(ctx, text);
    let mut tree: Tree = parsing::assemble(ctx, blocks);
    exec(ctx, &mut tree);
    translate(ctx, &mut tree);
    translate_last(ctx, &mut tree);
    write(&tree)
}

/// Translate a fragment in a fresh context.
pub(crate) fn fragment(text: &str) -> String {
    run(&mut context(), text)
}

#[test]
fn phases_in_order() {
    let mut ctx = context();
    let output = run(&mut ctx, "define. greeting hello\n\np. ${greeting} world\n");
    assert_eq!(output, "<p>hello world</p>\n\n");
}

#[test]
fn extended_blocks_translate_each_claimed_block() {
    let output = fragment("p.. one\n\ntwo\n\nh2. three\n");
    assert_eq!(output, "<p>one</p>\n<p>two</p>\n\n<h2>three</h2>\n\n");
}

#[test]
fn missing_include_is_an_error() {
    let mut ctx = context();
    let output = run(&mut ctx, "include. /nonexistent/part.xil\n");
    assert_eq!(output, "");
    assert_eq!(
        ctx.problems
            .errors(),
        1
    );
}
