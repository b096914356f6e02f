use crate::problem::Severity;
use crate::translation::check::{context, fragment, run};

#[test]
fn unsigned_text_is_a_paragraph() {
    assert_eq!(fragment("just text"), "<p>just text</p>\n\n");
}

#[test]
fn headings() {
    assert_eq!(fragment("h1. Hello"), "<h1>Hello</h1>\n\n");
    assert_eq!(
        fragment("h3(intro). Getting started"),
        "<h3 class=\"intro\">Getting started</h3>\n\n"
    );
}

#[test]
fn simple_signatures() {
    assert_eq!(fragment("hr."), "<hr />\n\n");
    assert_eq!(fragment("raw. <b>as is</b>"), "<b>as is</b>\n\n");
    assert_eq!(fragment("xilcom. not for the reader"), "\n");
    assert_eq!(
        fragment("clear>."),
        "<div style=\"clear:right\" ></div>\n\n"
    );
    assert_eq!(fragment("divEnd."), "</div>\n\n");
}

#[test]
fn wrapping_children() {
    assert_eq!(
        fragment("div(box). {{\np. inside\n}}"),
        "<div class=\"box\">\n<p>inside</p>\n</div>\n\n"
    );
}

#[test]
fn structured_blocks_inside_a_wrapper_write_once() {
    let output = fragment("div(box). {{\n| a |\n\n* b\n}}");
    assert!(output.starts_with("<div class=\"box\">\n<table>\n"));
    assert!(output.contains("    <td>a</td>\n"));
    assert!(output.contains("</table>\n<ul>\n  <li>b</li>\n</ul>\n"));
    assert!(output.ends_with("</div>\n\n"));
    assert_eq!(
        output
            .matches("<table>")
            .count(),
        1
    );
    assert_eq!(
        output
            .matches("<li>")
            .count(),
        1
    );
}

#[test]
fn wrapping_requires_children() {
    let mut ctx = context();
    run(&mut ctx, "div. lonely");
    assert_eq!(
        ctx.problems
            .messages(Severity::Error),
        vec!["'div' requires child blocks"]
    );
}

#[test]
fn preformatted_keeps_lines() {
    assert_eq!(
        fragment("bcx. a < b\n  c"),
        "<pre><code>a &lt; b\n  c\n</code></pre>\n\n"
    );
}

#[test]
fn nested_lists() {
    assert_eq!(
        fragment("* a\n** b\n* c"),
        "<ul>\n  <li>a\n    <ul>\n      <li>b</li>\n    </ul>\n  </li>\n  <li>c</li>\n</ul>\n\n\n"
    );
}

#[test]
fn ordered_list_with_implied_level() {
    let output = fragment("## deep");
    assert_eq!(
        output,
        "<ol>\n  <li>\n    <ol>\n      <li>deep</li>\n    </ol>\n  </li>\n</ol>\n\n\n"
    );
}

#[test]
fn table_sections() {
    assert_eq!(
        fragment("_| Name | Age |\n| Ann | 30 |"),
        "<table>\n<thead>\n  <tr>\n    <td>Name</td>\n    <td>Age</td>\n  </tr>\n</thead>\n\
         <tbody>\n  <tr>\n    <td>Ann</td>\n    <td>30</td>\n  </tr>\n</tbody>\n</table>\n\n"
    );
}

#[test]
fn misplaced_rows_and_cells() {
    let mut ctx = context();
    run(&mut ctx, "row. x\n\ncell. y");
    assert_eq!(
        ctx.problems
            .errors(),
        2
    );
}

#[test]
fn malformed_table_row_is_an_error() {
    let mut ctx = context();
    run(&mut ctx, "table.\nnot a row\n|a|b");
    assert_eq!(
        ctx.problems
            .messages(Severity::Error),
        vec!["expecting a table row"]
    );
    assert_eq!(
        ctx.problems
            .warnings(),
        0
    );
}

#[test]
fn definition_lists() {
    assert_eq!(
        fragment("dl. term : first ; second"),
        "<dl>\n  <dt>term</dt>\n    <dd>first</dd>\n    <dd>second</dd>\n</dl>\n\n"
    );

    let mut ctx = context();
    run(&mut ctx, "dl. no separator here");
    assert_eq!(
        ctx.problems
            .messages(Severity::Error),
        vec!["too few parts in definition list"]
    );
}

#[test]
fn table_of_contents() {
    let output = fragment("toc.\n\nh1. One\n\nh2. Two");
    assert!(output.starts_with("<ul class=\"toc\">\n"));
    assert!(output.contains("<a href=\"#xil_1\">One</a>"));
    assert!(output.contains("<a href=\"#xil_2\">Two</a>"));
    assert!(output.contains("<h1 id=\"xil_1\">One</h1>"));
    assert!(output.contains("<h2 id=\"xil_2\">Two</h2>"));
}

#[test]
fn empty_table_of_contents_warns() {
    let mut ctx = context();
    let output = run(&mut ctx, "toc.\n\np. nothing to list");
    assert_eq!(
        ctx.problems
            .messages(Severity::Warning),
        vec!["TOC is empty"]
    );
    assert!(output.contains("<p>nothing to list</p>"));
}

#[test]
fn headings_before_the_toc_are_not_collected() {
    let output = fragment("h1. Early\n\ntoc.\n\nh1. Late");
    assert!(output.contains("<h1>Early</h1>"));
    assert!(!output.contains("href=\"#xil_1\">Early"));
    assert!(output.contains("<a href=\"#xil_1\">Late</a>"));
}

#[test]
fn footnotes() {
    let output = fragment("fn1. The source.");
    assert!(output.starts_with("<p class=\"fn_note\" id=\"fn1\">"));
    assert!(output.contains("href=\"#fnmk1\""));
    assert!(output.contains("The source."));
}

#[test]
fn conditional_takes_else_branch() {
    assert_eq!(
        fragment("if. 1 == 2 {{\np. yes\n\nelse. {{\np. no\n}}\n}}"),
        "<p>no</p>\n\n"
    );
    assert_eq!(
        fragment("if. 2 > 1 {{\np. yes\n\nelse. {{\np. no\n}}\n}}"),
        "<p>yes</p>\n\n"
    );
}

#[test]
fn conditional_without_else_drops_children() {
    assert_eq!(fragment("if. 1 == 2 {{\np. yes\n}}"), "\n");
}

#[test]
fn failed_condition_is_reported() {
    let mut ctx = context();
    run(&mut ctx, "if. (1 + {{\np. yes\n}}");
    let errors = ctx
        .problems
        .messages(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("if. condition failed"));
}

#[test]
fn definedness_resigns_leaf_blocks() {
    assert_eq!(
        fragment("ifdef. missing p. hidden\n\nifndef. missing p. shown"),
        "\n<p>shown</p>\n\n"
    );
}

#[test]
fn definedness_with_children() {
    assert_eq!(
        fragment("define. colour blue\n\nifdef. colour {{\np. ${colour}\n}}"),
        "<p>blue</p>\n\n"
    );
}

#[test]
fn custom_signatures() {
    assert_eq!(
        fragment("signature. shout\nupper(text)\n\nshout. hello"),
        "HELLO\n\n"
    );
}

#[test]
fn custom_signature_names_are_letters() {
    let mut ctx = context();
    run(&mut ctx, "signature. shout2\nupper(text)");
    assert_eq!(
        ctx.problems
            .messages(Severity::Error),
        vec![
            "custom signature name may contain only letters",
            "custom signature ignored"
        ]
    );
}

#[test]
fn overriding_a_native_signature_warns() {
    let mut ctx = context();
    run(&mut ctx, "signature. hr\n\"<hr/>\"");
    assert_eq!(
        ctx.problems
            .warnings(),
        1
    );
}

#[test]
fn defines_and_appends() {
    assert_eq!(
        fragment("define. name Ada\n\ndefadd. name -Lovelace\n\np. ${name}"),
        "<p>Ada-Lovelace</p>\n\n"
    );
}

#[test]
fn undefine_hides_value() {
    let mut ctx = context();
    run(&mut ctx, "define. colour blue\n\nundef. colour");
    assert!(!ctx.is_defined("colour"));
}

#[test]
fn abbreviations() {
    assert_eq!(
        fragment("[home] http://example.com/\n\np. \"Home\":home"),
        "<p><a href=\"http://example.com/\">Home</a></p>\n\n"
    );
}

#[test]
fn body_attributes() {
    let mut ctx = context();
    run(&mut ctx, "body(main).");
    assert_eq!(ctx.value("_BodyTagAttributes_"), " class=\"main\"");
}
