use super::*;
use crate::problem::Severity;
use crate::translation::check::context;

fn translate(text: &str) -> String {
    markup(&mut context(), 1, text)
}

#[test]
fn plain_text_escaped() {
    assert_eq!(translate("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    assert_eq!(translate("fish &amp; chips &#169;"), "fish &amp; chips &#169;");
}

#[test]
fn phrase_markers() {
    assert_eq!(translate("_em_"), "<em>em</em>");
    assert_eq!(translate("*strong*"), "<strong>strong</strong>");
    assert_eq!(translate("**b**"), "<b>b</b>");
    assert_eq!(translate("__i__"), "<i>i</i>");
    assert_eq!(translate("??cite??"), "<cite>cite</cite>");
    assert_eq!(translate("x ^2^ and H ~2~ O"), "x <sup>2</sup> and H <sub>2</sub> O");
    assert_eq!(translate("a -gone- b"), "a <del>gone</del> b");
    assert_eq!(translate("a +new+ b"), "a <ins>new</ins> b");
}

#[test]
fn adjacent_phrases_stay_separate() {
    assert_eq!(translate("_a_ _b_"), "<em>a</em> <em>b</em>");
    assert_eq!(translate("one *two* three."), "one <strong>two</strong> three.");
}

#[test]
fn embedded_phrases() {
    assert_eq!(translate("un[*believe*]able"), "un<strong>believe</strong>able");
}

#[test]
fn literal_and_code_are_opaque() {
    assert_eq!(translate("@*not bold*@"), "<code>*not bold*</code>");
    assert_eq!(translate("==*raw* <b>=="), "*raw* <b>");
    assert_eq!(translate("see [@a<b@] now"), "see <code>a&lt;b</code> now");
}

#[test]
fn existing_html_passes_through() {
    assert_eq!(
        translate("<em>already</em> & more"),
        "<em>already</em> &amp; more"
    );
    assert_eq!(translate("<!-- note --> x"), "<!-- note --> x");
}

#[test]
fn links() {
    assert_eq!(
        translate("\"Home\":http://x.com"),
        "<a href=\"http://x.com\">Home</a>"
    );
    assert_eq!(
        translate("go \"Home (top)\":http://x.com."),
        "go <a href=\"http://x.com\" title=\"top\">Home</a>."
    );
    assert_eq!(
        translate("x[\"here\":/a]y"),
        "x<a href=\"/a\">here</a>y"
    );
}

#[test]
fn abbreviated_links() {
    let mut ctx = context();
    ctx.scopes
        .abbreviate(ctx.scope, "home", "http://x.com/");
    assert_eq!(
        markup(&mut ctx, 1, "\"Home\":home"),
        "<a href=\"http://x.com/\">Home</a>"
    );
}

#[test]
fn images() {
    assert_eq!(translate("!a.png!"), "<img src=\"a.png\" />");
    assert_eq!(
        translate("!a.png (logo)!"),
        "<img src=\"a.png\" alt=\"logo\" title=\"logo\" />"
    );
    assert_eq!(
        translate("!> a.png!"),
        "<img src=\"a.png\" style=\"float:right;\" />"
    );
    assert_eq!(
        translate("!a.png!:http://x.com"),
        "<a href=\"http://x.com\"><img src=\"a.png\" /></a>"
    );
}

#[test]
fn spans() {
    assert_eq!(translate("a %red% b"), "a <span>red</span> b");
    assert_eq!(
        translate("a %(hot) red% b"),
        "a <span class=\"hot\">red</span> b"
    );
}

#[test]
fn footnote_marks() {
    assert_eq!(
        translate("fact[1]"),
        "fact<a class=\"fn_mark\" id=\"fnmk1\" href=\"#fn1\">1</a>"
    );

    let mut ctx = context();
    ctx.scopes
        .define(ctx.scope, "_FootnoteStyle_", "classic");
    assert_eq!(
        markup(&mut ctx, 1, "fact[2]"),
        "fact<sup><a class=\"fn_mark\" id=\"fnmk2\" href=\"#fn2\">2</a></sup>"
    );
}

#[test]
fn acronyms() {
    assert_eq!(
        translate("NASA(National Aeronautics and Space Administration)"),
        "<acronym title=\"National Aeronautics and Space Administration\"><span class=\"caps\">NASA</span></acronym>"
    );
    assert_eq!(translate("the CPU runs"), "the <span class=\"caps\">CPU</span> runs");
}

#[test]
fn character_entities() {
    assert_eq!(translate("a -- b"), "a &#8212; b");
    assert_eq!(translate("1 - 2"), "1 &#8211; 2");
    assert_eq!(translate("Xilize(tm)"), "Xilize&#8482;");
    assert_eq!(translate("(c) 2006"), "&#169; 2006");
}

#[test]
fn line_breaks() {
    assert_eq!(translate("one\ntwo"), "one<br />\ntwo");
    assert_eq!(markup_keep(&mut context(), 1, "one\ntwo"), "one\ntwo");
}

#[test]
fn keys_substituted() {
    let mut ctx = context();
    ctx.scopes
        .define(ctx.scope, "who", "world");
    assert_eq!(markup(&mut ctx, 1, "hello ${who}"), "hello world");
    assert_eq!(markup(&mut ctx, 1, "hello ${nobody}"), "hello ${nobody}");
}

#[test]
fn macros_evaluated() {
    let mut ctx = context();
    assert_eq!(markup(&mut ctx, 1, "&{1 + 2} items"), "3 items");
    assert_eq!(markup(&mut ctx, 1, "&{upper: loud}"), "LOUD");
    assert_eq!(
        keys_and_macros(&mut ctx, 1, "&{literal:*x*}"),
        "*x*"
    );
}

#[test]
fn macro_failure_reported() {
    let mut ctx = context();
    let result = markup(&mut ctx, 4, "x &{nosuch(1)} y");
    assert_eq!(result, "x !!MACRO ERROR!! y");
    assert_eq!(
        ctx.problems
            .errors(),
        1
    );
    let messages = ctx
        .problems
        .messages(Severity::Error);
    assert!(messages[0].contains("unknown function"));
}
