//! Inline markup: the ordered rewrite passes turning punctuation within a
//! block's text into XHTML.
//!
//! Passes run in a fixed order. Literal text, code, and markup that is
//! already HTML are swapped out for opaque keys early on and put back at
//! the very end, so nothing in between can touch them.

use ::regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::language::{Flavor, Modifiers};
use crate::regex::{replace, substitute, TERMINATOR};
use crate::translation::Context;

const KEY_OPEN: &str = "`xil%";
const KEY_CLOSE: &str = "%xil`";
const AMPERSAND: &str = "q%`q%";

/// Inserted in place of a macro that failed to evaluate.
pub const MACRO_ERROR: &str = "==!!MACRO ERROR!!==";

const TAG_NAMES: &str = "a|abbr|acronym|address|applet|area|b|base|basefont|bdo|big|blockquote|body|br|button|caption|center|cite|code|col|colgroup|dd|del|dfn|dir|div|dl|dt|em|fieldset|font|form|frame|frameset|h1|h2|h3|h4|h5|h6|head|hr|html|i|iframe|img|input|ins|isindex|kbd|label|legend|li|link|map|menu|meta|noframes|noscript|object|ol|optgroup|option|p|param|pre|q|s|samp|script|select|small|span|strike|strong|style|sub|sup|table|tbody|td|textarea|tfoot|th|thead|title|tr|tt|u|ul|var";

/// Image modifiers, matched before `<` and `>` are escaped.
const IMAGE_MODIFIERS: &str = r"(?:(?P<mods>(?:-|\^|~|<|>|\(+|\)+|\(\w*?(?:#\w+)?\)|\{\{[^{}\n]+\}\}|\{[^}\n]+\})+) )?";

/// Span modifiers, matched after `<` and `>` are escaped.
const SPAN_MODIFIERS: &str = r"(?:(?P<mods>(?:-|\^|~|&lt;|&gt;|\(+|\)+|\(\w*?(?:#\w+)?\)|\{\{[^{}\n]+\}\}|\{[^}\n]+\})+) )?";

const TITLE: &str = r"(?: *\((?P<title>[^)\n]+?)\))?";

/// Phrase markers and the elements they become. Longer markers come first
/// so that `__` is not taken as two `_`.
const PHRASES: &[(&str, &str)] = &[
    ("__", "i"),
    ("**", "b"),
    ("*", "strong"),
    ("_", "em"),
    ("??", "cite"),
    ("++", "big"),
    ("--", "small"),
    ("-", "del"),
    ("+", "ins"),
    ("~", "sub"),
    ("^", "sup"),
];

struct Phrase {
    marker: &'static str,
    embedded: String,
    tag: &'static str,
    bare_pattern: Regex,
    embedded_pattern: Regex,
}

fn phrases() -> &'static [Phrase] {
    static PHRASE_PATTERNS: OnceLock<Vec<Phrase>> = OnceLock::new();
    PHRASE_PATTERNS.get_or_init(|| {
        PHRASES
            .iter()
            .map(|&(marker, tag)| {
                let quoted = ::regex::escape(marker);
                let bare = format!(
                    r"(?sm)(?P<lead>^|\s|>|`){m}(?P<body>\S{{1,2}}|[\S&&[^_+*\-]].+?\S){m}{t}",
                    m = quoted,
                    t = TERMINATOR
                );
                let embedded = format!(r"(?s)\[{m}(?P<body>\S{{1,2}}|\S.+?\S){m}\]", m = quoted);
                Phrase {
                    marker,
                    embedded: format!("[{}", marker),
                    tag,
                    bare_pattern: Regex::new(&bare).unwrap_or_else(|e| panic!("{}", e)),
                    embedded_pattern: Regex::new(&embedded).unwrap_or_else(|e| panic!("{}", e)),
                }
            })
            .collect()
    })
}

fn existing_markup() -> &'static Regex {
    regex!(&{
        let html = format!(
            r#"<(?i:{n})(?:\s+\S+\s*?=\s*?".*?")*\s*?/?>|</(?i:{n})\s*?>"#,
            n = TAG_NAMES
        );
        let element = format!(r"(?:{}|<!--\s.*?\s-->|<\?xml.*?\?>|<!DOCTYPE\s.*?>)", html);
        format!(r"{e}(?:\s*{e})*", e = element)
    })
}

/// Replace `&`, `<` and `>` with their character entities.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('>', "&gt;")
        .replace('<', "&lt;")
}

/// Full inline markup, newlines becoming line breaks.
pub fn markup(ctx: &mut Context, line: usize, text: &str) -> String {
    Inline::new(ctx, line, false).translate(text)
}

/// Full inline markup, keeping newlines as they are.
pub fn markup_keep(ctx: &mut Context, line: usize, text: &str) -> String {
    Inline::new(ctx, line, true).translate(text)
}

/// Only substitute keys and evaluate macros.
pub fn keys_and_macros(ctx: &mut Context, line: usize, text: &str) -> String {
    let mut inline = Inline::new(ctx, line, true);
    let text = inline.keys(text);
    inline.macros(&text)
}

/// State for one run through the passes.
struct Inline<'c> {
    ctx: &'c mut Context,
    line: usize,
    keep: bool,
    snippets: Vec<String>,
}

impl<'c> Inline<'c> {
    fn new(ctx: &'c mut Context, line: usize, keep: bool) -> Inline<'c> {
        Inline {
            ctx,
            line,
            keep,
            snippets: Vec::new(),
        }
    }

    fn translate(&mut self, text: &str) -> String {
        let text = self.keys(text);
        let text = self.macros(&text);

        let text = self.protect(&text);
        let text = self.links(&text);
        let text = self.images(&text);
        let text = self.existing(&text);

        let text = replace(
            "&",
            regex!(r"&([a-zA-Z0-9]{2,8};|#\d{2,4};)"),
            &text,
            &format!("{}${{1}}", AMPERSAND),
        );
        let text = escape(&text).replace(AMPERSAND, "&");

        let text = self.phrases(&text);
        let text = self.existing(&text);
        let text = entities(&text);

        let text = self.restore(text);
        if self.keep {
            text
        } else {
            text.replace('\n', "<br />\n")
        }
    }

    fn store(&mut self, text: String) -> String {
        let key = format!(
            "{}{}{}",
            KEY_OPEN,
            self.snippets
                .len(),
            KEY_CLOSE
        );
        self.snippets
            .push(text);
        key
    }

    fn restore(&self, mut text: String) -> String {
        // a stored snippet may itself hold keys, but never more than once over
        for _ in 0..3 {
            if !text.contains(KEY_OPEN) {
                break;
            }
            text = regex!(r"`xil%(\d+)%xil`")
                .replace_all(&text, |c: &Captures| {
                    c[1].parse::<usize>()
                        .ok()
                        .and_then(|n| {
                            self.snippets
                                .get(n)
                        })
                        .cloned()
                        .unwrap_or_default()
                })
                .into_owned();
        }
        text
    }

    fn keys(&mut self, text: &str) -> String {
        let ctx = &*self.ctx;
        substitute(
            "${",
            regex!(r"\$\{([a-zA-Z_][a-zA-Z_0-9.-]*)\}"),
            text,
            |c| {
                if ctx.is_defined(&c[1]) {
                    ctx.value(&c[1])
                } else {
                    c[0].to_string()
                }
            },
        )
    }

    fn macros(&mut self, text: &str) -> String {
        let line = self.line;
        let ctx = &mut *self.ctx;
        substitute(
            "&{",
            regex!(r"(?s)&\{(?: *(?P<name>\w+) *: ?)?(?P<code>[^}]+)\}"),
            text,
            |c| {
                let name = c
                    .name("name")
                    .map(|m| m.as_str());
                match ctx.run_macro(line, name, &c["code"]) {
                    Ok(result) => result,
                    Err(error) => {
                        ctx.error(line, format!("macro error: {}", error));
                        MACRO_ERROR.to_string()
                    }
                }
            },
        )
    }

    /// Swap literal text, code, and existing HTML for keys.
    fn protect(&mut self, text: &str) -> String {
        let text = substitute(
            "==",
            regex!(&format!(r"(?sm)(?P<lead>^|\s)==(?P<body>\S|\S.*?\S)=={}", TERMINATOR)),
            text,
            |c| {
                let key = self.store(c["body"].to_string());
                format!("{}{}", &c["lead"], key)
            },
        );
        let text = substitute(
            "[==",
            regex!(r"(?s)\[==(?P<body>\S|\S.*?\S)==\]"),
            &text,
            |c| self.store(c["body"].to_string()),
        );
        let text = substitute(
            "@",
            regex!(&format!(r"(?s)(?P<lead>^|\s)@(?P<body>\S{{1,2}}|\S[^@]+?\S)@{}", TERMINATOR)),
            &text,
            |c| {
                let code = self.code(&c["body"]);
                let key = self.store(code);
                format!("{}{}", &c["lead"], key)
            },
        );
        let text = substitute(
            "[@",
            regex!(r"(?s)\[@(?P<body>.+?)@\]"),
            &text,
            |c| {
                let code = self.code(&c["body"]);
                self.store(code)
            },
        );
        self.existing(&text)
    }

    fn existing(&mut self, text: &str) -> String {
        substitute("<", existing_markup(), text, |c| self.store(c[0].to_string()))
    }

    fn code(&self, text: &str) -> String {
        let code = format!("<code>{}</code>", escape(text));
        if self.keep {
            code
        } else {
            code.replace('\n', "<br />")
        }
    }

    fn url(&self, text: &str) -> String {
        self.ctx
            .abbreviation(text)
            .unwrap_or_else(|| text.to_string())
    }

    fn anchor(&self, c: &Captures) -> String {
        let mut result = format!("<a href=\"{}\"", self.url(&c["url"]));
        if let Some(title) = c.name("title") {
            result.push_str(&format!(" title=\"{}\"", title.as_str()));
        }
        result.push_str(&format!(">{}</a>", &c["text"]));
        result
    }

    fn image(&self, c: &Captures) -> String {
        let mut result = format!("<img src=\"{}\"", self.url(&c["url"]));
        if let Some(alt) = c.name("title") {
            let alt = alt.as_str();
            result.push_str(&format!(" alt=\"{}\" title=\"{}\"", alt, alt));
        }
        if let Some(mods) = c.name("mods") {
            result.push_str(&Modifiers::parse(Flavor::Image, mods.as_str()).render());
        }
        result.push_str(" />");
        result
    }

    fn links(&mut self, text: &str) -> String {
        let text = substitute(
            "[\"",
            regex!(&format!(r#"(?s)\["(?P<text>[^(]+?){}":(?P<url>\S+?)\]"#, TITLE)),
            text,
            |c| self.anchor(c),
        );
        substitute(
            "\"",
            regex!(&format!(
                r#"(?sm)(?P<lead>^|[\s>`])"(?P<text>[^("]+?){}":(?P<url>\S+?){}"#,
                TITLE, TERMINATOR
            )),
            &text,
            |c| format!("{}{}", &c["lead"], self.anchor(c)),
        )
    }

    fn images(&mut self, text: &str) -> String {
        let text = substitute(
            "[!",
            regex!(&format!(r"(?s)\[!{}(?P<url>\S+?){}!\]", IMAGE_MODIFIERS, TITLE)),
            text,
            |c| self.image(c),
        );
        let text = substitute(
            "!",
            regex!(&format!(
                r"(?sm)(?P<lead>^|[\s>`])!{}(?P<url>\S+?){}!{}",
                IMAGE_MODIFIERS, TITLE, TERMINATOR
            )),
            &text,
            |c| format!("{}{}", &c["lead"], self.image(c)),
        );
        let text = substitute(
            "[!",
            regex!(&format!(
                r"(?s)\[!{}(?P<url>\S+?){}!:(?P<link>\S+?)\]",
                IMAGE_MODIFIERS, TITLE
            )),
            &text,
            |c| format!("<a href=\"{}\">{}</a>", self.url(&c["link"]), self.image(c)),
        );
        substitute(
            "!",
            regex!(&format!(
                r"(?sm)(?P<lead>^|[\s>`])!{}(?P<url>\S+?){}!:(?P<link>\S+?){}",
                IMAGE_MODIFIERS, TITLE, TERMINATOR
            )),
            &text,
            |c| {
                format!(
                    "{}<a href=\"{}\">{}</a>",
                    &c["lead"],
                    self.url(&c["link"]),
                    self.image(c)
                )
            },
        )
    }

    fn phrases(&mut self, text: &str) -> String {
        if text.len() < 3 {
            return text.to_string();
        }

        let span = |c: &Captures| {
            let attributes = match c.name("mods") {
                Some(mods) => {
                    let mods = mods
                        .as_str()
                        .replace("&gt;", ">")
                        .replace("&lt;", "<");
                    Modifiers::parse(Flavor::Signature, &mods).render()
                }
                None => String::new(),
            };
            format!("<span{}>{}</span>", attributes, &c["body"])
        };

        let text = substitute(
            "%",
            regex!(&format!(
                r"(?sm)(?P<lead>^|\s|>|`)%{}(?P<body>\S{{1,2}}|[\S&&[^_+*\-]].+?\S)%{}",
                SPAN_MODIFIERS, TERMINATOR
            )),
            text,
            |c| format!("{}{}", &c["lead"], span(c)),
        );
        let mut text = substitute(
            "[%",
            regex!(&format!(
                r"(?s)\[%{}(?P<body>\S{{1,2}}|[\S&&[^_+*\-]].+?)%\]",
                SPAN_MODIFIERS
            )),
            &text,
            span,
        );

        for phrase in phrases() {
            text = substitute(&phrase.embedded, &phrase.embedded_pattern, &text, |c| {
                format!("<{t}>{}</{t}>", &c["body"], t = phrase.tag)
            });
            text = substitute(phrase.marker, &phrase.bare_pattern, &text, |c| {
                format!("{}<{t}>{}</{t}>", &c["lead"], &c["body"], t = phrase.tag)
            });
        }

        let mark = r##"<a class="fn_mark" id="fnmk${1}" href="#fn${1}">${1}</a>"##;
        let text = if self.ctx.value("_FootnoteStyle_") == "modern" {
            replace("[", regex!(r"\[(\d+)\]"), &text, mark)
        } else {
            replace(
                "[",
                regex!(r"\[(\d+)\]"),
                &text,
                &format!("<sup>{}</sup>", mark),
            )
        };

        let text = regex!(r"\b([A-Z][A-Z0-9]{2,})\(([^)]+?)\)")
            .replace_all(
                &text,
                r#"<acronym title="${2}"><span class="caps">${1}</span></acronym>"#,
            )
            .into_owned();
        regex!(r"(\s|^)([A-Z][A-Z0-9]{2,})\b")
            .replace_all(&text, r#"${1}<span class="caps">${2}</span>"#)
            .into_owned()
    }
}

/// Convenience character entities: dashes, trademark, registered, and
/// copyright signs.
fn entities(text: &str) -> String {
    let text = regex!(r"(\s?)--(\s?)").replace_all(text, "${1}&#8212;${2}");
    let text = regex!(r"\s-\s").replace_all(&text, " &#8211; ");
    let text = regex!(r"\b( )?\((?:tm|TM)\)").replace_all(&text, "${1}&#8482;");
    let text = regex!(r"\b( )?\([rR]\)").replace_all(&text, "${1}&#174;");
    let text = regex!(r"(?:\A|\b)( )?\([cC]\)( )?(?:\b|\z)").replace_all(&text, "${1}&#169;${2}");
    text.into_owned()
}

#[cfg(test)]
mod check;
