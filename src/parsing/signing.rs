//! Resolving the signature a block's first line carries.

use crate::language::MODIFIERS;
use crate::signatures::{Kind, Signature, Template};
use crate::translation::Context;

/// The outcome of signing a first line.
#[derive(Debug, Clone)]
pub struct Signed {
    pub signature: Signature,
    /// What remains of the line as the block's first line of content, if
    /// anything.
    pub text: Option<String>,
    pub signed: bool,
    pub extended: bool,
}

impl Signed {
    fn new(signature: Signature, text: Option<String>) -> Signed {
        Signed {
            signature,
            text,
            signed: true,
            extended: false,
        }
    }
}

/// Sign a line. Named signatures are tried first, then the `*`, `#` and
/// `|` shorthands, then URL abbreviations; failing those the line belongs
/// to an unsigned block.
pub fn sign(ctx: &mut Context, number: usize, line: &str) -> Signed {
    if let Some(signed) = named(ctx, number, line) {
        return signed;
    }
    if let Some(signed) = symbol(line) {
        return signed;
    }
    if is_abbreviation(line) {
        return Signed::new(Signature::abbreviation(), Some(line.to_string()));
    }
    unsigned(ctx, line)
}

/// The signature given to blocks without one.
pub fn unsigned(ctx: &mut Context, line: &str) -> Signed {
    let name = ctx.value("_UnsignedBlockSigName_");
    let template = ctx
        .signature(&name)
        .unwrap_or_else(|| Template::new("anonymous", Kind::Anonymous));
    Signed {
        signature: template.configure(""),
        text: Some(line.to_string()),
        signed: false,
        extended: false,
    }
}

fn named(ctx: &mut Context, number: usize, line: &str) -> Option<Signed> {
    let pattern = regex!(&format!(
        r"^\s*(?P<name>\w+)(?P<mods>{})(?P<dots>\.\.|\.)(?:$| (?P<text>.*))$",
        MODIFIERS
    ));
    let captures = pattern.captures(line)?;
    let name = &captures["name"];
    let mods = &captures["mods"];
    let dots = &captures["dots"];

    // numbered paragraphs such as "1. text" are not signatures
    if regex!(r"^\d+$").is_match(name) {
        return None;
    }

    let signature = match regex!(r"^fn(\d+)$").captures(name) {
        Some(footnote) => Signature::footnote(&footnote[1], mods),
        None => match ctx.signature(name) {
            Some(template) => template.configure(mods),
            None => {
                if !ctx.is_defined("_NoWarnOnLooksLikeSig_") {
                    ctx.warning(
                        number,
                        format!("\"{}{}{}\" looks like a signature", name, mods, dots),
                    );
                }
                return None;
            }
        },
    };

    Some(Signed {
        signature,
        text: captures
            .name("text")
            .map(|text| {
                text.as_str()
                    .to_string()
            }),
        signed: true,
        extended: dots.len() == 2,
    })
}

/// Lines starting with list or table markers keep their whole text, which
/// the list or table reads its own modifiers from.
fn symbol(line: &str) -> Option<Signed> {
    let pattern = regex!(&format!(
        r"^ *(?P<mods>{m})(?P<symbol>\*+|#+|\|)(?:{m})(?: *$| .*$)",
        m = MODIFIERS
    ));
    let captures = pattern.captures(line)?;
    let signature = match &captures["symbol"][..1] {
        "|" => Template::new("table", Kind::Table).configure(""),
        _ => Signature::list(""),
    };
    Some(Signed::new(signature, Some(line.to_string())))
}

pub fn is_abbreviation(line: &str) -> bool {
    regex!(r"^ *\[(\w[a-zA-Z0-9_.-]+)\] *(\S+)$").is_match(line)
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::problem::Severity;
    use crate::translation::check::context;

    #[test]
    fn named_signatures() {
        let mut ctx = context();
        let signed = sign(&mut ctx, 1, "h2(intro). Getting started");
        assert!(signed.signed);
        assert!(!signed.extended);
        assert_eq!(signed.signature.name, "h2");
        assert_eq!(
            signed
                .signature
                .modifiers
                .class,
            "intro"
        );
        assert_eq!(signed.text, Some("Getting started".to_string()));
    }

    #[test]
    fn signature_without_text() {
        let mut ctx = context();
        let signed = sign(&mut ctx, 1, "bc.");
        assert_eq!(signed.signature.name, "bc");
        assert_eq!(signed.text, None);
    }

    #[test]
    fn extended_signature() {
        let mut ctx = context();
        let signed = sign(&mut ctx, 1, "pre.. one");
        assert!(signed.extended);
        assert_eq!(signed.text, Some("one".to_string()));
    }

    #[test]
    fn numbers_are_not_signatures() {
        let mut ctx = context();
        let signed = sign(&mut ctx, 1, "1. first");
        assert!(!signed.signed);
        assert_eq!(signed.signature.name, "anonymous");
        assert_eq!(signed.text, Some("1. first".to_string()));
    }

    #[test]
    fn footnotes() {
        let mut ctx = context();
        let signed = sign(&mut ctx, 1, "fn3. The source.");
        assert!(matches!(signed.signature.kind, Kind::Footnote(ref n) if n == "3"));
        assert_eq!(signed.text, Some("The source.".to_string()));
    }

    #[test]
    fn unknown_names_warn() {
        let mut ctx = context();
        let signed = sign(&mut ctx, 4, "Note. this is not one");
        assert!(!signed.signed);
        assert_eq!(
            ctx.problems
                .messages(Severity::Warning),
            vec!["\"Note.\" looks like a signature"]
        );

        ctx.define(1, "_NoWarnOnLooksLikeSig_", "true");
        sign(&mut ctx, 5, "Note. again");
        assert_eq!(
            ctx.problems
                .warnings(),
            1
        );
    }

    #[test]
    fn symbol_shorthands() {
        let mut ctx = context();
        let list = sign(&mut ctx, 1, "(big)# first");
        assert!(matches!(list.signature.kind, Kind::List));
        assert_eq!(list.text, Some("(big)# first".to_string()));

        let table = sign(&mut ctx, 1, "| a | b |");
        assert!(matches!(table.signature.kind, Kind::Table));

        let emphasis = sign(&mut ctx, 1, "*strong* words");
        assert!(!emphasis.signed);
    }

    #[test]
    fn abbreviation_lines() {
        let mut ctx = context();
        let signed = sign(&mut ctx, 1, "[home] http://example.com/");
        assert!(matches!(signed.signature.kind, Kind::Abbreviation));
    }
}
