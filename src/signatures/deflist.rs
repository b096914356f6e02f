use super::Signature;
use crate::inline;
use crate::language::{NodeId, Tree};
use crate::translation::Context;

/// Each line is `term : term : definition ; definition`.
pub(super) fn translate(
    sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
) -> Option<String> {
    let lines = tree
        .block(id)
        .lines
        .clone();

    let mut out = format!("<dl{}>\n", sig.attributes());
    for line in &lines {
        let parts: Vec<&str> = regex!(r"\s+:\s+")
            .split(&line.text)
            .collect();
        let Some((definitions, terms)) = parts.split_last() else {
            continue;
        };
        if terms.is_empty() {
            ctx.error(line.number, "too few parts in definition list");
            continue;
        }

        for term in terms {
            out.push_str(&format!(
                "  <dt>{}</dt>\n",
                inline::markup(ctx, line.number, term)
            ));
        }
        for definition in regex!(r"\s+;\s+").split(definitions) {
            out.push_str(&format!(
                "    <dd>{}</dd>\n",
                inline::markup(ctx, line.number, definition)
            ));
        }
    }
    out.push_str("</dl>");
    Some(out)
}
