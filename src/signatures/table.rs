//! Tables, written either as `|` lines or as row and cell child blocks.

use super::{Kind, Signature, Template};
use crate::inline;
use crate::language::{Flavor, Line, Modifiers, NodeId, Tree, MODIFIERS};
use crate::translation::{translate_node, write_node, Context};

/// Rows sorted into their sections. Header rows before the first body row
/// go to the head, later ones to the foot.
#[derive(Default)]
struct Sections {
    closed: bool,
    head: Vec<String>,
    body: Vec<String>,
    foot: Vec<String>,
}

impl Sections {
    fn add(&mut self, header: bool, row: String) {
        if header {
            if self.closed {
                self.foot
                    .push(row);
            } else {
                self.head
                    .push(row);
            }
        } else {
            self.closed = true;
            self.body
                .push(row);
        }
    }

    fn write(&self, out: &mut String) {
        for (tag, rows) in [
            ("thead", &self.head),
            ("tfoot", &self.foot),
            ("tbody", &self.body),
        ] {
            if rows.is_empty() {
                continue;
            }
            out.push_str(&format!("<{}>\n", tag));
            for row in rows {
                out.push_str(row);
            }
            out.push_str(&format!("</{}>\n", tag));
        }
    }
}

pub(super) fn translate(
    sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
) -> Option<String> {
    tree.block_mut(id)
        .write_children = false;

    let columns = column_groups(&mut tree.block_mut(id).lines);
    let mut sections = Sections::default();

    if tree
        .block(id)
        .is_parent()
    {
        let children = tree
            .children(id)
            .to_vec();
        for child in children {
            if tree
                .block(child)
                .is_parent()
            {
                block_row(ctx, tree, child, &mut sections);
            } else if let Some(line) = tree
                .block(child)
                .lines
                .first()
                .cloned()
            {
                line_row(ctx, &line, &mut sections);
            }
        }
    } else {
        let lines = tree
            .block(id)
            .lines
            .clone();
        for line in &lines {
            line_row(ctx, line, &mut sections);
        }
    }

    let mut out = format!("<table{}>{}\n", sig.attributes(), columns);
    sections.write(&mut out);
    out.push_str("</table>");
    Some(out)
}

/// A row written on one line: optional row modifiers then `|` separated
/// cells, each with optional cell modifiers followed by a space.
fn line_row(ctx: &mut Context, line: &Line, sections: &mut Sections) {
    let row = regex!(&format!(r"^ *(?P<mods>{})(?P<cells>\|.*)$", MODIFIERS));
    let cell = regex!(&format!(r"\|(?:(?P<mods>{}) )? *(?P<text>[^|]*)", MODIFIERS));

    let Some(captures) = row.captures(&line.text) else {
        ctx.error(line.number, "expecting a table row");
        return;
    };
    let modifiers = Modifiers::parse(Flavor::Signature, &captures["mods"]);
    let cells = captures["cells"].to_string();

    let mut out = format!("  <tr{}>\n", modifiers.render());
    for found in cell.captures_iter(&cells) {
        let whole = found
            .get(0)
            .map(|m| m.as_str())
            .unwrap_or("");
        // a closing `|` does not start another cell
        if whole == "|"
            && found
                .get(0)
                .map(|m| m.end())
                == Some(cells.len())
        {
            continue;
        }
        let mods = Modifiers::parse(
            Flavor::Cell,
            found
                .name("mods")
                .map(|m| m.as_str())
                .unwrap_or(""),
        );
        out.push_str(&format!(
            "    <td{}>{}</td>\n",
            mods.render(),
            inline::markup(ctx, line.number, found["text"].trim())
        ));
    }
    out.push_str("  </tr>\n");
    sections.add(modifiers.header, out);
}

/// A row given as a child block whose own children are the cells.
fn block_row(ctx: &mut Context, tree: &mut Tree, id: NodeId, sections: &mut Sections) {
    let modifiers = tree
        .block(id)
        .signature
        .modifiers
        .clone();
    let mut out = format!("  <tr{}>\n", modifiers.render());
    let children = tree
        .children(id)
        .to_vec();
    for child in children {
        block_cell(ctx, tree, child, &mut out);
    }
    out.push_str("  </tr>\n");
    sections.add(modifiers.header, out);
}

/// A cell given as a block. Unsigned text and `cell.` blocks get inline
/// markup only; anything else is translated as itself.
fn block_cell(ctx: &mut Context, tree: &mut Tree, id: NodeId, out: &mut String) {
    let unsigned = ctx.value("_UnsignedBlockSigName_");
    let block = tree.block(id);
    let attributes = block
        .signature
        .attributes();
    out.push_str(&format!("    <td{}>\n", attributes));

    if block.is_parent() {
        let children = tree
            .children(id)
            .to_vec();
        for child in children {
            translate_node(ctx, tree, child);
            write_node(tree, child, out);
        }
    } else {
        if block
            .signature
            .name
            == unsigned
            || matches!(
                block
                    .signature
                    .kind,
                Kind::Cell
            )
        {
            tree.block_mut(id)
                .signature = Template::new("imo", Kind::InlineOnly).configure("");
        }
        translate_node(ctx, tree, id);
        write_node(tree, id, out);
    }
    out.push_str("    </td>\n");
}

/// Column groups given by a leading `&{columns:` line, one group per line
/// until a line with only `}`. The lines are consumed.
fn column_groups(lines: &mut Vec<Line>) -> String {
    let starts = lines
        .first()
        .map(|line| {
            line.text
                .starts_with("&{columns:")
        })
        .unwrap_or(false);
    if !starts {
        return String::new();
    }
    lines.remove(0);

    let mut out = String::new();
    while !lines.is_empty() {
        let line = lines.remove(0);
        let text = line.text;
        if regex!(r"^ *\} *$").is_match(&text) {
            break;
        }

        match text.find('|') {
            None => {
                out.push_str("\n<colgroup");
                out.push_str(&column_modifiers(&text));
                out.push_str(" />");
            }
            Some(n) => {
                out.push_str("\n<colgroup");
                if n > 0 {
                    out.push_str(&column_modifiers(&text[..n]));
                }
                out.push_str(">\n");
                for col in text[n + 1..].split('|') {
                    out.push_str("  <col");
                    if !col
                        .trim()
                        .is_empty()
                    {
                        out.push_str(&column_modifiers(col));
                    }
                    out.push_str(" />\n");
                }
                out.push_str("</colgroup>");
            }
        }
    }
    out
}

/// Attributes for a column or column group: modifiers optionally followed
/// by a width such as `30%`, `2*` or `*`.
fn column_modifiers(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let whole = regex!(r"^(?:\d+[*%]?|\*)$");
    let trailing = regex!(r" +(\d+[*%]?|\*)$");

    let (mods, width) = if whole.is_match(text) {
        ("", Some(text))
    } else if let Some(captures) = trailing.captures(text) {
        let start = captures
            .get(0)
            .map(|m| m.start())
            .unwrap_or(text.len());
        (
            text[..start].trim(),
            captures
                .get(1)
                .map(|m| m.as_str()),
        )
    } else {
        (text, None)
    };

    Modifiers::column(mods, width).render()
}
