//! Ordered and unordered lists from `*` and `#` lines, nested by the number
//! of markers.

use super::Signature;
use crate::inline;
use crate::language::{Flavor, Line, Modifiers, NodeId, Tree, MODIFIERS};
use crate::translation::Context;

struct Item {
    modifiers: Modifiers,
    text: String,
    sublist: Option<List>,
}

struct List {
    level: usize,
    ordered: bool,
    modifiers: Modifiers,
    items: Vec<Item>,
}

impl List {
    fn new(level: usize, ordered: bool, modifiers: Modifiers) -> List {
        List {
            level,
            ordered,
            modifiers,
            items: Vec::new(),
        }
    }

    /// Hang a nested list off the last item, making an empty item for it
    /// if there are none yet.
    fn nest(&mut self, list: List) {
        if self
            .items
            .is_empty()
        {
            self.items
                .push(Item {
                    modifiers: Modifiers::empty(Flavor::Signature),
                    text: String::new(),
                    sublist: None,
                });
        }
        if let Some(last) = self
            .items
            .last_mut()
        {
            last.sublist = Some(list);
        }
    }

    fn write(&self, indent: usize, out: &mut String) {
        let tag = if self.ordered { "ol" } else { "ul" };
        out.push_str(&"  ".repeat(indent));
        out.push('<');
        out.push_str(tag);
        out.push_str(
            &self
                .modifiers
                .render(),
        );
        out.push_str(">\n");
        for item in &self.items {
            item.write(indent + 1, out);
        }
        out.push_str(&"  ".repeat(indent));
        out.push_str("</");
        out.push_str(tag);
        out.push_str(">\n");
    }
}

impl Item {
    fn write(&self, indent: usize, out: &mut String) {
        out.push_str(&"  ".repeat(indent));
        out.push_str("<li");
        out.push_str(
            &self
                .modifiers
                .render(),
        );
        out.push('>');
        out.push_str(&self.text);
        if let Some(sublist) = &self.sublist {
            out.push('\n');
            sublist.write(indent + 1, out);
            out.push_str(&"  ".repeat(indent));
        }
        out.push_str("</li>\n");
    }
}

pub(super) fn translate(
    _sig: &Signature,
    ctx: &mut Context,
    tree: &mut Tree,
    id: NodeId,
) -> Option<String> {
    let block = tree.block_mut(id);
    block.write_children = false;
    let lines = block
        .lines
        .clone();
    Some(render_list(ctx, &lines))
}

/// Pop the innermost list, hanging it off its parent.
fn close(stack: &mut Vec<List>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(list) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.nest(list);
        }
    }
}

/// Render list lines as nested `<ul>` and `<ol>` elements. Skipped levels
/// get implied lists with empty items.
pub fn render_list(ctx: &mut Context, lines: &[Line]) -> String {
    let pattern = regex!(&format!(
        r"^ *(?P<list>{m})(?P<marks>[*#]+)(?:(?P<item>{m}) )? *(?P<text>.*)$",
        m = MODIFIERS
    ));

    // the outermost list hangs off a placeholder at level zero
    let mut stack = vec![List::new(0, false, Modifiers::empty(Flavor::Signature))];

    for line in lines {
        let Some(captures) = pattern.captures(&line.text) else {
            ctx.error(line.number, "problem with list signature");
            continue;
        };
        let marks = &captures["marks"];
        let level = marks.len();
        let ordered = marks.starts_with('#');
        let list_modifiers = Modifiers::parse(Flavor::Signature, &captures["list"]);
        let item = Item {
            modifiers: Modifiers::parse(
                Flavor::Signature,
                captures
                    .name("item")
                    .map(|m| m.as_str())
                    .unwrap_or(""),
            ),
            text: inline::markup(ctx, line.number, &captures["text"]),
            sublist: None,
        };

        let top = stack
            .last()
            .map(|list| list.level)
            .unwrap_or(0);

        if level <= top {
            while stack
                .last()
                .map(|list| list.level > level)
                .unwrap_or(false)
                && stack.len() > 1
            {
                close(&mut stack);
            }
            if let Some(list) = stack.last_mut() {
                list.items
                    .push(item);
            }
        } else {
            for implied in top + 1..level {
                stack.push(List::new(
                    implied,
                    ordered,
                    Modifiers::empty(Flavor::Signature),
                ));
            }
            let mut list = List::new(level, ordered, list_modifiers);
            list.items
                .push(item);
            stack.push(list);
        }
    }

    while stack.len() > 1 {
        close(&mut stack);
    }

    let mut out = String::new();
    if let Some(first) = stack
        .first()
        .and_then(|head| head.items.first())
        .and_then(|item| item.sublist.as_ref())
    {
        first.write(0, &mut out);
    }
    out
}
