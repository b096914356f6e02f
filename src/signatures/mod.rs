//! Signatures give each block its behaviour. A Template is what the scope
//! chain holds under a name; configuring it with the modifiers written on a
//! signature line gives the Signature instance a block owns.

mod conditional;
mod content;
mod custom;
mod deflist;
mod directive;
mod list;
mod table;
mod toc;
mod wrap;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::language::{Block, Flavor, Modifiers, NodeId, Tree};
use crate::translation::Context;

// Re-export all public symbols
pub use custom::{run_custom, Custom};
pub use list::render_list;

#[derive(Debug, Clone)]
pub enum Kind {
    Anonymous,
    Paragraph,
    Raw,
    SourceComment,
    MarkupComment,
    Heading(usize),
    Rule,
    Clear,
    Javascript,
    DivStart,
    DivEnd,
    Wrap {
        open: &'static str,
        close: &'static str,
        required: bool,
    },
    Blockquote,
    Preformatted {
        open: &'static str,
        close: &'static str,
        escape_only: bool,
    },
    KeysMacros,
    InlineOnly,
    If,
    Else,
    IfDefined {
        negate: bool,
    },
    Table,
    Row,
    Cell,
    List,
    DefinitionList,
    Toc,
    Define {
        append: bool,
    },
    Undefine,
    Include,
    IncludeRaw,
    PropertyFile,
    SignatureDef,
    Body,
    Xilize,
    Abbreviation,
    Footnote(String),
    Prolog,
    Epilog,
    Custom(Arc<Custom>),
}

/// A named signature as registered in a scope.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub kind: Kind,
}

impl Template {
    pub fn new(name: impl Into<String>, kind: Kind) -> Template {
        Template {
            name: name.into(),
            kind,
        }
    }

    /// An instance of this signature carrying the given modifiers.
    pub fn configure(&self, modifiers: &str) -> Signature {
        let flavor = match self.kind {
            Kind::Table => Flavor::Table,
            _ => Flavor::Signature,
        };
        Signature {
            name: self
                .name
                .clone(),
            kind: self
                .kind
                .clone(),
            modifiers: Modifiers::parse(flavor, modifiers),
            listener: None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.kind, Kind::Custom(_))
    }

    /// Where a custom signature was defined; None for native ones.
    pub fn origin(&self) -> Option<String> {
        match &self.kind {
            Kind::Custom(custom) => Some(
                custom
                    .file
                    .display()
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// The signature instance owned by one block.
#[derive(Debug, Clone)]
pub struct Signature {
    pub name: String,
    pub kind: Kind,
    pub modifiers: Modifiers,
    /// Catalog listener handle, once a table of contents has registered.
    pub listener: Option<usize>,
}

/// The signatures every root scope starts with.
pub fn standard() -> Vec<Template> {
    let mut result = vec![
        Template::new("anonymous", Kind::Anonymous),
        Template::new("p", Kind::Paragraph),
        Template::new("raw", Kind::Raw),
        Template::new("xilcom", Kind::SourceComment),
        Template::new("xmlcom", Kind::MarkupComment),
    ];
    for level in 1..=6 {
        result.push(Template::new(format!("h{}", level), Kind::Heading(level)));
    }
    result.extend([
        Template::new("hr", Kind::Rule),
        Template::new(
            "div",
            Kind::Wrap {
                open: "<div>",
                close: "</div>",
                required: true,
            },
        ),
        Template::new("divStart", Kind::DivStart),
        Template::new("divEnd", Kind::DivEnd),
        Template::new(
            "block",
            Kind::Wrap {
                open: "",
                close: "",
                required: true,
            },
        ),
        Template::new(
            "bqo",
            Kind::Wrap {
                open: "<blockquote>",
                close: "</blockquote>",
                required: false,
            },
        ),
        Template::new("bq", Kind::Blockquote),
        Template::new(
            "pre",
            Kind::Preformatted {
                open: "<pre>",
                close: "</pre>",
                escape_only: false,
            },
        ),
        Template::new(
            "prex",
            Kind::Preformatted {
                open: "<pre>",
                close: "</pre>",
                escape_only: true,
            },
        ),
        Template::new(
            "bc",
            Kind::Preformatted {
                open: "<pre><code>",
                close: "</code></pre>",
                escape_only: false,
            },
        ),
        Template::new(
            "bcx",
            Kind::Preformatted {
                open: "<pre><code>",
                close: "</code></pre>",
                escape_only: true,
            },
        ),
        Template::new("km", Kind::KeysMacros),
        Template::new("imo", Kind::InlineOnly),
        Template::new("if", Kind::If),
        Template::new("else", Kind::Else),
        Template::new("ifdef", Kind::IfDefined { negate: false }),
        Template::new("ifndef", Kind::IfDefined { negate: true }),
        Template::new("table", Kind::Table),
        Template::new("row", Kind::Row),
        Template::new("cell", Kind::Cell),
        Template::new("dl", Kind::DefinitionList),
        Template::new("clear", Kind::Clear),
        Template::new("javascript", Kind::Javascript),
        Template::new("prolog", Kind::Prolog),
        Template::new("epilog", Kind::Epilog),
        Template::new("define", Kind::Define { append: false }),
        Template::new("defadd", Kind::Define { append: true }),
        Template::new("undef", Kind::Undefine),
        Template::new("include", Kind::Include),
        Template::new("includeRaw", Kind::IncludeRaw),
        Template::new("propfile", Kind::PropertyFile),
        Template::new("signature", Kind::SignatureDef),
        Template::new("body", Kind::Body),
        Template::new("xilize", Kind::Xilize),
        Template::new("toc", Kind::Toc),
    ]);
    result
}

impl Signature {
    /// Passes its lines through untouched. Also used for the tree root and
    /// for fixed text framing children.
    pub fn raw() -> Signature {
        Template::new("raw", Kind::Raw).configure("")
    }

    pub fn list(modifiers: &str) -> Signature {
        Template::new("list", Kind::List).configure(modifiers)
    }

    pub fn footnote(number: &str, modifiers: &str) -> Signature {
        Template::new("footnote", Kind::Footnote(number.to_string())).configure(modifiers)
    }

    pub fn abbreviation() -> Signature {
        Template::new("abbreviation", Kind::Abbreviation).configure("")
    }

    /// Directives that take effect as soon as their block is read, never
    /// entering the tree.
    pub fn is_immediate(&self) -> bool {
        matches!(
            self.kind,
            Kind::Define { .. }
                | Kind::Undefine
                | Kind::Include
                | Kind::PropertyFile
                | Kind::SignatureDef
                | Kind::Body
                | Kind::Xilize
                | Kind::Abbreviation
        )
    }

    /// Tag attributes from the modifiers.
    pub fn attributes(&self) -> String {
        self.modifiers
            .render()
    }

    /// Insert the tag attributes into the first tag of `tags`.
    pub fn insert(&self, tags: &str) -> String {
        self.modifiers
            .insert(tags)
    }

    /// Run an immediate directive against a block as it is read. Returns
    /// any blocks to be read in its place, as from an included file.
    pub fn run(&mut self, ctx: &mut Context, block: &Block) -> Vec<Block> {
        match self.kind {
            Kind::Define { append } => directive::define(ctx, block, append),
            Kind::Undefine => directive::undefine(ctx, block),
            Kind::Include => return directive::include(ctx, block),
            Kind::PropertyFile => directive::property_file(ctx, block),
            Kind::SignatureDef => directive::signature(ctx, block),
            Kind::Body => directive::body(self, ctx),
            Kind::Xilize => {
                directive::define(ctx, block, false);
                directive::body(self, ctx);
            }
            Kind::Abbreviation => directive::abbreviation(ctx, block),
            _ => {}
        }
        Vec::new()
    }

    /// First phase. Only the conditionals act here, and immediate
    /// directives a conditional has turned a block into.
    pub fn exec(&mut self, ctx: &mut Context, tree: &mut Tree, id: NodeId) {
        match self.kind {
            Kind::If => conditional::exec_if(ctx, tree, id),
            Kind::IfDefined { negate } => conditional::exec_defined(self, ctx, tree, id, negate),
            _ if self.is_immediate() => {
                let block = tree
                    .block(id)
                    .clone();
                let blocks = self.run(ctx, &block);
                if !blocks.is_empty() {
                    ctx.warning(block.number, "include is not possible here");
                }
            }
            _ => {}
        }
    }

    /// Second phase, producing the block's own translation.
    pub fn translate(&mut self, ctx: &mut Context, tree: &mut Tree, id: NodeId) -> Option<String> {
        match self.kind.clone() {
            Kind::Anonymous => content::anonymous(self, ctx, tree, id),
            Kind::Paragraph => content::paragraph(self, ctx, tree, id),
            Kind::Raw => Some(
                tree.block(id)
                    .text(),
            ),
            Kind::SourceComment => {
                tree.block_mut(id)
                    .write_children = false;
                None
            }
            Kind::MarkupComment => content::markup_comment(ctx, tree, id),
            Kind::Heading(level) => content::heading(self, ctx, tree, id, level),
            Kind::Rule => Some(format!("<hr{} />", self.attributes())),
            Kind::Clear => content::clear(self, ctx, tree, id),
            Kind::Javascript => Some(format!(
                "<script type=\"text/javascript\">\n<!-- \n{}\n// -->\n</script>\n",
                tree.block(id)
                    .text()
            )),
            Kind::DivStart => Some(format!("<div{}>", self.attributes())),
            Kind::DivEnd => Some("</div>".to_string()),
            Kind::Wrap {
                open,
                close,
                required,
            } => wrap::parent(self, ctx, tree, id, open, close, required),
            Kind::Blockquote => wrap::blockquote(self, ctx, tree, id),
            Kind::Preformatted {
                open,
                close,
                escape_only,
            } => wrap::preformatted(self, ctx, tree, id, open, close, escape_only),
            Kind::KeysMacros => wrap::keys_and_macros(self, ctx, tree, id),
            Kind::InlineOnly => wrap::inline_only(self, ctx, tree, id),
            Kind::If | Kind::IfDefined { .. } => {
                translate_children(ctx, tree, id);
                None
            }
            Kind::Else => misplaced(
                ctx,
                tree,
                id,
                "\"else.\" is only meaningful as the last child of an 'if.' block",
            ),
            Kind::Row => misplaced(
                ctx,
                tree,
                id,
                "\"row.\" is only meaningful as table child block",
            ),
            Kind::Cell => misplaced(
                ctx,
                tree,
                id,
                "\"cell.\" is only meaningful as table-row child block",
            ),
            Kind::Table => table::translate(self, ctx, tree, id),
            Kind::List => list::translate(self, ctx, tree, id),
            Kind::DefinitionList => deflist::translate(self, ctx, tree, id),
            Kind::Toc => toc::translate(self, ctx, tree, id),
            Kind::IncludeRaw => directive::include_raw(ctx, tree, id),
            Kind::Footnote(number) => content::footnote(self, ctx, tree, id, &number),
            Kind::Prolog => content::prolog(ctx, tree, id),
            Kind::Epilog => content::epilog(ctx),
            Kind::Custom(definition) => custom::translate(&definition, ctx, tree, id),
            Kind::Define { .. }
            | Kind::Undefine
            | Kind::Include
            | Kind::PropertyFile
            | Kind::SignatureDef
            | Kind::Body
            | Kind::Xilize
            | Kind::Abbreviation => None,
        }
    }

    /// Third phase, run over the top level blocks that have no translation
    /// yet. Tables of contents render here, once all headings are known.
    pub fn translate_last(&mut self, ctx: &mut Context, tree: &mut Tree, id: NodeId) -> Option<String> {
        match self.kind {
            Kind::Toc => toc::translate_last(self, ctx, tree, id),
            _ => None,
        }
    }
}

/// Translate each of a block's children in turn.
pub(crate) fn translate_children(ctx: &mut Context, tree: &mut Tree, id: NodeId) {
    let children = tree
        .children(id)
        .to_vec();
    for child in children {
        crate::translation::translate_node(ctx, tree, child);
    }
}

fn misplaced(ctx: &mut Context, tree: &Tree, id: NodeId, message: &str) -> Option<String> {
    ctx.error(
        tree.block(id)
            .number,
        message,
    );
    Some(String::new())
}

/// Resolve a path named in a document relative to the file being read.
pub(crate) fn local_path(ctx: &Context, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match ctx
        .path
        .parent()
    {
        Some(parent) => parent.join(path),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod check;
