//! The modifier mini-language: `(class#id)`, `{{attributes}}`, `{style}`,
//! `[lang]`, padding parentheses, alignment symbols, the header marker, and
//! for table cells `\N` and `/N` spans.

use std::fmt::Write;

use ::regex::Regex;

/// Pattern recognizing a (possibly empty) run of modifiers, suitable for
/// embedding into larger patterns. It has no capture groups of its own.
pub const MODIFIERS: &str = r"(?:\([\w#,-]+\)|\{\{[^}\n]+\}\}|\{[^}\n]+\}|\[[a-zA-Z0-9-]+\]|\\\d+|/\d+|_|-|\^|~|>|<|=|\(+|\)+)*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Horizontal {
    #[default]
    Unset,
    Left,
    Right,
    Center,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vertical {
    #[default]
    Unset,
    Top,
    Middle,
    Bottom,
}

/// Which element the modifiers are destined for. The grammar is the same for
/// all of them; how alignment and padding become style differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flavor {
    #[default]
    Signature,
    Image,
    Table,
    Cell,
    Column,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub flavor: Flavor,
    source: String,
    changed: bool,
    pub class: String,
    pub id: String,
    pub language: String,
    pub style: String,
    pub attributes: String,
    pub horizontal: Horizontal,
    pub vertical: Vertical,
    pub left: usize,
    pub right: usize,
    pub header: bool,
    pub colspan: String,
    pub rowspan: String,
    pub width: String,
    remaining: String,
}

/// Remove the first match of `pattern` from `remaining`, returning its first
/// group.
fn take(remaining: &mut String, pattern: &Regex) -> Option<String> {
    let (start, end, found) = {
        let captures = pattern.captures(remaining)?;
        let whole = captures.get(0)?;
        (
            whole.start(),
            whole.end(),
            captures
                .get(1)
                .map(|m| {
                    m.as_str()
                        .to_string()
                })
                .unwrap_or_default(),
        )
    };
    remaining.replace_range(start..end, "");
    Some(found)
}

/// Remove the first occurrence of `symbol`, returning whether it was present.
fn strip(remaining: &mut String, symbol: &str) -> bool {
    match remaining.find(symbol) {
        Some(n) => {
            remaining.replace_range(n..n + symbol.len(), "");
            true
        }
        None => false,
    }
}

impl Modifiers {
    pub fn empty(flavor: Flavor) -> Modifiers {
        Modifiers {
            flavor,
            ..Default::default()
        }
    }

    pub fn parse(flavor: Flavor, text: &str) -> Modifiers {
        let mut mods = Modifiers::empty(flavor);
        mods.source = text
            .trim()
            .to_string();
        if mods
            .source
            .is_empty()
        {
            return mods;
        }

        let mut remaining = mods
            .source
            .clone();

        if remaining.contains('(') {
            if let Some(found) = take(&mut remaining, regex!(r"\(([\w#,-]+)\)")) {
                match found.find('#') {
                    Some(hash) => {
                        mods.class = found[..hash].to_string();
                        mods.id = found[hash + 1..].to_string();
                    }
                    None => mods.class = found,
                }
            }
        }

        if remaining.contains("{{") {
            if let Some(found) = take(&mut remaining, regex!(r"\{\{([^}\n]+)\}\}")) {
                mods.attributes = found;
            }
        }

        if remaining.contains('{') {
            if let Some(mut found) = take(&mut remaining, regex!(r"\{([^}\n]+)\}")) {
                if !found.ends_with(';') {
                    found.push(';');
                }
                mods.style = found;
            }
        }

        if remaining.contains('[') {
            if let Some(found) = take(&mut remaining, regex!(r"\[([a-zA-Z0-9-]+)\]")) {
                mods.language = found;
            }
        }

        if remaining.contains('(') || remaining.contains(')') {
            mods.left = remaining
                .matches('(')
                .count();
            mods.right = remaining
                .matches(')')
                .count();
            remaining.retain(|c| c != '(' && c != ')');
        }

        if strip(&mut remaining, "<>") {
            mods.horizontal = Horizontal::Justify;
        }
        if strip(&mut remaining, "<") {
            mods.horizontal = Horizontal::Left;
        }
        if strip(&mut remaining, ">") {
            mods.horizontal = Horizontal::Right;
        }
        if strip(&mut remaining, "=") {
            mods.horizontal = Horizontal::Center;
        }

        if strip(&mut remaining, "-") {
            mods.vertical = Vertical::Middle;
        }
        if strip(&mut remaining, "^") {
            mods.vertical = Vertical::Top;
        }
        if strip(&mut remaining, "~") {
            mods.vertical = Vertical::Bottom;
        }
        if strip(&mut remaining, "_") {
            mods.header = true;
        }

        if matches!(flavor, Flavor::Cell | Flavor::Column) {
            if let Some(found) = take(&mut remaining, regex!(r"\\(\d+)")) {
                mods.colspan = found;
            }
            if let Some(found) = take(&mut remaining, regex!(r"/(\d+)")) {
                mods.rowspan = found;
            }
        }

        mods.remaining = remaining;
        mods
    }

    /// Column modifiers carry an explicit width and always render.
    pub fn column(text: &str, width: Option<&str>) -> Modifiers {
        let mut mods = Modifiers::parse(Flavor::Column, text);
        if let Some(width) = width {
            mods.width = width.to_string();
        }
        mods.changed = true;
        mods
    }

    /// The modifier text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Characters of the source that were not understood.
    pub fn remaining(&self) -> &str {
        &self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.source
            .is_empty()
            && !self.changed
    }

    pub fn has_id(&self) -> bool {
        !self
            .id
            .is_empty()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
        self.changed = true;
    }

    pub fn set_default_class(&mut self, class: &str) {
        if self
            .class
            .is_empty()
        {
            self.class = class.to_string();
            self.changed = true;
        }
    }

    pub fn add_class(&mut self, class: &str) {
        if self
            .class
            .is_empty()
        {
            self.class = class.to_string();
        } else {
            self.class
                .push(' ');
            self.class
                .push_str(class);
        }
        self.changed = true;
    }

    /// Render as attributes for a start tag, each preceded by a space.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut result = String::new();
        if !self
            .class
            .is_empty()
        {
            let _ = write!(result, " class=\"{}\"", self.class.replace(',', " "));
        }
        if !self
            .id
            .is_empty()
        {
            let _ = write!(result, " id=\"{}\"", self.id);
        }
        if !self
            .language
            .is_empty()
        {
            let _ = write!(result, " lang=\"{}\"", self.language);
        }

        let mut style = self
            .style
            .clone();
        if !style.is_empty() && !style.ends_with(';') {
            style.push(';');
        }
        self.symbols(&mut style, &mut result);

        if !style.is_empty() {
            let _ = write!(result, " style=\"{}\"", style);
        }
        if !self
            .attributes
            .is_empty()
        {
            result.push(' ');
            result.push_str(&self.attributes);
        }
        result
    }

    fn symbols(&self, style: &mut String, result: &mut String) {
        match self.flavor {
            Flavor::Signature => self.alignment(style),
            Flavor::Image => {
                match self.horizontal {
                    Horizontal::Left => style.push_str("float:left;"),
                    Horizontal::Right => style.push_str("float:right;"),
                    _ => {}
                }
                match self.vertical {
                    Vertical::Top => style.push_str("vertical-align:text-top;"),
                    Vertical::Middle => style.push_str("vertical-align:middle;"),
                    Vertical::Bottom => style.push_str("vertical-align:text-bottom;"),
                    Vertical::Unset => {}
                }
                self.padding(style, "padding");
            }
            Flavor::Table => {
                let floated = matches!(self.horizontal, Horizontal::Left | Horizontal::Right);
                if floated && (self.left > 0 || self.right > 0) {
                    match self.horizontal {
                        Horizontal::Left => style.push_str("float:left;"),
                        _ => style.push_str("float:right;"),
                    }
                    self.padding(style, "margin");
                    self.vertical(style);
                } else {
                    self.alignment(style);
                    if self.horizontal == Horizontal::Center {
                        style.push_str("margin-right:auto;margin-left:auto;");
                    }
                }
            }
            Flavor::Cell => {
                self.alignment(style);
                if !self
                    .rowspan
                    .is_empty()
                {
                    let _ = write!(result, " rowspan=\"{}\"", self.rowspan);
                }
                if !self
                    .colspan
                    .is_empty()
                {
                    let _ = write!(result, " colspan=\"{}\"", self.colspan);
                }
            }
            Flavor::Column => {
                self.alignment(style);
                if !self
                    .colspan
                    .is_empty()
                {
                    let _ = write!(result, " span=\"{}\"", self.colspan);
                }
                if !self
                    .width
                    .is_empty()
                {
                    let _ = write!(result, " width=\"{}\"", self.width);
                }
            }
        }
    }

    fn alignment(&self, style: &mut String) {
        match self.horizontal {
            Horizontal::Left => style.push_str("text-align:left;"),
            Horizontal::Right => style.push_str("text-align:right;"),
            Horizontal::Justify => style.push_str("text-align:justify;"),
            Horizontal::Center => style.push_str("text-align:center;"),
            Horizontal::Unset => {}
        }
        self.vertical(style);
        self.padding(style, "padding");
    }

    fn vertical(&self, style: &mut String) {
        match self.vertical {
            Vertical::Top => style.push_str("vertical-align:top;"),
            Vertical::Middle => style.push_str("vertical-align:middle;"),
            Vertical::Bottom => style.push_str("vertical-align:bottom;"),
            Vertical::Unset => {}
        }
    }

    fn padding(&self, style: &mut String, property: &str) {
        if self.left > 0 {
            let _ = write!(style, "{}-left:{}em;", property, self.left);
        }
        if self.right > 0 {
            let _ = write!(style, "{}-right:{}em;", property, self.right);
        }
    }

    /// Insert the rendered attributes into the first tag of `tags`.
    pub fn insert(&self, tags: &str) -> String {
        if !tags.starts_with('<') {
            return tags.to_string();
        }
        let Some(n) = tags.find('>') else {
            return tags.to_string();
        };
        let attributes = self.render();
        if attributes.is_empty() {
            return tags.to_string();
        }
        format!("{}{}{}", &tags[..n], attributes, &tags[n..])
    }
}
