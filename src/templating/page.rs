//! Values gathered from scope keys for the page templates

use serde::Serialize;

static DOCTYPE_STRICT: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n";
static DOCTYPE_TRANSITIONAL: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stylesheet {
    pub file: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    pub doctype: String,
    pub charset: String,
    pub keywords: String,
    pub title: String,
    pub stylesheets: Vec<String>,
    pub preferred: Vec<Stylesheet>,
    pub alternate: Vec<Stylesheet>,
    pub favicon: String,
    pub style: String,
    pub script: String,
    pub head_element_add: String,
    pub head_append: String,
    pub body_attributes: String,
}

impl Page {
    /// The declaration for a doctype name, `strict` or `trans`.
    pub fn doctype(name: &str) -> Option<&'static str> {
        match name {
            "strict" => Some(DOCTYPE_STRICT),
            "trans" => Some(DOCTYPE_TRANSITIONAL),
            _ => None,
        }
    }

    /// Gather the page values, `value` returning the empty string for keys
    /// that are not defined.
    pub fn from_keys(value: impl Fn(&str) -> String) -> Page {
        Page {
            doctype: Page::doctype(&value("doctype"))
                .unwrap_or("")
                .to_string(),
            charset: value("charset"),
            keywords: value("keywords"),
            title: value("title"),
            stylesheets: value("css")
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            preferred: stylesheets(&value("cssPreferred")),
            alternate: stylesheets(&value("cssAlternate")),
            favicon: value("favicon"),
            style: value("style"),
            script: value("script"),
            head_element_add: value("headElementAdd"),
            head_append: value("headAppend"),
            body_attributes: value("_BodyTagAttributes_"),
        }
    }
}

/// One stylesheet per line, either `file` or `title file`.
fn stylesheets(text: &str) -> Vec<Stylesheet> {
    text.lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line
                .split_whitespace()
                .collect();
            match parts.as_slice() {
                [] => None,
                [file] => Some(Stylesheet {
                    file: file.to_string(),
                    title: String::new(),
                }),
                [title, file, ..] => Some(Stylesheet {
                    file: file.to_string(),
                    title: title.to_string(),
                }),
            }
        })
        .collect()
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn known_doctypes() {
        assert!(Page::doctype("strict")
            .unwrap()
            .contains("Strict"));
        assert!(Page::doctype("trans")
            .unwrap()
            .contains("Transitional"));
        assert_eq!(Page::doctype("html5"), None);
    }

    #[test]
    fn stylesheet_lines() {
        assert_eq!(
            stylesheets("Plain plain.css\n\nfancy.css"),
            vec![
                Stylesheet {
                    file: "plain.css".to_string(),
                    title: "Plain".to_string()
                },
                Stylesheet {
                    file: "fancy.css".to_string(),
                    title: String::new()
                },
            ]
        );
    }
}
