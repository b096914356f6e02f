//! Template trait and the prolog and epilog templates

use serde::Serialize;
use tinytemplate::TinyTemplate;

use super::Page;
use crate::language::TranslationError;

/// Trait for templates that turn page values into markup
pub trait Template {
    fn render(&self, page: &Page) -> Result<String, TranslationError>;
}

static PROLOG: &str = r#"{{ if doctype }}{doctype}{{ endif }}<html xmlns="http://www.w3.org/1999/xhtml">
<head>
{{ if charset }}  <meta http-equiv="Content-Type" content="text/html; charset={charset}" />
{{ endif }}{{ if keywords }}  <meta name="keywords" content="{keywords}" />
{{ endif }}{{ if title }}  <title>{title}</title>
{{ endif }}{{ for sheet in stylesheets }}  <link href="{sheet}" rel="stylesheet" type="text/css" />
{{ endfor }}{{ for sheet in preferred }}  <link href="{sheet.file}" title="{sheet.title}" rel="stylesheet" type="text/css" />
{{ endfor }}{{ for sheet in alternate }}  <link href="{sheet.file}" title="{sheet.title}" rel="alternate stylesheet" type="text/css" />
{{ endfor }}{{ if favicon }}  <link rel="shortcut icon" href="{favicon}" />
{{ endif }}{{ if style }}  <style type="text/css">
{style}
  </style>
{{ endif }}{{ if script }}<script type="text/javascript">
<!-- 
{script}

// -->
</script>
{{ endif }}{{ if head_element_add }}{head_element_add}
{{ endif }}{{ if head_append }}{head_append}
{{ endif }}</head>
<body{body_attributes}>"#;

static EPILOG: &str = "</body>\n</html>\n";

fn render(name: &'static str, text: &'static str, values: &impl Serialize) -> Result<String, TranslationError> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template(name, text)
        .map_err(|error| TranslationError::Template(error.to_string()))?;
    tt.render(name, values)
        .map_err(|error| TranslationError::Template(error.to_string()))
}

/// The document type, html element and head, and the body start tag.
pub struct Prolog;

impl Template for Prolog {
    fn render(&self, page: &Page) -> Result<String, TranslationError> {
        render("prolog", PROLOG, page)
    }
}

pub struct Epilog;

impl Template for Epilog {
    fn render(&self, page: &Page) -> Result<String, TranslationError> {
        render("epilog", EPILOG, page)
    }
}

#[cfg(test)]
mod check {
    use super::*;

    fn page(pairs: &[(&str, &str)]) -> Page {
        Page::from_keys(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .unwrap_or_default()
        })
    }

    #[test]
    fn minimal_prolog() {
        let text = Prolog
            .render(&page(&[]))
            .unwrap();
        assert_eq!(
            text,
            "<html xmlns=\"http://www.w3.org/1999/xhtml\">\n<head>\n</head>\n<body>"
        );
    }

    #[test]
    fn strict_prolog_with_title() {
        let text = Prolog
            .render(&page(&[
                ("doctype", "strict"),
                ("charset", "utf-8"),
                ("title", "Home & Away"),
                ("css", "a.css  b.css"),
                ("_BodyTagAttributes_", " class=\"main\""),
            ]))
            .unwrap();
        assert!(text.starts_with("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\""));
        assert!(text.contains("  <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\" />\n"));
        assert!(text.contains("  <title>Home & Away</title>\n"));
        assert!(text.contains("  <link href=\"a.css\" rel=\"stylesheet\" type=\"text/css\" />\n  <link href=\"b.css\""));
        assert!(text.ends_with("</head>\n<body class=\"main\">"));
    }

    #[test]
    fn titled_stylesheets() {
        let text = Prolog
            .render(&page(&[
                ("cssPreferred", "Plain plain.css"),
                ("cssAlternate", "fancy.css"),
            ]))
            .unwrap();
        assert!(text.contains(
            "  <link href=\"plain.css\" title=\"Plain\" rel=\"stylesheet\" type=\"text/css\" />\n"
        ));
        assert!(text.contains(
            "  <link href=\"fancy.css\" title=\"\" rel=\"alternate stylesheet\" type=\"text/css\" />\n"
        ));
    }

    #[test]
    fn script_in_head() {
        let text = Prolog
            .render(&page(&[("script", "var x = 1;")]))
            .unwrap();
        assert!(text.contains("<script type=\"text/javascript\">\n<!-- \nvar x = 1;\n\n// -->\n</script>\n"));
    }

    #[test]
    fn epilog() {
        let text = Epilog
            .render(&page(&[]))
            .unwrap();
        assert_eq!(text, "</body>\n</html>\n");
    }
}
