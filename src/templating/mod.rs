//! Templates for the XHTML scaffolding around a translated page

mod page;
mod template;

pub use page::{Page, Stylesheet};
pub use template::{Epilog, Prolog, Template};

use crate::language::TranslationError;

/// Render the page values with the specified template
pub fn fill(template: &impl Template, page: &Page) -> Result<String, TranslationError> {
    template.render(page)
}
