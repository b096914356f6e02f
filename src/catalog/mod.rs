//! Cross reference collection. Headings register entries as they are
//! translated; tables of contents listening on the scope chain pick up the
//! ones at levels they care about.

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub text: String,
    pub level: usize,
    pub extra: String,
}

/// A table of contents collecting entries between two heading levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toc {
    pub min: usize,
    pub max: usize,
    pub marker: char,
    closed: bool,
    entries: Vec<Entry>,
}

impl Toc {
    pub fn new(min: usize, max: usize, marker: char) -> Toc {
        Toc {
            min,
            max,
            marker,
            closed: false,
            entries: Vec::new(),
        }
    }

    /// Whether an entry at this level belongs here. An entry shallower than
    /// the minimum level closes the table for good.
    pub fn interested(&mut self, level: usize) -> bool {
        if self.closed {
            return false;
        }
        if level < self.min {
            debug!("Closing table of contents at level {}", level);
            self.closed = true;
            return false;
        }
        level <= self.max
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .is_empty()
    }

    /// The entries as list markup, one line each.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                let depth = entry.level + 1 - self.min;
                format!(
                    "{} <a href=\"#{}\">{}</a>",
                    self.marker
                        .to_string()
                        .repeat(depth),
                    entry.id,
                    entry.text
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
    listeners: Vec<Toc>,
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog::default()
    }

    /// Add a listener, returning the handle to attach to a scope.
    pub fn add(&mut self, toc: Toc) -> usize {
        self.listeners
            .push(toc);
        self.listeners
            .len()
            - 1
    }

    pub fn listener(&self, handle: usize) -> Option<&Toc> {
        self.listeners
            .get(handle)
    }

    /// Whether any of the given listeners would take an entry at this level.
    pub fn interested(&mut self, listeners: &[usize], level: usize) -> bool {
        let mut result = false;
        for handle in listeners {
            if let Some(toc) = self
                .listeners
                .get_mut(*handle)
            {
                result |= toc.interested(level);
            }
        }
        result
    }

    /// Record an entry and hand it to each interested listener.
    pub fn register(&mut self, listeners: &[usize], entry: Entry) {
        for handle in listeners {
            if let Some(toc) = self
                .listeners
                .get_mut(*handle)
            {
                if toc.interested(entry.level) {
                    toc.entries
                        .push(entry.clone());
                }
            }
        }
        self.entries
            .push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

#[cfg(test)]
mod check {
    use super::*;

    fn entry(id: &str, level: usize) -> Entry {
        Entry {
            id: id.to_string(),
            text: id.to_uppercase(),
            level,
            extra: String::new(),
        }
    }

    #[test]
    fn filters_by_level() {
        let mut catalog = Catalog::new();
        let toc = catalog.add(Toc::new(2, 3, '*'));

        catalog.register(&[toc], entry("a", 2));
        catalog.register(&[toc], entry("b", 3));
        catalog.register(&[toc], entry("c", 4));

        let toc = catalog
            .listener(toc)
            .unwrap();
        assert_eq!(
            toc.entries()
                .len(),
            2
        );
        assert_eq!(
            toc.lines(),
            vec![
                r##"* <a href="#a">A</a>"##.to_string(),
                r##"** <a href="#b">B</a>"##.to_string()
            ]
        );
    }

    #[test]
    fn shallower_entry_closes() {
        let mut catalog = Catalog::new();
        let toc = catalog.add(Toc::new(2, 6, '#'));

        catalog.register(&[toc], entry("a", 2));
        catalog.register(&[toc], entry("b", 1));
        catalog.register(&[toc], entry("c", 2));

        assert_eq!(
            catalog
                .listener(toc)
                .unwrap()
                .entries()
                .len(),
            1
        );
        assert_eq!(
            catalog
                .entries()
                .len(),
            3
        );
        assert!(!catalog.interested(&[toc], 3));
    }
}
