//! Segmenting source text into raw blocks: runs of non-blank lines, with
//! comment lines dropped and the nesting markers recognized.

use crate::language::Line;

/// The configurable strings the reader looks for, fixed when it is created.
#[derive(Debug, Clone)]
pub struct Markers {
    pub comment: String,
    pub start: String,
    pub end: String,
    pub spaces_per_tab: usize,
}

impl Default for Markers {
    fn default() -> Markers {
        Markers {
            comment: ">xil>".to_string(),
            start: "{{".to_string(),
            end: "}}".to_string(),
            spaces_per_tab: 4,
        }
    }
}

/// A block as read, before its first line has been signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub number: usize,
    pub lines: Vec<Line>,
    /// The last line ended with the block start marker, now removed.
    pub start: bool,
    /// A line holding only the block end marker.
    pub end: bool,
    /// Blank lines following the block.
    pub trailing: usize,
}

impl RawBlock {
    fn new(number: usize) -> RawBlock {
        RawBlock {
            number,
            lines: Vec::new(),
            start: false,
            end: false,
            trailing: 0,
        }
    }
}

/// Forward only reader over source text with one line of pushback.
pub struct Reader<'i> {
    source: std::iter::Enumerate<std::str::Lines<'i>>,
    markers: Markers,
    tab: String,
    pushback: Option<Line>,
}

impl<'i> Reader<'i> {
    pub fn new(content: &'i str, markers: Markers) -> Reader<'i> {
        let tab = " ".repeat(markers.spaces_per_tab);
        Reader {
            source: content
                .lines()
                .enumerate(),
            markers,
            tab,
            pushback: None,
        }
    }

    fn is_comment(&self, text: &str) -> bool {
        !self
            .markers
            .comment
            .is_empty()
            && text
                .trim_start()
                .starts_with(&self.markers.comment)
    }

    fn is_end(&self, text: &str) -> bool {
        !self
            .markers
            .end
            .is_empty()
            && text.trim_start_matches(' ') == self.markers.end
    }

    /// The text before the start marker, if the line ends with one.
    fn before_start<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self
            .markers
            .start
            .is_empty()
        {
            return None;
        }
        text.strip_suffix(&self.markers.start)
            .map(|prefix| prefix.trim_end_matches(' '))
    }

    /// The next line that isn't a comment, trailing whitespace removed and
    /// tabs expanded.
    fn next_line(&mut self) -> Option<Line> {
        if let Some(line) = self
            .pushback
            .take()
        {
            return Some(line);
        }

        loop {
            let (index, text) = self
                .source
                .next()?;
            if self.is_comment(text) {
                continue;
            }
            let text = text
                .trim_end()
                .replace('\t', &self.tab);
            return Some(Line::new(index + 1, text));
        }
    }

    /// Count blank lines, leaving the next non-blank line to be read again.
    fn blank_lines(&mut self) -> usize {
        let mut count = 0;
        while let Some(line) = self.next_line() {
            if !line
                .text
                .is_empty()
            {
                self.pushback = Some(line);
                break;
            }
            count += 1;
        }
        count
    }

    pub fn next_block(&mut self) -> Option<RawBlock> {
        let first = loop {
            let line = self.next_line()?;
            if !line
                .text
                .is_empty()
            {
                break line;
            }
        };

        let mut block = RawBlock::new(first.number);
        if self.is_end(&first.text) {
            block.end = true;
            return Some(block);
        }
        if let Some(prefix) = self.before_start(&first.text) {
            block
                .lines
                .push(Line::new(first.number, prefix));
            block.start = true;
            block.trailing = self.blank_lines();
            return Some(block);
        }
        block
            .lines
            .push(first);

        while let Some(line) = self.next_line() {
            if line
                .text
                .is_empty()
                || self.is_end(&line.text)
            {
                self.pushback = Some(line);
                break;
            }
            if let Some(prefix) = self.before_start(&line.text) {
                block
                    .lines
                    .push(Line::new(line.number, prefix));
                block.start = true;
                break;
            }
            block
                .lines
                .push(line);
        }

        block.trailing = self.blank_lines();
        Some(block)
    }
}

impl Iterator for Reader<'_> {
    type Item = RawBlock;

    fn next(&mut self) -> Option<RawBlock> {
        self.next_block()
    }
}

#[cfg(test)]
mod check {
    use super::*;

    fn read(content: &str) -> Vec<RawBlock> {
        Reader::new(content, Markers::default()).collect()
    }

    fn texts(block: &RawBlock) -> Vec<&str> {
        block
            .lines
            .iter()
            .map(|line| line.text.as_str())
            .collect()
    }

    #[test]
    fn blocks_split_on_blank_lines() {
        let blocks = read("one\ntwo\n\n\nthree\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(texts(&blocks[0]), vec!["one", "two"]);
        assert_eq!(blocks[0].number, 1);
        assert_eq!(blocks[0].trailing, 2);
        assert_eq!(texts(&blocks[1]), vec!["three"]);
        assert_eq!(blocks[1].number, 5);
        assert_eq!(blocks[1].trailing, 0);
    }

    #[test]
    fn comments_skipped() {
        let blocks = read(">xil> a comment\none\n  >xil> another\ntwo\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(texts(&blocks[0]), vec!["one", "two"]);
        assert_eq!(blocks[0].lines[1].number, 4);
    }

    #[test]
    fn start_and_end_markers() {
        let blocks = read("div. {{\ninside\n}}\nafter\n");
        assert_eq!(blocks.len(), 4);
        assert!(blocks[0].start);
        assert_eq!(texts(&blocks[0]), vec!["div."]);
        assert_eq!(texts(&blocks[1]), vec!["inside"]);
        assert!(blocks[2].end);
        assert_eq!(blocks[2].number, 3);
        assert_eq!(texts(&blocks[3]), vec!["after"]);
    }

    #[test]
    fn start_marker_ends_a_longer_block() {
        let blocks = read("bq.\nfirst line  {{\n\nchild\n}}\n");
        assert!(blocks[0].start);
        assert_eq!(texts(&blocks[0]), vec!["bq.", "first line"]);
        assert_eq!(blocks[0].trailing, 1);
    }

    #[test]
    fn tabs_expanded_and_trailing_space_removed() {
        let blocks = read("\tindented \t\n");
        assert_eq!(texts(&blocks[0]), vec!["    indented"]);
    }

    #[test]
    fn custom_markers() {
        let markers = Markers {
            comment: "#".to_string(),
            start: "<<".to_string(),
            end: ">>".to_string(),
            spaces_per_tab: 2,
        };
        let blocks: Vec<_> = Reader::new("# skip\ndiv. <<\n\tx\n>>\n", markers).collect();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].start);
        assert_eq!(texts(&blocks[1]), vec!["  x"]);
        assert!(blocks[2].end);
    }
}
