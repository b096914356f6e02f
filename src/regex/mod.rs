//! Compiled-once regular expressions, and the rewrite loop used by the
//! inline markup passes.

use ::regex::{Captures, Regex};

/// Compile a pattern once per call site.
#[macro_export]
macro_rules! regex {
    ($pattern:expr) => {{
        use std::sync::OnceLock;
        static REGEX: OnceLock<::regex::Regex> = OnceLock::new();
        REGEX.get_or_init(|| ::regex::Regex::new($pattern).unwrap_or_else(|e| panic!("{}", e)))
    }};
}

/// Name of the group standing in for a lookahead. Whatever it captures is
/// copied through untouched and the next search starts where it began.
pub const AHEAD: &str = "ahead";

/// The phrase terminator: end of line, a tag, a backtick, whitespace, or
/// punctuation followed by whitespace or end of line.
pub const TERMINATOR: &str = r"(?P<ahead>$|<|`|\s|[.,;:!?](?:\s|$))";

/// Replace every match of `pattern` in `text` with whatever `replace`
/// returns for it. Does nothing unless `marker` occurs in the text.
pub fn substitute<F>(marker: &str, pattern: &Regex, text: &str, mut replace: F) -> String
where
    F: FnMut(&Captures<'_>) -> String,
{
    if !text.contains(marker) {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + 16);
    let mut last = 0;
    let mut at = 0;

    while at <= text.len() {
        let Some(captures) = pattern.captures_at(text, at) else {
            break;
        };
        let Some(whole) = captures.get(0) else {
            break;
        };

        let end = match captures.name(AHEAD) {
            Some(ahead) => ahead.start(),
            None => whole.end(),
        };

        result.push_str(&text[last..whole.start()]);
        result.push_str(&replace(&captures));
        last = end;

        at = if end > whole.start() {
            end
        } else {
            match text[end..]
                .chars()
                .next()
            {
                Some(c) => end + c.len_utf8(),
                None => break,
            }
        };
    }

    result.push_str(&text[last..]);
    result
}

/// Plain replace-all using `$n` expansion, guarded by a marker substring.
pub fn replace(marker: &str, pattern: &Regex, text: &str, replacement: &str) -> String {
    if !text.contains(marker) {
        return text.to_string();
    }
    pattern
        .replace_all(text, replacement)
        .into_owned()
}
