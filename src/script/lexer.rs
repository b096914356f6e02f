use super::ScriptError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    // Literals
    Number(f64),
    Text(String),
    True,
    False,

    Ident(String),
    Let,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,     // =
    EqEq,   // ==
    BangEq, // !=
    Gt,
    Lt,
    GtEq,
    LtEq,
    AmpAmp,   // &&
    PipePipe, // ||
    Bang,
    Question,
    Colon,
    Comma,

    LParen,
    RParen,

    // Statement separator, either `;` or a newline
    Semi,
}

/// A token along with the line it started on.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Lexeme {
    pub token: Token,
    pub line: usize,
}

pub(super) fn tokenize(code: &str) -> Result<Vec<Lexeme>, ScriptError> {
    let chars: Vec<char> = code
        .chars()
        .collect();
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut i = 0;

    // Parentheses suspend newline separation so a call may span lines.
    let mut depth = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let start = line;
        let token = match c {
            '\n' => {
                line += 1;
                i += 1;
                if depth > 0 {
                    continue;
                }
                Token::Semi
            }
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '"' | '\'' => {
                let (text, next, lines) = string(&chars, i, line)?;
                i = next;
                line += lines;
                Token::Text(text)
            }
            c if c.is_ascii_digit() => {
                let begin = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[begin..i]
                    .iter()
                    .collect();
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| ScriptError::new(line, format!("malformed number '{}'", literal)))?;
                Token::Number(number)
            }
            c if c.is_alphabetic() || c == '_' => {
                let begin = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[begin..i]
                    .iter()
                    .collect();
                match word.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    "let" => Token::Let,
                    _ => Token::Ident(word),
                }
            }
            _ => {
                let next = chars
                    .get(i + 1)
                    .copied();
                let (token, width) = match (c, next) {
                    ('=', Some('=')) => (Token::EqEq, 2),
                    ('!', Some('=')) => (Token::BangEq, 2),
                    ('>', Some('=')) => (Token::GtEq, 2),
                    ('<', Some('=')) => (Token::LtEq, 2),
                    ('&', Some('&')) => (Token::AmpAmp, 2),
                    ('|', Some('|')) => (Token::PipePipe, 2),
                    ('=', _) => (Token::Eq, 1),
                    ('!', _) => (Token::Bang, 1),
                    ('>', _) => (Token::Gt, 1),
                    ('<', _) => (Token::Lt, 1),
                    ('+', _) => (Token::Plus, 1),
                    ('-', _) => (Token::Minus, 1),
                    ('*', _) => (Token::Star, 1),
                    ('/', _) => (Token::Slash, 1),
                    ('%', _) => (Token::Percent, 1),
                    ('?', _) => (Token::Question, 1),
                    (':', _) => (Token::Colon, 1),
                    (',', _) => (Token::Comma, 1),
                    (';', _) => (Token::Semi, 1),
                    ('(', _) => {
                        depth += 1;
                        (Token::LParen, 1)
                    }
                    (')', _) => {
                        depth = depth.saturating_sub(1);
                        (Token::RParen, 1)
                    }
                    _ => {
                        return Err(ScriptError::new(
                            line,
                            format!("unexpected character '{}'", c),
                        ))
                    }
                };
                i += width;
                token
            }
        };
        tokens.push(Lexeme { token, line: start });
    }

    Ok(tokens)
}

/// Read a quoted string starting at `begin`, returning its content, the
/// index after the closing quote, and the number of newlines it spanned.
fn string(chars: &[char], begin: usize, line: usize) -> Result<(String, usize, usize), ScriptError> {
    let quote = chars[begin];
    let mut text = String::new();
    let mut lines = 0;
    let mut i = begin + 1;

    while i < chars.len() {
        match chars[i] {
            c if c == quote => return Ok((text, i + 1, lines)),
            '\\' => {
                i += 1;
                match chars.get(i) {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(c) => text.push(*c),
                    None => break,
                }
            }
            '\n' => {
                lines += 1;
                text.push('\n');
            }
            c => text.push(c),
        }
        i += 1;
    }

    Err(ScriptError::new(line, "unterminated string"))
}
