//! Splits template source into literal text, variable tags, and block tags.
//!
//! Whitespace control is applied here: a block tag or comment that is the only
//! content on its line takes the line's leading indentation with it, and the
//! newline directly after any block tag or comment is dropped.

use netops_types::error::TemplateError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    /// Inside `{{ ... }}`, untrimmed.
    Variable { body: &'a str, line: usize },
    /// Inside `{% ... %}`, untrimmed.
    Block { body: &'a str, line: usize },
}

#[derive(Clone, Copy, PartialEq)]
enum TagKind {
    Variable,
    Block,
    Comment,
}

impl TagKind {
    fn from_opener(c: u8) -> Option<Self> {
        match c {
            b'{' => Some(Self::Variable),
            b'%' => Some(Self::Block),
            b'#' => Some(Self::Comment),
            _ => None,
        }
    }

    fn closer(self) -> &'static str {
        match self {
            Self::Variable => "}}",
            Self::Block => "%}",
            Self::Comment => "#}",
        }
    }

    fn construct(self) -> &'static str {
        match self {
            Self::Variable => "variable tag '{{'",
            Self::Block => "block tag '{%'",
            Self::Comment => "comment '{#'",
        }
    }
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token<'_>>, TemplateError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    // Start of the pending literal text.
    let mut text_start = 0;
    // Where to resume searching for the next tag.
    let mut cursor = 0;

    while let Some(offset) = source[cursor..].find('{') {
        let open = cursor + offset;
        let Some(kind) = bytes.get(open + 1).copied().and_then(TagKind::from_opener) else {
            cursor = open + 1;
            continue;
        };

        let line = line_at(source, open);
        let body_start = open + 2;
        let body_len = source[body_start..]
            .find(kind.closer())
            .ok_or_else(|| TemplateError::Unterminated {
                construct: kind.construct().to_string(),
                line,
            })?;
        let body = &source[body_start..body_start + body_len];
        let mut close = body_start + body_len + 2;

        let mut text_end = open;
        if kind != TagKind::Variable {
            if let Some(indent_start) = standalone_indent(source, open) {
                text_end = indent_start.max(text_start);
            }
            close = skip_newline(source, close);
        }

        if text_end > text_start {
            tokens.push(Token::Text(&source[text_start..text_end]));
        }

        match kind {
            TagKind::Variable => tokens.push(Token::Variable { body, line }),
            TagKind::Block => tokens.push(Token::Block { body, line }),
            TagKind::Comment => {}
        }

        text_start = close;
        cursor = close;
    }

    if text_start < source.len() {
        tokens.push(Token::Text(&source[text_start..]));
    }

    Ok(tokens)
}

fn line_at(source: &str, pos: usize) -> usize {
    source[..pos].bytes().filter(|&b| b == b'\n').count() + 1
}

/// If only spaces or tabs precede `pos` on its line, the index where that
/// indentation begins.
fn standalone_indent(source: &str, pos: usize) -> Option<usize> {
    let line_start = source[..pos].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..pos]
        .bytes()
        .all(|b| b == b' ' || b == b'\t')
        .then_some(line_start)
}

fn skip_newline(source: &str, pos: usize) -> usize {
    let rest = &source[pos..];
    if rest.starts_with("\r\n") {
        pos + 2
    } else if rest.starts_with('\n') {
        pos + 1
    } else {
        pos
    }
}
