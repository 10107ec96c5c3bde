//! Builds the template tree from lexer tokens.
//!
//! Grammar (closed):
//!
//! ```text
//! variable   := "{{" path ( "|" filter )* "}}"
//! filter     := ident ( "(" literal ( "," literal )* ")" )?
//! literal    := quoted string | number
//! if-block   := "{%" "if" "not"? path "%}" nodes ( "{%" "else" "%}" nodes )? "{%" "endif" "%}"
//! for-block  := "{%" "for" ident "in" path "%}" nodes "{%" "endfor" "%}"
//! path       := ident ( "." ident )*
//! ```

use netops_types::error::TemplateError;

use super::filter::Filter;
use super::lexer::Token;

/// Name under which loop metadata is exposed (`loop.index`, ...).
pub(crate) const LOOP_VAR: &str = "loop";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Expr {
    pub path: String,
    pub filters: Vec<Filter>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Output(Expr),
    If {
        negate: bool,
        path: String,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    For {
        var: String,
        path: String,
        body: Vec<Node>,
        line: usize,
    },
}

pub(crate) fn parse(tokens: Vec<Token<'_>>) -> Result<Vec<Node>, TemplateError> {
    let mut parser = Parser {
        tokens: tokens.into_iter(),
    };
    let (nodes, end) = parser.parse_nodes(None, &[])?;
    debug_assert!(end.is_none());
    Ok(nodes)
}

struct Parser<'a> {
    tokens: std::vec::IntoIter<Token<'a>>,
}

impl Parser<'_> {
    /// Parse nodes until one of `terminators` (returned with its line) or end
    /// of input. `open` names the enclosing block for unclosed-block errors.
    fn parse_nodes(
        &mut self,
        open: Option<(&'static str, usize)>,
        terminators: &[&str],
    ) -> Result<(Vec<Node>, Option<&'static str>), TemplateError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.tokens.next() {
            match token {
                Token::Text(text) => nodes.push(Node::Text(text.to_string())),
                Token::Variable { body, line } => nodes.push(Node::Output(parse_expr(body, line)?)),
                Token::Block { body, line } => {
                    let words: Vec<&str> = body.split_whitespace().collect();
                    match words.as_slice() {
                        ["if", rest @ ..] => nodes.push(self.parse_if(rest, line)?),
                        ["for", rest @ ..] => nodes.push(self.parse_for(rest, line)?),
                        [keyword @ ("else" | "endif" | "endfor")] => {
                            if let Some(found) = terminators.iter().find(|t| *t == keyword) {
                                return Ok((nodes, Some(static_keyword(found))));
                            }
                            return Err(TemplateError::UnexpectedTag {
                                tag: (*keyword).to_string(),
                                line,
                            });
                        }
                        [] => {
                            return Err(TemplateError::Syntax {
                                message: "empty block tag".to_string(),
                                line,
                            });
                        }
                        _ => {
                            return Err(TemplateError::Syntax {
                                message: format!("unknown block tag '{}'", body.trim()),
                                line,
                            });
                        }
                    }
                }
            }
        }

        match open {
            Some((block, line)) => Err(TemplateError::Unclosed {
                block: block.to_string(),
                line,
            }),
            None => Ok((nodes, None)),
        }
    }

    fn parse_if(&mut self, words: &[&str], line: usize) -> Result<Node, TemplateError> {
        let (negate, path) = match words {
            ["not", path] => (true, *path),
            [path] => (false, *path),
            _ => {
                return Err(TemplateError::Syntax {
                    message: "expected '{% if [not] name %}'".to_string(),
                    line,
                });
            }
        };
        check_path(path, line)?;

        let (then, end) = self.parse_nodes(Some(("if", line)), &["else", "endif"])?;
        let otherwise = if end == Some("else") {
            self.parse_nodes(Some(("if", line)), &["endif"])?.0
        } else {
            Vec::new()
        };

        Ok(Node::If {
            negate,
            path: path.to_string(),
            then,
            otherwise,
        })
    }

    fn parse_for(&mut self, words: &[&str], line: usize) -> Result<Node, TemplateError> {
        let (var, path) = match words {
            [var, "in", path] => (*var, *path),
            _ => {
                return Err(TemplateError::Syntax {
                    message: "expected '{% for name in list %}'".to_string(),
                    line,
                });
            }
        };
        if !is_ident(var) || var == LOOP_VAR {
            return Err(TemplateError::Syntax {
                message: format!("invalid loop variable '{var}'"),
                line,
            });
        }
        check_path(path, line)?;

        let (body, _) = self.parse_nodes(Some(("for", line)), &["endfor"])?;
        Ok(Node::For {
            var: var.to_string(),
            path: path.to_string(),
            body,
            line,
        })
    }
}

fn static_keyword(keyword: &str) -> &'static str {
    match keyword {
        "else" => "else",
        "endif" => "endif",
        _ => "endfor",
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_path(path: &str, line: usize) -> Result<(), TemplateError> {
    if path.split('.').all(is_ident) {
        Ok(())
    } else {
        Err(TemplateError::Syntax {
            message: format!("invalid name '{path}'"),
            line,
        })
    }
}

// ---------------------------------------------------------------------------
// Variable expressions
// ---------------------------------------------------------------------------

/// Parse the inside of `{{ ... }}`.
fn parse_expr(body: &str, line: usize) -> Result<Expr, TemplateError> {
    let mut cursor = Cursor {
        chars: body.char_indices().peekable(),
        src: body,
        line,
    };

    cursor.skip_ws();
    let path = cursor.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if path.is_empty() {
        return Err(cursor.error("expected a name inside '{{ }}'"));
    }
    check_path(path, line)?;

    let mut filters = Vec::new();
    loop {
        cursor.skip_ws();
        match cursor.peek() {
            None => break,
            Some('|') => {
                cursor.bump();
            }
            Some(c) => return Err(cursor.error(&format!("unexpected '{c}' after '{path}'"))),
        }

        cursor.skip_ws();
        let name = cursor.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if name.is_empty() {
            return Err(cursor.error("expected a filter name after '|'"));
        }

        cursor.skip_ws();
        let args = if cursor.peek() == Some('(') {
            cursor.bump();
            cursor.parse_args()?
        } else {
            Vec::new()
        };

        filters.push(Filter::parse(name, args, line)?);
    }

    Ok(Expr {
        path: path.to_string(),
        filters,
        line,
    })
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    src: &'a str,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn pos(&mut self) -> usize {
        self.chars.peek().map_or(self.src.len(), |&(i, _)| i)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos();
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        let end = self.pos();
        &self.src[start..end]
    }

    fn error(&self, message: &str) -> TemplateError {
        TemplateError::Syntax {
            message: message.to_string(),
            line: self.line,
        }
    }

    /// Parse `literal ("," literal)* ")"`; the opening paren is consumed.
    fn parse_args(&mut self) -> Result<Vec<String>, TemplateError> {
        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(args);
        }

        loop {
            self.skip_ws();
            args.push(self.parse_literal()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(')') => return Ok(args),
                Some(c) => return Err(self.error(&format!("unexpected '{c}' in filter arguments"))),
                None => return Err(self.error("unclosed filter arguments")),
            }
        }
    }

    fn parse_literal(&mut self) -> Result<String, TemplateError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.bump();
                let mut out = String::new();
                loop {
                    match self.bump() {
                        Some('\\') => match self.bump() {
                            Some('n') => out.push('\n'),
                            Some(c) => out.push(c),
                            None => break,
                        },
                        Some(c) if c == quote => return Ok(out),
                        Some(c) => out.push(c),
                        None => break,
                    }
                }
                Err(self.error("unterminated string literal"))
            }
            Some(c) if c.is_ascii_digit() || c == '-' => {
                let number = self.take_while(|c| c.is_ascii_digit() || c == '.' || c == '-');
                if number.parse::<f64>().is_ok() {
                    Ok(number.to_string())
                } else {
                    Err(self.error(&format!("invalid number '{number}'")))
                }
            }
            _ => Err(self.error("filter arguments must be quoted strings or numbers")),
        }
    }
}
