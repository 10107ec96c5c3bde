//! Evaluates a parsed template against a record.

use std::borrow::Cow;

use netops_types::error::TemplateError;
use netops_types::record::InputRecord;
use netops_types::value::Value;

use super::parser::{Expr, LOOP_VAR, Node};

/// One active `for` loop.
struct Frame<'a> {
    var: &'a str,
    item: &'a str,
    index: usize,
    len: usize,
}

pub(crate) struct Context<'a> {
    record: &'a InputRecord,
    frames: Vec<Frame<'a>>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(record: &'a InputRecord) -> Self {
        Self {
            record,
            frames: Vec::new(),
        }
    }

    /// Resolve a dotted path. Loop variables shadow record fields; `loop.*`
    /// reads the innermost loop.
    fn lookup(&self, path: &str) -> Option<Cow<'a, Value>> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        if let Some(frame) = self.frames.iter().rev().find(|f| f.var == head) {
            return match rest {
                None => Some(Cow::Owned(Value::Text(frame.item.to_string()))),
                Some(_) => None,
            };
        }

        if head == LOOP_VAR {
            if let (Some(frame), Some(attr)) = (self.frames.last(), rest) {
                let value = match attr {
                    "index" => Value::Number(frame.index as f64),
                    "index0" => Value::Number((frame.index - 1) as f64),
                    "first" => Value::Bool(frame.index == 1),
                    "last" => Value::Bool(frame.index == frame.len),
                    "length" => Value::Number(frame.len as f64),
                    _ => return None,
                };
                return Some(Cow::Owned(value));
            }
        }

        self.record.get(path).map(Cow::Borrowed)
    }

    pub(crate) fn render(&mut self, nodes: &'a [Node], out: &mut String) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output(expr) => out.push_str(&self.eval(expr)?.to_string()),
                Node::If {
                    negate,
                    path,
                    then,
                    otherwise,
                } => {
                    let truthy = self.lookup(path).is_some_and(|v| v.is_truthy());
                    let branch = if truthy != *negate { then } else { otherwise };
                    self.render(branch, out)?;
                }
                Node::For {
                    var,
                    path,
                    body,
                    line,
                } => {
                    let items: &'a [String] = match self.lookup(path) {
                        Some(Cow::Borrowed(Value::List(items))) => items,
                        Some(Cow::Borrowed(_) | Cow::Owned(_)) => {
                            return Err(TemplateError::NotASequence {
                                name: path.clone(),
                                line: *line,
                            });
                        }
                        None => {
                            return Err(TemplateError::UnresolvedVariable {
                                name: path.clone(),
                                line: *line,
                            });
                        }
                    };

                    for (i, item) in items.iter().enumerate() {
                        self.frames.push(Frame {
                            var,
                            item,
                            index: i + 1,
                            len: items.len(),
                        });
                        let result = self.render(body, out);
                        self.frames.pop();
                        result?;
                    }
                }
            }
        }
        Ok(())
    }

    fn eval(&self, expr: &Expr) -> Result<Value, TemplateError> {
        let initial = self.lookup(&expr.path).map(Cow::into_owned);
        expr.filters
            .iter()
            .fold(initial, |value, filter| filter.apply(value))
            .ok_or_else(|| TemplateError::UnresolvedVariable {
                name: expr.path.clone(),
                line: expr.line,
            })
    }
}
