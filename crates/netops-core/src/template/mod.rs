//! A small, closed template language for document rendering.
//!
//! Supports `{{ field | filter }}` substitution, `{% if %}`/`{% else %}`
//! conditionals, `{% for %}` loops with `loop.index`/`loop.first`/`loop.last`,
//! and `{# comments #}`. Templates compile once and render any number of
//! records; rendering never mutates the template or the record.

mod filter;
mod lexer;
mod parser;
mod render;

use netops_types::error::TemplateError;
use netops_types::record::InputRecord;

use self::parser::Node;

/// A compiled template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Render against `record`. On error nothing is returned, not even the
    /// text rendered before the failing construct.
    pub fn render(&self, record: &InputRecord) -> Result<String, TemplateError> {
        let mut out = String::new();
        render::Context::new(record).render(&self.nodes, &mut out)?;
        Ok(out)
    }
}

/// Compile template source, reporting the first malformed construct.
pub fn compile(source: &str) -> Result<Template, TemplateError> {
    let tokens = lexer::tokenize(source)?;
    let nodes = parser::parse(tokens)?;
    Ok(Template { nodes })
}

/// Compile and render in one step.
pub fn render(source: &str, record: &InputRecord) -> Result<String, TemplateError> {
    compile(source)?.render(record)
}
