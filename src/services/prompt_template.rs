//! Prompt templates with `{{name}}` placeholders.

use std::collections::HashMap;

use crate::domain::errors::{DomainError, DomainResult};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A prompt with named placeholders, e.g. `Translate to {{language}}: {{text}}`.
///
/// Rendering is a single pass: substituted values are inserted verbatim and
/// never re-scanned for placeholders. An unterminated `{{` is literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let mut variables = Vec::new();
        for segment in parse(&template) {
            if let Segment::Variable(name) = segment {
                if !variables.iter().any(|v| v == name) {
                    variables.push(name.to_string());
                }
            }
        }
        Self {
            template,
            variables,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in order of first appearance.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Render with values from a map.
    ///
    /// Fails with `ValidationFailed` naming the first placeholder that has no value.
    pub fn render(&self, values: &HashMap<String, String>) -> DomainResult<String> {
        self.render_with_lookup(|name| values.get(name).map(String::as_str))
    }

    /// Render with `(name, value)` pairs.
    pub fn render_with(&self, values: &[(&str, &str)]) -> DomainResult<String> {
        self.render_with_lookup(|name| {
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
        })
    }

    fn render_with_lookup<'a>(
        &self,
        lookup: impl Fn(&str) -> Option<&'a str>,
    ) -> DomainResult<String> {
        let mut rendered = String::with_capacity(self.template.len());
        for segment in parse(&self.template) {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Variable(name) => {
                    let value = lookup(name).ok_or_else(|| {
                        DomainError::ValidationFailed(format!(
                            "missing value for template variable '{name}'"
                        ))
                    })?;
                    rendered.push_str(value);
                }
            }
        }
        Ok(rendered)
    }
}

enum Segment<'a> {
    Literal(&'a str),
    Variable(&'a str),
}

fn parse(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };
        let name = after_open[..end].trim();
        if name.is_empty() {
            segments.push(Segment::Literal(&rest[..start + OPEN.len() + end + CLOSE.len()]));
        } else {
            if start > 0 {
                segments.push(Segment::Literal(&rest[..start]));
            }
            segments.push(Segment::Variable(name));
        }
        rest = &after_open[end + CLOSE.len()..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    segments
}
