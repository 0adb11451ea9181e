/// Slot templates: parsing and rendering of `{slot}` interpolation strings.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::text::title_case;
use crate::schema::brief::ManuscriptInputs;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template parse error: {0}")]
    Parse(String),
    #[error("unknown slot '{slot}' in {section}")]
    UnknownSlot { section: String, slot: String },
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// A named value supplied at render time: `{core_idea}`.
    Slot(String),
}

/// A parsed template: a sequence of segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

impl Template {
    /// Parse a template string into a sequence of segments.
    ///
    /// Syntax:
    /// - `{slot_name}` → `Slot`
    /// - `{{` / `}}` → literal `{` / `}`
    /// - Everything else → `Literal`
    pub fn parse(input: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            if chars[i] == '{' {
                if i + 1 < len && chars[i + 1] == '{' {
                    literal_buf.push('{');
                    i += 2;
                    continue;
                }

                if !literal_buf.is_empty() {
                    segments.push(TemplateSegment::Literal(std::mem::take(&mut literal_buf)));
                }

                let start = i + 1;
                let mut end = start;
                while end < len && chars[end] != '}' {
                    if chars[end] == '{' {
                        return Err(TemplateError::Parse(
                            "nested braces are not allowed".to_string(),
                        ));
                    }
                    end += 1;
                }
                if end == len {
                    return Err(TemplateError::Parse("unclosed brace".to_string()));
                }

                let name: String = chars[start..end].iter().collect();
                let name = name.trim();
                if name.is_empty() {
                    return Err(TemplateError::Parse("empty braces".to_string()));
                }
                if !name.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
                    return Err(TemplateError::Parse(format!(
                        "invalid slot name '{}': expected lowercase letters and underscores",
                        name
                    )));
                }

                segments.push(TemplateSegment::Slot(name.to_string()));
                i = end + 1;
            } else if chars[i] == '}' {
                if i + 1 < len && chars[i + 1] == '}' {
                    literal_buf.push('}');
                    i += 2;
                    continue;
                }
                return Err(TemplateError::Parse(
                    "unmatched closing brace".to_string(),
                ));
            } else {
                literal_buf.push(chars[i]);
                i += 1;
            }
        }

        if !literal_buf.is_empty() {
            segments.push(TemplateSegment::Literal(literal_buf));
        }

        Ok(Template { segments })
    }

    /// Names of every slot this template references, in order of appearance.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Slot(name) => Some(name.as_str()),
            TemplateSegment::Literal(_) => None,
        })
    }

    /// Fail if the template references a slot outside `allowed`.
    pub fn check_slots(&self, section: &str, allowed: &[&str]) -> Result<(), TemplateError> {
        match self.slots().find(|s| !allowed.contains(s)) {
            Some(slot) => Err(TemplateError::UnknownSlot {
                section: section.to_string(),
                slot: slot.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Interpolate slot values. A slot with no binding is emitted as `{name}`.
    pub fn render(&self, slots: &Slots) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => out.push_str(text),
                TemplateSegment::Slot(name) => match slots.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}

/// Names from `declared` that appear as a literal `{name}` in rendered text.
/// Other braces, such as the output of `{{`/`}}` escapes, are ignored.
pub fn unbound_slots<'a>(text: &'a str, declared: &[&str]) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        rest = &rest[open + 1..];
        let Some(close) = rest.find('}') else {
            break;
        };
        let name = &rest[..close];
        if declared.contains(&name) {
            found.push(name);
        }
    }
    found
}

/// Slot bindings for a single render.
#[derive(Debug, Clone, Default)]
pub struct Slots {
    values: FxHashMap<&'static str, String>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for the slots every template may use.
    pub fn for_inputs(inputs: &ManuscriptInputs) -> Self {
        Self::new()
            .with("working_title", inputs.working_title.as_str())
            .with("core_idea", inputs.core_idea.as_str())
            .with("core_idea_title", title_case(&inputs.core_idea))
            .with("audience", inputs.audience.as_str())
            .with("audience_title", title_case(&inputs.audience))
            .with("tone", inputs.tone.as_str())
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<String>) {
        self.values.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}
