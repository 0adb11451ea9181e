use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest manuscript the engine will draft.
pub const MIN_PAGES: u32 = 10;
/// Largest manuscript the engine will draft.
pub const MAX_PAGES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("targetPages must be a number between 10 and 30")]
    NotANumber,
    #[error("targetPages must be between 10 and 30, got {0}")]
    PagesOutOfRange(i64),
    #[error("field '{0}' is empty after trimming")]
    EmptyField(&'static str),
}

/// The validated brief a manuscript is synthesized from.
///
/// Build one with [`ManuscriptInputs::new`] or [`RawBrief::normalize`];
/// both trim every string and enforce the page range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManuscriptInputs {
    pub working_title: String,
    pub core_idea: String,
    pub audience: String,
    pub tone: String,
    pub target_pages: u32,
}

impl ManuscriptInputs {
    pub fn new(
        working_title: &str,
        core_idea: &str,
        audience: &str,
        tone: &str,
        target_pages: u32,
    ) -> Result<Self, InputError> {
        let inputs = Self {
            working_title: working_title.trim().to_string(),
            core_idea: core_idea.trim().to_string(),
            audience: audience.trim().to_string(),
            tone: tone.trim().to_string(),
            target_pages,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    /// Re-check a record that may have been built without [`ManuscriptInputs::new`].
    pub fn validate(&self) -> Result<(), InputError> {
        let fields = [
            ("workingTitle", &self.working_title),
            ("coreIdea", &self.core_idea),
            ("audience", &self.audience),
            ("tone", &self.tone),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(InputError::EmptyField(name));
            }
        }
        if !(MIN_PAGES..=MAX_PAGES).contains(&self.target_pages) {
            return Err(InputError::PagesOutOfRange(self.target_pages as i64));
        }
        Ok(())
    }
}

/// A page count as it arrives over the wire: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPageCount {
    Number(f64),
    Text(String),
}

impl RawPageCount {
    fn to_pages(&self) -> Result<i64, InputError> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().map_err(|_| InputError::NotANumber)?,
        };
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(InputError::NotANumber);
        }
        Ok(value as i64)
    }
}

/// An unvalidated brief, shaped like the JSON request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBrief {
    #[serde(default)]
    pub working_title: Option<String>,
    #[serde(default)]
    pub core_idea: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub target_pages: Option<RawPageCount>,
}

impl RawBrief {
    /// Check required fields in request order, trim, and parse the page count.
    pub fn normalize(&self) -> Result<ManuscriptInputs, InputError> {
        let working_title = required("workingTitle", &self.working_title)?;
        let core_idea = required("coreIdea", &self.core_idea)?;
        let audience = required("audience", &self.audience)?;
        let tone = required("tone", &self.tone)?;
        let pages = match &self.target_pages {
            None => return Err(InputError::MissingField("targetPages")),
            Some(RawPageCount::Text(s)) if s.trim().is_empty() => {
                return Err(InputError::MissingField("targetPages"))
            }
            Some(raw) => raw.to_pages()?,
        };
        let target_pages = u32::try_from(pages)
            .ok()
            .filter(|p| (MIN_PAGES..=MAX_PAGES).contains(p))
            .ok_or(InputError::PagesOutOfRange(pages))?;

        ManuscriptInputs::new(working_title, core_idea, audience, tone, target_pages)
    }
}

fn required<'a>(name: &'static str, value: &'a Option<String>) -> Result<&'a str, InputError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(InputError::MissingField(name)),
    }
}
