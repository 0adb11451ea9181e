use serde::{Deserialize, Serialize};

use super::brief::ManuscriptInputs;
use super::role::ChapterRole;

/// The book-level strategic summary, derived once per brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub promise: String,
    pub measurable_outcome: String,
    /// Tone descriptors; the author's own tone always comes first.
    pub tonal_palette: Vec<String>,
    pub anchor_stories: Vec<String>,
    pub research_buckets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub role: ChapterRole,
    pub focus: String,
    pub page_estimate: u32,
    pub key_questions: Vec<String>,
}

/// One Kindle-page-equivalent of drafted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_number: u32,
    /// Title of the owning chapter, copied by value.
    pub chapter_title: String,
    pub heading: String,
    pub content: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
}

/// Kindle formatting guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guidance {
    pub trim_size: String,
    pub interior: String,
    pub font: String,
    pub margins: String,
    pub front_matter: Vec<String>,
    pub back_matter: Vec<String>,
}

/// Marketing launch kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marketing {
    pub subtitle: String,
    pub elevator_pitch: String,
    pub author_persona: String,
    pub keywords: Vec<String>,
    pub categories: Vec<String>,
}

/// The aggregate returned by the engine. Owned by the caller; the engine
/// keeps no reference to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manuscript {
    pub inputs: ManuscriptInputs,
    pub blueprint: Blueprint,
    pub chapters: Vec<Chapter>,
    pub pages: Vec<Page>,
    pub guidance: Guidance,
    pub marketing: Marketing,
}

impl Manuscript {
    /// Pages belonging to the chapter with the given title, in order.
    pub fn pages_of<'a>(&'a self, chapter_title: &'a str) -> impl Iterator<Item = &'a Page> + 'a {
        self.pages
            .iter()
            .filter(move |p| p.chapter_title == chapter_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_serializes_camel_case_and_skips_missing_cta() {
        let page = Page {
            page_number: 3,
            chapter_title: "Chapter 1: Start".to_string(),
            heading: "Heading".to_string(),
            content: vec!["One.".to_string(), "Two.".to_string()],
            call_to_action: None,
        };
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"pageNumber\":3"));
        assert!(json.contains("\"chapterTitle\""));
        assert!(!json.contains("callToAction"));
    }

    #[test]
    fn chapter_role_serializes_as_variant_name() {
        let chapter = Chapter {
            id: "chapter-1".to_string(),
            title: "Chapter 1: Start".to_string(),
            role: ChapterRole::Hook,
            focus: "focus".to_string(),
            page_estimate: 4,
            key_questions: vec![],
        };
        let json = serde_json::to_string(&chapter).unwrap();
        assert!(json.contains("\"role\":\"Hook\""));
        assert!(json.contains("\"pageEstimate\":4"));
        assert!(json.contains("\"keyQuestions\":[]"));
    }
}
