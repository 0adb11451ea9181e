/// Marketing composer: subtitle, pitch, keywords, categories, and persona.

use crate::core::archetypes::ArchetypeTables;
use crate::core::template::Slots;
use crate::core::text::{join_phrase, push_unique, significant_words};
use crate::schema::brief::ManuscriptInputs;
use crate::schema::manuscript::{Blueprint, Marketing};

/// Words drawn from the brief before the fixed boosters are appended.
pub const MAX_BRIEF_KEYWORDS: usize = 7;
/// Taxonomy categories chosen by keyword overlap, before the short-read band.
pub const MAX_TOPIC_CATEGORIES: usize = 2;

pub fn compose_marketing(
    inputs: &ManuscriptInputs,
    blueprint: &Blueprint,
    tables: &ArchetypeTables,
) -> Marketing {
    let companions = blueprint.tonal_palette.get(1..).unwrap_or_default();
    let slots = Slots::for_inputs(inputs)
        .with("promise", blueprint.promise.as_str())
        .with("outcome", blueprint.measurable_outcome.as_str())
        .with("palette", join_phrase(companions));

    let keywords = keywords(inputs, tables);
    let categories = categories(inputs, &keywords, tables);

    Marketing {
        subtitle: tables.marketing.subtitle.render(&slots),
        elevator_pitch: tables.marketing.pitch.render(&slots),
        author_persona: tables.marketing.persona.render(&slots),
        keywords,
        categories,
    }
}

/// Significant words from the idea, audience, and tone in that order,
/// deduplicated, followed by the table's boosters.
pub fn keywords(inputs: &ManuscriptInputs, tables: &ArchetypeTables) -> Vec<String> {
    let mut keywords = Vec::new();
    let sources = [&inputs.core_idea, &inputs.audience, &inputs.tone];
    for word in sources
        .iter()
        .flat_map(|text| significant_words(text, &tables.stopwords))
    {
        if keywords.len() >= MAX_BRIEF_KEYWORDS {
            break;
        }
        push_unique(&mut keywords, &word);
    }
    for booster in &tables.keyword_boosters {
        push_unique(&mut keywords, booster);
    }
    keywords
}

/// Taxonomy entries whose triggers overlap the brief's words, topped up from
/// the defaults, then the short-read band for the page count.
pub fn categories(
    inputs: &ManuscriptInputs,
    keywords: &[String],
    tables: &ArchetypeTables,
) -> Vec<String> {
    let mut categories = Vec::new();
    for category in &tables.categories {
        if categories.len() >= MAX_TOPIC_CATEGORIES {
            break;
        }
        let hit = category
            .triggers
            .iter()
            .any(|t| keywords.iter().any(|k| k.eq_ignore_ascii_case(t)));
        if hit {
            push_unique(&mut categories, &category.name);
        }
    }
    for default in &tables.default_categories {
        if categories.len() >= MAX_TOPIC_CATEGORIES {
            break;
        }
        push_unique(&mut categories, default);
    }
    if let Some(band) = tables.short_read_band(inputs.target_pages) {
        push_unique(&mut categories, &band.name);
    }
    categories
}
