/// Page drafter: expands each chapter's page allocation into drafted pages.
///
/// Page numbers run across the whole manuscript. Within a chapter the first
/// page tells one of the blueprint's anchor stories, inner pages alternate
/// research and practice, and the last page closes with an action.

use rand::rngs::StdRng;

use crate::core::archetypes::{choose, ArchetypeTables};
use crate::core::template::Slots;
use crate::core::text::{capitalize_first, join_phrase};
use crate::schema::brief::ManuscriptInputs;
use crate::schema::manuscript::{Blueprint, Chapter, Page};
use crate::schema::role::{PageBeat, PagePosition};

pub fn draft_pages(
    chapters: &[Chapter],
    blueprint: &Blueprint,
    inputs: &ManuscriptInputs,
    tables: &ArchetypeTables,
    rng: &mut StdRng,
) -> Vec<Page> {
    let base = Slots::for_inputs(inputs)
        .with("palette", palette_phrase(blueprint))
        .with("outcome", blueprint.measurable_outcome.as_str());

    let total: u32 = chapters.iter().map(|c| c.page_estimate).sum();
    let mut pages = Vec::with_capacity(total as usize);
    let mut page_number = 0u32;
    let mut research_count = 0usize;

    for (chapter_index, chapter) in chapters.iter().enumerate() {
        let role_label = tables.role(chapter.role).label.as_str();
        let mut slots = base
            .clone()
            .with("focus", chapter.focus.as_str())
            .with("focus_sentence", capitalize_first(&chapter.focus))
            .with("chapter_title", chapter.title.as_str())
            .with("chapter_number", (chapter_index + 1).to_string())
            .with("role", role_label);
        if let Some(story) = pick(&blueprint.anchor_stories, chapter_index) {
            slots.set("story", story);
        }

        for offset in 0..chapter.page_estimate {
            page_number += 1;
            let position = PagePosition::of(offset, chapter.page_estimate);
            let beat = PageBeat::of(offset, chapter.page_estimate);

            slots.set("page_in_chapter", (offset + 1).to_string());
            if beat == PageBeat::Research {
                if let Some(bucket) = pick(&blueprint.research_buckets, research_count) {
                    slots.set("research", bucket);
                }
                research_count += 1;
            }

            let heading = choose(tables.headings(position), rng).render(&slots);
            let content = tables
                .paragraphs(beat)
                .iter()
                .map(|alternatives| choose(alternatives, rng).render(&slots))
                .collect();
            let call_to_action = tables
                .calls_to_action(beat)
                .map(|alternatives| choose(alternatives, rng).render(&slots));

            pages.push(Page {
                page_number,
                chapter_title: chapter.title.clone(),
                heading,
                content,
                call_to_action,
            });
        }
    }

    pages
}

/// The palette's companion descriptors as prose, skipping the author's own
/// tone phrase that always leads the list.
fn palette_phrase(blueprint: &Blueprint) -> String {
    match blueprint.tonal_palette.split_first() {
        Some((_, rest)) if !rest.is_empty() => join_phrase(rest),
        Some((tone, _)) => tone.clone(),
        None => String::new(),
    }
}

fn pick(items: &[String], index: usize) -> Option<&str> {
    if items.is_empty() {
        None
    } else {
        Some(items[index % items.len()].as_str())
    }
}
