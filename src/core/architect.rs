/// Chapter architect: splits the page budget into chapters and gives each a
/// narrative role.

use rand::rngs::StdRng;

use crate::core::archetypes::{choose, ArchetypeTables};
use crate::core::template::Slots;
use crate::schema::brief::ManuscriptInputs;
use crate::schema::manuscript::{Blueprint, Chapter};
use crate::schema::role::ChapterRole;

pub const MIN_CHAPTERS: u32 = 3;
pub const MAX_CHAPTERS: u32 = 6;
/// Chapter count at which a foundation chapter follows the hook.
pub const FOUNDATION_FROM: u32 = 5;

/// Roughly one chapter per five pages, clamped to `[MIN_CHAPTERS, MAX_CHAPTERS]`.
/// Monotonic in `target_pages`: 10–17 pages → 3, 18–22 → 4, 23–27 → 5, 28+ → 6.
pub fn chapter_count(target_pages: u32) -> u32 {
    ((target_pages + 2) / 5).clamp(MIN_CHAPTERS, MAX_CHAPTERS)
}

/// Split `target_pages` as evenly as possible over `chapters`. The
/// remainder goes one page at a time to the earliest chapters.
pub fn allocate_pages(target_pages: u32, chapters: u32) -> Vec<u32> {
    if chapters == 0 {
        return Vec::new();
    }
    let base = target_pages / chapters;
    let remainder = target_pages % chapters;
    (0..chapters)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Role progression for `count` chapters: hook first, resolution last, a
/// foundation chapter second once there are enough chapters, and the
/// table's middle cycle for everything in between.
pub fn chapter_roles(count: u32, tables: &ArchetypeTables) -> Vec<ChapterRole> {
    let count = count as usize;
    let mut roles = Vec::with_capacity(count);
    if count == 0 {
        return roles;
    }
    roles.push(ChapterRole::Hook);
    if count >= FOUNDATION_FROM as usize {
        roles.push(ChapterRole::Foundation);
    }
    let middle = count.saturating_sub(roles.len() + 1);
    roles.extend(tables.middle_cycle.iter().copied().cycle().take(middle));
    if count > 1 {
        roles.push(ChapterRole::Resolution);
    }
    roles
}

pub fn architect_chapters(
    inputs: &ManuscriptInputs,
    blueprint: &Blueprint,
    tables: &ArchetypeTables,
    rng: &mut StdRng,
) -> Vec<Chapter> {
    let count = chapter_count(inputs.target_pages);
    let allocation = allocate_pages(inputs.target_pages, count);
    let roles = chapter_roles(count, tables);

    let slots = Slots::for_inputs(inputs)
        .with("promise", blueprint.promise.as_str())
        .with("outcome", blueprint.measurable_outcome.as_str());

    roles
        .into_iter()
        .zip(allocation)
        .enumerate()
        .map(|(i, (role, pages))| {
            let archetype = tables.role(role);
            let number = i + 1;
            Chapter {
                id: format!("chapter-{}", number),
                title: format!(
                    "Chapter {}: {}",
                    number,
                    choose(&archetype.titles, rng).render(&slots)
                ),
                role,
                focus: archetype.focus.render(&slots),
                page_estimate: pages,
                key_questions: archetype.questions.iter().map(|q| q.render(&slots)).collect(),
            }
        })
        .collect()
}
