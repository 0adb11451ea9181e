/// Blueprint synthesizer: promise, outcome, tone palette, and the story and
/// research hooks the rest of the manuscript draws from.

use crate::core::archetypes::{ArchetypeTables, LabeledHook};
use crate::core::template::Slots;
use crate::core::text::{push_unique, tone_descriptors};
use crate::schema::brief::ManuscriptInputs;
use crate::schema::manuscript::Blueprint;

/// Most descriptors a tonal palette carries.
pub const MAX_PALETTE: usize = 5;

/// Derive the blueprint for a brief. Pure and total: the same brief always
/// yields the same blueprint.
pub fn synthesize_blueprint(inputs: &ManuscriptInputs, tables: &ArchetypeTables) -> Blueprint {
    let slots = Slots::for_inputs(inputs);

    Blueprint {
        promise: tables.blueprint.promise.render(&slots),
        measurable_outcome: tables.blueprint.outcome.render(&slots),
        tonal_palette: tonal_palette(&inputs.tone, tables),
        anchor_stories: render_hooks(&tables.anchor_stories, &slots),
        research_buckets: render_hooks(&tables.research_buckets, &slots),
    }
}

/// The author's tone first, then its individual descriptors, their companion
/// words, and fixed fallbacks until the palette holds three to five entries.
pub fn tonal_palette(tone: &str, tables: &ArchetypeTables) -> Vec<String> {
    let mut palette = vec![tone.trim().to_string()];
    let descriptors = tone_descriptors(tone);

    for descriptor in &descriptors {
        if palette.len() >= MAX_PALETTE {
            break;
        }
        push_unique(&mut palette, descriptor);
    }

    let companions = descriptors
        .iter()
        .filter_map(|d| tables.tone_companions.get(d))
        .flatten()
        .chain(tables.fallback_companions.iter());
    for word in companions {
        if palette.len() >= MAX_PALETTE {
            break;
        }
        push_unique(&mut palette, word);
    }

    palette
}

fn render_hooks(hooks: &[LabeledHook], slots: &Slots) -> Vec<String> {
    hooks
        .iter()
        .map(|hook| format!("{}: {}", hook.label, hook.template.render(slots)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(tone: &str) -> ManuscriptInputs {
        ManuscriptInputs::new(
            "The 30-Minute Creator Sprint",
            "building a daily creative routine that ships ideas",
            "solopreneur creators",
            tone,
            24,
        )
        .unwrap()
    }

    #[test]
    fn promise_and_outcome_mention_idea_and_audience() {
        let tables = ArchetypeTables::builtin().unwrap();
        let bp = synthesize_blueprint(&inputs("bold"), tables);
        for text in [&bp.promise, &bp.measurable_outcome] {
            assert!(text.contains("building a daily creative routine that ships ideas"));
            assert!(text.contains("solopreneur creators"));
        }
    }

    #[test]
    fn palette_keeps_original_tone_first() {
        let tables = ArchetypeTables::builtin().unwrap();
        let palette = tonal_palette("energizing and practical", tables);
        assert_eq!(palette[0], "energizing and practical");
        assert_eq!(
            palette,
            vec![
                "energizing and practical",
                "energizing",
                "practical",
                "upbeat",
                "motivating",
            ]
        );
    }

    #[test]
    fn palette_for_single_word_uses_companions() {
        let tables = ArchetypeTables::builtin().unwrap();
        let palette = tonal_palette("bold", tables);
        assert_eq!(palette, vec!["bold", "direct", "confident", "clear", "encouraging"]);
    }

    #[test]
    fn palette_for_unknown_tone_falls_back() {
        let tables = ArchetypeTables::builtin().unwrap();
        let palette = tonal_palette("clear", tables);
        assert_eq!(palette[0], "clear");
        assert!((3..=MAX_PALETTE).contains(&palette.len()));
        assert_eq!(palette.iter().filter(|p| p.as_str() == "clear").count(), 1);
    }

    #[test]
    fn hooks_are_labelled() {
        let tables = ArchetypeTables::builtin().unwrap();
        let bp = synthesize_blueprint(&inputs("warm"), tables);
        assert_eq!(bp.anchor_stories.len(), 3);
        assert!(bp.anchor_stories[0].starts_with("Origin story: "));
        assert!(bp.research_buckets[0].starts_with("Data: "));
    }

    #[test]
    fn blueprint_is_deterministic() {
        let tables = ArchetypeTables::builtin().unwrap();
        assert_eq!(
            synthesize_blueprint(&inputs("warm"), tables),
            synthesize_blueprint(&inputs("warm"), tables)
        );
    }
}
