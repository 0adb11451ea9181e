/// The manuscript pipeline: Brief → Manuscript orchestration.
///
/// Wires together blueprint synthesis, chapter architecture, page drafting,
/// formatting guidance, and marketing, then checks the cross-component
/// invariants before handing the manuscript back.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHasher;
use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::architect::{architect_chapters, MIN_CHAPTERS};
use crate::core::archetypes::{ArchetypeError, ArchetypeTables};
use crate::core::blueprint::synthesize_blueprint;
use crate::core::drafter::draft_pages;
use crate::core::guidance::generate_guidance;
use crate::core::marketing::compose_marketing;
use crate::schema::brief::{InputError, ManuscriptInputs};
use crate::schema::manuscript::Manuscript;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The brief broke the input contract. Callers are expected to validate
    /// before calling, so this indicates a caller defect.
    #[error("input contract violated: {0}")]
    Contract(#[from] InputError),
    /// An internal consistency check failed after synthesis.
    #[error("manuscript invariant violated: {0}")]
    InvariantViolation(String),
    #[error("archetype error: {0}")]
    Archetype(#[from] ArchetypeError),
}

/// The manuscript engine. Built via `ManuscriptEngine::builder()`.
///
/// Holds only read-only tables and a seed; `assemble` takes `&self`, so one
/// engine can serve any number of threads.
#[derive(Debug, Clone)]
pub struct ManuscriptEngine {
    tables: Cow<'static, ArchetypeTables>,
    seed: u64,
}

/// Builder for constructing a `ManuscriptEngine`.
pub struct ManuscriptEngineBuilder {
    archetypes_path: Option<String>,
    seed: u64,
    /// Directly provided tables (for testing without files).
    archetypes: Option<ArchetypeTables>,
}

impl ManuscriptEngine {
    pub fn builder() -> ManuscriptEngineBuilder {
        ManuscriptEngineBuilder {
            archetypes_path: None,
            seed: 0,
            archetypes: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tables(&self) -> &ArchetypeTables {
        &self.tables
    }

    /// Synthesize a complete manuscript for a brief.
    ///
    /// Returns either a manuscript that passed every consistency check or an
    /// error; never a partial manuscript.
    pub fn assemble(&self, inputs: &ManuscriptInputs) -> Result<Manuscript, PipelineError> {
        inputs.validate()?;

        let seed = self.seed.wrapping_add(fingerprint(inputs));
        let mut rng = StdRng::seed_from_u64(seed);
        let tables = self.tables.as_ref();
        debug!(
            title = %inputs.working_title,
            target_pages = inputs.target_pages,
            seed,
            "assembling manuscript"
        );

        let blueprint = synthesize_blueprint(inputs, tables);
        debug!(palette = ?blueprint.tonal_palette, "blueprint synthesized");

        let chapters = architect_chapters(inputs, &blueprint, tables, &mut rng);
        debug!(chapters = chapters.len(), "chapters architected");

        let pages = draft_pages(&chapters, &blueprint, inputs, tables, &mut rng);
        debug!(pages = pages.len(), "pages drafted");

        let guidance = generate_guidance(inputs);
        let marketing = compose_marketing(inputs, &blueprint, tables);
        debug!(
            keywords = marketing.keywords.len(),
            categories = marketing.categories.len(),
            "guidance and marketing composed"
        );

        let manuscript = Manuscript {
            inputs: inputs.clone(),
            blueprint,
            chapters,
            pages,
            guidance,
            marketing,
        };
        verify_manuscript(&manuscript)?;
        Ok(manuscript)
    }
}

/// Assemble with the built-in tables and seed 0.
pub fn assemble(inputs: &ManuscriptInputs) -> Result<Manuscript, PipelineError> {
    ManuscriptEngine::builder().build()?.assemble(inputs)
}

/// Check the invariants that span components: chapter count, page
/// conservation, contiguous numbering, and chapter-page linkage.
pub fn verify_manuscript(manuscript: &Manuscript) -> Result<(), PipelineError> {
    let result = check(manuscript);
    if let Err(PipelineError::InvariantViolation(ref reason)) = result {
        warn!(title = %manuscript.inputs.working_title, %reason, "manuscript failed verification");
    }
    result
}

fn check(manuscript: &Manuscript) -> Result<(), PipelineError> {
    let target = manuscript.inputs.target_pages;
    let chapters = &manuscript.chapters;
    let pages = &manuscript.pages;

    if (chapters.len() as u32) < MIN_CHAPTERS {
        return violation(format!(
            "expected at least {} chapters, found {}",
            MIN_CHAPTERS,
            chapters.len()
        ));
    }
    if let Some(empty) = chapters.iter().find(|c| c.page_estimate == 0) {
        return violation(format!("chapter '{}' has no pages", empty.title));
    }
    let allocated: u32 = chapters.iter().map(|c| c.page_estimate).sum();
    if allocated != target {
        return violation(format!(
            "chapters allocate {} pages, target is {}",
            allocated, target
        ));
    }
    if pages.len() != target as usize {
        return violation(format!(
            "drafted {} pages, target is {}",
            pages.len(),
            target
        ));
    }
    for (i, page) in pages.iter().enumerate() {
        let expected = i as u32 + 1;
        if page.page_number != expected {
            return violation(format!(
                "page at position {} is numbered {}",
                expected, page.page_number
            ));
        }
    }
    for (i, chapter) in chapters.iter().enumerate() {
        if chapters[..i].iter().any(|c| c.id == chapter.id || c.title == chapter.title) {
            return violation(format!("chapter '{}' is not unique", chapter.title));
        }
    }

    // Each chapter must own exactly the contiguous run of pages its
    // allocation covers.
    let mut first = 0usize;
    for chapter in chapters {
        let last = first + chapter.page_estimate as usize;
        if let Some(stray) = pages[first..last]
            .iter()
            .find(|p| p.chapter_title != chapter.title)
        {
            return violation(format!(
                "page {} belongs to '{}', expected '{}'",
                stray.page_number, stray.chapter_title, chapter.title
            ));
        }
        first = last;
    }

    Ok(())
}

fn violation(reason: String) -> Result<(), PipelineError> {
    Err(PipelineError::InvariantViolation(reason))
}

/// Stable per-brief seed offset, so identical briefs draft identically.
fn fingerprint(inputs: &ManuscriptInputs) -> u64 {
    let mut hasher = FxHasher::default();
    inputs.hash(&mut hasher);
    hasher.finish()
}

impl ManuscriptEngineBuilder {
    pub fn archetypes_path(mut self, path: &str) -> Self {
        self.archetypes_path = Some(path.to_string());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Provide archetype tables directly (for testing without files).
    pub fn with_archetypes(mut self, tables: ArchetypeTables) -> Self {
        self.archetypes = Some(tables);
        self
    }

    pub fn build(self) -> Result<ManuscriptEngine, PipelineError> {
        let tables = if let Some(tables) = self.archetypes {
            Cow::Owned(tables)
        } else if let Some(ref path) = self.archetypes_path {
            debug!(path = %path, "loading archetype tables");
            Cow::Owned(ArchetypeTables::load_from_ron(Path::new(path))?)
        } else {
            Cow::Borrowed(ArchetypeTables::builtin()?)
        };

        Ok(ManuscriptEngine {
            tables,
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::role::ChapterRole;

    fn brief(pages: u32) -> ManuscriptInputs {
        ManuscriptInputs::new(
            "The 30-Minute Creator Sprint",
            "building a daily creative routine that ships ideas",
            "solopreneur creators",
            "energizing and practical",
            pages,
        )
        .unwrap()
    }

    fn smuggled(pages: u32) -> ManuscriptInputs {
        ManuscriptInputs {
            working_title: "Smuggled".to_string(),
            core_idea: "skipping validation".to_string(),
            audience: "testers".to_string(),
            tone: "dry".to_string(),
            target_pages: pages,
        }
    }

    #[test]
    fn assemble_produces_consistent_manuscript() {
        let m = assemble(&brief(24)).unwrap();
        assert_eq!(m.pages.len(), 24);
        assert_eq!(m.chapters.len(), 5);
        assert_eq!(m.chapters[0].role, ChapterRole::Hook);
        assert!(verify_manuscript(&m).is_ok());
    }

    #[test]
    fn assemble_deterministic_same_seed() {
        let engine1 = ManuscriptEngine::builder().seed(42).build().unwrap();
        let engine2 = ManuscriptEngine::builder().seed(42).build().unwrap();
        let a = engine1.assemble(&brief(17)).unwrap();
        let b = engine2.assemble(&brief(17)).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn different_seeds_change_wording_not_structure() {
        let base = ManuscriptEngine::builder().seed(1).build().unwrap().assemble(&brief(26)).unwrap();
        let mut found_different = false;
        for seed in 2..50 {
            let other = ManuscriptEngine::builder()
                .seed(seed)
                .build()
                .unwrap()
                .assemble(&brief(26))
                .unwrap();
            assert_eq!(other.chapters.len(), base.chapters.len());
            assert_eq!(other.pages.len(), base.pages.len());
            if other.pages != base.pages {
                found_different = true;
                break;
            }
        }
        assert!(found_different, "expected different wording with different seeds");
    }

    #[test]
    fn out_of_range_pages_fail_fast() {
        for pages in [5, 40] {
            let err = assemble(&smuggled(pages)).unwrap_err();
            assert!(
                matches!(err, PipelineError::Contract(InputError::PagesOutOfRange(p)) if p == pages as i64),
                "got {}",
                err
            );
        }
    }

    #[test]
    fn blank_strings_fail_fast() {
        let mut inputs = smuggled(12);
        inputs.core_idea = "   ".to_string();
        assert!(matches!(
            assemble(&inputs),
            Err(PipelineError::Contract(InputError::EmptyField("coreIdea")))
        ));
    }

    #[test]
    fn verify_catches_page_count_mismatch() {
        let mut m = assemble(&brief(12)).unwrap();
        m.pages.pop();
        assert!(matches!(
            verify_manuscript(&m),
            Err(PipelineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn verify_catches_numbering_gap() {
        let mut m = assemble(&brief(12)).unwrap();
        m.pages[4].page_number = 9;
        let err = verify_manuscript(&m).unwrap_err();
        assert!(err.to_string().contains("numbered 9"));
    }

    #[test]
    fn verify_catches_misassigned_page() {
        let mut m = assemble(&brief(12)).unwrap();
        m.pages[0].chapter_title = m.chapters[1].title.clone();
        assert!(matches!(
            verify_manuscript(&m),
            Err(PipelineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn verify_catches_allocation_drift() {
        let mut m = assemble(&brief(12)).unwrap();
        m.chapters[0].page_estimate += 1;
        let err = verify_manuscript(&m).unwrap_err();
        assert!(err.to_string().contains("allocate 13 pages"));
    }

    #[test]
    fn builder_with_seed() {
        let engine = ManuscriptEngine::builder().seed(12345).build().unwrap();
        assert_eq!(engine.seed(), 12345);
    }

    #[test]
    fn builder_with_archetypes() {
        let tables = ArchetypeTables::builtin().unwrap().clone();
        let engine = ManuscriptEngine::builder().with_archetypes(tables).build().unwrap();
        assert!(engine.assemble(&brief(10)).is_ok());
    }

    #[test]
    fn builder_missing_archetypes_file_errors() {
        let result = ManuscriptEngine::builder()
            .archetypes_path("does/not/exist.ron")
            .build();
        assert!(matches!(
            result,
            Err(PipelineError::Archetype(ArchetypeError::Io(_)))
        ));
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        let engine = std::sync::Arc::new(ManuscriptEngine::builder().build().unwrap());
        let expected = engine.assemble(&brief(20)).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || engine.assemble(&brief(20)).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
