/// Archetype Linter: validates an archetype table file.
///
/// Usage: archetype_linter [<archetypes.ron>] [--sample <pages>]
///
/// With no path, lints the tables compiled into the crate. `--sample` also
/// drafts a throwaway manuscript of the given length to surface slots that
/// render unbound.

use manuscript_engine::core::archetypes::{
    paragraph_slots, ArchetypeTables, CALL_TO_ACTION_SLOTS, HEADING_SLOTS, INPUT_SLOTS,
};
use manuscript_engine::core::template::unbound_slots;
use manuscript_engine::schema::brief::ManuscriptInputs;
use manuscript_engine::schema::role::PageBeat;
use manuscript_engine::ManuscriptEngine;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: archetype_linter [<archetypes.ron>] [--sample <pages>]");
        process::exit(0);
    }

    let mut path = None;
    let mut sample_pages = None;

    let mut i = 1;
    while i < args.len() {
        if args[i] == "--sample" && i + 1 < args.len() {
            i += 1;
            sample_pages = match args[i].parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    eprintln!("ERROR: --sample expects a page count, got '{}'", args[i]);
                    process::exit(1);
                }
            };
        } else if path.is_none() {
            path = Some(args[i].clone());
        } else {
            eprintln!("Unknown argument: {}", args[i]);
            process::exit(1);
        }
        i += 1;
    }

    let tables = match path {
        Some(ref p) => match ArchetypeTables::load_from_ron(Path::new(p)) {
            Ok(tables) => {
                println!("Loaded: {}", p);
                tables
            }
            Err(e) => {
                println!("ERROR: {}", e);
                println!("\nSummary: 1 errors, 0 warnings");
                process::exit(1);
            }
        },
        None => match ArchetypeTables::builtin() {
            Ok(tables) => {
                println!("Loaded: built-in tables");
                tables.clone()
            }
            Err(e) => {
                println!("ERROR: {}", e);
                process::exit(1);
            }
        },
    };

    let warnings = tables.lint();
    let mut errors = Vec::new();

    if let Some(pages) = sample_pages {
        errors.extend(sample_errors(&tables, pages));
    }

    println!("\n=== Archetype Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

/// Draft a sample manuscript and report any page text with an unbound slot.
fn sample_errors(tables: &ArchetypeTables, pages: u32) -> Vec<String> {
    let inputs = match ManuscriptInputs::new(
        "Lint Sample",
        "a sample idea",
        "sample readers",
        "plain",
        pages,
    ) {
        Ok(inputs) => inputs,
        Err(e) => return vec![format!("sample brief rejected: {}", e)],
    };

    let engine = match ManuscriptEngine::builder()
        .with_archetypes(tables.clone())
        .build()
    {
        Ok(engine) => engine,
        Err(e) => return vec![e.to_string()],
    };

    let manuscript = match engine.assemble(&inputs) {
        Ok(m) => m,
        Err(e) => return vec![e.to_string()],
    };

    let declared = |extra: &[&'static str]| -> Vec<&'static str> {
        INPUT_SLOTS.iter().chain(extra).copied().collect()
    };
    let heading_slots = declared(HEADING_SLOTS);
    let paragraph_extra: Vec<&'static str> = PageBeat::ALL
        .iter()
        .flat_map(|beat| paragraph_slots(*beat))
        .collect();
    let content_slots = declared(paragraph_extra.as_slice());
    let cta_slots = declared(CALL_TO_ACTION_SLOTS);

    let mut errors = Vec::new();
    for page in &manuscript.pages {
        let texts = std::iter::once((&page.heading, &heading_slots))
            .chain(page.content.iter().map(|text| (text, &content_slots)))
            .chain(page.call_to_action.iter().map(|text| (text, &cta_slots)));
        for (text, slots) in texts {
            for slot in unbound_slots(text, slots) {
                errors.push(format!(
                    "Page {} renders an unbound slot {{{}}}: \"{}\"",
                    page.page_number, slot, text
                ));
            }
        }
    }
    errors
}
