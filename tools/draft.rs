/// Draft: build a manuscript from a brief and print it.
///
/// Usage:
///   draft --brief <brief.ron|brief.json> [options]
///   draft --title <t> --idea <i> --audience <a> --tone <t> --pages <n> [options]
///
/// Options:
///   --seed <n>            wording seed (default 0)
///   --archetypes <path>   archetype table file (default: built-in)
///   --format <fmt>        json (default), ron, or summary
///
/// Set RUST_LOG=manuscript_engine=debug to trace the pipeline stages.

use manuscript_engine::schema::brief::{RawBrief, RawPageCount};
use manuscript_engine::{Manuscript, ManuscriptEngine};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut brief = RawBrief::default();
    let mut brief_path = None;
    let mut seed: u64 = 0;
    let mut archetypes = None;
    let mut format = "json".to_string();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match (args[i].as_str(), value) {
            ("--brief", Some(v)) => brief_path = Some(v),
            ("--title", Some(v)) => brief.working_title = Some(v),
            ("--idea", Some(v)) => brief.core_idea = Some(v),
            ("--audience", Some(v)) => brief.audience = Some(v),
            ("--tone", Some(v)) => brief.tone = Some(v),
            ("--pages", Some(v)) => brief.target_pages = Some(RawPageCount::Text(v)),
            ("--seed", Some(v)) => {
                seed = v.parse().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be a non-negative integer");
                    process::exit(1);
                })
            }
            ("--archetypes", Some(v)) => archetypes = Some(v),
            ("--format", Some(v)) => format = v,
            (other, _) => {
                eprintln!("Unknown or incomplete argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 2;
    }

    if let Some(ref path) = brief_path {
        brief = load_brief(path).unwrap_or_else(|e| {
            eprintln!("Error reading brief '{}': {}", path, e);
            process::exit(1);
        });
    }

    let inputs = brief.normalize().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let mut builder = ManuscriptEngine::builder().seed(seed);
    if let Some(ref path) = archetypes {
        builder = builder.archetypes_path(path);
    }
    let engine = builder.build().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let manuscript = engine.assemble(&inputs).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let output = match format.as_str() {
        "json" => serde_json::to_string_pretty(&manuscript).map_err(|e| e.to_string()),
        "ron" => ron::ser::to_string_pretty(&manuscript, ron::ser::PrettyConfig::default())
            .map_err(|e| e.to_string()),
        "summary" => Ok(summary(&manuscript)),
        other => Err(format!("unknown format '{}'", other)),
    };

    match output {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Read a brief from RON or JSON, chosen by file extension.
fn load_brief(path: &str) -> Result<RawBrief, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    match Path::new(path).extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&contents).map_err(|e| e.to_string()),
        _ => ron::from_str(&contents).map_err(|e| e.to_string()),
    }
}

fn summary(m: &Manuscript) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n{}\n\n",
        m.inputs.working_title, m.marketing.subtitle
    ));
    out.push_str(&format!("Promise: {}\n", m.blueprint.promise));
    out.push_str(&format!("Outcome: {}\n", m.blueprint.measurable_outcome));
    out.push_str(&format!("Tone: {}\n\n", m.blueprint.tonal_palette.join(", ")));

    let mut first = 1;
    for chapter in &m.chapters {
        let last = first + chapter.page_estimate - 1;
        out.push_str(&format!(
            "{} (pages {}-{})\n  Focus: {}\n",
            chapter.title, first, last, chapter.focus
        ));
        for page in m.pages_of(&chapter.title) {
            out.push_str(&format!("    p{:>2}  {}\n", page.page_number, page.heading));
        }
        first = last + 1;
    }

    out.push_str(&format!(
        "\nTrim: {} | {}\n",
        m.guidance.trim_size, m.guidance.interior
    ));
    out.push_str(&format!("Keywords: {}\n", m.marketing.keywords.join(", ")));
    out.push_str(&format!("Categories: {}\n", m.marketing.categories.join(" | ")));
    out
}

fn print_usage() {
    println!("Draft: build a short-read manuscript from a brief");
    println!();
    println!("Usage:");
    println!("  draft --brief <brief.ron|brief.json> [options]");
    println!("  draft --title <t> --idea <i> --audience <a> --tone <t> --pages <n> [options]");
    println!();
    println!("Options:");
    println!("  --seed <n>            wording seed (default 0)");
    println!("  --archetypes <path>   archetype table file (default: built-in)");
    println!("  --format <fmt>        json (default), ron, or summary");
}
