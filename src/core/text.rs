/// Small string utilities shared by the synthesizers.

use rustc_hash::FxHashSet;

/// Words kept lowercase inside a title unless they lead it.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "in", "nor", "of", "on", "or", "per",
    "that", "the", "to", "via", "with",
];

/// Joiners that separate descriptors in a free-text tone.
const TONE_JOINERS: &[&str] = &["and", "or", "but", "yet", "with", "also", "plus", "very"];

/// Title-case a phrase: "building a daily routine" → "Building a Daily Routine".
pub fn title_case(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && MINOR_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize_first(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercased word tokens. Apostrophes and inner hyphens stay inside a word.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|w| w.trim_matches(|c: char| c == '\'' || c == '-'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Individual descriptors in a free-text tone such as "warm, funny and direct".
pub fn tone_descriptors(tone: &str) -> Vec<String> {
    words(tone)
        .into_iter()
        .filter(|w| !TONE_JOINERS.contains(&w.as_str()))
        .collect()
}

/// Words from `text` that are at least three characters and not stop-words.
pub fn significant_words(text: &str, stopwords: &FxHashSet<String>) -> Vec<String> {
    words(text)
        .into_iter()
        .filter(|w| w.chars().count() >= 3 && !stopwords.contains(w))
        .collect()
}

/// Join items as prose: "a", "a and b", "a, b and c".
pub fn join_phrase(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Append `item` unless an equal string (ignoring case) is already present.
pub fn push_unique(list: &mut Vec<String>, item: &str) -> bool {
    if list.iter().any(|existing| existing.eq_ignore_ascii_case(item)) {
        false
    } else {
        list.push(item.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_keeps_minor_words_low() {
        assert_eq!(
            title_case("building a daily creative routine that ships ideas"),
            "Building a Daily Creative Routine that Ships Ideas"
        );
        assert_eq!(title_case("the art of rest"), "The Art of Rest");
    }

    #[test]
    fn capitalize_first_handles_empty() {
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("why it matters"), "Why it matters");
    }

    #[test]
    fn words_split_on_punctuation() {
        assert_eq!(
            words("Warm, no-nonsense & direct!"),
            vec!["warm", "no-nonsense", "direct"]
        );
        assert_eq!(words("creators' 'quoted'"), vec!["creators", "quoted"]);
    }

    #[test]
    fn tone_descriptors_drop_joiners() {
        assert_eq!(
            tone_descriptors("energizing and practical"),
            vec!["energizing", "practical"]
        );
        assert_eq!(tone_descriptors("bold"), vec!["bold"]);
    }

    #[test]
    fn significant_words_filter_stopwords() {
        let stop: FxHashSet<String> = ["the", "that"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            significant_words("the habit that sticks in 30 days", &stop),
            vec!["habit", "sticks", "days"]
        );
    }

    #[test]
    fn join_phrase_forms() {
        let items: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(join_phrase(&items[..0]), "");
        assert_eq!(join_phrase(&items[..1]), "a");
        assert_eq!(join_phrase(&items[..2]), "a and b");
        assert_eq!(join_phrase(&items), "a, b and c");
    }

    #[test]
    fn push_unique_ignores_case() {
        let mut list = vec!["Calm".to_string()];
        assert!(!push_unique(&mut list, "calm"));
        assert!(push_unique(&mut list, "steady"));
        assert_eq!(list, vec!["Calm", "steady"]);
    }
}
