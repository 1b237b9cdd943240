//! Skill extraction: named entities plus whole-word industry keyword hits.
//!
//! Entity recognition is a pluggable collaborator. Recognizers are created
//! lazily, once per language, and shared read-only afterwards. A recognizer
//! that fails to load contributes nothing; extraction carries on with
//! keywords alone.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::extraction::locale::header_terms;
use crate::extraction::segmenter::match_header;
use crate::keywords::KeywordDatabase;
use crate::models::language::{Industry, Language};
use crate::models::record::SectionKind;

/// Entity categories that count as skills. Recognizers drop everything else
/// (people, places) themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Org,
    Product,
    Misc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<Entity>;
}

// Raised by pluggable loaders; the built-in pattern loader never fails.
#[allow(dead_code)]
pub type RecognizerLoader = Box<dyn Fn(Language) -> anyhow::Result<Arc<dyn EntityRecognizer>> + Send + Sync>;

/// Memoized, thread-safe recognizer factory keyed by language.
///
/// The loader runs at most once per language, including when it fails; the
/// failure is remembered so later requests skip straight to keyword matching.
pub struct RecognizerRegistry {
    loader: RecognizerLoader,
    loaded: Mutex<HashMap<Language, Option<Arc<dyn EntityRecognizer>>>>,
}

impl RecognizerRegistry {
    pub fn new(loader: RecognizerLoader) -> Self {
        Self {
            loader,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Registry backed by the built-in `PatternRecognizer`.
    pub fn with_pattern_recognizers() -> Self {
        Self::new(Box::new(|lang| {
            Ok(Arc::new(PatternRecognizer::new(lang)) as Arc<dyn EntityRecognizer>)
        }))
    }

    pub fn get(&self, lang: Language) -> Option<Arc<dyn EntityRecognizer>> {
        let mut loaded = self.loaded.lock().unwrap_or_else(|e| e.into_inner());
        loaded
            .entry(lang)
            .or_insert_with(|| match (self.loader)(lang) {
                Ok(recognizer) => {
                    info!("Entity recognizer loaded for '{lang}'");
                    Some(recognizer)
                }
                Err(e) => {
                    warn!("Entity recognizer for '{lang}' unavailable, continuing without entities: {e:#}");
                    None
                }
            })
            .clone()
    }
}

/// Rule-based recognizer: short acronyms become organisations, camel-case and
/// symbol-bearing tokens ("PostgreSQL", "C++") products, dotted tech names
/// ("Node.js", ".NET") misc.
///
/// Acronyms are only trusted inside mixed-case lines; an all-caps line is a
/// shouted heading or name.
pub struct PatternRecognizer {
    stop_acronyms: BTreeSet<String>,
}

/// Longest all-letter token still taken for an acronym.
const MAX_ACRONYM_LETTERS: usize = 4;

const COMMON_STOP_ACRONYMS: &[&str] = &[
    "CV", "CEO", "CTO", "CFO", "COO", "VP", "HR", "PHD", "MBA", "BA", "BS", "BSC", "MSC", "MA", "USA", "UK",
    "EU", "AM", "PM", "ID", "OK",
];

fn language_stop_acronyms(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::En => &["LLC", "INC", "LTD"],
        Language::Es => &["SL", "SA", "SLU", "DNI", "EEUU"],
        Language::De => &["GMBH", "AG", "KG", "EV", "BRD"],
        Language::It => &["SPA", "SRL", "SNC", "ITA"],
    }
}

impl PatternRecognizer {
    pub fn new(lang: Language) -> Self {
        let header_words = SectionKind::MATCH_PRIORITY
            .into_iter()
            .flat_map(|kind| header_terms(lang, kind))
            .flat_map(|term| term.split_whitespace())
            .map(str::to_uppercase);

        let stop_acronyms = COMMON_STOP_ACRONYMS
            .iter()
            .chain(language_stop_acronyms(lang))
            .map(|s| s.to_string())
            .chain(header_words)
            .collect();
        Self { stop_acronyms }
    }

    fn classify_token(&self, token: &str, shouted_line: bool) -> Option<EntityLabel> {
        let letters = token.chars().filter(|c| c.is_alphabetic()).count();
        if letters == 0 || self.stop_acronyms.contains(&token.to_uppercase()) {
            return None;
        }

        let all_caps = token.chars().all(|c| c.is_uppercase() || c.is_ascii_digit());
        if all_caps && (2..=6).contains(&token.chars().count()) && letters >= 2 {
            let long_word = letters == token.chars().count() && letters > MAX_ACRONYM_LETTERS;
            return (!shouted_line && !long_word).then_some(EntityLabel::Org);
        }

        if token.starts_with('.') || token.to_lowercase().ends_with(".js") {
            return Some(EntityLabel::Misc);
        }

        let has_symbol = token.contains('+') || token.contains('#');
        let camel = token
            .chars()
            .zip(token.chars().skip(1))
            .any(|(a, b)| a.is_lowercase() && b.is_uppercase());

        (has_symbol || camel).then_some(EntityLabel::Product)
    }
}

/// A line with letters, none of them lowercase.
fn is_shouted(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}

impl EntityRecognizer for PatternRecognizer {
    fn recognize(&self, text: &str) -> Vec<Entity> {
        text.lines()
            .flat_map(|line| {
                let shouted = is_shouted(line);
                line.split_whitespace()
                    .map(|raw| {
                        raw.trim_matches(|c: char| ",;:()[]{}\"'!?".contains(c))
                            .trim_end_matches('.')
                    })
                    .filter_map(move |token| {
                        self.classify_token(token, shouted).map(|label| Entity {
                            text: token.to_string(),
                            label,
                        })
                    })
            })
            .collect()
    }
}

/// Whole-word, case-insensitive matcher for a keyword. Word boundaries are
/// letters/digits/underscore so keywords such as "C++" still match.
fn keyword_regex(keyword: &str) -> Option<Regex> {
    let pattern = format!(
        r"(?i)(?:^|[^\p{{L}}\p{{N}}_]){}(?:$|[^\p{{L}}\p{{N}}_])",
        regex::escape(keyword)
    );
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Skipping keyword '{keyword}': {e}");
            None
        }
    }
}

/// Skills found in `text`: recognised entities plus every keyword of the
/// industry's lexicon that occurs as a whole word. Section header lines are
/// ignored.
pub fn extract_skills(
    text: &str,
    industry: Industry,
    lang: Language,
    db: &KeywordDatabase,
    recognizers: &RecognizerRegistry,
) -> BTreeSet<String> {
    let text = text
        .lines()
        .filter(|line| match_header(line.trim(), lang).is_none())
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.as_str();
    let mut skills = BTreeSet::new();

    if let Some(recognizer) = recognizers.get(lang) {
        skills.extend(
            recognizer
                .recognize(text)
                .into_iter()
                .inspect(|e| debug!("Entity {:?}: {}", e.label, e.text))
                .map(|e| e.text.trim().to_string())
                .filter(|t| !t.is_empty()),
        );
    }

    for keyword in &db.lexicon(industry, lang).keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            continue;
        }
        if keyword_regex(keyword).is_some_and(|re| re.is_match(text)) {
            skills.insert(keyword.to_string());
        }
    }

    skills
}
