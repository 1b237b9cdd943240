//! Industry keyword / action-verb database.
//!
//! Loaded once at startup from a JSON file shaped as
//! `{industry: {lang: {keywords: [..], action_verbs: [..]}}}` and shared
//! read-only behind an `Arc` for the life of the process.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::models::language::{Industry, Language};

/// Keywords and preferred action verbs for one industry in one language.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IndustryLexicon {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub action_verbs: Vec<String>,
}

static EMPTY_LEXICON: IndustryLexicon = IndustryLexicon {
    keywords: Vec::new(),
    action_verbs: Vec::new(),
};

#[derive(Debug, Clone, Default)]
pub struct KeywordDatabase {
    tables: BTreeMap<Industry, HashMap<Language, IndustryLexicon>>,
}

type RawTable = HashMap<String, HashMap<String, IndustryLexicon>>;

impl KeywordDatabase {
    /// Loads the database from `path`. A missing or malformed file yields an
    /// empty database; classification then always returns the default industry.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Keyword database {} not readable ({e}); using empty table", path.display());
                return Self::default();
            }
        };

        match Self::from_json_str(&raw) {
            Ok(db) => {
                let industries: Vec<&str> = db.industries().map(Industry::as_str).collect();
                info!(
                    "Keyword database loaded from {} (industries: {})",
                    path.display(),
                    industries.join(", ")
                );
                db
            }
            Err(e) => {
                warn!("Keyword database {} is malformed ({e}); using empty table", path.display());
                Self::default()
            }
        }
    }

    /// Parses the JSON form. Unknown industry or language keys are skipped.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let parsed: RawTable = serde_json::from_str(raw)?;
        let mut tables = BTreeMap::new();

        for (industry_key, by_lang) in parsed {
            let Ok(industry) = industry_key.parse::<Industry>() else {
                warn!("Skipping unknown industry '{industry_key}' in keyword database");
                continue;
            };
            let mut langs = HashMap::new();
            for (lang_key, lexicon) in by_lang {
                match lang_key.parse::<Language>() {
                    Ok(lang) => {
                        langs.insert(lang, lexicon);
                    }
                    Err(_) => warn!("Skipping unsupported language '{lang_key}' for {industry}"),
                }
            }
            tables.insert(industry, langs);
        }

        Ok(Self { tables })
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Industries present in the database, in classifier order.
    pub fn industries(&self) -> impl Iterator<Item = Industry> + '_ {
        self.tables.keys().copied()
    }

    /// Exact lookup: only the table stored for this industry and language.
    pub fn exact(&self, industry: Industry, lang: Language) -> Option<&IndustryLexicon> {
        self.tables.get(&industry)?.get(&lang)
    }

    /// Lookup with fallback: missing industry → tech, missing language → English.
    pub fn lexicon(&self, industry: Industry, lang: Language) -> &IndustryLexicon {
        let by_lang = self
            .tables
            .get(&industry)
            .or_else(|| self.tables.get(&Industry::DEFAULT));

        by_lang
            .and_then(|t| t.get(&lang).or_else(|| t.get(&Language::En)))
            .unwrap_or(&EMPTY_LEXICON)
    }

    /// Lookup used for scoring: the industry's own table, English when the
    /// language is absent, never another industry's table.
    pub fn scoring_lexicon(&self, industry: Industry, lang: Language) -> &IndustryLexicon {
        self.exact(industry, lang)
            .or_else(|| self.exact(industry, Language::En))
            .unwrap_or(&EMPTY_LEXICON)
    }
}
