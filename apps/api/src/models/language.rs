use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported CV languages. Every per-language table in the crate is keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
    De,
    It,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::Es, Language::En, Language::De, Language::It];

    pub fn code(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
            Language::De => "de",
            Language::It => "it",
        }
    }

    /// Guesses the language of `text` from stopword frequency.
    /// Falls back to English when nothing scores or two languages tie.
    pub fn detect(text: &str) -> Language {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .collect();

        let mut best = Language::En;
        let mut best_score = 0usize;
        let mut tied = false;

        for lang in Language::ALL {
            let stopwords = detection_stopwords(lang);
            let score = words.iter().filter(|w| stopwords.contains(w)).count();
            if score > best_score {
                best = lang;
                best_score = score;
                tied = false;
            } else if score == best_score && score > 0 {
                tied = true;
            }
        }

        if best_score == 0 || tied {
            Language::En
        } else {
            best
        }
    }
}

fn detection_stopwords(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Es => &[
            "el", "la", "los", "las", "de", "del", "y", "en", "con", "para", "por", "una", "experiencia",
        ],
        Language::En => &[
            "the", "and", "of", "to", "in", "with", "for", "at", "on", "experience", "skills",
        ],
        Language::De => &[
            "der", "die", "das", "und", "mit", "für", "bei", "von", "im", "ich", "berufserfahrung",
        ],
        Language::It => &[
            "il", "lo", "gli", "e", "di", "della", "con", "per", "presso", "nel", "esperienza",
        ],
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            "de" => Ok(Language::De),
            "it" => Ok(Language::It),
            other => Err(format!("unsupported language '{other}' (expected es, en, de or it)")),
        }
    }
}

/// Industries the keyword database and classifier know about.
/// Declaration order is the classifier's tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Tech,
    Finance,
    Healthcare,
    Hr,
    Engineering,
}

impl Industry {
    pub const ALL: [Industry; 5] = [
        Industry::Tech,
        Industry::Finance,
        Industry::Healthcare,
        Industry::Hr,
        Industry::Engineering,
    ];

    /// Returned by the classifier when no keyword hits at all.
    pub const DEFAULT: Industry = Industry::Tech;

    pub fn as_str(self) -> &'static str {
        match self {
            Industry::Tech => "tech",
            Industry::Finance => "finance",
            Industry::Healthcare => "healthcare",
            Industry::Hr => "hr",
            Industry::Engineering => "engineering",
        }
    }

    /// Parses a user-supplied industry. `"auto"` (or empty) means "classify for me".
    pub fn parse_selection(s: &str) -> Result<Option<Industry>, String> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(None),
            other => other.parse().map(Some),
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Industry::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown industry '{s}'"))
    }
}
