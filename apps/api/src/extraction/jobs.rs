//! Experience parsing: rebuilds discrete jobs from the experience bucket.
//!
//! Streaming state machine with a single piece of state: the job currently
//! receiving bullets. A job-header line starts a new job; entries are never
//! closed, only superseded.

use std::sync::OnceLock;

use regex::Regex;

use crate::extraction::locale::{bullet_verb_suffixes, job_connectors, present_sentinel, title_particles};
use crate::extraction::rewriter::BulletRewriter;
use crate::models::language::{Industry, Language};
use crate::models::record::JobEntry;

const BULLET_GLYPHS: &[char] = &['-', '•', '*', '–'];

/// Unmarked lines must be longer than this to count as bullets.
const MIN_UNMARKED_BULLET_CHARS: usize = 10;

const MAX_TITLE_WORDS: usize = 8;
/// Header lines without a date group are held to a tighter shape.
const MAX_UNDATED_COMPANY_WORDS: usize = 6;

/// A job-header line split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct JobHeader {
    pub title: String,
    pub company: String,
    pub dates: Option<String>,
}

fn header_regex(lang: Language) -> &'static Regex {
    static CACHE: OnceLock<Vec<(Language, Regex)>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| {
        Language::ALL
            .into_iter()
            .map(|l| (l, build_header_regex(l)))
            .collect()
    });
    cache
        .iter()
        .find(|(l, _)| *l == lang)
        .map(|(_, re)| re)
        .unwrap_or(&cache[0].1)
}

/// `<title> <connector> <company> [(<dates>) | [<dates>] | | <dates>]`
fn build_header_regex(lang: Language) -> Regex {
    let words = job_connectors(lang)
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(
        r"(?i)^(?P<title>.+?)(?:\s+(?:{words})\s+|\s*@\s*|\s+\|\s+)(?P<company>[^()\[\]|]+?)\s*(?:[(\[](?P<dates>[^()\[\]]+)[)\]]|\|\s*(?P<piped>[^|]+?))?\s*$"
    );
    Regex::new(&pattern).expect("job header pattern is valid")
}

/// Capitalised words, digits and symbols, with lowercase particles in between.
fn is_title_cased(text: &str, lang: Language) -> bool {
    let particles = title_particles(lang);
    text.split_whitespace().all(|word| {
        word.chars().next().is_some_and(|c| !c.is_lowercase())
            || particles.contains(&word.to_lowercase().as_str())
    })
}

/// Whether `word` reads like the verb opening an achievement bullet.
fn is_bullet_verb(word: &str, lang: Language, action_verbs: &[String]) -> bool {
    let lower = word.to_lowercase();
    action_verbs.iter().any(|v| v.to_lowercase() == lower)
        || bullet_verb_suffixes(lang)
            .iter()
            .any(|suffix| lower.chars().count() > 3 && lower.ends_with(suffix))
}

/// A header line without dates must read as a title and a company name,
/// otherwise it is prose that happens to contain a connector word.
fn is_plausible_undated_header(
    line: &str,
    title: &str,
    company: &str,
    lang: Language,
    action_verbs: &[String],
) -> bool {
    if line.trim_end().ends_with('.') || company.split_whitespace().count() > MAX_UNDATED_COMPANY_WORDS {
        return false;
    }
    if !company.chars().next().is_some_and(|c| c.is_uppercase() || c.is_ascii_digit()) {
        return false;
    }
    let Some(first_word) = title.split_whitespace().next() else {
        return false;
    };
    is_title_cased(title, lang) && !is_bullet_verb(first_word, lang, action_verbs)
}

/// Matches a job-header line such as "Senior Engineer at Acme Corp (2019-2022)".
///
/// `action_verbs` are the lexicon's preferred verbs; an undated line whose
/// title starts with one is a bullet, not a header.
pub fn match_job_header(line: &str, lang: Language, action_verbs: &[String]) -> Option<JobHeader> {
    if line.starts_with(BULLET_GLYPHS) {
        return None;
    }
    let caps = header_regex(lang).captures(line.trim())?;

    let title = caps.name("title")?.as_str().trim();
    let company = caps.name("company")?.as_str().trim();
    let dates = caps
        .name("dates")
        .or_else(|| caps.name("piped"))
        .map(|m| m.as_str().trim().to_string())
        .filter(|d| !d.is_empty());

    if title.is_empty() || company.is_empty() {
        return None;
    }
    if title.split_whitespace().count() > MAX_TITLE_WORDS {
        return None;
    }
    if dates.is_none() && !is_plausible_undated_header(line, title, company, lang, action_verbs) {
        return None;
    }

    Some(JobHeader {
        title: title.to_string(),
        company: company.to_string(),
        dates,
    })
}

/// Strips a leading bullet glyph. `None` when the line has no glyph.
fn strip_bullet(line: &str) -> Option<&str> {
    line.strip_prefix(BULLET_GLYPHS).map(str::trim)
}

/// Pass one: rebuild jobs with their raw bullets. Lines before the first job
/// header and short unmarked lines are dropped.
pub fn scan_jobs(lines: &[String], lang: Language, action_verbs: &[String]) -> Vec<JobEntry> {
    let mut jobs: Vec<JobEntry> = Vec::new();

    for line in lines {
        let line = line.trim();

        if let Some(header) = match_job_header(line, lang, action_verbs) {
            jobs.push(JobEntry {
                title: header.title,
                company: header.company,
                dates: header
                    .dates
                    .unwrap_or_else(|| present_sentinel(lang).to_string()),
                bullets: Vec::new(),
            });
            continue;
        }

        let Some(current) = jobs.last_mut() else {
            continue;
        };

        if let Some(bullet) = strip_bullet(line) {
            if !bullet.is_empty() {
                current.bullets.push(bullet.to_string());
            }
        } else if line.chars().count() > MIN_UNMARKED_BULLET_CHARS {
            current.bullets.push(line.to_string());
        }
    }

    jobs
}

/// Parses the experience lines into jobs and sends every bullet through the
/// rewriter.
pub async fn parse_jobs(
    lines: &[String],
    industry: Industry,
    lang: Language,
    rewriter: &BulletRewriter,
) -> Vec<JobEntry> {
    let mut jobs = scan_jobs(lines, lang, rewriter.action_verbs(industry, lang));
    rewriter.rewrite_jobs(&mut jobs, industry, lang).await;
    jobs
}
