//! Section segmentation: splits raw CV text into labelled buckets.
//!
//! Single pass, one cursor. The cursor starts on `Contact`, so everything above
//! the first recognised header (name, e-mail line, ...) lands there. Header
//! lines switch the cursor and are never stored. Blank lines are dropped.

use tracing::debug;

use crate::extraction::locale::{header_joiners, header_terms};
use crate::models::language::Language;
use crate::models::record::{SectionBuckets, SectionKind};

/// A header term may be followed by at most this many extra words.
const MAX_HEADER_TAIL_WORDS: usize = 4;

pub fn segment(text: &str, lang: Language) -> SectionBuckets {
    let mut buckets = SectionBuckets::default();
    let mut current = SectionKind::Contact;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(kind) = match_header(line, lang) {
            current = kind;
            continue;
        }
        buckets.push(current, line.to_string());
    }

    debug!(
        "Segmented {} lines into sections {:?}",
        buckets.total_lines(),
        buckets.non_empty_kinds()
    );
    buckets
}

/// Returns the section a line announces, if it is a header.
///
/// A line is a header when, with a trailing colon removed, it equals a header
/// term (case-insensitive) or starts with "term " followed by a short
/// title-like tail. Kinds are tried in `SectionKind::MATCH_PRIORITY` order.
pub fn match_header(line: &str, lang: Language) -> Option<SectionKind> {
    let stripped = line.trim().trim_end_matches(':').trim_end();
    if stripped.is_empty() {
        return None;
    }
    let key = stripped.to_lowercase();

    SectionKind::MATCH_PRIORITY.into_iter().find(|&kind| {
        header_terms(lang, kind).iter().any(|term| {
            if key == *term {
                return true;
            }
            if !key.starts_with(&format!("{term} ")) {
                return false;
            }
            let tail: String = stripped.chars().skip(term.chars().count()).collect();
            is_header_tail(&tail, lang)
        })
    })
}

/// Tightens prefix matching so prose such as "Skills used were Python and Go"
/// stays content while "Skills & Tools" or "EXPERIENCE (2015-2024)" are headers.
fn is_header_tail(tail: &str, lang: Language) -> bool {
    let tail = tail.trim();
    if tail.ends_with('.') {
        return false;
    }
    let words: Vec<&str> = tail.split_whitespace().collect();
    if words.len() > MAX_HEADER_TAIL_WORDS {
        return false;
    }

    let joiners = header_joiners(lang);
    words.iter().all(|word| {
        if joiners.iter().any(|j| word.eq_ignore_ascii_case(j)) {
            return true;
        }
        match word.chars().find(|c| c.is_alphabetic()) {
            None => true,
            Some(first) => first.is_uppercase(),
        }
    })
}
