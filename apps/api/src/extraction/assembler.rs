//! Record assembly: merges buckets, parsed jobs and skills into the final record.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::extraction::locale::not_specified;
use crate::models::language::Language;
use crate::models::record::{JobEntry, SectionBuckets, SectionKind, StructuredRecord};

/// How many leftover contact-block lines become the fallback summary.
const SUMMARY_FALLBACK_WINDOW: usize = 3;

/// Longer skills-bucket items are prose, not skills.
const MAX_SKILL_CHARS: usize = 60;

fn contact_detail_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}|https?://|www\.|linkedin\.com|github\.com|\+?\(?\d{2,4}\)?[\s.-]?\d{3}[\s.-]?\d{3,4}\b",
        )
        .expect("contact detail pattern is valid")
    })
}

fn is_contact_detail(line: &str) -> bool {
    contact_detail_regex().is_match(line)
}

fn strip_glyph(line: &str) -> &str {
    line.trim_start_matches(['-', '•', '*', '–', '·']).trim()
}

/// Splits skills-bucket lines such as "Rust, Go | SQL • Docker" into items.
fn split_skill_items(lines: &[String]) -> impl Iterator<Item = String> + '_ {
    lines
        .iter()
        .flat_map(|line| line.split([',', ';', '|', '•', '·']))
        .map(strip_glyph)
        .filter(|item| !item.is_empty() && item.chars().count() <= MAX_SKILL_CHARS)
        .map(String::from)
}

pub fn assemble(
    buckets: &SectionBuckets,
    experience: Vec<JobEntry>,
    extracted_skills: BTreeSet<String>,
    lang: Language,
) -> StructuredRecord {
    let contact = buckets.lines(SectionKind::Contact);

    let name = contact
        .iter()
        .find(|line| !is_contact_detail(line))
        .cloned()
        .unwrap_or_default();

    let contact_info = contact
        .iter()
        .filter(|line| is_contact_detail(line))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" | ");

    let summary = if buckets.has(SectionKind::Summary) {
        buckets.lines(SectionKind::Summary).join(" ")
    } else {
        fallback_summary(contact, &name)
    };

    let education = if buckets.has(SectionKind::Education) {
        buckets.lines(SectionKind::Education).join("\n")
    } else {
        not_specified(lang).to_string()
    };

    let certifications = buckets
        .lines(SectionKind::Certifications)
        .iter()
        .map(|line| strip_glyph(line).to_string())
        .filter(|line| !line.is_empty())
        .collect();

    let mut skills = extracted_skills;
    skills.extend(split_skill_items(buckets.lines(SectionKind::Skills)));

    StructuredRecord {
        name,
        contact_info,
        summary,
        experience,
        education,
        certifications,
        skills,
        lang,
    }
}

/// Best-effort summary from the header block: the trailing lines left after
/// the name and the contact-detail lines, at most `SUMMARY_FALLBACK_WINDOW`.
fn fallback_summary(contact: &[String], name: &str) -> String {
    let mut name_seen = false;
    let leftovers: Vec<&str> = contact
        .iter()
        .filter(|line| {
            if !name_seen && line.as_str() == name {
                name_seen = true;
                return false;
            }
            !is_contact_detail(line)
        })
        .map(String::as_str)
        .collect();

    let start = leftovers.len().saturating_sub(SUMMARY_FALLBACK_WINDOW);
    leftovers[start..].join(" ")
}
