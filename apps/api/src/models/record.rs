use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::language::Language;

/// The labelled buckets a CV is segmented into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Contact,
    Summary,
    Experience,
    Education,
    Certifications,
    Skills,
}

impl SectionKind {
    /// Header matching order. The first kind whose header terms match a line wins.
    pub const MATCH_PRIORITY: [SectionKind; 6] = [
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Certifications,
        SectionKind::Skills,
        SectionKind::Summary,
        SectionKind::Contact,
    ];
}

/// Ordered raw lines per section, as produced by the segmenter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionBuckets(BTreeMap<SectionKind, Vec<String>>);

impl SectionBuckets {
    pub fn push(&mut self, kind: SectionKind, line: String) {
        self.0.entry(kind).or_default().push(line);
    }

    /// Lines of a section; empty when the section never received content.
    pub fn lines(&self, kind: SectionKind) -> &[String] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, kind: SectionKind) -> bool {
        !self.lines(kind).is_empty()
    }

    /// Sections that hold at least one line.
    pub fn non_empty_kinds(&self) -> Vec<SectionKind> {
        self.0
            .iter()
            .filter(|(_, lines)| !lines.is_empty())
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn total_lines(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// One position in the work history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEntry {
    pub title: String,
    pub company: String,
    /// Free text. A localized "present" sentinel when the CV gave no dates.
    pub dates: String,
    pub bullets: Vec<String>,
}

/// Terminal artifact of extraction and the only input to rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    pub name: String,
    pub contact_info: String,
    pub summary: String,
    pub experience: Vec<JobEntry>,
    pub education: String,
    pub certifications: Vec<String>,
    pub skills: BTreeSet<String>,
    pub lang: Language,
}
