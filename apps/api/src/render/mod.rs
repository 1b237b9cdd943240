//! HTML rendering of a `StructuredRecord`.
//!
//! One askama template, three stylesheets. Section headings follow the
//! record's language.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use askama::Template;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::language::Language;
use crate::models::record::{JobEntry, StructuredRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStyle {
    #[default]
    Modern,
    Executive,
    Minimalist,
}

impl TemplateStyle {
    fn css(self) -> &'static str {
        match self {
            TemplateStyle::Modern => MODERN_CSS,
            TemplateStyle::Executive => EXECUTIVE_CSS,
            TemplateStyle::Minimalist => MINIMALIST_CSS,
        }
    }
}

impl fmt::Display for TemplateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TemplateStyle::Modern => "modern",
            TemplateStyle::Executive => "executive",
            TemplateStyle::Minimalist => "minimalist",
        })
    }
}

impl FromStr for TemplateStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "modern" => Ok(TemplateStyle::Modern),
            "executive" => Ok(TemplateStyle::Executive),
            "minimalist" => Ok(TemplateStyle::Minimalist),
            other => Err(format!("unknown template '{other}'")),
        }
    }
}

/// Localised section headings.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub summary: &'static str,
    pub experience: &'static str,
    pub education: &'static str,
    pub certifications: &'static str,
    pub skills: &'static str,
    pub at: &'static str,
    pub untitled: &'static str,
}

pub fn labels(lang: Language) -> Labels {
    match lang {
        Language::En => Labels {
            summary: "Professional Summary",
            experience: "Work Experience",
            education: "Education",
            certifications: "Certifications",
            skills: "Skills",
            at: "at",
            untitled: "Curriculum Vitae",
        },
        Language::Es => Labels {
            summary: "Perfil Profesional",
            experience: "Experiencia Laboral",
            education: "Formación",
            certifications: "Certificaciones",
            skills: "Habilidades",
            at: "en",
            untitled: "Currículum Vitae",
        },
        Language::De => Labels {
            summary: "Profil",
            experience: "Berufserfahrung",
            education: "Ausbildung",
            certifications: "Zertifizierungen",
            skills: "Kenntnisse",
            at: "bei",
            untitled: "Lebenslauf",
        },
        Language::It => Labels {
            summary: "Profilo Professionale",
            experience: "Esperienza Lavorativa",
            education: "Istruzione",
            certifications: "Certificazioni",
            skills: "Competenze",
            at: "presso",
            untitled: "Curriculum Vitae",
        },
    }
}

#[derive(Template)]
#[template(path = "cv.html")]
struct CvTemplate<'a> {
    lang: &'static str,
    title: &'a str,
    style: TemplateStyle,
    css: &'static str,
    labels: Labels,
    name: &'a str,
    contact: &'a str,
    summary: &'a str,
    jobs: &'a [JobEntry],
    education: Vec<&'a str>,
    certifications: &'a [String],
    skills: &'a BTreeSet<String>,
}

/// Renders the record as a standalone HTML document.
pub fn render_html(record: &StructuredRecord, style: TemplateStyle) -> Result<String, AppError> {
    let labels = labels(record.lang);
    let name = record.name.trim();
    let title = if name.is_empty() { labels.untitled } else { name };

    let template = CvTemplate {
        lang: record.lang.code(),
        title,
        style,
        css: style.css(),
        labels,
        name: title,
        contact: record.contact_info.trim(),
        summary: record.summary.trim(),
        jobs: &record.experience,
        education: record
            .education
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect(),
        certifications: &record.certifications,
        skills: &record.skills,
    };

    template
        .render()
        .map_err(|e| AppError::Render(format!("cv template failed: {e}")))
}

const MODERN_CSS: &str = r#"
body { font-family: 'Segoe UI', Roboto, Helvetica, sans-serif; color: #222; max-width: 820px; margin: 0 auto; padding: 32px; line-height: 1.5; }
.cv-header { border-bottom: 3px solid #2b6cb0; margin-bottom: 20px; }
.cv-header h1 { margin: 0; color: #2b6cb0; }
.contact { color: #555; font-size: 0.95em; }
h2 { color: #2b6cb0; font-size: 1.1em; text-transform: uppercase; letter-spacing: 0.05em; }
.job-heading { display: flex; justify-content: space-between; align-items: baseline; }
.job-heading h3 { margin: 8px 0 4px; font-size: 1em; }
.company { font-weight: normal; color: #444; }
.dates { color: #777; font-size: 0.9em; }
.skill-list { list-style: none; padding: 0; display: flex; flex-wrap: wrap; gap: 6px; }
.skill-list li { background: #ebf4ff; border-radius: 12px; padding: 2px 10px; }
"#;

const EXECUTIVE_CSS: &str = r#"
body { font-family: Georgia, 'Times New Roman', serif; color: #1a1a1a; max-width: 800px; margin: 0 auto; padding: 40px; line-height: 1.45; }
.cv-header { text-align: center; border-bottom: 1px solid #1a1a1a; padding-bottom: 12px; margin-bottom: 24px; }
.cv-header h1 { margin: 0; font-variant: small-caps; letter-spacing: 0.08em; }
.contact { font-style: italic; }
h2 { font-variant: small-caps; border-bottom: 1px solid #999; padding-bottom: 2px; }
.job-heading { display: flex; justify-content: space-between; }
.job-heading h3 { margin: 10px 0 4px; }
.dates { font-style: italic; }
.skill-list { columns: 3; }
"#;

const MINIMALIST_CSS: &str = r#"
body { font-family: Helvetica, Arial, sans-serif; color: #000; max-width: 760px; margin: 0 auto; padding: 24px; line-height: 1.4; }
.cv-header h1 { font-weight: 300; margin-bottom: 0; }
.contact { color: #666; }
h2 { font-weight: 400; font-size: 1em; margin-top: 24px; }
.job-heading h3 { font-size: 0.95em; margin: 6px 0 2px; }
.dates { color: #888; font-size: 0.85em; }
.skill-list { list-style: none; padding: 0; }
.skill-list li { display: inline; }
.skill-list li + li::before { content: " · "; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lang: Language) -> StructuredRecord {
        StructuredRecord {
            name: "Jane <Doe>".to_string(),
            contact_info: "jane@example.com".to_string(),
            summary: "Backend engineer".to_string(),
            experience: vec![JobEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                dates: "2019-2022".to_string(),
                bullets: vec!["Shipped <script> tags safely".to_string()],
            }],
            education: "BSc Computer Science\nMSc Distributed Systems".to_string(),
            certifications: vec!["AWS SA".to_string()],
            skills: ["Rust", "SQL"].iter().map(|s| s.to_string()).collect(),
            lang,
        }
    }

    #[test]
    fn test_render_escapes_and_includes_sections() {
        let html = render_html(&record(Language::En), TemplateStyle::Modern).unwrap();
        assert!(html.contains("Jane &#60;Doe&#62;") || html.contains("Jane &lt;Doe&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Work Experience"));
        assert!(html.contains("MSc Distributed Systems"));
        assert!(html.contains("cv-modern"));
        assert!(html.contains("<li>Rust</li>"));
    }

    #[test]
    fn test_labels_follow_record_language() {
        let html = render_html(&record(Language::De), TemplateStyle::Executive).unwrap();
        assert!(html.contains("Berufserfahrung"));
        assert!(html.contains("lang=\"de\""));
        assert!(html.contains("small-caps"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut r = record(Language::Es);
        r.name.clear();
        r.summary.clear();
        r.experience.clear();
        r.certifications.clear();
        let html = render_html(&r, TemplateStyle::Minimalist).unwrap();
        assert!(!html.contains("Perfil Profesional"));
        assert!(!html.contains("Experiencia Laboral"));
        assert!(html.contains("<h1>Currículum Vitae</h1>"));
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("".parse::<TemplateStyle>().unwrap(), TemplateStyle::Modern);
        assert_eq!("Executive".parse::<TemplateStyle>().unwrap(), TemplateStyle::Executive);
        assert!("baroque".parse::<TemplateStyle>().is_err());
    }
}
