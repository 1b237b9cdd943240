//! Per-language tables the heuristics run on: section header terms, job
//! connector words and the localized placeholder strings.

use crate::models::language::Language;
use crate::models::record::SectionKind;

/// Lowercase header terms for a section in a language.
pub fn header_terms(lang: Language, kind: SectionKind) -> &'static [&'static str] {
    use SectionKind::*;
    match (lang, kind) {
        (Language::En, Contact) => &["contact", "contact information", "contact details", "personal details"],
        (Language::En, Summary) => &["summary", "professional summary", "profile", "about me", "objective", "career objective"],
        (Language::En, Experience) => &[
            "experience",
            "work experience",
            "professional experience",
            "employment history",
            "work history",
            "career history",
        ],
        (Language::En, Education) => &["education", "academic background", "academic history", "qualifications"],
        (Language::En, Certifications) => &["certifications", "certificates", "licenses", "licenses & certifications"],
        (Language::En, Skills) => &["skills", "technical skills", "core competencies", "competencies", "key skills"],

        (Language::Es, Contact) => &["contacto", "datos de contacto", "datos personales"],
        (Language::Es, Summary) => &["resumen", "perfil", "perfil profesional", "sobre mí", "objetivo", "extracto"],
        (Language::Es, Experience) => &[
            "experiencia",
            "experiencia laboral",
            "experiencia profesional",
            "historial laboral",
            "trayectoria profesional",
        ],
        (Language::Es, Education) => &["educación", "formación", "formación académica", "estudios"],
        (Language::Es, Certifications) => &["certificaciones", "certificados", "licencias"],
        (Language::Es, Skills) => &["habilidades", "competencias", "aptitudes", "conocimientos"],

        (Language::De, Contact) => &["kontakt", "kontaktdaten", "persönliche daten"],
        (Language::De, Summary) => &["zusammenfassung", "profil", "über mich", "kurzprofil", "berufsziel"],
        (Language::De, Experience) => &["berufserfahrung", "erfahrung", "beruflicher werdegang", "werdegang"],
        (Language::De, Education) => &["ausbildung", "bildung", "studium", "bildungsweg"],
        (Language::De, Certifications) => &["zertifizierungen", "zertifikate", "lizenzen"],
        (Language::De, Skills) => &["kenntnisse", "fähigkeiten", "kompetenzen", "fachkenntnisse"],

        (Language::It, Contact) => &["contatti", "recapiti", "dati personali"],
        (Language::It, Summary) => &["profilo", "sommario", "riepilogo", "chi sono", "obiettivo", "profilo professionale"],
        (Language::It, Experience) => &[
            "esperienza",
            "esperienze",
            "esperienza lavorativa",
            "esperienze lavorative",
            "esperienza professionale",
        ],
        (Language::It, Education) => &["istruzione", "formazione", "istruzione e formazione", "studi"],
        (Language::It, Certifications) => &["certificazioni", "certificati", "attestati"],
        (Language::It, Skills) => &["competenze", "abilità", "capacità", "competenze tecniche"],
    }
}

/// Words that may follow a header term without turning the line into content,
/// e.g. "Education and Training", "Habilidades y Herramientas".
pub fn header_joiners(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::En => &["and", "&", "/", "of", "-", "–"],
        Language::Es => &["y", "e", "&", "/", "de", "-", "–"],
        Language::De => &["und", "&", "/", "-", "–"],
        Language::It => &["e", "ed", "&", "/", "di", "-", "–"],
    }
}

/// Words separating a job title from a company name ("Engineer at Acme").
/// The pipe and `@` are always accepted in addition.
pub fn job_connectors(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::En => &["at", "for"],
        Language::Es => &["en", "para"],
        Language::De => &["bei"],
        Language::It => &["presso", "in"],
    }
}

/// Lowercase words allowed inside an otherwise capitalised job title
/// ("Head of Sales", "Jefe de Proyecto").
pub fn title_particles(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::En => &["of", "and", "the", "to"],
        Language::Es => &["de", "del", "y", "e", "la", "el"],
        Language::De => &["für", "und", "der", "des"],
        Language::It => &["di", "del", "della", "e", "ed"],
    }
}

/// Endings of first-person/past-tense verbs that open achievement bullets
/// ("Reduced ...", "Desarrollé ..."). A job title never starts with one.
pub fn bullet_verb_suffixes(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::En => &["ed"],
        Language::Es => &["é", "ó"],
        Language::De => &["ierte"],
        Language::It => &[],
    }
}

/// Date text used when a job line carries no dates.
pub fn present_sentinel(lang: Language) -> &'static str {
    match lang {
        Language::En => "Present",
        Language::Es => "Actualidad",
        Language::De => "Heute",
        Language::It => "Presente",
    }
}

/// Placeholder for a section the CV does not provide.
pub fn not_specified(lang: Language) -> &'static str {
    match lang {
        Language::En => "Not specified",
        Language::Es => "No especificado",
        Language::De => "Nicht angegeben",
        Language::It => "Non specificato",
    }
}
