// Prompt templates for bullet rewriting and whole-document parsing.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::models::language::{Industry, Language};

/// Bullet rewrite template. Replace `{industry}`, `{verbs}` and `{bullet}`.
/// The bullet is fenced in triple quotes so stray quotes inside it survive.
fn rewrite_template(lang: Language) -> &'static str {
    match lang {
        Language::En => "Rewrite this CV bullet point to be more impactful, using strong action verbs \
            and adding a placeholder for a metric if missing. Use a professional tone. \
            Only return the improved sentence.\n\n\
            Industry: {industry}\n\
            Preferred verbs: {verbs}\n\n\
            Original: \"\"\"{bullet}\"\"\"\nImproved:",
        Language::Es => "Reescribe este punto de CV para que sea más impactante, usando verbos de acción fuertes \
            y sugiriendo un espacio para una métrica si falta. Usa un tono profesional. \
            Solo devuelve la oración mejorada.\n\n\
            Industria: {industry}\n\
            Verbos recomendados: {verbs}\n\n\
            Original: \"\"\"{bullet}\"\"\"\nMejorado:",
        Language::De => "Formuliere diesen Lebenslauf-Stichpunkt wirkungsvoller um, mit starken Aktionsverben \
            und einem Platzhalter für eine Kennzahl, falls keine vorhanden ist. Verwende einen professionellen Ton. \
            Gib nur den verbesserten Satz zurück.\n\n\
            Branche: {industry}\n\
            Empfohlene Verben: {verbs}\n\n\
            Original: \"\"\"{bullet}\"\"\"\nVerbessert:",
        Language::It => "Riscrivi questo punto del CV per renderlo più incisivo, usando verbi d'azione forti \
            e aggiungendo un segnaposto per una metrica se manca. Usa un tono professionale. \
            Restituisci solo la frase migliorata.\n\n\
            Settore: {industry}\n\
            Verbi consigliati: {verbs}\n\n\
            Originale: \"\"\"{bullet}\"\"\"\nMigliorato:",
    }
}

pub fn build_rewrite_prompt(bullet: &str, industry: Industry, lang: Language, verbs: &[String]) -> String {
    rewrite_template(lang)
        .replace("{industry}", industry.as_str())
        .replace("{verbs}", &verbs.join(", "))
        .replace("{bullet}", bullet)
}

/// Shape the oracle must return for a whole-document parse.
pub const RECORD_SCHEMA: &str = r#"{
  "name": "Full name",
  "contact_info": "e-mail | phone | city | links",
  "summary": "Two or three sentence professional summary",
  "experience": [
    {
      "title": "Job title",
      "company": "Company name",
      "dates": "2019 - 2022",
      "bullets": ["Achievement-oriented bullet starting with an action verb"]
    }
  ],
  "education": "Degree, institution, years",
  "certifications": ["Certification name"],
  "skills": ["Skill"]
}"#;

fn parse_intro(lang: Language) -> &'static str {
    match lang {
        Language::En => "Extract the following CV into a single JSON object. Keep the CV's language (English). \
            Improve every experience bullet in place: start with a strong action verb and keep the facts. \
            Use \"Present\" when a job has no end date.",
        Language::Es => "Extrae el siguiente CV en un único objeto JSON. Mantén el idioma del CV (español). \
            Mejora cada logro de la experiencia en su sitio: empieza con un verbo de acción fuerte y conserva los hechos. \
            Usa \"Actualidad\" cuando un puesto no tenga fecha de fin.",
        Language::De => "Extrahiere den folgenden Lebenslauf in ein einziges JSON-Objekt. Behalte die Sprache des Lebenslaufs (Deutsch) bei. \
            Verbessere jeden Stichpunkt der Berufserfahrung direkt: beginne mit einem starken Aktionsverb und behalte die Fakten. \
            Verwende \"Heute\", wenn eine Stelle kein Enddatum hat.",
        Language::It => "Estrai il seguente CV in un unico oggetto JSON. Mantieni la lingua del CV (italiano). \
            Migliora ogni punto dell'esperienza sul posto: inizia con un verbo d'azione forte e mantieni i fatti. \
            Usa \"Presente\" quando un lavoro non ha data di fine.",
    }
}

pub fn build_parse_prompt(cv_text: &str, lang: Language) -> String {
    format!(
        "{intro}\n\nReturn a JSON object with this EXACT schema (no extra fields):\n{schema}\n\n{json_only}\n\nCV:\n{cv_text}",
        intro = parse_intro(lang),
        schema = RECORD_SCHEMA,
        json_only = JSON_ONLY_INSTRUCTION,
    )
}
