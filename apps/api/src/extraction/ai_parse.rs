//! Whole-document structuring through the oracle.
//!
//! One parse attempt, then at most one repair attempt on malformed output.
//! Every failure ends as `None`; the caller picks the fallback.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::extraction::locale::{not_specified, present_sentinel};
use crate::extraction::prompts::build_parse_prompt;
use crate::llm_client::prompts::JSON_REPAIR_PROMPT;
use crate::llm_client::{isolate_json_object, strip_json_fences, GenerateOptions, TextOracle};
use crate::models::language::Language;
use crate::models::record::{JobEntry, StructuredRecord};

const PARSE_OPTIONS: GenerateOptions = GenerateOptions {
    temperature: 0.2,
    num_predict: None,
};

/// Lenient mirror of `StructuredRecord` as oracles actually return it:
/// fields may be missing, null, a string or a list.
#[derive(Debug, Default, Deserialize)]
struct OracleRecord {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default, alias = "contact")]
    contact_info: Option<Value>,
    #[serde(default, alias = "profile")]
    summary: Option<Value>,
    #[serde(default, alias = "jobs", alias = "work_experience")]
    experience: Option<Vec<OracleJob>>,
    #[serde(default)]
    education: Option<Value>,
    #[serde(default)]
    certifications: Option<Value>,
    #[serde(default)]
    skills: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct OracleJob {
    #[serde(default, alias = "position", alias = "role")]
    title: Option<String>,
    #[serde(default, alias = "employer")]
    company: Option<String>,
    #[serde(default)]
    dates: Option<String>,
    #[serde(default, alias = "achievements")]
    bullets: Option<Vec<String>>,
}

/// Flattens a JSON value into text: strings as-is, arrays and objects joined
/// with `sep`, everything else empty.
fn flatten(value: Option<&Value>, sep: &str) -> String {
    fn walk(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) if !s.trim().is_empty() => out.push(s.trim().to_string()),
            Value::Number(n) => out.push(n.to_string()),
            Value::Array(items) => items.iter().for_each(|v| walk(v, out)),
            Value::Object(map) => map.values().for_each(|v| walk(v, out)),
            _ => {}
        }
    }

    let mut parts = Vec::new();
    if let Some(v) = value {
        walk(v, &mut parts);
    }
    parts.join(sep)
}

fn flatten_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| flatten(Some(v), ", "))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split([',', ';', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

impl OracleRecord {
    fn into_record(self, lang: Language) -> StructuredRecord {
        let experience = self
            .experience
            .unwrap_or_default()
            .into_iter()
            .map(|job| JobEntry {
                title: job.title.unwrap_or_default().trim().to_string(),
                company: job.company.unwrap_or_default().trim().to_string(),
                dates: job
                    .dates
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| present_sentinel(lang).to_string()),
                bullets: job
                    .bullets
                    .unwrap_or_default()
                    .into_iter()
                    .map(|b| b.trim().to_string())
                    .filter(|b| !b.is_empty())
                    .collect(),
            })
            .filter(|job| !job.title.is_empty() || !job.company.is_empty())
            .collect();

        let education = flatten(self.education.as_ref(), "\n");
        let skills: BTreeSet<String> = flatten_list(self.skills.as_ref()).into_iter().collect();

        StructuredRecord {
            name: flatten(self.name.as_ref(), " "),
            contact_info: flatten(self.contact_info.as_ref(), " | "),
            summary: flatten(self.summary.as_ref(), " "),
            experience,
            education: if education.is_empty() {
                not_specified(lang).to_string()
            } else {
                education
            },
            certifications: flatten_list(self.certifications.as_ref()),
            skills,
            lang,
        }
    }
}

/// Isolates and decodes a record from raw oracle output.
fn decode_record(raw: &str, lang: Language) -> Option<StructuredRecord> {
    let candidate = isolate_json_object(strip_json_fences(raw))?;
    match serde_json::from_str::<OracleRecord>(candidate) {
        Ok(parsed) => Some(parsed.into_record(lang)),
        Err(e) => {
            warn!("Oracle JSON did not decode: {e}");
            None
        }
    }
}

/// Asks the oracle to structure the whole CV. Returns `None` when the oracle
/// is unreachable or its output stays malformed after one repair attempt.
pub async fn ai_parse(text: &str, lang: Language, oracle: &dyn TextOracle) -> Option<StructuredRecord> {
    let prompt = build_parse_prompt(text, lang);

    let first = match oracle.generate(&prompt, PARSE_OPTIONS).await {
        Ok(out) => out,
        Err(e) => {
            warn!("Whole-document parse failed: {e}");
            return None;
        }
    };

    if let Some(record) = decode_record(&first, lang) {
        info!("Whole-document parse succeeded ({} jobs)", record.experience.len());
        return Some(record);
    }

    warn!("Whole-document parse returned malformed JSON, attempting one repair");
    let repair_prompt = JSON_REPAIR_PROMPT.replace("{broken}", &first);
    let repaired = match oracle.generate(&repair_prompt, PARSE_OPTIONS).await {
        Ok(out) => out,
        Err(e) => {
            warn!("JSON repair call failed: {e}");
            return None;
        }
    };

    let record = decode_record(&repaired, lang);
    if record.is_none() {
        warn!("JSON repair did not produce a valid record");
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::tests::{FailingOracle, ScriptedOracle};

    const GOOD: &str = r#"Here you go:
```json
{
  "name": "Jane Doe",
  "contact_info": "jane@example.com | +1 555 0100",
  "summary": "Backend engineer.",
  "experience": [
    {"title": "Senior Engineer", "company": "Acme Corp", "dates": "2019-2022",
     "bullets": ["Led a team of 5 engineers", "  "]},
    {"title": "Intern", "company": "Initech", "dates": null, "bullets": []}
  ],
  "education": [{"degree": "BSc Computer Science", "school": "MIT"}],
  "certifications": ["AWS SAA"],
  "skills": ["Rust", "SQL", "Rust"]
}
```"#;

    #[tokio::test]
    async fn test_valid_response_parses_first_time() {
        let oracle = ScriptedOracle::new(vec![Ok(GOOD.to_string())]);
        let record = ai_parse("cv text", Language::En, &oracle).await.unwrap();

        assert_eq!(oracle.calls(), 1);
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.experience.len(), 2);
        assert_eq!(record.experience[0].bullets, ["Led a team of 5 engineers"]);
        assert_eq!(record.experience[1].dates, "Present");
        assert_eq!(record.education, "BSc Computer Science\nMIT");
        assert_eq!(record.certifications, ["AWS SAA"]);
        assert_eq!(record.skills.len(), 2);
        assert_eq!(record.lang, Language::En);
    }

    #[tokio::test]
    async fn test_missing_closing_brace_triggers_exactly_one_repair() {
        let oracle = ScriptedOracle::new(vec![
            Ok(r#"{"name": "Jane Doe", "skills": ["Rust"]"#.to_string()),
            Ok(r#"{"name": "Jane Doe", "skills": ["Rust"]}"#.to_string()),
        ]);
        let record = ai_parse("cv", Language::En, &oracle).await.unwrap();

        assert_eq!(oracle.calls(), 2);
        assert!(oracle.prompts.lock().unwrap()[1].contains(r#"{"name": "Jane Doe", "skills": ["Rust"]"#));
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.education, "Not specified");
    }

    #[tokio::test]
    async fn test_repair_is_not_looped() {
        let oracle = ScriptedOracle::new(vec![
            Ok("{ broken".to_string()),
            Ok("{ still broken".to_string()),
            Ok(r#"{"name": "never reached"}"#.to_string()),
        ]);
        assert!(ai_parse("cv", Language::Es, &oracle).await.is_none());
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_oracle_yields_none_without_repair() {
        assert!(ai_parse("cv", Language::En, &FailingOracle).await.is_none());
    }

    #[tokio::test]
    async fn test_wrong_shape_counts_as_malformed() {
        let oracle = ScriptedOracle::new(vec![
            Ok(r#"{"experience": "not a list"}"#.to_string()),
            Ok(r#"{"experience": []}"#.to_string()),
        ]);
        let record = ai_parse("cv", Language::It, &oracle).await.unwrap();
        assert_eq!(oracle.calls(), 2);
        assert!(record.experience.is_empty());
        assert_eq!(record.education, "Non specificato");
    }

    #[test]
    fn test_skills_as_comma_string() {
        let record = decode_record(r#"{"skills": "Rust, Go; SQL"}"#, Language::En).unwrap();
        let skills: Vec<&str> = record.skills.iter().map(String::as_str).collect();
        assert_eq!(skills, vec!["Go", "Rust", "SQL"]);
    }
}
