//! Extraction pipeline: turns raw CV text into a `StructuredRecord`.
//!
//! Flow (heuristic): segment → classify (unless forced) → parse jobs +
//! rewrite bullets → extract skills → assemble.
//! The generative strategy asks the oracle for the whole record instead and,
//! with fallback enabled, drops back to the heuristic flow when that fails.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::ai_parse::ai_parse;
use crate::extraction::assembler::assemble;
use crate::extraction::classifier::{classify, pick_best, score_industries, IndustryScore};
use crate::extraction::jobs::parse_jobs;
use crate::extraction::rewriter::BulletRewriter;
use crate::extraction::segmenter::segment;
use crate::extraction::skills::{extract_skills, RecognizerRegistry};
use crate::keywords::KeywordDatabase;
use crate::llm_client::TextOracle;
use crate::models::language::{Industry, Language};
use crate::models::record::{SectionBuckets, SectionKind, StructuredRecord};

const EMPTY_TEXT_MESSAGE: &str = "CV text cannot be empty. Paste text or upload a PDF.";

/// Rejects blank input before any stage runs.
pub fn require_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_TEXT_MESSAGE.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Heuristic,
    Generative,
    GenerativeWithFallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Heuristic => "heuristic",
            Strategy::Generative => "generative",
            Strategy::GenerativeWithFallback => "generative_with_fallback",
        })
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" => Ok(Strategy::Heuristic),
            "generative" => Ok(Strategy::Generative),
            "generative_with_fallback" => Ok(Strategy::GenerativeWithFallback),
            other => Err(format!(
                "unknown strategy '{other}' (expected heuristic, generative or generative_with_fallback)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndustrySource {
    Forced,
    Detected,
}

#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub text: String,
    pub lang: Language,
    /// `None` means auto-detect.
    pub industry: Option<Industry>,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub record: StructuredRecord,
    pub industry: Industry,
    pub industry_source: IndustrySource,
    /// The strategy that actually produced the record.
    pub strategy_used: Strategy,
}

pub struct Pipeline {
    oracle: Arc<dyn TextOracle>,
    keywords: Arc<KeywordDatabase>,
    recognizers: Arc<RecognizerRegistry>,
    rewriter: BulletRewriter,
}

impl Pipeline {
    pub fn new(
        oracle: Arc<dyn TextOracle>,
        keywords: Arc<KeywordDatabase>,
        recognizers: Arc<RecognizerRegistry>,
        rewrite_concurrency: usize,
    ) -> Self {
        let rewriter = BulletRewriter::new(oracle.clone(), keywords.clone(), rewrite_concurrency);
        Self {
            oracle,
            keywords,
            recognizers,
            rewriter,
        }
    }

    pub fn segment(&self, text: &str, lang: Language) -> SectionBuckets {
        segment(text, lang)
    }

    pub fn classify(&self, text: &str, lang: Language) -> (Industry, Vec<IndustryScore>) {
        let scores = score_industries(text, lang, &self.keywords);
        (pick_best(&scores), scores)
    }

    pub async fn extract(&self, request: ExtractionRequest) -> Result<ExtractionOutcome, AppError> {
        let ExtractionRequest {
            text,
            lang,
            industry,
            strategy,
        } = request;

        require_text(&text)?;

        let (industry, industry_source) = match industry {
            Some(forced) => (forced, IndustrySource::Forced),
            None => (classify(&text, lang, &self.keywords), IndustrySource::Detected),
        };
        info!("Extracting CV: lang={lang}, industry={industry} ({industry_source:?}), strategy={strategy}");

        let (record, strategy_used) = match strategy {
            Strategy::Heuristic => (self.heuristic(&text, industry, lang).await, Strategy::Heuristic),
            Strategy::Generative => {
                let record = self.generative(&text, industry, lang).await.ok_or_else(|| {
                    AppError::UnprocessableEntity(
                        "The CV could not be structured automatically. Try a clearer text.".to_string(),
                    )
                })?;
                (record, Strategy::Generative)
            }
            Strategy::GenerativeWithFallback => match self.generative(&text, industry, lang).await {
                Some(record) => (record, Strategy::Generative),
                None => {
                    warn!("Generative parse failed, falling back to heuristic extraction");
                    (self.heuristic(&text, industry, lang).await, Strategy::Heuristic)
                }
            },
        };

        info!(
            "Extraction finished via {strategy_used}: {} jobs, {} skills",
            record.experience.len(),
            record.skills.len()
        );

        Ok(ExtractionOutcome {
            record,
            industry,
            industry_source,
            strategy_used,
        })
    }

    async fn heuristic(&self, text: &str, industry: Industry, lang: Language) -> StructuredRecord {
        let buckets = segment(text, lang);
        let jobs = parse_jobs(buckets.lines(SectionKind::Experience), industry, lang, &self.rewriter).await;
        let skills = extract_skills(text, industry, lang, &self.keywords, &self.recognizers);
        assemble(&buckets, jobs, skills, lang)
    }

    /// Oracle-structured record, enriched with locally extracted skills.
    async fn generative(&self, text: &str, industry: Industry, lang: Language) -> Option<StructuredRecord> {
        let mut record = ai_parse(text, lang, self.oracle.as_ref()).await?;
        record.lang = lang;
        record
            .skills
            .extend(extract_skills(text, industry, lang, &self.keywords, &self.recognizers));
        Some(record)
    }
}
