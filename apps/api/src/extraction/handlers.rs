use axum::{
    extract::{Multipart, State},
    response::Html,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::classifier::IndustryScore;
use crate::extraction::pipeline::{require_text, ExtractionRequest, IndustrySource, Strategy};
use crate::models::language::{Industry, Language};
use crate::models::record::{SectionBuckets, StructuredRecord};
use crate::render::{render_html, TemplateStyle};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub raw_text: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub request_id: Uuid,
    pub extracted_at: DateTime<Utc>,
    pub record: StructuredRecord,
    pub industry: Industry,
    pub industry_source: IndustrySource,
    pub strategy_used: Strategy,
    pub lang: Language,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub raw_text: String,
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SegmentResponse {
    pub lang: Language,
    pub sections: SectionBuckets,
}

#[derive(Debug, Serialize)]
pub struct IndustryResponse {
    pub industry: Industry,
    pub scores: Vec<IndustryScore>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub record: StructuredRecord,
    #[serde(default)]
    pub template: Option<String>,
}

/// Explicit language wins; otherwise detect it from the text.
fn resolve_lang(lang: Option<&str>, text: &str) -> Result<Language, AppError> {
    match lang.map(str::trim).filter(|l| !l.is_empty()) {
        Some(code) => code.parse().map_err(AppError::Validation),
        None => Ok(Language::detect(text)),
    }
}

fn resolve_strategy(strategy: Option<&str>, default: Strategy) -> Result<Strategy, AppError> {
    match strategy.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse().map_err(AppError::Validation),
        None => Ok(default),
    }
}

async fn run_extraction(
    state: &AppState,
    text: String,
    lang: Option<&str>,
    industry: Option<&str>,
    strategy: Option<&str>,
) -> Result<ExtractResponse, AppError> {
    let request_id = Uuid::new_v4();
    let lang = resolve_lang(lang, &text)?;
    let industry = Industry::parse_selection(industry.unwrap_or_default()).map_err(AppError::Validation)?;
    let strategy = resolve_strategy(strategy, state.config.default_strategy)?;

    let outcome = state
        .pipeline
        .extract(ExtractionRequest {
            text,
            lang,
            industry,
            strategy,
        })
        .await?;
    info!("Extraction {request_id} done");

    Ok(ExtractResponse {
        request_id,
        extracted_at: Utc::now(),
        record: outcome.record,
        industry: outcome.industry,
        industry_source: outcome.industry_source,
        strategy_used: outcome.strategy_used,
        lang,
    })
}

/// POST /api/v1/cv/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let response = run_extraction(
        &state,
        req.raw_text,
        req.lang.as_deref(),
        req.industry.as_deref(),
        req.strategy.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/cv/extract/pdf
pub async fn handle_extract_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut file: Option<Bytes> = None;
    let mut lang = None;
    let mut industry = None;
    let mut strategy = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?,
                );
            }
            "lang" | "industry" | "strategy" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read field '{name}': {e}")))?;
                match name.as_str() {
                    "lang" => lang = Some(value),
                    "industry" => industry = Some(value),
                    _ => strategy = Some(value),
                }
            }
            other => warn!("Ignoring unexpected multipart field '{other}'"),
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("Missing 'file' field with the PDF".to_string()))?;
    info!("Received PDF upload ({} bytes)", file.len());
    let text = pdf_to_text(file).await?;

    let response = run_extraction(
        &state,
        text,
        lang.as_deref(),
        industry.as_deref(),
        strategy.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

/// Text layer of a PDF. Unreadable PDFs and PDFs without text are 422s.
async fn pdf_to_text(file: Bytes) -> Result<String, AppError> {
    let extracted = match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&file)).await {
        Ok(extracted) => extracted,
        // pdf-extract panics on some malformed documents.
        Err(e) if e.is_panic() => {
            warn!("PDF text extraction panicked: {e}");
            return Err(AppError::UnprocessableEntity(
                "The PDF could not be read. Paste the CV text instead.".to_string(),
            ));
        }
        Err(e) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "spawn_blocking failed in PDF extraction: {e}"
            )))
        }
    };

    match extracted {
        Ok(text) if !text.trim().is_empty() => Ok(text),
        Ok(_) => Err(AppError::UnprocessableEntity(
            "The PDF contains no extractable text. Scanned documents are not supported.".to_string(),
        )),
        Err(e) => {
            warn!("PDF text extraction failed: {e}");
            Err(AppError::UnprocessableEntity(
                "The PDF could not be read. Paste the CV text instead.".to_string(),
            ))
        }
    }
}

/// POST /api/v1/cv/segment
pub async fn handle_segment(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<SegmentResponse>, AppError> {
    require_text(&req.raw_text)?;
    let lang = resolve_lang(req.lang.as_deref(), &req.raw_text)?;
    let sections = state.pipeline.segment(&req.raw_text, lang);
    Ok(Json(SegmentResponse { lang, sections }))
}

/// POST /api/v1/cv/industry
pub async fn handle_industry(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<IndustryResponse>, AppError> {
    require_text(&req.raw_text)?;
    let lang = resolve_lang(req.lang.as_deref(), &req.raw_text)?;
    let (industry, scores) = state.pipeline.classify(&req.raw_text, lang);
    Ok(Json(IndustryResponse { industry, scores }))
}

/// POST /api/v1/cv/render
pub async fn handle_render(Json(req): Json<RenderRequest>) -> Result<Html<String>, AppError> {
    let style: TemplateStyle = req
        .template
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(AppError::Validation)?;
    Ok(Html(render_html(&req.record, style)?))
}
